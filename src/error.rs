use crate::catalog::BlockKind;
use crate::graph::{EdgeId, NodeId};
use thiserror::Error;

/// Errors raised when resolving a block kind from its textual identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown block kind '{0}'")]
    UnknownBlockKind(String),
}

/// Errors raised by direct graph mutations that reference missing elements.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node {0} does not exist in the program graph")]
    NodeNotFound(NodeId),

    #[error("Edge {0} does not exist in the program graph")]
    EdgeNotFound(EdgeId),

    #[error("Block kind '{kind}' of node {node_id} has no parameter named '{name}'")]
    UnknownParameter {
        node_id: NodeId,
        kind: BlockKind,
        name: String,
    },

    #[error("Node id {0} appears more than once in the snapshot")]
    DuplicateNode(NodeId),

    #[error("Edge id {0} appears more than once in the snapshot")]
    DuplicateEdge(EdgeId),

    #[error("Id {0} is outside the range a restored graph may use")]
    IdOutOfRange(u64),
}

/// The reason a proposed connection was not created.
///
/// Each variant corresponds to one connection rule; the first rule that fails wins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionRejected {
    #[error("Node {0} referenced by the connection does not exist")]
    UnknownNode(NodeId),

    #[error("Node {0} cannot be connected to itself")]
    SelfLoop(NodeId),

    #[error("Input slot of node {target} is already occupied by edge {existing}")]
    TargetOccupied { target: NodeId, existing: EdgeId },

    #[error("Block '{kind}' of node {source_id} cannot have children")]
    ChildrenNotAllowed { source_id: NodeId, kind: BlockKind },

    #[error("Node {source_id} already holds the maximum of {max} children")]
    ChildLimitReached { source_id: NodeId, max: usize },

    #[error("Connecting node {source_id} to node {target} would create a cycle")]
    WouldCreateCycle { source_id: NodeId, target: NodeId },
}

/// Errors that can occur while compiling a program graph into statements.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Node {node_id} has more than one incoming connection")]
    MultipleParents { node_id: NodeId },

    #[error("Node {node_id} has more than one outgoing sequential connection")]
    MultipleSuccessors { node_id: NodeId },

    #[error("Block '{kind}' of node {node_id} cannot have children")]
    ChildrenNotAllowed { node_id: NodeId, kind: BlockKind },

    #[error("Node {node_id} has {children} children, more than the maximum of {max}")]
    TooManyChildren {
        node_id: NodeId,
        children: usize,
        max: usize,
    },

    #[error("The program graph contains a cycle through node {node_id}")]
    CyclicReference { node_id: NodeId },

    #[error("Node {node_id} is missing required input '{parameter}'")]
    MissingRequiredInput { node_id: NodeId, parameter: String },

    #[error("Input '{parameter}' of node {node_id} expects a finite number, but found '{value}'")]
    InvalidNumber {
        node_id: NodeId,
        parameter: String,
        value: String,
    },
}

impl CompileError {
    /// The node the caller should highlight for this error.
    pub fn node_id(&self) -> NodeId {
        match self {
            CompileError::MultipleParents { node_id }
            | CompileError::MultipleSuccessors { node_id }
            | CompileError::ChildrenNotAllowed { node_id, .. }
            | CompileError::TooManyChildren { node_id, .. }
            | CompileError::CyclicReference { node_id }
            | CompileError::MissingRequiredInput { node_id, .. }
            | CompileError::InvalidNumber { node_id, .. } => *node_id,
        }
    }
}

/// Errors that can occur when importing a canvas document into a program graph.
#[derive(Error, Debug, Clone)]
pub enum ImportError {
    #[error("Failed to parse canvas JSON: {0}")]
    JsonParseError(String),

    #[error("Canvas node '{node}' has an invalid block type: {source}")]
    InvalidBlockKind { node: String, source: CatalogError },

    #[error("Canvas node id '{0}' appears more than once")]
    DuplicateNode(String),

    #[error("Canvas edge '{edge}' references unknown node '{node}'")]
    NodeNotFound { edge: String, node: String },

    #[error("Canvas edge '{edge}' uses unsupported handle '{handle}'")]
    InvalidHandle { edge: String, handle: String },

    #[error("Canvas node '{node}' has an unsupported value for '{parameter}'")]
    InvalidValue { node: String, parameter: String },

    #[error("Canvas edge '{edge}' was rejected: {source}")]
    Rejected {
        edge: String,
        source: ConnectionRejected,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors that can occur when saving or loading graph snapshots.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshot serialization failed: {0}")]
    Encode(String),

    #[error("Snapshot deserialization failed: {0}")]
    Decode(String),

    #[error("Snapshot file '{path}' could not be accessed: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}
