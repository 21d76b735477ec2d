use crate::catalog::BlockKind;
use crate::error::{ConnectionRejected, GraphError};
use crate::value::ParamValue;
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

pub mod snapshot;
pub mod validator;

pub use snapshot::{EdgeRecord, GraphSnapshot, MAX_RESTORED_ID, NodeRecord};
pub use validator::{ProposedEdge, check_connection, is_valid};

/// Identifier of a node. Ids are handed out in increasing order, so ordering by id is
/// ordering by creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

/// Identifier of an edge, ordered by creation like [`NodeId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// The outgoing handle an edge leaves its source from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceHandle {
    /// "out": the target runs right after the source, at the same nesting level.
    Sequential,
    /// "child": the target runs nested inside the source's body.
    Hierarchical,
}

impl SourceHandle {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceHandle::Sequential => "out",
            SourceHandle::Hierarchical => "child",
        }
    }
}

impl fmt::Display for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceHandle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "out" => Ok(SourceHandle::Sequential),
            "child" => Ok(SourceHandle::Hierarchical),
            other => Err(other.to_string()),
        }
    }
}

/// The incoming slot an edge terminates at. Every block has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetHandle {
    #[default]
    In,
}

impl TargetHandle {
    pub fn as_str(self) -> &'static str {
        "in"
    }
}

/// A block instance on the canvas.
#[derive(Debug, Clone)]
pub struct GraphNode {
    id: NodeId,
    kind: BlockKind,
    values: AHashMap<String, ParamValue>,
    child_count: usize,
}

impl GraphNode {
    fn new(id: NodeId, kind: BlockKind) -> Self {
        Self {
            id,
            kind,
            values: AHashMap::new(),
            child_count: 0,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// The stored value of a parameter, exactly as it was entered.
    pub fn value(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// All stored values, ordered by parameter name.
    pub fn values(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .sorted_by_key(|(k, _)| *k)
    }

    /// Number of outgoing hierarchical edges.
    pub fn child_count(&self) -> usize {
        self.child_count
    }
}

/// A typed connection between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub source_handle: SourceHandle,
    pub target: NodeId,
    pub target_handle: TargetHandle,
}

impl GraphEdge {
    pub fn is_hierarchical(&self) -> bool {
        self.source_handle == SourceHandle::Hierarchical
    }
}

/// The authoring graph: flat id-keyed node and edge collections.
///
/// Edges always reference nodes present in the graph. `child_count` is kept in step with
/// the edge set by every mutation, so a reader never observes a stale count.
#[derive(Debug, Clone, Default)]
pub struct ProgramGraph {
    nodes: AHashMap<NodeId, GraphNode>,
    edges: AHashMap<EdgeId, GraphEdge>,
    next_node_id: u64,
    next_edge_id: u64,
}

impl ProgramGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiates a block with no parameter values.
    pub fn add_node(&mut self, kind: BlockKind) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.insert(id, GraphNode::new(id, kind));
        debug!(node = %id, %kind, "node added");
        id
    }

    /// Removes a node together with every edge that touches it.
    pub fn remove_node(&mut self, id: NodeId) -> Result<GraphNode, GraphError> {
        let node = self.nodes.remove(&id).ok_or(GraphError::NodeNotFound(id))?;

        let incident: Vec<EdgeId> = self
            .edges
            .values()
            .filter(|e| e.source == id || e.target == id)
            .map(|e| e.id)
            .collect();
        for edge_id in &incident {
            if let Some(edge) = self.edges.remove(edge_id) {
                if edge.is_hierarchical() {
                    self.recompute_child_count(edge.source);
                }
            }
        }

        debug!(node = %id, removed_edges = incident.len(), "node removed");
        Ok(node)
    }

    /// Stores a parameter value verbatim. Coercion happens at compile time.
    pub fn set_parameter_value(
        &mut self,
        node_id: NodeId,
        name: &str,
        value: impl Into<ParamValue>,
    ) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        if node.kind.definition().parameter(name).is_none() {
            return Err(GraphError::UnknownParameter {
                node_id,
                kind: node.kind,
                name: name.to_string(),
            });
        }
        let value = value.into();
        debug!(node = %node_id, parameter = name, %value, "parameter set");
        node.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Clears a parameter back to the unset state.
    pub fn clear_parameter_value(
        &mut self,
        node_id: NodeId,
        name: &str,
    ) -> Result<Option<ParamValue>, GraphError> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        Ok(node.values.remove(name))
    }

    /// Adds an edge if the connection rules accept it.
    pub fn add_edge(&mut self, proposed: ProposedEdge) -> Result<EdgeId, ConnectionRejected> {
        if let Err(reason) = check_connection(self, &proposed) {
            warn!(
                source = %proposed.source,
                target = %proposed.target,
                handle = %proposed.source_handle,
                %reason,
                "connection rejected"
            );
            return Err(reason);
        }
        Ok(self.insert_edge(proposed))
    }

    /// Convenience wrapper around [`ProgramGraph::add_edge`].
    pub fn connect(
        &mut self,
        source: NodeId,
        source_handle: SourceHandle,
        target: NodeId,
    ) -> Result<EdgeId, ConnectionRejected> {
        self.add_edge(ProposedEdge {
            source,
            source_handle,
            target,
        })
    }

    /// Removes an edge and refreshes the former source's child count.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<GraphEdge, GraphError> {
        let edge = self.edges.remove(&id).ok_or(GraphError::EdgeNotFound(id))?;
        if edge.is_hierarchical() {
            self.recompute_child_count(edge.source);
        }
        debug!(edge = %id, source = %edge.source, target = %edge.target, "edge removed");
        Ok(edge)
    }

    /// Recomputes every node's child count from the edge set.
    pub fn recompute_child_counts(&mut self) {
        let mut counts: AHashMap<NodeId, usize> = AHashMap::new();
        for edge in self.edges.values().filter(|e| e.is_hierarchical()) {
            *counts.entry(edge.source).or_default() += 1;
        }
        for node in self.nodes.values_mut() {
            node.child_count = counts.get(&node.id).copied().unwrap_or(0);
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&GraphEdge> {
        self.edges.get(&id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values().sorted_by_key(|n| n.id)
    }

    /// All edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.values().sorted_by_key(|e| e.id)
    }

    /// Edges leaving `source` from the given handle, in creation order.
    pub fn outgoing(
        &self,
        source: NodeId,
        handle: SourceHandle,
    ) -> impl Iterator<Item = &GraphEdge> {
        self.edges
            .values()
            .filter(move |e| e.source == source && e.source_handle == handle)
            .sorted_by_key(|e| e.id)
    }

    /// Edges terminating at the input slot of `target`, in creation order.
    pub fn incoming(&self, target: NodeId) -> impl Iterator<Item = &GraphEdge> {
        self.edges
            .values()
            .filter(move |e| e.target == target)
            .sorted_by_key(|e| e.id)
    }

    /// Nodes with an empty input slot, in creation order.
    pub fn roots(&self) -> Vec<NodeId> {
        let targets: AHashSet<NodeId> = self.edges.values().map(|e| e.target).collect();
        self.nodes()
            .map(|n| n.id)
            .filter(|id| !targets.contains(id))
            .collect()
    }

    /// Inserts an edge without consulting the connection rules. Endpoints must exist.
    pub(crate) fn insert_edge(&mut self, proposed: ProposedEdge) -> EdgeId {
        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        self.edges.insert(
            id,
            GraphEdge {
                id,
                source: proposed.source,
                source_handle: proposed.source_handle,
                target: proposed.target,
                target_handle: TargetHandle::In,
            },
        );
        if proposed.source_handle == SourceHandle::Hierarchical {
            self.recompute_child_count(proposed.source);
        }
        debug!(
            edge = %id,
            source = %proposed.source,
            target = %proposed.target,
            handle = %proposed.source_handle,
            "edge added"
        );
        id
    }

    fn recompute_child_count(&mut self, id: NodeId) {
        let count = self
            .edges
            .values()
            .filter(|e| e.source == id && e.is_hierarchical())
            .count();
        if let Some(node) = self.nodes.get_mut(&id) {
            node.child_count = count;
        }
    }
}
