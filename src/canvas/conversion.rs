use super::types::{CanvasDocument, CanvasEdge};
use crate::catalog::BlockKind;
use crate::error::{CompileError, ImportError};
use crate::graph::{NodeId, ProgramGraph, ProposedEdge, SourceHandle, TargetHandle};
use crate::value::ParamValue;
use ahash::AHashMap;
use tracing::debug;

/// How edges from an external document are inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Every edge goes through the connection rules; the first rejection fails the import.
    #[default]
    Validated,
    /// Edges are inserted as-is, the way a stored graph is restored. Structural problems
    /// surface when the graph is compiled.
    Restore,
}

/// A program graph built from an external document, together with the document's own
/// node identifiers.
#[derive(Debug, Clone, Default)]
pub struct ImportedGraph {
    pub graph: ProgramGraph,
    canvas_ids: AHashMap<NodeId, String>,
}

impl ImportedGraph {
    /// The document identifier of a graph node.
    pub fn canvas_id(&self, node: NodeId) -> Option<&str> {
        self.canvas_ids.get(&node).map(String::as_str)
    }

    /// The graph node created for a document identifier.
    pub fn node_for(&self, canvas_id: &str) -> Option<NodeId> {
        self.canvas_ids
            .iter()
            .find(|(_, id)| id.as_str() == canvas_id)
            .map(|(node, _)| *node)
    }

    /// Formats a compile error using the document's node identifier.
    pub fn describe(&self, error: &CompileError) -> String {
        match self.canvas_id(error.node_id()) {
            Some(canvas_id) => format!("{} (canvas node '{}')", error, canvas_id),
            None => error.to_string(),
        }
    }
}

/// A trait for external graph formats that can be converted into a [`ProgramGraph`].
///
/// Implement it on your own document structs to feed the compiler from any authoring
/// tool. [`CanvasDocument`] implements it for the canvas JSON export.
pub trait IntoGraph {
    /// Consumes the document and converts it into a program graph.
    fn into_graph(self, mode: ImportMode) -> Result<ImportedGraph, ImportError>;
}

impl IntoGraph for CanvasDocument {
    fn into_graph(self, mode: ImportMode) -> Result<ImportedGraph, ImportError> {
        let mut imported = ImportedGraph::default();
        let mut by_canvas_id: AHashMap<String, NodeId> = AHashMap::new();

        for node in self.nodes {
            if by_canvas_id.contains_key(&node.id) {
                return Err(ImportError::DuplicateNode(node.id));
            }
            let kind: BlockKind =
                node.block_type
                    .parse()
                    .map_err(|source| ImportError::InvalidBlockKind {
                        node: node.id.clone(),
                        source,
                    })?;
            let id = imported.graph.add_node(kind);

            for (name, raw) in &node.data.values {
                let value =
                    ParamValue::from_json(raw).ok_or_else(|| ImportError::InvalidValue {
                        node: node.id.clone(),
                        parameter: name.clone(),
                    })?;
                if let Some(value) = value {
                    imported.graph.set_parameter_value(id, name, value)?;
                }
            }

            by_canvas_id.insert(node.id.clone(), id);
            imported.canvas_ids.insert(id, node.id);
        }

        for (index, edge) in self.edges.iter().enumerate() {
            let label = edge_label(edge, index);
            let proposed = ProposedEdge {
                source: lookup(&by_canvas_id, &edge.source, &label)?,
                source_handle: edge.source_handle.parse::<SourceHandle>().map_err(|handle| {
                    ImportError::InvalidHandle {
                        edge: label.clone(),
                        handle,
                    }
                })?,
                target: lookup(&by_canvas_id, &edge.target, &label)?,
            };
            if edge.target_handle != TargetHandle::In.as_str() {
                return Err(ImportError::InvalidHandle {
                    edge: label,
                    handle: edge.target_handle.clone(),
                });
            }

            match mode {
                ImportMode::Validated => {
                    imported
                        .graph
                        .add_edge(proposed)
                        .map_err(|source| ImportError::Rejected {
                            edge: label,
                            source,
                        })?;
                }
                ImportMode::Restore => {
                    imported.graph.insert_edge(proposed);
                }
            }
        }

        debug!(
            nodes = imported.graph.node_count(),
            edges = imported.graph.edge_count(),
            ?mode,
            "canvas document imported"
        );
        Ok(imported)
    }
}

fn edge_label(edge: &CanvasEdge, index: usize) -> String {
    if edge.id.is_empty() {
        format!("#{}", index)
    } else {
        edge.id.clone()
    }
}

fn lookup(
    by_canvas_id: &AHashMap<String, NodeId>,
    canvas_id: &str,
    edge: &str,
) -> Result<NodeId, ImportError> {
    by_canvas_id
        .get(canvas_id)
        .copied()
        .ok_or_else(|| ImportError::NodeNotFound {
            edge: edge.to_string(),
            node: canvas_id.to_string(),
        })
}
