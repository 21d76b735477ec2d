use super::{EdgeId, GraphEdge, GraphNode, NodeId, ProgramGraph, SourceHandle, TargetHandle};
use crate::catalog::BlockKind;
use crate::error::{GraphError, SnapshotError};
use crate::value::ParamValue;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::debug;

/// Largest id counter a restored graph may carry. Ids above it are rejected so that
/// later `add_node`/`add_edge` calls always have room to count upward.
pub const MAX_RESTORED_ID: u64 = u64::MAX >> 1;

/// A plain, serializable copy of a [`ProgramGraph`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
    /// Id the next added node receives. Ids of deleted nodes are never handed out again.
    pub next_node_id: u64,
    pub next_edge_id: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub id: NodeId,
    pub kind: BlockKind,
    pub values: Vec<(String, ParamValue)>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct EdgeRecord {
    pub id: EdgeId,
    pub source: NodeId,
    pub source_handle: SourceHandle,
    pub target: NodeId,
}

impl GraphSnapshot {
    /// Encodes the snapshot with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        encode_to_vec(self, standard()).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Decodes a snapshot produced by [`GraphSnapshot::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        decode_from_slice(bytes, standard())
            .map(|(snapshot, _)| snapshot) // bincode 2 returns (value, bytes_read)
            .map_err(|e| SnapshotError::Decode(e.to_string()))
    }

    pub fn save(&self, path: &str) -> Result<(), SnapshotError> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).map_err(|source| SnapshotError::Io {
            path: path.to_string(),
            source,
        })
    }

    pub fn from_file(path: &str) -> Result<Self, SnapshotError> {
        let bytes = fs::read(path).map_err(|source| SnapshotError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }
}

impl ProgramGraph {
    /// Captures nodes and edges in creation order.
    pub fn snapshot(&self) -> GraphSnapshot {
        let nodes = self
            .nodes()
            .map(|node| NodeRecord {
                id: node.id(),
                kind: node.kind(),
                values: node
                    .values()
                    .map(|(name, value)| (name.to_string(), value.clone()))
                    .collect(),
            })
            .collect();
        let edges = self
            .edges()
            .map(|edge| EdgeRecord {
                id: edge.id,
                source: edge.source,
                source_handle: edge.source_handle,
                target: edge.target,
            })
            .collect();
        GraphSnapshot {
            nodes,
            edges,
            next_node_id: self.next_node_id,
            next_edge_id: self.next_edge_id,
        }
    }

    /// Rebuilds a graph from a snapshot, preserving ids and id counters.
    ///
    /// Connection rules are not applied: a restored graph may violate them, and the
    /// compiler's integrity check is what reports it. Records must still be well formed:
    /// ids are unique and within [`MAX_RESTORED_ID`], parameters exist on their block,
    /// and edges reference nodes present in the snapshot.
    pub fn restore(snapshot: GraphSnapshot) -> Result<Self, GraphError> {
        let mut graph = ProgramGraph::new();

        let mut next_node_id = bounded(snapshot.next_node_id)?;
        for record in snapshot.nodes {
            next_node_id = next_node_id.max(successor(record.id.0)?);
            if graph.nodes.contains_key(&record.id) {
                return Err(GraphError::DuplicateNode(record.id));
            }
            let definition = record.kind.definition();
            let mut node = GraphNode::new(record.id, record.kind);
            for (name, value) in record.values {
                if definition.parameter(&name).is_none() {
                    return Err(GraphError::UnknownParameter {
                        node_id: record.id,
                        kind: record.kind,
                        name,
                    });
                }
                node.values.insert(name, value);
            }
            graph.nodes.insert(record.id, node);
        }

        let mut next_edge_id = bounded(snapshot.next_edge_id)?;
        for record in snapshot.edges {
            next_edge_id = next_edge_id.max(successor(record.id.0)?);
            if graph.edges.contains_key(&record.id) {
                return Err(GraphError::DuplicateEdge(record.id));
            }
            for endpoint in [record.source, record.target] {
                if !graph.contains_node(endpoint) {
                    return Err(GraphError::NodeNotFound(endpoint));
                }
            }
            graph.edges.insert(
                record.id,
                GraphEdge {
                    id: record.id,
                    source: record.source,
                    source_handle: record.source_handle,
                    target: record.target,
                    target_handle: TargetHandle::In,
                },
            );
        }

        graph.next_node_id = next_node_id;
        graph.next_edge_id = next_edge_id;
        graph.recompute_child_counts();
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph restored from snapshot"
        );
        Ok(graph)
    }
}

fn bounded(counter: u64) -> Result<u64, GraphError> {
    if counter > MAX_RESTORED_ID {
        return Err(GraphError::IdOutOfRange(counter));
    }
    Ok(counter)
}

/// The counter value that follows `id`.
fn successor(id: u64) -> Result<u64, GraphError> {
    id.checked_add(1)
        .filter(|next| *next <= MAX_RESTORED_ID)
        .ok_or(GraphError::IdOutOfRange(id))
}
