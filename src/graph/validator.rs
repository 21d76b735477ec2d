//! Connection rules deciding whether an edge may be added to a [`ProgramGraph`].
//!
//! The rules are checked in order and the first failure is reported:
//!
//! 1. A node cannot connect to itself.
//! 2. A node's input slot holds at most one edge, whatever handle it comes from.
//! 3. A hierarchical edge needs a source that can have children and still has room.
//! 4. Sequential edges have no extra source-side rule.
//! 5. The edge must not close a cycle over sequential and hierarchical edges.

use super::{NodeId, ProgramGraph, SourceHandle};
use crate::error::ConnectionRejected;
use ahash::{AHashMap, AHashSet};

/// An edge that has not been inserted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposedEdge {
    pub source: NodeId,
    pub source_handle: SourceHandle,
    pub target: NodeId,
}

impl ProposedEdge {
    pub fn sequential(source: NodeId, target: NodeId) -> Self {
        Self {
            source,
            source_handle: SourceHandle::Sequential,
            target,
        }
    }

    pub fn hierarchical(source: NodeId, target: NodeId) -> Self {
        Self {
            source,
            source_handle: SourceHandle::Hierarchical,
            target,
        }
    }
}

/// Returns `true` if the proposed edge may be added.
pub fn is_valid(graph: &ProgramGraph, proposed: &ProposedEdge) -> bool {
    check_connection(graph, proposed).is_ok()
}

/// Checks the connection rules and reports the first one that fails.
pub fn check_connection(
    graph: &ProgramGraph,
    proposed: &ProposedEdge,
) -> Result<(), ConnectionRejected> {
    let source = graph
        .node(proposed.source)
        .ok_or(ConnectionRejected::UnknownNode(proposed.source))?;
    if !graph.contains_node(proposed.target) {
        return Err(ConnectionRejected::UnknownNode(proposed.target));
    }

    if proposed.source == proposed.target {
        return Err(ConnectionRejected::SelfLoop(proposed.source));
    }

    if let Some(existing) = graph.incoming(proposed.target).next() {
        return Err(ConnectionRejected::TargetOccupied {
            target: proposed.target,
            existing: existing.id,
        });
    }

    if proposed.source_handle == SourceHandle::Hierarchical {
        let definition = source.kind().definition();
        if !definition.can_have_children {
            return Err(ConnectionRejected::ChildrenNotAllowed {
                source_id: proposed.source,
                kind: source.kind(),
            });
        }
        if let Some(max) = definition.max_children {
            if source.child_count() >= max {
                return Err(ConnectionRejected::ChildLimitReached {
                    source_id: proposed.source,
                    max,
                });
            }
        }
    }

    // source -> target closes a cycle exactly when target already reaches source.
    if reaches(graph, proposed.target, proposed.source) {
        return Err(ConnectionRejected::WouldCreateCycle {
            source_id: proposed.source,
            target: proposed.target,
        });
    }

    Ok(())
}

/// Depth-first search over edges of both kinds.
fn reaches(graph: &ProgramGraph, from: NodeId, to: NodeId) -> bool {
    let mut successors: AHashMap<NodeId, Vec<NodeId>> = AHashMap::new();
    for edge in graph.edges() {
        successors.entry(edge.source).or_default().push(edge.target);
    }

    let mut stack = vec![from];
    let mut seen = AHashSet::new();
    while let Some(current) = stack.pop() {
        if current == to {
            return true;
        }
        if !seen.insert(current) {
            continue;
        }
        if let Some(targets) = successors.get(&current) {
            stack.extend(targets.iter().copied());
        }
    }
    false
}
