use crate::error::CompileError;
use crate::graph::{NodeId, ProgramGraph, SourceHandle};
use ahash::AHashMap;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Verifies the structural invariants the compiler relies on.
///
/// The connection rules already keep graphs built through [`ProgramGraph::add_edge`]
/// valid; this catches graphs assembled any other way.
pub(super) fn check(graph: &ProgramGraph) -> Result<(), CompileError> {
    check_single_parent(graph)?;
    check_single_successor(graph)?;
    check_child_arity(graph)?;
    check_acyclic(graph)
}

fn check_single_parent(graph: &ProgramGraph) -> Result<(), CompileError> {
    let mut incoming: AHashMap<NodeId, usize> = AHashMap::new();
    for edge in graph.edges() {
        let count = incoming.entry(edge.target).or_default();
        *count += 1;
        if *count > 1 {
            return Err(CompileError::MultipleParents {
                node_id: edge.target,
            });
        }
    }
    Ok(())
}

/// A sequential chain is a single path; a second "out" edge would be unreachable.
fn check_single_successor(graph: &ProgramGraph) -> Result<(), CompileError> {
    let mut outgoing: AHashMap<NodeId, usize> = AHashMap::new();
    for edge in graph
        .edges()
        .filter(|e| e.source_handle == SourceHandle::Sequential)
    {
        let count = outgoing.entry(edge.source).or_default();
        *count += 1;
        if *count > 1 {
            return Err(CompileError::MultipleSuccessors {
                node_id: edge.source,
            });
        }
    }
    Ok(())
}

fn check_child_arity(graph: &ProgramGraph) -> Result<(), CompileError> {
    for node in graph.nodes() {
        let children = node.child_count();
        if children == 0 {
            continue;
        }
        let definition = node.kind().definition();
        if !definition.can_have_children {
            return Err(CompileError::ChildrenNotAllowed {
                node_id: node.id(),
                kind: node.kind(),
            });
        }
        if let Some(max) = definition.max_children {
            if children > max {
                return Err(CompileError::TooManyChildren {
                    node_id: node.id(),
                    children,
                    max,
                });
            }
        }
    }
    Ok(())
}

/// Iterative three-colour depth-first search; reaching an in-progress node is a back edge.
fn check_acyclic(graph: &ProgramGraph) -> Result<(), CompileError> {
    let mut successors: AHashMap<NodeId, Vec<NodeId>> = AHashMap::new();
    for edge in graph.edges() {
        successors.entry(edge.source).or_default().push(edge.target);
    }

    let mut marks: AHashMap<NodeId, Mark> =
        graph.nodes().map(|n| (n.id(), Mark::Unvisited)).collect();

    for start in graph.nodes().map(|n| n.id()) {
        if marks.get(&start) != Some(&Mark::Unvisited) {
            continue;
        }
        marks.insert(start, Mark::InProgress);
        let mut stack: Vec<(NodeId, usize)> = vec![(start, 0)];

        while let Some((node, next_index)) = stack.last_mut() {
            let node = *node;
            let next = successors
                .get(&node)
                .and_then(|targets| targets.get(*next_index))
                .copied();
            *next_index += 1;

            match next {
                Some(target) => match marks.get(&target).copied().unwrap_or(Mark::Done) {
                    Mark::InProgress => {
                        return Err(CompileError::CyclicReference { node_id: target });
                    }
                    Mark::Unvisited => {
                        marks.insert(target, Mark::InProgress);
                        stack.push((target, 0));
                    }
                    Mark::Done => {}
                },
                None => {
                    marks.insert(node, Mark::Done);
                    stack.pop();
                }
            }
        }
    }
    Ok(())
}
