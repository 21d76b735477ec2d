//! Common test utilities for building program graphs and canvas documents.
use blockplan::prelude::*;

/// Installs a test-writer subscriber so `RUST_LOG=debug cargo test` shows graph logs.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A `wait-sec` node with the given duration.
#[allow(dead_code)]
pub fn add_wait(graph: &mut ProgramGraph, duration: impl Into<ParamValue>) -> NodeId {
    let id = graph.add_node(BlockKind::WaitSec);
    graph.set_parameter_value(id, "duration", duration).unwrap();
    id
}

/// A `gpio-write` node for `pin` and `value`.
#[allow(dead_code)]
pub fn add_gpio_write(graph: &mut ProgramGraph, pin: i64, value: i64) -> NodeId {
    let id = graph.add_node(BlockKind::GpioWrite);
    graph.set_parameter_value(id, "pin", pin).unwrap();
    graph.set_parameter_value(id, "value", value).unwrap();
    id
}

/// A `repeat-n` node with the given count.
#[allow(dead_code)]
pub fn add_repeat(graph: &mut ProgramGraph, count: i64) -> NodeId {
    let id = graph.add_node(BlockKind::RepeatN);
    graph.set_parameter_value(id, "count", count).unwrap();
    id
}

/// An `if` node with the given condition.
#[allow(dead_code)]
pub fn add_if(graph: &mut ProgramGraph, condition: &str) -> NodeId {
    let id = graph.add_node(BlockKind::If);
    graph.set_parameter_value(id, "condition", condition).unwrap();
    id
}

/// Builds: repeat-n(count=3) { gpio-write(pin=8, value=1) -> wait-sec(duration=2) }
///
/// Returns the graph and the ids of the three nodes in creation order.
#[allow(dead_code)]
pub fn create_loop_graph() -> (ProgramGraph, [NodeId; 3]) {
    let mut graph = ProgramGraph::new();
    let repeat = add_repeat(&mut graph, 3);
    let write = add_gpio_write(&mut graph, 8, 1);
    let wait = add_wait(&mut graph, 2);
    graph
        .connect(repeat, SourceHandle::Hierarchical, write)
        .unwrap();
    graph.connect(write, SourceHandle::Sequential, wait).unwrap();
    (graph, [repeat, write, wait])
}

/// Canvas export of the loop graph, with form values stored as text the way the UI
/// emits them.
#[allow(dead_code)]
pub const LOOP_CANVAS_JSON: &str = r#"{
    "nodes": [
        { "id": "loop", "type": "repeat-n", "position": { "x": 0, "y": 0 },
          "data": { "values": { "count": "3" } } },
        { "id": "pulse", "type": "gpio-write",
          "data": { "values": { "pin": "8", "value": 1 } } },
        { "id": "pause", "type": "wait-sec",
          "data": { "values": { "duration": 2 } } },
        { "id": "snap", "type": "capture-image",
          "data": { "values": { "camera": "nadir", "exposure": "", "compress": true } } }
    ],
    "edges": [
        { "id": "e1", "source": "loop", "sourceHandle": "child", "target": "pulse", "targetHandle": "in" },
        { "id": "e2", "source": "pulse", "sourceHandle": "out", "target": "pause", "targetHandle": "in" },
        { "id": "e3", "source": "loop", "sourceHandle": "out", "target": "snap", "targetHandle": "in" }
    ]
}"#;

/// Canvas export with a two-node sequential cycle.
#[allow(dead_code)]
pub const CYCLIC_CANVAS_JSON: &str = r#"{
    "nodes": [
        { "id": "a", "type": "wait-sec", "data": { "values": { "duration": 1 } } },
        { "id": "b", "type": "wait-sec", "data": { "values": { "duration": 2 } } }
    ],
    "edges": [
        { "id": "ab", "source": "a", "sourceHandle": "out", "target": "b", "targetHandle": "in" },
        { "id": "ba", "source": "b", "sourceHandle": "out", "target": "a", "targetHandle": "in" }
    ]
}"#;
