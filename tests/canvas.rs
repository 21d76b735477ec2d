//! End-to-end tests: canvas document import through compilation.
mod common;
use blockplan::prelude::*;
use common::*;
use serde_json::json;

#[test]
fn test_canvas_import_and_compile() {
    init_tracing();
    let imported = CanvasDocument::from_json(LOOP_CANVAS_JSON)
        .unwrap()
        .into_graph(ImportMode::Validated)
        .unwrap();

    assert_eq!(imported.graph.node_count(), 4);
    assert_eq!(imported.graph.edge_count(), 3);

    let program = compile(&imported.graph).unwrap();
    assert_eq!(
        program_to_json(&program).unwrap(),
        json!([
            {
                "name": "repeat-n",
                "count": 3,
                "body": [
                    { "name": "gpio-write", "pin": 8, "value": 1 },
                    { "name": "wait-sec", "duration": 2 }
                ]
            },
            { "name": "capture-image", "camera": "nadir", "compress": true }
        ])
    );
}

#[test]
fn test_canvas_ids_are_kept() {
    let imported = CanvasDocument::from_json(LOOP_CANVAS_JSON)
        .unwrap()
        .into_graph(ImportMode::Validated)
        .unwrap();

    let pulse = imported.node_for("pulse").unwrap();
    assert_eq!(imported.canvas_id(pulse), Some("pulse"));
    assert_eq!(
        imported.graph.node(pulse).unwrap().kind(),
        BlockKind::GpioWrite
    );
    assert!(imported.node_for("missing").is_none());
}

#[test]
fn test_validated_import_rejects_cycle() {
    let result = CanvasDocument::from_json(CYCLIC_CANVAS_JSON)
        .unwrap()
        .into_graph(ImportMode::Validated);

    match result {
        Err(ImportError::Rejected { edge, source }) => {
            assert_eq!(edge, "ba");
            assert!(matches!(source, ConnectionRejected::WouldCreateCycle { .. }));
        }
        other => panic!("Expected a rejected edge, got {:?}", other),
    }
}

#[test]
fn test_restore_import_reports_cycle_at_compile_time() {
    let imported = CanvasDocument::from_json(CYCLIC_CANVAS_JSON)
        .unwrap()
        .into_graph(ImportMode::Restore)
        .unwrap();
    assert_eq!(imported.graph.edge_count(), 2);

    let err = compile(&imported.graph).unwrap_err();
    assert!(matches!(err, CompileError::CyclicReference { .. }));
    assert!(imported.describe(&err).contains("canvas node 'a'"));
}

#[test]
fn test_unknown_block_type_fails_import() {
    let json = r#"{ "nodes": [ { "id": "x", "type": "self-destruct" } ] }"#;
    let result = CanvasDocument::from_json(json)
        .unwrap()
        .into_graph(ImportMode::Validated);

    match result {
        Err(ImportError::InvalidBlockKind { node, source }) => {
            assert_eq!(node, "x");
            assert_eq!(
                source,
                CatalogError::UnknownBlockKind("self-destruct".to_string())
            );
        }
        other => panic!("Expected InvalidBlockKind, got {:?}", other),
    }
}

#[test]
fn test_unknown_handle_fails_import() {
    let json = r#"{
        "nodes": [
            { "id": "a", "type": "wait-sec" },
            { "id": "b", "type": "wait-sec" }
        ],
        "edges": [ { "source": "a", "sourceHandle": "sideways", "target": "b" } ]
    }"#;
    let result = CanvasDocument::from_json(json)
        .unwrap()
        .into_graph(ImportMode::Validated);

    assert!(matches!(
        result,
        Err(ImportError::InvalidHandle { ref edge, ref handle }) if edge == "#0" && handle == "sideways"
    ));
}

#[test]
fn test_edge_to_unknown_node_fails_import() {
    let json = r#"{
        "nodes": [ { "id": "a", "type": "wait-sec" } ],
        "edges": [ { "id": "e", "source": "a", "sourceHandle": "out", "target": "ghost" } ]
    }"#;
    let result = CanvasDocument::from_json(json)
        .unwrap()
        .into_graph(ImportMode::Restore);

    assert!(matches!(
        result,
        Err(ImportError::NodeNotFound { ref node, .. }) if node == "ghost"
    ));
}

#[test]
fn test_duplicate_node_ids_fail_import() {
    let json = r#"{ "nodes": [
        { "id": "a", "type": "wait-sec" },
        { "id": "a", "type": "gpio-write" }
    ] }"#;
    let result = CanvasDocument::from_json(json)
        .unwrap()
        .into_graph(ImportMode::Validated);

    assert!(matches!(result, Err(ImportError::DuplicateNode(ref id)) if id == "a"));
}

#[test]
fn test_null_values_are_unset() {
    let json = r#"{ "nodes": [
        { "id": "w", "type": "wait-sec", "data": { "values": { "duration": null } } }
    ] }"#;
    let imported = CanvasDocument::from_json(json)
        .unwrap()
        .into_graph(ImportMode::Validated)
        .unwrap();

    let program = compile(&imported.graph).unwrap();
    assert_eq!(program_to_json(&program).unwrap(), json!([{ "name": "wait-sec" }]));
}

#[test]
fn test_nested_value_fails_import() {
    let json = r#"{ "nodes": [
        { "id": "w", "type": "wait-sec", "data": { "values": { "duration": [1, 2] } } }
    ] }"#;
    let result = CanvasDocument::from_json(json)
        .unwrap()
        .into_graph(ImportMode::Validated);

    assert!(matches!(result, Err(ImportError::InvalidValue { .. })));
}

#[test]
fn test_malformed_json_fails() {
    assert!(matches!(
        CanvasDocument::from_json("{ not json"),
        Err(ImportError::JsonParseError(_))
    ));
}
