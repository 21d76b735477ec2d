//! Unit tests for the catalog, values and error messages.
mod common;
use blockplan::prelude::*;

#[test]
fn test_catalog_lists_every_kind_once() {
    let kinds: Vec<BlockKind> = list_block_kinds().iter().map(|d| d.kind).collect();
    assert_eq!(kinds, BlockKind::ALL.to_vec());
    for kind in BlockKind::ALL {
        assert_eq!(definition_of(kind).kind, kind);
    }
}

#[test]
fn test_catalog_structure() {
    let if_block = definition_of(BlockKind::If);
    assert!(if_block.can_have_children);
    assert_eq!(if_block.max_children, Some(1));
    assert!(if_block.accepts_child(0));
    assert!(!if_block.accepts_child(1));

    let repeat = definition_of(BlockKind::RepeatN);
    assert_eq!(repeat.max_children, None);
    assert!(repeat.accepts_child(1000));

    let wait = definition_of(BlockKind::WaitSec);
    assert!(!wait.can_have_children);
    assert!(!wait.accepts_child(0));
    let duration = wait.parameter("duration").unwrap();
    assert_eq!(duration.param_type, ParameterType::Number);
    assert!(duration.required);
}

#[test]
fn test_block_kind_parsing() {
    for kind in BlockKind::ALL {
        assert_eq!(kind.to_string().parse::<BlockKind>(), Ok(kind));
    }
    assert_eq!("ifelse".parse::<BlockKind>(), Ok(BlockKind::IfElse));
    assert_eq!(
        "if-else".parse::<BlockKind>(),
        Err(CatalogError::UnknownBlockKind("if-else".to_string()))
    );
}

#[test]
fn test_catalog_serializes_for_palette() {
    let json = serde_json::to_value(definition_of(BlockKind::GpioWrite)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "kind": "gpio-write",
            "parameters": [
                { "name": "pin", "type": "number", "required": true },
                { "name": "value", "type": "number", "required": true }
            ],
            "canHaveChildren": false
        })
    );
}

#[test]
fn test_value_display() {
    assert_eq!(format!("{}", ParamValue::Number(42.0)), "42");
    assert_eq!(format!("{}", ParamValue::Number(0.5)), "0.5");
    assert_eq!(format!("{}", ParamValue::Bool(true)), "true");
    assert_eq!(format!("{}", ParamValue::from("nadir")), "\"nadir\"");
}

#[test]
fn test_value_unset_and_coercion() {
    assert!(ParamValue::from("").is_unset());
    assert!(ParamValue::from("   ").is_unset());
    assert!(!ParamValue::Number(0.0).is_unset());
    assert!(!ParamValue::Bool(false).is_unset());

    assert_eq!(ParamValue::from("7").as_number(), Some(7.0));
    assert_eq!(ParamValue::from("abc").as_number(), None);
    assert_eq!(ParamValue::from("inf").as_number(), None);
    assert_eq!(ParamValue::Bool(true).as_number(), Some(1.0));
    assert_eq!(ParamValue::Number(f64::NAN).as_number(), None);
    assert_eq!(ParamValue::Number(f64::INFINITY).as_number(), None);
}

#[test]
fn test_id_display() {
    assert_eq!(NodeId(3).to_string(), "#3");
    assert_eq!(EdgeId(4).to_string(), "e4");
    assert_eq!(SourceHandle::Sequential.to_string(), "out");
    assert_eq!(SourceHandle::Hierarchical.to_string(), "child");
    assert_eq!(TargetHandle::In.as_str(), "in");
}

#[test]
fn test_error_display() {
    let err = CompileError::MissingRequiredInput {
        node_id: NodeId(2),
        parameter: "pin".to_string(),
    };
    assert!(err.to_string().contains("#2"));
    assert!(err.to_string().contains("pin"));
    assert_eq!(err.node_id(), NodeId(2));

    let rejected = ConnectionRejected::ChildLimitReached {
        source_id: NodeId(1),
        max: 1,
    };
    assert!(rejected.to_string().contains("maximum of 1"));

    let graph_err = GraphError::UnknownParameter {
        node_id: NodeId(0),
        kind: BlockKind::WaitSec,
        name: "pin".to_string(),
    };
    assert!(graph_err.to_string().contains("wait-sec"));
}
