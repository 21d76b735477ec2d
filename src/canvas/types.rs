use crate::error::ImportError;
use serde::Deserialize;

/// Values entered in a block's form, keyed by parameter name.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CanvasNodeData {
    #[serde(default)]
    pub values: serde_json::Map<String, serde_json::Value>,
}

/// A block placed on the canvas. Position and styling fields are ignored.
#[derive(Debug, Deserialize, Clone)]
pub struct CanvasNode {
    pub id: String,
    #[serde(rename = "type", alias = "blockType", alias = "kind")]
    pub block_type: String,
    #[serde(default)]
    pub data: CanvasNodeData,
}

/// A connection drawn between two blocks.
#[derive(Debug, Deserialize, Clone)]
pub struct CanvasEdge {
    #[serde(default)]
    pub id: String,
    pub source: String,
    #[serde(alias = "sourceHandle")]
    pub source_handle: String,
    pub target: String,
    #[serde(default = "default_target_handle", alias = "targetHandle")]
    pub target_handle: String,
}

fn default_target_handle() -> String {
    "in".to_string()
}

/// The authoring canvas export: blocks in creation order plus their connections.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CanvasDocument {
    pub nodes: Vec<CanvasNode>,
    #[serde(default)]
    pub edges: Vec<CanvasEdge>,
}

impl CanvasDocument {
    pub fn from_json(json: &str) -> Result<Self, ImportError> {
        serde_json::from_str(json).map_err(|e| ImportError::JsonParseError(e.to_string()))
    }
}
