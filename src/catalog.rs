use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of command blocks an operator can place on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockKind {
    #[serde(rename = "if")]
    If,
    #[serde(rename = "ifelse")]
    IfElse,
    #[serde(rename = "wait-sec")]
    WaitSec,
    #[serde(rename = "repeat-n")]
    RepeatN,
    #[serde(rename = "gpio-write")]
    GpioWrite,
    #[serde(rename = "capture-image")]
    CaptureImage,
}

impl BlockKind {
    /// Every block kind, in palette order.
    pub const ALL: [BlockKind; 6] = [
        BlockKind::If,
        BlockKind::IfElse,
        BlockKind::WaitSec,
        BlockKind::RepeatN,
        BlockKind::GpioWrite,
        BlockKind::CaptureImage,
    ];

    /// The identifier used on the wire and in canvas documents.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::If => "if",
            BlockKind::IfElse => "ifelse",
            BlockKind::WaitSec => "wait-sec",
            BlockKind::RepeatN => "repeat-n",
            BlockKind::GpioWrite => "gpio-write",
            BlockKind::CaptureImage => "capture-image",
        }
    }

    /// Shorthand for `definition_of(self)`.
    pub fn definition(self) -> &'static BlockTypeDefinition {
        definition_of(self)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownBlockKind(s.to_string()))
    }
}

/// The scalar type a block parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    Number,
    Text,
    Boolean,
}

/// A named, typed field of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    pub required: bool,
}

/// Catalog entry describing the shape and structural capabilities of a block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTypeDefinition {
    pub kind: BlockKind,
    pub parameters: &'static [ParameterSpec],
    pub can_have_children: bool,
    /// Upper bound on hierarchical children. `None` means unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_children: Option<usize>,
}

impl BlockTypeDefinition {
    /// Looks up a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&'static ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Whether another hierarchical child fits under a node holding `child_count` children.
    pub fn accepts_child(&self, child_count: usize) -> bool {
        self.can_have_children && self.max_children.is_none_or(|max| child_count < max)
    }
}

const fn param(name: &'static str, param_type: ParameterType, required: bool) -> ParameterSpec {
    ParameterSpec {
        name,
        param_type,
        required,
    }
}

const CONDITION: &[ParameterSpec] = &[param("condition", ParameterType::Text, true)];

static CATALOG: [BlockTypeDefinition; 6] = [
    BlockTypeDefinition {
        kind: BlockKind::If,
        parameters: CONDITION,
        can_have_children: true,
        max_children: Some(1),
    },
    BlockTypeDefinition {
        kind: BlockKind::IfElse,
        parameters: CONDITION,
        can_have_children: true,
        max_children: Some(2),
    },
    BlockTypeDefinition {
        kind: BlockKind::WaitSec,
        parameters: &[param("duration", ParameterType::Number, true)],
        can_have_children: false,
        max_children: None,
    },
    BlockTypeDefinition {
        kind: BlockKind::RepeatN,
        parameters: &[param("count", ParameterType::Number, true)],
        can_have_children: true,
        max_children: None,
    },
    BlockTypeDefinition {
        kind: BlockKind::GpioWrite,
        parameters: &[
            param("pin", ParameterType::Number, true),
            param("value", ParameterType::Number, true),
        ],
        can_have_children: false,
        max_children: None,
    },
    BlockTypeDefinition {
        kind: BlockKind::CaptureImage,
        parameters: &[
            param("camera", ParameterType::Text, false),
            param("exposure", ParameterType::Number, false),
            param("compress", ParameterType::Boolean, false),
        ],
        can_have_children: false,
        max_children: None,
    },
];

/// Returns the catalog entry for `kind`.
pub fn definition_of(kind: BlockKind) -> &'static BlockTypeDefinition {
    // CATALOG is laid out in declaration order of `BlockKind`.
    &CATALOG[kind as usize]
}

/// Every catalog entry, in palette order.
pub fn list_block_kinds() -> &'static [BlockTypeDefinition] {
    &CATALOG
}
