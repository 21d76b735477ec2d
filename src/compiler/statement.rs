use crate::catalog::BlockKind;
use crate::value::ParamValue;
use itertools::Itertools;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt::Write;

/// One node of the compiled command tree.
///
/// Serializes to `{ "name": <kind>, <param>: <scalar>..., "body"?: [...] }`, the shape the
/// flight-plan encoder consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStatement {
    pub name: BlockKind,
    /// Resolved parameters in catalog order. Unset parameters are absent.
    pub fields: Vec<(&'static str, ParamValue)>,
    /// Nested statements. `None` rather than an empty list when there are none.
    pub body: Option<Vec<CompiledStatement>>,
}

impl CompiledStatement {
    pub fn field(&self, name: &str) -> Option<&ParamValue> {
        self.fields.iter().find(|(k, _)| *k == name).map(|(_, v)| v)
    }

    pub fn body(&self) -> &[CompiledStatement] {
        self.body.as_deref().unwrap_or_default()
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

struct Scalar<'a>(&'a ParamValue);

impl Serialize for Scalar<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize_scalar(serializer)
    }
}

impl Serialize for CompiledStatement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1 + self.fields.len() + usize::from(self.body.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("name", self.name.as_str())?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, &Scalar(value))?;
        }
        if let Some(body) = &self.body {
            map.serialize_entry("body", body)?;
        }
        map.end()
    }
}

/// Converts a compiled program into a JSON array.
pub fn program_to_json(program: &[CompiledStatement]) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(program)
}

/// Renders a compiled program as an indented text tree, one statement per line.
pub fn render_program(program: &[CompiledStatement]) -> String {
    let mut out = String::new();
    render_into(&mut out, program, 0);
    out
}

fn render_into(out: &mut String, statements: &[CompiledStatement], depth: usize) {
    for statement in statements {
        let fields = statement
            .fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .join(" ");
        let _ = write!(out, "{:indent$}{}", "", statement.name, indent = depth * 2);
        if !fields.is_empty() {
            let _ = write!(out, " {}", fields);
        }
        out.push('\n');
        render_into(out, statement.body(), depth + 1);
    }
}
