use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A scalar parameter value as entered by the operator.
///
/// Values are stored verbatim; a text field may hold `"5"` for a numeric parameter and is
/// only coerced when the graph is compiled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl ParamValue {
    /// An unset value is one the form left blank. Numbers and booleans are always set.
    pub fn is_unset(&self) -> bool {
        matches!(self, ParamValue::Text(s) if s.trim().is_empty())
    }

    /// Attempts to read the value as a finite number, parsing text when necessary.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Text(s) => s.trim().parse::<f64>().ok(),
            ParamValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        }
        .filter(|n| n.is_finite())
    }

    /// Converts a JSON scalar into a parameter value. `null` yields `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Option<Self>> {
        match value {
            serde_json::Value::Null => Some(None),
            serde_json::Value::Bool(b) => Some(Some(ParamValue::Bool(*b))),
            serde_json::Value::Number(n) => n.as_f64().map(|n| Some(ParamValue::Number(n))),
            serde_json::Value::String(s) => Some(Some(ParamValue::Text(s.clone()))),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }

    /// Serializes the bare scalar, writing integral numbers as integers.
    pub(crate) fn serialize_scalar<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::Number(n) if is_integral(*n) => serializer.serialize_i64(*n as i64),
            ParamValue::Number(n) => serializer.serialize_f64(*n),
            ParamValue::Text(s) => serializer.serialize_str(s),
            ParamValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

fn is_integral(n: f64) -> bool {
    n.fract() == 0.0 && n.abs() < i64::MAX as f64
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Number(n)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Number(f64::from(n))
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Number(n as f64)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(n) => {
                if is_integral(*n) {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            ParamValue::Text(s) => write!(f, "{:?}", s),
            ParamValue::Bool(b) => write!(f, "{}", b),
        }
    }
}
