//! Runtime values stored in a [`ParameterSet`](crate::params::ParameterSet).
//!
//! Why this exists:
//! - The schema is a closed set of value kinds, so we model runtime values as
//!   a single tagged enum rather than ad-hoc `serde_json::Value` plumbing.
//! - "Default is decided later" is a real state, not a missing entry: the
//!   explicit [`Value::Auto`] sentinel keeps deferred resolution visible in
//!   the type system and impossible to confuse with "unset".

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, Serializer};

/// A concrete (or deferred) parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
    /// A sequence of decoder token ids (e.g. an initial prompt).
    Tokens(Vec<i64>),
    /// A nested sub-configuration group (e.g. `greedy`, `beam_search`).
    Group(BTreeMap<String, Value>),
    /// Deferred default, resolved from runtime context immediately before the
    /// finished set is handed to the consumer.
    Auto,
}

impl Value {
    /// Convert to a `serde_json::Value`. The auto-sentinel maps to `null`,
    /// which the validator maps back to the declared (deferred) default, so
    /// a validated set round-trips through its own JSON form.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Integer(v) => serde_json::Value::from(*v),
            Value::Float(v) => serde_json::Value::from(*v),
            Value::Boolean(v) => serde_json::Value::from(*v),
            Value::Text(v) => serde_json::Value::from(v.clone()),
            Value::Tokens(v) => serde_json::Value::from(v.clone()),
            Value::Group(fields) => {
                let mut map = serde_json::Map::new();
                for (name, value) in fields {
                    map.insert(name.clone(), value.to_json());
                }
                serde_json::Value::Object(map)
            }
            Value::Auto => serde_json::Value::Null,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_tokens(&self) -> Option<&[i64]> {
        match self {
            Value::Tokens(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Group(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Value::Auto)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// The runtime kind of a raw JSON value, used in `TypeMismatch` messages so
/// callers see what they actually supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Float,
    Boolean,
    Text,
    Array,
    Object,
    Null,
}

impl ValueKind {
    /// Classify a raw JSON value.
    ///
    /// Numbers without an exact `i64` representation classify as floats;
    /// whether a float is acceptable where an integer is declared (it is
    /// not) is the validator's decision, not the classifier's.
    pub fn of(raw: &serde_json::Value) -> Self {
        match raw {
            serde_json::Value::Null => ValueKind::Null,
            serde_json::Value::Bool(_) => ValueKind::Boolean,
            serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => ValueKind::Integer,
            serde_json::Value::Number(_) => ValueKind::Float,
            serde_json::Value::String(_) => ValueKind::Text,
            serde_json::Value::Array(_) => ValueKind::Array,
            serde_json::Value::Object(_) => ValueKind::Object,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Boolean => "boolean",
            ValueKind::Text => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
            ValueKind::Null => "null",
        };
        f.write_str(name)
    }
}
