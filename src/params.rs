//! The complete, validated configuration for one inference run.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::registry::Registry;
use crate::value::Value;

/// A total, type-consistent mapping from every registered parameter name to
/// a concrete value.
///
/// Invariants (upheld by construction — only the validator builds one, and
/// there are no public mutators):
/// - every registered name has a value
/// - every value matches its spec's declared kind
///
/// A `ParameterSet` is created per run, resolved once, handed to the
/// consumer, then discarded. It is never cached or shared across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    values: HashMap<&'static str, Value>,
}

impl ParameterSet {
    pub(crate) fn from_values(values: HashMap<&'static str, Value>) -> Self {
        Self { values }
    }

    /// Read a parameter's value.
    ///
    /// Returns `None` only for names that were never registered; every
    /// registered name is guaranteed present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_integer)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_boolean)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_text)
    }

    pub fn tokens(&self, name: &str) -> Option<&[i64]> {
        self.get(name).and_then(Value::as_tokens)
    }

    /// Read one field of a sub-configuration group.
    pub fn group_field(&self, group: &str, field: &str) -> Option<&Value> {
        self.get(group).and_then(Value::as_group)?.get(field)
    }

    /// Whether a parameter still holds the deferred auto-sentinel.
    pub fn is_auto(&self, name: &str) -> bool {
        self.get(name).is_some_and(Value::is_auto)
    }

    pub(crate) fn set(&mut self, name: &'static str, value: Value) {
        self.values.insert(name, value);
    }

    /// Convert back to a raw JSON mapping.
    ///
    /// Validating the result reproduces this set exactly: concrete values
    /// map to their JSON forms and the auto-sentinel maps to `null`, which
    /// validation maps back to the deferred default.
    pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        for name in Registry::global().all_names() {
            if let Some(value) = self.values.get(name) {
                map.insert(name.to_string(), value.to_json());
            }
        }
        map
    }
}

impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for name in Registry::global().all_names() {
            if let Some(value) = self.values.get(name) {
                map.serialize_entry(name, value)?;
            }
        }
        map.end()
    }
}
