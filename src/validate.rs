//! Validation and coercion of raw configurations.
//!
//! `validate` is a pure function from a raw, partially-specified JSON mapping
//! to either a complete [`ParameterSet`] or a descriptive error. It is
//! all-or-nothing: one bad field invalidates the whole configuration, and no
//! partially-applied set is ever returned.
//!
//! Coercion rules (the full list — everything else is strict):
//! - integer parameters accept only JSON numbers with an exact `i64`
//!   representation
//! - float parameters accept any JSON number (integer literals widen)
//! - a JSON `null` selects the parameter's declared default, exactly as if
//!   the key were absent; for `language`, `null` is instead the documented
//!   auto-detect request and folds to the empty sentinel form, which
//!   [`resolve`](crate::strategy::resolve) normalizes

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::error::{AllowedSet, Error, Result};
use crate::params::ParameterSet;
use crate::registry::{FieldSpec, LANGUAGE, ParamKind, ParamSpec, Registry};
use crate::value::{Value, ValueKind};

/// Validate a raw configuration against the schema registry.
///
/// For every key in `raw`: the key must be registered (otherwise
/// [`Error::UnknownParameter`]), its value must match the declared kind
/// (otherwise [`Error::TypeMismatch`]), and it must be a member of the
/// declared allowed set if one exists (otherwise [`Error::InvalidOption`]).
/// Registered names absent from `raw` take their declared defaults, with
/// deferred defaults represented as the explicit auto-sentinel.
pub fn validate(raw: &serde_json::Map<String, serde_json::Value>) -> Result<ParameterSet> {
    let registry = Registry::global();

    // Reject unknown keys before anything else. The engine never silently
    // drops or accepts a key it does not recognize.
    for key in raw.keys() {
        if registry.lookup(key).is_none() {
            return Err(Error::UnknownParameter(key.clone()));
        }
    }

    let mut values = HashMap::with_capacity(registry.len());
    for spec in registry.specs() {
        let value = match raw.get(spec.name) {
            Some(json) => {
                log_informational_flags(spec);
                checked_value(spec, json)?
            }
            None => spec.default.clone(),
        };
        values.insert(spec.name, value);
    }

    Ok(ParameterSet::from_values(values))
}

fn log_informational_flags(spec: &ParamSpec) {
    // Informational only; these parameters are accepted, never rejected.
    if spec.not_implemented {
        tracing::warn!(
            parameter = spec.name,
            "parameter is accepted but the engine ignores it"
        );
    } else if spec.experimental {
        tracing::debug!(parameter = spec.name, "experimental parameter supplied");
    }
}

/// Check one raw value against its spec: kind, then allowed set.
fn checked_value(spec: &ParamSpec, raw: &serde_json::Value) -> Result<Value> {
    if raw.is_null() {
        // Null selects the declared default, except for `language` where it
        // is the auto-detect request (set to null, "" or "auto").
        if spec.name == LANGUAGE {
            return Ok(Value::Text(String::new()));
        }
        return Ok(spec.default.clone());
    }

    let value = coerce(spec.name, spec.kind, raw)?;

    if let Some(allowed) = spec.allowed {
        if !allowed.contains(&value) {
            return Err(Error::InvalidOption {
                name: spec.name.to_string(),
                value,
                allowed: AllowedSet(allowed),
            });
        }
    }

    Ok(value)
}

/// Coerce a non-null raw JSON value into a typed [`Value`] of the declared
/// kind, or fail with a `TypeMismatch` naming the offending scope.
fn coerce(name: &str, kind: ParamKind, raw: &serde_json::Value) -> Result<Value> {
    let mismatch = || Error::TypeMismatch {
        name: name.to_string(),
        expected: kind,
        actual: ValueKind::of(raw),
    };

    match kind {
        ParamKind::Integer => raw.as_i64().map(Value::Integer).ok_or_else(mismatch),
        ParamKind::Float => raw.as_f64().map(Value::Float).ok_or_else(mismatch),
        ParamKind::Boolean => raw.as_bool().map(Value::Boolean).ok_or_else(mismatch),
        ParamKind::Text => raw
            .as_str()
            .map(|s| Value::Text(s.to_string()))
            .ok_or_else(mismatch),
        ParamKind::TokenSequence => {
            let items = raw.as_array().ok_or_else(mismatch)?;
            let mut tokens = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let token = item.as_i64().ok_or_else(|| Error::TypeMismatch {
                    name: format!("{name}[{i}]"),
                    expected: ParamKind::Integer,
                    actual: ValueKind::of(item),
                })?;
                tokens.push(token);
            }
            Ok(Value::Tokens(tokens))
        }
        ParamKind::Group(fields) => {
            let object = raw.as_object().ok_or_else(mismatch)?;
            coerce_group(name, fields, object)
        }
    }
}

/// Validate a sub-configuration group against its mini-schema, with the same
/// rules as top-level parameters and dotted scopes in error messages.
fn coerce_group(
    group: &str,
    fields: &'static [FieldSpec],
    raw: &serde_json::Map<String, serde_json::Value>,
) -> Result<Value> {
    for key in raw.keys() {
        if !fields.iter().any(|field| field.name == key) {
            return Err(Error::UnknownParameter(format!("{group}.{key}")));
        }
    }

    let defaults = group_defaults(group)?;
    let mut values = BTreeMap::new();
    for field in fields {
        let value = match raw.get(field.name) {
            Some(json) if !json.is_null() => {
                coerce(&format!("{group}.{}", field.name), field.kind, json)?
            }
            // Absent or null fields keep the group default.
            _ => defaults
                .get(field.name)
                .cloned()
                .ok_or_else(|| Error::msg(format!("no default for field `{group}.{}`", field.name)))?,
        };
        values.insert(field.name.to_string(), value);
    }

    Ok(Value::Group(values))
}

fn group_defaults(group: &str) -> Result<&'static BTreeMap<String, Value>> {
    Registry::global()
        .lookup(group)
        .and_then(|spec| spec.default.as_group())
        .ok_or_else(|| Error::msg(format!("registry default for `{group}` is not a group")))
}
