use std::error::Error as StdError;

use thiserror::Error;

use crate::registry::ParamKind;
use crate::value::{Value, ValueKind};

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-wide error type.
///
/// The three validation variants are the complete failure surface of
/// `validate`: they are detected before any inference work begins and are
/// surfaced to the caller verbatim. `Message`/`Other` exist so downstream
/// code (sinks, adapters) can report their own failures without being forced
/// to adopt `anyhow` in their public APIs.
#[derive(Debug, Error)]
pub enum Error {
    /// The raw configuration contained a key that is not in the schema
    /// registry. Unknown keys are never silently dropped or accepted.
    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),

    /// A supplied value's runtime kind does not match the declared kind.
    #[error("parameter `{name}` expects {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: ParamKind,
        actual: ValueKind,
    },

    /// A supplied value is outside the parameter's finite allowed set.
    #[error("invalid value for `{name}`: {value} (allowed: {allowed})")]
    InvalidOption {
        name: String,
        value: Value,
        allowed: AllowedSet,
    },

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

/// The allowed set carried by an `InvalidOption` error, displayed as a
/// comma-separated list in the error message.
#[derive(Debug, Clone, Copy)]
pub struct AllowedSet(pub &'static [Value]);

impl std::fmt::Display for AllowedSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_render_name_and_detail() {
        let err = Error::UnknownParameter("n_thread".to_string());
        assert_eq!(err.to_string(), "unknown parameter `n_thread`");

        let err = Error::TypeMismatch {
            name: "temperature".to_string(),
            expected: ParamKind::Float,
            actual: ValueKind::Text,
        };
        assert_eq!(
            err.to_string(),
            "parameter `temperature` expects float, got string"
        );

        static ALLOWED: [Value; 2] = [Value::Integer(0), Value::Integer(1)];
        let err = Error::InvalidOption {
            name: "strategy".to_string(),
            value: Value::Integer(2),
            allowed: AllowedSet(&ALLOWED),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for `strategy`: 2 (allowed: 0, 1)"
        );
    }
}
