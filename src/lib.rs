//! `whisper-params` — schema-driven validation and defaulting for Whisper
//! inference parameters.
//!
//! This crate provides:
//! - An immutable, process-wide registry of every recognized parameter
//! - A pure validator mapping a raw partial configuration to a complete,
//!   type-checked [`ParameterSet`] or a descriptive error
//! - Decoding-strategy selection (greedy vs. beam search) and pre-dispatch
//!   normalization of deferred and sentinel values
//!
//! The crate ends at the handoff: model loading, audio, and the native
//! inference engine are the consumer's concern. See [`sink::ParamsSink`].

// High-level API (most consumers should start here).
pub mod sink;
pub mod validate;

// Schema declarations and runtime values.
pub mod registry;
pub mod value;

// The finished configuration and its strategy selection.
pub mod params;
pub mod strategy;

// Errors shared across the crate.
pub mod error;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

pub use error::{Error, Result};
pub use params::ParameterSet;
pub use registry::{ParamKind, ParamSpec, Registry};
pub use sink::{ParamsSink, configure};
pub use strategy::{DecodingStrategy, LANGUAGE_AUTO, resolve};
pub use validate::validate;
pub use value::{Value, ValueKind};
