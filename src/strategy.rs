//! Decoding-strategy selection and pre-dispatch normalization.
//!
//! Why this exists:
//! - The `greedy` and `beam_search` groups are mutually exclusive, keyed by
//!   the `strategy` field. Modeling the active one as a discriminated union
//!   makes "both active" and "neither active" unrepresentable.
//! - The three language auto-detect request forms (a null value, `""`, the
//!   literal `"auto"`) must fold into one canonical representation, so
//!   consumers branch on a single value. This folding is the only place
//!   outside strict schema checking where distinct inputs are unified.

use serde::Serialize;

use crate::params::ParameterSet;
use crate::registry::{
    BEAM_SEARCH, BEAM_SIZE, BEST_OF, GREEDY, LANGUAGE, N_THREADS, PATIENCE, STRATEGY,
    STRATEGY_BEAM_SEARCH,
};
use crate::value::Value;

/// The canonical language value meaning "detect the spoken language".
pub const LANGUAGE_AUTO: &str = "auto";

/// Upper bound for the auto-resolved thread count, matching whisper.cpp's
/// own default of `min(4, hardware_concurrency)`.
const MAX_AUTO_THREADS: i64 = 4;

/// The search algorithm used to pick the output token sequence.
///
/// Derived from a [`ParameterSet`], never stored independently: exactly one
/// variant is active per set, selected by the `strategy` field. The inactive
/// group's stored values are retained but inert — consumers must ignore them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum DecodingStrategy {
    /// Pick the best token at each step.
    Greedy { best_of: i64 },
    /// Track multiple candidate sequences.
    BeamSearch { beam_size: i64, patience: f64 },
}

impl ParameterSet {
    /// The active decoding strategy for this set.
    ///
    /// The fallbacks mirror the registry's group defaults; they are
    /// unreachable for any set produced by `validate`, which guarantees both
    /// groups present and typed.
    pub fn decoding_strategy(&self) -> DecodingStrategy {
        let strategy = self.integer(STRATEGY).unwrap_or(0);
        if strategy == STRATEGY_BEAM_SEARCH {
            DecodingStrategy::BeamSearch {
                beam_size: self
                    .group_field(BEAM_SEARCH, BEAM_SIZE)
                    .and_then(Value::as_integer)
                    .unwrap_or(-1),
                patience: self
                    .group_field(BEAM_SEARCH, PATIENCE)
                    .and_then(Value::as_float)
                    .unwrap_or(-1.0),
            }
        } else {
            DecodingStrategy::Greedy {
                best_of: self
                    .group_field(GREEDY, BEST_OF)
                    .and_then(Value::as_integer)
                    .unwrap_or(-1),
            }
        }
    }
}

/// Finalize an already-valid set for dispatch.
///
/// Idempotent and infallible: folds the language auto-detect forms into
/// [`LANGUAGE_AUTO`], resolves the deferred thread count, and leaves
/// everything else (including the inactive decoding group) untouched. This
/// is the last step before the set is handed to the consumer; afterwards no
/// auto-sentinel remains.
pub fn resolve(mut set: ParameterSet) -> ParameterSet {
    if set.text(LANGUAGE).is_some_and(str::is_empty) {
        set.set(LANGUAGE, Value::Text(LANGUAGE_AUTO.to_string()));
    }

    if set.is_auto(N_THREADS) {
        set.set(N_THREADS, Value::Integer(auto_thread_count()));
    }

    tracing::debug!(
        strategy = ?set.decoding_strategy(),
        language = set.text(LANGUAGE),
        threads = set.integer(N_THREADS),
        "resolved parameter set"
    );
    set
}

/// The deferred thread-count default: `min(4, available hardware
/// concurrency)`, recomputed per run. Clamped to at least one thread, so
/// resolution can never fail or produce a non-positive count.
fn auto_thread_count() -> i64 {
    (num_cpus::get() as i64).clamp(1, MAX_AUTO_THREADS)
}
