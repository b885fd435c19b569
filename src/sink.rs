//! The handoff seam between this crate and the native engine's adapter.
//!
//! The consumer adapter itself (mapping a finished set onto the engine's own
//! configuration surface) lives outside this crate; we define only the
//! contract it is called through and the pipeline that upholds it.

use crate::error::Result;
use crate::params::ParameterSet;
use crate::strategy::resolve;
use crate::validate::validate;

/// Receiver of exactly one finished [`ParameterSet`] per run.
///
/// Guarantees at the call site:
/// - every registered field is present and already coerced to its kind
/// - the active decoding-strategy group is determined (the inactive group's
///   values are present but must be ignored)
/// - no auto-sentinel remains; the thread count is concrete
pub trait ParamsSink {
    fn on_params(&mut self, params: &ParameterSet) -> Result<()>;
}

/// Run the full pipeline for one inference run: validate the raw mapping,
/// resolve it for dispatch, and hand the finished set to the sink.
///
/// Validation failures surface before the sink is ever called; a failed call
/// fails identically on retry until the input changes.
pub fn configure<S: ParamsSink>(
    raw: &serde_json::Map<String, serde_json::Value>,
    sink: &mut S,
) -> Result<()> {
    let params = resolve(validate(raw)?);
    sink.on_params(&params)
}
