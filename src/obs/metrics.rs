// self
use crate::obs::{FlowKind, FlowOutcome};

/// Counter bumped once per lookup, sign-in, or token request outcome.
pub const FLOW_COUNTER: &str = "bearer_token_cache_flow_total";

/// Counts one outcome of a cache lookup or backend call, labeled by `flow` and `outcome`.
///
/// Compiles to nothing unless the `metrics` feature is enabled.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(FLOW_COUNTER, "flow" => kind.as_str(), "outcome" => outcome.as_str())
			.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}
