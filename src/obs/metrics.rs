// self
use crate::{
	_prelude::*,
	obs::{CallKind, CallOutcome},
};

/// Records one call outcome via the global metrics recorder (when enabled).
///
/// A request throttled twice and then abandoned counts as one `attempt`, two `throttled`, and
/// one `failure` under the same `call` label.
pub fn record_call_outcome(kind: CallKind, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"provider_gateway_call_total",
			"call" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records how long the rate limiter held a request back before admitting it.
///
/// Only delayed admissions are recorded, so the histogram count equals the number of requests
/// that hit a full window.
pub fn record_pacing_delay(delay: Duration) {
	#[cfg(feature = "metrics")]
	{
		metrics::histogram!("provider_gateway_pacing_delay_seconds").record(delay.as_secs_f64());
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = delay;
	}
}
