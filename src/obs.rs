//! Optional observability helpers for provider calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `provider_gateway.call` with the `call`
//!   (operation) and `stage` (call site) fields, plus warnings for dropped payload entries.
//! - Enable `metrics` to increment the `provider_gateway_call_total` counter for every
//!   attempt/throttle/success/failure, labeled by `call` + `outcome`, and to record
//!   `provider_gateway_pacing_delay_seconds` whenever the rate limiter delays a request.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Provider operations observed by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Token endpoint exchange.
	Token,
	/// Domestic stock quote.
	DomesticQuote,
	/// Foreign stock quote.
	ForeignQuote,
	/// Daily/weekly/monthly/yearly chart.
	Chart,
	/// Any other dispatched request.
	Other,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::Token => "token",
			CallKind::DomesticQuote => "domestic_quote",
			CallKind::ForeignQuote => "foreign_quote",
			CallKind::Chart => "chart",
			CallKind::Other => "other",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a gateway operation.
	Attempt,
	/// Provider throttled the attempt.
	Throttled,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Throttled => "throttled",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
