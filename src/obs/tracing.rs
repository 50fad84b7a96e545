// self
use crate::{_prelude::*, obs::CallKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by gateway operations.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided call kind + stage.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("provider_gateway.call", call = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a warning about a payload entry the normalizer discarded or coerced.
pub fn warn_payload(kind: &'static str, detail: impl Display) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(payload = kind, "{detail}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, detail);
	}
}

/// Emits a debug event describing a dispatched request.
pub fn debug_request(kind: CallKind, transaction_id: &str, attempt: u32) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(call = kind.as_str(), transaction_id, attempt, "dispatching request");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, transaction_id, attempt);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn helpers_noop_without_tracing() {
		warn_payload("chart", "dropped point with empty date");
		debug_request(CallKind::Token, "", 1);
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = CallSpan::new(CallKind::DomesticQuote, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
