//! Per-provider pacing constants.

// self
use crate::_prelude::*;

/// Fixed pacing policy for one provider.
///
/// The defaults match the brokerage Open API: 15 requests per rolling second, a 2 second pause
/// before the single throttling retry, and a UTC+09:00 market calendar for "today".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientPolicy {
	/// Maximum requests dispatched inside one rolling window.
	pub max_requests_per_window: u32,
	/// Length of the rolling window.
	pub window: Duration,
	/// Pause before re-sending a throttled request.
	pub throttle_backoff: Duration,
	/// Total attempts per request when the provider throttles (first try included).
	pub max_throttle_attempts: u32,
	/// Offset of the provider's market calendar, used to derive "today".
	pub market_offset: UtcOffset,
}
impl ClientPolicy {
	/// Brokerage defaults.
	pub const BROKERAGE: Self = Self {
		max_requests_per_window: 15,
		window: Duration::from_secs(1),
		throttle_backoff: Duration::from_secs(2),
		max_throttle_attempts: 2,
		market_offset: time::macros::offset!(+9),
	};

	/// Overrides the rate ceiling; zero is clamped to one.
	pub fn with_max_requests_per_window(mut self, max: u32) -> Self {
		self.max_requests_per_window = max.max(1);

		self
	}

	/// Overrides the throttle backoff.
	pub fn with_throttle_backoff(mut self, backoff: Duration) -> Self {
		self.throttle_backoff = backoff;

		self
	}

	/// Overrides the market calendar offset.
	pub fn with_market_offset(mut self, offset: UtcOffset) -> Self {
		self.market_offset = offset;

		self
	}

	/// Current calendar date in the provider's market timezone.
	pub fn today(&self) -> Date {
		OffsetDateTime::now_utc().to_offset(self.market_offset).date()
	}
}
impl Default for ClientPolicy {
	fn default() -> Self {
		Self::BROKERAGE
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn overrides_keep_remaining_brokerage_defaults() {
		let policy = ClientPolicy::default()
			.with_max_requests_per_window(0)
			.with_throttle_backoff(Duration::from_millis(10));

		assert_eq!(policy.max_requests_per_window, 1);
		assert_eq!(policy.throttle_backoff, Duration::from_millis(10));
		assert_eq!(policy.max_throttle_attempts, 2);
		assert_eq!(policy.window, Duration::from_secs(1));
	}

	#[test]
	fn today_follows_the_market_offset() {
		let utc = ClientPolicy::BROKERAGE.with_market_offset(UtcOffset::UTC);
		let market = ClientPolicy::BROKERAGE;

		assert!((market.today() - utc.today()).whole_days().abs() <= 1);
	}
}
