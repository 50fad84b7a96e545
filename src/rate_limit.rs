//! Rolling-window rate limiter gating every outbound request of one client instance.
//!
//! [`RateWindow`] is the pure bookkeeping half: it remembers when the requests of the most
//! recent window were dispatched and answers [`RateLimitDecision::Allow`] or
//! [`RateLimitDecision::Delay`] for a given instant. [`RateLimiter`] wraps it in an async
//! mutex and sleeps on delays, so callers sharing one client are admitted strictly in arrival
//! order. Nothing is coordinated across instances or processes.

// crates.io
use tokio::time::Instant;
// self
use crate::{_prelude::*, config::ClientPolicy, obs};

/// Result emitted by [`RateWindow::evaluate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
	/// The request may proceed immediately and has been recorded.
	Allow,
	/// The request must wait.
	Delay(RetryDirective),
}

/// Advises callers when to retry after a [`RateLimitDecision::Delay`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryDirective {
	/// Instant when it is safe to retry.
	pub earliest_retry_at: Instant,
	/// Wait measured from the evaluated instant.
	pub recommended_backoff: Duration,
}

/// Dispatch timestamps of the most recent window.
#[derive(Clone, Debug)]
pub struct RateWindow {
	max_requests: u32,
	window: Duration,
	dispatched: VecDeque<Instant>,
}
impl RateWindow {
	/// Creates an empty window admitting `max_requests` per `window`.
	pub fn new(max_requests: u32, window: Duration) -> Self {
		let max_requests = max_requests.max(1);

		Self { max_requests, window, dispatched: VecDeque::with_capacity(max_requests as usize) }
	}

	/// Decides whether a request issued at `now` may proceed, recording it when allowed.
	pub fn evaluate(&mut self, now: Instant) -> RateLimitDecision {
		self.evict(now);

		if self.dispatched.len() < self.max_requests as usize {
			self.dispatched.push_back(now);

			return RateLimitDecision::Allow;
		}

		let oldest = self.dispatched.front().copied().unwrap_or(now);
		let earliest_retry_at = oldest + self.window;

		RateLimitDecision::Delay(RetryDirective {
			earliest_retry_at,
			recommended_backoff: earliest_retry_at.saturating_duration_since(now),
		})
	}

	/// Number of requests recorded inside the window ending at `now`.
	pub fn count_in_window(&mut self, now: Instant) -> usize {
		self.evict(now);

		self.dispatched.len()
	}

	/// Dispatch instant of the oldest request still inside the window.
	pub fn window_start(&self) -> Option<Instant> {
		self.dispatched.front().copied()
	}

	fn evict(&mut self, now: Instant) {
		while let Some(oldest) = self.dispatched.front() {
			if now.saturating_duration_since(*oldest) < self.window {
				break;
			}

			self.dispatched.pop_front();
		}
	}
}

/// Async gate admitting at most `max_requests_per_window` requests per rolling window.
#[derive(Debug)]
pub struct RateLimiter {
	state: AsyncMutex<RateWindow>,
}
impl RateLimiter {
	/// Creates a limiter admitting `max_requests` per `window`.
	pub fn new(max_requests: u32, window: Duration) -> Self {
		Self { state: AsyncMutex::new(RateWindow::new(max_requests, window)) }
	}

	/// Creates a limiter from a provider policy.
	pub fn from_policy(policy: &ClientPolicy) -> Self {
		Self::new(policy.max_requests_per_window, policy.window)
	}

	/// Waits until one more request may be dispatched, then records it. Never fails.
	pub async fn acquire(&self) {
		let mut window = self.state.lock().await;

		loop {
			match window.evaluate(Instant::now()) {
				RateLimitDecision::Allow => return,
				RateLimitDecision::Delay(directive) => {
					obs::record_pacing_delay(directive.recommended_backoff);
					tokio::time::sleep_until(directive.earliest_retry_at).await;
				},
			}
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn window_delays_once_full_and_reopens_after_oldest_expires() {
		let mut window = RateWindow::new(2, Duration::from_secs(1));
		let t0 = Instant::now();

		assert_eq!(window.evaluate(t0), RateLimitDecision::Allow);
		assert_eq!(window.evaluate(t0 + Duration::from_millis(300)), RateLimitDecision::Allow);

		let RateLimitDecision::Delay(directive) = window.evaluate(t0 + Duration::from_millis(500))
		else {
			panic!("Third request inside the window should be delayed.");
		};

		assert_eq!(directive.earliest_retry_at, t0 + Duration::from_secs(1));
		assert_eq!(directive.recommended_backoff, Duration::from_millis(500));
		assert_eq!(window.evaluate(t0 + Duration::from_secs(1)), RateLimitDecision::Allow);
		assert_eq!(window.count_in_window(t0 + Duration::from_secs(1)), 2);
		assert_eq!(window.window_start(), Some(t0 + Duration::from_millis(300)));
	}

	#[test]
	fn zero_ceiling_is_clamped_to_one() {
		let mut window = RateWindow::new(0, Duration::from_secs(1));
		let t0 = Instant::now();

		assert_eq!(window.evaluate(t0), RateLimitDecision::Allow);
		assert!(matches!(window.evaluate(t0), RateLimitDecision::Delay(_)));
	}

	#[tokio::test(start_paused = true)]
	async fn third_acquire_waits_a_full_window() {
		let limiter = RateLimiter::new(2, Duration::from_secs(1));
		let start = Instant::now();

		limiter.acquire().await;
		limiter.acquire().await;

		assert!(start.elapsed() < Duration::from_secs(1));

		limiter.acquire().await;

		assert!(start.elapsed() >= Duration::from_secs(1));
	}

	#[tokio::test(start_paused = true)]
	async fn no_rolling_second_exceeds_the_ceiling() {
		const MAX: usize = 3;

		let limiter = RateLimiter::new(MAX as u32, Duration::from_secs(1));
		let mut stamps = Vec::new();

		for idx in 0..25_u64 {
			if idx % 4 == 0 {
				tokio::time::sleep(Duration::from_millis(170)).await;
			}

			limiter.acquire().await;
			stamps.push(Instant::now());
		}

		for pair in stamps.windows(MAX + 1) {
			assert!(pair[MAX].duration_since(pair[0]) >= Duration::from_secs(1));
		}
	}
}
