//! Rate-limited, token-authenticated client runtime for brokerage and location Open APIs: cached
//! bearer tokens, bounded throttling retries, and defensive payload normalization in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod classify;
pub mod client;
pub mod codes;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod normalize;
pub mod obs;
pub mod range;
pub mod rate_limit;
pub mod record;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// crates.io
	use parking_lot::Mutex;
	// self
	#[cfg(feature = "reqwest")] use crate::{client::BrokerageClient, http::ReqwestHttpClient};
	use crate::{
		config::{ClientPolicy, Credentials},
		error::NetworkError,
		http::{ApiHttpClient, ApiRequest, ApiResponse, HttpFuture},
	};

	/// Brokerage client type used by reqwest-backed tests.
	#[cfg(feature = "reqwest")]
	pub type ReqwestTestClient = BrokerageClient<ReqwestHttpClient>;

	/// Transport replaying canned responses in order and recording every request it sees.
	#[derive(Debug, Default)]
	pub struct ScriptedHttpClient {
		calls: AtomicUsize,
		responses: Mutex<VecDeque<Result<ApiResponse, NetworkError>>>,
		seen: Mutex<Vec<ApiRequest>>,
	}
	impl ScriptedHttpClient {
		/// Creates a shared transport that replays `responses`.
		pub fn new(responses: Vec<Result<ApiResponse, NetworkError>>) -> Arc<Self> {
			Arc::new(Self { responses: Mutex::new(responses.into()), ..Default::default() })
		}

		/// Number of requests executed so far.
		pub fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}

		/// Requests executed so far, in order.
		pub fn requests(&self) -> Vec<ApiRequest> {
			self.seen.lock().clone()
		}
	}
	impl ApiHttpClient for ScriptedHttpClient {
		fn execute(&self, request: ApiRequest) -> HttpFuture<'_> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			self.seen.lock().push(request);

			let next = self
				.responses
				.lock()
				.pop_front()
				.expect("Scripted transport ran out of responses.");

			Box::pin(async move { next })
		}
	}

	/// Builds a reqwest HTTP client for tests against `httpmock` servers.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds test credentials pointing at `base_url`.
	pub fn test_credentials(base_url: &str) -> Credentials {
		Credentials::builder()
			.app_key("test-app-key")
			.app_secret("test-app-secret")
			.base_url(base_url)
			.request_timeout(Duration::from_secs(5))
			.build()
			.expect("Failed to build test credentials.")
	}

	/// Policy with brokerage pacing and a short throttle backoff so retry tests finish quickly.
	pub fn test_policy() -> ClientPolicy {
		ClientPolicy::BROKERAGE.with_throttle_backoff(Duration::from_millis(50))
	}

	/// Constructs a [`BrokerageClient`] against `base_url`.
	#[cfg(feature = "reqwest")]
	pub fn build_test_client(base_url: &str, policy: ClientPolicy) -> ReqwestTestClient {
		BrokerageClient::with_http_client(
			test_credentials(base_url),
			policy,
			test_reqwest_http_client(),
		)
	}
}

mod _prelude {
	pub use std::{
		collections::VecDeque,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Date, OffsetDateTime, UtcOffset};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use color_eyre as _;
#[cfg(all(test, not(feature = "reqwest")))] use httpmock as _;
