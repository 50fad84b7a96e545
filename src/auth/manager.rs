//! Token acquisition with caching + singleflight guard.
//!
//! [`TokenManager::token`] serves the cached bearer token when one exists and otherwise posts
//! the app key/secret to the token endpoint. A per-manager async guard makes concurrent
//! callers piggy-back on the same in-flight exchange instead of stampeding the endpoint, so
//! the endpoint is called at most once per manager. Cached tokens are never expired or
//! refreshed; rebuild the client to obtain a fresh one.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TokenResponseBody},
	config::Credentials,
	error::{AuthError, truncate_preview},
	http::{ApiHttpClient, ApiRequest, Method},
	obs::{self, CallKind, CallOutcome, CallSpan},
};

/// Path of the token endpoint, relative to the provider base URL.
pub const TOKEN_ENDPOINT: &str = "/oauth2/tokenP";

/// Acquires and caches the bearer token of one client instance.
pub struct TokenManager<C>
where
	C: ?Sized + ApiHttpClient,
{
	http_client: Arc<C>,
	credentials: Arc<Credentials>,
	cached: RwLock<Option<AccessToken>>,
	singleflight: AsyncMutex<()>,
}
impl<C> TokenManager<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a manager with an empty cache.
	pub fn new(http_client: Arc<C>, credentials: Arc<Credentials>) -> Self {
		Self {
			http_client,
			credentials,
			cached: RwLock::new(None),
			singleflight: AsyncMutex::new(()),
		}
	}

	/// Returns the cached token without touching the network.
	pub fn cached(&self) -> Option<AccessToken> {
		self.cached.read().clone()
	}

	/// Returns the cached token, issuing one first when the cache is empty.
	///
	/// Fails with [`Error::Authentication`] when the endpoint is unreachable, rejects the
	/// credentials, or answers without a token. A throttled exchange surfaces as
	/// [`Error::RateLimited`] so the dispatcher's bounded retry covers it.
	pub async fn token(&self) -> Result<AccessToken> {
		if let Some(token) = self.cached() {
			return Ok(token);
		}

		let _singleflight = self.singleflight.lock().await;

		if let Some(token) = self.cached() {
			return Ok(token);
		}

		let token = self.issue().await?;

		*self.cached.write() = Some(token.clone());

		Ok(token)
	}

	async fn issue(&self) -> Result<AccessToken> {
		const KIND: CallKind = CallKind::Token;

		let span = CallSpan::new(KIND, "issue");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async {
				let body = serde_json::json!({
					"grant_type": "client_credentials",
					"appkey": self.credentials.app_key.expose(),
					"appsecret": self.credentials.app_secret.expose(),
				});
				let request = ApiRequest::new(
					Method::Post,
					self.credentials.endpoint_url(TOKEN_ENDPOINT),
					self.credentials.request_timeout,
				)
				.with_json_body(&body);
				let response = self
					.http_client
					.execute(request)
					.await
					.map_err(|source| AuthError::Unreachable { source })?;

				if response.is_throttled() {
					obs::record_call_outcome(KIND, CallOutcome::Throttled);

					return Err(Error::RateLimited { attempts: 1, retry_after: response.retry_after });
				}
				if !response.is_success() {
					let message = truncate_preview(&String::from_utf8_lossy(&response.body));

					return Err(AuthError::Rejected { status: response.status, message }.into());
				}

				let de = &mut serde_json::Deserializer::from_slice(&response.body);
				let parsed: TokenResponseBody = serde_path_to_error::deserialize(de)
					.map_err(|source| AuthError::MalformedResponse { source })?;

				parsed.into_token().ok_or(Error::Authentication(AuthError::MissingToken))
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}
}
impl<C> Debug for TokenManager<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("credentials", &self.credentials)
			.field("cached", &self.cached.read().is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::{ScriptedHttpClient, test_credentials},
		error::NetworkError,
		http::ApiResponse,
	};

	fn credentials() -> Arc<Credentials> {
		Arc::new(test_credentials("https://broker.example.com"))
	}

	#[tokio::test]
	async fn token_is_issued_once_and_served_from_cache() {
		let transport = ScriptedHttpClient::new(vec![Ok(ApiResponse::new(
			200,
			r#"{"access_token":"tok-1","token_type":"Bearer","expires_in":86400}"#,
		))]);
		let manager = TokenManager::new(transport.clone(), credentials());
		let first = manager.token().await.expect("First token call should issue a token.");
		let second = manager.token().await.expect("Second token call should hit the cache.");

		assert_eq!(first.value.expose(), "tok-1");
		assert_eq!(second, first);
		assert_eq!(first.expires_in, Some(Duration::from_secs(86_400)));
		assert_eq!(transport.calls(), 1);

		let seen = transport.requests();
		let request = &seen[0];
		let body: Value = serde_json::from_slice(request.body.as_deref().unwrap_or_default())
			.expect("Token request body should be JSON.");

		assert_eq!(request.method, Method::Post);
		assert_eq!(request.url.path(), TOKEN_ENDPOINT);
		assert_eq!(body["grant_type"], "client_credentials");
		assert_eq!(body["appkey"], "test-app-key");
		assert_eq!(body["appsecret"], "test-app-secret");
	}

	#[tokio::test]
	async fn concurrent_callers_share_one_exchange() {
		let transport =
			ScriptedHttpClient::new(vec![Ok(ApiResponse::new(200, r#"{"access_token":"shared"}"#))]);
		let manager = TokenManager::new(transport.clone(), credentials());
		let (first, second) = tokio::join!(manager.token(), manager.token());

		assert_eq!(first.expect("First caller should succeed.").value.expose(), "shared");
		assert_eq!(second.expect("Second caller should succeed.").value.expose(), "shared");
		assert_eq!(transport.calls(), 1);
	}

	#[tokio::test]
	async fn missing_token_and_unreachable_endpoint_are_authentication_errors() {
		let transport = ScriptedHttpClient::new(vec![
			Ok(ApiResponse::new(200, r#"{"token_type":"Bearer"}"#)),
			Err(NetworkError::Timeout),
			Ok(ApiResponse::new(403, r#"{"error_description":"bad key"}"#)),
		]);
		let manager = TokenManager::new(transport, credentials());
		let err = manager.token().await.expect_err("Response without token should fail.");

		assert!(matches!(err, Error::Authentication(AuthError::MissingToken)));

		let err = manager.token().await.expect_err("Timed out exchange should fail.");

		assert!(matches!(err, Error::Authentication(AuthError::Unreachable { .. })));

		let err = manager.token().await.expect_err("Rejected exchange should fail.");

		assert!(matches!(err, Error::Authentication(AuthError::Rejected { status: 403, .. })));
		assert!(manager.cached().is_none());
	}

	#[tokio::test]
	async fn throttled_exchange_surfaces_as_rate_limited() {
		let transport = ScriptedHttpClient::new(vec![Ok(
			ApiResponse::new(429, "").with_retry_after(Duration::from_secs(1))
		)]);
		let manager = TokenManager::new(transport, credentials());
		let err = manager.token().await.expect_err("Throttled exchange should fail.");

		assert!(matches!(
			err,
			Error::RateLimited { attempts: 1, retry_after: Some(d) } if d == Duration::from_secs(1)
		));
	}

	#[tokio::test]
	async fn malformed_json_is_reported_with_source() {
		let transport = ScriptedHttpClient::new(vec![Ok(ApiResponse::new(200, "not json"))]);
		let manager = TokenManager::new(transport, credentials());
		let err = manager.token().await.expect_err("Malformed body should fail.");

		assert!(matches!(err, Error::Authentication(AuthError::MalformedResponse { .. })));
		assert!(StdError::source(&err).is_some());
	}
}
