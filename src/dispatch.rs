//! Request dispatch: pacing, authentication, transport, and the bounded throttling retry.
//!
//! Every attempt of [`Dispatcher::send`] passes the rate limiter, obtains the bearer token,
//! renders the provider headers, and executes the call. A throttled attempt (HTTP 429, or a
//! throttled token exchange) is retried after [`ClientPolicy::throttle_backoff`] until
//! [`ClientPolicy::max_throttle_attempts`] is spent; every other failure propagates at once.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TokenManager},
	classify::{ResponseClassifier, StatusClass},
	config::{ClientPolicy, Credentials},
	error::NetworkError,
	http::{ApiHttpClient, ApiRequest, Method},
	obs::{self, CallKind, CallOutcome, CallSpan},
	rate_limit::RateLimiter,
};

/// Customer type header value for individual accounts.
pub const CUSTOMER_TYPE: &str = "P";

/// Immutable description of one provider call.
///
/// Together with the credentials and the bearer token it fully determines the wire request:
/// GET specs render `params` as the query string, POST specs as a JSON object body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestSpec {
	/// Endpoint path relative to the provider base URL.
	pub endpoint: String,
	/// HTTP verb.
	pub method: Method,
	/// Provider transaction identifier sent as `tr_id`.
	pub transaction_id: String,
	/// Ordered parameter pairs.
	pub params: Vec<(String, String)>,
}
impl RequestSpec {
	/// Starts a GET spec.
	pub fn get(endpoint: impl Into<String>, transaction_id: impl Into<String>) -> Self {
		Self::new(Method::Get, endpoint, transaction_id)
	}

	/// Starts a POST spec.
	pub fn post(endpoint: impl Into<String>, transaction_id: impl Into<String>) -> Self {
		Self::new(Method::Post, endpoint, transaction_id)
	}

	fn new(method: Method, endpoint: impl Into<String>, transaction_id: impl Into<String>) -> Self {
		Self {
			endpoint: endpoint.into(),
			method,
			transaction_id: transaction_id.into(),
			params: Vec::new(),
		}
	}

	/// Appends one parameter, keeping insertion order.
	pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.push((name.into(), value.into()));

		self
	}

	/// Returns the first value recorded for `name`.
	pub fn param_value(&self, name: &str) -> Option<&str> {
		self.params.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
	}

	/// Renders the wire request for this spec.
	pub fn to_request(&self, credentials: &Credentials, token: &AccessToken) -> ApiRequest {
		let request = ApiRequest::new(
			self.method,
			credentials.endpoint_url(&self.endpoint),
			credentials.request_timeout,
		)
		.with_header("authorization", token.bearer())
		.with_header("appkey", credentials.app_key.expose())
		.with_header("appsecret", credentials.app_secret.expose())
		.with_header("tr_id", self.transaction_id.as_str())
		.with_header("custtype", CUSTOMER_TYPE);

		match self.method {
			Method::Get => request
				.with_header("content-type", "application/json; charset=utf-8")
				.with_query(self.params.iter().cloned()),
			Method::Post => {
				let body = self
					.params
					.iter()
					.map(|(key, value)| (key.clone(), Value::String(value.clone())))
					.collect::<serde_json::Map<_, _>>();

				request.with_json_body(&Value::Object(body))
			},
		}
	}
}

/// Executes [`RequestSpec`]s on behalf of one client instance.
pub struct Dispatcher<C>
where
	C: ?Sized + ApiHttpClient,
{
	http_client: Arc<C>,
	credentials: Arc<Credentials>,
	tokens: TokenManager<C>,
	limiter: RateLimiter,
	policy: ClientPolicy,
	classifier: Box<dyn ResponseClassifier>,
}
impl<C> Dispatcher<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a dispatcher with its own token cache and rate window.
	pub fn new(
		http_client: Arc<C>,
		credentials: Arc<Credentials>,
		policy: ClientPolicy,
		classifier: impl 'static + ResponseClassifier,
	) -> Self {
		Self {
			tokens: TokenManager::new(http_client.clone(), credentials.clone()),
			limiter: RateLimiter::from_policy(&policy),
			http_client,
			credentials,
			policy,
			classifier: Box::new(classifier),
		}
	}

	/// Token manager shared by every request of this dispatcher.
	pub fn tokens(&self) -> &TokenManager<C> {
		&self.tokens
	}

	/// Pacing policy applied by this dispatcher.
	pub fn policy(&self) -> &ClientPolicy {
		&self.policy
	}

	/// Sends `spec` and returns the classified JSON payload.
	///
	/// Fails with [`Error::RateLimited`] once every attempt was throttled, and otherwise with
	/// the first non-throttling failure: [`Error::Authentication`], [`Error::Network`], or the
	/// classifier's verdict ([`Error::Api`]).
	pub async fn send(&self, spec: &RequestSpec, kind: CallKind) -> Result<Value> {
		let span = CallSpan::new(kind, "send");

		obs::record_call_outcome(kind, CallOutcome::Attempt);

		let result = span.instrument(self.send_with_retry(spec, kind)).await;

		match &result {
			Ok(_) => obs::record_call_outcome(kind, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(kind, CallOutcome::Failure),
		}

		result
	}

	async fn send_with_retry(&self, spec: &RequestSpec, kind: CallKind) -> Result<Value> {
		let max_attempts = self.policy.max_throttle_attempts.max(1);
		let mut attempt = 0;

		loop {
			attempt += 1;

			let retry_after = match self.attempt(spec, kind, attempt).await? {
				Attempt::Done(payload) => return Ok(payload),
				Attempt::Throttled { retry_after } => retry_after,
			};

			obs::record_call_outcome(kind, CallOutcome::Throttled);

			if attempt >= max_attempts {
				return Err(Error::RateLimited { attempts: attempt, retry_after });
			}

			tokio::time::sleep(self.policy.throttle_backoff).await;
		}
	}

	async fn attempt(&self, spec: &RequestSpec, kind: CallKind, attempt: u32) -> Result<Attempt> {
		self.limiter.acquire().await;

		let token = match self.tokens.token().await {
			Ok(token) => token,
			Err(Error::RateLimited { retry_after, .. }) =>
				return Ok(Attempt::Throttled { retry_after }),
			Err(e) => return Err(e),
		};

		obs::debug_request(kind, &spec.transaction_id, attempt);

		let response = self.http_client.execute(spec.to_request(&self.credentials, &token)).await?;

		match self.classifier.classify_status(&response) {
			StatusClass::Success => {
				let de = &mut serde_json::Deserializer::from_slice(&response.body);
				let payload: Value = serde_path_to_error::deserialize(de).map_err(|source| {
					NetworkError::MalformedBody { source, status: response.status }
				})?;

				self.classifier.classify_payload(payload).map(Attempt::Done)
			},
			StatusClass::Throttled => Ok(Attempt::Throttled { retry_after: response.retry_after }),
			StatusClass::Failure(status) => Err(NetworkError::status(status, &response.body).into()),
		}
	}
}
impl<C> Debug for Dispatcher<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Dispatcher")
			.field("credentials", &self.credentials)
			.field("tokens", &self.tokens)
			.field("limiter", &self.limiter)
			.field("policy", &self.policy)
			.finish()
	}
}

enum Attempt {
	Done(Value),
	Throttled { retry_after: Option<Duration> },
}
