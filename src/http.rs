//! Transport primitives for provider calls.
//!
//! The module exposes [`ApiHttpClient`] alongside the [`ApiRequest`]/[`ApiResponse`]
//! envelopes so downstream crates can plug in custom HTTP stacks (or scripted fakes in
//! tests) without touching the dispatcher. Implementations report every HTTP response,
//! successful or not, as `Ok(ApiResponse)`; only failures that produced no status at all
//! (DNS, TCP, TLS, timeouts) surface as [`NetworkError`].

// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::{HeaderMap, RETRY_AFTER};
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, error::NetworkError};

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, NetworkError>> + 'a + Send>>;

/// Abstraction over HTTP transports used by the token manager and the dispatcher.
///
/// Implementations must be `Send + Sync + 'static` so a client can be shared across tasks,
/// and must honor [`ApiRequest::timeout`].
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Executes one request and reports the raw response.
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_>;
}

/// HTTP verbs used by provider endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// Query-string request.
	Get,
	/// JSON-body request.
	Post,
}
impl Method {
	/// Returns the canonical verb label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully resolved outbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
	/// HTTP verb.
	pub method: Method,
	/// Absolute URL without the query string.
	pub url: Url,
	/// Header pairs in insertion order.
	pub headers: Vec<(String, String)>,
	/// Query pairs in insertion order.
	pub query: Vec<(String, String)>,
	/// Optional request body.
	pub body: Option<Vec<u8>>,
	/// Per-request timeout.
	pub timeout: Duration,
}
impl ApiRequest {
	/// Creates a request with no headers, query, or body.
	pub fn new(method: Method, url: Url, timeout: Duration) -> Self {
		Self { method, url, headers: Vec::new(), query: Vec::new(), body: None, timeout }
	}

	/// Appends a header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Appends query pairs, preserving their order.
	pub fn with_query<I, K, V>(mut self, pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.query.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));

		self
	}

	/// Attaches a JSON body and the matching content type.
	pub fn with_json_body(mut self, body: &Value) -> Self {
		self.body = Some(body.to_string().into_bytes());

		self.with_header("content-type", "application/json; charset=utf-8")
	}

	/// Returns the first header value matching `name` (case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Raw response captured from the transport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Creates a response with the given status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, retry_after: None, body: body.into() }
	}

	/// Adds a Retry-After hint.
	pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
		self.retry_after = Some(retry_after);

		self
	}

	/// Returns `true` for 2xx statuses.
	pub const fn is_success(&self) -> bool {
		self.status >= 200 && self.status < 300
	}

	/// Returns `true` when the provider throttled the request.
	pub const fn is_throttled(&self) -> bool {
		self.status == 429
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = match request.method {
				Method::Get => client.get(request.url),
				Method::Post => client.post(request.url),
			}
			.timeout(request.timeout);

			if !request.query.is_empty() {
				builder = builder.query(&request.query);
			}
			for (name, value) in &request.headers {
				builder = builder.header(name.as_str(), value.as_str());
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let retry_after = parse_retry_after(response.headers());
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, retry_after, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::from_secs(secs));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Duration::try_from(delta).ok();
		}
	}

	None
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// crates.io
	use reqwest::header::HeaderValue;
	// self
	use super::*;

	#[test]
	fn retry_after_accepts_delta_seconds() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static(" 3 "));

		assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(3)));
	}

	#[test]
	fn retry_after_ignores_past_dates_and_garbage() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));

		assert_eq!(parse_retry_after(&headers), None);

		headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));

		assert_eq!(parse_retry_after(&headers), None);
	}

	#[test]
	fn request_header_lookup_is_case_insensitive() {
		let url = Url::parse("https://example.com/x").expect("Fixture URL should parse.");
		let request = ApiRequest::new(Method::Get, url, Duration::from_secs(1))
			.with_header("tr_id", "FHKST01010100");

		assert_eq!(request.header("TR_ID"), Some("FHKST01010100"));
		assert_eq!(request.header("appkey"), None);
	}
}
