//! Gateway-level error types shared across the token manager, dispatcher, and normalizers.

// self
use crate::_prelude::*;

/// Gateway-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical gateway error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; fatal and never retried.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token endpoint could not issue a usable credential.
	#[error(transparent)]
	Authentication(#[from] AuthError),
	/// Transport failure, timeout, or non-throttling HTTP status.
	#[error(transparent)]
	Network(#[from] NetworkError),

	/// Provider kept throttling after the bounded retry budget was spent.
	#[error("Provider kept throttling the request after {attempts} attempts.")]
	RateLimited {
		/// Number of attempts issued before giving up.
		attempts: u32,
		/// Retry-After hint from the final throttled response, if supplied.
		retry_after: Option<Duration>,
	},
	/// Provider reported a business failure through its status field.
	#[error("Provider rejected the request ({code}): {message}.")]
	Api {
		/// Provider message code (empty when the provider omits it).
		code: String,
		/// Provider-supplied diagnostic message.
		message: String,
	},
	/// A lookup that must yield at least one result yielded none.
	#[error("No result found for `{query}`.")]
	NotFound {
		/// Query that produced the empty result set.
		query: String,
	},
}
impl Error {
	/// Returns the flat classification of this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Config(_) => ErrorKind::Configuration,
			Self::Authentication(_) => ErrorKind::Authentication,
			Self::Network(_) => ErrorKind::Network,
			Self::RateLimited { .. } => ErrorKind::RateLimit,
			Self::Api { .. } => ErrorKind::Api,
			Self::NotFound { .. } => ErrorKind::NotFound,
		}
	}
}

/// Flat error categories for callers that branch on failure class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Missing or invalid local configuration.
	Configuration,
	/// Token acquisition failed.
	Authentication,
	/// Transport-level failure.
	Network,
	/// Throttling persisted past the retry budget.
	RateLimit,
	/// Provider-reported business failure.
	Api,
	/// Empty result where one was required.
	NotFound,
}

/// Configuration and validation failures raised at construction time.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL or endpoint path cannot be parsed.
	#[error("Provider URL is invalid.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},

	/// A mandatory credential is absent or blank.
	#[error("Required credential `{field}` is missing.")]
	MissingCredential {
		/// Name of the missing credential.
		field: &'static str,
	},
	/// A numeric setting could not be parsed.
	#[error("Setting `{field}` has an invalid value: {value}.")]
	InvalidSetting {
		/// Setting name.
		field: &'static str,
		/// Raw value that failed to parse.
		value: String,
	},
	/// A caller-supplied date is not an 8-digit `YYYYMMDD` calendar date.
	#[error("Date `{value}` is not a valid YYYYMMDD date.")]
	InvalidDate {
		/// Raw value that failed to parse.
		value: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
impl From<url::ParseError> for ConfigError {
	fn from(source: url::ParseError) -> Self {
		Self::InvalidUrl { source }
	}
}

/// Token acquisition failures.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Token endpoint could not be reached.
	#[error("Token endpoint is unreachable.")]
	Unreachable {
		/// Transport failure that prevented the exchange.
		#[source]
		source: NetworkError,
	},
	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint rejected the credentials with status {status}: {message}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Body preview or provider description.
		message: String,
	},
	/// Token endpoint responded without a usable `access_token`.
	#[error("Token endpoint response did not contain an access token.")]
	MissingToken,
	/// Token endpoint responded with malformed JSON.
	#[error("Token endpoint returned malformed JSON.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Transport-level failures (network, IO, unexpected status, undecodable body).
#[derive(Debug, ThisError)]
pub enum NetworkError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Transport {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request exceeded the configured timeout.
	#[error("Request timed out while calling the provider.")]
	Timeout,
	/// Provider answered with a non-success, non-throttling status.
	#[error("Provider responded with HTTP status {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Truncated response body for diagnostics.
		body_preview: String,
	},
	/// Provider answered 2xx with a body that is not valid JSON.
	#[error("Provider returned a malformed JSON body.")]
	MalformedBody {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
}
impl NetworkError {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Wraps a transport-specific network error.
	pub fn transport(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Transport { source: Box::new(src) }
	}

	/// Builds a status error, truncating the body to a short preview.
	pub fn status(status: u16, body: &[u8]) -> Self {
		Self::Status { status, body_preview: truncate_preview(&String::from_utf8_lossy(body)) }
	}

	/// Returns the HTTP status attached to this failure, when known.
	pub fn http_status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } | Self::MalformedBody { status, .. } => Some(*status),
			_ => None,
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for NetworkError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::transport(e) }
	}
}

pub(crate) fn truncate_preview(body: &str) -> String {
	if body.chars().count() <= NetworkError::BODY_PREVIEW_LIMIT {
		return body.to_owned();
	}

	let mut buf = String::new();

	for (idx, ch) in body.chars().enumerate() {
		if idx >= NetworkError::BODY_PREVIEW_LIMIT {
			buf.push('…');

			break;
		}
		buf.push(ch);
	}

	buf
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn kind_flattens_nested_variants() {
		let err: Error = ConfigError::MissingCredential { field: "app_key" }.into();

		assert_eq!(err.kind(), ErrorKind::Configuration);
		assert_eq!(err.to_string(), "Required credential `app_key` is missing.");

		let err: Error = AuthError::MissingToken.into();

		assert_eq!(err.kind(), ErrorKind::Authentication);

		let err = Error::Api { code: "EGW00001".into(), message: "invalid symbol".into() };

		assert_eq!(err.kind(), ErrorKind::Api);
		assert!(err.to_string().contains("invalid symbol"));
	}

	#[test]
	fn status_error_truncates_long_bodies() {
		let body = "x".repeat(1_000);
		let err = NetworkError::status(502, body.as_bytes());

		assert_eq!(err.http_status(), Some(502));

		let NetworkError::Status { body_preview, .. } = err else {
			panic!("Status constructor should build the Status variant.");
		};

		assert_eq!(body_preview.chars().count(), NetworkError::BODY_PREVIEW_LIMIT + 1);
		assert!(body_preview.ends_with('…'));
	}
}
