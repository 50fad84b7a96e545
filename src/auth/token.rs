//! Bearer token issued by the provider's token endpoint.

// self
use crate::{_prelude::*, auth::Secret};

/// Cached bearer credential.
///
/// The provider reports a lifetime alongside the token, but the gateway never expires or
/// refreshes a cached token on its own; `expires_in` is carried for callers that want to
/// decide when to rebuild a client.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
	/// Token value; callers must avoid logging it.
	pub value: Secret,
	/// Instant the gateway received the token.
	pub issued_at: OffsetDateTime,
	/// Lifetime reported by the provider, if any.
	pub expires_in: Option<Duration>,
}
impl AccessToken {
	/// Creates a token issued now.
	pub fn new(value: impl Into<String>) -> Self {
		Self { value: Secret::new(value), issued_at: OffsetDateTime::now_utc(), expires_in: None }
	}

	/// Records the provider-reported lifetime.
	pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
		self.expires_in = Some(expires_in);

		self
	}

	/// Renders the `authorization` header value.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.value.expose())
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("value", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_in", &self.expires_in)
			.finish()
	}
}

/// Token endpoint response; every field is optional so a missing token is reported as such
/// instead of as a parse failure.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponseBody {
	#[serde(default)]
	pub access_token: Option<String>,
	#[serde(default)]
	pub expires_in: Option<u64>,
}
impl TokenResponseBody {
	pub(crate) fn into_token(self) -> Option<AccessToken> {
		let value = self.access_token.filter(|value| !value.trim().is_empty())?;
		let token = AccessToken::new(value);

		Some(match self.expires_in {
			Some(secs) => token.with_expires_in(Duration::from_secs(secs)),
			None => token,
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn blank_access_token_is_not_usable() {
		let body = TokenResponseBody { access_token: Some("  ".into()), expires_in: Some(60) };

		assert!(body.into_token().is_none());

		let body = TokenResponseBody { access_token: None, expires_in: None };

		assert!(body.into_token().is_none());
	}

	#[test]
	fn bearer_header_uses_token_value_and_debug_redacts() {
		let token = AccessToken::new("abc").with_expires_in(Duration::from_secs(86_400));

		assert_eq!(token.bearer(), "Bearer abc");
		assert!(!format!("{token:?}").contains("abc"));
	}
}
