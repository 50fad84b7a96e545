//! Credential store: validated, immutable provider credentials.

// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Default brokerage Open API base URL.
pub const DEFAULT_BROKERAGE_URL: &str = "https://openapi.koreainvestment.com:9443";

/// Immutable credentials for one provider, fixed for the lifetime of a client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	/// Application key issued by the provider.
	pub app_key: Secret,
	/// Application secret issued by the provider.
	pub app_secret: Secret,
	/// Base URL every endpoint path is joined onto.
	pub base_url: Url,
	/// Timeout applied to each HTTP request.
	pub request_timeout: Duration,
	/// Retry budget advertised to higher layers; the client itself only retries throttling.
	pub max_retries: u32,
}
impl Credentials {
	const DEFAULT_MAX_RETRIES: u32 = 3;
	const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

	/// Returns a builder seeded with default timeout and retry budget.
	pub fn builder() -> CredentialsBuilder {
		CredentialsBuilder::default()
	}

	/// Loads credentials from the process environment.
	///
	/// See [`Credentials::from_env_with`] for the variable names.
	pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
		Self::from_env_with(prefix, |key| std::env::var(key).ok())
	}

	/// Loads credentials through `lookup`, reading `{PREFIX}_APP_KEY`, `{PREFIX}_APP_SECRET`,
	/// `{PREFIX}_API_URL`, `REQUEST_TIMEOUT` (seconds), and `MAX_RETRIES`.
	///
	/// The base URL falls back to [`DEFAULT_BROKERAGE_URL`] when unset.
	pub fn from_env_with<F>(prefix: &str, lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let base_url = lookup(&format!("{prefix}_API_URL"))
			.unwrap_or_else(|| DEFAULT_BROKERAGE_URL.to_owned());
		let mut builder = Self::builder().base_url(base_url);

		if let Some(key) = lookup(&format!("{prefix}_APP_KEY")) {
			builder = builder.app_key(key);
		}
		if let Some(secret) = lookup(&format!("{prefix}_APP_SECRET")) {
			builder = builder.app_secret(secret);
		}
		if let Some(raw) = lookup("REQUEST_TIMEOUT") {
			let secs = raw
				.trim()
				.parse::<u64>()
				.map_err(|_| ConfigError::InvalidSetting { field: "REQUEST_TIMEOUT", value: raw })?;

			builder = builder.request_timeout(Duration::from_secs(secs));
		}
		if let Some(raw) = lookup("MAX_RETRIES") {
			let retries = raw
				.trim()
				.parse::<u32>()
				.map_err(|_| ConfigError::InvalidSetting { field: "MAX_RETRIES", value: raw })?;

			builder = builder.max_retries(retries);
		}

		builder.build()
	}

	/// Joins an endpoint path onto the base URL, keeping any base path prefix.
	pub fn endpoint_url(&self, path: &str) -> Url {
		let mut url = self.base_url.clone();
		let joined = format!(
			"{}/{}",
			self.base_url.path().trim_end_matches('/'),
			path.trim_start_matches('/')
		);

		url.set_path(&joined);

		url
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("app_key", &self.app_key)
			.field("app_secret", &self.app_secret)
			.field("base_url", &self.base_url.as_str())
			.field("request_timeout", &self.request_timeout)
			.field("max_retries", &self.max_retries)
			.finish()
	}
}

/// Builder for [`Credentials`] values.
#[derive(Debug)]
pub struct CredentialsBuilder {
	app_key: Option<String>,
	app_secret: Option<String>,
	base_url: Option<String>,
	request_timeout: Duration,
	max_retries: u32,
}
impl CredentialsBuilder {
	/// Sets the application key.
	pub fn app_key(mut self, key: impl Into<String>) -> Self {
		self.app_key = Some(key.into());

		self
	}

	/// Sets the application secret.
	pub fn app_secret(mut self, secret: impl Into<String>) -> Self {
		self.app_secret = Some(secret.into());

		self
	}

	/// Sets the provider base URL.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());

		self
	}

	/// Overrides the per-request timeout (defaults to 30 seconds).
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Overrides the advertised retry budget (defaults to 3).
	pub fn max_retries(mut self, retries: u32) -> Self {
		self.max_retries = retries;

		self
	}

	/// Consumes the builder, failing fast on missing credentials or an unparsable URL.
	pub fn build(self) -> Result<Credentials, ConfigError> {
		let app_key = require("app_key", self.app_key)?;
		let app_secret = require("app_secret", self.app_secret)?;
		let base_url = Url::parse(self.base_url.as_deref().unwrap_or(DEFAULT_BROKERAGE_URL))?;

		Ok(Credentials {
			app_key: Secret::new(app_key),
			app_secret: Secret::new(app_secret),
			base_url,
			request_timeout: self.request_timeout,
			max_retries: self.max_retries,
		})
	}
}
impl Default for CredentialsBuilder {
	fn default() -> Self {
		Self {
			app_key: None,
			app_secret: None,
			base_url: None,
			request_timeout: Credentials::DEFAULT_TIMEOUT,
			max_retries: Credentials::DEFAULT_MAX_RETRIES,
		}
	}
}

fn require(field: &'static str, value: Option<String>) -> Result<String, ConfigError> {
	match value {
		Some(value) if !value.trim().is_empty() => Ok(value),
		_ => Err(ConfigError::MissingCredential { field }),
	}
}
