//! Error classification for transport statuses and provider status fields.
//!
//! Providers signal business failures through a status field inside a 2xx body, separate
//! from the HTTP status. [`ResponseClassifier`] maps both layers into the gateway taxonomy so
//! the dispatcher stays provider-agnostic.

// self
use crate::{_prelude::*, http::ApiResponse};

/// Transport-level classification of a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusClass {
	/// 2xx; the body should be decoded and classified.
	Success,
	/// 429; the dispatcher may retry within its budget.
	Throttled,
	/// Any other status; surfaced as a network failure.
	Failure(u16),
}

/// Strategy hook mapping provider responses into the gateway taxonomy.
pub trait ResponseClassifier: Send + Sync {
	/// Classifies the HTTP status of a response.
	///
	/// The default implementation treats 2xx as success and 429 as throttling.
	fn classify_status(&self, response: &ApiResponse) -> StatusClass {
		match response.status {
			_ if response.is_success() => StatusClass::Success,
			429 => StatusClass::Throttled,
			status => StatusClass::Failure(status),
		}
	}

	/// Inspects a decoded payload, passing it through unchanged on success.
	fn classify_payload(&self, payload: Value) -> Result<Value>;
}

/// Classifier for providers that report success through a status field such as `rt_cd`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusFieldClassifier {
	/// Field carrying the provider status.
	pub status_field: &'static str,
	/// Value signalling success.
	pub success_value: &'static str,
	/// Field carrying the provider message code.
	pub code_field: &'static str,
	/// Field carrying the provider message.
	pub message_field: &'static str,
}
impl StatusFieldClassifier {
	/// Brokerage Open API convention: `rt_cd == "0"`, code in `msg_cd`, message in `msg1`.
	pub const BROKERAGE: Self = Self {
		status_field: "rt_cd",
		success_value: "0",
		code_field: "msg_cd",
		message_field: "msg1",
	};
	const UNKNOWN_MESSAGE: &'static str = "Unknown provider error";
}
impl Default for StatusFieldClassifier {
	fn default() -> Self {
		Self::BROKERAGE
	}
}
impl ResponseClassifier for StatusFieldClassifier {
	fn classify_payload(&self, payload: Value) -> Result<Value> {
		let status = payload.get(self.status_field).map(field_text);

		if status.as_deref() == Some(self.success_value) {
			return Ok(payload);
		}

		let code = payload.get(self.code_field).map(field_text).unwrap_or_default();
		let message = payload
			.get(self.message_field)
			.map(field_text)
			.filter(|message| !message.is_empty())
			.unwrap_or_else(|| Self::UNKNOWN_MESSAGE.to_owned());

		Err(Error::Api { code, message })
	}
}

/// Classifier for providers without a status field; every 2xx payload is a success.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassThroughClassifier;
impl ResponseClassifier for PassThroughClassifier {
	fn classify_payload(&self, payload: Value) -> Result<Value> {
		Ok(payload)
	}
}

/// Returns the non-empty collection at `pointer`, or [`Error::NotFound`] for `query`.
///
/// A missing or non-array value counts as empty.
pub fn require_candidates<'a>(
	payload: &'a Value,
	pointer: &str,
	query: &str,
) -> Result<&'a [Value]> {
	match payload.pointer(pointer).and_then(Value::as_array) {
		Some(items) if !items.is_empty() => Ok(items.as_slice()),
		_ => Err(Error::NotFound { query: query.to_owned() }),
	}
}

fn field_text(value: &Value) -> String {
	match value {
		Value::String(text) => text.trim().to_owned(),
		Value::Null => String::new(),
		other => other.to_string(),
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn failing_status_field_yields_api_error_with_exact_message() {
		let payload = json!({ "rt_cd": "1", "msg_cd": "EGW00121", "msg1": "invalid symbol" });
		let err = StatusFieldClassifier::BROKERAGE
			.classify_payload(payload)
			.expect_err("Non-zero status should be classified as a failure.");

		assert!(matches!(
			err,
			Error::Api { ref code, ref message } if code == "EGW00121" && message == "invalid symbol"
		));
	}

	#[test]
	fn success_passes_payload_through_unchanged() {
		let payload = json!({ "rt_cd": "0", "msg1": "OK", "output": { "stck_prpr": "71000" } });
		let classified = StatusFieldClassifier::BROKERAGE
			.classify_payload(payload.clone())
			.expect("Zero status should pass through.");

		assert_eq!(classified, payload);
	}

	#[test]
	fn numeric_status_and_missing_message_are_handled() {
		let classifier = StatusFieldClassifier::BROKERAGE;

		assert!(classifier.classify_payload(json!({ "rt_cd": 0 })).is_ok());

		let err = classifier
			.classify_payload(json!({ "output": {} }))
			.expect_err("Missing status field should be treated as a failure.");

		assert!(matches!(err, Error::Api { ref message, .. } if message == "Unknown provider error"));
	}

	#[test]
	fn status_classes_follow_http_codes() {
		let classifier = PassThroughClassifier;

		assert_eq!(classifier.classify_status(&ApiResponse::new(200, "{}")), StatusClass::Success);
		assert_eq!(classifier.classify_status(&ApiResponse::new(429, "")), StatusClass::Throttled);
		assert_eq!(classifier.classify_status(&ApiResponse::new(500, "")), StatusClass::Failure(500));
	}

	#[test]
	fn empty_candidate_collection_is_not_found() {
		let payload = json!({ "documents": [] });
		let err = require_candidates(&payload, "/documents", "Nowhere 1")
			.expect_err("Empty documents should be reported as not found.");

		assert!(matches!(err, Error::NotFound { ref query } if query == "Nowhere 1"));
		assert!(require_candidates(&json!({}), "/documents", "x").is_err());
		assert_eq!(
			require_candidates(&json!({ "documents": [1, 2] }), "/documents", "x")
				.expect("Non-empty documents should be returned.")
				.len(),
			2
		);
	}
}
