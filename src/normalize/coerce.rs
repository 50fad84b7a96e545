//! Defensive field access over loosely-typed provider JSON.

// self
use crate::{_prelude::*, obs};

/// Outcome of reading one numeric field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Numeric {
	/// Absent, null, or blank.
	Missing,
	/// Parsed value.
	Value(f64),
	/// Present but not a finite number.
	Malformed,
}
impl Numeric {
	pub(crate) fn parse(value: Option<&Value>) -> Self {
		match value {
			None | Some(Value::Null) => Self::Missing,
			Some(Value::Number(number)) => number.as_f64().map_or(Self::Malformed, Self::Value),
			Some(Value::String(raw)) => {
				let raw = raw.trim();

				if raw.is_empty() {
					return Self::Missing;
				}

				match raw.replace(',', "").parse::<f64>() {
					Ok(value) if value.is_finite() => Self::Value(value),
					_ => Self::Malformed,
				}
			},
			Some(_) => Self::Malformed,
		}
	}

	pub(crate) fn is_malformed(self) -> bool {
		matches!(self, Self::Malformed)
	}

	pub(crate) fn or_zero(self) -> f64 {
		match self {
			Self::Value(value) => value,
			Self::Missing | Self::Malformed => 0.0,
		}
	}
}

/// Read-only view over one provider object, tagged with the payload kind for diagnostics.
///
/// Anything that is not an object behaves like an empty object.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fields<'a> {
	source: &'a Value,
	kind: &'static str,
}
impl<'a> Fields<'a> {
	pub(crate) fn new(source: &'a Value, kind: &'static str) -> Self {
		Self { source, kind }
	}

	pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
		self.source.get(key)
	}

	/// Nested object at `key`.
	pub(crate) fn nested(&self, key: &str) -> Self {
		Self { source: self.get(key).unwrap_or(&Value::Null), kind: self.kind }
	}

	/// String field; missing or null reads as empty, scalars are rendered.
	pub(crate) fn text(&self, key: &str) -> String {
		match self.get(key) {
			None | Some(Value::Null) => String::new(),
			Some(Value::String(text)) => text.trim().to_owned(),
			Some(Value::Number(number)) => number.to_string(),
			Some(Value::Bool(flag)) => flag.to_string(),
			Some(other) => {
				obs::warn_payload(self.kind, format_args!("field `{key}` is not text: {other}"));

				String::new()
			},
		}
	}

	pub(crate) fn numeric(&self, key: &str) -> Numeric {
		Numeric::parse(self.get(key))
	}

	/// Numeric field; missing reads as zero, malformed reads as zero and is logged.
	pub(crate) fn number(&self, key: &str) -> f64 {
		let numeric = self.numeric(key);

		if numeric.is_malformed() {
			obs::warn_payload(self.kind, format_args!("field `{key}` is not numeric; using 0"));
		}

		numeric.or_zero()
	}

	/// Non-negative integer field, saturating fractional or negative input to the nearest valid
	/// count.
	pub(crate) fn count(&self, key: &str) -> u64 {
		let value = self.number(key);

		if value <= 0.0 { 0 } else { value as u64 }
	}
}

/// Elements of the array at `value`; a lone object is promoted to a one-element list.
pub(crate) fn list_or_single(value: Option<&Value>) -> Vec<&Value> {
	match value {
		Some(Value::Array(items)) => items.iter().collect(),
		Some(object @ Value::Object(_)) => vec![object],
		_ => Vec::new(),
	}
}
