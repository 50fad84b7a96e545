//! Payload normalizers mapping provider JSON into canonical records.
//!
//! Normalizers are pure functions of their inputs: the same payload always yields the same
//! record. Single-object payloads default missing fields (`0` or `""`). Time-series payloads
//! keep only points with a non-empty date, a strictly positive close, and no malformed numeric
//! field. Multi-candidate lookups keep the first candidate and report an empty candidate list
//! as [`Error::NotFound`].

pub mod brokerage;
pub mod crypto;
pub mod location;

mod coerce;

// self
use crate::{
	_prelude::*,
	normalize::coerce::{Fields, Numeric},
	obs,
	record::CanonicalCandle,
};

/// Source field names of one candle layout.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CandleLayout {
	pub kind: &'static str,
	pub label: &'static str,
	pub open: &'static str,
	pub high: &'static str,
	pub low: &'static str,
	pub close: &'static str,
	pub volume: &'static str,
	pub turnover: Option<&'static str>,
}

/// Validates raw points in provider order and keeps at most `limit` valid candles.
pub(crate) fn collect_candles<'a, I>(
	items: I,
	layout: CandleLayout,
	limit: usize,
) -> Vec<CanonicalCandle>
where
	I: IntoIterator<Item = &'a Value>,
{
	let mut candles = Vec::new();

	for (position, item) in items.into_iter().enumerate() {
		if candles.len() >= limit {
			break;
		}

		match candle(Fields::new(item, layout.kind), layout) {
			Ok(candle) => candles.push(candle),
			Err(reason) =>
				obs::warn_payload(layout.kind, format_args!("dropped point #{position}: {reason}")),
		}
	}

	candles
}

fn candle(fields: Fields, layout: CandleLayout) -> Result<CanonicalCandle, String> {
	let label = fields.text(layout.label);

	if label.is_empty() {
		return Err("empty date".into());
	}

	let numeric = |key: &'static str| match fields.numeric(key) {
		Numeric::Malformed => Err(format!("field `{key}` is not numeric")),
		value => Ok(value.or_zero()),
	};
	let open = numeric(layout.open)?;
	let high = numeric(layout.high)?;
	let low = numeric(layout.low)?;
	let close = numeric(layout.close)?;
	let volume = numeric(layout.volume)?;
	let turnover = layout.turnover.map(&numeric).transpose()?;

	if close <= 0.0 {
		return Err(format!("non-positive close {close}"));
	}

	Ok(CanonicalCandle { label, open, high, low, close, volume, turnover })
}
