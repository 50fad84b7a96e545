//! Crypto exchange payloads: ticker snapshots and candle lists.

// self
use crate::{
	_prelude::*,
	classify,
	normalize::{CandleLayout, coerce::Fields, collect_candles},
	record::{CanonicalCandle, CanonicalQuote},
};

const CANDLE_LAYOUT: CandleLayout = CandleLayout {
	kind: "crypto.candles",
	label: "candle_date_time_kst",
	open: "opening_price",
	high: "high_price",
	low: "low_price",
	close: "trade_price",
	volume: "candle_acc_trade_volume",
	turnover: Some("candle_acc_trade_price"),
};

/// Maps a ticker list into a quote for its first entry.
///
/// `market` is the requested pair (`KRW-BTC`); an empty list is [`Error::NotFound`].
pub fn ticker(payload: &Value, market: &str) -> Result<CanonicalQuote> {
	let entries = classify::require_candidates(payload, "", market)?;
	let entry = Fields::new(&entries[0], "crypto.ticker");
	let pair = match entry.text("market") {
		pair if pair.is_empty() => market.to_owned(),
		pair => pair,
	};
	let (currency, name) = match pair.split_once('-') {
		Some((quote, base)) => (quote.to_owned(), base.to_owned()),
		None => (String::new(), pair.clone()),
	};

	Ok(CanonicalQuote {
		symbol: pair,
		name,
		current_price: entry.number("trade_price"),
		open_price: entry.number("opening_price"),
		high_price: entry.number("high_price"),
		low_price: entry.number("low_price"),
		prev_close_price: entry.number("prev_closing_price"),
		change_price: entry.number("change_price"),
		change_rate: entry.number("change_rate"),
		change_sign: entry.text("change"),
		volume: entry.number("acc_trade_volume_24h"),
		turnover: entry.number("acc_trade_price_24h"),
		market: currency.clone(),
		currency,
		exchange: String::new(),
	})
}

/// Maps a candle list (most recent first) into at most `count` validated candles.
pub fn candles(payload: &Value, count: usize) -> Vec<CanonicalCandle> {
	collect_candles(payload.as_array().into_iter().flatten(), CANDLE_LAYOUT, count)
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn ticker_maps_first_entry() {
		let payload = json!([{
			"market": "KRW-BTC",
			"trade_price": 90_000_000.0,
			"opening_price": 89_000_000.0,
			"high_price": 91_000_000.0,
			"low_price": 88_500_000.0,
			"prev_closing_price": 89_500_000.0,
			"change": "RISE",
			"change_price": 500_000.0,
			"change_rate": 0.0055,
			"acc_trade_volume_24h": 1234.5,
			"acc_trade_price_24h": 111_111_111_111.0
		}]);
		let quote = ticker(&payload, "KRW-BTC").expect("Non-empty ticker list should normalize.");

		assert_eq!(quote.symbol, "KRW-BTC");
		assert_eq!(quote.name, "BTC");
		assert_eq!(quote.currency, "KRW");
		assert_eq!(quote.current_price, 90_000_000.0);
		assert_eq!(quote.change_sign, "RISE");
		assert_eq!(quote.volume, 1234.5);
	}

	#[test]
	fn empty_ticker_list_is_not_found() {
		let err = ticker(&json!([]), "KRW-XYZ").expect_err("Empty ticker list should fail.");

		assert!(matches!(err, Error::NotFound { ref query } if query == "KRW-XYZ"));
	}

	#[test]
	fn candles_carry_turnover_and_skip_invalid_points() {
		let payload = json!([
			{ "candle_date_time_kst": "2024-09-20T09:00:00", "opening_price": 1.0, "high_price": 2.0, "low_price": 0.5, "trade_price": 1.5, "candle_acc_trade_volume": 10.0, "candle_acc_trade_price": 15.0 },
			{ "candle_date_time_kst": "2024-09-19T09:00:00", "trade_price": 0 },
			{ "candle_date_time_kst": null, "trade_price": 1.2 }
		]);
		let bars = candles(&payload, 10);

		assert_eq!(bars.len(), 1);
		assert_eq!(bars[0].turnover, Some(15.0));
		assert!(candles(&json!({ "error": "bad" }), 10).is_empty());
	}
}
