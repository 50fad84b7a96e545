//! Brokerage Open API payloads: domestic quote, foreign quote, and daily item chart.

// self
use crate::{
	_prelude::*,
	codes::ExchangeCode,
	normalize::{CandleLayout, coerce::Fields, collect_candles},
	range::DateRange,
	record::{CanonicalQuote, ChartQuery, ChartSeries},
};

const CHART_LAYOUT: CandleLayout = CandleLayout {
	kind: "brokerage.chart",
	label: "stck_bsop_date",
	open: "stck_oprc",
	high: "stck_hgpr",
	low: "stck_lwpr",
	close: "stck_clpr",
	volume: "acml_vol",
	turnover: Some("acml_tr_pbmn"),
};

/// Maps an `inquire-price` payload into a KRW quote.
pub fn domestic_quote(payload: &Value, symbol: &str, market: &str) -> CanonicalQuote {
	let output = Fields::new(payload, "brokerage.domestic_quote").nested("output");

	CanonicalQuote {
		symbol: symbol.to_owned(),
		name: output.text("hts_kor_isnm"),
		current_price: output.number("stck_prpr"),
		open_price: output.number("stck_oprc"),
		high_price: output.number("stck_hgpr"),
		low_price: output.number("stck_lwpr"),
		prev_close_price: output.number("stck_sdpr"),
		change_price: output.number("prdy_vrss"),
		change_rate: output.number("prdy_ctrt"),
		change_sign: output.text("prdy_vrss_sign"),
		volume: output.number("acml_vol"),
		turnover: output.number("acml_tr_pbmn"),
		currency: "KRW".into(),
		market: market.to_owned(),
		exchange: String::new(),
	}
}

/// Maps an overseas `price` payload into a USD quote.
///
/// `exchange` is the caller's market label (`NASDAQ`, `NYSE`, `AMEX`); the recorded exchange
/// code follows [`ExchangeCode::resolve`].
pub fn foreign_quote(payload: &Value, symbol: &str, exchange: &str) -> CanonicalQuote {
	let output = Fields::new(payload, "brokerage.foreign_quote").nested("output");

	CanonicalQuote {
		symbol: symbol.to_owned(),
		name: output.text("name"),
		current_price: output.number("last"),
		open_price: output.number("open"),
		high_price: output.number("high"),
		low_price: output.number("low"),
		prev_close_price: output.number("base"),
		change_price: output.number("diff"),
		change_rate: output.number("rate"),
		change_sign: output.text("sign"),
		volume: output.number("tvol"),
		turnover: output.number("tamt"),
		currency: "USD".into(),
		market: exchange.to_owned(),
		exchange: ExchangeCode::resolve(exchange),
	}
}

/// Maps an `inquire-daily-itemchartprice` payload into a validated series.
///
/// Points arrive most recent first; invalid points are dropped and the remainder is truncated
/// to `query.count`.
pub fn chart_series(payload: &Value, query: &ChartQuery, range: DateRange) -> ChartSeries {
	let fields = Fields::new(payload, CHART_LAYOUT.kind);
	let points =
		fields.get("output2").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();
	let candles = collect_candles(points, CHART_LAYOUT, query.count as usize);

	ChartSeries {
		symbol: query.symbol.clone(),
		name: fields.nested("output1").text("hts_kor_isnm"),
		granularity: query.granularity,
		range,
		count: candles.len(),
		candles,
	}
}
