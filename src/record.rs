//! Canonical records returned to callers.
//!
//! Every record is a plain value object: provider field names never leak past the normalizers,
//! numeric fields are already coerced, and missing values have been defaulted.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	range::{DateRange, PeriodGranularity, parse_yyyymmdd},
};

/// Point-in-time quote for one instrument.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CanonicalQuote {
	/// Provider symbol (ticker, stock code, or market pair).
	pub symbol: String,
	/// Display name.
	pub name: String,
	/// Last traded price.
	pub current_price: f64,
	/// Session open.
	pub open_price: f64,
	/// Session high.
	pub high_price: f64,
	/// Session low.
	pub low_price: f64,
	/// Previous session close.
	pub prev_close_price: f64,
	/// Absolute change against the previous close.
	pub change_price: f64,
	/// Relative change in percent (or ratio, for providers that report one).
	pub change_rate: f64,
	/// Provider change-direction marker.
	pub change_sign: String,
	/// Accumulated volume.
	pub volume: f64,
	/// Accumulated traded value.
	pub turnover: f64,
	/// Quote currency.
	pub currency: String,
	/// Market label the caller asked for.
	pub market: String,
	/// Provider exchange code, when the venue needs one.
	pub exchange: String,
}

/// One bar of a time series.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CanonicalCandle {
	/// Date (`YYYYMMDD`) or timestamp label of the bar.
	pub label: String,
	/// Opening price.
	pub open: f64,
	/// High price.
	pub high: f64,
	/// Low price.
	pub low: f64,
	/// Closing price; always strictly positive.
	pub close: f64,
	/// Traded volume.
	pub volume: f64,
	/// Traded value, for providers that report it.
	pub turnover: Option<f64>,
}

/// Validated chart for one instrument, most recent bar first.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSeries {
	/// Requested symbol.
	pub symbol: String,
	/// Display name reported alongside the series.
	pub name: String,
	/// Bar granularity.
	pub granularity: PeriodGranularity,
	/// Window sent to the provider.
	pub range: DateRange,
	/// Number of bars kept; always `candles.len()`.
	pub count: usize,
	/// Valid bars, most recent first.
	pub candles: Vec<CanonicalCandle>,
}

/// Chart request parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartQuery {
	/// Instrument code.
	pub symbol: String,
	/// Bar granularity.
	pub granularity: PeriodGranularity,
	/// Maximum number of bars to return.
	pub count: u32,
	/// Explicit first date, if any.
	pub start: Option<Date>,
	/// Explicit last date, if any.
	pub end: Option<Date>,
	/// Request split/dividend adjusted prices.
	pub adjusted: bool,
}
impl ChartQuery {
	/// Default number of bars.
	pub const DEFAULT_COUNT: u32 = 30;

	/// Creates a daily query for the last [`Self::DEFAULT_COUNT`] bars of adjusted prices.
	pub fn new(symbol: impl Into<String>) -> Self {
		Self {
			symbol: symbol.into(),
			granularity: PeriodGranularity::Day,
			count: Self::DEFAULT_COUNT,
			start: None,
			end: None,
			adjusted: true,
		}
	}

	/// Sets the bar granularity.
	pub fn granularity(mut self, granularity: PeriodGranularity) -> Self {
		self.granularity = granularity;

		self
	}

	/// Sets the maximum number of bars.
	pub fn count(mut self, count: u32) -> Self {
		self.count = count;

		self
	}

	/// Pins the first date of the window.
	pub fn start(mut self, start: Date) -> Self {
		self.start = Some(start);

		self
	}

	/// Pins the last date of the window.
	pub fn end(mut self, end: Date) -> Self {
		self.end = Some(end);

		self
	}

	/// Pins both bounds from `YYYYMMDD` labels.
	pub fn between(self, start: &str, end: &str) -> Result<Self, ConfigError> {
		Ok(self.start(parse_yyyymmdd(start)?).end(parse_yyyymmdd(end)?))
	}

	/// Chooses between adjusted and raw prices.
	pub fn adjusted(mut self, adjusted: bool) -> Self {
		self.adjusted = adjusted;

		self
	}
}

/// Geocoded address.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Place {
	/// Address or coordinate the caller looked up.
	pub query: String,
	/// Road-name address.
	pub road_address: String,
	/// Lot-number address.
	pub lot_address: String,
	/// Latitude (WGS84).
	pub latitude: f64,
	/// Longitude (WGS84).
	pub longitude: f64,
	/// Provider address classification; the coordinate lookup does not report one.
	pub address_type: String,
	/// Building name attached to the road address.
	pub building_name: String,
	/// Administrative region names, widest first (province, city, neighborhood).
	pub region: [String; 3],
	/// Postal zone number of the road address.
	pub zone_no: String,
}

/// One entry of a keyword or category search.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PlaceSummary {
	/// Place name.
	pub name: String,
	/// Lot-number address.
	pub address: String,
	/// Road-name address.
	pub road_address: String,
	/// Phone number.
	pub phone: String,
	/// Latitude (WGS84).
	pub latitude: f64,
	/// Longitude (WGS84).
	pub longitude: f64,
	/// Provider category path.
	pub category: String,
	/// Detail page URL.
	pub url: String,
	/// Distance from the search origin in meters; zero without an origin.
	pub distance: f64,
}

/// One page of place search results.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PlaceSearchPage {
	/// Keyword or category code searched.
	pub query: String,
	/// Human-readable category name for category searches.
	pub category_name: Option<String>,
	/// Total matches reported by the provider.
	pub total_count: u64,
	/// Entries of this page.
	pub places: Vec<PlaceSummary>,
}

/// Point of interest from the routing provider's search.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PointOfInterest {
	/// POI name.
	pub name: String,
	/// Phone number.
	pub phone: String,
	/// Latitude of the entrance.
	pub latitude: f64,
	/// Longitude of the entrance.
	pub longitude: f64,
	/// Address assembled from the provider's address parts.
	pub address: String,
	/// Road name.
	pub road_name: String,
	/// Most specific business classification.
	pub business: String,
}

/// One page of POI results.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PoiPage {
	/// Keyword searched.
	pub query: String,
	/// Total matches reported by the provider.
	pub total_count: u64,
	/// Entries of this page.
	pub pois: Vec<PointOfInterest>,
}

/// Totals of a computed route.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct RouteSummary {
	/// Total distance in meters.
	pub total_distance: f64,
	/// Total travel time in seconds.
	pub total_time: f64,
	/// Toll fare.
	pub total_fare: f64,
	/// Estimated taxi fare.
	pub taxi_fare: f64,
}

/// One vertex of a route geometry.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RoutePoint {
	/// Position of the vertex inside its segment.
	pub index: usize,
	/// Longitude (WGS84).
	pub longitude: f64,
	/// Latitude (WGS84).
	pub latitude: f64,
	/// Guidance text of the segment.
	pub instruction: String,
	/// Road name of the segment.
	pub road_name: String,
	/// Segment distance in meters.
	pub distance: f64,
	/// Segment travel time in seconds.
	pub time: f64,
}

/// Route totals plus its geometry.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Route {
	/// Totals; zero when the provider omitted them.
	pub summary: RouteSummary,
	/// Geometry vertices in travel order.
	pub points: Vec<RoutePoint>,
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::date;
	// self
	use super::*;

	#[test]
	fn chart_query_defaults_and_label_bounds() {
		let query = ChartQuery::new("005930");

		assert_eq!(query.granularity, PeriodGranularity::Day);
		assert_eq!(query.count, 30);
		assert!(query.adjusted);

		let query = query
			.count(5)
			.adjusted(false)
			.between("20240102", "20240628")
			.expect("Label bounds should parse.");

		assert_eq!(query.start, Some(date!(2024 - 01 - 02)));
		assert_eq!(query.end, Some(date!(2024 - 06 - 28)));
		assert!(!query.adjusted);
		assert!(ChartQuery::new("005930").between("2024", "20240628").is_err());
	}
}
