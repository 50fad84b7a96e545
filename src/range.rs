//! Default date windows for time-series queries.
//!
//! [`resolve_range`] is pure: given the same `today`, granularity, and count it always yields the
//! same window, padded with [`BUFFER_DAYS`] so holidays and weekends still leave enough points.

// crates.io
use time::{
	format_description::BorrowedFormatItem,
	macros::{date, format_description},
};
// self
use crate::{_prelude::*, error::ConfigError};

/// Extra days added to every derived window.
pub const BUFFER_DAYS: i64 = 10;
/// Earliest date a derived window may start on; every later date renders as 8 digits.
pub const EARLIEST_DATE: Date = date!(0001 - 01 - 01);

const YYYYMMDD: &[BorrowedFormatItem<'_>] = format_description!("[year][month][day]");

/// Sampling period of a chart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodGranularity {
	/// One point per trading day.
	#[default]
	Day,
	/// One point per week.
	Week,
	/// One point per month.
	Month,
	/// One point per year.
	Year,
}
impl PeriodGranularity {
	/// Calendar days covered by one point.
	pub const fn unit_days(self) -> i64 {
		match self {
			Self::Day => 1,
			Self::Week => 7,
			Self::Month => 30,
			Self::Year => 365,
		}
	}

	/// Provider period code (`FID_PERIOD_DIV_CODE`).
	pub const fn code(self) -> &'static str {
		match self {
			Self::Day => "D",
			Self::Week => "W",
			Self::Month => "M",
			Self::Year => "Y",
		}
	}

	/// Lowercase label used in records.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Day => "day",
			Self::Week => "week",
			Self::Month => "month",
			Self::Year => "year",
		}
	}
}
impl Display for PeriodGranularity {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for PeriodGranularity {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"day" | "d" => Ok(Self::Day),
			"week" | "w" => Ok(Self::Week),
			"month" | "m" => Ok(Self::Month),
			"year" | "y" => Ok(Self::Year),
			_ => Err(ConfigError::InvalidSetting { field: "period", value: s.to_owned() }),
		}
	}
}

/// Inclusive calendar window sent to the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DateRange {
	/// First date of the window.
	pub start: Date,
	/// Last date of the window.
	pub end: Date,
}
impl DateRange {
	/// Start date rendered as `YYYYMMDD`.
	pub fn start_label(&self) -> Result<String, ConfigError> {
		format_yyyymmdd(self.start)
	}

	/// End date rendered as `YYYYMMDD`.
	pub fn end_label(&self) -> Result<String, ConfigError> {
		format_yyyymmdd(self.end)
	}
}

/// Resolves the chart window, deriving whatever bound the caller left out.
///
/// Explicit bounds are used unmodified. A missing end is `today`; a missing start lies
/// `count * unit_days + BUFFER_DAYS` days before the end, but never before [`EARLIEST_DATE`].
pub fn resolve_range(
	today: Date,
	granularity: PeriodGranularity,
	count: u32,
	start: Option<Date>,
	end: Option<Date>,
) -> DateRange {
	let end = end.unwrap_or(today);
	let start = start.unwrap_or_else(|| {
		let span = i64::from(count) * granularity.unit_days() + BUFFER_DAYS;

		end.checked_sub(time::Duration::days(span))
			.map_or(EARLIEST_DATE, |start| start.max(EARLIEST_DATE))
	});

	DateRange { start, end }
}

/// Renders `date` as `YYYYMMDD`; years outside `0..=9999` have no 8-digit form.
pub fn format_yyyymmdd(date: Date) -> Result<String, ConfigError> {
	let invalid = || ConfigError::InvalidDate { value: date.to_string() };

	if !(0..=9999).contains(&date.year()) {
		return Err(invalid());
	}

	date.format(YYYYMMDD).map_err(|_| invalid())
}

/// Parses an 8-digit `YYYYMMDD` date.
pub fn parse_yyyymmdd(value: &str) -> Result<Date, ConfigError> {
	let trimmed = value.trim();
	let invalid = || ConfigError::InvalidDate { value: value.to_owned() };

	if trimmed.len() != 8 || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
		return Err(invalid());
	}

	Date::parse(trimmed, YYYYMMDD).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::date;
	// self
	use super::*;

	#[test]
	fn day_window_covers_count_plus_buffer() {
		let range = resolve_range(date!(2024 - 09 - 20), PeriodGranularity::Day, 30, None, None);

		assert_eq!(range.end, date!(2024 - 09 - 20));
		assert_eq!(range.start, date!(2024 - 08 - 11));
		assert_eq!((range.end - range.start).whole_days(), 40);
		assert_eq!(range.start_label().expect("Start should render.").as_str(), "20240811");
		assert_eq!(range.end_label().expect("End should render.").as_str(), "20240920");
	}

	#[test]
	fn resolution_is_deterministic_for_every_granularity() {
		let today = date!(2024 - 03 - 01);

		for (granularity, span) in [
			(PeriodGranularity::Day, 20),
			(PeriodGranularity::Week, 80),
			(PeriodGranularity::Month, 310),
			(PeriodGranularity::Year, 3_660),
		] {
			let first = resolve_range(today, granularity, 10, None, None);
			let second = resolve_range(today, granularity, 10, None, None);

			assert_eq!(first, second);
			assert_eq!((first.end - first.start).whole_days(), span, "{granularity}");
		}
	}

	#[test]
	fn explicit_bounds_are_respected() {
		let today = date!(2024 - 09 - 20);
		let start = date!(2024 - 01 - 02);
		let end = date!(2024 - 06 - 28);

		assert_eq!(
			resolve_range(today, PeriodGranularity::Week, 5, Some(start), Some(end)),
			DateRange { start, end }
		);
		assert_eq!(
			resolve_range(today, PeriodGranularity::Day, 5, None, Some(end)).start,
			date!(2024 - 06 - 13)
		);
		assert_eq!(resolve_range(today, PeriodGranularity::Day, 5, Some(start), None).end, today);
	}

	#[test]
	fn yyyymmdd_parsing_rejects_garbage() {
		assert_eq!(parse_yyyymmdd("20240229").expect("Leap day should parse."), date!(2024 - 02 - 29));
		assert!(matches!(parse_yyyymmdd("20230229"), Err(ConfigError::InvalidDate { .. })));
		assert!(parse_yyyymmdd("2024-02-29").is_err());
		assert!(parse_yyyymmdd("202402").is_err());
		assert_eq!(
			format_yyyymmdd(date!(2024 - 01 - 05)).expect("Date should render.").as_str(),
			"20240105"
		);
	}

	#[test]
	fn granularity_parses_labels_and_codes() {
		assert_eq!("Week".parse::<PeriodGranularity>().ok(), Some(PeriodGranularity::Week));
		assert_eq!("Y".parse::<PeriodGranularity>().ok(), Some(PeriodGranularity::Year));
		assert!("hour".parse::<PeriodGranularity>().is_err());
		assert_eq!(PeriodGranularity::Month.code(), "M");
	}

	#[test]
	fn oversized_counts_clamp_to_an_eight_digit_start() {
		let range =
			resolve_range(date!(2024 - 09 - 20), PeriodGranularity::Year, u32::MAX, None, None);

		assert_eq!(range.start, EARLIEST_DATE);
		assert_eq!(range.start_label().expect("Earliest date should render.").as_str(), "00010101");
		assert!(matches!(format_yyyymmdd(Date::MIN), Err(ConfigError::InvalidDate { .. })));
	}
}
