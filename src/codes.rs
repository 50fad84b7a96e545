//! Static provider code tables.
//!
//! Both tables are closed enumerations. Lookups that miss return the caller's input unchanged
//! instead of substituting a default venue or category.

// self
use crate::_prelude::*;

/// Foreign exchanges reachable through the brokerage quote endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExchangeCode {
	/// NASDAQ.
	Nasdaq,
	/// New York Stock Exchange.
	Nyse,
	/// NYSE American.
	Amex,
}
impl ExchangeCode {
	/// Every known exchange.
	pub const ALL: [Self; 3] = [Self::Nasdaq, Self::Nyse, Self::Amex];

	/// Market label used by callers.
	pub const fn label(self) -> &'static str {
		match self {
			Self::Nasdaq => "NASDAQ",
			Self::Nyse => "NYSE",
			Self::Amex => "AMEX",
		}
	}

	/// Provider exchange code (`EXCD`).
	pub const fn code(self) -> &'static str {
		match self {
			Self::Nasdaq => "NAS",
			Self::Nyse => "NYS",
			Self::Amex => "AMS",
		}
	}

	/// Looks up an exchange by its market label, ignoring case.
	pub fn from_label(label: &str) -> Option<Self> {
		let label = label.trim();

		Self::ALL.into_iter().find(|exchange| exchange.label().eq_ignore_ascii_case(label))
	}

	/// Maps a market label to its provider code; unknown labels pass through unchanged.
	pub fn resolve(label: &str) -> String {
		Self::from_label(label).map_or_else(|| label.to_owned(), |exchange| exchange.code().to_owned())
	}
}
impl Display for ExchangeCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.label())
	}
}

/// Place category codes of the geocoding provider's category search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaceCategory {
	/// `MT1`
	Supermarket,
	/// `CS2`
	ConvenienceStore,
	/// `PS3`
	Kindergarten,
	/// `SC4`
	School,
	/// `AC5`
	Academy,
	/// `PK6`
	Parking,
	/// `OL7`
	GasStation,
	/// `SW8`
	SubwayStation,
	/// `BK9`
	Bank,
	/// `CT1`
	CulturalFacility,
	/// `AG2`
	RealEstateAgency,
	/// `PO3`
	PublicInstitution,
	/// `AT4`
	TouristAttraction,
	/// `AD5`
	Accommodation,
	/// `FD6`
	Restaurant,
	/// `CE7`
	Cafe,
	/// `HP8`
	Hospital,
	/// `PM9`
	Pharmacy,
}
impl PlaceCategory {
	/// Every known category.
	pub const ALL: [Self; 18] = [
		Self::Supermarket,
		Self::ConvenienceStore,
		Self::Kindergarten,
		Self::School,
		Self::Academy,
		Self::Parking,
		Self::GasStation,
		Self::SubwayStation,
		Self::Bank,
		Self::CulturalFacility,
		Self::RealEstateAgency,
		Self::PublicInstitution,
		Self::TouristAttraction,
		Self::Accommodation,
		Self::Restaurant,
		Self::Cafe,
		Self::Hospital,
		Self::Pharmacy,
	];

	/// Provider category code.
	pub const fn code(self) -> &'static str {
		match self {
			Self::Supermarket => "MT1",
			Self::ConvenienceStore => "CS2",
			Self::Kindergarten => "PS3",
			Self::School => "SC4",
			Self::Academy => "AC5",
			Self::Parking => "PK6",
			Self::GasStation => "OL7",
			Self::SubwayStation => "SW8",
			Self::Bank => "BK9",
			Self::CulturalFacility => "CT1",
			Self::RealEstateAgency => "AG2",
			Self::PublicInstitution => "PO3",
			Self::TouristAttraction => "AT4",
			Self::Accommodation => "AD5",
			Self::Restaurant => "FD6",
			Self::Cafe => "CE7",
			Self::Hospital => "HP8",
			Self::Pharmacy => "PM9",
		}
	}

	/// Provider display name.
	pub const fn name(self) -> &'static str {
		match self {
			Self::Supermarket => "대형마트",
			Self::ConvenienceStore => "편의점",
			Self::Kindergarten => "어린이집",
			Self::School => "학교",
			Self::Academy => "학원",
			Self::Parking => "주차장",
			Self::GasStation => "주유소",
			Self::SubwayStation => "지하철역",
			Self::Bank => "은행",
			Self::CulturalFacility => "문화시설",
			Self::RealEstateAgency => "중개업소",
			Self::PublicInstitution => "공공기관",
			Self::TouristAttraction => "관광명소",
			Self::Accommodation => "숙박",
			Self::Restaurant => "음식점",
			Self::Cafe => "카페",
			Self::Hospital => "병원",
			Self::Pharmacy => "약국",
		}
	}

	/// Looks up a category by its code, ignoring case.
	pub fn from_code(code: &str) -> Option<Self> {
		let code = code.trim();

		Self::ALL.into_iter().find(|category| category.code().eq_ignore_ascii_case(code))
	}

	/// Maps a category code to its display name; unknown codes pass through unchanged.
	pub fn display_name(code: &str) -> String {
		Self::from_code(code).map_or_else(|| code.to_owned(), |category| category.name().to_owned())
	}
}
impl Display for PlaceCategory {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.code())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn exchange_labels_map_to_codes_and_unknown_passes_through() {
		assert_eq!(ExchangeCode::resolve("NASDAQ"), "NAS");
		assert_eq!(ExchangeCode::resolve("nyse"), "NYS");
		assert_eq!(ExchangeCode::resolve("AMEX"), "AMS");
		assert_eq!(ExchangeCode::resolve("TSE"), "TSE");
		assert_eq!(ExchangeCode::from_label("LSE"), None);
	}

	#[test]
	fn category_table_is_complete_and_unknown_passes_through() {
		for category in PlaceCategory::ALL {
			assert_eq!(PlaceCategory::from_code(category.code()), Some(category));
		}

		assert_eq!(PlaceCategory::display_name("CE7"), "카페");
		assert_eq!(PlaceCategory::display_name("PM9"), "약국");
		assert_eq!(PlaceCategory::display_name("ZZ9"), "ZZ9");
	}
}
