//! Geocoding and routing payloads: address lookups, place searches, POIs, and routes.

// self
use crate::{
	_prelude::*,
	classify,
	codes::PlaceCategory,
	normalize::coerce::{self, Fields},
	obs,
	record::{
		Place, PlaceSearchPage, PlaceSummary, PoiPage, PointOfInterest, Route, RoutePoint,
		RouteSummary,
	},
};

/// Maps an address search into its first candidate; no candidate is [`Error::NotFound`].
pub fn address(payload: &Value, query: &str) -> Result<Place> {
	let documents = classify::require_candidates(payload, "/documents", query)?;
	let first = Fields::new(&documents[0], "location.address");
	let road = first.nested("road_address");
	let lot = first.nested("address");

	Ok(Place {
		query: query.to_owned(),
		road_address: road.text("address_name"),
		lot_address: lot.text("address_name"),
		latitude: first.number("y"),
		longitude: first.number("x"),
		address_type: first.text("address_type"),
		building_name: road.text("building_name"),
		region: region(lot),
		zone_no: road.text("zone_no"),
	})
}

/// Maps a coordinate-to-address lookup into its first candidate.
///
/// The provider does not echo coordinates back, so the queried ones are recorded.
pub fn coordinate_address(payload: &Value, latitude: f64, longitude: f64) -> Result<Place> {
	let query = format!("{latitude},{longitude}");
	let documents = classify::require_candidates(payload, "/documents", &query)?;
	let first = Fields::new(&documents[0], "location.coordinate_address");
	let road = first.nested("road_address");
	let lot = first.nested("address");

	Ok(Place {
		query,
		road_address: road.text("address_name"),
		lot_address: lot.text("address_name"),
		latitude,
		longitude,
		address_type: String::new(),
		building_name: road.text("building_name"),
		region: region(lot),
		zone_no: road.text("zone_no"),
	})
}

fn region(lot: Fields) -> [String; 3] {
	["region_1depth_name", "region_2depth_name", "region_3depth_name"].map(|key| lot.text(key))
}

/// Maps one page of a keyword search; an empty page is a valid result.
pub fn keyword_page(payload: &Value, keyword: &str) -> PlaceSearchPage {
	place_page(payload, keyword, None)
}

/// Maps one page of a category search, naming the category from the static code table.
pub fn category_page(payload: &Value, code: &str) -> PlaceSearchPage {
	place_page(payload, code, Some(PlaceCategory::display_name(code)))
}

fn place_page(payload: &Value, query: &str, category_name: Option<String>) -> PlaceSearchPage {
	let fields = Fields::new(payload, "location.places");
	let places = coerce::list_or_single(fields.get("documents"))
		.into_iter()
		.map(|document| {
			let place = Fields::new(document, "location.places");

			PlaceSummary {
				name: place.text("place_name"),
				address: place.text("address_name"),
				road_address: place.text("road_address_name"),
				phone: place.text("phone"),
				latitude: place.number("y"),
				longitude: place.number("x"),
				category: place.text("category_name"),
				url: place.text("place_url"),
				distance: place.number("distance"),
			}
		})
		.collect();

	PlaceSearchPage {
		query: query.to_owned(),
		category_name,
		total_count: fields.nested("meta").count("total_count"),
		places,
	}
}

/// Maps a POI search page; a single POI object is treated as a one-element list.
pub fn poi_page(payload: &Value, keyword: &str) -> PoiPage {
	let info = Fields::new(payload, "location.poi").nested("searchPoiInfo");
	let pois = coerce::list_or_single(info.nested("pois").get("poi"))
		.into_iter()
		.map(|poi| {
			let poi = Fields::new(poi, "location.poi");
			let address = ["upperAddrName", "middleAddrName", "lowerAddrName", "detailAddrName"]
				.into_iter()
				.map(|key| poi.text(key))
				.filter(|part| !part.is_empty())
				.collect::<Vec<_>>()
				.join(" ");
			let business = ["lowerBizName", "middleBizName", "upperBizName"]
				.into_iter()
				.map(|key| poi.text(key))
				.find(|name| !name.is_empty())
				.unwrap_or_default();

			PointOfInterest {
				name: poi.text("name"),
				phone: poi.text("telNo"),
				latitude: poi.number("frontLat"),
				longitude: poi.number("frontLon"),
				address,
				road_name: poi.text("roadName"),
				business,
			}
		})
		.collect();

	PoiPage { query: keyword.to_owned(), total_count: info.count("totalCount"), pois }
}

/// Maps a route response: totals from the first feature that carries them, geometry from
/// every `LineString` feature in order.
pub fn route(payload: &Value) -> Route {
	let features = coerce::list_or_single(payload.get("features"));
	let mut summary = None;
	let mut points = Vec::new();

	for feature in features {
		let properties = Fields::new(feature, "location.route").nested("properties");
		let geometry = Fields::new(feature, "location.route").nested("geometry");

		if summary.is_none() && properties.get("totalDistance").is_some() {
			summary = Some(RouteSummary {
				total_distance: properties.number("totalDistance"),
				total_time: properties.number("totalTime"),
				total_fare: properties.number("totalFare"),
				taxi_fare: properties.number("taxiFare"),
			});
		}
		if geometry.text("type") != "LineString" {
			continue;
		}

		let coordinates = geometry.get("coordinates").and_then(Value::as_array);

		for (index, coordinate) in coordinates.into_iter().flatten().enumerate() {
			let Some((longitude, latitude)) = lon_lat(coordinate) else {
				obs::warn_payload(
					"location.route",
					format_args!("dropped vertex #{index} with malformed coordinate {coordinate}"),
				);

				continue;
			};

			points.push(RoutePoint {
				index,
				longitude,
				latitude,
				instruction: properties.text("description"),
				road_name: properties.text("name"),
				distance: properties.number("distance"),
				time: properties.number("time"),
			});
		}
	}

	Route { summary: summary.unwrap_or_default(), points }
}

fn lon_lat(coordinate: &Value) -> Option<(f64, f64)> {
	match coordinate.as_array()?.as_slice() {
		[lon, lat, ..] => Some((lon.as_f64()?, lat.as_f64()?)),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn address_takes_first_candidate() {
		let payload = json!({
			"meta": { "total_count": 2 },
			"documents": [
				{
					"address_type": "ROAD_ADDR",
					"x": "127.0276",
					"y": "37.4979",
					"address": { "address_name": "서울 강남구 역삼동 858" },
					"road_address": { "address_name": "서울 강남구 강남대로 396" }
				},
				{ "address_type": "REGION", "x": "0", "y": "0" }
			]
		});
		let place = address(&payload, "강남대로 396").expect("First candidate should be used.");

		assert_eq!(place.road_address, "서울 강남구 강남대로 396");
		assert_eq!(place.lot_address, "서울 강남구 역삼동 858");
		assert_eq!(place.latitude, 37.4979);
		assert_eq!(place.longitude, 127.0276);
		assert_eq!(place.address_type, "ROAD_ADDR");
	}

	#[test]
	fn empty_address_lookup_is_not_found() {
		let payload = json!({ "meta": { "total_count": 0 }, "documents": [] });

		assert!(matches!(address(&payload, "nowhere"), Err(Error::NotFound { .. })));
		assert!(matches!(coordinate_address(&payload, 37.5, 127.0), Err(Error::NotFound { .. })));
	}

	#[test]
	fn coordinate_lookup_without_road_address_keeps_lot_address() {
		let payload = json!({
			"documents": [{ "road_address": null, "address": { "address_name": "제주 서귀포시 1" } }]
		});
		let place = coordinate_address(&payload, 33.25, 126.56).expect("Candidate should map.");

		assert_eq!(place.road_address, "");
		assert_eq!(place.lot_address, "제주 서귀포시 1");
		assert_eq!(place.address_type, "");
		assert_eq!(place.building_name, "");
		assert_eq!(place.query, "33.25,126.56");
	}

	#[test]
	fn coordinate_lookup_carries_building_region_and_zone() {
		let payload = json!({
			"meta": { "total_count": 1 },
			"documents": [{
				"road_address": {
					"address_name": "서울 중구 세종대로 110",
					"building_name": "서울특별시청",
					"zone_no": "04524"
				},
				"address": {
					"address_name": "서울 중구 태평로1가 31",
					"region_1depth_name": "서울",
					"region_2depth_name": "중구",
					"region_3depth_name": "태평로1가"
				}
			}]
		});
		let place = coordinate_address(&payload, 37.5663, 126.9779).expect("Candidate should map.");

		assert_eq!(place.road_address, "서울 중구 세종대로 110");
		assert_eq!(place.building_name, "서울특별시청");
		assert_eq!(place.zone_no, "04524");
		assert_eq!(place.region, ["서울".to_owned(), "중구".to_owned(), "태평로1가".to_owned()]);
		assert_eq!((place.latitude, place.longitude), (37.5663, 126.9779));
	}

	#[test]
	fn category_page_names_known_codes() {
		let payload = json!({
			"meta": { "total_count": 31 },
			"documents": [{ "place_name": "카페 A", "x": "127.1", "y": "37.1", "distance": "120" }]
		});
		let page = category_page(&payload, "CE7");

		assert_eq!(page.category_name.as_deref(), Some("카페"));
		assert_eq!(page.total_count, 31);
		assert_eq!(page.places[0].distance, 120.0);
		assert_eq!(category_page(&payload, "XX1").category_name.as_deref(), Some("XX1"));
		assert!(keyword_page(&json!({ "documents": [] }), "none").places.is_empty());
	}

	#[test]
	fn single_poi_object_becomes_one_element_list() {
		let payload = json!({
			"searchPoiInfo": {
				"totalCount": "1",
				"pois": { "poi": {
					"name": "서울역",
					"frontLat": "37.5547",
					"frontLon": "126.9706",
					"upperAddrName": "서울",
					"middleAddrName": "중구",
					"lowerAddrName": "봉래동2가",
					"middleBizName": "교통시설"
				} }
			}
		});
		let page = poi_page(&payload, "서울역");

		assert_eq!(page.total_count, 1);
		assert_eq!(page.pois.len(), 1);
		assert_eq!(page.pois[0].address, "서울 중구 봉래동2가");
		assert_eq!(page.pois[0].business, "교통시설");
	}

	#[test]
	fn route_collects_summary_and_line_string_vertices() {
		let payload = json!({
			"type": "FeatureCollection",
			"features": [
				{
					"geometry": { "type": "Point", "coordinates": [127.0, 37.0] },
					"properties": { "totalDistance": 1200, "totalTime": 300, "totalFare": 0, "taxiFare": 4800 }
				},
				{
					"geometry": { "type": "LineString", "coordinates": [[127.0, 37.0], ["bad"], [127.01, 37.01]] },
					"properties": { "description": "강남대로 따라 이동", "name": "강남대로", "distance": 1200, "time": 300 }
				}
			]
		});
		let computed = route(&payload);

		assert_eq!(computed.summary.total_distance, 1200.0);
		assert_eq!(computed.summary.taxi_fare, 4800.0);
		assert_eq!(computed.points.len(), 2);
		assert_eq!(computed.points[1].index, 2);
		assert_eq!(computed.points[1].road_name, "강남대로");
		assert_eq!(computed, route(&payload));
	}
}
