//! Entities of the four-level geographic hierarchy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AREA_PER_CAPITA;

use super::{country_info, PlaceRecord};

/// Hierarchy level, country first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Country,
    City,
    District,
    Town,
}

impl Level {
    /// All levels in persistence order.
    pub fn all() -> &'static [Level] {
        &[Level::Country, Level::City, Level::District, Level::Town]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Country => "country",
            Level::City => "city",
            Level::District => "district",
            Level::Town => "town",
        }
    }

    /// Table backing this level.
    pub fn table(&self) -> &'static str {
        match self {
            Level::Country => "countries",
            Level::City => "cities",
            Level::District => "districts",
            Level::Town => "towns",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic point (lat/lon)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Squared Euclidean distance in raw degree space.
    pub fn distance_sq(&self, other: &GeoPoint) -> f64 {
        let dlat = self.lat - other.lat;
        let dlon = self.lon - other.lon;
        dlat * dlat + dlon * dlon
    }
}

/// Derived area. Not a real area estimate, just `population * 0.3` rounded.
pub fn area_from_population(population: i64) -> i64 {
    (population as f64 * AREA_PER_CAPITA).round() as i64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCountry {
    pub geoname_id: i64,
    pub name: String,
    pub ascii_name: String,
    pub alternate_names: String,
    pub iso2: String,
    pub iso3: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub population: i64,
    pub area_sqkm: i64,
    pub continent: Option<String>,
    pub currency_code: Option<String>,
    pub phone_prefix: Option<String>,
    pub timezone: String,
}

impl NewCountry {
    pub fn from_record(record: &PlaceRecord) -> Self {
        let info = country_info(&record.country_code);
        Self {
            geoname_id: record.geoname_id,
            name: record.name.clone(),
            ascii_name: record.ascii_name.clone(),
            alternate_names: record.alternate_names.clone(),
            iso2: record.country_code.clone(),
            iso3: info.map(|i| i.iso3.to_string()),
            latitude: record.latitude,
            longitude: record.longitude,
            population: record.population,
            area_sqkm: area_from_population(record.population),
            continent: info.map(|i| i.continent.to_string()),
            currency_code: info.map(|i| i.currency.to_string()),
            phone_prefix: info.map(|i| i.phone.to_string()),
            timezone: record.timezone.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCity {
    pub geoname_id: i64,
    pub name: String,
    pub ascii_name: String,
    pub alternate_names: String,
    pub latitude: f64,
    pub longitude: f64,
    pub population: i64,
    pub area_sqkm: i64,
    pub elevation: Option<i32>,
    pub timezone: String,
    pub admin1_code: String,
    pub country_id: i64,
}

impl NewCity {
    pub fn from_record(record: &PlaceRecord, country_id: i64) -> Self {
        Self {
            geoname_id: record.geoname_id,
            name: record.name.clone(),
            ascii_name: record.ascii_name.clone(),
            alternate_names: record.alternate_names.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            population: record.population,
            area_sqkm: area_from_population(record.population),
            elevation: record.elevation,
            timezone: record.timezone.clone(),
            admin1_code: record.admin1_code.clone(),
            country_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDistrict {
    pub geoname_id: i64,
    pub name: String,
    pub ascii_name: String,
    pub alternate_names: String,
    pub latitude: f64,
    pub longitude: f64,
    pub population: i64,
    pub area_sqkm: i64,
    pub elevation: Option<i32>,
    pub admin1_code: String,
    pub admin2_code: String,
    pub country_id: i64,
    pub city_id: Option<i64>,
}

impl NewDistrict {
    pub fn from_record(record: &PlaceRecord, country_id: i64, city_id: Option<i64>) -> Self {
        Self {
            geoname_id: record.geoname_id,
            name: record.name.clone(),
            ascii_name: record.ascii_name.clone(),
            alternate_names: record.alternate_names.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            population: record.population,
            area_sqkm: area_from_population(record.population),
            elevation: record.elevation,
            admin1_code: record.admin1_code.clone(),
            admin2_code: record.admin2_code.clone(),
            country_id,
            city_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTown {
    pub geoname_id: i64,
    pub name: String,
    pub ascii_name: String,
    pub alternate_names: String,
    pub latitude: f64,
    pub longitude: f64,
    pub population: i64,
    pub area_sqkm: i64,
    pub elevation: Option<i32>,
    pub admin1_code: String,
    pub admin2_code: String,
    pub admin3_code: String,
    pub admin4_code: String,
    pub country_id: i64,
    pub city_id: Option<i64>,
    pub district_id: Option<i64>,
}

impl NewTown {
    pub fn from_record(
        record: &PlaceRecord,
        country_id: i64,
        city_id: Option<i64>,
        district_id: Option<i64>,
    ) -> Self {
        Self {
            geoname_id: record.geoname_id,
            name: record.name.clone(),
            ascii_name: record.ascii_name.clone(),
            alternate_names: record.alternate_names.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            population: record.population,
            area_sqkm: area_from_population(record.population),
            elevation: record.elevation,
            admin1_code: record.admin1_code.clone(),
            admin2_code: record.admin2_code.clone(),
            admin3_code: record.admin3_code.clone(),
            admin4_code: record.admin4_code.clone(),
            country_id,
            city_id,
            district_id,
        }
    }
}

/// `type-id` pair used by location pickers, e.g. `city-42`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocationRef {
    pub level: Level,
    pub id: i64,
}

impl LocationRef {
    pub fn new(level: Level, id: i64) -> Self {
        Self { level, id }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseLocationRefError {
    #[error("missing '-' separator in {0:?}")]
    MissingSeparator(String),
    #[error("unknown location type {0:?}")]
    UnknownLevel(String),
    #[error("invalid location id {0:?}")]
    InvalidId(String),
}

impl FromStr for LocationRef {
    type Err = ParseLocationRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once('-')
            .ok_or_else(|| ParseLocationRefError::MissingSeparator(s.to_string()))?;

        let level = match kind {
            "country" => Level::Country,
            "city" => Level::City,
            "district" => Level::District,
            "town" => Level::Town,
            other => return Err(ParseLocationRefError::UnknownLevel(other.to_string())),
        };

        let id = id
            .parse::<i64>()
            .map_err(|_| ParseLocationRefError::InvalidId(id.to_string()))?;

        Ok(Self { level, id })
    }
}

impl fmt::Display for LocationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.level, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_from_population() {
        assert_eq!(area_from_population(0), 0);
        assert_eq!(area_from_population(1_000), 300);
        assert_eq!(area_from_population(5), 2); // 1.5 rounds away from zero
        assert_eq!(area_from_population(10_000_000), 3_000_000);
    }

    #[test]
    fn test_location_ref_parse() {
        let loc: LocationRef = "city-42".parse().unwrap();
        assert_eq!(loc, LocationRef::new(Level::City, 42));
        assert_eq!(loc.to_string(), "city-42");

        let loc: LocationRef = "district-7".parse().unwrap();
        assert_eq!(loc.level, Level::District);
    }

    #[test]
    fn test_location_ref_errors() {
        assert_eq!(
            "city42".parse::<LocationRef>(),
            Err(ParseLocationRefError::MissingSeparator("city42".to_string()))
        );
        assert_eq!(
            "region-1".parse::<LocationRef>(),
            Err(ParseLocationRefError::UnknownLevel("region".to_string()))
        );
        assert_eq!(
            "town-abc".parse::<LocationRef>(),
            Err(ParseLocationRefError::InvalidId("abc".to_string()))
        );
    }

    #[test]
    fn test_level_order() {
        let mut levels = vec![Level::Town, Level::Country, Level::District, Level::City];
        levels.sort();
        assert_eq!(levels, Level::all());
    }

    #[test]
    fn test_distance_sq() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(3.0, 4.0);
        assert_eq!(a.distance_sq(&b), 25.0);
    }
}
