//! Typed gazetteer line.
//!
//! A line carries at least 19 tab-separated columns (id, name, ascii name,
//! alternate names, lat, lon, feature class, feature code, country code, cc2,
//! admin1-4, population, elevation, dem, timezone, modification date). Only the
//! first 17 are required; anything shorter is malformed.

use serde::{Deserialize, Serialize};

use crate::config::MIN_FIELDS;

use super::GeoPoint;

const COL_GEONAME_ID: usize = 0;
const COL_NAME: usize = 1;
const COL_ASCII_NAME: usize = 2;
const COL_ALTERNATE_NAMES: usize = 3;
const COL_LATITUDE: usize = 4;
const COL_LONGITUDE: usize = 5;
const COL_FEATURE_CLASS: usize = 6;
const COL_FEATURE_CODE: usize = 7;
const COL_COUNTRY_CODE: usize = 8;
const COL_ADMIN1: usize = 10;
const COL_ADMIN2: usize = 11;
const COL_ADMIN3: usize = 12;
const COL_ADMIN4: usize = 13;
const COL_POPULATION: usize = 14;
const COL_ELEVATION: usize = 15;
const COL_DEM: usize = 16;
const COL_TIMEZONE: usize = 17;

const DEFAULT_TIMEZONE: &str = "UTC";

/// One place from the gazetteer, validated once and consumed as a typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub geoname_id: i64,
    pub name: String,
    pub ascii_name: String,
    /// Comma separated, as found in the source.
    pub alternate_names: String,
    pub latitude: f64,
    pub longitude: f64,
    pub feature_class: String,
    pub feature_code: String,
    pub country_code: String,
    pub admin1_code: String,
    pub admin2_code: String,
    pub admin3_code: String,
    pub admin4_code: String,
    pub population: i64,
    pub elevation: Option<i32>,
    pub dem: Option<i32>,
    pub timezone: String,
}

impl PlaceRecord {
    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.latitude,
            lon: self.longitude,
        }
    }
}

/// A line split into columns but not yet converted.
///
/// Splitting is cheap, so the country filter can run on the raw columns before
/// any numeric parsing happens.
#[derive(Debug)]
pub struct RawLine<'a> {
    fields: Vec<&'a str>,
}

impl<'a> RawLine<'a> {
    /// Split a line on tabs. `None` if it has fewer than [`MIN_FIELDS`] columns.
    pub fn split(line: &'a str) -> Option<Self> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < MIN_FIELDS {
            return None;
        }
        Some(Self { fields })
    }

    pub fn country_code(&self) -> &'a str {
        self.fields[COL_COUNTRY_CODE]
    }

    pub fn feature_code(&self) -> &'a str {
        self.fields[COL_FEATURE_CODE]
    }

    /// Convert into a [`PlaceRecord`]. `None` if the geoname id is not an integer.
    pub fn into_record(self) -> Option<PlaceRecord> {
        let f = &self.fields;
        let geoname_id = f[COL_GEONAME_ID].trim().parse::<i64>().ok()?;

        let timezone = match f.get(COL_TIMEZONE).map(|s| s.trim()) {
            Some(tz) if !tz.is_empty() => tz.to_string(),
            _ => DEFAULT_TIMEZONE.to_string(),
        };

        Some(PlaceRecord {
            geoname_id,
            name: f[COL_NAME].to_string(),
            ascii_name: f[COL_ASCII_NAME].to_string(),
            alternate_names: f[COL_ALTERNATE_NAMES].to_string(),
            latitude: parse_coordinate(f[COL_LATITUDE]),
            longitude: parse_coordinate(f[COL_LONGITUDE]),
            feature_class: f[COL_FEATURE_CLASS].to_string(),
            feature_code: f[COL_FEATURE_CODE].to_string(),
            country_code: f[COL_COUNTRY_CODE].to_string(),
            admin1_code: f[COL_ADMIN1].to_string(),
            admin2_code: f[COL_ADMIN2].to_string(),
            admin3_code: f[COL_ADMIN3].to_string(),
            admin4_code: f[COL_ADMIN4].to_string(),
            population: f[COL_POPULATION].trim().parse().unwrap_or(0),
            elevation: f[COL_ELEVATION].trim().parse().ok(),
            dem: f[COL_DEM].trim().parse().ok(),
            timezone,
        })
    }
}

/// Degrees, or 0 when missing, unparseable or not finite.
fn parse_coordinate(field: &str) -> f64 {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse one gazetteer line. `None` for malformed lines.
pub fn parse_line(line: &str) -> Option<PlaceRecord> {
    RawLine::split(line)?.into_record()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BERLIN: &str = "2950159\tBerlin\tBerlin\tBerlim,Berlin,Berlino\t52.52437\t13.41053\tP\tPPLC\tDE\t\t16\t00\t11000\t11000000\t3426354\t74\t43\tEurope/Berlin\t2022-06-08";

    #[test]
    fn test_parse_full_line() {
        let record = parse_line(BERLIN).unwrap();
        assert_eq!(record.geoname_id, 2950159);
        assert_eq!(record.name, "Berlin");
        assert_eq!(record.alternate_names, "Berlim,Berlin,Berlino");
        assert_eq!(record.feature_code, "PPLC");
        assert_eq!(record.country_code, "DE");
        assert_eq!(record.admin1_code, "16");
        assert_eq!(record.admin4_code, "11000000");
        assert_eq!(record.population, 3426354);
        assert_eq!(record.elevation, Some(74));
        assert_eq!(record.dem, Some(43));
        assert_eq!(record.timezone, "Europe/Berlin");
        assert!((record.latitude - 52.52437).abs() < 1e-9);
    }

    #[test]
    fn test_too_few_fields() {
        let line = "1\ta\tb\tc\t1.0\t2.0\tP\tPPL\tDE\t";
        assert_eq!(line.split('\t').count(), 10);
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn test_seventeen_fields_defaults_timezone() {
        let line = "7\tPlace\tPlace\t\tnot-a-number\t\tP\tPPL\tDE\t\t\t\t\t\t\t\t";
        assert_eq!(line.split('\t').count(), 17);
        let record = parse_line(line).unwrap();
        assert_eq!(record.latitude, 0.0);
        assert_eq!(record.longitude, 0.0);
        assert_eq!(record.population, 0);
        assert_eq!(record.elevation, None);
        assert_eq!(record.timezone, "UTC");
    }

    #[test]
    fn test_non_finite_coordinates_default_to_zero() {
        let line = BERLIN
            .replacen("52.52437", "NaN", 1)
            .replacen("13.41053", "inf", 1);
        let record = parse_line(&line).unwrap();
        assert_eq!(record.latitude, 0.0);
        assert_eq!(record.longitude, 0.0);
    }

    #[test]
    fn test_blank_timezone_and_crlf() {
        let line = format!("{}\r", BERLIN.replace("Europe/Berlin", " "));
        let record = parse_line(&line).unwrap();
        assert_eq!(record.timezone, "UTC");
        assert_eq!(record.geoname_id, 2950159);
    }

    #[test]
    fn test_bad_geoname_id() {
        let line = BERLIN.replacen("2950159", "x2950159", 1);
        assert!(parse_line(&line).is_none());
    }

    #[test]
    fn test_raw_line_country_code() {
        let raw = RawLine::split(BERLIN).unwrap();
        assert_eq!(raw.country_code(), "DE");
        assert_eq!(raw.feature_code(), "PPLC");
    }
}
