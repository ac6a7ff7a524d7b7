//! Core data models for the gazetteer import.

pub mod country_info;
pub mod hierarchy;
pub mod record;

pub use country_info::{country_info, CountryInfo};
pub use hierarchy::{
    area_from_population, GeoPoint, Level, LocationRef, NewCity, NewCountry, NewDistrict, NewTown,
    ParseLocationRefError,
};
pub use record::{parse_line, PlaceRecord, RawLine};
