//! Gazetteer - GeoNames import into a country/city/district/town hierarchy
//!
//! This library provides the scan, classification, parent resolution and
//! persistence stages used by the `import` binary.

pub mod archive;
pub mod classify;
pub mod config;
pub mod error;
pub mod models;
pub mod persist;
pub mod pipeline;
pub mod resolve;
pub mod stats;
pub mod store;

pub use models::{Level, LocationRef, PlaceRecord};
pub use pipeline::run_import;
