//! Destination stores for the imported hierarchy.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{GeoPoint, LocationRef, NewCity, NewCountry, NewDistrict, NewTown};

pub use memory::{MemoryStore, Row};
pub use postgres::PgStore;

/// Relational store holding the four hierarchy tables.
///
/// Creation calls return the new row id. Calls are awaited one at a time by
/// the importer; implementations need not support concurrent use.
#[async_trait]
pub trait HierarchyStore: Send {
    /// Delete every row, children first.
    async fn reset(&mut self) -> Result<(), StoreError>;

    async fn create_country(&mut self, country: &NewCountry) -> Result<i64, StoreError>;

    async fn create_city(&mut self, city: &NewCity) -> Result<i64, StoreError>;

    async fn create_district(&mut self, district: &NewDistrict) -> Result<i64, StoreError>;

    async fn create_town(&mut self, town: &NewTown) -> Result<i64, StoreError>;

    /// Coordinates of a `type-id` reference, if the row exists.
    async fn location(&mut self, location: LocationRef) -> Result<Option<GeoPoint>, StoreError>;

    /// Release the underlying connection. Safe to call more than once.
    async fn close(&mut self);
}
