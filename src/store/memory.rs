//! In-memory store used for dry runs and tests.

use async_trait::async_trait;
use hashbrown::{HashMap, HashSet};

use super::HierarchyStore;
use crate::error::StoreError;
use crate::models::{GeoPoint, Level, LocationRef, NewCity, NewCountry, NewDistrict, NewTown};

/// A persisted row and its id.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<T> {
    pub id: i64,
    pub data: T,
}

/// Table-in-a-vector with the same id and uniqueness rules as the SQL schema.
#[derive(Debug)]
struct Table<T> {
    level: Level,
    rows: Vec<Row<T>>,
    /// Row id to position in `rows`.
    positions: HashMap<i64, usize>,
    geoname_ids: HashSet<i64>,
    next_id: i64,
}

impl<T> Table<T> {
    fn new(level: Level) -> Self {
        Self {
            level,
            rows: Vec::new(),
            positions: HashMap::new(),
            geoname_ids: HashSet::new(),
            next_id: 1,
        }
    }

    fn contains(&self, id: i64) -> bool {
        self.positions.contains_key(&id)
    }

    fn get(&self, id: i64) -> Option<&Row<T>> {
        self.positions.get(&id).map(|&pos| &self.rows[pos])
    }

    fn insert(&mut self, geoname_id: i64, data: T) -> Result<i64, StoreError> {
        if !self.geoname_ids.insert(geoname_id) {
            return Err(StoreError::DuplicateGeonameId {
                level: self.level,
                geoname_id,
            });
        }
        let id = self.next_id;
        self.next_id += 1;
        self.positions.insert(id, self.rows.len());
        self.rows.push(Row { id, data });
        Ok(id)
    }

    /// Ids keep counting after a clear, like a SQL sequence.
    fn clear(&mut self) {
        self.rows.clear();
        self.positions.clear();
        self.geoname_ids.clear();
    }
}

/// Store keeping all rows in memory.
///
/// Enforces foreign keys and geoname id uniqueness so constraint failures
/// surface the same way they would against PostgreSQL.
#[derive(Debug)]
pub struct MemoryStore {
    countries: Table<NewCountry>,
    cities: Table<NewCity>,
    districts: Table<NewDistrict>,
    towns: Table<NewTown>,
    rejected: HashSet<i64>,
    closed: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            countries: Table::new(Level::Country),
            cities: Table::new(Level::City),
            districts: Table::new(Level::District),
            towns: Table::new(Level::Town),
            rejected: HashSet::new(),
            closed: false,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every create call for this geoname id fail.
    pub fn reject(&mut self, geoname_id: i64) {
        self.rejected.insert(geoname_id);
    }

    pub fn countries(&self) -> &[Row<NewCountry>] {
        &self.countries.rows
    }

    pub fn cities(&self) -> &[Row<NewCity>] {
        &self.cities.rows
    }

    pub fn districts(&self) -> &[Row<NewDistrict>] {
        &self.districts.rows
    }

    pub fn towns(&self) -> &[Row<NewTown>] {
        &self.towns.rows
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn check_writable(&self, level: Level, geoname_id: i64) -> Result<(), StoreError> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        if self.rejected.contains(&geoname_id) {
            return Err(StoreError::Rejected { level, geoname_id });
        }
        Ok(())
    }

    fn check_parent(&self, level: Level, parent: Level, id: Option<i64>) -> Result<(), StoreError> {
        let Some(id) = id else {
            return Ok(());
        };
        let exists = match parent {
            Level::Country => self.countries.contains(id),
            Level::City => self.cities.contains(id),
            Level::District => self.districts.contains(id),
            Level::Town => self.towns.contains(id),
        };
        if exists {
            Ok(())
        } else {
            Err(StoreError::MissingParent { level, parent, id })
        }
    }
}

#[async_trait]
impl HierarchyStore for MemoryStore {
    async fn reset(&mut self) -> Result<(), StoreError> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        self.towns.clear();
        self.districts.clear();
        self.cities.clear();
        self.countries.clear();
        Ok(())
    }

    async fn create_country(&mut self, country: &NewCountry) -> Result<i64, StoreError> {
        self.check_writable(Level::Country, country.geoname_id)?;
        self.countries.insert(country.geoname_id, country.clone())
    }

    async fn create_city(&mut self, city: &NewCity) -> Result<i64, StoreError> {
        self.check_writable(Level::City, city.geoname_id)?;
        self.check_parent(Level::City, Level::Country, Some(city.country_id))?;
        self.cities.insert(city.geoname_id, city.clone())
    }

    async fn create_district(&mut self, district: &NewDistrict) -> Result<i64, StoreError> {
        self.check_writable(Level::District, district.geoname_id)?;
        self.check_parent(Level::District, Level::Country, Some(district.country_id))?;
        self.check_parent(Level::District, Level::City, district.city_id)?;
        self.districts.insert(district.geoname_id, district.clone())
    }

    async fn create_town(&mut self, town: &NewTown) -> Result<i64, StoreError> {
        self.check_writable(Level::Town, town.geoname_id)?;
        self.check_parent(Level::Town, Level::Country, Some(town.country_id))?;
        self.check_parent(Level::Town, Level::City, town.city_id)?;
        self.check_parent(Level::Town, Level::District, town.district_id)?;
        self.towns.insert(town.geoname_id, town.clone())
    }

    async fn location(&mut self, location: LocationRef) -> Result<Option<GeoPoint>, StoreError> {
        let point = match location.level {
            Level::Country => self
                .countries
                .get(location.id)
                .map(|r| GeoPoint::new(r.data.latitude, r.data.longitude)),
            Level::City => self
                .cities
                .get(location.id)
                .map(|r| GeoPoint::new(r.data.latitude, r.data.longitude)),
            Level::District => self
                .districts
                .get(location.id)
                .map(|r| GeoPoint::new(r.data.latitude, r.data.longitude)),
            Level::Town => self
                .towns
                .get(location.id)
                .map(|r| GeoPoint::new(r.data.latitude, r.data.longitude)),
        };
        Ok(point)
    }

    async fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_line;

    fn country(geoname_id: i64) -> NewCountry {
        let line = crate::classify::tests::line(geoname_id, "Xland", "PCLI", "XX", 1.0, 2.0, 100);
        NewCountry::from_record(&parse_line(&line).unwrap())
    }

    fn city(geoname_id: i64, country_id: i64) -> NewCity {
        let line = crate::classify::tests::line(geoname_id, "Xcity", "PPLC", "XX", 3.0, 4.0, 60_000);
        NewCity::from_record(&parse_line(&line).unwrap(), country_id)
    }

    #[tokio::test]
    async fn test_ids_and_location() {
        let mut store = MemoryStore::new();
        let country_id = store.create_country(&country(1)).await.unwrap();
        let city_id = store.create_city(&city(2, country_id)).await.unwrap();
        assert_eq!((country_id, city_id), (1, 1));

        let point = store
            .location(LocationRef::new(Level::City, city_id))
            .await
            .unwrap();
        assert_eq!(point, Some(GeoPoint::new(3.0, 4.0)));
        assert_eq!(
            store
                .location(LocationRef::new(Level::Town, 1))
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_foreign_key_enforced() {
        let mut store = MemoryStore::new();
        let err = store.create_city(&city(2, 99)).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::MissingParent {
                level: Level::City,
                parent: Level::Country,
                id: 99
            }
        ));
        assert!(store.cities().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_geoname_id() {
        let mut store = MemoryStore::new();
        store.create_country(&country(1)).await.unwrap();
        let err = store.create_country(&country(1)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateGeonameId { geoname_id: 1, .. }));
    }

    #[tokio::test]
    async fn test_reject_and_close() {
        let mut store = MemoryStore::new();
        store.reject(5);
        assert!(matches!(
            store.create_country(&country(5)).await,
            Err(StoreError::Rejected { geoname_id: 5, .. })
        ));

        store.close().await;
        assert!(store.is_closed());
        assert!(matches!(
            store.create_country(&country(6)).await,
            Err(StoreError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_many_children_of_last_parent() {
        let mut store = MemoryStore::new();
        let mut last = 0;
        for geoname_id in 1..=2_000 {
            last = store.create_country(&country(geoname_id)).await.unwrap();
        }

        let started = std::time::Instant::now();
        for geoname_id in 10_000..30_000 {
            store.create_city(&city(geoname_id, last)).await.unwrap();
        }
        assert_eq!(store.cities().len(), 20_000);
        assert!(
            started.elapsed() < std::time::Duration::from_secs(5),
            "parent checks took {:?}",
            started.elapsed()
        );

        let point = store
            .location(LocationRef::new(Level::City, 20_000))
            .await
            .unwrap();
        assert_eq!(point, Some(GeoPoint::new(3.0, 4.0)));
    }

    #[tokio::test]
    async fn test_reset_clears_positions() {
        let mut store = MemoryStore::new();
        let country_id = store.create_country(&country(1)).await.unwrap();
        store.reset().await.unwrap();
        assert!(matches!(
            store.create_city(&city(2, country_id)).await,
            Err(StoreError::MissingParent { .. })
        ));
        assert_eq!(
            store
                .location(LocationRef::new(Level::Country, country_id))
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_reset_keeps_sequence() {
        let mut store = MemoryStore::new();
        store.create_country(&country(1)).await.unwrap();
        store.reset().await.unwrap();
        assert!(store.countries().is_empty());
        let id = store.create_country(&country(1)).await.unwrap();
        assert_eq!(id, 2);
    }
}
