//! PostgreSQL store backed by a single-connection sqlx pool.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

use super::HierarchyStore;
use crate::error::StoreError;
use crate::models::{GeoPoint, Level, LocationRef, NewCity, NewCountry, NewDistrict, NewTown};

/// Schema SQL embedded at compile time
const HIERARCHY_SCHEMA: &str = include_str!("../../schema/hierarchy.sql");

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and make sure the four tables exist.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        for statement in HIERARCHY_SCHEMA
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        debug!("Hierarchy schema ready");
        Ok(())
    }
}

#[async_trait]
impl HierarchyStore for PgStore {
    async fn reset(&mut self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for level in Level::all().iter().rev() {
            let deleted = sqlx::query(&format!("DELETE FROM {}", level.table()))
                .execute(&mut *tx)
                .await?
                .rows_affected();
            info!("Deleted {} rows from {}", deleted, level.table());
        }
        tx.commit().await?;
        Ok(())
    }

    async fn create_country(&mut self, country: &NewCountry) -> Result<i64, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO countries (
                geoname_id, name, ascii_name, alternate_names, iso2, iso3,
                latitude, longitude, population, area_sqkm,
                continent, currency_code, phone_prefix, timezone
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id",
        )
        .bind(country.geoname_id)
        .bind(&country.name)
        .bind(&country.ascii_name)
        .bind(&country.alternate_names)
        .bind(&country.iso2)
        .bind(country.iso3.as_deref())
        .bind(country.latitude)
        .bind(country.longitude)
        .bind(country.population)
        .bind(country.area_sqkm)
        .bind(country.continent.as_deref())
        .bind(country.currency_code.as_deref())
        .bind(country.phone_prefix.as_deref())
        .bind(&country.timezone)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn create_city(&mut self, city: &NewCity) -> Result<i64, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO cities (
                geoname_id, name, ascii_name, alternate_names, latitude, longitude,
                population, area_sqkm, elevation, timezone, admin1_code, country_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id",
        )
        .bind(city.geoname_id)
        .bind(&city.name)
        .bind(&city.ascii_name)
        .bind(&city.alternate_names)
        .bind(city.latitude)
        .bind(city.longitude)
        .bind(city.population)
        .bind(city.area_sqkm)
        .bind(city.elevation)
        .bind(&city.timezone)
        .bind(&city.admin1_code)
        .bind(city.country_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn create_district(&mut self, district: &NewDistrict) -> Result<i64, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO districts (
                geoname_id, name, ascii_name, alternate_names, latitude, longitude,
                population, area_sqkm, elevation, admin1_code, admin2_code,
                country_id, city_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id",
        )
        .bind(district.geoname_id)
        .bind(&district.name)
        .bind(&district.ascii_name)
        .bind(&district.alternate_names)
        .bind(district.latitude)
        .bind(district.longitude)
        .bind(district.population)
        .bind(district.area_sqkm)
        .bind(district.elevation)
        .bind(&district.admin1_code)
        .bind(&district.admin2_code)
        .bind(district.country_id)
        .bind(district.city_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn create_town(&mut self, town: &NewTown) -> Result<i64, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO towns (
                geoname_id, name, ascii_name, alternate_names, latitude, longitude,
                population, area_sqkm, elevation, admin1_code, admin2_code,
                admin3_code, admin4_code, country_id, city_id, district_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING id",
        )
        .bind(town.geoname_id)
        .bind(&town.name)
        .bind(&town.ascii_name)
        .bind(&town.alternate_names)
        .bind(town.latitude)
        .bind(town.longitude)
        .bind(town.population)
        .bind(town.area_sqkm)
        .bind(town.elevation)
        .bind(&town.admin1_code)
        .bind(&town.admin2_code)
        .bind(&town.admin3_code)
        .bind(&town.admin4_code)
        .bind(town.country_id)
        .bind(town.city_id)
        .bind(town.district_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn location(&mut self, location: LocationRef) -> Result<Option<GeoPoint>, StoreError> {
        let sql = format!(
            "SELECT latitude, longitude FROM {} WHERE id = $1",
            location.level.table()
        );
        let row: Option<(f64, f64)> = sqlx::query_as(&sql)
            .bind(location.id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(lat, lon)| GeoPoint { lat, lon }))
    }

    async fn close(&mut self) {
        if !self.pool.is_closed() {
            info!("Closing PostgreSQL connection");
            self.pool.close().await;
        }
    }
}
