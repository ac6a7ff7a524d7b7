//! Batch persistence of classified candidates in dependency order.

use std::borrow::Borrow;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::classify::Candidates;
use crate::error::{ResolveError, StoreError};
use crate::models::{Level, NewCity, NewCountry, NewDistrict, NewTown, PlaceRecord};
use crate::resolve::{HierarchyContext, LinearIndex, ParentIndex, ParentRef};
use crate::stats::ImportStats;
use crate::store::HierarchyStore;

/// Why a single candidate was not persisted.
#[derive(Debug, Error)]
enum RecordError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("{source}; row: {detail}")]
    Store {
        #[source]
        source: StoreError,
        /// JSON of the rejected row.
        detail: String,
    },
}

impl RecordError {
    fn store<T: serde::Serialize>(source: StoreError, row: &T) -> Self {
        let detail =
            serde_json::to_string(row).unwrap_or_else(|e| format!("<unserializable: {e}>"));
        RecordError::Store { source, detail }
    }
}

/// Writes candidates level by level, registering each created row with the
/// resolver context so the next level can attach to it.
///
/// Failures never abort a pass: they are counted, and the first few per level
/// are logged in full.
pub struct BatchPersister<'a, S: HierarchyStore + ?Sized, I: ParentIndex = LinearIndex> {
    store: &'a mut S,
    context: &'a mut HierarchyContext<I>,
    stats: &'a mut ImportStats,
    batch_size: usize,
}

impl<'a, S: HierarchyStore + ?Sized, I: ParentIndex> BatchPersister<'a, S, I> {
    pub fn new(
        store: &'a mut S,
        context: &'a mut HierarchyContext<I>,
        stats: &'a mut ImportStats,
        batch_size: usize,
    ) -> Self {
        Self {
            store,
            context,
            stats,
            batch_size: batch_size.max(1),
        }
    }

    /// Countries, then cities, then districts, then towns.
    pub async fn persist_all(&mut self, candidates: &Candidates) {
        self.persist_level(Level::Country, &candidates.countries()).await;
        self.persist_level(Level::City, &candidates.cities).await;
        self.persist_level(Level::District, &candidates.districts).await;
        self.persist_level(Level::Town, &candidates.towns).await;
    }

    /// Run one pass over the candidates of a level.
    pub async fn persist_level<R: Borrow<PlaceRecord>>(&mut self, level: Level, records: &[R]) {
        if records.is_empty() {
            info!("No {} candidates to persist", level);
            return;
        }

        let batches = records.len().div_ceil(self.batch_size);
        info!(
            "Persisting {} {} candidates in {} batches",
            records.len(),
            level,
            batches
        );

        for (batch_no, batch) in records.chunks(self.batch_size).enumerate() {
            for record in batch {
                let record: &PlaceRecord = record.borrow();
                match self.create(level, record).await {
                    Ok(id) => {
                        self.stats.record_created(level);
                        debug!(
                            "Created {} {} ({}) as id {}",
                            level, record.name, record.geoname_id, id
                        );
                    }
                    Err(err) => {
                        if self.stats.record_error(level) {
                            warn!(
                                "Failed to create {} {} (geoname id {}): {}",
                                level, record.name, record.geoname_id, err
                            );
                        }
                    }
                }
            }

            info!(
                "{} batch {}/{}: {} created, {} errors",
                level,
                batch_no + 1,
                batches,
                self.stats.created(level),
                self.stats.errors_for(level)
            );
        }
    }

    async fn create(&mut self, level: Level, record: &PlaceRecord) -> Result<i64, RecordError> {
        let id = match level {
            Level::Country => {
                let row = NewCountry::from_record(record);
                self.store
                    .create_country(&row)
                    .await
                    .map_err(|e| RecordError::store(e, &row))?
            }
            Level::City => {
                let links = self.context.resolve(level, record)?;
                let row = NewCity::from_record(record, links.country_id);
                self.store
                    .create_city(&row)
                    .await
                    .map_err(|e| RecordError::store(e, &row))?
            }
            Level::District => {
                let links = self.context.resolve(level, record)?;
                let row = NewDistrict::from_record(record, links.country_id, links.city_id);
                self.store
                    .create_district(&row)
                    .await
                    .map_err(|e| RecordError::store(e, &row))?
            }
            Level::Town => {
                let links = self.context.resolve(level, record)?;
                let row = NewTown::from_record(
                    record,
                    links.country_id,
                    links.city_id,
                    links.district_id,
                );
                self.store
                    .create_town(&row)
                    .await
                    .map_err(|e| RecordError::store(e, &row))?
            }
        };

        self.context.register(
            level,
            &record.country_code,
            ParentRef {
                id,
                geoname_id: record.geoname_id,
                point: record.point(),
            },
        );

        Ok(id)
    }
}
