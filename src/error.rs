//! Error types shared across the import pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::Level;

/// Fatal archive problems. These abort the run.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to open archive {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("entry {entry} not found in archive {path}")]
    EntryNotFound { path: PathBuf, entry: String },

    #[error("failed to read archive entry: {0}")]
    Read(#[from] std::io::Error),
}

/// Per-record failure to find a parent for a child candidate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no country persisted for code {0}")]
    UnknownCountry(String),
}

/// Per-record failure reported by a store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{level} references missing {parent} row {id}")]
    MissingParent { level: Level, parent: Level, id: i64 },

    #[error("{level} with geoname id {geoname_id} already exists")]
    DuplicateGeonameId { level: Level, geoname_id: i64 },

    #[error("{level} with geoname id {geoname_id} rejected by store")]
    Rejected { level: Level, geoname_id: i64 },

    #[error("store is closed")]
    Closed,
}
