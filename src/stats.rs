//! Import counters and the final summary.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::MAX_LOGGED_ERRORS;
use crate::models::Level;

/// One counter per hierarchy level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelCounts {
    pub country: u64,
    pub city: u64,
    pub district: u64,
    pub town: u64,
}

impl LevelCounts {
    pub fn get(&self, level: Level) -> u64 {
        match level {
            Level::Country => self.country,
            Level::City => self.city,
            Level::District => self.district,
            Level::Town => self.town,
        }
    }

    fn get_mut(&mut self, level: Level) -> &mut u64 {
        match level {
            Level::Country => &mut self.country,
            Level::City => &mut self.city,
            Level::District => &mut self.district,
            Level::Town => &mut self.town,
        }
    }

    pub fn total(&self) -> u64 {
        self.country + self.city + self.district + self.town
    }
}

/// Counters for a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct ImportStats {
    pub started_at: DateTime<Utc>,
    pub lines_processed: u64,
    candidates: LevelCounts,
    created: LevelCounts,
    errors: LevelCounts,
    #[serde(skip)]
    clock: Instant,
}

impl ImportStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            lines_processed: 0,
            candidates: LevelCounts::default(),
            created: LevelCounts::default(),
            errors: LevelCounts::default(),
            clock: Instant::now(),
        }
    }

    pub fn set_candidates(&mut self, level: Level, count: usize) {
        *self.candidates.get_mut(level) = count as u64;
    }

    pub fn candidates(&self, level: Level) -> u64 {
        self.candidates.get(level)
    }

    pub fn record_created(&mut self, level: Level) {
        *self.created.get_mut(level) += 1;
    }

    pub fn created(&self, level: Level) -> u64 {
        self.created.get(level)
    }

    /// Count a per-record failure. Returns `true` while this level is still
    /// within its budget of fully logged failures.
    pub fn record_error(&mut self, level: Level) -> bool {
        let count = self.errors.get_mut(level);
        *count += 1;
        *count <= MAX_LOGGED_ERRORS as u64
    }

    pub fn errors_for(&self, level: Level) -> u64 {
        self.errors.get(level)
    }

    pub fn errors(&self) -> u64 {
        self.errors.total()
    }

    /// Failures whose detail was not logged.
    pub fn suppressed_errors(&self, level: Level) -> u64 {
        self.errors_for(level)
            .saturating_sub(MAX_LOGGED_ERRORS as u64)
    }

    /// Print the end-of-run summary.
    pub fn log_summary(&self) {
        let elapsed = self.clock.elapsed();
        info!("Import finished in {:.1}s", elapsed.as_secs_f64());
        info!("  Lines processed: {}", self.lines_processed);
        for level in Level::all() {
            info!(
                "  {:<9} {} created of {} candidates ({} errors)",
                format!("{}:", level),
                self.created(*level),
                self.candidates(*level),
                self.errors_for(*level)
            );
            let suppressed = self.suppressed_errors(*level);
            if suppressed > 0 {
                warn!(
                    "  {} further {} errors were not logged in detail",
                    suppressed, level
                );
            }
        }
        info!("  Total errors: {}", self.errors());
    }
}

impl Default for ImportStats {
    fn default() -> Self {
        Self::new()
    }
}
