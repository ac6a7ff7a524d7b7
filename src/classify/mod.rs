//! Record classification: turns gazetteer lines into hierarchy candidates.
//!
//! Lines are filtered by country allowlist first, then bucketed by feature code
//! and population. Nothing here touches storage; the result is a set of
//! in-memory candidate buffers consumed by the persistence passes.

use hashbrown::{HashMap, HashSet};
use indicatif::ProgressBar;
use tracing::info;

use crate::config::{
    ClassifierConfig, CITY_FEATURE_CODES, COUNTRY_FEATURE_CODES, DISTRICT_FEATURE_CODES,
    PROGRESS_INTERVAL, TOWN_FEATURE_CODES,
};
use crate::error::ArchiveError;
use crate::models::{Level, PlaceRecord, RawLine};
use crate::stats::ImportStats;

/// What happened to a single line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Fewer than the minimum number of fields, or an unparseable id.
    Malformed,
    /// Country code not on the allowlist.
    OutsideAllowlist,
    /// Well-formed and allowlisted, but matches no bucket.
    Unclassified,
    Candidate(Level, PlaceRecord),
}

pub struct RecordClassifier {
    config: ClassifierConfig,
    country_codes: HashSet<&'static str>,
    city_codes: HashSet<&'static str>,
    district_codes: HashSet<&'static str>,
    town_codes: HashSet<&'static str>,
}

impl RecordClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            country_codes: COUNTRY_FEATURE_CODES.iter().copied().collect(),
            city_codes: CITY_FEATURE_CODES.iter().copied().collect(),
            district_codes: DISTRICT_FEATURE_CODES.iter().copied().collect(),
            town_codes: TOWN_FEATURE_CODES.iter().copied().collect(),
        }
    }

    /// Bucket a record. Pure function of country code, feature code and population.
    pub fn classify(&self, record: &PlaceRecord) -> Option<Level> {
        if !self.config.allows(&record.country_code) {
            return None;
        }

        let code = record.feature_code.as_str();
        if self.country_codes.contains(code) {
            Some(Level::Country)
        } else if self.city_codes.contains(code)
            && record.population >= self.config.city_min_population
        {
            Some(Level::City)
        } else if self.district_codes.contains(code) {
            Some(Level::District)
        } else if self.town_codes.contains(code)
            && record.population >= self.config.town_min_population
        {
            Some(Level::Town)
        } else {
            None
        }
    }

    pub fn classify_line(&self, line: &str) -> LineOutcome {
        let Some(raw) = RawLine::split(line) else {
            return LineOutcome::Malformed;
        };

        if !self.config.allows(raw.country_code()) {
            return LineOutcome::OutsideAllowlist;
        }

        let Some(record) = raw.into_record() else {
            return LineOutcome::Malformed;
        };

        match self.classify(&record) {
            Some(level) => LineOutcome::Candidate(level, record),
            None => LineOutcome::Unclassified,
        }
    }
}

impl Default for RecordClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

/// Accumulated candidates, one buffer per hierarchy level.
#[derive(Debug, Default)]
pub struct Candidates {
    /// Best country line per ISO-2 code.
    countries: HashMap<String, PlaceRecord>,
    pub cities: Vec<PlaceRecord>,
    pub districts: Vec<PlaceRecord>,
    pub towns: Vec<PlaceRecord>,
}

impl Candidates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offer(&mut self, level: Level, record: PlaceRecord) {
        match level {
            Level::Country => self.offer_country(record),
            Level::City => self.cities.push(record),
            Level::District => self.districts.push(record),
            Level::Town => self.towns.push(record),
        }
    }

    /// Keep the most populous line per code. Equal population keeps the earlier one.
    fn offer_country(&mut self, record: PlaceRecord) {
        match self.countries.get(&record.country_code) {
            Some(existing) if existing.population >= record.population => {}
            _ => {
                self.countries.insert(record.country_code.clone(), record);
            }
        }
    }

    /// Country candidates ordered by ISO-2 code.
    pub fn countries(&self) -> Vec<&PlaceRecord> {
        let mut countries: Vec<&PlaceRecord> = self.countries.values().collect();
        countries.sort_by(|a, b| a.country_code.cmp(&b.country_code));
        countries
    }

    pub fn count(&self, level: Level) -> usize {
        match level {
            Level::Country => self.countries.len(),
            Level::City => self.cities.len(),
            Level::District => self.districts.len(),
            Level::Town => self.towns.len(),
        }
    }
}

/// Classify every line from `lines` into candidate buffers.
///
/// A read error from the archive aborts the scan; everything else is counted.
pub fn scan_lines<I>(
    lines: I,
    classifier: &RecordClassifier,
    stats: &mut ImportStats,
    progress: &ProgressBar,
) -> Result<Candidates, ArchiveError>
where
    I: IntoIterator<Item = Result<String, ArchiveError>>,
{
    let mut candidates = Candidates::new();

    for line in lines {
        let line = line?;
        stats.lines_processed += 1;
        progress.inc(1);

        if stats.lines_processed % PROGRESS_INTERVAL == 0 {
            info!(
                "Processed {} lines ({} countries, {} cities, {} districts, {} towns so far)",
                stats.lines_processed,
                candidates.count(Level::Country),
                candidates.count(Level::City),
                candidates.count(Level::District),
                candidates.count(Level::Town)
            );
        }

        if let LineOutcome::Candidate(level, record) = classifier.classify_line(&line) {
            candidates.offer(level, record);
        }
    }

    for level in Level::all() {
        stats.set_candidates(*level, candidates.count(*level));
    }

    info!(
        "Scan complete: {} lines, {} countries, {} cities, {} districts, {} towns",
        stats.lines_processed,
        candidates.count(Level::Country),
        candidates.count(Level::City),
        candidates.count(Level::District),
        candidates.count(Level::Town)
    );

    Ok(candidates)
}
