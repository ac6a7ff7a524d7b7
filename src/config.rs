//! Fixed tunables for the gazetteer import.
//!
//! The importer has no configuration file; these constants are the single source
//! of truth. [`ClassifierConfig`] and [`ImportOptions`] wrap them so tests can
//! substitute a synthetic allowlist.

use std::path::PathBuf;

use hashbrown::HashSet;

/// Archive location, relative to the working directory.
pub const ARCHIVE_PATH: &str = "data/allCountries.zip";

/// Name of the gazetteer entry inside the archive.
pub const ENTRY_NAME: &str = "allCountries.txt";

/// Connection string used when neither `--database-url` nor `DATABASE_URL` is set.
pub const DATABASE_URL: &str = "postgres://localhost/gazetteer";

/// Minimum number of tab-separated fields for a usable line.
pub const MIN_FIELDS: usize = 17;

pub const CITY_MIN_POPULATION: i64 = 50_000;
pub const TOWN_MIN_POPULATION: i64 = 1_000;

/// Rows per persistence batch. Only affects progress logging granularity.
pub const BATCH_SIZE: usize = 100;

/// Emit a scan progress line every this many lines.
pub const PROGRESS_INTERVAL: u64 = 500_000;

/// Persistence failures logged in full per entity type.
pub const MAX_LOGGED_ERRORS: usize = 5;

/// `area_sqkm = round(population * AREA_PER_CAPITA)`
pub const AREA_PER_CAPITA: f64 = 0.3;

pub const COUNTRY_FEATURE_CODES: &[&str] = &["PCL", "PCLD", "PCLF", "PCLI", "PCLIX", "PCLS", "TERR"];

pub const CITY_FEATURE_CODES: &[&str] = &["PPLC", "PPLA", "PPLA2", "PPLG", "PPL"];

pub const DISTRICT_FEATURE_CODES: &[&str] = &["ADM2", "ADM3", "ADM4"];

pub const TOWN_FEATURE_CODES: &[&str] = &[
    "PPL", "PPLA3", "PPLA4", "PPLF", "PPLL", "PPLR", "PPLS", "PPLX",
];

/// ISO-2 codes the import is restricted to, in priority order.
pub const PRIORITY_COUNTRIES: &[&str] = &[
    // Americas
    "US", "CA", "MX", "GT", "HN", "SV", "NI", "CR", "PA", "CU", "DO", "HT", "JM", "BR", "AR", "CL",
    "CO", "PE", "VE", "EC", "BO", "PY", "UY",
    // Europe
    "GB", "IE", "FR", "DE", "IT", "ES", "PT", "NL", "BE", "CH", "AT", "SE", "NO", "DK", "FI", "IS",
    "PL", "CZ", "SK", "HU", "RO", "BG", "GR", "HR", "RS", "SI", "BA", "AL", "UA", "BY", "RU", "LT",
    "LV", "EE",
    // Asia
    "TR", "CN", "JP", "KR", "IN", "PK", "BD", "LK", "NP", "ID", "PH", "VN", "TH", "MY", "SG", "MM",
    "KH", "TW", "HK", "MN", "KZ", "UZ", "AF", "IR", "IQ", "SA", "AE", "IL", "JO", "LB", "SY", "YE",
    // Africa
    "EG", "MA", "DZ", "TN", "LY", "NG", "GH", "KE", "ET", "TZ", "UG", "ZA", "CD", "AO", "MZ", "SD",
    "SN", "CM",
    // Oceania
    "AU", "NZ", "FJ", "PG",
];

/// Population thresholds and country filter used by the record classifier.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub allowlist: HashSet<String>,
    pub city_min_population: i64,
    pub town_min_population: i64,
}

impl ClassifierConfig {
    /// Same thresholds as the default, restricted to the given country codes.
    pub fn with_allowlist<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowlist: codes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn allows(&self, country_code: &str) -> bool {
        self.allowlist.contains(country_code)
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            allowlist: PRIORITY_COUNTRIES.iter().map(|c| c.to_string()).collect(),
            city_min_population: CITY_MIN_POPULATION,
            town_min_population: TOWN_MIN_POPULATION,
        }
    }
}

/// Everything a single import run needs besides the store.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub archive_path: PathBuf,
    pub entry_name: String,
    pub batch_size: usize,
    pub classifier: ClassifierConfig,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            archive_path: PathBuf::from(ARCHIVE_PATH),
            entry_name: ENTRY_NAME.to_string(),
            batch_size: BATCH_SIZE,
            classifier: ClassifierConfig::default(),
        }
    }
}
