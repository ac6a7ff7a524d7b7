//! End-to-end import: scan the archive, then persist level by level.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use crate::archive::GazetteerArchive;
use crate::classify::{scan_lines, Candidates, RecordClassifier};
use crate::config::ImportOptions;
use crate::error::ArchiveError;
use crate::persist::BatchPersister;
use crate::resolve::HierarchyContext;
use crate::stats::ImportStats;
use crate::store::HierarchyStore;

/// Run a full import into `store`.
///
/// The store is closed before returning, whether the import succeeded or not.
/// Only archive problems and a failed table reset are fatal; per-record
/// failures are counted in the returned stats.
pub async fn run_import<S>(store: &mut S, options: &ImportOptions) -> Result<ImportStats>
where
    S: HierarchyStore + ?Sized,
{
    let result = import(store, options).await;
    store.close().await;

    match &result {
        Ok(stats) => stats.log_summary(),
        Err(e) => error!("Import aborted: {:#}", e),
    }

    result
}

async fn import<S>(store: &mut S, options: &ImportOptions) -> Result<ImportStats>
where
    S: HierarchyStore + ?Sized,
{
    info!("Scanning {}", options.archive_path.display());

    // Decompression and classification are blocking; keep them off the runtime.
    let scan_options = options.clone();
    let (candidates, mut stats) = tokio::task::spawn_blocking(move || {
        let mut stats = ImportStats::new();
        let progress = scan_progress_bar();
        let result = scan_archive(&scan_options, &mut stats, &progress);
        progress.finish_and_clear();
        result.map(|candidates| (candidates, stats))
    })
    .await
    .context("Archive scan task failed")?
    .context("Failed to read gazetteer archive")?;

    // Only wipe existing data once the archive is known to be readable.
    store
        .reset()
        .await
        .context("Failed to clear hierarchy tables")?;

    let mut context: HierarchyContext = HierarchyContext::new();
    BatchPersister::new(store, &mut context, &mut stats, options.batch_size)
        .persist_all(&candidates)
        .await;

    Ok(stats)
}

/// Open the archive and classify every line of the gazetteer entry.
pub fn scan_archive(
    options: &ImportOptions,
    stats: &mut ImportStats,
    progress: &ProgressBar,
) -> Result<Candidates, ArchiveError> {
    let mut archive = GazetteerArchive::open(&options.archive_path)?;
    let lines = archive.entry_lines(&options.entry_name)?;
    let classifier = RecordClassifier::new(options.classifier.clone());
    scan_lines(lines, &classifier, stats, progress)
}

fn scan_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} lines ({per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::tests::write_zip;
    use crate::classify::tests::line;
    use crate::config::ClassifierConfig;
    use crate::models::{GeoPoint, Level, LocationRef, NewCountry};
    use crate::store::MemoryStore;
    use tempfile::TempDir;

    const ENTRY: &str = "allCountries.txt";

    fn fixture(lines: &[String]) -> (TempDir, ImportOptions) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("allCountries.zip");
        let mut content = lines.join("\n");
        content.push('\n');
        write_zip(&path, ENTRY, &content);

        let options = ImportOptions {
            archive_path: path,
            entry_name: ENTRY.to_string(),
            batch_size: 2,
            classifier: ClassifierConfig::with_allowlist(["XX", "YY"]),
        };
        (dir, options)
    }

    #[tokio::test]
    async fn test_one_of_each_level() {
        let (_dir, options) = fixture(&[
            line(1, "Xland", "PCLI", "XX", 10.0, 10.0, 10_000_000),
            line(2, "Xcity", "PPLC", "XX", 10.5, 10.5, 60_000),
            line(3, "Xdistrict", "ADM2", "XX", 10.6, 10.6, 500),
            line(4, "Xtown", "PPLS", "XX", 10.7, 10.7, 1_500),
        ]);
        let mut store = MemoryStore::new();
        let stats = run_import(&mut store, &options).await.unwrap();

        assert_eq!(store.countries().len(), 1);
        assert_eq!(store.cities().len(), 1);
        assert_eq!(store.districts().len(), 1);
        assert_eq!(store.towns().len(), 1);

        let country_id = store.countries()[0].id;
        let city_id = store.cities()[0].id;
        let district = &store.districts()[0].data;
        let town = &store.towns()[0].data;
        assert_eq!(store.cities()[0].data.country_id, country_id);
        assert_eq!(district.city_id, Some(city_id));
        assert_eq!(town.city_id, Some(city_id));
        assert_eq!(town.district_id, Some(store.districts()[0].id));

        assert_eq!(stats.lines_processed, 4);
        assert_eq!(stats.errors(), 0);
        for level in Level::all() {
            assert_eq!(stats.created(*level), 1);
        }
        assert!(store.is_closed());
    }

    #[tokio::test]
    async fn test_country_row_contents() {
        let (_dir, options) = fixture(&[line(1, "Xland", "PCLI", "XX", 1.0, 2.0, 1_000)]);
        let mut store = MemoryStore::new();
        run_import(&mut store, &options).await.unwrap();

        let country: &NewCountry = &store.countries()[0].data;
        assert_eq!(country.iso2, "XX");
        assert_eq!(country.area_sqkm, 300);
        assert_eq!(country.timezone, "Europe/Test");
        // Synthetic code, so no reference data.
        assert_eq!(country.iso3, None);
    }

    #[tokio::test]
    async fn test_duplicate_country_keeps_most_populous() {
        let (_dir, options) = fixture(&[
            line(10, "Yland", "PCLI", "YY", 0.0, 0.0, 5_000_000),
            line(11, "Yland", "PCLI", "YY", 0.0, 0.0, 8_000_000),
        ]);
        let mut store = MemoryStore::new();
        run_import(&mut store, &options).await.unwrap();

        assert_eq!(store.countries().len(), 1);
        assert_eq!(store.countries()[0].data.population, 8_000_000);
        assert_eq!(store.countries()[0].data.geoname_id, 11);
    }

    #[tokio::test]
    async fn test_city_outside_allowlist() {
        let (_dir, options) = fixture(&[line(20, "Zcity", "PPLC", "ZZ", 0.0, 0.0, 900_000)]);
        let mut store = MemoryStore::new();
        let stats = run_import(&mut store, &options).await.unwrap();

        assert!(store.cities().is_empty());
        assert_eq!(stats.lines_processed, 1);
        assert_eq!(stats.errors(), 0);
    }

    #[tokio::test]
    async fn test_city_without_country_is_counted() {
        let (_dir, options) = fixture(&[
            line(30, "Orphan", "PPLA", "XX", 0.0, 0.0, 90_000),
            line(31, "Ytown", "PPL", "YY", 0.0, 0.0, 2_000),
        ]);
        let mut store = MemoryStore::new();
        let stats = run_import(&mut store, &options).await.unwrap();

        assert!(store.cities().is_empty());
        assert!(store.towns().is_empty());
        assert_eq!(stats.errors_for(Level::City), 1);
        assert_eq!(stats.errors_for(Level::Town), 1);
        assert_eq!(stats.errors(), 2);
    }

    #[tokio::test]
    async fn test_malformed_line_is_discarded() {
        let (_dir, options) = fixture(&[
            "1\tBroken\tBroken\t\t0\t0\tA\tPCLI\tXX\t".to_string(),
            line(2, "Xland", "PCLI", "XX", 0.0, 0.0, 10),
        ]);
        let mut store = MemoryStore::new();
        let stats = run_import(&mut store, &options).await.unwrap();

        assert_eq!(stats.lines_processed, 2);
        assert_eq!(stats.candidates(Level::Country), 1);
        assert_eq!(store.countries()[0].data.geoname_id, 2);
        assert_eq!(stats.errors(), 0);
    }

    #[tokio::test]
    async fn test_population_thresholds() {
        let (_dir, options) = fixture(&[
            line(1, "Xland", "PCLI", "XX", 0.0, 0.0, 1),
            line(2, "Almost", "PPLC", "XX", 0.0, 0.0, 49_999),
            line(3, "Exactly", "PPLS", "XX", 0.0, 0.0, 1_000),
            line(4, "Empty", "ADM4", "XX", 0.0, 0.0, 0),
        ]);
        let mut store = MemoryStore::new();
        run_import(&mut store, &options).await.unwrap();

        assert!(store.cities().is_empty());
        assert_eq!(store.towns().len(), 1);
        assert_eq!(store.towns()[0].data.geoname_id, 3);
        assert_eq!(store.districts().len(), 1);
        assert_eq!(store.districts()[0].data.city_id, None);
    }

    #[tokio::test]
    async fn test_parents_scoped_to_same_country() {
        let (_dir, options) = fixture(&[
            line(1, "Xland", "PCLI", "XX", 0.0, 0.0, 1_000_000),
            line(2, "Yland", "PCLI", "YY", 0.0, 0.0, 1_000_000),
            line(3, "Xcity", "PPLC", "XX", 50.0, 50.0, 100_000),
            line(4, "Ycity", "PPLC", "YY", 0.0, 0.0, 100_000),
            line(5, "Ycity2", "PPLA", "YY", 20.0, 20.0, 100_000),
            // Right next to Xcity, but belongs to YY.
            line(6, "Ytown", "PPLS", "YY", 49.9, 49.9, 5_000),
            line(7, "Ydistrict", "ADM3", "YY", 49.0, 49.0, 0),
        ]);
        let mut store = MemoryStore::new();
        run_import(&mut store, &options).await.unwrap();

        let ycity2 = store
            .cities()
            .iter()
            .find(|c| c.data.geoname_id == 5)
            .unwrap();
        let town = &store.towns()[0].data;
        let district = &store.districts()[0].data;
        assert_eq!(town.city_id, Some(ycity2.id));
        assert_eq!(district.city_id, Some(ycity2.id));

        for town in store.towns() {
            let city_id = town.data.city_id.unwrap();
            let city = store.cities().iter().find(|c| c.id == city_id).unwrap();
            assert_eq!(city.data.country_id, town.data.country_id);
        }
    }

    #[tokio::test]
    async fn test_store_failures_do_not_abort() {
        let mut lines = vec![line(1, "Xland", "PCLI", "XX", 0.0, 0.0, 1)];
        for id in 100..110 {
            lines.push(line(id, "Xtown", "PPLS", "XX", 0.0, 0.0, 2_000));
        }
        let (_dir, options) = fixture(&lines);

        let mut store = MemoryStore::new();
        for id in 100..107 {
            store.reject(id);
        }
        let stats = run_import(&mut store, &options).await.unwrap();

        assert_eq!(store.towns().len(), 3);
        assert_eq!(stats.errors_for(Level::Town), 7);
        assert_eq!(stats.suppressed_errors(Level::Town), 2);
        assert_eq!(stats.created(Level::Town), 3);
    }

    #[tokio::test]
    async fn test_missing_archive_is_fatal_and_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let options = ImportOptions {
            archive_path: dir.path().join("missing.zip"),
            ..ImportOptions::default()
        };

        let mut store = MemoryStore::new();
        let existing = NewCountry::from_record(
            &crate::models::parse_line(&line(1, "Old", "PCLI", "DE", 0.0, 0.0, 1)).unwrap(),
        );
        store.create_country(&existing).await.unwrap();

        let err = run_import(&mut store, &options).await.unwrap_err();
        assert!(err.chain().any(|cause| matches!(
            cause.downcast_ref::<ArchiveError>(),
            Some(ArchiveError::Open { .. })
        )));
        assert_eq!(store.countries().len(), 1);
        assert!(store.is_closed());
    }

    #[tokio::test]
    async fn test_missing_entry_is_fatal() {
        let (_dir, mut options) = fixture(&[line(1, "Xland", "PCLI", "XX", 0.0, 0.0, 1)]);
        options.entry_name = "cities500.txt".to_string();

        let mut store = MemoryStore::new();
        let err = run_import(&mut store, &options).await.unwrap_err();
        assert!(err.chain().any(|cause| matches!(
            cause.downcast_ref::<ArchiveError>(),
            Some(ArchiveError::EntryNotFound { .. })
        )));
        assert!(store.is_closed());
    }

    #[tokio::test]
    async fn test_existing_rows_are_replaced() {
        let (_dir, options) = fixture(&[line(1, "Xland", "PCLI", "XX", 3.0, 4.0, 1)]);
        let mut store = MemoryStore::new();
        let old = NewCountry::from_record(
            &crate::models::parse_line(&line(99, "Old", "PCLI", "YY", 0.0, 0.0, 1)).unwrap(),
        );
        store.create_country(&old).await.unwrap();

        run_import(&mut store, &options).await.unwrap();

        assert_eq!(store.countries().len(), 1);
        assert_eq!(store.countries()[0].data.geoname_id, 1);
        let id = store.countries()[0].id;
        assert_eq!(
            store
                .location(LocationRef::new(Level::Country, id))
                .await
                .unwrap(),
            Some(GeoPoint::new(3.0, 4.0))
        );
    }
}
