//! GeoNames gazetteer import.
//!
//! Reads the gazetteer dump from its zip archive, keeps the places that fit
//! the hierarchy and writes them to PostgreSQL, replacing what was there.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gazetteer::config::{self, ClassifierConfig, ImportOptions};
use gazetteer::run_import;
use gazetteer::store::{HierarchyStore, MemoryStore, PgStore};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "import")]
#[command(about = "Import the GeoNames gazetteer into the place hierarchy")]
struct Args {
    /// Zip archive containing the gazetteer dump
    #[arg(short, long, default_value = config::ARCHIVE_PATH)]
    archive: PathBuf,

    /// Name of the gazetteer entry inside the archive
    #[arg(long, default_value = config::ENTRY_NAME)]
    entry: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", default_value = config::DATABASE_URL)]
    database_url: String,

    /// Rows per persistence batch
    #[arg(long, default_value_t = config::BATCH_SIZE)]
    batch_size: usize,

    /// Classify and resolve against an in-memory store instead of the database
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("Gazetteer Import");
    info!("Archive: {} ({})", args.archive.display(), args.entry);

    let options = ImportOptions {
        archive_path: args.archive,
        entry_name: args.entry,
        batch_size: args.batch_size,
        classifier: ClassifierConfig::default(),
    };

    let mut store: Box<dyn HierarchyStore> = if args.dry_run {
        info!("Dry run, nothing will be written to the database");
        Box::new(MemoryStore::new())
    } else {
        let store = PgStore::connect(&args.database_url)
            .await
            .context("Failed to connect to PostgreSQL")?;
        info!("Connected to PostgreSQL");
        Box::new(store)
    };

    run_import(&mut *store, &options).await?;

    Ok(())
}
