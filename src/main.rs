use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use tle_catalog::config::Settings;
use tle_catalog::feed;
use tle_catalog::refresh;
use tle_catalog::server::{self, AppState};
use tle_catalog::store::{SqliteStore, TleStore};
use tle_catalog::tle::CatalogId;

#[derive(Parser)]
#[command(name = "tle_catalog", about = "TLE catalog ingester and read API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Listen address (default: TLE_BIND or 127.0.0.1:3000)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Fetch the text feed and replace the stored catalog
    Refresh,
    /// Fetch the JSON OMM feed and replace the satellites table
    RefreshOmm,
    /// Show row counts
    Stats,
    /// Print one TLE by catalog number
    Get { norad_cat_id: CatalogId },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load settings")?;
    info!(settings = ?settings, "Settings loaded");

    let store = Arc::new(SqliteStore::open(&settings.db_path)?);

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind.clone());
            let client = feed::client(&settings)?;
            let state = Arc::new(AppState::new(settings, store, client));
            server::serve(state, &bind).await?;
        }
        Commands::Refresh => {
            let client = feed::client(&settings)?;
            let raw = feed::fetch_text(&client, &settings.feed_url).await?;

            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {pos} rows written")?,
            );
            let report = refresh::ingest_with_progress(
                &*store,
                &raw,
                settings.batch_size,
                &mut |n| pb.inc(n as u64),
            )?;
            pb.finish_and_clear();

            println!(
                "Replaced catalog: {} records in {} batches, {} stored ({} malformed dropped, {} previous rows deleted).",
                report.inserted, report.batches, report.stored, report.malformed, report.deleted
            );
        }
        Commands::RefreshOmm => {
            let client = feed::client(&settings)?;
            let records = feed::fetch_omm(&client, &settings.omm_feed_url).await?;
            let stats = store.replace_satellites(&records, settings.batch_size)?;
            println!(
                "Replaced satellites: {} rows in {} batches ({} previous rows deleted).",
                stats.inserted, stats.batches, stats.deleted
            );
        }
        Commands::Stats => {
            println!("Database:   {:?}", settings.db_path);
            println!("TLEs:       {}", store.count()?);
            println!("Satellites: {}", store.count_satellites()?);
        }
        Commands::Get { norad_cat_id } => match store.find_by_id(norad_cat_id)? {
            Some(rec) => println!("{}", rec.render()),
            None => println!("No TLE found for {}", norad_cat_id),
        },
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    Ok(())
}
