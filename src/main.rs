//! Command-line interface for bom-etl
//!
//! # Usage Examples
//!
//! ```bash
//! # Daily incremental snapshot (yesterday's changes)
//! bom-etl --daily
//!
//! # Monthly full rebuild with verbose logging
//! bom-etl --monthly --debug
//!
//! # Daily snapshot, pruning snapshots older than 30 days
//! bom-etl --daily --cleanup 30
//!
//! # Disable retention cleanup entirely
//! bom-etl --daily --cleanup 0
//! ```
//!
//! Exactly one of `--daily` / `--monthly` is required. Any unrecoverable
//! failure (config, connection, extraction, load) logs its cause and exits
//! non-zero; summary recording and cleanup are best-effort and never fail
//! the run.

use anyhow::Context;
use bom_etl::{
    cleanup, config, connect, extract, load, normalize, schema, summary, EtlMode,
};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "bom-etl")]
#[command(about = "Snapshot SAP BOM hierarchy data into the Tableau reporting database")]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .multiple(false)
        .args(["daily", "monthly"])
))]
struct Cli {
    /// Run the daily incremental BOM pass (previous day's changes)
    #[arg(long)]
    daily: bool,

    /// Run the monthly full BOM rebuild (complete dataset)
    #[arg(long)]
    monthly: bool,

    /// Delete snapshots older than this many days (0 or negative disables cleanup)
    #[arg(long, default_value_t = 90, allow_negative_numbers = true)]
    cleanup: i32,

    /// Enable verbose debug logging
    #[arg(long)]
    debug: bool,

    /// Path to the connection configuration document
    #[arg(long, default_value = "db.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let mode = if cli.daily {
        EtlMode::Daily
    } else {
        EtlMode::Monthly
    };

    info!("BOM ETL starting ({} mode)", mode.label());

    let db_config = config::load_db_config(&cli.config)?;

    let mut source = connect::connect_mssql(&db_config.sap_db)
        .await
        .context("failed to connect to the SAP source database")?;
    info!("connected to SAP source database");

    let mut target = connect::connect_mssql(&db_config.tableau_db)
        .await
        .context("failed to connect to the Tableau reporting database")?;
    info!("connected to Tableau reporting database");

    schema::ensure_tables(&mut target).await?;

    let sql = config::load_query(mode.sql_file())?;

    // Captured once, before extraction; every row of this run carries it
    let run_start = chrono::Local::now().naive_local();

    let extracted = extract::extract(&mut source, &sql).await;
    // The source is only needed for extraction; release it either way
    if let Err(e) = source.close().await {
        warn!("failed to close source connection: {e:#}");
    }
    let rowset = extracted.with_context(|| format!("{} BOM extraction failed", mode.label()))?;

    let processed = if rowset.is_empty() {
        warn!("{} BOM query returned no rows", mode.label());
        0
    } else {
        let normalized = normalize::normalize(rowset, run_start);
        let count = load::load(
            &mut target,
            schema::BOM_TABLE,
            &normalized,
            load::DEFAULT_BATCH_SIZE,
        )
        .await?;
        summary::record_summary(&mut target, mode.query_name(), count).await;
        count
    };

    if cli.cleanup > 0 {
        cleanup::cleanup_old_rows(&mut target, cli.cleanup).await;
    }

    info!("BOM ETL finished: {processed} rows processed");
    Ok(())
}
