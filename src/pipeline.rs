//! End-to-end ETL run: read the snapshot, assemble the tables, load the store.

use std::time::Instant;

use anyhow::Context;
use log::info;

use crate::assembler::{EtlTables, assemble};
use crate::config::{DatabaseConfig, EtlConfig};
use crate::error::Result;
use crate::reader::read_raw_snapshot;
use crate::store::{BulkLoader, LoadReport, PgTableStore};
use crate::utils::logging::{create_spinner, finish_progress_bar, log_operation_complete, log_stage};

/// Stages reported by a full run
pub const STAGES: usize = 5;

/// Read and assemble the snapshot named by `config`
///
/// Assembly runs on a dedicated rayon pool of `config.worker_threads`
/// threads. The raw batches are released once the tables are built.
pub fn run_transform(config: &EtlConfig) -> Result<EtlTables> {
    log_stage(1, STAGES, "Reading raw snapshot");
    let start = Instant::now();
    let spinner = create_spinner(Some("Reading parquet snapshot"));
    let raw = read_raw_snapshot(&config.source_path, config.read_batch_size)?;
    let raw_rows: usize = raw.iter().map(|b| b.num_rows()).sum();
    finish_progress_bar(&spinner, Some("Snapshot read"));
    log_operation_complete("read", raw_rows, start.elapsed());

    log_stage(2, STAGES, "Assembling target tables");
    let start = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build()
        .context("Failed to build the transform thread pool")?;
    info!("Using {} worker threads", pool.current_num_threads());

    let tables = pool.install(|| assemble(&raw))?;
    drop(raw);

    log_operation_complete("assembled", tables.total_rows(), start.elapsed());
    for (table, rows) in tables.row_counts() {
        info!("  {:<10} {rows:>10} rows", table.table_name());
    }

    Ok(tables)
}

/// Load assembled tables into the PostgreSQL store
pub async fn run_load(config: &EtlConfig, database: &DatabaseConfig, tables: &EtlTables) -> Result<LoadReport> {
    log_stage(3, STAGES, "Loading tables into the store");
    let store = PgTableStore::connect(database).await?;
    let report = BulkLoader::new(config.insert_chunk_size)
        .load_and_close(store, tables)
        .await?;

    for load in &report.tables {
        info!(
            "  {:<10} {:>10} rows in {:.2?}",
            load.table.table_name(),
            load.rows,
            load.elapsed
        );
    }
    info!(
        "Loaded {} rows in {:.2?}",
        report.total_rows(),
        report.elapsed
    );

    Ok(report)
}

/// Transform then load
pub async fn run_etl(config: &EtlConfig, database: &DatabaseConfig) -> Result<LoadReport> {
    let config_for_transform = config.clone();
    let tables = tokio::task::spawn_blocking(move || run_transform(&config_for_transform))
        .await
        .context("Transform task panicked")??;

    run_load(config, database, &tables).await
}
