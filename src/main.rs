use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use accident_etl::config::DEFAULT_LOG_DIR;
use accident_etl::pipeline::STAGES;
use accident_etl::utils::logging::{init_logging, log_banner, log_stage};
use accident_etl::{AnalysisConfig, DatabaseConfig, EtlConfig, Result, run_analysis, run_etl};
use log::{error, info};
use sqlx::postgres::PgPoolOptions;

async fn run() -> Result<()> {
    let start = Instant::now();
    let config = EtlConfig::from_env()?;
    let database = DatabaseConfig::from_env()?;
    info!("Source snapshot: {}", config.source_path.display());
    info!("Target database: {}", database.masked_url());

    log_banner("ROAD ACCIDENT ETL");
    let report = run_etl(&config, &database).await?;
    info!(
        "ETL completed: {} rows loaded in {:.2?}",
        report.total_rows(),
        start.elapsed()
    );

    log_stage(4, STAGES, "Connecting for analysis");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database.connection_url())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to {}: {e}", database.masked_url()))?;

    log_stage(5, STAGES, "Running analyses");
    let analysis = run_analysis(&pool, &AnalysisConfig::default()).await;
    pool.close().await;
    analysis?;

    log_banner("PIPELINE COMPLETED");
    info!("Total time: {:.2?}", start.elapsed());
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let log_dir = std::env::var("ETL_LOG_DIR").map_or_else(|_| PathBuf::from(DEFAULT_LOG_DIR), PathBuf::from);
    match init_logging(&log_dir, "etl") {
        Ok(path) => info!("Logging to {}", path.display()),
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_banner("PIPELINE FAILED");
            error!("Error: {e}");
            for cause in e.chain().skip(1) {
                error!("  caused by: {cause}");
            }
            ExitCode::FAILURE
        }
    }
}
