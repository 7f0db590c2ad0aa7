//! Analytical queries over the loaded tables and their text report.
//!
//! Three analyses are run: condition combinations deadlier than the national
//! average, a volume/severity typology of departments, and mortality by user
//! category. Results are returned and also written to the log.

pub mod classify;
pub mod queries;
pub mod report;

use std::time::Instant;

use log::info;
use sqlx::PgPool;

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::utils::logging::log_banner;

pub use classify::{Quartiles, RiskTier, ZoneTypology, rate_ratio};
pub use queries::{ConditionRisk, UserCategoryRisk, ZoneStats};

/// Rows returned by the three analyses
#[derive(Debug, Clone, Default)]
pub struct AnalysisResults {
    pub conditions: Vec<ConditionRisk>,
    pub zones: Vec<ZoneStats>,
    pub categories: Vec<UserCategoryRisk>,
}

fn log_lines(lines: &[String]) {
    for line in lines {
        info!("{line}");
    }
}

/// Run every analysis against the store and log the report
pub async fn run_analysis(pool: &PgPool, config: &AnalysisConfig) -> Result<AnalysisResults> {
    let start = Instant::now();

    let accidents = queries::count_accidents(pool).await?;
    info!("Connected to the store: {accidents} accidents available");

    log_banner("ANALYSIS 1: DANGEROUS CONDITION COMBINATIONS");
    let conditions = queries::dangerous_conditions(pool, config).await?;
    log_lines(&report::conditions_section(&conditions, config.conditions_shown));

    log_banner("ANALYSIS 2: ZONE TYPOLOGY BY DEPARTMENT");
    let zones = queries::zone_statistics(pool).await?;
    log_lines(&report::zones_section(&zones, config.ranking_shown));

    log_banner("ANALYSIS 3: USER CATEGORY VULNERABILITY");
    let categories = queries::user_category_risk(pool, config).await?;
    log_lines(&report::user_categories_section(&categories, config.ranking_shown));

    log_banner("SYNTHESIS");
    log_lines(&report::synthesis(&conditions, &zones, &categories));

    info!("Analysis completed in {:.2?}", start.elapsed());

    Ok(AnalysisResults {
        conditions,
        zones,
        categories,
    })
}
