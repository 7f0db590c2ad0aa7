//! Aggregation queries run against the loaded tables.
//!
//! The SQL returns raw aggregates (counts, rates, quartiles, ranks); tiers and
//! quadrants are derived in [`super::classify`].

use futures::TryStreamExt;
use sqlx::{FromRow, PgPool};

use super::classify::{Quartiles, RiskTier, ZoneTypology, rate_ratio};
use crate::config::AnalysisConfig;
use crate::error::Result;

const COUNT_ACCIDENTS: &str = "SELECT COUNT(*) FROM accidents";

/// Condition combinations above the national mortality rate.
/// `$1` minimum distinct accidents per group, `$2` row limit.
const DANGEROUS_CONDITIONS: &str = r"
WITH national_rate AS (
    SELECT
        ROUND(100.0 * SUM(CASE WHEN u.gravite = 2 THEN 1 ELSE 0 END)
              / NULLIF(COUNT(u.id_usager), 0), 3) AS taux_mortalite_national
    FROM accidents a
    JOIN usagers u ON a.num_acc = u.num_acc
),
combinations AS (
    SELECT
        a.conditions_atmospheriques,
        a.luminosite,
        l.categorie_route,
        l.etat_surface,
        COUNT(DISTINCT a.num_acc) AS nb_accidents,
        COUNT(u.id_usager) AS nb_usagers,
        SUM(CASE WHEN u.gravite = 2 THEN 1 ELSE 0 END) AS nb_tues,
        SUM(CASE WHEN u.gravite = 3 THEN 1 ELSE 0 END) AS nb_blesses_graves,
        ROUND(100.0 * SUM(CASE WHEN u.gravite = 2 THEN 1 ELSE 0 END)
              / NULLIF(COUNT(u.id_usager), 0), 3) AS taux_mortalite
    FROM accidents a
    JOIN lieux l ON a.num_acc = l.num_acc
    JOIN usagers u ON a.num_acc = u.num_acc
    WHERE a.conditions_atmospheriques IS NOT NULL
      AND a.luminosite IS NOT NULL
      AND l.categorie_route IS NOT NULL
      AND l.etat_surface IS NOT NULL
    GROUP BY a.conditions_atmospheriques, a.luminosite, l.categorie_route, l.etat_surface
    HAVING COUNT(DISTINCT a.num_acc) >= $1
)
SELECT
    c.conditions_atmospheriques,
    c.luminosite,
    c.categorie_route,
    c.etat_surface,
    c.nb_accidents::int8 AS nb_accidents,
    c.nb_usagers::int8 AS nb_usagers,
    c.nb_tues::int8 AS nb_tues,
    c.nb_blesses_graves::int8 AS nb_blesses_graves,
    c.taux_mortalite::float8 AS taux_mortalite,
    n.taux_mortalite_national::float8 AS taux_mortalite_national
FROM combinations c, national_rate n
WHERE c.taux_mortalite > n.taux_mortalite_national
ORDER BY c.taux_mortalite DESC
LIMIT $2
";

/// Per-department volume and severity with cross-department quartiles
const ZONE_STATISTICS: &str = r"
WITH departments AS (
    SELECT
        a.departement_code,
        COUNT(DISTINCT a.num_acc) AS nb_accidents,
        SUM(CASE WHEN u.gravite = 2 THEN 1 ELSE 0 END) AS nb_tues,
        ROUND(100.0 * SUM(CASE WHEN u.gravite = 2 THEN 1 ELSE 0 END)
              / NULLIF(COUNT(u.id_usager), 0), 3) AS taux_mortalite,
        ROUND(100.0 * SUM(CASE WHEN u.gravite IN (2, 3) THEN 1 ELSE 0 END)
              / NULLIF(COUNT(u.id_usager), 0), 3) AS taux_gravite
    FROM accidents a
    JOIN usagers u ON a.num_acc = u.num_acc
    GROUP BY a.departement_code
),
quartiles AS (
    SELECT
        PERCENTILE_CONT(0.50) WITHIN GROUP (ORDER BY nb_accidents) AS q2_volume,
        PERCENTILE_CONT(0.75) WITHIN GROUP (ORDER BY nb_accidents) AS q3_volume,
        PERCENTILE_CONT(0.50) WITHIN GROUP (ORDER BY taux_gravite) AS q2_gravite,
        PERCENTILE_CONT(0.75) WITHIN GROUP (ORDER BY taux_gravite) AS q3_gravite
    FROM departments
)
SELECT
    d.departement_code,
    d.nb_accidents::int8 AS nb_accidents,
    d.nb_tues::int8 AS nb_tues,
    d.taux_mortalite::float8 AS taux_mortalite,
    d.taux_gravite::float8 AS taux_gravite,
    q.q2_volume::float8 AS q2_volume,
    q.q3_volume::float8 AS q3_volume,
    q.q2_gravite::float8 AS q2_gravite,
    q.q3_gravite::float8 AS q3_gravite,
    RANK() OVER (ORDER BY d.nb_accidents DESC)::int8 AS rang_volume,
    RANK() OVER (ORDER BY d.taux_gravite DESC)::int8 AS rang_gravite
FROM departments d, quartiles q
ORDER BY d.nb_accidents DESC
";

/// Mortality by user category against the global rate.
/// `$1` minimum persons per category.
const USER_CATEGORY_RISK: &str = r"
WITH categories AS (
    SELECT
        u.categorie_usager,
        COUNT(u.id_usager) AS nb_usagers,
        SUM(CASE WHEN u.gravite = 2 THEN 1 ELSE 0 END) AS nb_tues,
        SUM(CASE WHEN u.gravite = 3 THEN 1 ELSE 0 END) AS nb_blesses_graves,
        SUM(CASE WHEN u.gravite = 4 THEN 1 ELSE 0 END) AS nb_blesses_legers,
        SUM(CASE WHEN u.gravite = 1 THEN 1 ELSE 0 END) AS nb_indemnes,
        ROUND(100.0 * SUM(CASE WHEN u.gravite = 2 THEN 1 ELSE 0 END)
              / NULLIF(COUNT(u.id_usager), 0), 3) AS taux_mortalite,
        ROUND(100.0 * SUM(CASE WHEN u.gravite IN (2, 3) THEN 1 ELSE 0 END)
              / NULLIF(COUNT(u.id_usager), 0), 3) AS taux_gravite
    FROM usagers u
    WHERE u.categorie_usager IS NOT NULL
    GROUP BY u.categorie_usager
    HAVING COUNT(u.id_usager) >= $1
),
global_rate AS (
    SELECT
        ROUND(100.0 * SUM(CASE WHEN u.gravite = 2 THEN 1 ELSE 0 END)
              / NULLIF(COUNT(u.id_usager), 0), 3) AS taux_mortalite_global
    FROM usagers u
)
SELECT
    c.categorie_usager,
    c.nb_usagers::int8 AS nb_usagers,
    c.nb_tues::int8 AS nb_tues,
    c.nb_blesses_graves::int8 AS nb_blesses_graves,
    c.nb_blesses_legers::int8 AS nb_blesses_legers,
    c.nb_indemnes::int8 AS nb_indemnes,
    c.taux_mortalite::float8 AS taux_mortalite,
    c.taux_gravite::float8 AS taux_gravite,
    g.taux_mortalite_global::float8 AS taux_mortalite_global
FROM categories c, global_rate g
ORDER BY c.taux_mortalite DESC
";

/// One condition combination (atmosphere, luminosity, road category, surface)
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ConditionRisk {
    pub conditions_atmospheriques: Option<i32>,
    pub luminosite: Option<i32>,
    pub categorie_route: Option<i32>,
    pub etat_surface: Option<i32>,
    pub nb_accidents: i64,
    pub nb_usagers: i64,
    pub nb_tues: i64,
    pub nb_blesses_graves: i64,
    pub taux_mortalite: Option<f64>,
    pub taux_mortalite_national: Option<f64>,
}

impl ConditionRisk {
    #[must_use]
    pub fn ratio_vs_national(&self) -> Option<f64> {
        rate_ratio(self.taux_mortalite, self.taux_mortalite_national)
    }

    #[must_use]
    pub fn tier(&self) -> RiskTier {
        RiskTier::classify(self.taux_mortalite, self.taux_mortalite_national)
    }
}

/// Accident volume and severity of one department
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ZoneStats {
    pub departement_code: Option<String>,
    pub nb_accidents: i64,
    pub nb_tues: i64,
    pub taux_mortalite: Option<f64>,
    pub taux_gravite: Option<f64>,
    pub q2_volume: Option<f64>,
    pub q3_volume: Option<f64>,
    pub q2_gravite: Option<f64>,
    pub q3_gravite: Option<f64>,
    pub rang_volume: i64,
    pub rang_gravite: i64,
}

impl ZoneStats {
    /// Quartiles shared by every department of the result
    #[must_use]
    pub fn quartiles(&self) -> Option<Quartiles> {
        Some(Quartiles {
            q2_volume: self.q2_volume?,
            q3_volume: self.q3_volume?,
            q2_severity: self.q2_gravite?,
            q3_severity: self.q3_gravite?,
        })
    }

    #[must_use]
    pub fn typology(&self) -> ZoneTypology {
        self.quartiles().map_or(ZoneTypology::Standard, |q| {
            ZoneTypology::classify(self.nb_accidents as f64, self.taux_gravite, &q)
        })
    }
}

/// Outcome distribution of one user category
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct UserCategoryRisk {
    pub categorie_usager: Option<i32>,
    pub nb_usagers: i64,
    pub nb_tues: i64,
    pub nb_blesses_graves: i64,
    pub nb_blesses_legers: i64,
    pub nb_indemnes: i64,
    pub taux_mortalite: Option<f64>,
    pub taux_gravite: Option<f64>,
    pub taux_mortalite_global: Option<f64>,
}

impl UserCategoryRisk {
    #[must_use]
    pub fn ratio_vs_global(&self) -> Option<f64> {
        rate_ratio(self.taux_mortalite, self.taux_mortalite_global)
    }

    #[must_use]
    pub fn tier(&self) -> RiskTier {
        RiskTier::classify(self.taux_mortalite, self.taux_mortalite_global)
    }
}

/// Number of accidents in the store, doubling as a connection check
pub async fn count_accidents(pool: &PgPool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(COUNT_ACCIDENTS)
        .fetch_one(pool)
        .await
        .map_err(|e| anyhow::anyhow!("Connection check failed: {e}"))?;
    Ok(count)
}

/// Condition combinations deadlier than the national average
pub async fn dangerous_conditions(pool: &PgPool, config: &AnalysisConfig) -> Result<Vec<ConditionRisk>> {
    let rows: Vec<ConditionRisk> = sqlx::query_as::<_, ConditionRisk>(DANGEROUS_CONDITIONS)
        .bind(config.min_condition_accidents)
        .bind(config.top_conditions)
        .fetch(pool)
        .try_collect()
        .await
        .map_err(|e| anyhow::anyhow!("Dangerous conditions query failed: {e}"))?;
    Ok(rows)
}

/// Every department with its volume, severity and quartiles
pub async fn zone_statistics(pool: &PgPool) -> Result<Vec<ZoneStats>> {
    let rows: Vec<ZoneStats> = sqlx::query_as::<_, ZoneStats>(ZONE_STATISTICS)
        .fetch(pool)
        .try_collect()
        .await
        .map_err(|e| anyhow::anyhow!("Zone statistics query failed: {e}"))?;
    Ok(rows)
}

/// User categories with enough persons, deadliest first
pub async fn user_category_risk(pool: &PgPool, config: &AnalysisConfig) -> Result<Vec<UserCategoryRisk>> {
    let rows: Vec<UserCategoryRisk> = sqlx::query_as::<_, UserCategoryRisk>(USER_CATEGORY_RISK)
        .bind(config.min_category_persons)
        .fetch(pool)
        .try_collect()
        .await
        .map_err(|e| anyhow::anyhow!("User category query failed: {e}"))?;
    Ok(rows)
}
