//! Text rendering of the analysis results.
//!
//! Every function returns the lines of one report section; the caller decides
//! where they go.

use itertools::Itertools;

use super::classify::ZoneTypology;
use super::queries::{ConditionRisk, UserCategoryRisk, ZoneStats};
use crate::codes::labels;

/// Label fragments identifying vulnerable road users
pub const VULNERABLE_KEYWORDS: &[&str] = &["Vélo", "Piéton", "Cyclomoteur", "Trottinette", "EDP"];

/// Departments listed in the critical-zone section
const CRITICAL_SHOWN: usize = 10;

const MISSING: &str = "N/A";

fn rate(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.1}"))
}

fn ratio(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.2}"))
}

fn rule(width: usize) -> String {
    "-".repeat(width)
}

/// Whether a user-category label names a vulnerable road user
#[must_use]
pub fn is_vulnerable(label: &str) -> bool {
    VULNERABLE_KEYWORDS.iter().any(|keyword| label.contains(keyword))
}

/// The four condition labels of a combination
#[must_use]
pub fn condition_labels(row: &ConditionRisk) -> [&'static str; 4] {
    [
        labels::atmosphere(row.conditions_atmospheriques),
        labels::luminosity(row.luminosite),
        labels::road_category(row.categorie_route),
        labels::surface(row.etat_surface),
    ]
}

/// Dangerous condition combinations, the first `shown` in detail
#[must_use]
pub fn conditions_section(rows: &[ConditionRisk], shown: usize) -> Vec<String> {
    let mut lines = vec![
        format!("Results: {} dangerous combinations", rows.len()),
        String::new(),
        format!("TOP {shown} MOST DANGEROUS CONDITIONS:"),
        rule(80),
    ];

    for (i, row) in rows.iter().take(shown).enumerate() {
        lines.push(format!("{}. {}", i + 1, condition_labels(row).join(" | ")));
        lines.push(format!(
            "   Accidents: {} | Mortality rate: {}% | Ratio vs national: {}x | Level: {}",
            row.nb_accidents,
            rate(row.taux_mortalite),
            ratio(row.ratio_vs_national()),
            row.tier().danger_label()
        ));
    }

    if let Some(first) = rows.first() {
        lines.push(format!(
            "National reference mortality rate: {}%",
            rate(first.taux_mortalite_national)
        ));
    }

    lines
}

/// Department count per typology, most frequent first
#[must_use]
pub fn typology_distribution(rows: &[ZoneStats]) -> Vec<(ZoneTypology, usize)> {
    rows.iter()
        .map(ZoneStats::typology)
        .counts()
        .into_iter()
        .sorted_by(|(a, na), (b, nb)| nb.cmp(na).then(a.cmp(b)))
        .collect()
}

/// Zone typology distribution, critical departments and top departments by volume
#[must_use]
pub fn zones_section(rows: &[ZoneStats], shown: usize) -> Vec<String> {
    let mut lines = vec![
        format!("{} departments analysed", rows.len()),
        String::new(),
        "DISTRIBUTION BY TYPOLOGY:".to_string(),
    ];
    for (typology, count) in typology_distribution(rows) {
        lines.push(format!("  {typology} : {count} departments"));
    }

    let critical = rows
        .iter()
        .filter(|row| row.typology() == ZoneTypology::Critical)
        .take(CRITICAL_SHOWN)
        .collect_vec();
    if !critical.is_empty() {
        lines.push(String::new());
        lines.push("CRITICAL DEPARTMENTS (high volume and severity):".to_string());
        for row in critical {
            lines.push(format!(
                "  {} - {} accidents - Severity rate: {}%",
                row.departement_code.as_deref().unwrap_or(MISSING),
                row.nb_accidents,
                rate(row.taux_gravite)
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!("TOP {shown} DEPARTMENTS BY ACCIDENT VOLUME:"));
    for row in rows.iter().take(shown) {
        lines.push(format!(
            "  {:2}. Dept {} - {:4} accidents - Severity: {:>5}% (rank {}) - {}",
            row.rang_volume,
            row.departement_code.as_deref().unwrap_or(MISSING),
            row.nb_accidents,
            rate(row.taux_gravite),
            row.rang_gravite,
            row.typology()
        ));
    }

    lines
}

/// Person counts per severity of one category, deadliest first
#[must_use]
pub fn outcome_breakdown(row: &UserCategoryRisk) -> String {
    [
        (2, row.nb_tues),
        (3, row.nb_blesses_graves),
        (4, row.nb_blesses_legers),
        (1, row.nb_indemnes),
    ]
    .iter()
    .map(|&(code, count)| format!("{}: {count}", labels::severity(Some(code))))
    .join(" | ")
}

/// Most vulnerable user categories and the vulnerable-user focus
#[must_use]
pub fn user_categories_section(rows: &[UserCategoryRisk], shown: usize) -> Vec<String> {
    let mut lines = vec![
        format!("{} user categories analysed", rows.len()),
        String::new(),
        format!("TOP {shown} MOST VULNERABLE USER CATEGORIES:"),
        rule(70),
    ];

    for (i, row) in rows.iter().take(shown).enumerate() {
        lines.push(format!("{:2}. {}", i + 1, labels::user_category(row.categorie_usager)));
        lines.push(format!(
            "     Persons: {:5} | Killed: {:3} | Mortality rate: {:>5}% | Ratio: {}x | {}",
            row.nb_usagers,
            row.nb_tues,
            rate(row.taux_mortalite),
            ratio(row.ratio_vs_global()),
            row.tier().vulnerability_label()
        ));
        lines.push(format!("     {}", outcome_breakdown(row)));
    }

    let vulnerable = rows
        .iter()
        .filter(|row| is_vulnerable(labels::user_category(row.categorie_usager)))
        .collect_vec();
    if !vulnerable.is_empty() {
        lines.push(String::new());
        lines.push("VULNERABLE ROAD USERS:".to_string());
        lines.push(rule(50));
        for row in vulnerable {
            lines.push(format!(
                "  {}: {}% mortality ({}x average)",
                labels::user_category(row.categorie_usager),
                rate(row.taux_mortalite),
                ratio(row.ratio_vs_global())
            ));
        }
    }

    lines
}

/// Key findings of the three analyses
#[must_use]
pub fn synthesis(
    conditions: &[ConditionRisk],
    zones: &[ZoneStats],
    categories: &[UserCategoryRisk],
) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(top) = conditions.first() {
        let [atmosphere, luminosity, road, surface] = condition_labels(top);
        lines.extend([
            "DANGEROUS CONDITIONS:".to_string(),
            format!(
                "  {} combinations deadlier than the national average",
                conditions.len()
            ),
            "  Riskiest combination:".to_string(),
            format!("    Weather: {atmosphere}"),
            format!("    Lighting: {luminosity}"),
            format!("    Road: {road}"),
            format!("    Surface: {surface}"),
            format!(
                "    Mortality rate: {}% (x{} vs national)",
                rate(top.taux_mortalite),
                ratio(top.ratio_vs_national())
            ),
        ]);
    }

    lines.push("ZONE TYPOLOGY:".to_string());
    for (typology, count) in typology_distribution(zones) {
        lines.push(format!("  {typology} : {count} departments"));
    }

    if let Some(top) = categories.first() {
        lines.extend([
            "VULNERABLE USERS:".to_string(),
            format!(
                "  Most vulnerable category: {}",
                labels::user_category(top.categorie_usager)
            ),
            format!(
                "  Mortality rate: {}% (x{} vs global average)",
                rate(top.taux_mortalite),
                ratio(top.ratio_vs_global())
            ),
        ]);
    }

    lines
}
