//! Risk tiers and zone typology over aggregated rates.

use std::fmt;

/// Ratio of a group's mortality rate to a reference rate, rounded to 2 decimals
///
/// `None` when either rate is missing or the reference is zero.
#[must_use]
pub fn rate_ratio(rate: Option<f64>, reference: Option<f64>) -> Option<f64> {
    let (rate, reference) = (rate?, reference?);
    if reference == 0.0 {
        return None;
    }
    Some((rate / reference * 100.0).round() / 100.0)
}

/// Mortality rate relative to a reference rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskTier {
    /// More than 3x the reference
    VeryHigh,
    /// More than 2x
    High,
    /// More than 1.5x
    Elevated,
    Normal,
}

impl RiskTier {
    /// Classify a rate against the reference; missing rates are `Normal`
    #[must_use]
    pub fn classify(rate: Option<f64>, reference: Option<f64>) -> Self {
        let (Some(rate), Some(reference)) = (rate, reference) else {
            return Self::Normal;
        };

        if rate > reference * 3.0 {
            Self::VeryHigh
        } else if rate > reference * 2.0 {
            Self::High
        } else if rate > reference * 1.5 {
            Self::Elevated
        } else {
            Self::Normal
        }
    }

    /// Label used for condition combinations
    #[must_use]
    pub const fn danger_label(self) -> &'static str {
        match self {
            Self::VeryHigh => "TRÈS DANGEREUX (>3x)",
            Self::High => "DANGEREUX (>2x)",
            Self::Elevated => "RISQUE ÉLEVÉ (>1.5x)",
            Self::Normal => "RISQUE NORMAL",
        }
    }

    /// Label used for user categories
    #[must_use]
    pub const fn vulnerability_label(self) -> &'static str {
        match self {
            Self::VeryHigh => "TRÈS VULNÉRABLE (>3x)",
            Self::High => "VULNÉRABLE (>2x)",
            Self::Elevated => "À RISQUE (>1.5x)",
            Self::Normal => "RISQUE NORMAL",
        }
    }
}

/// Median and upper quartile of department volume and severity rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    pub q2_volume: f64,
    pub q3_volume: f64,
    pub q2_severity: f64,
    pub q3_severity: f64,
}

/// Volume-vs-severity quadrant of a department
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ZoneTypology {
    /// High volume and high severity
    Critical,
    /// High volume, below-median severity
    Busy,
    /// Below-median volume, high severity
    Dangerous,
    Standard,
}

impl ZoneTypology {
    /// Place a department in its quadrant
    ///
    /// "High" means at or above the upper quartile, "low" strictly below the
    /// median. A missing severity rate never counts as high or low.
    #[must_use]
    pub fn classify(volume: f64, severity: Option<f64>, quartiles: &Quartiles) -> Self {
        let high_volume = volume >= quartiles.q3_volume;
        let low_volume = volume < quartiles.q2_volume;
        let high_severity = severity.is_some_and(|s| s >= quartiles.q3_severity);
        let low_severity = severity.is_some_and(|s| s < quartiles.q2_severity);

        match (high_volume, low_volume, high_severity, low_severity) {
            (true, _, true, _) => Self::Critical,
            (true, _, _, true) => Self::Busy,
            (_, true, true, _) => Self::Dangerous,
            _ => Self::Standard,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "CRITIQUE (Volume + Gravité)",
            Self::Busy => "FRÉQUENTÉE (Volume élevé, gravité normale)",
            Self::Dangerous => "DANGEREUSE (Volume faible, gravité élevée)",
            Self::Standard => "STANDARD",
        }
    }
}

impl fmt::Display for ZoneTypology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
