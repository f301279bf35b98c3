//! Output of a single factor evaluator.
//!
//! Every [`FactorResult`] is built through [`FactorResult::new`], which owns
//! the shared contract: score within 0–100, severity derived from the 40/70
//! breakpoints, penalty within 0–1, and at least one message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scores at or above this are `moderate` (and tier `monitor`).
pub const MODERATE_THRESHOLD: u8 = 40;
/// Scores at or above this are `high` (and tier `high_disruption`).
pub const HIGH_THRESHOLD: u8 = 70;

/// Stable identifier of each evaluator, in breakdown order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorName {
    CeilingClouds,
    SurfaceWind,
    Precipitation,
    Visibility,
    HazardAdvisories,
    TrendStability,
}

impl FactorName {
    /// All factors in the fixed breakdown order.
    pub const ALL: [FactorName; 6] = [
        FactorName::CeilingClouds,
        FactorName::SurfaceWind,
        FactorName::Precipitation,
        FactorName::Visibility,
        FactorName::HazardAdvisories,
        FactorName::TrendStability,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CeilingClouds => "ceiling_clouds",
            Self::SurfaceWind => "surface_wind",
            Self::Precipitation => "precipitation",
            Self::Visibility => "visibility",
            Self::HazardAdvisories => "hazard_advisories",
            Self::TrendStability => "trend_stability",
        }
    }
}

impl std::fmt::Display for FactorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity tag derived from a factor score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Moderate,
    High,
}

impl Severity {
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_THRESHOLD {
            Self::High
        } else if score >= MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

/// Display triple for briefing/UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorDetails {
    pub actual_value: String,
    pub threshold: String,
    pub impact: String,
}

impl FactorDetails {
    pub fn new(
        actual_value: impl Into<String>,
        threshold: impl Into<String>,
        impact: impl Into<String>,
    ) -> Self {
        Self {
            actual_value: actual_value.into(),
            threshold: threshold.into(),
            impact: impact.into(),
        }
    }
}

/// Validity window a finding applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeframe {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Result of one factor evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorResult {
    pub name: FactorName,
    /// 0 means no risk detected.
    pub score: u8,
    pub severity: Severity,
    /// Higher when the evaluator fell back to coarse data or had none.
    pub confidence_penalty: f64,
    /// Never empty.
    pub messages: Vec<String>,
    pub details: Option<FactorDetails>,
    /// Input fields actually consulted, e.g. `metar.clouds`.
    pub sources: Vec<String>,
    pub timeframe: Option<Timeframe>,
}

impl FactorResult {
    /// Build a result, clamping score and penalty into range.
    pub fn new(
        name: FactorName,
        score: u32,
        confidence_penalty: f64,
        message: impl Into<String>,
    ) -> Self {
        let score = score.min(100) as u8;
        Self {
            name,
            score,
            severity: Severity::from_score(score),
            confidence_penalty: clamp_penalty(confidence_penalty),
            messages: vec![message.into()],
            details: None,
            sources: Vec::new(),
            timeframe: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    pub fn with_details(mut self, details: FactorDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.sources.push(source.into());
        self
    }

    pub fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = Some(timeframe);
        self
    }

    /// Replace the score, re-deriving severity.
    pub fn with_score(mut self, score: u32) -> Self {
        self.score = score.min(100) as u8;
        self.severity = Severity::from_score(self.score);
        self
    }

    /// Whether the evaluator found any input to work from.
    pub fn has_data(&self) -> bool {
        !self.sources.is_empty()
    }
}

fn clamp_penalty(penalty: f64) -> f64 {
    if penalty.is_nan() {
        1.0
    } else {
        penalty.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_breakpoints() {
        assert_eq!(Severity::from_score(0), Severity::Low);
        assert_eq!(Severity::from_score(39), Severity::Low);
        assert_eq!(Severity::from_score(40), Severity::Moderate);
        assert_eq!(Severity::from_score(69), Severity::Moderate);
        assert_eq!(Severity::from_score(70), Severity::High);
        assert_eq!(Severity::from_score(100), Severity::High);
    }

    #[test]
    fn test_new_clamps_score_and_penalty() {
        let r = FactorResult::new(FactorName::SurfaceWind, 140, 1.7, "gusty");
        assert_eq!(r.score, 100);
        assert_eq!(r.severity, Severity::High);
        assert_eq!(r.confidence_penalty, 1.0);

        let r = FactorResult::new(FactorName::SurfaceWind, 0, -0.3, "calm");
        assert_eq!(r.confidence_penalty, 0.0);

        let r = FactorResult::new(FactorName::SurfaceWind, 0, f64::NAN, "?");
        assert_eq!(r.confidence_penalty, 1.0);
    }

    #[test]
    fn test_with_score_rederives_severity() {
        let r = FactorResult::new(FactorName::Visibility, 65, 0.0, "3 SM").with_score(75);
        assert_eq!(r.score, 75);
        assert_eq!(r.severity, Severity::High);
    }

    #[test]
    fn test_factor_name_order_and_names() {
        let names: Vec<&str> = FactorName::ALL.iter().map(|n| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "ceiling_clouds",
                "surface_wind",
                "precipitation",
                "visibility",
                "hazard_advisories",
                "trend_stability"
            ]
        );
        let json = serde_json::to_string(&FactorName::HazardAdvisories).unwrap();
        assert_eq!(json, "\"hazard_advisories\"");
    }
}
