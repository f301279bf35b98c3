//! Aggregated verdict types.

use serde::{Deserialize, Serialize};

use crate::domain::factor::{FactorName, FactorResult, HIGH_THRESHOLD, MODERATE_THRESHOLD};
use crate::profile::RiskProfile;

/// Disruption tier, using the same 40/70 breakpoints as factor severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Normal,
    Monitor,
    HighDisruption,
}

impl RiskTier {
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_THRESHOLD {
            Self::HighDisruption
        } else if score >= MODERATE_THRESHOLD {
            Self::Monitor
        } else {
            Self::Normal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Monitor => "monitor",
            Self::HighDisruption => "high_disruption",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data-quality signal of an assessment. Not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Ok,
    InsufficientData,
}

impl AssessmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::InsufficientData => "insufficient_data",
        }
    }
}

impl std::fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combined verdict over all six factors.
///
/// # Invariants
///
/// `factor_breakdown` holds exactly one entry per [`FactorName::ALL`], in that
/// order. `overall_score` is never below the highest factor score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedRiskResult {
    pub overall_score: u8,
    pub tier: RiskTier,
    pub status: AssessmentStatus,
    pub risk_profile: RiskProfile,
    pub mean_confidence_penalty: f64,
    pub factor_breakdown: Vec<FactorResult>,
}

impl AggregatedRiskResult {
    /// Look up one factor's result by name.
    pub fn factor(&self, name: FactorName) -> Option<&FactorResult> {
        self.factor_breakdown.iter().find(|f| f.name == name)
    }

    /// Whether callers should flag this result as low-confidence.
    pub fn is_low_confidence(&self) -> bool {
        self.status == AssessmentStatus::InsufficientData
    }
}
