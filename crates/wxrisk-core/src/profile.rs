//! Risk profile policy.
//!
//! A profile is a uniform multiplier applied to every factor score before
//! aggregation. Severity is re-derived after scaling, so the 40/70 contract
//! still holds for adjusted scores. The profile travels with
//! [`RiskInputs`](crate::RiskInputs); there is no ambient profile state.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{Result, RiskError};
use crate::domain::factor::FactorResult;

/// Operator risk tolerance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskProfile {
    #[default]
    Standard,
    /// Penalize marginal weather more heavily.
    Conservative,
    /// Tolerate marginal weather that still meets minimums.
    Aggressive,
}

impl RiskProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Conservative => "conservative",
            Self::Aggressive => "aggressive",
        }
    }
}

impl std::fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskProfile {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "conservative" => Ok(Self::Conservative),
            "aggressive" => Ok(Self::Aggressive),
            other => Err(RiskError::UnknownProfile(other.to_string())),
        }
    }
}

/// Score multipliers per non-standard profile. `standard` is always 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileMultipliers {
    pub conservative: f64,
    pub aggressive: f64,
}

impl Default for ProfileMultipliers {
    fn default() -> Self {
        Self {
            conservative: 1.15,
            aggressive: 0.85,
        }
    }
}

impl ProfileMultipliers {
    pub fn multiplier(&self, profile: RiskProfile) -> f64 {
        match profile {
            RiskProfile::Standard => 1.0,
            RiskProfile::Conservative => self.conservative,
            RiskProfile::Aggressive => self.aggressive,
        }
    }

    /// Multipliers must be finite and within (0, 2].
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("conservative", self.conservative),
            ("aggressive", self.aggressive),
        ] {
            if !value.is_finite() || value <= 0.0 || value > 2.0 {
                return Err(RiskError::InvalidConfig(format!(
                    "profiles.{name} multiplier {value} must be within (0, 2]"
                )));
            }
        }
        Ok(())
    }
}

/// Scale a factor's score by `multiplier`, capped at 100.
pub fn apply_multiplier(result: FactorResult, multiplier: f64) -> FactorResult {
    if multiplier == 1.0 || !multiplier.is_finite() || multiplier < 0.0 {
        return result;
    }
    let scaled = (f64::from(result.score) * multiplier).round().min(100.0);
    result.with_score(scaled as u32)
}
