//! Engine policy configuration.
//!
//! The aggregation formula and the profile multipliers are tunable policy,
//! not fixed law. [`EngineConfig::default`] carries the documented values;
//! a TOML file may override any subset of them:
//!
//! ```toml
//! [aggregation]
//! secondary_weight = 0.25
//! insufficient_data_ceiling = 0.5
//!
//! [profiles]
//! conservative = 1.15
//! aggressive = 0.85
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::error::{Result, RiskError};
use crate::profile::ProfileMultipliers;

/// How factor scores and penalties combine into the verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationPolicy {
    /// Share of the second-highest factor score added to the highest.
    pub secondary_weight: f64,
    /// Mean confidence penalty above which the result is `insufficient_data`.
    pub insufficient_data_ceiling: f64,
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        Self {
            secondary_weight: 0.25,
            insufficient_data_ceiling: 0.5,
        }
    }
}

impl AggregationPolicy {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("secondary_weight", self.secondary_weight),
            ("insufficient_data_ceiling", self.insufficient_data_ceiling),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(RiskError::InvalidConfig(format!(
                    "aggregation.{name} = {value} must be within [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub aggregation: AggregationPolicy,
    pub profiles: ProfileMultipliers,
}

impl EngineConfig {
    /// Parse and validate a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.aggregation.validate()?;
        self.profiles.validate()
    }
}
