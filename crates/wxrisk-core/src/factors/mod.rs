//! The six factor evaluators.
//!
//! Each evaluator is a pure, total function over [`RiskInputs`]. They never
//! see each other's output. [`EVALUATORS`] fixes the breakdown order.

pub mod ceiling_clouds;
pub mod hazard_advisories;
pub mod precipitation;
pub mod surface_wind;
pub mod trend_stability;
pub mod visibility;

use crate::domain::factor::{FactorName, FactorResult};
use crate::domain::inputs::{FlightCategory, RiskInputs};

/// Signature shared by every evaluator.
pub type Evaluator = fn(&RiskInputs) -> FactorResult;

/// Evaluators in breakdown order.
pub const EVALUATORS: [(FactorName, Evaluator); 6] = [
    (FactorName::CeilingClouds, ceiling_clouds::evaluate),
    (FactorName::SurfaceWind, surface_wind::evaluate),
    (FactorName::Precipitation, precipitation::evaluate),
    (FactorName::Visibility, visibility::evaluate),
    (FactorName::HazardAdvisories, hazard_advisories::evaluate),
    (FactorName::TrendStability, trend_stability::evaluate),
];

/// Run every evaluator, in breakdown order.
pub fn evaluate_all(inputs: &RiskInputs) -> Vec<FactorResult> {
    EVALUATORS
        .iter()
        .map(|(_, evaluate)| evaluate(inputs))
        .collect()
}

/// Run a single evaluator by name.
pub fn evaluate(name: FactorName, inputs: &RiskInputs) -> FactorResult {
    let evaluator: Evaluator = match name {
        FactorName::CeilingClouds => ceiling_clouds::evaluate,
        FactorName::SurfaceWind => surface_wind::evaluate,
        FactorName::Precipitation => precipitation::evaluate,
        FactorName::Visibility => visibility::evaluate,
        FactorName::HazardAdvisories => hazard_advisories::evaluate,
        FactorName::TrendStability => trend_stability::evaluate,
    };
    evaluator(inputs)
}

/// One row of a "strictly below limit" score table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Band {
    pub below: f64,
    pub score: u32,
    pub impact: &'static str,
}

/// First band whose limit exceeds `value`. Tables are ordered by ascending limit.
pub(crate) fn band_below(value: f64, table: &[Band]) -> Option<&Band> {
    table.iter().find(|b| value < b.below)
}

/// Score table for the flight-category fallback.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CategoryScores {
    pub lifr: u32,
    pub ifr: u32,
    pub mvfr: u32,
    pub vfr: u32,
}

impl CategoryScores {
    pub fn score(&self, category: FlightCategory) -> u32 {
        match category {
            FlightCategory::Lifr => self.lifr,
            FlightCategory::Ifr => self.ifr,
            FlightCategory::Mvfr => self.mvfr,
            FlightCategory::Vfr => self.vfr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_evaluators_follow_breakdown_order() {
        let names: Vec<FactorName> = EVALUATORS.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, FactorName::ALL.to_vec());
    }

    #[test]
    fn test_evaluate_all_names_match_table() {
        let inputs = RiskInputs::empty(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap());
        let results = evaluate_all(&inputs);
        assert_eq!(results.len(), 6);
        for (result, name) in results.iter().zip(FactorName::ALL) {
            assert_eq!(result.name, name);
            assert_eq!(evaluate(name, &inputs), *result);
        }
    }

    #[test]
    fn test_band_below_is_strict() {
        let table = [
            Band { below: 1.0, score: 90, impact: "a" },
            Band { below: 3.0, score: 70, impact: "b" },
        ];
        assert_eq!(band_below(0.5, &table).map(|b| b.score), Some(90));
        assert_eq!(band_below(1.0, &table).map(|b| b.score), Some(70));
        assert!(band_below(3.0, &table).is_none());
    }
}
