//! Aggregation of factor results into a single verdict.
//!
//! Runs every evaluator in breakdown order, applies the risk profile
//! multiplier, then combines:
//!
//! - `overall_score = min(100, max + round(secondary_weight * second_highest))`
//! - `tier` from `overall_score` with the 40/70 breakpoints
//! - `status = insufficient_data` when the mean confidence penalty exceeds the
//!   configured ceiling, or when ceiling, wind and visibility all lacked their
//!   primary measurement (a flight-category fallback does not count)

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::domain::assessment::{AggregatedRiskResult, AssessmentStatus, RiskTier};
use crate::domain::digest::compute_digest;
use crate::domain::error::Result;
use crate::domain::factor::{FactorName, FactorResult};
use crate::domain::inputs::RiskInputs;
use crate::factors::EVALUATORS;
use crate::messaging::{build_messaging, MessagingBundle};
use crate::obs;
use crate::profile::apply_multiplier;

/// Factors whose primary data must not all be missing, with the input field
/// each one is primarily scored from.
pub const MAJOR_FACTORS: [(FactorName, &str); 3] = [
    (FactorName::CeilingClouds, "metar.clouds"),
    (FactorName::SurfaceWind, "metar.wind"),
    (FactorName::Visibility, "metar.visibility_sm"),
];

/// Aggregate with the default engine configuration.
pub fn aggregate(inputs: &RiskInputs) -> AggregatedRiskResult {
    aggregate_with_config(inputs, &EngineConfig::default())
}

/// Aggregate with an explicit engine configuration.
pub fn aggregate_with_config(inputs: &RiskInputs, config: &EngineConfig) -> AggregatedRiskResult {
    let profile = inputs.risk_profile;
    let multiplier = config.profiles.multiplier(profile);

    let factor_breakdown: Vec<FactorResult> = EVALUATORS
        .iter()
        .map(|(name, evaluate)| {
            let raw = evaluate(inputs);
            let raw_score = raw.score;
            let adjusted = apply_multiplier(raw, multiplier);
            obs::emit_factor_evaluated(
                *name,
                raw_score,
                adjusted.score,
                adjusted.confidence_penalty,
            );
            adjusted
        })
        .collect();

    let scores: Vec<u8> = factor_breakdown.iter().map(|f| f.score).collect();
    let overall_score = combine_scores(&scores, config.aggregation.secondary_weight);
    let mean_confidence_penalty = mean_penalty(&factor_breakdown);

    let blind = MAJOR_FACTORS.iter().all(|(name, primary)| {
        factor_breakdown
            .iter()
            .find(|f| f.name == *name)
            .map_or(true, |f| !f.sources.iter().any(|s| s == primary))
    });
    let too_uncertain = mean_confidence_penalty > config.aggregation.insufficient_data_ceiling;
    let status = if too_uncertain || blind {
        AssessmentStatus::InsufficientData
    } else {
        AssessmentStatus::Ok
    };

    AggregatedRiskResult {
        overall_score,
        tier: RiskTier::from_score(overall_score),
        status,
        risk_profile: profile,
        mean_confidence_penalty,
        factor_breakdown,
    }
}

/// Highest score boosted by a share of the second highest, capped at 100.
///
/// Never below the highest input score, and non-decreasing in every input.
pub fn combine_scores(scores: &[u8], secondary_weight: f64) -> u8 {
    let mut sorted = scores.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    let top = sorted.first().copied().unwrap_or(0);
    let second = sorted.get(1).copied().unwrap_or(0);
    let boost = (secondary_weight.max(0.0) * f64::from(second)).round();
    (f64::from(top) + boost).min(100.0) as u8
}

fn mean_penalty(factors: &[FactorResult]) -> f64 {
    if factors.is_empty() {
        return 1.0;
    }
    factors.iter().map(|f| f.confidence_penalty).sum::<f64>() / factors.len() as f64
}

/// Verdict, rendered messaging and audit digest for one set of inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub result: AggregatedRiskResult,
    pub messaging: MessagingBundle,
    /// SHA-256 of the canonical JSON of `result`.
    pub digest: String,
}

/// Aggregate, render messaging and fingerprint the result.
pub fn assess(inputs: &RiskInputs, config: &EngineConfig) -> Result<RiskAssessment> {
    let label = inputs
        .metar
        .as_ref()
        .and_then(|m| m.station.as_deref())
        .or_else(|| inputs.taf.as_ref().and_then(|t| t.station.as_deref()))
        .unwrap_or("unknown");
    let _span = obs::AssessmentSpan::enter(label);

    let result = aggregate_with_config(inputs, config);
    let messaging = build_messaging(&result);
    let digest = compute_digest(&result)?;

    obs::emit_assessment_completed(
        label,
        result.overall_score,
        result.tier,
        result.status,
        result.mean_confidence_penalty,
    );
    if result.is_low_confidence() {
        obs::emit_insufficient_data(label, result.mean_confidence_penalty);
    }

    Ok(RiskAssessment {
        result,
        messaging,
        digest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inputs::{CloudCover, CloudLayer, Metar, Wind};
    use crate::profile::RiskProfile;
    use chrono::{TimeZone, Utc};

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 2, 15, 0, 0).unwrap()
    }

    fn full_metar(vis: f64, ceiling: f64, wind_kt: f64) -> Metar {
        Metar {
            station: Some("KJFK".to_string()),
            raw_text: Some("KJFK 021451Z 31010KT 10SM BKN250 12/02 A3012".to_string()),
            wind: Some(Wind {
                direction_deg: Some(310),
                speed_kt: Some(wind_kt),
                gust_kt: None,
            }),
            visibility_sm: Some(vis),
            clouds: vec![CloudLayer::new(CloudCover::Bkn, ceiling)],
            ..Metar::default()
        }
    }

    #[test]
    fn test_combine_scores_boost() {
        assert_eq!(combine_scores(&[0, 0, 0, 0, 0, 0], 0.25), 0);
        assert_eq!(combine_scores(&[55, 45, 0, 0, 0, 0], 0.25), 66);
        assert_eq!(combine_scores(&[90, 90, 0, 0, 0, 0], 0.25), 100);
        assert_eq!(combine_scores(&[70], 0.25), 70);
        assert_eq!(combine_scores(&[], 0.25), 0);
    }

    #[test]
    fn test_combine_scores_never_below_max() {
        for weight in [0.0, 0.25, 1.0] {
            assert!(combine_scores(&[10, 80, 30], weight) >= 80);
        }
    }

    #[test]
    fn test_clear_day_is_normal_and_ok() {
        let inputs = RiskInputs::empty(now()).with_metar(full_metar(10.0, 25000.0, 10.0));
        let result = aggregate(&inputs);
        assert_eq!(result.overall_score, 0);
        assert_eq!(result.tier, RiskTier::Normal);
        assert_eq!(result.status, AssessmentStatus::Ok);
        assert_eq!(result.factor_breakdown.len(), 6);
    }

    #[test]
    fn test_compounding_factors_reach_monitor() {
        // visibility 4 SM -> 45, wind 26 kt -> 55: 55 + round(0.25 * 45) = 66
        let inputs = RiskInputs::empty(now()).with_metar(full_metar(4.0, 25000.0, 26.0));
        let result = aggregate(&inputs);
        assert_eq!(result.overall_score, 66);
        assert_eq!(result.tier, RiskTier::Monitor);
    }

    #[test]
    fn test_conservative_profile_scales_factors() {
        let inputs = RiskInputs::empty(now())
            .with_metar(full_metar(4.0, 25000.0, 26.0))
            .with_profile(RiskProfile::Conservative);
        let result = aggregate(&inputs);
        let wind = result.factor(FactorName::SurfaceWind).unwrap();
        // 55 * 1.15 = 63.25 -> 63
        assert_eq!(wind.score, 63);
        assert_eq!(result.risk_profile, RiskProfile::Conservative);
        // 63 + round(0.25 * 52) = 76
        assert_eq!(result.overall_score, 76);
        assert_eq!(result.tier, RiskTier::HighDisruption);
    }

    #[test]
    fn test_custom_secondary_weight() {
        let mut config = EngineConfig::default();
        config.aggregation.secondary_weight = 0.0;
        let inputs = RiskInputs::empty(now()).with_metar(full_metar(4.0, 25000.0, 26.0));
        assert_eq!(aggregate_with_config(&inputs, &config).overall_score, 55);
    }

    #[test]
    fn test_blind_major_factors_is_insufficient() {
        // Only hazards: mean penalty is low but ceiling/wind/visibility are blind.
        let inputs = RiskInputs::empty(now()).with_pirep(crate::domain::inputs::Pirep::default());
        let result = aggregate(&inputs);
        assert!(result.mean_confidence_penalty < 0.5);
        assert_eq!(result.status, AssessmentStatus::InsufficientData);
    }

    #[test]
    fn test_category_fallback_is_not_primary_data() {
        let metar = Metar {
            flight_category: Some(crate::domain::inputs::FlightCategory::Ifr),
            ..Metar::default()
        };
        let result = aggregate(&RiskInputs::empty(now()).with_metar(metar));
        let ceiling = result.factor(FactorName::CeilingClouds).unwrap();
        assert_eq!(ceiling.sources, vec!["metar.flight_category"]);
        assert!(result.mean_confidence_penalty <= 0.5);
        assert_eq!(result.status, AssessmentStatus::InsufficientData);

        let metar = Metar {
            flight_category: Some(crate::domain::inputs::FlightCategory::Ifr),
            visibility_sm: Some(2.0),
            ..Metar::default()
        };
        let result = aggregate(&RiskInputs::empty(now()).with_metar(metar));
        assert_eq!(result.status, AssessmentStatus::Ok);
    }

    #[test]
    fn test_low_ceiling_config_flags_insufficient() {
        let mut config = EngineConfig::default();
        config.aggregation.insufficient_data_ceiling = 0.0;
        // No TAF: trend penalty 0.1 pushes the mean above zero.
        let inputs = RiskInputs::empty(now()).with_metar(full_metar(10.0, 25000.0, 10.0));
        let result = aggregate_with_config(&inputs, &config);
        assert_eq!(result.status, AssessmentStatus::InsufficientData);
    }

    #[test]
    fn test_assess_digest_is_stable() {
        let inputs = RiskInputs::empty(now()).with_metar(full_metar(0.5, 400.0, 30.0));
        let a = assess(&inputs, &EngineConfig::default()).unwrap();
        let b = assess(&inputs, &EngineConfig::default()).unwrap();
        assert_eq!(a.digest, b.digest);
        assert_eq!(a, b);
        assert_eq!(a.result.tier, RiskTier::HighDisruption);
        assert!(!a.messaging.alerts.is_empty());
    }
}
