//! Hazard advisory and pilot report factor.
//!
//! Active advisories contribute their full severity weight; the worst PIREP
//! icing/turbulence intensity contributes half of its weight. Both the
//! advisory sum and the combined score are capped at 100.

use chrono::{DateTime, Utc};

use crate::domain::factor::{FactorDetails, FactorName, FactorResult, Timeframe};
use crate::domain::inputs::{HazardAdvisory, PirepIntensity, RiskInputs};

const NAME: FactorName = FactorName::HazardAdvisories;
const NO_DATA_PENALTY: f64 = 0.15;
const SCORE_CAP: u32 = 100;

pub fn evaluate(inputs: &RiskInputs) -> FactorResult {
    if inputs.hazards.is_empty() && inputs.pireps.is_empty() {
        return FactorResult::new(
            NAME,
            0,
            NO_DATA_PENALTY,
            "No hazard advisories or pilot reports available",
        );
    }

    let active: Vec<&HazardAdvisory> = inputs
        .hazards
        .iter()
        .filter(|h| h.is_active_at(inputs.now))
        .collect();
    let advisory_points = active
        .iter()
        .map(|h| h.severity.weight())
        .sum::<u32>()
        .min(SCORE_CAP);

    let worst_pirep = inputs
        .pireps
        .iter()
        .filter_map(|p| p.worst())
        .max_by_key(|i| i.weight());
    let pirep_points = worst_pirep.map_or(0, pirep_contribution);

    let score = (advisory_points + pirep_points).min(SCORE_CAP);

    let mut messages: Vec<String> = active
        .iter()
        .map(|h| {
            format!(
                "{} active ({}, {})",
                h.name,
                h.kind,
                h.severity.as_str()
            )
        })
        .collect();
    let inactive = inputs.hazards.len() - active.len();
    if active.is_empty() && !inputs.hazards.is_empty() {
        messages.push(format!(
            "No active hazard advisories ({inactive} outside validity window)"
        ));
    }
    if !inputs.pireps.is_empty() {
        messages.push(match worst_pirep {
            Some(intensity) => format!(
                "Worst PIREP intensity {} (+{pirep_points})",
                intensity.as_str()
            ),
            None => "PIREPs report no icing or turbulence".to_string(),
        });
    }

    let mut messages = messages.into_iter();
    let first = messages
        .next()
        .unwrap_or_else(|| "No active hazards".to_string());
    let mut result = FactorResult::new(NAME, score, 0.0, first);
    for message in messages {
        result = result.with_message(message);
    }

    if !inputs.hazards.is_empty() {
        result = result.with_source("hazards");
    }
    if !inputs.pireps.is_empty() {
        result = result.with_source("pireps");
    }
    if let Some(timeframe) = envelope(&active) {
        result = result.with_timeframe(timeframe);
    }

    let actual = match worst_pirep {
        Some(intensity) => format!(
            "{} active advisories; worst PIREP {}",
            active.len(),
            intensity.as_str()
        ),
        None => format!("{} active advisories", active.len()),
    };
    result.with_details(FactorDetails::new(
        actual,
        "Sum of advisory weights plus half the worst PIREP weight",
        impact(score),
    ))
}

/// Half of the intensity weight, rounding half up.
pub fn pirep_contribution(intensity: PirepIntensity) -> u32 {
    (intensity.weight() + 1) / 2
}

/// Earliest start to latest end over the active advisories.
///
/// An open bound on any advisory leaves that side of the envelope open.
fn envelope(active: &[&HazardAdvisory]) -> Option<Timeframe> {
    if active.is_empty() {
        return None;
    }
    let from = fold_bound(active.iter().map(|h| h.valid_from), |a, b| a.min(b));
    let to = fold_bound(active.iter().map(|h| h.valid_to), |a, b| a.max(b));
    Some(Timeframe { from, to })
}

fn fold_bound(
    bounds: impl Iterator<Item = Option<DateTime<Utc>>>,
    pick: fn(DateTime<Utc>, DateTime<Utc>) -> DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let mut acc: Option<DateTime<Utc>> = None;
    for bound in bounds {
        let bound = bound?;
        acc = Some(acc.map_or(bound, |a| pick(a, bound)));
    }
    acc
}

fn impact(score: u32) -> &'static str {
    match score {
        70.. => "Significant en-route or terminal hazards; reroute or delay likely",
        40..=69 => "Hazards along route; review advisories before release",
        1..=39 => "Minor hazards reported",
        _ => "No active hazards",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::factor::Severity;
    use crate::domain::inputs::{HazardSeverity, Pirep};
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, hour, 0, 0).unwrap()
    }

    fn hazard(name: &str, severity: HazardSeverity, from: u32, to: u32) -> HazardAdvisory {
        HazardAdvisory {
            kind: "convective".to_string(),
            severity,
            name: name.to_string(),
            valid_from: Some(at(from)),
            valid_to: Some(at(to)),
        }
    }

    fn pirep(icing: Option<PirepIntensity>, turbulence: Option<PirepIntensity>) -> Pirep {
        Pirep {
            icing,
            turbulence,
            ..Pirep::default()
        }
    }

    #[test]
    fn test_two_active_hazards_sum() {
        let inputs = RiskInputs::empty(at(12))
            .with_hazard(hazard("SIGMET 4C", HazardSeverity::High, 10, 14))
            .with_hazard(hazard("AIRMET Zulu", HazardSeverity::Moderate, 11, 15));
        let r = evaluate(&inputs);
        assert_eq!(r.score, 65);
        assert_eq!(r.severity, Severity::Moderate);
        assert_eq!(r.confidence_penalty, 0.0);
        assert_eq!(r.messages.len(), 2);
        assert_eq!(
            r.timeframe,
            Some(Timeframe {
                from: Some(at(10)),
                to: Some(at(15)),
            })
        );
    }

    #[test]
    fn test_inactive_hazards_ignored() {
        let inputs = RiskInputs::empty(at(20))
            .with_hazard(hazard("SIGMET 4C", HazardSeverity::Extreme, 10, 14));
        let r = evaluate(&inputs);
        assert_eq!(r.score, 0);
        assert_eq!(r.confidence_penalty, 0.0);
        assert!(r.timeframe.is_none());
        assert!(r.messages[0].contains("outside validity window"));
    }

    #[test]
    fn test_advisory_sum_capped() {
        let mut inputs = RiskInputs::empty(at(12));
        for i in 0..3 {
            inputs = inputs.with_hazard(hazard(&format!("S{i}"), HazardSeverity::Extreme, 10, 14));
        }
        assert_eq!(evaluate(&inputs).score, 100);
    }

    #[test]
    fn test_pirep_half_weight() {
        let inputs = RiskInputs::empty(at(12))
            .with_pirep(pirep(Some(PirepIntensity::Low), Some(PirepIntensity::Severe)))
            .with_pirep(pirep(Some(PirepIntensity::Moderate), None));
        let r = evaluate(&inputs);
        assert_eq!(r.score, 20);
        assert_eq!(r.sources, vec!["pireps"]);
    }

    #[test]
    fn test_pirep_rounds_half_up() {
        assert_eq!(pirep_contribution(PirepIntensity::Moderate), 13);
        assert_eq!(pirep_contribution(PirepIntensity::Unknown), 3);
        assert_eq!(pirep_contribution(PirepIntensity::Extreme), 25);
    }

    #[test]
    fn test_combined_score_capped() {
        let inputs = RiskInputs::empty(at(12))
            .with_hazard(hazard("A", HazardSeverity::Extreme, 10, 14))
            .with_hazard(hazard("B", HazardSeverity::High, 10, 14))
            .with_pirep(pirep(None, Some(PirepIntensity::Extreme)));
        assert_eq!(evaluate(&inputs).score, 100);
    }

    #[test]
    fn test_open_ended_hazard_envelope() {
        let open = HazardAdvisory {
            valid_to: None,
            ..hazard("CWA 101", HazardSeverity::Low, 9, 9)
        };
        let inputs = RiskInputs::empty(at(12))
            .with_hazard(open)
            .with_hazard(hazard("SIGMET 1", HazardSeverity::Info, 11, 13));
        let r = evaluate(&inputs);
        assert_eq!(r.score, 15);
        assert_eq!(
            r.timeframe,
            Some(Timeframe {
                from: Some(at(9)),
                to: None,
            })
        );
    }

    #[test]
    fn test_no_data() {
        let r = evaluate(&RiskInputs::empty(at(12)));
        assert_eq!(r.score, 0);
        assert_eq!(r.confidence_penalty, 0.15);
        assert!(!r.messages.is_empty());
    }

    #[test]
    fn test_quiet_pireps() {
        let inputs = RiskInputs::empty(at(12)).with_pirep(pirep(None, None));
        let r = evaluate(&inputs);
        assert_eq!(r.score, 0);
        assert_eq!(r.confidence_penalty, 0.0);
        assert_eq!(r.messages, vec!["PIREPs report no icing or turbulence"]);
    }
}
