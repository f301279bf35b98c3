//! Human-facing rendering of an aggregated result.
//!
//! Alerts and the summary are derived from the factor breakdown. The guest
//! message and ops checklist are fixed texts keyed by tier.

use serde::{Deserialize, Serialize};

use crate::domain::assessment::{AggregatedRiskResult, AssessmentStatus, RiskTier};
use crate::domain::factor::{FactorResult, HIGH_THRESHOLD, MODERATE_THRESHOLD};

pub const INSUFFICIENT_DATA_SUMMARY: &str =
    "Insufficient data for a reliable weather risk assessment.";
pub const NORMAL_SUMMARY: &str = "Weather normal.";

const GUEST_HIGH_DISRUPTION: &str = "Weather at your destination is expected to cause \
significant disruption. Your flight may be delayed, rerouted or cancelled. We will keep you \
updated and contact you about alternative arrangements if needed.";
const GUEST_MONITOR: &str = "Weather conditions are being monitored and may cause minor \
delays. No action is needed from you right now; we will let you know if anything changes.";
const GUEST_NORMAL: &str = "Weather conditions look good for your flight. No weather-related \
delays are expected.";

const OPS_HIGH_DISRUPTION: [&str; 4] = [
    "Initiate diversion and contingency planning",
    "Confirm alternate airports and fuel requirements",
    "Notify dispatch, crew scheduling and ground handling",
    "Prepare passenger notifications for possible delay or cancellation",
];
const OPS_MONITOR: [&str; 3] = [
    "Increase weather refresh cadence",
    "Coordinate with crew on affected factors",
    "Review alternates if conditions deteriorate",
];
const OPS_NORMAL: [&str; 1] = ["No action required"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub severity: AlertSeverity,
}

impl Alert {
    /// Alert for a factor at or above the moderate threshold, if any.
    pub fn for_factor(factor: &FactorResult) -> Option<Self> {
        if factor.score < MODERATE_THRESHOLD {
            return None;
        }
        let severity = if factor.score >= HIGH_THRESHOLD {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        };
        Some(Self {
            title: title_case(factor.name.as_str()),
            message: factor.messages.join("; "),
            severity,
        })
    }
}

/// Alerts, summaries and checklists for briefing and notification surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagingBundle {
    /// In breakdown order, not sorted by score.
    pub alerts: Vec<Alert>,
    pub plain_text_summary: String,
    pub guest_message_template: String,
    pub ops_actionables: Vec<String>,
}

pub fn build_messaging(result: &AggregatedRiskResult) -> MessagingBundle {
    let alerts: Vec<Alert> = result
        .factor_breakdown
        .iter()
        .filter_map(Alert::for_factor)
        .collect();

    let plain_text_summary = match (result.status, alerts.first()) {
        (AssessmentStatus::InsufficientData, _) => INSUFFICIENT_DATA_SUMMARY.to_string(),
        (AssessmentStatus::Ok, Some(alert)) => format!("{}: {}", alert.title, alert.message),
        (AssessmentStatus::Ok, None) => NORMAL_SUMMARY.to_string(),
    };

    MessagingBundle {
        alerts,
        plain_text_summary,
        guest_message_template: guest_message(result.tier).to_string(),
        ops_actionables: ops_actionables(result.tier)
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }
}

pub fn guest_message(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::HighDisruption => GUEST_HIGH_DISRUPTION,
        RiskTier::Monitor => GUEST_MONITOR,
        RiskTier::Normal => GUEST_NORMAL,
    }
}

pub fn ops_actionables(tier: RiskTier) -> &'static [&'static str] {
    match tier {
        RiskTier::HighDisruption => &OPS_HIGH_DISRUPTION,
        RiskTier::Monitor => &OPS_MONITOR,
        RiskTier::Normal => &OPS_NORMAL,
    }
}

/// `ceiling_clouds` -> `Ceiling Clouds`.
pub fn title_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
