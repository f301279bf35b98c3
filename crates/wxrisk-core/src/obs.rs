//! Structured observability hooks for the assessment lifecycle.
//!
//! This module provides:
//! - An assessment-scoped tracing span via the `AssessmentSpan` RAII guard
//! - Emission functions for factor evaluation, completion and low-confidence results
//!
//! Completion events are emitted at `info!`, per-factor events at `debug!`.
//! Filter with `RUST_LOG`, e.g. `RUST_LOG=wxrisk_core=debug`.

use tracing::{debug, info, warn};

use crate::domain::assessment::{AssessmentStatus, RiskTier};
use crate::domain::factor::FactorName;

/// RAII guard that enters an assessment-scoped tracing span.
///
/// # Example
///
/// ```ignore
/// let _span = AssessmentSpan::enter("KJFK");
/// // All tracing calls are now associated with station = "KJFK"
/// ```
pub struct AssessmentSpan {
    _span: tracing::span::EnteredSpan,
}

impl AssessmentSpan {
    /// Create and enter a span tagged with the station (or other label).
    pub fn enter(station: &str) -> Self {
        let span = tracing::info_span!("wxrisk.assessment", station = %station);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: one factor evaluated, before and after the profile multiplier.
pub fn emit_factor_evaluated(name: FactorName, raw_score: u8, adjusted_score: u8, penalty: f64) {
    debug!(
        event = "factor.evaluated",
        factor = %name,
        raw_score = raw_score,
        adjusted_score = adjusted_score,
        confidence_penalty = penalty,
    );
}

/// Emit event: assessment completed with its verdict.
///
/// # Example
///
/// ```ignore
/// emit_assessment_completed("KJFK", 66, RiskTier::Monitor, AssessmentStatus::Ok, 0.04);
/// // logs: event=assessment.completed station=KJFK overall_score=66 tier=monitor ...
/// ```
pub fn emit_assessment_completed(
    station: &str,
    overall_score: u8,
    tier: RiskTier,
    status: AssessmentStatus,
    mean_penalty: f64,
) {
    info!(
        event = "assessment.completed",
        station = %station,
        overall_score = overall_score,
        tier = %tier,
        status = %status,
        mean_confidence_penalty = mean_penalty,
    );
}

/// Emit event: result flagged as insufficient data (warning level).
pub fn emit_insufficient_data(station: &str, mean_penalty: f64) {
    warn!(
        event = "assessment.insufficient_data",
        station = %station,
        mean_confidence_penalty = mean_penalty,
    );
}
