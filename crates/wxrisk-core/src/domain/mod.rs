//! Domain model for wxrisk.
//!
//! - `inputs`: decoded weather snapshot handed to the evaluators
//! - `factor`: the per-evaluator result and its severity contract
//! - `assessment`: the aggregated verdict
//! - `digest`: canonical JSON fingerprints
//! - `error`: edge error taxonomy

pub mod assessment;
pub mod digest;
pub mod error;
pub mod factor;
pub mod inputs;

pub use assessment::{AggregatedRiskResult, AssessmentStatus, RiskTier};
pub use digest::{canonical_json, compute_digest};
pub use error::{Result, RiskError};
pub use factor::{
    FactorDetails, FactorName, FactorResult, Severity, Timeframe, HIGH_THRESHOLD,
    MODERATE_THRESHOLD,
};
pub use inputs::{
    CloudCover, CloudLayer, FlightCategory, HazardAdvisory, HazardSeverity, Metar, Pirep,
    PirepIntensity, RiskInputs, Taf, TafPeriod, Wind,
};
