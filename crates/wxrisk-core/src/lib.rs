//! wxrisk Core Library
//!
//! Scores a decoded weather snapshot (METAR, TAF, hazard advisories, PIREPs)
//! across six independent factors and combines them into an explainable
//! verdict with briefing messages.
//!
//! ```ignore
//! let inputs: RiskInputs = serde_json::from_str(&json)?;
//! let assessment = assess(&inputs, &EngineConfig::default())?;
//! println!("{} ({})", assessment.result.overall_score, assessment.result.tier);
//! ```

pub mod aggregator;
pub mod config;
pub mod domain;
pub mod factors;
pub mod messaging;
pub mod obs;
pub mod profile;
pub mod telemetry;

pub use aggregator::{aggregate, aggregate_with_config, assess, combine_scores, RiskAssessment};
pub use config::{AggregationPolicy, EngineConfig};
pub use domain::{
    canonical_json, compute_digest, AggregatedRiskResult, AssessmentStatus, CloudCover,
    CloudLayer, FactorDetails, FactorName, FactorResult, FlightCategory, HazardAdvisory,
    HazardSeverity, Metar, Pirep, PirepIntensity, Result, RiskError, RiskInputs, RiskTier,
    Severity, Taf, TafPeriod, Timeframe, Wind,
};
pub use factors::{evaluate, evaluate_all};
pub use messaging::{build_messaging, Alert, AlertSeverity, MessagingBundle};
pub use profile::{apply_multiplier, ProfileMultipliers, RiskProfile};
pub use telemetry::init_tracing;

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
