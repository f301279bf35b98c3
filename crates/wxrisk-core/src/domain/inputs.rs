//! Decoded weather inputs shared by every factor evaluator.
//!
//! [`RiskInputs`] is the read-only snapshot an assessment runs over. The
//! METAR/TAF structures here are already decoded by an upstream collaborator;
//! nothing in this module parses raw report text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::RiskProfile;

/// Coarse ceiling/visibility classification, ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlightCategory {
    Lifr,
    Ifr,
    Mvfr,
    Vfr,
}

impl FlightCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lifr => "LIFR",
            Self::Ifr => "IFR",
            Self::Mvfr => "MVFR",
            Self::Vfr => "VFR",
        }
    }

    /// Position in the `LIFR < IFR < MVFR < VFR` ordering.
    pub fn rank(self) -> u8 {
        match self {
            Self::Lifr => 0,
            Self::Ifr => 1,
            Self::Mvfr => 2,
            Self::Vfr => 3,
        }
    }

    /// Classify from ceiling (ft AGL) and visibility (SM).
    ///
    /// Either value may be missing; the category is then decided by the one
    /// that is known. Returns `None` when neither is usable.
    pub fn from_conditions(ceiling_ft: Option<f64>, visibility_sm: Option<f64>) -> Option<Self> {
        let ceiling_ft = usable(ceiling_ft);
        let visibility_sm = usable(visibility_sm);
        if ceiling_ft.is_none() && visibility_sm.is_none() {
            return None;
        }

        let ceil_below = |limit: f64| ceiling_ft.is_some_and(|c| c < limit);
        let ceil_at_most = |limit: f64| ceiling_ft.is_some_and(|c| c <= limit);
        let vis_below = |limit: f64| visibility_sm.is_some_and(|v| v < limit);
        let vis_at_most = |limit: f64| visibility_sm.is_some_and(|v| v <= limit);

        let category = if ceil_below(500.0) || vis_below(1.0) {
            Self::Lifr
        } else if ceil_below(1000.0) || vis_below(3.0) {
            Self::Ifr
        } else if ceil_at_most(3000.0) || vis_at_most(5.0) {
            Self::Mvfr
        } else {
            Self::Vfr
        };
        Some(category)
    }
}

impl std::fmt::Display for FlightCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Surface wind group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wind {
    /// True direction in degrees; `None` for variable or calm.
    pub direction_deg: Option<u16>,
    /// Sustained speed in knots.
    pub speed_kt: Option<f64>,
    /// Gust speed in knots.
    pub gust_kt: Option<f64>,
}

impl Wind {
    pub fn sustained(&self) -> Option<f64> {
        usable(self.speed_kt)
    }

    pub fn gust(&self) -> Option<f64> {
        usable(self.gust_kt)
    }
}

/// Sky cover code of a cloud layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CloudCover {
    Skc,
    Clr,
    Nsc,
    Ncd,
    Few,
    Sct,
    Bkn,
    Ovc,
    /// Vertical visibility into an obscured sky.
    Vv,
    #[serde(other)]
    Unknown,
}

impl CloudCover {
    /// Whether a layer with this cover constitutes a ceiling.
    pub fn is_ceiling(self) -> bool {
        matches!(self, Self::Bkn | Self::Ovc | Self::Vv)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Skc => "SKC",
            Self::Clr => "CLR",
            Self::Nsc => "NSC",
            Self::Ncd => "NCD",
            Self::Few => "FEW",
            Self::Sct => "SCT",
            Self::Bkn => "BKN",
            Self::Ovc => "OVC",
            Self::Vv => "VV",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// A single reported cloud layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudLayer {
    pub code: CloudCover,
    /// Base height in feet above ground level.
    pub base_ft_agl: Option<f64>,
}

impl CloudLayer {
    pub fn new(code: CloudCover, base_ft_agl: f64) -> Self {
        Self {
            code,
            base_ft_agl: Some(base_ft_agl),
        }
    }
}

/// A decoded routine observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metar {
    pub station: Option<String>,
    pub observed_at: Option<DateTime<Utc>>,
    pub raw_text: Option<String>,
    pub wind: Option<Wind>,
    /// Prevailing visibility in statute miles.
    pub visibility_sm: Option<f64>,
    #[serde(default)]
    pub clouds: Vec<CloudLayer>,
    pub flight_category: Option<FlightCategory>,
    pub temperature_c: Option<f64>,
    pub dewpoint_c: Option<f64>,
}

impl Metar {
    /// Height of the lowest BKN/OVC/VV layer with a usable base.
    pub fn ceiling_ft(&self) -> Option<f64> {
        lowest_ceiling(&self.clouds)
    }

    pub fn visibility(&self) -> Option<f64> {
        usable(self.visibility_sm)
    }

    /// Reported flight category, or one derived from ceiling and visibility.
    ///
    /// The flag is `true` when the category had to be derived.
    pub fn effective_flight_category(&self) -> Option<(FlightCategory, bool)> {
        effective_category(self.flight_category, &self.clouds, self.visibility_sm)
    }
}

/// One forecast period of a TAF.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TafPeriod {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// Change indicator (`FM`, `BECMG`, `TEMPO`, `PROB30`, ...), if any.
    pub change: Option<String>,
    pub wind: Option<Wind>,
    pub visibility_sm: Option<f64>,
    #[serde(default)]
    pub clouds: Vec<CloudLayer>,
    pub flight_category: Option<FlightCategory>,
}

impl TafPeriod {
    pub fn effective_flight_category(&self) -> Option<(FlightCategory, bool)> {
        effective_category(self.flight_category, &self.clouds, self.visibility_sm)
    }
}

/// A decoded terminal aerodrome forecast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Taf {
    pub station: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
    pub raw_text: Option<String>,
    /// Forecast periods in chronological order.
    #[serde(default)]
    pub periods: Vec<TafPeriod>,
}

/// Severity tag of a normalized hazard advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardSeverity {
    Extreme,
    High,
    Moderate,
    Low,
    Info,
    #[serde(other)]
    Unknown,
}

impl HazardSeverity {
    /// Contribution of one active advisory to the hazard score.
    pub fn weight(self) -> u32 {
        match self {
            Self::Extreme => 50,
            Self::High => 40,
            Self::Moderate => 25,
            Self::Low => 10,
            Self::Info | Self::Unknown => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Extreme => "extreme",
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Low => "low",
            Self::Info => "info",
            Self::Unknown => "unknown",
        }
    }
}

/// A SIGMET/AIRMET-class advisory normalized by the hazard feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardAdvisory {
    /// Hazard kind, e.g. `convective`, `icing`, `turbulence`, `ifr`.
    pub kind: String,
    pub severity: HazardSeverity,
    pub name: String,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
}

impl HazardAdvisory {
    /// Whether the validity window straddles `now`. Missing bounds are open.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.valid_from.map_or(true, |from| from <= now)
            && self.valid_to.map_or(true, |to| now <= to)
    }
}

/// Reported icing or turbulence intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PirepIntensity {
    #[serde(alias = "light", alias = "trace")]
    Low,
    Moderate,
    Severe,
    Extreme,
    #[serde(other)]
    Unknown,
}

impl PirepIntensity {
    /// Full hazard weight of this intensity, before the PIREP half-weighting.
    pub fn weight(self) -> u32 {
        match self {
            Self::Extreme => 50,
            Self::Severe => 40,
            Self::Moderate => 25,
            Self::Low => 10,
            Self::Unknown => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
            Self::Extreme => "extreme",
            Self::Unknown => "unknown",
        }
    }
}

/// A pilot report of in-flight conditions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pirep {
    pub observed_at: Option<DateTime<Utc>>,
    pub aircraft_type: Option<String>,
    pub icing: Option<PirepIntensity>,
    pub turbulence: Option<PirepIntensity>,
    pub raw_text: Option<String>,
}

impl Pirep {
    /// Worst of the icing and turbulence intensities, if either was reported.
    pub fn worst(&self) -> Option<PirepIntensity> {
        [self.icing, self.turbulence]
            .into_iter()
            .flatten()
            .max_by_key(|i| i.weight())
    }
}

/// Snapshot consumed by every factor evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskInputs {
    pub metar: Option<Metar>,
    pub taf: Option<Taf>,
    #[serde(default)]
    pub hazards: Vec<HazardAdvisory>,
    #[serde(default)]
    pub pireps: Vec<Pirep>,
    /// Reference time for advisory activity windows.
    pub now: DateTime<Utc>,
    #[serde(default)]
    pub risk_profile: RiskProfile,
}

impl RiskInputs {
    /// Inputs with no weather data at all.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            metar: None,
            taf: None,
            hazards: Vec::new(),
            pireps: Vec::new(),
            now,
            risk_profile: RiskProfile::Standard,
        }
    }

    pub fn with_metar(mut self, metar: Metar) -> Self {
        self.metar = Some(metar);
        self
    }

    pub fn with_taf(mut self, taf: Taf) -> Self {
        self.taf = Some(taf);
        self
    }

    pub fn with_hazard(mut self, hazard: HazardAdvisory) -> Self {
        self.hazards.push(hazard);
        self
    }

    pub fn with_pirep(mut self, pirep: Pirep) -> Self {
        self.pireps.push(pirep);
        self
    }

    pub fn with_profile(mut self, profile: RiskProfile) -> Self {
        self.risk_profile = profile;
        self
    }
}

/// Keep finite, non-negative measurements; anything else counts as missing.
pub(crate) fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

fn lowest_ceiling(layers: &[CloudLayer]) -> Option<f64> {
    layers
        .iter()
        .filter(|l| l.code.is_ceiling())
        .filter_map(|l| usable(l.base_ft_agl))
        .min_by(f64::total_cmp)
}

fn effective_category(
    reported: Option<FlightCategory>,
    clouds: &[CloudLayer],
    visibility_sm: Option<f64>,
) -> Option<(FlightCategory, bool)> {
    if let Some(category) = reported {
        return Some((category, false));
    }
    // No ceiling layer among reported clouds means unlimited ceiling.
    let ceiling = lowest_ceiling(clouds).or_else(|| {
        let any_layer = clouds.iter().any(|l| l.code != CloudCover::Unknown);
        any_layer.then_some(f64::MAX)
    });
    FlightCategory::from_conditions(ceiling, visibility_sm).map(|c| (c, true))
}
