//! Forecast trend factor: current METAR category against the first TAF period.

use crate::domain::factor::{FactorDetails, FactorName, FactorResult};
use crate::domain::inputs::{CloudLayer, FlightCategory, RiskInputs};

const NAME: FactorName = FactorName::TrendStability;

const DETERIORATING_SCORE: u32 = 40;
const STABLE_SCORE: u32 = 20;
const IMPROVING_SCORE: u32 = 10;

const DERIVED_CATEGORY_PENALTY: f64 = 0.05;
const NO_DATA_PENALTY: f64 = 0.1;

/// Direction of the forecast relative to current conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Deteriorating,
    Stable,
    Improving,
}

impl Trend {
    pub fn between(current: FlightCategory, forecast: FlightCategory) -> Self {
        match forecast.rank().cmp(&current.rank()) {
            std::cmp::Ordering::Less => Self::Deteriorating,
            std::cmp::Ordering::Equal => Self::Stable,
            std::cmp::Ordering::Greater => Self::Improving,
        }
    }

    fn score(self) -> u32 {
        match self {
            Self::Deteriorating => DETERIORATING_SCORE,
            Self::Stable => STABLE_SCORE,
            Self::Improving => IMPROVING_SCORE,
        }
    }
}

pub fn evaluate(inputs: &RiskInputs) -> FactorResult {
    let metar = inputs.metar.as_ref();
    let period = inputs.taf.as_ref().and_then(|t| t.periods.first());
    let current = metar.and_then(|m| m.effective_flight_category());
    let forecast = period.and_then(|p| p.effective_flight_category());

    let (Some((current, current_derived)), Some((forecast, forecast_derived))) =
        (current, forecast)
    else {
        let missing = match (current.is_some(), forecast.is_some()) {
            (false, false) => "current and forecast flight categories",
            (false, true) => "current flight category",
            _ => "forecast flight category",
        };
        return FactorResult::new(
            NAME,
            0,
            NO_DATA_PENALTY,
            format!("Trend unavailable: missing {missing}"),
        );
    };

    let trend = Trend::between(current, forecast);
    let message = match trend {
        Trend::Deteriorating => {
            format!("Conditions forecast to deteriorate ({current} to {forecast})")
        }
        Trend::Stable => format!("Conditions forecast to remain {current}"),
        Trend::Improving => {
            format!("Conditions forecast to improve ({current} to {forecast})")
        }
    };
    let penalty = if current_derived || forecast_derived {
        DERIVED_CATEGORY_PENALTY
    } else {
        0.0
    };
    let impact = match trend {
        Trend::Deteriorating => "Plan for worsening conditions at arrival time",
        Trend::Stable => "Current conditions expected to persist",
        Trend::Improving => "Conditions expected to improve",
    };

    let mut result = FactorResult::new(NAME, trend.score(), penalty, message).with_details(
        FactorDetails::new(
            format!("{current} -> {forecast}"),
            "Forecast category worse than current",
            impact,
        ),
    );
    let consulted = [
        metar.map(|m| category_fields("metar", current_derived, &m.clouds, m.visibility_sm)),
        period.map(|p| {
            category_fields("taf.periods[0]", forecast_derived, &p.clouds, p.visibility_sm)
        }),
    ];
    for source in consulted.into_iter().flatten().flatten() {
        result = result.with_source(source);
    }
    if current_derived || forecast_derived {
        result = result.with_message("Flight category derived from ceiling and visibility");
    }
    result
}

/// Input fields behind a flight category: the reported field, or the
/// ceiling and visibility it was derived from.
fn category_fields(
    prefix: &str,
    derived: bool,
    clouds: &[CloudLayer],
    visibility_sm: Option<f64>,
) -> Vec<String> {
    if !derived {
        return vec![format!("{prefix}.flight_category")];
    }
    let mut fields = Vec::new();
    if !clouds.is_empty() {
        fields.push(format!("{prefix}.clouds"));
    }
    if visibility_sm.is_some() {
        fields.push(format!("{prefix}.visibility_sm"));
    }
    fields
}
