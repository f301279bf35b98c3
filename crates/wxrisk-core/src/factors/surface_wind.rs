//! Surface wind factor.
//!
//! The speed band is chosen from the sustained wind (gust when no sustained
//! speed was reported). A gust spread of 10 kt or more adds a flat gust
//! factor on top, capped at 100.

use crate::domain::factor::{FactorDetails, FactorName, FactorResult};
use crate::domain::inputs::{RiskInputs, Wind};

const NAME: FactorName = FactorName::SurfaceWind;

/// `(at_or_above_kt, score, impact)`, strongest first.
const SPEED_BANDS: [(f64, u32, &str); 3] = [
    (35.0, 80, "Strong wind; crosswind limits likely exceeded, ground ops restricted"),
    (25.0, 55, "Strong wind; crosswind limits and runway selection a concern"),
    (15.0, 30, "Moderate wind; minor handling impact"),
];

const GUST_SPREAD_KT: f64 = 10.0;
const GUST_BONUS: u32 = 15;
const NO_DATA_PENALTY: f64 = 0.2;

pub fn evaluate(inputs: &RiskInputs) -> FactorResult {
    let Some(wind) = inputs.metar.as_ref().and_then(|m| m.wind.as_ref()) else {
        return no_data();
    };
    let Some(speed) = wind.sustained().or_else(|| wind.gust()) else {
        return no_data();
    };

    let band = SPEED_BANDS.iter().find(|(limit, _, _)| speed >= *limit);
    let base = band.map_or(0, |(_, score, _)| *score);
    let spread = gust_spread(wind);
    let gusty = spread.is_some_and(|s| s >= GUST_SPREAD_KT);
    let score = if gusty { base + GUST_BONUS } else { base };

    let mut result = FactorResult::new(NAME, score, 0.0, describe(wind, speed));
    if let Some(spread) = spread.filter(|_| gusty) {
        result = result.with_message(format!(
            "Gust spread {spread:.0} kt adds gust factor (+{GUST_BONUS})"
        ));
    }

    let threshold = match band {
        Some((limit, _, _)) => format!(">= {limit:.0} kt"),
        None => format!(">= {:.0} kt", SPEED_BANDS[2].0),
    };
    let impact = match band {
        Some((_, _, impact)) => *impact,
        None if gusty => "Gusty conditions; expect turbulence on approach",
        None => "Wind not limiting",
    };
    result
        .with_details(FactorDetails::new(wind_group(wind), threshold, impact))
        .with_source("metar.wind")
}

fn gust_spread(wind: &Wind) -> Option<f64> {
    match (wind.sustained(), wind.gust()) {
        (Some(speed), Some(gust)) if gust > speed => Some(gust - speed),
        _ => None,
    }
}

fn describe(wind: &Wind, speed: f64) -> String {
    if speed == 0.0 && wind.gust().is_none() {
        return "Wind calm".to_string();
    }
    let direction = wind
        .direction_deg
        .map_or_else(|| "variable".to_string(), |d| format!("{d:03}°"));
    match (wind.sustained(), wind.gust()) {
        (Some(s), Some(g)) => format!("Wind {direction} at {s:.0} kt gusting {g:.0} kt"),
        (Some(s), None) => format!("Wind {direction} at {s:.0} kt"),
        _ => format!("Wind {direction} gusting {speed:.0} kt"),
    }
}

/// METAR-style wind group, e.g. `28030G42KT`.
fn wind_group(wind: &Wind) -> String {
    let direction = wind
        .direction_deg
        .map_or_else(|| "VRB".to_string(), |d| format!("{d:03}"));
    let speed = wind.sustained().map_or_else(|| "//".to_string(), |s| format!("{s:02.0}"));
    match wind.gust() {
        Some(g) => format!("{direction}{speed}G{g:02.0}KT"),
        None => format!("{direction}{speed}KT"),
    }
}

fn no_data() -> FactorResult {
    FactorResult::new(NAME, 0, NO_DATA_PENALTY, "Wind data unavailable")
}
