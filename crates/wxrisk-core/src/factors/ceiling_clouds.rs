//! Ceiling / cloud base factor.
//!
//! Scores the lowest BKN, OVC or VV layer. Without a usable cloud report the
//! reported flight category stands in, at a small confidence penalty.

use crate::domain::factor::{FactorDetails, FactorName, FactorResult};
use crate::domain::inputs::{CloudCover, CloudLayer, Metar, RiskInputs};
use crate::factors::{band_below, Band, CategoryScores};

const NAME: FactorName = FactorName::CeilingClouds;

const CEILING_BANDS: [Band; 4] = [
    Band {
        below: 500.0,
        score: 90,
        impact: "Ceiling below most approach minimums; arrivals may be impossible",
    },
    Band {
        below: 1000.0,
        score: 75,
        impact: "IFR ceiling; instrument approaches and alternates required",
    },
    Band {
        below: 2000.0,
        score: 55,
        impact: "Low ceiling; expect IFR procedures and reduced arrival rates",
    },
    Band {
        below: 3000.0,
        score: 30,
        impact: "Marginal ceiling; minor sequencing impact possible",
    },
];

const CATEGORY_SCORES: CategoryScores = CategoryScores {
    lifr: 85,
    ifr: 70,
    mvfr: 45,
    vfr: 10,
};

const CATEGORY_FALLBACK_PENALTY: f64 = 0.05;
const NO_DATA_PENALTY: f64 = 0.2;

pub fn evaluate(inputs: &RiskInputs) -> FactorResult {
    let Some(metar) = inputs.metar.as_ref() else {
        return no_data();
    };

    if let Some(layer) = lowest_ceiling_layer(&metar.clouds) {
        return from_ceiling(layer);
    }
    if reports_no_ceiling(metar) {
        return FactorResult::new(NAME, 0, 0.0, "No ceiling reported (no BKN/OVC layers)")
            .with_details(FactorDetails::new(
                "No ceiling",
                "< 3000 ft AGL",
                "Ceiling not limiting",
            ))
            .with_source("metar.clouds");
    }
    if let Some(category) = metar.flight_category {
        let score = CATEGORY_SCORES.score(category);
        return FactorResult::new(
            NAME,
            score,
            CATEGORY_FALLBACK_PENALTY,
            format!("Cloud base unavailable; flight category {category} used"),
        )
        .with_details(FactorDetails::new(
            category.as_str(),
            "LIFR/IFR/MVFR",
            "Estimated from flight category",
        ))
        .with_source("metar.flight_category");
    }
    no_data()
}

fn from_ceiling(layer: (&CloudLayer, f64)) -> FactorResult {
    let (cloud, base) = layer;
    let message = format!("Ceiling {base:.0} ft AGL ({})", cloud.code.as_str());
    match band_below(base, &CEILING_BANDS) {
        Some(band) => FactorResult::new(NAME, band.score, 0.0, message)
            .with_details(FactorDetails::new(
                format!("{base:.0} ft AGL"),
                format!("< {:.0} ft AGL", band.below),
                band.impact,
            ))
            .with_source("metar.clouds"),
        None => FactorResult::new(NAME, 0, 0.0, message)
            .with_details(FactorDetails::new(
                format!("{base:.0} ft AGL"),
                "< 3000 ft AGL",
                "Ceiling not limiting",
            ))
            .with_source("metar.clouds"),
    }
}

fn lowest_ceiling_layer(layers: &[CloudLayer]) -> Option<(&CloudLayer, f64)> {
    layers
        .iter()
        .filter(|l| l.code.is_ceiling())
        .filter_map(|l| {
            l.base_ft_agl
                .filter(|b| b.is_finite() && *b >= 0.0)
                .map(|b| (l, b))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Cloud groups were reported and none of them forms a ceiling.
fn reports_no_ceiling(metar: &Metar) -> bool {
    !metar.clouds.is_empty()
        && metar
            .clouds
            .iter()
            .all(|l| !l.code.is_ceiling() && l.code != CloudCover::Unknown)
}

fn no_data() -> FactorResult {
    FactorResult::new(NAME, 0, NO_DATA_PENALTY, "Ceiling data unavailable")
}
