//! Prevailing visibility factor.

use crate::domain::factor::{FactorDetails, FactorName, FactorResult};
use crate::domain::inputs::RiskInputs;
use crate::factors::{band_below, Band, CategoryScores};

const NAME: FactorName = FactorName::Visibility;

const VISIBILITY_BANDS: [Band; 4] = [
    Band {
        below: 1.0,
        score: 90,
        impact: "Visibility below most approach minimums",
    },
    Band {
        below: 3.0,
        score: 70,
        impact: "IFR visibility; instrument approaches required",
    },
    Band {
        below: 5.0,
        score: 45,
        impact: "Marginal visibility; reduced arrival rates possible",
    },
    Band {
        below: 7.0,
        score: 25,
        impact: "Slightly reduced visibility",
    },
];

const CATEGORY_SCORES: CategoryScores = CategoryScores {
    lifr: 85,
    ifr: 65,
    mvfr: 40,
    vfr: 10,
};

const CATEGORY_FALLBACK_PENALTY: f64 = 0.05;
const NO_DATA_PENALTY: f64 = 0.2;

pub fn evaluate(inputs: &RiskInputs) -> FactorResult {
    let Some(metar) = inputs.metar.as_ref() else {
        return no_data();
    };

    if let Some(vis) = metar.visibility() {
        let message = format!("Visibility {vis} SM");
        let (score, threshold, impact) = match band_below(vis, &VISIBILITY_BANDS) {
            Some(band) => (band.score, format!("< {} SM", band.below), band.impact),
            None => (0, "< 7 SM".to_string(), "Visibility not limiting"),
        };
        return FactorResult::new(NAME, score, 0.0, message)
            .with_details(FactorDetails::new(format!("{vis} SM"), threshold, impact))
            .with_source("metar.visibility_sm");
    }

    match metar.flight_category {
        Some(category) => FactorResult::new(
            NAME,
            CATEGORY_SCORES.score(category),
            CATEGORY_FALLBACK_PENALTY,
            format!("Visibility unavailable; flight category {category} used"),
        )
        .with_details(FactorDetails::new(
            category.as_str(),
            "LIFR/IFR/MVFR",
            "Estimated from flight category",
        ))
        .with_source("metar.flight_category"),
        None => no_data(),
    }
}

fn no_data() -> FactorResult {
    FactorResult::new(NAME, 0, NO_DATA_PENALTY, "Visibility data unavailable")
}
