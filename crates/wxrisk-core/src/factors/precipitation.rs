//! Precipitation and hazardous weather code factor.
//!
//! Present-weather groups are pulled from the raw METAR body and matched
//! against [`WEATHER_CODE_TABLE`], an ordered list of code classes. The score
//! is the highest matching class, never a sum.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::factor::{FactorDetails, FactorName, FactorResult};
use crate::domain::inputs::RiskInputs;

const NAME: FactorName = FactorName::Precipitation;
const NO_DATA_PENALTY: f64 = 0.15;

/// A class of present-weather codes and the score it carries.
#[derive(Debug, Clone, Copy)]
pub struct WeatherCodeRule {
    pub label: &'static str,
    /// Substrings of a weather group. A leading `+` means the group must be
    /// heavy (`+` intensity) and contain the rest, e.g. `+RA` matches `+SHRA`.
    pub patterns: &'static [&'static str],
    pub score: u32,
    pub impact: &'static str,
}

impl WeatherCodeRule {
    fn matches(&self, group: &str) -> bool {
        self.patterns.iter().any(|pattern| match pattern.strip_prefix('+') {
            Some(code) => group.starts_with('+') && group.contains(code),
            None => group.contains(pattern),
        })
    }
}

/// Weather code classes in precedence order.
pub const WEATHER_CODE_TABLE: [WeatherCodeRule; 4] = [
    WeatherCodeRule {
        label: "Freezing precipitation",
        patterns: &["FZRA", "FZDZ", "PL"],
        score: 80,
        impact: "Airframe icing; deicing and holdover limits apply",
    },
    WeatherCodeRule {
        label: "Thunderstorm or heavy rain",
        patterns: &["TS", "+RA"],
        score: 70,
        impact: "Convective activity; ramp closures and arrival holds likely",
    },
    WeatherCodeRule {
        label: "Snow",
        patterns: &["SN"],
        score: 60,
        impact: "Runway contamination and deicing delays",
    },
    WeatherCodeRule {
        label: "Fog or mist",
        patterns: &["FG", "BR"],
        score: 50,
        impact: "Reduced visibility; low-visibility procedures possible",
    },
];

static TIME_GROUP: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\d{6}Z$").ok());

static STATION: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9]{3}$").ok());

/// Intensity or proximity, optional descriptor, then one or more phenomena.
/// A thunderstorm or shower descriptor may stand alone.
static WEATHER_GROUP: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:[+-]|VC)?",
        r"(?:(?:MI|PR|BC|DR|BL|SH|TS|FZ)?",
        r"(?:DZ|RA|SN|SG|IC|PL|GR|GS|UP|BR|FG|FU|VA|DU|SA|HZ|PY|PO|SQ|FC|SS|DS)+",
        r"|TS|SH)$",
    ))
    .ok()
});

fn is_match(pattern: &LazyLock<Option<Regex>>, token: &str) -> bool {
    LazyLock::force(pattern)
        .as_ref()
        .is_some_and(|re| re.is_match(token))
}

pub fn evaluate(inputs: &RiskInputs) -> FactorResult {
    let Some(raw) = inputs
        .metar
        .as_ref()
        .and_then(|m| m.raw_text.as_deref())
        .filter(|t| !t.trim().is_empty())
    else {
        return FactorResult::new(NAME, 0, NO_DATA_PENALTY, "Present weather data unavailable");
    };

    let groups = weather_groups(raw);
    let matched: Vec<(&WeatherCodeRule, Vec<&str>)> = WEATHER_CODE_TABLE
        .iter()
        .filter_map(|rule| {
            let hits: Vec<&str> = groups.iter().copied().filter(|g| rule.matches(g)).collect();
            (!hits.is_empty()).then_some((rule, hits))
        })
        .collect();

    let Some((top, top_hits)) = matched.first() else {
        return FactorResult::new(
            NAME,
            0,
            0.0,
            "No significant precipitation or obscuration reported",
        )
        .with_source("metar.raw_text");
    };

    let mut result = FactorResult::new(
        NAME,
        top.score,
        0.0,
        format!("{} reported ({})", top.label, top_hits.join(" ")),
    );
    for (rule, hits) in matched.iter().skip(1) {
        result = result.with_message(format!(
            "Also reported: {} ({})",
            rule.label.to_lowercase(),
            hits.join(" ")
        ));
    }
    result
        .with_details(FactorDetails::new(
            groups.join(" "),
            format!("{} ({})", top.label, top.patterns.join(", ")),
            top.impact,
        ))
        .with_source("metar.raw_text")
}

/// Present-weather groups of a raw METAR, in report order.
///
/// Only the body before `RMK` is considered, and only tokens after the
/// day/time group when one is present, so station identifiers never match.
pub fn weather_groups(raw: &str) -> Vec<&str> {
    let body = raw.split(" RMK").next().unwrap_or(raw);
    let tokens: Vec<&str> = body.split_whitespace().collect();
    let start = tokens
        .iter()
        .position(|t| is_match(&TIME_GROUP, t))
        .map_or_else(|| leading_header_len(&tokens), |i| i + 1);
    tokens[start.min(tokens.len())..]
        .iter()
        .copied()
        .filter(|t| is_weather_group(t))
        .collect()
}

/// Report type and station tokens when no time group anchors the body.
/// A leading token that parses as a weather group is never the station.
fn leading_header_len(tokens: &[&str]) -> usize {
    let skip = usize::from(matches!(tokens.first(), Some(&"METAR") | Some(&"SPECI")));
    match tokens.get(skip) {
        Some(t) if is_match(&STATION, t) && !is_weather_group(t) => skip + 1,
        _ => skip,
    }
}

fn is_weather_group(token: &str) -> bool {
    is_match(&WEATHER_GROUP, token)
}
