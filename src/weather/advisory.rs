//! Weather suitability policy for a destination's ideal-weather tag.

use crate::weather::client::CurrentWeather;

/// Comfortable temperature profile of a destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IdealWeather {
    Cool,
    Warm,
    Rainy,
    Range { min: f64, max: f64 },
    Unspecified,
}

impl IdealWeather {
    /// Parses `cool`, `warm`, `rainy` (any case) or a numeric `min-max` range.
    pub fn parse(tag: Option<&str>) -> Self {
        let Some(tag) = tag.map(str::trim).filter(|t| !t.is_empty()) else {
            return IdealWeather::Unspecified;
        };
        match tag.to_ascii_lowercase().as_str() {
            "cool" => IdealWeather::Cool,
            "warm" => IdealWeather::Warm,
            "rainy" => IdealWeather::Rainy,
            other => parse_range(other).unwrap_or(IdealWeather::Unspecified),
        }
    }
}

/// `"15-30"` → `Range { 15, 30 }`. A leading `-` belongs to the minimum.
fn parse_range(tag: &str) -> Option<IdealWeather> {
    let split_at = tag
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c == '-')
        .map(|(i, _)| i)?;
    let min: f64 = tag[..split_at].trim().parse().ok()?;
    let max: f64 = tag[split_at + 1..].trim().parse().ok()?;
    (min <= max).then_some(IdealWeather::Range { min, max })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub suitable: bool,
    pub note: Option<&'static str>,
}

impl Verdict {
    fn suitable() -> Self {
        Self { suitable: true, note: None }
    }

    fn unsuitable() -> Self {
        Self { suitable: false, note: None }
    }
}

pub const COLD_NOTE: &str = "Quite cold right now, pack warm clothing";
pub const HOT_NOTE: &str = "Very hot right now, stay hydrated";

/// Whether current conditions match the destination's ideal weather.
pub fn suitability(ideal: IdealWeather, now: &CurrentWeather) -> Verdict {
    let t = now.temperature;
    match ideal {
        IdealWeather::Cool if t > 30.0 => Verdict::unsuitable(),
        IdealWeather::Cool if t < 10.0 => Verdict { suitable: true, note: Some(COLD_NOTE) },
        IdealWeather::Warm if t < 15.0 => Verdict::unsuitable(),
        IdealWeather::Warm if t > 35.0 => Verdict { suitable: true, note: Some(HOT_NOTE) },
        IdealWeather::Rainy => Verdict {
            suitable: now.is_rainy(),
            note: None,
        },
        IdealWeather::Range { min, max } => Verdict {
            suitable: (min..=max).contains(&t),
            note: None,
        },
        _ => Verdict::suitable(),
    }
}

/// Whether a destination belongs in the "good weather right now" list.
pub fn in_comfort_band(ideal: IdealWeather, now: &CurrentWeather) -> bool {
    let t = now.temperature;
    match ideal {
        IdealWeather::Cool => (10.0..=25.0).contains(&t),
        IdealWeather::Warm => (20.0..=35.0).contains(&t),
        IdealWeather::Rainy => now.is_rainy(),
        IdealWeather::Range { min, max } => (min..=max).contains(&t),
        IdealWeather::Unspecified => (15.0..=30.0).contains(&t),
    }
}
