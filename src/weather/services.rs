use tracing::{debug, warn};

use crate::destinations::repo_types::Destination;
use crate::weather::advisory::{in_comfort_band, suitability, IdealWeather};
use crate::weather::client::WeatherProvider;
use crate::weather::dto::{Recommendation, WeatherAdvisory};

/// Destinations polled for recommendations, and how many are returned.
pub const RECOMMENDATION_CANDIDATES: i64 = 20;
pub const MAX_RECOMMENDATIONS: usize = 10;

/// Builds the advisory for a destination at `(latitude, longitude)`.
/// Never fails: a missing or failing provider yields an unavailable advisory.
pub async fn advisory(
    provider: Option<&dyn WeatherProvider>,
    destination: &Destination,
    (latitude, longitude): (f64, f64),
) -> WeatherAdvisory {
    let Some(provider) = provider else {
        debug!(destination_id = destination.id, "weather provider not configured");
        return WeatherAdvisory::unavailable();
    };

    let now = match provider.current(latitude, longitude).await {
        Ok(now) => now,
        Err(err) => {
            warn!(destination_id = destination.id, error = %err, "weather lookup failed");
            return WeatherAdvisory::unavailable();
        }
    };

    let verdict = suitability(IdealWeather::parse(destination.ideal_weather.as_deref()), &now);
    WeatherAdvisory::Available {
        available: true,
        temperature: now.temperature,
        humidity: now.humidity,
        description: now.description,
        icon: now.icon,
        suitable: verdict.suitable,
        note: verdict.note.map(str::to_string),
        raw: now.raw,
    }
}

/// Polls candidates one at a time and keeps those in their comfort band.
/// Individual lookup failures drop the destination.
pub async fn recommendations(
    provider: Option<&dyn WeatherProvider>,
    candidates: &[Destination],
) -> Vec<Recommendation> {
    let Some(provider) = provider else {
        return Vec::new();
    };

    let mut picked = Vec::new();
    for destination in candidates {
        if picked.len() >= MAX_RECOMMENDATIONS {
            break;
        }
        let Some((lat, lon)) = destination.coordinates() else {
            continue;
        };
        let now = match provider.current(lat, lon).await {
            Ok(now) => now,
            Err(err) => {
                warn!(destination_id = destination.id, error = %err, "weather lookup failed");
                continue;
            }
        };
        if in_comfort_band(IdealWeather::parse(destination.ideal_weather.as_deref()), &now) {
            picked.push(Recommendation {
                id: destination.id,
                name: destination.name.clone(),
                temperature: now.temperature,
                weather: now.condition,
            });
        }
    }
    picked
}
