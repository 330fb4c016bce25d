use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Destination record; serialized as-is on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Destination {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub state: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
    pub rating: f64,                // mean review rating, 0 when unreviewed
    pub popularity: i32,
    pub best_time: Option<String>,
    pub ideal_weather: Option<String>, // cool | warm | rainy | "min-max"
    pub description: Option<String>,
}

impl Destination {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Fields for a destination insert (seeding).
#[derive(Debug, Clone)]
pub struct NewDestination {
    pub name: String,
    pub category: String,
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
    pub image_url: String,
    pub rating: f64,
    pub popularity: i32,
    pub best_time: String,
    pub ideal_weather: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StateCount {
    pub state: String,
    pub count: i64,
}
