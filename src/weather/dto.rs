use serde::Serialize;
use serde_json::Value;

pub const UNAVAILABLE_MESSAGE: &str = "Weather data not available";

/// Live weather for a destination. Provider failures degrade to `Unavailable`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WeatherAdvisory {
    Available {
        available: bool,
        temperature: f64,
        humidity: f64,
        description: String,
        icon: String,
        suitable: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<String>,
        raw: Value,
    },
    Unavailable {
        available: bool,
        message: String,
    },
}

impl WeatherAdvisory {
    pub fn unavailable() -> Self {
        WeatherAdvisory::Unavailable {
            available: false,
            message: UNAVAILABLE_MESSAGE.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, WeatherAdvisory::Available { .. })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub id: i64,
    pub name: String,
    pub temperature: f64,
    pub weather: String,
}
