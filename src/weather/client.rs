use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// Current conditions at a coordinate.
#[derive(Debug, Clone)]
pub struct CurrentWeather {
    pub temperature: f64, // °C
    pub humidity: f64,    // %
    pub condition: String, // short group, e.g. "Rain"
    pub description: String,
    pub icon: String,
    pub raw: Value,
}

impl CurrentWeather {
    /// True when either the condition group or the description mentions rain.
    pub fn is_rainy(&self) -> bool {
        self.condition.to_lowercase().contains("rain")
            || self.description.to_lowercase().contains("rain")
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, latitude: f64, longitude: f64) -> anyhow::Result<CurrentWeather>;
}

#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(url: &str, api_key: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("build weather http client")?;
        Ok(Self {
            client,
            url: url.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

/// Decodes an OpenWeather "current weather" body, keeping the raw JSON.
pub(crate) fn parse_current(raw: Value) -> anyhow::Result<CurrentWeather> {
    let parsed: OwmResponse =
        serde_json::from_value(raw.clone()).context("decode weather response")?;
    let first = parsed.weather.into_iter().next();
    let (condition, description, icon) = match first {
        Some(c) => (c.main, c.description, c.icon),
        None => (String::new(), String::new(), String::new()),
    };
    Ok(CurrentWeather {
        temperature: parsed.main.temp,
        humidity: parsed.main.humidity,
        condition,
        description,
        icon,
        raw,
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, latitude: f64, longitude: f64) -> anyhow::Result<CurrentWeather> {
        let raw: Value = self
            .client
            .get(&self.url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .context("weather request")?
            .error_for_status()
            .context("weather status")?
            .json()
            .await
            .context("weather body")?;
        parse_current(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_openweather_body() {
        let raw = json!({
            "main": {"temp": 27.4, "humidity": 61, "pressure": 1009},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "name": "Panaji"
        });
        let w = parse_current(raw.clone()).unwrap();
        assert_eq!(w.temperature, 27.4);
        assert_eq!(w.humidity, 61.0);
        assert_eq!(w.condition, "Rain");
        assert_eq!(w.description, "light rain");
        assert_eq!(w.icon, "10d");
        assert!(w.is_rainy());
        assert_eq!(w.raw, raw);
    }

    #[test]
    fn missing_main_block_is_an_error() {
        assert!(parse_current(json!({"cod": 401, "message": "Invalid API key"})).is_err());
    }
}
