use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub cookie_name: String,
    /// Adds the `Secure` attribute; turn on behind HTTPS.
    pub cookie_secure: bool,
}

/// External provider settings. A missing API key disables the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvidersConfig {
    pub openweather_api_key: Option<String>,
    pub openweather_url: String,
    pub weather_timeout_secs: u64,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_url: String,
    pub chat_timeout_secs: u64,
    pub wikipedia_api_url: String,
    pub image_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub session: SessionConfig,
    pub providers: ProvidersConfig,
    pub seed_on_startup: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = parsed_or("APP_PORT", 8080);
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let session = SessionConfig {
            secret: std::env::var("SESSION_SECRET").context("SESSION_SECRET must be set")?,
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "navigo".into()),
            audience: std::env::var("SESSION_AUDIENCE").unwrap_or_else(|_| "navigo-users".into()),
            ttl_minutes: parsed_or("SESSION_TTL_MINUTES", 60 * 24 * 7),
            cookie_name: std::env::var("SESSION_COOKIE").unwrap_or_else(|_| "navigo_session".into()),
            cookie_secure: flag("SESSION_COOKIE_SECURE", false),
        };
        let providers = ProvidersConfig {
            openweather_api_key: non_empty("OPENWEATHER_API_KEY"),
            openweather_url: std::env::var("OPENWEATHER_URL")
                .unwrap_or_else(|_| "https://api.openweathermap.org/data/2.5/weather".into()),
            weather_timeout_secs: parsed_or("WEATHER_TIMEOUT_SECS", 5),
            gemini_api_key: non_empty("GEMINI_API_KEY"),
            gemini_model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".into()),
            gemini_url: std::env::var("GEMINI_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into()),
            chat_timeout_secs: parsed_or("CHAT_TIMEOUT_SECS", 5),
            wikipedia_api_url: std::env::var("WIKIPEDIA_API_URL")
                .unwrap_or_else(|_| "https://en.wikipedia.org/w/api.php".into()),
            image_timeout_secs: parsed_or("IMAGE_TIMEOUT_SECS", 3),
        };
        let seed_on_startup = flag("SEED_ON_STARTUP", true);
        Ok(Self {
            host,
            port,
            database_url,
            session,
            providers,
            seed_on_startup,
        })
    }
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// `0`/`false`/`no`/`off` are false, any other value is true.
fn flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => !matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
        Err(_) => default,
    }
}

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_or_falls_back_on_garbage() {
        std::env::set_var("NAVIGO_TEST_TIMEOUT", "not-a-number");
        assert_eq!(parsed_or("NAVIGO_TEST_TIMEOUT", 5u64), 5);
        std::env::set_var("NAVIGO_TEST_TIMEOUT", "9");
        assert_eq!(parsed_or("NAVIGO_TEST_TIMEOUT", 5u64), 9);
        assert_eq!(parsed_or("NAVIGO_TEST_UNSET_KEY", 3u64), 3);
    }

    #[test]
    fn flags_parse_common_spellings() {
        assert!(!flag("NAVIGO_TEST_UNSET_FLAG", false));
        assert!(flag("NAVIGO_TEST_UNSET_FLAG", true));
        for (raw, expected) in [("true", true), ("1", true), ("FALSE", false), ("off", false), ("no", false)] {
            std::env::set_var("NAVIGO_TEST_FLAG", raw);
            assert_eq!(flag("NAVIGO_TEST_FLAG", !expected), expected, "{raw}");
        }
    }

    #[test]
    fn blank_keys_count_as_missing() {
        std::env::set_var("NAVIGO_TEST_BLANK_KEY", "   ");
        assert_eq!(non_empty("NAVIGO_TEST_BLANK_KEY"), None);
        std::env::set_var("NAVIGO_TEST_REAL_KEY", " abc ");
        assert_eq!(non_empty("NAVIGO_TEST_REAL_KEY").as_deref(), Some("abc"));
    }
}
