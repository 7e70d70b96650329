//! Environment-driven configuration.

use serde::{Deserialize, Deserializer};
use std::time::Duration;
use url::Url;

use crate::recipes::{CacheSettings, EndpointPolicy};

/// Application configuration, extracted from the environment by figment.
///
/// Duration values accept human-friendly strings such as `10s`, `1h` or
/// `500ms`; bare numbers, fractional or not, are seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base log level for this crate, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub spoonacular_api_key: String,
    #[serde(default = "default_spoonacular_base_url")]
    pub spoonacular_base_url: Url,
    /// Browser origin allowed to call the API; empty disables CORS.
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
    #[serde(
        default = "default_upstream_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub upstream_timeout: Duration,
    #[serde(
        default = "default_shutdown_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub shutdown_timeout: Duration,
    #[serde(
        default = "default_popular_ttl",
        deserialize_with = "deserialize_duration"
    )]
    pub popular_ttl: Duration,
    #[serde(
        default = "default_recipe_ttl",
        deserialize_with = "deserialize_duration"
    )]
    pub recipe_ttl: Duration,
    /// Upper bound on cached recipes; unset means unbounded.
    #[serde(default)]
    pub recipe_cache_capacity: Option<usize>,
}

impl Config {
    /// Base URL guaranteed to end in `/` so relative endpoint paths join under it.
    pub fn spoonacular_base(&self) -> Url {
        let mut url = self.spoonacular_base_url.clone();
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url
    }

    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            popular: EndpointPolicy::popular(self.popular_ttl),
            detail: EndpointPolicy::detail(self.recipe_ttl),
            recipe_capacity: self.recipe_cache_capacity,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_spoonacular_base_url() -> Url {
    Url::parse("https://api.spoonacular.com/").expect("static URL is valid")
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_upstream_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(8)
}

fn default_popular_ttl() -> Duration {
    crate::recipes::service::DEFAULT_POPULAR_TTL
}

fn default_recipe_ttl() -> Duration {
    crate::recipes::service::DEFAULT_RECIPE_TTL
}

/// Parse a duration string with fundu; plain numbers are seconds.
pub fn parse_duration(value: &str) -> Result<Duration, String> {
    let parsed = fundu::DurationParser::with_all_time_units()
        .parse(value.trim())
        .map_err(|e| format!("invalid duration '{value}': {e}"))?;
    Duration::try_from(parsed).map_err(|e| format!("invalid duration '{value}': {e}"))
}

fn deserialize_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u64),
        FractionalSeconds(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Seconds(secs) => Ok(Duration::from_secs(secs)),
        Raw::FractionalSeconds(secs) => Duration::try_from_secs_f64(secs)
            .map_err(|e| serde::de::Error::custom(format!("invalid duration '{secs}': {e}"))),
        Raw::Text(text) => parse_duration(&text).map_err(serde::de::Error::custom),
    }
}
