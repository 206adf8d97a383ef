//! Reverse geocoding: coordinates to a city name.
//!
//! Only the city listing uses this, and only when the caller gave no city.

use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_or_default, env_parse};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

use crate::geo::GeoPoint;

#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("Geocoder request timed out")]
    Timeout,

    #[error("Geocoder returned HTTP {0}")]
    Status(u16),

    #[error("Geocoder request failed: {0}")]
    Http(#[source] reqwest::Error),
}

impl From<reqwest::Error> for GeocodingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeocodingError::Timeout
        } else if let Some(status) = err.status() {
            GeocodingError::Status(status.as_u16())
        } else {
            GeocodingError::Http(err)
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// `Ok(None)` when the point is not inside any known city
    async fn resolve_city(&self, point: GeoPoint) -> Result<Option<String>, GeocodingError>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl GeocoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("marketplace/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 5,
        }
    }
}

impl FromEnv for GeocoderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            base_url: env_or_default("GEOCODER_URL", &defaults.base_url),
            user_agent: env_or_default("GEOCODER_USER_AGENT", &defaults.user_agent),
            timeout_secs: env_parse("GEOCODER_TIMEOUT_SECS", defaults.timeout_secs)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    #[serde(default)]
    address: Option<NominatimAddress>,
}

/// Most specific settlement name in a Nominatim `/reverse` answer
fn settlement_name(body: NominatimReverse) -> Option<String> {
    let address = body.address?;
    [address.city, address.town, address.village, address.municipality]
        .into_iter()
        .flatten()
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
}

/// Nominatim-compatible reverse geocoder over HTTP
#[derive(Clone, Debug)]
pub struct NominatimGeocoder {
    base_url: String,
    http_client: reqwest::Client,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodingError> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .map_err(GeocodingError::Http)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    #[instrument(skip(self), fields(point = %point))]
    async fn resolve_city(&self, point: GeoPoint) -> Result<Option<String>, GeocodingError> {
        let response = self
            .http_client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", point.latitude().to_string()),
                ("lon", point.longitude().to_string()),
                ("zoom", "10".to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        // Points in the sea come back as `{"error": "Unable to geocode"}`
        let body: NominatimReverse = response.json().await?;
        let city = settlement_name(body);
        tracing::debug!(city = ?city, "Reverse geocoded");
        Ok(city)
    }
}

/// Answers every lookup with the same city. For development and tests.
#[derive(Clone, Debug, Default)]
pub struct FixedCityGeocoder(pub Option<String>);

impl FixedCityGeocoder {
    pub fn new(city: impl Into<String>) -> Self {
        Self(Some(city.into()))
    }

    pub fn unresolvable() -> Self {
        Self(None)
    }
}

#[async_trait]
impl ReverseGeocoder for FixedCityGeocoder {
    async fn resolve_city(&self, _point: GeoPoint) -> Result<Option<String>, GeocodingError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<String> {
        settlement_name(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_settlement_prefers_city() {
        let json = r#"{"address": {"city": "Bengaluru", "town": "Yelahanka", "state": "Karnataka"}}"#;
        assert_eq!(parse(json), Some("Bengaluru".to_string()));
    }

    #[test]
    fn test_settlement_falls_back_to_town_then_village() {
        assert_eq!(parse(r#"{"address": {"town": "Hosur"}}"#), Some("Hosur".to_string()));
        assert_eq!(
            parse(r#"{"address": {"city": " ", "village": "Nandi"}}"#),
            Some("Nandi".to_string())
        );
    }

    #[test]
    fn test_settlement_none_for_error_body() {
        assert_eq!(parse(r#"{"error": "Unable to geocode"}"#), None);
        assert_eq!(parse(r#"{"address": {"state": "Karnataka"}}"#), None);
    }

    #[test]
    fn test_config_defaults() {
        temp_env::with_vars_unset(
            ["GEOCODER_URL", "GEOCODER_USER_AGENT", "GEOCODER_TIMEOUT_SECS"],
            || {
                let config = GeocoderConfig::from_env().unwrap();
                assert_eq!(config.base_url, "https://nominatim.openstreetmap.org");
                assert!(config.user_agent.starts_with("marketplace/"));
                assert_eq!(config.timeout(), Duration::from_secs(5));
            },
        );
    }

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("GEOCODER_URL", Some("http://localhost:8088/")),
                ("GEOCODER_USER_AGENT", Some("test-agent")),
                ("GEOCODER_TIMEOUT_SECS", Some("2")),
            ],
            || {
                let config = GeocoderConfig::from_env().unwrap();
                assert_eq!(config.user_agent, "test-agent");
                assert_eq!(config.timeout_secs, 2);

                let geocoder = NominatimGeocoder::new(&config).unwrap();
                assert_eq!(geocoder.base_url, "http://localhost:8088");
            },
        );
    }

    #[test]
    fn test_config_rejects_bad_timeout() {
        temp_env::with_var("GEOCODER_TIMEOUT_SECS", Some("five"), || {
            assert!(GeocoderConfig::from_env().is_err());
        });
    }

    #[tokio::test]
    async fn test_fixed_city_geocoder() {
        let point = GeoPoint::new(13.0827, 80.2707).unwrap();
        assert_eq!(
            FixedCityGeocoder::new("Chennai").resolve_city(point).await.unwrap(),
            Some("Chennai".to_string())
        );
        assert_eq!(FixedCityGeocoder::unresolvable().resolve_city(point).await.unwrap(), None);
    }
}
