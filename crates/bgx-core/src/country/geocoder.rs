//! OpenCage forward geocoding client.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use super::find_postal_code;
use crate::error::GeocodeError;
use crate::models::config::GeocodingConfig;

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
    status: Option<ResponseStatus>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    components: Components,
}

#[derive(Debug, Default, Deserialize)]
struct Components {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseStatus {
    code: u16,
    message: String,
}

/// Client for the OpenCage geocoding API.
pub struct OpenCageGeocoder {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl OpenCageGeocoder {
    /// Build a client from configuration.
    ///
    /// Fails with [`GeocodeError::MissingApiKey`] when neither the config nor
    /// the environment provide a key.
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodeError> {
        let api_key = config.resolve_api_key().ok_or(GeocodeError::MissingApiKey)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeocodeError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }

    /// Country of the first result for `query`.
    pub async fn geocode(&self, query: &str) -> Result<Option<String>, GeocodeError> {
        debug!("Geocoding '{}'", query);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("key", self.api_key.as_str()),
                ("limit", "1"),
                ("no_annotations", "1"),
            ])
            .send()
            .await
            .map_err(|e| GeocodeError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Error bodies are not always JSON.
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeocodeResponse>(&text)
                .ok()
                .and_then(|body| body.status)
                .map(|s| s.message)
                .unwrap_or_else(|| status.to_string());
            return Err(GeocodeError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Request(e.to_string()))?;

        if let Some(s) = &body.status {
            if s.code != 200 {
                return Err(GeocodeError::Status {
                    status: s.code,
                    message: s.message.clone(),
                });
            }
        }

        Ok(body.results.into_iter().next().and_then(|r| r.components.country))
    }

    /// Country of an address: the postal code is tried first, then the full address.
    pub async fn resolve(&self, address: &str) -> Result<Option<String>, GeocodeError> {
        if let Some(code) = find_postal_code(address) {
            if let Some(country) = self.geocode(code).await? {
                return Ok(Some(country));
            }
        }
        self.geocode(address).await
    }
}
