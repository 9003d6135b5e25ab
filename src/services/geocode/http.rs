// src/services/geocode/http.rs
//
// HTTP client seam for the geocoding services. The trait keeps the
// resolver testable without network access.

use crate::config::GeocoderConfig;
use crate::error::GeocodeError;

pub trait HttpClient {
    /// Performs a GET request and returns the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>, GeocodeError>;
}

/// Real client backed by reqwest. The identifying User-Agent is set at
/// build time; Nominatim's usage policy rejects anonymous clients.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeocodeError::Http(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, GeocodeError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| GeocodeError::Http(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(GeocodeError::Http(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| GeocodeError::Http(format!("failed to read response: {}", e)))
    }
}
