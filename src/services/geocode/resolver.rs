// src/services/geocode/resolver.rs
//
// Name → boundary resolution with memoized lookups. Name searches
// propagate failures to the caller; the geometry fetch path degrades to
// None instead, since polygon outlines are optional decoration.

use log::warn;

use crate::config::GeocoderConfig;
use crate::error::GeocodeError;
use crate::services::cache::MemoCache;

use super::http::{HttpClient, ReqwestClient};
use super::nominatim::{extract_boundaries, extract_geometry, Boundary, Geometry, SearchRow};

pub struct BoundaryResolver<C: HttpClient> {
    client: C,
    endpoint: String,
    results: MemoCache<Vec<Boundary>>,
    geometries: MemoCache<Option<Geometry>>,
}

impl BoundaryResolver<ReqwestClient> {
    pub fn from_config(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        Ok(Self::new(ReqwestClient::new(config)?, config))
    }
}

impl<C: HttpClient> BoundaryResolver<C> {
    pub fn new(client: C, config: &GeocoderConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            results: MemoCache::new(config.cache_capacity),
            geometries: MemoCache::new(config.cache_capacity),
        }
    }

    /// Resolves a place name to boundary records. Results are memoized by
    /// the exact input string; an empty provider result is a valid (and
    /// cached) answer, not an error. Failed lookups are not cached.
    pub fn resolve_by_name(&self, name: &str) -> Result<Vec<Boundary>, GeocodeError> {
        if let Some(cached) = self.results.get(name) {
            return Ok(cached);
        }

        let url = format!(
            "{}/search?format=json&q={}",
            self.endpoint,
            encode_query(name)
        );
        let body = self.client.get(&url)?;
        let rows: Vec<SearchRow> = serde_json::from_slice(&body)?;
        let boundaries = extract_boundaries(rows);

        self.results.insert(name.to_string(), boundaries.clone());
        Ok(boundaries)
    }

    /// Fetches the polygon outline for a place name. Returns None both
    /// when no polygon exists and when the lookup fails; failures are
    /// logged and not cached, so a later call may still succeed.
    pub fn fetch_boundary_geometry(&self, name: &str) -> Option<Geometry> {
        if let Some(cached) = self.geometries.get(name) {
            return cached;
        }

        match self.request_geometry(name) {
            Ok(geometry) => {
                self.geometries.insert(name.to_string(), geometry.clone());
                geometry
            }
            Err(e) => {
                warn!("boundary geometry lookup for {:?} failed: {}", name, e);
                None
            }
        }
    }

    fn request_geometry(&self, name: &str) -> Result<Option<Geometry>, GeocodeError> {
        let url = format!(
            "{}/search?format=json&polygon_geojson=1&q={}",
            self.endpoint,
            encode_query(name)
        );
        let body = self.client.get(&url)?;
        let rows: Vec<SearchRow> = serde_json::from_slice(&body)?;
        Ok(extract_geometry(&rows))
    }
}

/// Percent-encodes a query string component.
fn encode_query(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            _ => {
                encoded.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    encoded
}
