// src/config/config_types.rs
//
// Config types for the crate

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub default_line_color: String,
    pub default_line_width: f32,
    pub marker_size: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            default_line_color: "#161616".to_string(),
            default_line_width: 1.0,
            marker_size: 20.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub cache_capacity: usize,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org".to_string(),
            // Nominatim's usage policy requires an identifying User-Agent
            user_agent: format!("pathvis/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            cache_capacity: 64,
        }
    }
}
