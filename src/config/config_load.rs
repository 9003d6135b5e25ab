// src/config/config_load.rs
//
// loading from config.toml

use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::config_types::{GeocoderConfig, StyleConfig};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub style: StyleConfig,
    pub geocoder: GeocoderConfig,
}

impl Config {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads config.toml from the working directory, falling back to the
    /// built-in defaults when no file is present.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("no config.toml loaded ({}), using defaults", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.style.default_line_color, "#161616");
        assert_eq!(config.style.default_line_width, 1.0);
        assert_eq!(config.geocoder.timeout_secs, 30);
        assert!(config.geocoder.endpoint.contains("nominatim"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [style]
            default_line_color = "steelblue"
            "#,
        )
        .unwrap();
        assert_eq!(config.style.default_line_color, "steelblue");
        assert_eq!(config.style.marker_size, 20.0);
        assert_eq!(config.geocoder.cache_capacity, 64);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = Config::load_or_default();
        assert!(config.geocoder.cache_capacity > 0);
    }
}
