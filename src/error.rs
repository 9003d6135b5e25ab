// src/error.rs
//
// Error taxonomy for the layer lifecycle and the geocoding services.

use thiserror::Error;

/// Failure to interpret a color string.
///
/// The style state is left untouched when this is returned; callers may
/// keep the previous color or surface the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not parse color {input:?}")]
pub struct ColorParseError {
    pub input: String,
}

/// Errors raised by layer lifecycle operations.
#[derive(Debug, Error)]
pub enum LayerError {
    /// Primitives were requested before a grid was attached.
    /// Fatal to the operation, not to the layer; set a grid and retry.
    #[error("no grid bound to layer; call set_grid() first")]
    NoGridBound,

    #[error(transparent)]
    Color(#[from] ColorParseError),
}

/// Errors raised by the boundary resolver.
///
/// Name lookups propagate these to the caller. The geometry fetch path
/// swallows them into a `None` result instead, since polygon outlines
/// are optional decoration.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Http(String),

    #[error("could not parse geocoder response: {0}")]
    Parse(#[from] serde_json::Error),
}
