// src/lib.rs
//
// pathvis renders a geographic path network as a 2D vector scene: a
// grid layer owning line and marker primitives, their attachment to a
// rendering scene, and a shared pan/rotate transform. A boundary
// resolver maps place names to bounding boxes and polygon outlines via
// Nominatim, with memoized lookups.

pub mod config;
pub mod error;
pub mod models;
pub mod scene;
pub mod services;
pub mod views;

pub use config::Config;
pub use error::{ColorParseError, GeocodeError, LayerError};
pub use models::{GeoPoint, GridSource, ProjectedRect, QueryBounds, WayGrid};
pub use scene::{PrimitiveHandle, Scene, ScenePrimitive};
pub use services::{Boundary, BoundaryResolver, BoundingBox, Geometry};
pub use views::{GridLayer, LayerTransform, LineCollection, LineStyle, MarkerCollection, ViewBox};
