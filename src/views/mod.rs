// src/views/mod.rs

pub mod layer;
pub mod primitives;
pub mod style;
pub mod transform;

pub use layer::{GridLayer, SceneHandle, ViewBox};
pub use primitives::{LineCollection, LineSegment, MarkerCollection};
pub use style::{marker_color, parse_color, LineStyle};
pub use transform::LayerTransform;
