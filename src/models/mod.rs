pub mod grid_source;
pub mod way_grid;

pub use grid_source::{GeoPoint, GridSource, ProjectedRect, QueryBounds};
pub use way_grid::WayGrid;
