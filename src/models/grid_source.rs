// src/models/grid_source.rs
//
// The grid data abstraction a layer renders from: a network of waypoints
// connected by ways, a projector from geographic coordinates into scene
// space, and an optional single target location.

use nannou::prelude::*;

/// A geographic coordinate, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Extents of the grid after projection into scene space.
#[derive(Debug, Clone, Copy)]
pub struct ProjectedRect {
    pub width: f32,
    pub height: f32,
}

/// Describes the area a grid's data was queried over. Grids that cover a
/// named area answer with the area id; grids queried over a rectangle
/// answer with the rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryBounds {
    Rect {
        west: f64,
        south: f64,
        east: f64,
        north: f64,
    },
    Area {
        area_id: i64,
    },
}

/// Data source for a grid layer. Owned externally; layers hold a shared
/// non-owning reference.
pub trait GridSource {
    fn id(&self) -> i64;

    fn is_area(&self) -> bool;

    /// Number of waypoints the line collection must be sized for.
    fn way_point_count(&self) -> usize;

    /// Visits every way as a (from, to) pair of scene-space endpoints.
    fn for_each_way(&self, visit: &mut dyn FnMut(Point2, Point2));

    /// Projects a geographic coordinate into scene space.
    fn project(&self, point: GeoPoint) -> Point2;

    fn projected_rect(&self) -> ProjectedRect;

    fn target_location(&self) -> Option<GeoPoint> {
        None
    }

    fn query_bounds(&self) -> Option<QueryBounds> {
        None
    }
}
