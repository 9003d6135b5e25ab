// src/models/way_grid.rs
//
// A concrete in-memory grid built from geographic way segments. Uses an
// equirectangular projection centered on the data's bounding box, which
// is accurate enough at city scale.

use nannou::prelude::*;

use super::grid_source::{GeoPoint, GridSource, ProjectedRect, QueryBounds};

const METERS_PER_DEGREE: f64 = 111_319.49;

pub struct WayGrid {
    id: i64,
    is_area: bool,
    ways: Vec<(GeoPoint, GeoPoint)>,
    target: Option<GeoPoint>,
    bounds: Option<QueryBounds>,
    center: GeoPoint,
    rect: ProjectedRect,
}

impl WayGrid {
    pub fn new(id: i64, ways: Vec<(GeoPoint, GeoPoint)>) -> Self {
        let (center, rect) = fit_projection(&ways);
        Self {
            id,
            is_area: false,
            ways,
            target: None,
            bounds: None,
            center,
            rect,
        }
    }

    pub fn with_target(mut self, target: GeoPoint) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_query_bounds(mut self, bounds: QueryBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn as_area(mut self) -> Self {
        self.is_area = true;
        self
    }
}

impl GridSource for WayGrid {
    fn id(&self) -> i64 {
        self.id
    }

    fn is_area(&self) -> bool {
        self.is_area
    }

    fn way_point_count(&self) -> usize {
        self.ways.len() * 2
    }

    fn for_each_way(&self, visit: &mut dyn FnMut(Point2, Point2)) {
        for (from, to) in &self.ways {
            visit(self.project(*from), self.project(*to));
        }
    }

    fn project(&self, point: GeoPoint) -> Point2 {
        let lat_scale = self.center.lat.to_radians().cos();
        let x = (point.lon - self.center.lon) * lat_scale * METERS_PER_DEGREE;
        let y = (point.lat - self.center.lat) * METERS_PER_DEGREE;
        pt2(x as f32, y as f32)
    }

    fn projected_rect(&self) -> ProjectedRect {
        self.rect
    }

    fn target_location(&self) -> Option<GeoPoint> {
        self.target
    }

    fn query_bounds(&self) -> Option<QueryBounds> {
        self.bounds
    }
}

fn fit_projection(ways: &[(GeoPoint, GeoPoint)]) -> (GeoPoint, ProjectedRect) {
    if ways.is_empty() {
        let center = GeoPoint { lat: 0.0, lon: 0.0 };
        return (
            center,
            ProjectedRect {
                width: 0.0,
                height: 0.0,
            },
        );
    }

    let mut min_lat = f64::MAX;
    let mut max_lat = f64::MIN;
    let mut min_lon = f64::MAX;
    let mut max_lon = f64::MIN;
    for (from, to) in ways {
        for p in [from, to] {
            min_lat = min_lat.min(p.lat);
            max_lat = max_lat.max(p.lat);
            min_lon = min_lon.min(p.lon);
            max_lon = max_lon.max(p.lon);
        }
    }

    let center = GeoPoint {
        lat: (min_lat + max_lat) / 2.0,
        lon: (min_lon + max_lon) / 2.0,
    };
    let lat_scale = center.lat.to_radians().cos();
    let rect = ProjectedRect {
        width: ((max_lon - min_lon) * lat_scale * METERS_PER_DEGREE) as f32,
        height: ((max_lat - min_lat) * METERS_PER_DEGREE) as f32,
    };
    (center, rect)
}
