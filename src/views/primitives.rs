// src/views/primitives.rs
//
// Retained primitives a layer owns and attaches to a scene: a line
// collection for the way network and a single-point marker collection
// for the target location.

use nannou::color::Rgba;
use nannou::prelude::*;

use crate::scene::ScenePrimitive;

#[derive(Debug, Clone, Copy)]
pub struct LineSegment {
    pub from: Point2,
    pub to: Point2,
}

/// The way network as renderable line segments.
#[derive(Debug, Clone)]
pub struct LineCollection {
    id: String,
    capacity: usize,
    segments: Vec<LineSegment>,
    color: Rgba<f32>,
    line_width: f32,
    model: Mat4,
    world: Mat4,
    world_dirty: bool,
}

impl LineCollection {
    pub fn new(id: String, capacity: usize, color: Rgba<f32>, line_width: f32) -> Self {
        Self {
            id,
            capacity,
            segments: Vec::with_capacity(capacity),
            color,
            line_width,
            model: Mat4::IDENTITY,
            world: Mat4::IDENTITY,
            world_dirty: false,
        }
    }

    pub fn add_segment(&mut self, from: Point2, to: Point2) {
        self.segments.push(LineSegment { from, to });
    }

    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn color(&self) -> Rgba<f32> {
        self.color
    }

    pub fn set_color(&mut self, color: Rgba<f32>) {
        self.color = color;
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn set_line_width(&mut self, line_width: f32) {
        self.line_width = line_width;
    }

    pub fn world(&self) -> Mat4 {
        self.world
    }
}

impl ScenePrimitive for LineCollection {
    fn id(&self) -> &str {
        &self.id
    }

    fn model(&self) -> Mat4 {
        self.model
    }

    fn set_model(&mut self, model: Mat4) {
        self.model = model;
        self.world_dirty = true;
    }

    fn update_world_transform(&mut self, force: bool) {
        if force || self.world_dirty {
            self.world = self.model;
            self.world_dirty = false;
        }
    }
}

/// A one-point marker at the projected target location.
#[derive(Debug, Clone)]
pub struct MarkerCollection {
    id: String,
    position: Point2,
    size: f32,
    color: Rgba<f32>,
    model: Mat4,
    world: Mat4,
    world_dirty: bool,
}

impl MarkerCollection {
    pub fn new(id: String, position: Point2, size: f32, color: Rgba<f32>) -> Self {
        Self {
            id,
            position,
            size,
            color,
            model: Mat4::IDENTITY,
            world: Mat4::IDENTITY,
            world_dirty: false,
        }
    }

    pub fn position(&self) -> Point2 {
        self.position
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn color(&self) -> Rgba<f32> {
        self.color
    }

    pub fn world(&self) -> Mat4 {
        self.world
    }
}

impl ScenePrimitive for MarkerCollection {
    fn id(&self) -> &str {
        &self.id
    }

    fn model(&self) -> Mat4 {
        self.model
    }

    fn set_model(&mut self, model: Mat4) {
        self.model = model;
        self.world_dirty = true;
    }

    fn update_world_transform(&mut self, force: bool) {
        if force || self.world_dirty {
            self.world = self.model;
            self.world_dirty = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nannou::color::rgba;

    #[test]
    fn test_line_collection_segments() {
        let mut lines = LineCollection::new("paths_a".to_string(), 4, rgba(0.0, 0.0, 0.0, 1.0), 1.0);
        lines.add_segment(pt2(0.0, 0.0), pt2(1.0, 0.0));
        lines.add_segment(pt2(1.0, 0.0), pt2(1.0, 1.0));
        assert_eq!(lines.segments().len(), 2);
        assert_eq!(lines.capacity(), 4);
        assert_eq!(lines.id(), "paths_a");
    }

    #[test]
    fn test_world_transform_tracks_model() {
        let mut marker =
            MarkerCollection::new("m".to_string(), pt2(3.0, 4.0), 20.0, rgba(1.0, 0.0, 0.0, 1.0));
        let model = Mat4::from_translation(vec3(2.0, 0.0, 0.0));
        marker.set_model(model);
        assert_ne!(marker.world(), model);

        marker.update_world_transform(false);
        assert_eq!(marker.world(), model);

        // forced recompute works even when the dirty flag is clear
        marker.set_model(Mat4::IDENTITY);
        marker.update_world_transform(true);
        assert_eq!(marker.world(), Mat4::IDENTITY);
    }
}
