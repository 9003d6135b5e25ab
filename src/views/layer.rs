// src/views/layer.rs
//
// The GridLayer owns the mapping from a grid data source to renderable
// primitives, its attachment to a rendering scene, and the pan/rotate
// transform shared by everything it draws.
//
// Attachment is a small state machine: Unbound, Bound-Hidden and
// Bound-Visible. Either all primitives of a visible layer are attached
// or none are; partial attachment never occurs.

use std::cell::RefCell;
use std::rc::Rc;

use log::{info, warn};
use nannou::prelude::*;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::config::Config;
use crate::error::{ColorParseError, LayerError};
use crate::models::{GeoPoint, GridSource, QueryBounds};
use crate::scene::{PrimitiveHandle, Scene, ScenePrimitive};

use super::primitives::{LineCollection, MarkerCollection};
use super::style::{marker_color, parse_color, LineStyle};
use super::transform::LayerTransform;

pub type SceneHandle = Rc<RefCell<dyn Scene>>;

/// Initial camera rect for a freshly loaded grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

enum BindState {
    Unbound { hidden: bool },
    Bound { scene: SceneHandle, visible: bool },
}

pub struct GridLayer {
    id: String,
    style: LineStyle,
    marker_size: f32,
    transform: LayerTransform,
    state: BindState,
    grid: Option<Rc<dyn GridSource>>,
    lines: Option<Rc<RefCell<LineCollection>>>,
    marker: Option<Rc<RefCell<MarkerCollection>>>,
}

impl GridLayer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            style: LineStyle::default(),
            marker_size: 20.0,
            transform: LayerTransform::default(),
            state: BindState::Unbound { hidden: false },
            grid: None,
            lines: None,
            marker: None,
        }
    }

    pub fn with_config(id: impl Into<String>, config: &Config) -> Self {
        let mut layer = Self::new(id);
        layer.style = LineStyle::from_config(&config.style);
        layer.marker_size = config.style.marker_size;
        layer
    }

    /// Convenience id for callers that don't track their own. Layer ids
    /// are injected rather than drawn from a hidden counter, so test
    /// runs stay independent.
    pub fn generate_id() -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect();
        format!("paths_{}", suffix)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn color(&self) -> nannou::color::Rgba<f32> {
        self.style.color
    }

    pub fn line_width(&self) -> f32 {
        self.style.line_width
    }

    pub fn transform(&self) -> LayerTransform {
        self.transform
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.state, BindState::Bound { .. })
    }

    pub fn is_visible(&self) -> bool {
        matches!(
            self.state,
            BindState::Bound { visible: true, .. }
        )
    }

    fn hidden(&self) -> bool {
        match &self.state {
            BindState::Unbound { hidden } => *hidden,
            BindState::Bound { visible, .. } => !*visible,
        }
    }

    pub fn lines(&self) -> Option<Rc<RefCell<LineCollection>>> {
        self.lines.clone()
    }

    pub fn marker(&self) -> Option<Rc<RefCell<MarkerCollection>>> {
        self.marker.clone()
    }

    /*************************** Style ***************************************/

    /// Parses and applies a new line color. On parse failure the previous
    /// color is kept and the error is returned to the caller. The marker
    /// keeps its fixed accent color either way.
    pub fn set_color(&mut self, input: &str) -> Result<(), ColorParseError> {
        let color = parse_color(input)?;
        self.style.color = color;
        if let Some(lines) = &self.lines {
            lines.borrow_mut().set_color(color);
        }
        self.request_frame(false);
        Ok(())
    }

    pub fn set_line_width(&mut self, line_width: f32) {
        self.style.line_width = line_width;
        if let Some(lines) = &self.lines {
            lines.borrow_mut().set_line_width(line_width);
        }
        self.request_frame(false);
    }

    /*************************** Grid ****************************************/

    /// Replaces the grid. A bound layer is fully rebound: primitives from
    /// the old grid are detached and dropped, never accumulated.
    pub fn set_grid(&mut self, grid: Rc<dyn GridSource>) {
        self.detach_primitives();
        self.lines = None;
        self.marker = None;
        self.grid = Some(grid);

        let scene = match &self.state {
            BindState::Bound { scene, .. } => Some(scene.clone()),
            BindState::Unbound { .. } => None,
        };
        if let Some(scene) = scene {
            self.bind_to_scene(scene);
        }
    }

    pub fn project(&self, point: GeoPoint) -> Option<Point2> {
        self.grid.as_ref().map(|grid| grid.project(point))
    }

    /// The bounds the grid's data was queried over. Area grids without a
    /// precomputed descriptor answer with their area id.
    pub fn query_bounds(&self) -> Option<QueryBounds> {
        let grid = self.grid.as_ref()?;
        grid.query_bounds().or_else(|| {
            grid.is_area().then(|| QueryBounds::Area {
                area_id: grid.id(),
            })
        })
    }

    pub fn view_box(&self) -> Option<ViewBox> {
        let rect = self.grid.as_ref()?.projected_rect();
        let initial_scene_size = rect.width.max(rect.height) / 4.0;
        Some(ViewBox {
            left: -initial_scene_size,
            top: initial_scene_size,
            right: initial_scene_size,
            bottom: -initial_scene_size,
        })
    }

    /*************************** Binding *************************************/

    /// Attaches the layer to a scene. Rebinding an already bound layer is
    /// tolerated with a warning so scenes can be reattached; the layer
    /// detaches from the old scene first.
    pub fn bind_to_scene(&mut self, scene: SceneHandle) {
        if self.is_bound() && self.lines.is_some() {
            warn!("layer {} is already bound to a scene; rebinding", self.id);
        }
        self.detach_primitives();

        let hidden = self.hidden();
        self.state = BindState::Bound {
            scene,
            visible: !hidden,
        };

        if self.grid.is_none() {
            return;
        }
        if self.build_primitives().is_err() {
            // grid presence checked above
            return;
        }
        if !hidden {
            self.attach_primitives();
        }
    }

    /// Builds the line collection and marker for the current grid.
    /// Idempotent: existing primitives are returned untouched. Fails with
    /// `NoGridBound` when no grid is attached.
    pub fn build_primitives(&mut self) -> Result<(), LayerError> {
        let grid = self.grid.clone().ok_or(LayerError::NoGridBound)?;

        if self.lines.is_none() {
            let mut lines = LineCollection::new(
                self.id.clone(),
                grid.way_point_count(),
                self.style.color,
                self.style.line_width,
            );
            grid.for_each_way(&mut |from, to| lines.add_segment(from, to));
            if !self.transform.is_identity() {
                lines.set_model(self.transform.compute_model());
                lines.update_world_transform(true);
            }
            self.lines = Some(Rc::new(RefCell::new(lines)));
        }

        if self.marker.is_none() {
            if let Some(target) = grid.target_location() {
                let mut marker = MarkerCollection::new(
                    format!("{}_marker", self.id),
                    grid.project(target),
                    self.marker_size,
                    marker_color(),
                );
                if !self.transform.is_identity() {
                    marker.set_model(self.transform.compute_model());
                    marker.update_world_transform(true);
                }
                self.marker = Some(Rc::new(RefCell::new(marker)));
            }
        }

        Ok(())
    }

    /// Detaches from the scene while keeping the primitives in memory.
    pub fn hide(&mut self) {
        if self.hidden() {
            return;
        }
        self.detach_primitives();
        match &mut self.state {
            BindState::Unbound { hidden } => *hidden = true,
            BindState::Bound { visible, .. } => *visible = false,
        }
    }

    /// Re-attaches retained primitives. Without a scene or grid this only
    /// clears the hidden flag, so a later bind shows immediately.
    pub fn show(&mut self) {
        if !self.hidden() {
            return;
        }
        match &mut self.state {
            BindState::Unbound { hidden } => {
                *hidden = false;
                info!("layer {} will be shown when a scene is bound", self.id);
                return;
            }
            BindState::Bound { visible, .. } => *visible = true,
        }
        if self.grid.is_none() {
            info!("layer {} will be shown when a grid is available", self.id);
            return;
        }
        self.attach_primitives();
    }

    /// Detaches from the scene and releases primitive ownership. The
    /// layer returns to Unbound; a grid, if set, is kept.
    pub fn destroy(&mut self) {
        if !self.is_bound() {
            return;
        }
        self.detach_primitives();
        let hidden = self.hidden();
        self.state = BindState::Unbound { hidden };
        self.lines = None;
        self.marker = None;
    }

    /*************************** Transform ***********************************/

    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.transform.dx = dx;
        self.transform.dy = dy;
        self.transfer_transform();
    }

    pub fn move_to(&mut self, _x: f32, _y: f32) {
        warn!("move_to() is under construction; use move_by() instead");
    }

    /// Sets the rotation about the scene origin, in radians.
    pub fn rotate(&mut self, angle: f32) {
        self.transform.angle = angle;
        self.transfer_transform();
    }

    /// Pushes one identical model matrix to every owned primitive so the
    /// lines and marker never skew relative to each other, then requests
    /// a forced frame.
    fn transfer_transform(&mut self) {
        if self.lines.is_none() {
            return;
        }
        let model = self.transform.compute_model();

        if let Some(lines) = &self.lines {
            let mut lines = lines.borrow_mut();
            lines.set_model(model);
            lines.update_world_transform(true);
        }
        if let Some(marker) = &self.marker {
            let mut marker = marker.borrow_mut();
            marker.set_model(model);
            marker.update_world_transform(true);
        }

        self.request_frame(true);
    }

    /*************************** Internals ***********************************/

    fn attach_primitives(&self) {
        let BindState::Bound { scene, .. } = &self.state else {
            return;
        };
        let mut scene = scene.borrow_mut();
        if let Some(lines) = &self.lines {
            let handle: PrimitiveHandle = lines.clone();
            scene.append_child(handle);
        }
        if let Some(marker) = &self.marker {
            let handle: PrimitiveHandle = marker.clone();
            scene.append_child(handle);
        }
    }

    fn detach_primitives(&self) {
        let BindState::Bound { scene, visible } = &self.state else {
            return;
        };
        if !*visible {
            return;
        }
        let mut scene = scene.borrow_mut();
        if let Some(lines) = &self.lines {
            scene.remove_child(lines.borrow().id());
        }
        if let Some(marker) = &self.marker {
            scene.remove_child(marker.borrow().id());
        }
    }

    fn request_frame(&self, force: bool) {
        if let BindState::Bound { scene, .. } = &self.state {
            scene.borrow_mut().render_frame(force);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoPoint, WayGrid};
    use std::f32::consts::PI;

    #[derive(Default)]
    struct MockScene {
        children: Vec<PrimitiveHandle>,
        render_calls: usize,
        forced_renders: usize,
    }

    impl Scene for MockScene {
        fn append_child(&mut self, child: PrimitiveHandle) {
            self.children.push(child);
        }

        fn remove_child(&mut self, id: &str) {
            self.children.retain(|child| child.borrow().id() != id);
        }

        fn render_frame(&mut self, force: bool) {
            self.render_calls += 1;
            if force {
                self.forced_renders += 1;
            }
        }
    }

    fn mock_scene() -> (Rc<RefCell<MockScene>>, SceneHandle) {
        let scene = Rc::new(RefCell::new(MockScene::default()));
        let handle: SceneHandle = scene.clone();
        (scene, handle)
    }

    fn geo(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint { lat, lon }
    }

    fn three_way_grid_with_target() -> Rc<WayGrid> {
        Rc::new(
            WayGrid::new(
                7,
                vec![
                    (geo(0.0, 0.0), geo(0.0, 0.01)),
                    (geo(0.0, 0.01), geo(0.01, 0.01)),
                    (geo(0.01, 0.01), geo(0.01, 0.0)),
                ],
            )
            .with_target(geo(0.005, 0.005)),
        )
    }

    fn child_ids(scene: &Rc<RefCell<MockScene>>) -> Vec<String> {
        scene
            .borrow()
            .children
            .iter()
            .map(|child| child.borrow().id().to_string())
            .collect()
    }

    #[test]
    fn test_bind_builds_lines_and_marker() {
        let (scene, handle) = mock_scene();
        let grid = three_way_grid_with_target();
        let mut layer = GridLayer::new("paths_test");
        layer.set_grid(grid.clone());
        layer.bind_to_scene(handle);

        assert!(layer.is_visible());
        assert_eq!(child_ids(&scene), vec!["paths_test", "paths_test_marker"]);

        let lines = layer.lines().unwrap();
        assert_eq!(lines.borrow().segments().len(), 3);
        assert_eq!(lines.borrow().capacity(), 6);

        let marker = layer.marker().unwrap();
        let expected = grid.project(geo(0.005, 0.005));
        let position = marker.borrow().position();
        assert!((position.x - expected.x).abs() < 1e-4);
        assert!((position.y - expected.y).abs() < 1e-4);
    }

    #[test]
    fn test_no_marker_without_target_location() {
        let (scene, handle) = mock_scene();
        let grid = Rc::new(WayGrid::new(1, vec![(geo(0.0, 0.0), geo(0.0, 0.01))]));
        let mut layer = GridLayer::new("paths_a");
        layer.set_grid(grid);
        layer.bind_to_scene(handle);

        assert!(layer.marker().is_none());
        assert_eq!(scene.borrow().children.len(), 1);
    }

    #[test]
    fn test_double_bind_keeps_one_line_collection() {
        let (scene, handle) = mock_scene();
        let mut layer = GridLayer::new("paths_a");
        layer.set_grid(three_way_grid_with_target());
        layer.bind_to_scene(handle.clone());
        let first = layer.lines().unwrap();

        layer.bind_to_scene(handle);
        assert_eq!(scene.borrow().children.len(), 2);
        assert!(Rc::ptr_eq(&first, &layer.lines().unwrap()));
    }

    #[test]
    fn test_build_without_grid_fails() {
        let mut layer = GridLayer::new("paths_a");
        assert!(matches!(
            layer.build_primitives(),
            Err(LayerError::NoGridBound)
        ));

        // recoverable: set a grid and retry
        layer.set_grid(three_way_grid_with_target());
        assert!(layer.build_primitives().is_ok());
    }

    #[test]
    fn test_hide_then_show_restores_attachment() {
        let (scene, handle) = mock_scene();
        let mut layer = GridLayer::new("paths_a");
        layer.set_grid(three_way_grid_with_target());
        layer.bind_to_scene(handle);
        let before = child_ids(&scene);

        layer.hide();
        assert!(!layer.is_visible());
        assert!(scene.borrow().children.is_empty());
        // primitives are retained, not destroyed
        assert!(layer.lines().is_some());

        layer.show();
        assert!(layer.is_visible());
        assert_eq!(child_ids(&scene), before);
    }

    #[test]
    fn test_hide_before_bind_lands_bound_hidden() {
        let (scene, handle) = mock_scene();
        let mut layer = GridLayer::new("paths_a");
        layer.set_grid(three_way_grid_with_target());
        layer.hide();
        layer.bind_to_scene(handle);

        assert!(layer.is_bound());
        assert!(!layer.is_visible());
        assert!(scene.borrow().children.is_empty());

        layer.show();
        assert_eq!(scene.borrow().children.len(), 2);
    }

    #[test]
    fn test_show_before_bind_clears_hidden_flag() {
        let (scene, handle) = mock_scene();
        let mut layer = GridLayer::new("paths_a");
        layer.hide();
        layer.show();

        layer.set_grid(three_way_grid_with_target());
        layer.bind_to_scene(handle);
        assert!(layer.is_visible());
        assert_eq!(scene.borrow().children.len(), 2);
    }

    #[test]
    fn test_set_grid_while_bound_replaces_primitives() {
        let (scene, handle) = mock_scene();
        let mut layer = GridLayer::new("paths_a");
        layer.set_grid(three_way_grid_with_target());
        layer.bind_to_scene(handle);
        let old_lines = layer.lines().unwrap();

        let next = Rc::new(WayGrid::new(8, vec![(geo(1.0, 1.0), geo(1.0, 1.01))]));
        layer.set_grid(next);

        // the old collection is gone from the scene, the new one attached
        assert!(!Rc::ptr_eq(&old_lines, &layer.lines().unwrap()));
        assert_eq!(scene.borrow().children.len(), 1);
        assert_eq!(layer.lines().unwrap().borrow().segments().len(), 1);
    }

    #[test]
    fn test_destroy_releases_primitives() {
        let (scene, handle) = mock_scene();
        let mut layer = GridLayer::new("paths_a");
        layer.set_grid(three_way_grid_with_target());
        layer.bind_to_scene(handle);

        layer.destroy();
        assert!(!layer.is_bound());
        assert!(scene.borrow().children.is_empty());
        assert!(layer.lines().is_none());
        assert!(layer.marker().is_none());

        // destroying an unbound layer is a no-op
        layer.destroy();
    }

    #[test]
    fn test_rotate_then_move_shares_one_model() {
        let (scene, handle) = mock_scene();
        let mut layer = GridLayer::new("paths_a");
        layer.set_grid(three_way_grid_with_target());
        layer.bind_to_scene(handle);

        layer.rotate(PI / 4.0);
        layer.move_by(12.0, -3.0);

        let expected =
            Mat4::from_translation(vec3(12.0, -3.0, 0.0)) * Mat4::from_rotation_z(PI / 4.0);
        let lines_model = layer.lines().unwrap().borrow().model();
        let marker_model = layer.marker().unwrap().borrow().model();
        assert_eq!(lines_model, marker_model);
        for (a, b) in lines_model
            .to_cols_array()
            .iter()
            .zip(expected.to_cols_array().iter())
        {
            assert!((a - b).abs() < 1e-5);
        }
        assert_eq!(scene.borrow().forced_renders, 2);
    }

    #[test]
    fn test_zero_transform_resets_to_identity() {
        let (_, handle) = mock_scene();
        let mut layer = GridLayer::new("paths_a");
        layer.set_grid(three_way_grid_with_target());
        layer.bind_to_scene(handle);

        layer.rotate(1.0);
        layer.rotate(0.0);
        layer.move_by(0.0, 0.0);

        assert_eq!(layer.lines().unwrap().borrow().model(), Mat4::IDENTITY);
        assert_eq!(layer.marker().unwrap().borrow().model(), Mat4::IDENTITY);
    }

    #[test]
    fn test_rebuilt_primitives_carry_current_transform() {
        let (_, handle) = mock_scene();
        let mut layer = GridLayer::new("paths_a");
        layer.set_grid(three_way_grid_with_target());
        layer.bind_to_scene(handle);
        layer.move_by(5.0, 6.0);

        layer.set_grid(three_way_grid_with_target());
        let model = layer.lines().unwrap().borrow().model();
        let expected = Mat4::from_translation(vec3(5.0, 6.0, 0.0));
        assert_eq!(model, expected);
    }

    #[test]
    fn test_set_color_updates_live_lines_and_keeps_marker() {
        let (scene, handle) = mock_scene();
        let mut layer = GridLayer::new("paths_a");
        layer.set_grid(three_way_grid_with_target());
        layer.bind_to_scene(handle);

        layer.set_color("#ff0000").unwrap();
        let red = layer.lines().unwrap().borrow().color();
        assert!((red.red - 1.0).abs() < 1e-4);
        assert!(red.green.abs() < 1e-4);

        // invalid input keeps the previous color
        let err = layer.set_color("not-a-color").unwrap_err();
        assert_eq!(err.input, "not-a-color");
        assert_eq!(layer.lines().unwrap().borrow().color(), red);

        // marker accent is independent of the line color
        let marker_color = layer.marker().unwrap().borrow().color();
        assert!((marker_color.red - 1.0).abs() < 1e-4);
        assert!(scene.borrow().render_calls > 0);
    }

    #[test]
    fn test_set_line_width_applies_to_built_lines() {
        let (_, handle) = mock_scene();
        let mut layer = GridLayer::new("paths_a");

        // before primitives exist the width is only deferred style state
        layer.set_line_width(3.0);
        layer.set_grid(three_way_grid_with_target());
        layer.bind_to_scene(handle);
        assert_eq!(layer.lines().unwrap().borrow().line_width(), 3.0);

        layer.set_line_width(5.0);
        assert_eq!(layer.lines().unwrap().borrow().line_width(), 5.0);
    }

    #[test]
    fn test_view_box_is_quarter_of_largest_extent() {
        let mut layer = GridLayer::new("paths_a");
        assert!(layer.view_box().is_none());

        let grid = three_way_grid_with_target();
        layer.set_grid(grid.clone());
        let rect = grid.projected_rect();
        let expected = rect.width.max(rect.height) / 4.0;
        let view_box = layer.view_box().unwrap();
        assert_eq!(view_box.right, expected);
        assert_eq!(view_box.left, -expected);
        assert_eq!(view_box.top, expected);
        assert_eq!(view_box.bottom, -expected);
    }

    #[test]
    fn test_query_bounds_falls_back_to_area_id() {
        let mut layer = GridLayer::new("paths_a");
        assert!(layer.query_bounds().is_none());

        let area_grid = Rc::new(
            WayGrid::new(42, vec![(geo(0.0, 0.0), geo(0.0, 0.01))]).as_area(),
        );
        layer.set_grid(area_grid);
        assert_eq!(
            layer.query_bounds(),
            Some(QueryBounds::Area { area_id: 42 })
        );
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = GridLayer::generate_id();
        let b = GridLayer::generate_id();
        assert!(a.starts_with("paths_"));
        assert_ne!(a, b);
    }
}
