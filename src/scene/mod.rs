// src/scene/mod.rs
//
// The rendering scene contract. The layer never draws; it hands retained
// primitives to a scene and asks it for frames. Frame requests are
// fire-and-forget signals, coalesced by the scene, not by the layer.

use std::cell::RefCell;
use std::rc::Rc;

use nannou::prelude::*;

/// A retained renderable owned by a layer and attached to a scene.
pub trait ScenePrimitive {
    fn id(&self) -> &str;

    /// Model transform applied before world-space compositing.
    fn model(&self) -> Mat4;

    fn set_model(&mut self, model: Mat4);

    /// Recomputes the cached world transform. `force` bypasses any
    /// dirty-flag shortcut in the implementation.
    fn update_world_transform(&mut self, force: bool);
}

pub type PrimitiveHandle = Rc<RefCell<dyn ScenePrimitive>>;

/// External rendering scene. Lifetime exceeds any layer bound to it.
pub trait Scene {
    fn append_child(&mut self, child: PrimitiveHandle);

    fn remove_child(&mut self, id: &str);

    fn render_frame(&mut self, force: bool);
}
