// src/views/transform.rs
//
// Pan/rotate state for a layer and its reduction to a single model
// matrix. Rotation is about the scene origin; translation composes after
// it, so the pair never drifts between primitives sharing the matrix.

use nannou::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerTransform {
    pub dx: f32,
    pub dy: f32,
    /// Rotation angle in radians.
    pub angle: f32,
}

impl Default for LayerTransform {
    fn default() -> Self {
        Self {
            dx: 0.0,
            dy: 0.0,
            angle: 0.0,
        }
    }
}

impl LayerTransform {
    pub fn is_identity(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0 && self.angle == 0.0
    }

    /// Reduces the state to one model matrix, always starting from
    /// identity so a prior non-identity model is explicitly cleared.
    pub fn compute_model(&self) -> Mat4 {
        let mut model = Mat4::IDENTITY;

        if self.angle != 0.0 {
            let cos = self.angle.cos();
            let sin = self.angle.sin();
            // Z rotation in homogeneous form, column-major
            model = Mat4::from_cols_array(&[
                cos, sin, 0.0, 0.0, //
                -sin, cos, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ]);
        }

        if self.dx != 0.0 || self.dy != 0.0 {
            model = Mat4::from_translation(vec3(self.dx, self.dy, 0.0)) * model;
        }

        model
    }
}
