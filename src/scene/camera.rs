use glam::{Mat4, Vec3};

use crate::defs::DEFAULT_CAMERA_POS;

/// Viewer looking at a fixed target.
///
/// * Always looks **at** `target`, so moving the eye orbits / dollies around it.
/// * Projection is a symmetric GL-style perspective frustum: NDC depth runs
///   from -1 at `near` to +1 at `far`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pos: Vec3,
    target: Vec3,
    up: Vec3,
    fov_y: f32, // radians
    near: f32,
    far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DEFAULT_CAMERA_POS, Vec3::ZERO, 90_f32.to_radians())
    }
}

impl Camera {
    /// Create a camera at `pos` looking at `target` with vertical FoV `fov_y`.
    pub fn new(pos: Vec3, target: Vec3, fov_y: f32) -> Self {
        Self {
            pos,
            target,
            up: Vec3::Y,
            fov_y,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Override the near/far planes.
    pub fn with_depth_range(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// World-space eye position.
    #[inline]
    pub fn pos(&self) -> Vec3 {
        self.pos
    }

    #[inline]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn set_pos(&mut self, pos: Vec3) {
        self.pos = pos;
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Shift the eye by `delta` in world space; the target stays put.
    pub fn step(&mut self, delta: Vec3) {
        self.pos += delta;
    }

    /*───────────────── projection / frustum helpers ─────────────────*/

    /// World → eye transform. Meshes are given in world space, so this is
    /// the whole model-view matrix.
    #[inline]
    pub fn model_view(&self) -> Mat4 {
        // Looking straight along `up` has no defined orientation; pick Z.
        let forward = (self.target - self.pos).normalize_or_zero();
        let up = if forward.cross(self.up).length_squared() < 1e-12 {
            Vec3::Z
        } else {
            self.up
        };
        Mat4::look_at_rh(self.pos, self.target, up)
    }

    /// Eye → clip transform for a viewport of the given aspect (w / h).
    #[inline]
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, aspect, self.near, self.far)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn target_lands_on_view_axis() {
        let cam = Camera::new(vec3_z(5.0), Vec3::ZERO, 1.0);
        let eye = cam.model_view() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        // Right-handed view space looks down -Z.
        assert!(eye.x.abs() < 1e-5 && eye.y.abs() < 1e-5);
        assert!((eye.z + 5.0).abs() < 1e-5);
    }

    #[test]
    fn near_and_far_map_to_ndc_extremes() {
        let cam = Camera::default().with_depth_range(1.0, 10.0);
        let p = cam.projection(1.0);
        let near = p * Vec4::new(0.0, 0.0, -1.0, 1.0);
        let far = p * Vec4::new(0.0, 0.0, -10.0, 1.0);
        assert!((near.z / near.w + 1.0).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn looking_straight_down_still_builds_a_view() {
        let cam = Camera::new(Vec3::new(0.0, 4.0, 0.0), Vec3::ZERO, 1.0);
        let m = cam.model_view();
        assert!(m.is_finite());
    }

    #[test]
    fn step_moves_eye_only() {
        let mut cam = Camera::default();
        cam.step(Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(cam.pos(), Vec3::new(0.5, 0.0, 2.0));
        assert_eq!(cam.target(), Vec3::ZERO);
    }

    fn vec3_z(z: f32) -> Vec3 {
        Vec3::new(0.0, 0.0, z)
    }
}
