use glam::{Mat4, Vec3};

use crate::scene::Camera;

/// Output resolution plus the NDC → pixel mapping derived from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
    half_w: f32,
    half_h: f32,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            half_w: width as f32 * 0.5,
            half_h: height as f32 * 0.5,
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.half_w / self.half_h
    }

    /// NDC → pixel space. The center of pixel `(i, r)` lands on the integer
    /// point `(i, r)`; row 0 is the bottom row.
    #[inline]
    fn to_pixels(&self, ndc: Vec3) -> ScreenPoint {
        ScreenPoint {
            x: (ndc.x + 1.0) * self.half_w - 0.5,
            y: (ndc.y + 1.0) * self.half_h - 0.5,
            depth: (ndc.z + 1.0) * 0.5,
        }
    }
}

/// Vertex after projection. `depth` is 0 at the near plane, 1 at the far
/// plane: smaller is nearer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

impl ScreenPoint {
    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.depth)
    }
}

/// World → screen mapping for one pass.
#[derive(Clone, Copy, Debug)]
pub struct Projector {
    clip_from_world: Mat4,
    viewport: Viewport,
}

impl Projector {
    pub fn new(camera: &Camera, viewport: Viewport) -> Self {
        Self {
            clip_from_world: camera.projection(viewport.aspect()) * camera.model_view(),
            viewport,
        }
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Project a world-space point. `None` when the point sits at or behind
    /// the eye (`w <= 0`), where the perspective divide is meaningless.
    #[inline]
    pub fn project(&self, p: Vec3) -> Option<ScreenPoint> {
        let clip = self.clip_from_world * p.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        Some(self.viewport.to_pixels(clip.truncate() / clip.w))
    }
}
