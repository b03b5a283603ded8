pub mod flags;

pub use self::flags::RasterFlags;

use glam::Vec3;

use crate::renderer::Rgba;

/// Window size the viewer opens with.
pub const DEFAULT_WIDTH: usize = 600;
pub const DEFAULT_HEIGHT: usize = 600;

/// Eye position of a fresh camera, looking at the origin.
pub const DEFAULT_CAMERA_POS: Vec3 = Vec3::new(0.0, 0.0, 2.0);

/// Distance the viewer moves the camera per key press.
pub const CAMERA_STEP: f32 = 0.5;

/// Opaque black.
pub const DEFAULT_BACKGROUND: Rgba = 0xFF_00_00_00;

/// Base color of triangles that carry no tint of their own.
pub const DEFAULT_TINT: Rgba = 0xFF_FF_FF_FF;
