//! Rendering abstraction layer.
//!
//! *Callers never touch the framebuffer of a pass directly.*
//! They configure a type that implements [`Renderer`], trigger a pass and
//! read back an immutable [`Image`] snapshot.
//!
//! * [`scanline::ScanlineRenderer`] is the CPU scan-line back-end.
//! * A helper blanket-impl [`RendererExt`] adds `present` so call-sites that
//!   only want to blit the result stay short.

use glam::Vec3;
use thiserror::Error;

use crate::defs::{DEFAULT_BACKGROUND, DEFAULT_TINT, RasterFlags};

/// Pixel format of the framebuffer and output image (0xAARRGGBB).
pub type Rgba = u32;

/// Pack 8-bit channels into an opaque [`Rgba`].
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Split an [`Rgba`] into its `[r, g, b]` channels.
#[inline]
pub const fn channels(c: Rgba) -> [u8; 3] {
    [(c >> 16) as u8, (c >> 8) as u8, c as u8]
}

/// Scale the color channels of `c` by `factor` (clamped to `0..=1`).
/// Alpha is forced opaque.
pub fn shade(c: Rgba, factor: f32) -> Rgba {
    let k = factor.clamp(0.0, 1.0);
    let [r, g, b] = channels(c);
    let scale = |ch: u8| (ch as f32 * k).round() as u8;
    rgb(scale(r), scale(g), scale(b))
}

/// Finished frame: `width × height` pixels, row 0 is the **top** row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Rgba>,
}

impl Image {
    /// Pixel at column `x`, row `y` (counted from the top).
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// One row of pixels, counted from the top.
    pub fn row(&self, y: usize) -> &[Rgba] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Life cycle of one render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PassState {
    Idle = 0,
    Building = 1,
    Sweeping = 2,
    Done = 3,
}

impl PassState {
    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            1 => PassState::Building,
            2 => PassState::Sweeping,
            3 => PassState::Done,
            _ => PassState::Idle,
        }
    }
}

/// Pass-level failures. Per-triangle problems never surface here; they are
/// filtered and counted in [`RenderStats`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// Another pass is still in flight on this renderer.
    #[error("a render pass is already in progress")]
    Busy,

    /// `set_buffer_data` was never called.
    #[error("no vertex/normal/index data has been set")]
    NoBufferData,

    /// The index buffer holds no complete triangle.
    #[error("index buffer contains no triangles")]
    EmptyMesh,

    /// `set_window_size` was never called (or was called with a zero side).
    #[error("window size has not been set")]
    WindowSizeUnset,
}

/// Renderer settings that are not part of the scene itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    pub flags: RasterFlags,
    pub background: Rgba,
    /// Base color of triangles without a per-triangle tint.
    pub default_tint: Rgba,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            flags: RasterFlags::default(),
            background: DEFAULT_BACKGROUND,
            default_tint: DEFAULT_TINT,
        }
    }
}

/// Counters gathered while building the tables of one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub triangles: usize,
    pub polygons: usize,
    pub edges: usize,
    pub back_faces: usize,
    pub off_screen: usize,
    pub degenerate: usize,
    pub bad_indices: usize,
}

/// A mesh renderer that owns its scratch tables and publishes an image.
///
/// All methods take `&self`; implementations are expected to be shareable
/// between threads and to reject overlapping passes.
pub trait Renderer {
    /// Replace the mesh snapshot used by the next pass (copied).
    fn set_buffer_data(&self, vertices: &[f32], normals: &[f32], indices: &[u32]);

    /// Move the eye; the camera keeps looking at its target.
    fn set_camera_pos(&self, pos: Vec3);

    /// Set the output resolution and viewport transform.
    fn set_window_size(&self, width: usize, height: usize);

    /// Run one pass. `false` when the pass was rejected.
    fn render(&self) -> bool;

    /// Snapshot of the last successfully rendered image.
    fn render_result(&self) -> Image;
}

/// Convenience blanket-impl with a one-liner `present` adaptor.
pub trait RendererExt: Renderer {
    /// Render and **loan** the finished pixels to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` runs only when the pass succeeded.
    /// * The viewer passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn present<F, T>(&self, submit: F) -> Option<T>
    where
        F: FnOnce(&[Rgba], usize, usize) -> T,
    {
        if !self.render() {
            return None;
        }
        let image = self.render_result();
        Some(submit(&image.pixels, image.width, image.height))
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

pub mod scanline;

pub use scanline::ScanlineRenderer;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_round_trips_through_channels() {
        assert_eq!(channels(rgb(0x12, 0x34, 0x56)), [0x12, 0x34, 0x56]);
        assert_eq!(rgb(0, 0, 0) >> 24, 0xFF);
    }

    #[test]
    fn shade_clamps_factor() {
        let red = rgb(200, 0, 0);
        assert_eq!(shade(red, 1.5), red);
        assert_eq!(shade(red, -0.3), rgb(0, 0, 0));
        assert_eq!(channels(shade(red, 0.5)), [100, 0, 0]);
    }

    #[test]
    fn image_pixel_is_bounds_checked() {
        let img = Image {
            width: 2,
            height: 2,
            pixels: vec![1, 2, 3, 4],
        };
        assert_eq!(img.pixel(1, 1), Some(4));
        assert_eq!(img.pixel(2, 0), None);
        assert_eq!(img.row(1), &[3, 4]);
    }

    #[test]
    fn pass_state_decodes_its_own_discriminants() {
        for s in [
            PassState::Idle,
            PassState::Building,
            PassState::Sweeping,
            PassState::Done,
        ] {
            assert_eq!(PassState::from_u8(s as u8), s);
        }
    }
}
