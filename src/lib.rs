//! Spanning scan-line renderer.
//!
//! Turns a flat triangle mesh into an image one scanline at a time: a
//! polygon table and an edge table are built from the projected triangles,
//! then a sweep keeps an x-sorted active-edge list per row and resolves
//! overlapping spans by interpolated depth. No full-image depth buffer is
//! ever allocated.
//!
//! ```no_run
//! use spanning_scanline::{Renderer, ScanlineRenderer, scene::MeshBuffers};
//!
//! let r = ScanlineRenderer::default();
//! let mesh = MeshBuffers::uv_sphere(1.0, 16, 24);
//! r.set_buffer_data(&mesh.vertices, &mesh.normals, &mesh.indices);
//! r.set_window_size(320, 240);
//! assert!(r.render());
//! let image = r.render_result();
//! ```

pub mod defs;
pub mod renderer;
pub mod scene;

pub use defs::RasterFlags;
pub use renderer::{
    Image, PassState, RenderConfig, RenderError, RenderStats, Renderer, RendererExt, Rgba,
    ScanlineRenderer,
};
