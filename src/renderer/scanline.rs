//! ---------------------------------------------------------------------------
//! Spanning scan-line renderer
//!
//! * Builds a polygon table and a row-bucketed edge table from the mesh.
//! * Sweeps rows top to bottom with an x-sorted active-edge list; each run
//!   between two crossings is resolved by interpolated depth, so no
//!   full-image Z-buffer exists.
//! * Publishes an immutable [`Image`] only after a pass completed.
//!
//! One pass at a time: the `state` field doubles as the re-entrancy guard.
//! A `render` that finds it anything but `Idle` fails with
//! [`RenderError::Busy`] instead of waiting.
//! ---------------------------------------------------------------------------

pub mod active;
pub mod edge;
pub mod framebuffer;
pub mod polygon;
pub mod projection;
pub mod span;

#[cfg(test)]
mod tests;

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock,
    atomic::{AtomicU8, Ordering},
};

use glam::Vec3;

use self::{
    active::ActiveEdges,
    edge::EdgeTable,
    framebuffer::Framebuffer,
    polygon::{Polygon, PolygonBuilder},
    projection::{Projector, Viewport},
    span::SpanResolver,
};
use crate::{
    defs::RasterFlags,
    renderer::{Image, PassState, RenderConfig, RenderError, RenderStats, Renderer, Rgba},
    scene::{Camera, MeshBuffers},
};

/// Observer called on every pass state transition (from the rendering
/// thread, while the pass holds its tables).
pub type PassHook = Arc<dyn Fn(PassState) + Send + Sync>;

/*───────────────────────────────────────────────────────────────────────*/
/*                               Inputs                                 */
/*───────────────────────────────────────────────────────────────────────*/

/// Everything the setters touch. Locked only briefly.
struct Inputs {
    mesh: Option<Arc<MeshBuffers>>,
    camera: Camera,
    viewport: Option<Viewport>,
    config: RenderConfig,
    hook: Option<PassHook>,
}

/// Copy of the inputs one pass works from.
struct Snapshot {
    mesh: Arc<MeshBuffers>,
    camera: Camera,
    viewport: Viewport,
    config: RenderConfig,
    hook: Option<PassHook>,
}

impl Inputs {
    fn snapshot(&self) -> Result<Snapshot, RenderError> {
        let mesh = self.mesh.clone().ok_or(RenderError::NoBufferData)?;
        let viewport = self.viewport.ok_or(RenderError::WindowSizeUnset)?;
        if mesh.triangle_count() == 0 {
            return Err(RenderError::EmptyMesh);
        }
        Ok(Snapshot {
            mesh,
            camera: self.camera,
            viewport,
            config: self.config,
            hook: self.hook.clone(),
        })
    }
}

/*───────────────────────────────────────────────────────────────────────*/
/*                             Pass tables                              */
/*───────────────────────────────────────────────────────────────────────*/

/// Scratch owned by the in-flight pass. Rebuilt from scratch every pass;
/// allocations are kept.
#[derive(Default)]
struct RenderPass {
    polygons: Vec<Polygon>,
    edges: EdgeTable,
    active: ActiveEdges,
    spans: SpanResolver,
    framebuffer: Framebuffer,
}

impl RenderPass {
    fn build(&mut self, snap: &Snapshot) -> RenderStats {
        let vp = snap.viewport;
        self.polygons.clear();
        self.edges.reset(vp.height);
        self.active.clear();
        self.framebuffer
            .resize_and_clear(vp.width, vp.height, snap.config.background);

        let projector = Projector::new(&snap.camera, vp);
        let stats = PolygonBuilder::new(&projector, snap.camera.pos(), snap.config).build(
            &snap.mesh,
            &mut self.polygons,
            &mut self.edges,
        );
        self.spans.reset(self.polygons.len());
        stats
    }

    fn sweep(&mut self) {
        for row in (0..self.edges.rows()).rev() {
            self.active.activate(self.edges.drain_row(row));
            self.active.sort();
            self.spans.resolve_row(
                row,
                self.active.edges(),
                &self.polygons,
                &mut self.framebuffer,
            );
            self.active.advance();
        }
    }
}

/*───────────────────────────────────────────────────────────────────────*/
/*                              Guard                                   */
/*───────────────────────────────────────────────────────────────────────*/

/// Holds the renderer out of `Idle` for the lifetime of one pass; drops
/// back to `Idle` however the pass ends.
struct PassGuard<'a> {
    state: &'a AtomicU8,
    hook: Option<PassHook>,
}

impl<'a> PassGuard<'a> {
    fn enter(state: &'a AtomicU8) -> Result<Self, RenderError> {
        state
            .compare_exchange(
                PassState::Idle as u8,
                PassState::Building as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|_| RenderError::Busy)?;
        Ok(Self { state, hook: None })
    }

    fn notify(&self, s: PassState) {
        if let Some(hook) = &self.hook {
            hook(s);
        }
    }

    fn advance(&self, s: PassState) {
        self.state.store(s as u8, Ordering::Release);
        self.notify(s);
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.state.store(PassState::Idle as u8, Ordering::Release);
        self.notify(PassState::Idle);
    }
}

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

/// CPU scan-line mesh renderer. `Send + Sync`; share it behind an `Arc`.
pub struct ScanlineRenderer {
    inputs: Mutex<Inputs>,
    pass: Mutex<RenderPass>,
    state: AtomicU8,
    output: RwLock<Image>,
}

impl Default for ScanlineRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl ScanlineRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            inputs: Mutex::new(Inputs {
                mesh: None,
                camera: Camera::default(),
                viewport: None,
                config,
                hook: None,
            }),
            pass: Mutex::new(RenderPass::default()),
            state: AtomicU8::new(PassState::Idle as u8),
            output: RwLock::new(Image::default()),
        }
    }

    /// Inputs survive a panicking setter unchanged enough to keep using.
    fn inputs(&self) -> MutexGuard<'_, Inputs> {
        self.inputs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /*──────────────────────── configuration ────────────────────────*/

    /// Replace the mesh snapshot, per-triangle tints included.
    pub fn set_mesh(&self, mesh: MeshBuffers) {
        self.inputs().mesh = Some(Arc::new(mesh));
    }

    pub fn set_camera(&self, camera: Camera) {
        self.inputs().camera = camera;
    }

    pub fn camera(&self) -> Camera {
        self.inputs().camera
    }

    pub fn set_background(&self, color: Rgba) {
        self.inputs().config.background = color;
    }

    pub fn set_flags(&self, flags: RasterFlags) {
        self.inputs().config.flags = flags;
    }

    pub fn config(&self) -> RenderConfig {
        self.inputs().config
    }

    /// Install an observer for pass state transitions.
    pub fn set_pass_hook(&self, hook: impl Fn(PassState) + Send + Sync + 'static) {
        self.inputs().hook = Some(Arc::new(hook));
    }

    pub fn clear_pass_hook(&self) {
        self.inputs().hook = None;
    }

    /// Current pass state; `Idle` unless a pass is in flight.
    pub fn state(&self) -> PassState {
        PassState::from_u8(self.state.load(Ordering::Acquire))
    }

    /*────────────────────────── render pass ────────────────────────*/

    /// Run one pass and report what went into the tables.
    ///
    /// On any error the previously published image stays untouched.
    pub fn try_render(&self) -> Result<RenderStats, RenderError> {
        let mut guard = PassGuard::enter(&self.state)?;
        let snap = self.inputs().snapshot()?;
        guard.hook = snap.hook.clone();
        guard.notify(PassState::Building);

        // Only the guard holder gets here, so this never contends; a poisoned
        // lock just means an earlier pass panicked and its tables are rebuilt
        // below anyway.
        let mut pass = self.pass.lock().unwrap_or_else(PoisonError::into_inner);
        let stats = pass.build(&snap);

        guard.advance(PassState::Sweeping);
        pass.sweep();

        guard.advance(PassState::Done);
        {
            let mut out = self.output.write().unwrap_or_else(PoisonError::into_inner);
            pass.framebuffer.flip_into(&mut out);
        }

        log::debug!(
            "pass {}x{}: {} triangles -> {} polygons, {} edges \
             ({} back-facing, {} off-screen, {} degenerate, {} bad indices)",
            snap.viewport.width,
            snap.viewport.height,
            stats.triangles,
            stats.polygons,
            stats.edges,
            stats.back_faces,
            stats.off_screen,
            stats.degenerate,
            stats.bad_indices,
        );
        Ok(stats)
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for ScanlineRenderer {
    fn set_buffer_data(&self, vertices: &[f32], normals: &[f32], indices: &[u32]) {
        if vertices.len() % 3 != 0 || normals.len() != vertices.len() {
            log::warn!(
                "mesh buffers disagree: {} vertex floats, {} normal floats",
                vertices.len(),
                normals.len()
            );
        }
        self.set_mesh(MeshBuffers::from_slices(vertices, normals, indices));
    }

    fn set_camera_pos(&self, pos: Vec3) {
        self.inputs().camera.set_pos(pos);
    }

    fn set_window_size(&self, width: usize, height: usize) {
        self.inputs().viewport = (width > 0 && height > 0).then(|| Viewport::new(width, height));
    }

    fn render(&self) -> bool {
        match self.try_render() {
            Ok(_) => true,
            Err(e) => {
                log::debug!("render rejected: {e}");
                false
            }
        }
    }

    fn render_result(&self) -> Image {
        self.output
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
