//! bench.rs - headless timing of repeated render passes.
//!
//! USAGE:
//! ```bash
//! cargo run --release --bin bench -- --stacks 64 --slices 96 --frames 200
//! ```

use std::time::{Duration, Instant};

use clap::Parser;
use glam::Vec3;

use spanning_scanline::{Renderer, ScanlineRenderer, scene::MeshBuffers};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    #[arg(long, default_value_t = 1280)]
    width: usize,

    #[arg(long, default_value_t = 800)]
    height: usize,

    /// Sphere latitude bands
    #[arg(long, default_value_t = 48)]
    stacks: u32,

    /// Sphere longitude bands
    #[arg(long, default_value_t = 64)]
    slices: u32,

    /// Passes to time (after one warm-up pass)
    #[arg(long, default_value_t = 100)]
    frames: usize,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    let mut mesh = MeshBuffers::uv_sphere(0.8, opts.stacks, opts.slices);
    mesh.merge(&MeshBuffers::cube(0.6));

    let renderer = ScanlineRenderer::default();
    renderer.set_buffer_data(&mesh.vertices, &mesh.normals, &mesh.indices);
    renderer.set_window_size(opts.width, opts.height);
    renderer.set_camera_pos(Vec3::new(0.4, 0.3, 2.0));

    let warm = renderer.try_render()?;
    println!(
        "{}x{}: {} triangles, {} polygons, {} edges per pass",
        opts.width, opts.height, warm.triangles, warm.polygons, warm.edges
    );

    let mut total = Duration::ZERO;
    let mut worst = Duration::ZERO;
    for _ in 0..opts.frames {
        let t0 = Instant::now();
        renderer.try_render()?;
        let dt = t0.elapsed();
        total += dt;
        worst = worst.max(dt);
    }

    let frames = opts.frames.max(1) as f64;
    let avg_ms = total.as_secs_f64() * 1000.0 / frames;
    println!(
        "avg render: {:.2} ms  ({:.1} FPS), worst {:.2} ms",
        avg_ms,
        1000.0 / avg_ms,
        worst.as_secs_f64() * 1000.0
    );
    Ok(())
}
