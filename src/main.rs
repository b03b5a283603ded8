//! Interactive mesh viewer for the scan-line renderer.
//!
//! ```bash
//! cargo run --release -- --mesh sphere
//! cargo run --release -- --mesh cube --headless --out cube.ppm
//! ```
//!
//! W/S dolly the camera, A/D move it sideways, Up/Down raise and lower it.
//! The scene is only re-rendered when the camera moved.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use glam::Vec3;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use spanning_scanline::{
    Image, RasterFlags, RenderConfig, Renderer, ScanlineRenderer,
    defs::{CAMERA_STEP, DEFAULT_BACKGROUND, DEFAULT_CAMERA_POS, DEFAULT_HEIGHT, DEFAULT_WIDTH},
    renderer::channels,
    scene::MeshBuffers,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MeshKind {
    Cube,
    Sphere,
    /// Two overlapping tinted squares at different depths.
    Quads,
}

impl MeshKind {
    fn build(self) -> MeshBuffers {
        match self {
            MeshKind::Cube => MeshBuffers::cube(0.5),
            MeshKind::Sphere => MeshBuffers::uv_sphere(0.8, 24, 36),
            MeshKind::Quads => {
                let mut m = MeshBuffers::quad(Vec3::new(0.0, 0.0, 0.5), 0.5, Some(0xFF_E04030));
                m.merge(&MeshBuffers::quad(
                    Vec3::new(-0.35, -0.35, -0.5),
                    0.65,
                    Some(0xFF_3060E0),
                ));
                m
            }
        }
    }
}

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: usize,

    #[arg(long, value_enum, default_value_t = MeshKind::Sphere)]
    mesh: MeshKind,

    /// Initial distance of the camera from the origin along +Z
    #[arg(long, default_value_t = DEFAULT_CAMERA_POS.z)]
    camera_z: f32,

    /// Background as 0xRRGGBB
    #[arg(long, value_parser = parse_color, default_value = "0x000000")]
    background: u32,

    /// Keep back-facing triangles
    #[arg(long)]
    no_cull: bool,

    /// Render once without opening a window
    #[arg(long)]
    headless: bool,

    /// Write the (last) frame as binary PPM
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
}

fn parse_color(s: &str) -> Result<u32, String> {
    let hex = s.trim_start_matches("0x").trim_start_matches('#');
    u32::from_str_radix(hex, 16)
        .map(|c| DEFAULT_BACKGROUND | (c & 0x00FF_FFFF))
        .map_err(|e| format!("bad color {s:?}: {e}"))
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    let mut flags = RasterFlags::default();
    flags.set(RasterFlags::CULL_BACK_FACES, !opts.no_cull);
    let renderer = ScanlineRenderer::new(RenderConfig {
        flags,
        background: opts.background,
        ..RenderConfig::default()
    });

    let mesh = opts.mesh.build();
    println!(
        "{:?}: {} vertices, {} triangles",
        opts.mesh,
        mesh.vertices.len() / 3,
        mesh.triangle_count()
    );
    renderer.set_buffer_data(&mesh.vertices, &mesh.normals, &mesh.indices);
    renderer.set_window_size(opts.width, opts.height);

    let mut eye = Vec3::new(0.0, 0.0, opts.camera_z);
    renderer.set_camera_pos(eye);

    if opts.headless {
        let t0 = Instant::now();
        let stats = renderer.try_render()?;
        println!(
            "render: {:.2} ms, {} polygons, {} edges",
            t0.elapsed().as_secs_f64() * 1000.0,
            stats.polygons,
            stats.edges
        );
        if let Some(path) = &opts.out {
            write_ppm(path, &renderer.render_result())?;
        }
        return Ok(());
    }

    let mut win = Window::new(
        "Spanning scan-line",
        opts.width,
        opts.height,
        WindowOptions::default(),
    )?;
    win.set_target_fps(60);

    let mut dirty = true;
    let mut frame = Image::default();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        /* --------------- camera keys ------------------------------------ */
        const MOVES: [(Key, Vec3); 6] = [
            (Key::W, Vec3::new(0.0, 0.0, -CAMERA_STEP)),
            (Key::S, Vec3::new(0.0, 0.0, CAMERA_STEP)),
            (Key::A, Vec3::new(-CAMERA_STEP, 0.0, 0.0)),
            (Key::D, Vec3::new(CAMERA_STEP, 0.0, 0.0)),
            (Key::Up, Vec3::new(0.0, CAMERA_STEP, 0.0)),
            (Key::Down, Vec3::new(0.0, -CAMERA_STEP, 0.0)),
        ];
        for (key, delta) in MOVES {
            if win.is_key_pressed(key, KeyRepeat::Yes) {
                eye += delta;
                dirty = true;
            }
        }

        /* --------------- draw ------------------------------------------- */
        if dirty {
            renderer.set_camera_pos(eye);
            let t0 = Instant::now();
            match renderer.try_render() {
                Ok(stats) => {
                    println!(
                        "eye {eye}: {:.2} ms, {} of {} triangles visible",
                        t0.elapsed().as_secs_f64() * 1000.0,
                        stats.polygons,
                        stats.triangles
                    );
                    frame = renderer.render_result();
                }
                Err(e) => eprintln!("render failed: {e}"),
            }
            dirty = false;
        }

        if frame.is_empty() {
            win.update();
        } else {
            win.update_with_buffer(&frame.pixels, frame.width, frame.height)?;
        }
    }

    if let Some(path) = &opts.out {
        write_ppm(path, &frame)?;
    }
    Ok(())
}

/// Binary PPM (P6), top row first.
fn write_ppm(path: &Path, img: &Image) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write!(out, "P6\n{} {}\n255\n", img.width, img.height)?;
    for &px in &img.pixels {
        out.write_all(&channels(px))?;
    }
    out.flush()?;
    println!("wrote {}", path.display());
    Ok(())
}
