//! Whole-pass behaviour of [`ScanlineRenderer`]: 64×64 viewport, camera at
//! `(0, 0, 2)` looking at the origin with a 90° field of view. At `z = 0`
//! that maps world `x` to screen `16·x + 31.5`.

use std::sync::{
    Arc, Barrier, Mutex,
    atomic::{AtomicBool, Ordering},
};
use std::thread;

use glam::Vec3;

use super::ScanlineRenderer;
use crate::{
    defs::{DEFAULT_BACKGROUND, RasterFlags},
    renderer::{Image, PassState, RenderError, Renderer, RendererExt, Rgba, channels},
    scene::{Camera, MeshBuffers},
};

const SIZE: usize = 64;
const RED: Rgba = 0xFF_FF0000;
const BLUE: Rgba = 0xFF_0000FF;

fn triangle(pts: [Vec3; 3]) -> MeshBuffers {
    let mut m = MeshBuffers::default();
    let a = m.push_vertex(pts[0], Vec3::Z);
    let b = m.push_vertex(pts[1], Vec3::Z);
    let c = m.push_vertex(pts[2], Vec3::Z);
    m.push_triangle(a, b, c, None);
    m
}

/// Much larger than the view: covers every pixel.
fn backdrop() -> MeshBuffers {
    triangle([
        Vec3::new(-10.0, -10.0, 0.0),
        Vec3::new(10.0, -10.0, 0.0),
        Vec3::new(0.0, 10.0, 0.0),
    ])
}

fn sized(mesh: MeshBuffers) -> ScanlineRenderer {
    let r = ScanlineRenderer::default();
    r.set_mesh(mesh);
    r.set_window_size(SIZE, SIZE);
    r
}

fn is_background(img: &Image) -> bool {
    img.pixels.iter().all(|&p| p == DEFAULT_BACKGROUND)
}

/// Red square at `z = 0.5` over a blue one at `z = -0.5`; they overlap in
/// the middle of the screen and only blue reaches out to the lower left.
fn overlapping_quads(near_first: bool) -> MeshBuffers {
    let near = MeshBuffers::quad(Vec3::new(0.0, 0.0, 0.5), 0.5, Some(RED));
    let far = MeshBuffers::quad(Vec3::new(-0.35, -0.35, -0.5), 0.65, Some(BLUE));
    let (mut first, second) = if near_first { (near, far) } else { (far, near) };
    first.merge(&second);
    first
}

#[test]
fn covering_triangle_fills_every_pixel() {
    let r = sized(backdrop());
    let stats = r.try_render().unwrap();
    assert_eq!(stats.polygons, 1);

    let img = r.render_result();
    assert_eq!((img.width, img.height), (SIZE, SIZE));
    assert_eq!(img.pixels.len(), SIZE * SIZE);
    let first = img.pixels[0];
    assert_ne!(first, DEFAULT_BACKGROUND);
    assert!(img.pixels.iter().all(|&p| p == first));
}

#[test]
fn nearer_polygon_hides_the_farther_one() {
    for near_first in [true, false] {
        let img = {
            let r = sized(overlapping_quads(near_first));
            assert!(r.render());
            r.render_result()
        };

        // overlap: only red shows
        let [red, _, blue] = channels(img.pixel(28, 33).unwrap());
        assert!(red > 0 && blue == 0, "near_first = {near_first}");

        // lower left of the red square: blue alone
        let [red, _, blue] = channels(img.pixel(19, SIZE - 1 - 26).unwrap());
        assert!(blue > 0 && red == 0, "near_first = {near_first}");

        assert_eq!(img.pixel(5, 5), Some(DEFAULT_BACKGROUND));
    }
}

#[test]
fn horizontal_side_adds_no_edge() {
    let r = sized(triangle([
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ]));
    let stats = r.try_render().unwrap();
    assert_eq!(stats.edges, 2);
    assert_ne!(r.render_result().pixel(32, 31), Some(DEFAULT_BACKGROUND));
}

#[test]
fn triangle_above_the_view_leaves_the_background() {
    let r = sized(triangle([
        Vec3::new(-1.0, 5.0, 0.0),
        Vec3::new(1.0, 5.0, 0.0),
        Vec3::new(0.0, 7.0, 0.0),
    ]));
    let stats = r.try_render().unwrap();
    assert_eq!(stats.edges, 0);
    assert_eq!(stats.off_screen, 1);
    assert!(is_background(&r.render_result()));
}

#[test]
fn only_the_front_of_a_cube_survives_culling() {
    let r = sized(MeshBuffers::cube(0.5));
    let stats = r.try_render().unwrap();
    assert_eq!(stats.triangles, 12);
    assert_eq!(stats.polygons, 2);
    assert_eq!(stats.back_faces, 10);

    r.set_flags(RasterFlags::TRUNCATE_TOP);
    let stats = r.try_render().unwrap();
    assert_eq!(stats.back_faces, 0);
}

#[test]
fn background_color_is_configurable() {
    let r = sized(triangle([
        Vec3::new(-1.0, 5.0, 0.0),
        Vec3::new(1.0, 5.0, 0.0),
        Vec3::new(0.0, 7.0, 0.0),
    ]));
    r.set_background(0xFF_203040);
    assert!(r.render());
    assert!(r.render_result().pixels.iter().all(|&p| p == 0xFF_203040));
}

#[test]
fn repeated_passes_are_identical() {
    let sphere = MeshBuffers::uv_sphere(0.8, 12, 18);
    let r = sized(sphere.clone());
    assert!(r.render());
    let first = r.render_result();
    assert!(r.render());
    assert_eq!(first, r.render_result());

    let other = sized(sphere);
    assert!(other.render());
    assert_eq!(first, other.render_result());
    assert!(!is_background(&first));
}

#[test]
fn camera_moves_change_the_image() {
    let r = sized(MeshBuffers::cube(0.5));
    assert!(r.render());
    let front = r.render_result();

    r.set_camera_pos(Vec3::new(1.5, 1.0, 1.5));
    let stats = r.try_render().unwrap();
    assert_eq!(stats.polygons, 6);
    assert_ne!(front, r.render_result());
}

#[test]
fn passes_fail_until_configured() {
    let r = ScanlineRenderer::default();
    assert_eq!(r.try_render(), Err(RenderError::NoBufferData));
    assert!(!r.render());
    assert!(r.render_result().is_empty());

    r.set_mesh(backdrop());
    assert_eq!(r.try_render(), Err(RenderError::WindowSizeUnset));
    r.set_window_size(0, 10);
    assert_eq!(r.try_render(), Err(RenderError::WindowSizeUnset));

    r.set_window_size(SIZE, SIZE);
    r.set_buffer_data(&[0.0; 9], &[0.0; 9], &[]);
    assert_eq!(r.try_render(), Err(RenderError::EmptyMesh));
    assert_eq!(r.state(), PassState::Idle);
}

#[test]
fn failed_pass_keeps_the_previous_image() {
    let r = sized(backdrop());
    assert!(r.render());
    let before = r.render_result();

    r.set_buffer_data(&[], &[], &[]);
    assert!(!r.render());
    assert_eq!(r.render_result(), before);
}

#[test]
fn resize_takes_effect_on_the_next_pass() {
    let r = sized(backdrop());
    assert!(r.render());
    r.set_window_size(8, 4);
    assert_eq!(r.render_result().width, SIZE);
    assert!(r.render());
    let img = r.render_result();
    assert_eq!((img.width, img.height, img.pixels.len()), (8, 4, 32));
}

#[test]
fn hook_sees_every_transition() {
    let r = sized(backdrop());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    r.set_pass_hook(move |s| sink.lock().unwrap().push(s));

    assert!(r.render());
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            PassState::Building,
            PassState::Sweeping,
            PassState::Done,
            PassState::Idle
        ]
    );

    r.clear_pass_hook();
    assert!(r.render());
    assert_eq!(seen.lock().unwrap().len(), 4);
}

#[test]
fn overlapping_render_is_rejected() {
    let r = Arc::new(sized(backdrop()));
    let entered = Arc::new(Barrier::new(2));
    let release = Arc::new(Barrier::new(2));
    let armed = Arc::new(AtomicBool::new(true));
    {
        let (entered, release, armed) = (entered.clone(), release.clone(), armed.clone());
        r.set_pass_hook(move |s| {
            if s == PassState::Sweeping && armed.swap(false, Ordering::SeqCst) {
                entered.wait();
                release.wait();
            }
        });
    }

    let worker = {
        let r = r.clone();
        thread::spawn(move || r.try_render())
    };

    entered.wait();
    assert_eq!(r.state(), PassState::Sweeping);
    assert_eq!(r.try_render(), Err(RenderError::Busy));
    assert!(!r.render());
    // setters stay usable; the running pass keeps its own snapshot
    r.set_window_size(8, 8);
    release.wait();

    assert!(worker.join().unwrap().is_ok());
    assert_eq!(r.state(), PassState::Idle);
    assert_eq!(r.render_result().width, SIZE);

    assert!(r.render());
    assert_eq!(r.render_result().width, 8);
}

#[test]
fn mesh_swapped_mid_pass_waits_for_the_next_pass() {
    let r = Arc::new(sized(backdrop()));
    let weak = Arc::downgrade(&r);
    let armed = Arc::new(AtomicBool::new(true));
    let flag = armed.clone();
    r.set_pass_hook(move |s| {
        if s == PassState::Building && flag.swap(false, Ordering::SeqCst) {
            if let Some(r) = weak.upgrade() {
                let off = triangle([
                    Vec3::new(-1.0, 5.0, 0.0),
                    Vec3::new(1.0, 5.0, 0.0),
                    Vec3::new(0.0, 7.0, 0.0),
                ]);
                r.set_buffer_data(&off.vertices, &off.normals, &off.indices);
            }
        }
    });

    assert!(r.render());
    assert!(!armed.load(Ordering::SeqCst));
    assert!(!is_background(&r.render_result()));

    assert!(r.render());
    assert!(is_background(&r.render_result()));
}

#[test]
fn present_loans_the_finished_pixels() {
    let r = sized(backdrop());
    let got = r.present(|px, w, h| (px.len(), w, h));
    assert_eq!(got, Some((SIZE * SIZE, SIZE, SIZE)));

    let empty = ScanlineRenderer::default();
    assert_eq!(empty.present(|px, _, _| px.len()), None);
}

#[test]
fn camera_can_be_replaced_wholesale() {
    let r = sized(backdrop());
    let cam = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 60f32.to_radians());
    r.set_camera(cam);
    assert_eq!(r.camera(), cam);
    assert!(r.render());
}
