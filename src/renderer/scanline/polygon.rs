//! Polygon table construction.
//!
//! Every triangle that survives culling becomes one [`Polygon`] (plane,
//! shade, id) plus up to three [`Edge`](super::edge::Edge)s in the edge table.

use glam::Vec3;

use super::edge::EdgeTable;
use super::projection::{Projector, ScreenPoint};
use crate::{
    defs::RasterFlags,
    renderer::{RenderConfig, RenderStats, Rgba, shade},
    scene::{MeshBuffers, Triangle},
};

/// Dense per-pass polygon index; equals the polygon's slot in the table.
pub type PolygonId = u32;

/// Below this twice-area (in square pixels) a triangle is seen edge-on.
const MIN_SCREEN_AREA: f32 = 1e-6;

/// `a·x + b·y + c·z + d = 0` in screen space (`z` = depth).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

impl Plane {
    /// Plane through three screen-space points, from `(p0-p1) × (p0-p2)`.
    /// `None` if the points are collinear on screen (`c == 0`).
    pub fn through(p0: Vec3, p1: Vec3, p2: Vec3) -> Option<Self> {
        let n = (p0 - p1).cross(p0 - p2);
        if !n.is_finite() || !(n.z.abs() > MIN_SCREEN_AREA) {
            return None;
        }
        Some(Self {
            a: n.x,
            b: n.y,
            c: n.z,
            d: -n.dot(p0),
        })
    }

    #[inline]
    pub fn depth_at(&self, x: f32, y: f32) -> f32 {
        -(self.a * x + self.b * y + self.d) / self.c
    }

    #[inline]
    pub fn dz_dx(&self) -> f32 {
        -self.a / self.c
    }

    #[inline]
    pub fn dz_dy(&self) -> f32 {
        -self.b / self.c
    }
}

/// One projected, shaded triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Polygon {
    pub id: PolygonId,
    pub plane: Plane,
    /// Rows spanned: `ceil(max y) - floor(min y)`.
    pub cross_y: u32,
    pub color: Rgba,
    pub dz_dx: f32,
    pub dz_dy: f32,
}

impl Polygon {
    pub fn new(id: PolygonId, plane: Plane, cross_y: u32, color: Rgba) -> Self {
        Self {
            id,
            plane,
            cross_y,
            color,
            dz_dx: plane.dz_dx(),
            dz_dy: plane.dz_dy(),
        }
    }
}

/// Why a triangle did not make it into the polygon table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rejected {
    BackFace,
    OffScreen,
    Degenerate,
}

/// Turns mesh triangles into polygon/edge table entries for one pass.
pub struct PolygonBuilder<'a> {
    projector: &'a Projector,
    eye: Vec3,
    config: RenderConfig,
}

impl<'a> PolygonBuilder<'a> {
    pub fn new(projector: &'a Projector, eye: Vec3, config: RenderConfig) -> Self {
        Self {
            projector,
            eye,
            config,
        }
    }

    /// Walk every triangle in index order, appending to `polygons` and `edges`.
    pub fn build(
        &self,
        mesh: &MeshBuffers,
        polygons: &mut Vec<Polygon>,
        edges: &mut EdgeTable,
    ) -> RenderStats {
        let mut stats = RenderStats {
            triangles: mesh.triangle_count(),
            ..RenderStats::default()
        };
        if mesh.dangling_indices() != 0 {
            log::warn!(
                "index buffer length {} is not a multiple of 3; ignoring the tail",
                mesh.indices.len()
            );
        }

        for t in 0..mesh.triangle_count() {
            let Some(tri) = mesh.triangle(t) else {
                log::trace!("triangle {t}: index out of range");
                stats.bad_indices += 1;
                continue;
            };
            let id = polygons.len() as PolygonId;
            match self.polygon_for(&tri, id) {
                Ok((poly, [p0, p1, p2])) => {
                    for (p, q) in [(p0, p1), (p1, p2), (p2, p0)] {
                        if edges.add_edge(&poly, p, q) {
                            stats.edges += 1;
                        }
                    }
                    polygons.push(poly);
                }
                Err(why) => {
                    log::trace!("triangle {t}: {why:?}");
                    match why {
                        Rejected::BackFace => stats.back_faces += 1,
                        Rejected::OffScreen => stats.off_screen += 1,
                        Rejected::Degenerate => stats.degenerate += 1,
                    }
                }
            }
        }

        stats.polygons = polygons.len();
        stats
    }

    fn polygon_for(
        &self,
        tri: &Triangle,
        id: PolygonId,
    ) -> Result<(Polygon, [ScreenPoint; 3]), Rejected> {
        // 1. project; a vertex behind the eye drops the whole triangle
        let mut pts = [ScreenPoint {
            x: 0.0,
            y: 0.0,
            depth: 0.0,
        }; 3];
        for (dst, &p) in pts.iter_mut().zip(&tri.positions) {
            *dst = self.projector.project(p).ok_or(Rejected::OffScreen)?;
        }
        if pts.iter().any(|p| !p.to_vec3().is_finite()) {
            return Err(Rejected::Degenerate);
        }

        // 2. facing factor doubles as back-face test and shade
        let [n0, n1, n2] = tri.normals;
        let [v0, v1, v2] = tri.positions;
        let normal = (n0 + n1 + n2).normalize_or_zero();
        let to_eye = (self.eye - (v0 + v1 + v2) / 3.0).normalize_or_zero();
        let facing = normal.dot(to_eye);
        if facing <= 0.0 && self.config.flags.contains(RasterFlags::CULL_BACK_FACES) {
            return Err(Rejected::BackFace);
        }

        // 3. vertical extent against the visible rows
        let max_y = pts.iter().map(|p| p.y).fold(f32::MIN, f32::max).ceil();
        let min_y = pts.iter().map(|p| p.y).fold(f32::MAX, f32::min).floor();
        let height = self.projector.viewport().height as f32;
        if max_y < 0.0 || min_y >= height {
            return Err(Rejected::OffScreen);
        }
        if max_y >= height && !self.config.flags.contains(RasterFlags::TRUNCATE_TOP) {
            return Err(Rejected::OffScreen);
        }

        // 4. screen-space plane
        let plane = Plane::through(pts[0].to_vec3(), pts[1].to_vec3(), pts[2].to_vec3())
            .ok_or(Rejected::Degenerate)?;

        let color = shade(tri.tint.unwrap_or(self.config.default_tint), facing);
        let cross_y = (max_y - min_y).max(0.0) as u32;
        Ok((Polygon::new(id, plane, cross_y, color), pts))
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
