//! Per-row span resolution.
//!
//! Walking the x-sorted crossings left to right, every edge toggles its
//! polygon in or out of the "inside" set (even-odd rule). The run between
//! two neighbouring crossings takes the color of the nearest polygon in the
//! set, judged once at the run's midpoint.

use smallvec::SmallVec;

use super::edge::Edge;
use super::framebuffer::Framebuffer;
use super::polygon::{Polygon, PolygonId};
use crate::renderer::Rgba;

/// A polygon we are currently inside, with the depth its entering edge
/// carried so the depth anywhere on this row is one multiply-add away.
#[derive(Clone, Copy, Debug)]
struct Inside {
    polygon: PolygonId,
    x: f32,
    depth: f32,
}

impl Inside {
    #[inline]
    fn depth_at(&self, x: f32, polygons: &[Polygon]) -> f32 {
        self.depth + (x - self.x) * polygons[self.polygon as usize].dz_dx
    }
}

#[derive(Default)]
pub struct SpanResolver {
    /// Presence flag per polygon id.
    present: Vec<bool>,
    /// Polygons we are inside, in the order we entered them.
    inside: SmallVec<[Inside; 8]>,
}

impl SpanResolver {
    /// Size the presence table for a new pass.
    pub fn reset(&mut self, polygon_count: usize) {
        self.present.clear();
        self.present.resize(polygon_count, false);
        self.inside.clear();
    }

    /// Fill row `row` of `fb` from the sorted crossings in `edges`.
    pub fn resolve_row(
        &mut self,
        row: usize,
        edges: &[Edge],
        polygons: &[Polygon],
        fb: &mut Framebuffer,
    ) {
        for (i, e) in edges.iter().enumerate() {
            self.toggle(e);
            let Some(next) = edges.get(i + 1) else {
                break;
            };
            if next.x <= e.x {
                continue;
            }
            if let Some(color) = self.pick(e.x, next.x, polygons) {
                fb.draw_span(e.x, next.x, row, color);
            }
        }

        // A balanced row leaves nothing behind; never leak into the next one.
        for s in self.inside.drain(..) {
            self.present[s.polygon as usize] = false;
        }
    }

    fn toggle(&mut self, e: &Edge) {
        let slot = &mut self.present[e.polygon as usize];
        if *slot {
            *slot = false;
            if let Some(pos) = self.inside.iter().position(|s| s.polygon == e.polygon) {
                self.inside.remove(pos);
            }
        } else {
            *slot = true;
            self.inside.push(Inside {
                polygon: e.polygon,
                x: e.x,
                depth: e.depth,
            });
        }
    }

    /// Color of the run `[x0, x1)`, or `None` for background.
    fn pick(&self, x0: f32, x1: f32, polygons: &[Polygon]) -> Option<Rgba> {
        match self.inside.as_slice() {
            [] => None,
            [only] => Some(polygons[only.polygon as usize].color),
            [first, rest @ ..] => {
                let mid = 0.5 * (x0 + x1);
                let mut best = first;
                let mut best_z = first.depth_at(mid, polygons);
                for cand in rest {
                    let z = cand.depth_at(mid, polygons);
                    // strict: on a tie the earlier entry stays
                    if z < best_z {
                        best = cand;
                        best_z = z;
                    }
                }
                Some(polygons[best.polygon as usize].color)
            }
        }
    }
}
