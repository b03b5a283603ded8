//! Edge records and the row-bucketed edge table.
//!
//! An edge covers the rows `r` with `lower.y < r <= upper.y` and is sampled
//! on the line `y = r` (pixel centers sit on integer coordinates). Two edges
//! meeting at a vertex therefore never claim the same row twice.

use super::polygon::{Polygon, PolygonId};
use super::projection::ScreenPoint;

/// One non-horizontal triangle side, stepped one row at a time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub polygon: PolygonId,
    /// Row the edge enters the sweep on (after truncation to the screen).
    pub upper_row: usize,
    /// Rows still to cross, counting the current one. Never 0 while active.
    pub remaining_rows: u32,
    /// Crossing with the current row's sample line.
    pub x: f32,
    /// Screen depth at `(x, row)`.
    pub depth: f32,
    /// Change of `x` per row stepped *down*.
    pub slope_x: f32,
    /// Change of `depth` per row stepped down along the edge.
    pub depth_step: f32,
}

impl Edge {
    /// Move to the next row. Returns `false` once the edge is used up and
    /// must leave the active set.
    #[inline]
    pub fn advance(&mut self) -> bool {
        self.remaining_rows -= 1;
        if self.remaining_rows == 0 {
            return false;
        }
        self.x += self.slope_x;
        self.depth += self.depth_step;
        true
    }
}

/// Edges bucketed by the row on which they become active.
///
/// Buckets keep their allocation between passes.
#[derive(Default)]
pub struct EdgeTable {
    buckets: Vec<Vec<Edge>>,
    len: usize,
}

impl EdgeTable {
    /// Empty every bucket and size the table for `height` rows.
    pub fn reset(&mut self, height: usize) {
        for b in &mut self.buckets {
            b.clear();
        }
        self.buckets.resize_with(height, Vec::new);
        self.len = 0;
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of edges registered this pass.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Edges waiting in `row`'s bucket.
    pub fn bucket(&self, row: usize) -> &[Edge] {
        self.buckets.get(row).map_or(&[], Vec::as_slice)
    }

    /// Hand over the edges starting on `row`, in insertion order.
    pub fn drain_row(&mut self, row: usize) -> std::vec::Drain<'_, Edge> {
        self.buckets[row].drain(..)
    }

    /// Register the side `p`–`q` of `poly`. Returns `false` when the side
    /// crosses no visible row (horizontal, or entirely above / below the
    /// screen).
    pub fn add_edge(&mut self, poly: &Polygon, p: ScreenPoint, q: ScreenPoint) -> bool {
        let (upper, lower) = if p.y >= q.y { (p, q) } else { (q, p) };
        let top = upper.y.floor();
        let bottom = lower.y.floor();
        // Same row: contributes no crossing. Also catches y0 == y1.
        if top == bottom {
            return false;
        }

        let height = self.buckets.len() as f32;
        if upper.y < 0.0 || lower.y >= height - 1.0 {
            return false;
        }

        let slope_x = -(upper.x - lower.x) / (upper.y - lower.y);
        let depth_step = slope_x * poly.dz_dx - poly.dz_dy;

        // Slide from the vertex down to the first sample line it crosses.
        let mut row = top;
        let mut remaining = top - bottom;
        let mut x = upper.x + slope_x * (upper.y - top);
        let mut depth = poly.plane.depth_at(x, row);

        // Above the screen: step the start down to the top row.
        if row >= height {
            let skip = row - (height - 1.0);
            row -= skip;
            remaining -= skip;
            x += slope_x * skip;
            depth += depth_step * skip;
        }

        debug_assert!(remaining >= 1.0);
        let upper_row = row as usize;
        self.buckets[upper_row].push(Edge {
            polygon: poly.id,
            upper_row,
            remaining_rows: remaining as u32,
            x,
            depth,
            slope_x,
            depth_step,
        });
        self.len += 1;
        true
    }
}
