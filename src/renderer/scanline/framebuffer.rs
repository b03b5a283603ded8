//! Flat color buffer the sweep writes into.
//!
//! Row 0 is the **bottom** scanline (the sweep's y axis points up); the
//! published [`Image`] has row 0 at the top, so `flip_into` inverts rows.
//! Clearing and flipping touch independent rows and run in parallel when
//! the `multithreading` feature is on.

#[cfg(feature = "multithreading")]
use rayon::prelude::*;

use crate::renderer::{Image, Rgba};

#[derive(Default)]
pub struct Framebuffer {
    pixels: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl Framebuffer {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// (Re)allocate for `w × h` and fill with `background`.
    pub fn resize_and_clear(&mut self, w: usize, h: usize, background: Rgba) {
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.pixels.resize(w * h, background);
        }
        if self.pixels.is_empty() {
            return;
        }

        #[cfg(feature = "multithreading")]
        self.pixels
            .par_chunks_mut(self.width)
            .for_each(|row| row.fill(background));

        #[cfg(not(feature = "multithreading"))]
        self.pixels.fill(background);
    }

    /// Pixels of scanline `row` (0 = bottom).
    pub fn row(&self, row: usize) -> &[Rgba] {
        &self.pixels[row * self.width..(row + 1) * self.width]
    }

    /// Fill the pixels whose centers lie in `[x0, x1)` on `row`, clipped to
    /// the buffer.
    pub fn draw_span(&mut self, x0: f32, x1: f32, row: usize, color: Rgba) {
        if row >= self.height {
            return;
        }
        let start = x0.ceil().max(0.0);
        let end = x1.ceil().min(self.width as f32);
        // also rejects NaN
        if !(start < end) {
            return;
        }
        let base = row * self.width;
        self.pixels[base + start as usize..base + end as usize].fill(color);
    }

    /// Copy into `out` top row first.
    pub fn flip_into(&self, out: &mut Image) {
        let (w, h) = (self.width, self.height);
        out.width = w;
        out.height = h;
        out.pixels.resize(w * h, 0);
        if out.pixels.is_empty() {
            return;
        }

        let copy_row = |(i, dst): (usize, &mut [Rgba])| {
            let src = h - 1 - i;
            dst.copy_from_slice(&self.pixels[src * w..(src + 1) * w]);
        };

        #[cfg(feature = "multithreading")]
        out.pixels.par_chunks_mut(w).enumerate().for_each(copy_row);

        #[cfg(not(feature = "multithreading"))]
        out.pixels.chunks_mut(w).enumerate().for_each(copy_row);
    }
}
