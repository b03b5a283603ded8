//! Owned flat-buffer mesh snapshot.
//!
//! Layout matches what a model loader hands over: positions and normals as
//! packed `xyz` floats, triangles as index triples into both.
//! The generators below stand in for a loader in the viewer and in tests.

use glam::Vec3;

use crate::renderer::Rgba;

/// One triangle pulled out of the buffers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub positions: [Vec3; 3],
    pub normals: [Vec3; 3],
    pub tint: Option<Rgba>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
    /// Optional base color per triangle (`indices.len() / 3` entries).
    pub tints: Option<Vec<Rgba>>,
}

impl MeshBuffers {
    /// Copy the caller's slices into an owned snapshot.
    pub fn from_slices(vertices: &[f32], normals: &[f32], indices: &[u32]) -> Self {
        Self {
            vertices: vertices.to_vec(),
            normals: normals.to_vec(),
            indices: indices.to_vec(),
            tints: None,
        }
    }

    /// Number of complete index triples.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Leftover indices that do not form a full triangle.
    #[inline]
    pub fn dangling_indices(&self) -> usize {
        self.indices.len() % 3
    }

    /// Triangle `t`, or `None` if any of its indices is out of range.
    pub fn triangle(&self, t: usize) -> Option<Triangle> {
        let idx = self.indices.get(t * 3..t * 3 + 3)?;
        let mut positions = [Vec3::ZERO; 3];
        let mut normals = [Vec3::ZERO; 3];
        for (k, &i) in idx.iter().enumerate() {
            positions[k] = Self::fetch(&self.vertices, i)?;
            normals[k] = Self::fetch(&self.normals, i)?;
        }
        let tint = self.tints.as_ref().and_then(|t_buf| t_buf.get(t).copied());
        Some(Triangle {
            positions,
            normals,
            tint,
        })
    }

    #[inline]
    fn fetch(buf: &[f32], i: u32) -> Option<Vec3> {
        let base = i as usize * 3;
        let xyz = buf.get(base..base + 3)?;
        Some(Vec3::new(xyz[0], xyz[1], xyz[2]))
    }

    /*──────────────────────── construction ─────────────────────────*/

    /// Append a vertex, return its index.
    pub fn push_vertex(&mut self, pos: Vec3, normal: Vec3) -> u32 {
        let idx = (self.vertices.len() / 3) as u32;
        self.vertices.extend_from_slice(&pos.to_array());
        self.normals.extend_from_slice(&normal.to_array());
        idx
    }

    /// Append a triangle; the tint buffer is created on first use.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32, tint: Option<Rgba>) {
        if let Some(col) = tint {
            let before = self.triangle_count();
            let tints = self.tints.get_or_insert_with(Vec::new);
            // Earlier untinted triangles keep the white default.
            tints.resize(before, crate::defs::DEFAULT_TINT);
            tints.push(col);
        } else if let Some(tints) = self.tints.as_mut() {
            tints.push(crate::defs::DEFAULT_TINT);
        }
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Append all of `other`, re-basing its indices.
    pub fn merge(&mut self, other: &MeshBuffers) {
        let base = (self.vertices.len() / 3) as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        for t in 0..other.triangle_count() {
            let i = &other.indices[t * 3..t * 3 + 3];
            let tint = other.tints.as_ref().and_then(|v| v.get(t).copied());
            self.push_triangle(i[0] + base, i[1] + base, i[2] + base, tint);
        }
    }

    /*──────────────────────── generators ───────────────────────────*/

    /// Axis-aligned square in the plane `z = center.z`, facing +Z.
    pub fn quad(center: Vec3, half: f32, tint: Option<Rgba>) -> Self {
        let mut m = Self::default();
        let n = Vec3::Z;
        let a = m.push_vertex(center + Vec3::new(-half, -half, 0.0), n);
        let b = m.push_vertex(center + Vec3::new(half, -half, 0.0), n);
        let c = m.push_vertex(center + Vec3::new(half, half, 0.0), n);
        let d = m.push_vertex(center + Vec3::new(-half, half, 0.0), n);
        m.push_triangle(a, b, c, tint);
        m.push_triangle(a, c, d, tint);
        m
    }

    /// Cube of half-extent `half` centred on the origin, flat normals.
    pub fn cube(half: f32) -> Self {
        let mut m = Self::default();
        // (normal, u axis, v axis) with u × v = normal
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        for (n, u, v) in faces {
            let c = n * half;
            let a = m.push_vertex(c - u * half - v * half, n);
            let b = m.push_vertex(c + u * half - v * half, n);
            let d = m.push_vertex(c + u * half + v * half, n);
            let e = m.push_vertex(c - u * half + v * half, n);
            m.push_triangle(a, b, d, None);
            m.push_triangle(a, d, e, None);
        }
        m
    }

    /// Latitude/longitude sphere with smooth normals.
    pub fn uv_sphere(radius: f32, stacks: u32, slices: u32) -> Self {
        use std::f32::consts::{PI, TAU};

        let stacks = stacks.max(2);
        let slices = slices.max(3);
        let mut m = Self::default();
        for i in 0..=stacks {
            let phi = PI * i as f32 / stacks as f32;
            for j in 0..=slices {
                let theta = TAU * j as f32 / slices as f32;
                let n = Vec3::new(phi.sin() * theta.cos(), phi.cos(), -phi.sin() * theta.sin());
                m.push_vertex(n * radius, n);
            }
        }
        let row = slices + 1;
        for i in 0..stacks {
            for j in 0..slices {
                let a = i * row + j;
                let b = a + row;
                // counter-clockwise seen from outside
                if i != 0 {
                    m.push_triangle(a, b, a + 1, None);
                }
                if i != stacks - 1 {
                    m.push_triangle(a + 1, b, b + 1, None);
                }
            }
        }
        m
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
