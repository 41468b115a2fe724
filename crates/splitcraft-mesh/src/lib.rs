#![warn(missing_docs)]

//! Triangle mesh primitives and transforms.
//!
//! A [`TriangleMesh`] is a flat, value-like representation of a closed
//! surface: vertex positions, triangle indices, and per-vertex normals.
//! Operations here never alias an input's arrays — every transform,
//! submesh extraction, or concatenation returns a new mesh.

pub mod stl;

use splitcraft_math::{Axis, Point3, Transform, Vec3};

/// Output triangle mesh: vertex buffer, triangle indices, and normals.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]` (f32).
    pub vertices: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]` (u32).
    pub indices: Vec<u32>,
    /// Flat array of vertex normals: `[nx0, ny0, nz0, ...]` (f32). Same length as vertices.
    pub normals: Vec<f32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            normals: Vec::new(),
        }
    }

    /// Build a mesh from vertex positions and triangle indices, computing
    /// per-vertex normals by averaging adjacent face normals.
    pub fn from_vertices_indices(vertices: Vec<f32>, indices: Vec<u32>) -> Self {
        let mut mesh = Self {
            normals: vec![0.0; vertices.len()],
            vertices,
            indices,
        };
        mesh.recompute_normals();
        mesh
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// The position of vertex `i`.
    pub fn vertex(&self, i: usize) -> Point3 {
        Point3::new(
            self.vertices[i * 3] as f64,
            self.vertices[i * 3 + 1] as f64,
            self.vertices[i * 3 + 2] as f64,
        )
    }

    /// The three vertex positions of triangle `t`.
    pub fn triangle(&self, t: usize) -> [Point3; 3] {
        let base = t * 3;
        [
            self.vertex(self.indices[base] as usize),
            self.vertex(self.indices[base + 1] as usize),
            self.vertex(self.indices[base + 2] as usize),
        ]
    }

    /// Merge another mesh into this one (disjoint union, indices rebased).
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.num_vertices() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Concatenate several meshes into one (disjoint union with index rebase).
    pub fn concatenate(meshes: &[TriangleMesh]) -> TriangleMesh {
        let mut out = TriangleMesh::new();
        for m in meshes {
            out.merge(m);
        }
        out
    }

    /// Axis-aligned bounding box as `(min, max)`. Returns `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Point3, Point3)> {
        if self.num_vertices() == 0 {
            return None;
        }
        let mut min = self.vertex(0);
        let mut max = min;
        for i in 1..self.num_vertices() {
            let v = self.vertex(i);
            min = Point3::new(min.x.min(v.x), min.y.min(v.y), min.z.min(v.z));
            max = Point3::new(max.x.max(v.x), max.y.max(v.y), max.z.max(v.z));
        }
        Some((min, max))
    }

    /// Extents of the bounding box: `max - min` along each axis.
    pub fn extents(&self) -> Option<Vec3> {
        self.bounds().map(|(min, max)| max - min)
    }

    /// Axis with the largest extent.
    pub fn longest_axis(&self) -> Option<Axis> {
        self.extents().map(|e| Axis::argmax(e.x, e.y, e.z))
    }

    /// Centroid of the vertex set (arithmetic mean of vertex positions).
    pub fn centroid(&self) -> Option<Point3> {
        let n = self.num_vertices();
        if n == 0 {
            return None;
        }
        let mut sum = Vec3::zeros();
        for i in 0..n {
            sum += self.vertex(i).coords;
        }
        Some(Point3::from(sum / n as f64))
    }

    /// Signed volume of the mesh via the divergence (signed tetrahedron) theorem.
    ///
    /// Valid for a closed, consistently-wound mesh; negative if the winding
    /// is inverted.
    pub fn volume(&self) -> f64 {
        let mut total = 0.0;
        for t in 0..self.num_triangles() {
            let [a, b, c] = self.triangle(t);
            total += a.coords.dot(&b.coords.cross(&c.coords)) / 6.0;
        }
        total
    }

    /// Apply an affine transform to every vertex and normal, returning a new mesh.
    pub fn transformed(&self, t: &Transform) -> TriangleMesh {
        let mut vertices = Vec::with_capacity(self.vertices.len());
        for i in 0..self.num_vertices() {
            let p = t.apply_point(&self.vertex(i));
            vertices.push(p.x as f32);
            vertices.push(p.y as f32);
            vertices.push(p.z as f32);
        }
        let mut normals = Vec::with_capacity(self.normals.len());
        for i in 0..self.num_vertices() {
            let n = Vec3::new(
                self.normals[i * 3] as f64,
                self.normals[i * 3 + 1] as f64,
                self.normals[i * 3 + 2] as f64,
            );
            let n = t.apply_normal(&n).normalize();
            normals.push(n.x as f32);
            normals.push(n.y as f32);
            normals.push(n.z as f32);
        }
        TriangleMesh {
            vertices,
            indices: self.indices.clone(),
            normals,
        }
    }

    /// Translate every vertex by `delta`, returning a new mesh.
    pub fn translated(&self, delta: &Vec3) -> TriangleMesh {
        self.transformed(&Transform::translation(delta.x, delta.y, delta.z))
    }

    /// Extract the sub-mesh formed by a set of face (triangle) indices.
    ///
    /// Vertices are deduplicated and renumbered so the result only
    /// references the vertices it actually uses.
    pub fn submesh_by_face_indices(&self, faces: &[usize]) -> TriangleMesh {
        let mut remap = std::collections::HashMap::new();
        let mut vertices = Vec::new();
        let mut normals = Vec::new();
        let mut indices = Vec::new();

        for &f in faces {
            let base = f * 3;
            for k in 0..3 {
                let old = self.indices[base + k] as usize;
                let new_idx = *remap.entry(old).or_insert_with(|| {
                    let idx = (vertices.len() / 3) as u32;
                    vertices.push(self.vertices[old * 3]);
                    vertices.push(self.vertices[old * 3 + 1]);
                    vertices.push(self.vertices[old * 3 + 2]);
                    normals.push(self.normals[old * 3]);
                    normals.push(self.normals[old * 3 + 1]);
                    normals.push(self.normals[old * 3 + 2]);
                    idx
                });
                indices.push(new_idx);
            }
        }

        TriangleMesh {
            vertices,
            indices,
            normals,
        }
    }

    /// Recompute per-vertex normals by averaging adjacent face normals.
    pub fn recompute_normals(&mut self) {
        let mut accum = vec![0.0f64; self.vertices.len()];
        for t in 0..self.num_triangles() {
            let [a, b, c] = self.triangle(t);
            let n = (b - a).cross(&(c - a));
            let base = t * 3;
            for k in 0..3 {
                let vi = self.indices[base + k] as usize;
                accum[vi * 3] += n.x;
                accum[vi * 3 + 1] += n.y;
                accum[vi * 3 + 2] += n.z;
            }
        }
        self.normals = vec![0.0; self.vertices.len()];
        for i in 0..self.num_vertices() {
            let n = Vec3::new(accum[i * 3], accum[i * 3 + 1], accum[i * 3 + 2]);
            let norm = n.norm();
            let n = if norm > 1e-12 { n / norm } else { n };
            self.normals[i * 3] = n.x as f32;
            self.normals[i * 3 + 1] = n.y as f32;
            self.normals[i * 3 + 2] = n.z as f32;
        }
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}
