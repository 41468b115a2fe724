//! STL (binary or ASCII) mesh load and save.
//!
//! STL has no concept of a multi-object scene, so loading "degrades" to
//! reading one watertight mesh; the `stl_io` crate handles both binary and
//! ASCII transparently. The writer always emits binary STL.

use crate::TriangleMesh;
use std::io::{Read, Seek, Write};
use std::path::Path;
use thiserror::Error;

/// Errors from STL I/O.
#[derive(Debug, Error)]
pub enum StlError {
    /// Underlying file or stream I/O failed.
    #[error("stl i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// The mesh has no triangles after loading.
    #[error("loaded mesh is empty")]
    EmptyMesh,
}

/// Result alias for STL operations.
pub type Result<T> = std::result::Result<T, StlError>;

/// Load a mesh from an STL reader (binary or ASCII).
///
/// If the mesh is not watertight, a best-effort hole-fill repair is
/// attempted; loading proceeds even if repair does not fully succeed
/// (callers are expected to log a warning in that case, not treat it
/// as fatal).
pub fn load<R: Read + Seek>(reader: &mut R) -> Result<TriangleMesh> {
    let raw = stl_io::read_stl(reader)?;
    if raw.faces.is_empty() {
        return Err(StlError::EmptyMesh);
    }

    let mut vertices = Vec::with_capacity(raw.vertices.len() * 3);
    for v in &raw.vertices {
        vertices.push(v[0]);
        vertices.push(v[1]);
        vertices.push(v[2]);
    }

    let mut indices = Vec::with_capacity(raw.faces.len() * 3);
    for f in &raw.faces {
        indices.push(f.vertices[0] as u32);
        indices.push(f.vertices[1] as u32);
        indices.push(f.vertices[2] as u32);
    }

    let mut mesh = TriangleMesh::from_vertices_indices(vertices, indices);
    if !is_watertight(&mesh) {
        fill_holes(&mut mesh);
    }
    Ok(mesh)
}

/// Load a mesh from an STL file path.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let mut f = std::fs::File::open(path)?;
    load(&mut f)
}

/// Write a mesh as binary STL.
pub fn save<W: Write>(writer: &mut W, mesh: &TriangleMesh) -> Result<()> {
    let triangles = (0..mesh.num_triangles()).map(|t| {
        let [a, b, c] = mesh.triangle(t);
        let normal = (b - a).cross(&(c - a)).normalize();
        stl_io::Triangle {
            normal: stl_io::Normal::new([normal.x as f32, normal.y as f32, normal.z as f32]),
            vertices: [
                stl_io::Vertex::new([a.x as f32, a.y as f32, a.z as f32]),
                stl_io::Vertex::new([b.x as f32, b.y as f32, b.z as f32]),
                stl_io::Vertex::new([c.x as f32, c.y as f32, c.z as f32]),
            ],
        }
    });
    stl_io::write_stl(writer, triangles)?;
    Ok(())
}

/// Write a mesh as binary STL to a file path.
pub fn save_file<P: AsRef<Path>>(path: P, mesh: &TriangleMesh) -> Result<()> {
    let mut f = std::fs::File::create(path)?;
    save(&mut f, mesh)
}

/// Check whether every edge of the mesh is shared by exactly two triangles.
fn is_watertight(mesh: &TriangleMesh) -> bool {
    use std::collections::HashMap;
    let mut edge_count: HashMap<(u32, u32), u32> = HashMap::new();
    for t in 0..mesh.num_triangles() {
        let base = t * 3;
        let tri = [
            mesh.indices[base],
            mesh.indices[base + 1],
            mesh.indices[base + 2],
        ];
        for k in 0..3 {
            let a = tri[k];
            let b = tri[(k + 1) % 3];
            let key = if a < b { (a, b) } else { (b, a) };
            *edge_count.entry(key).or_insert(0) += 1;
        }
    }
    edge_count.values().all(|&c| c == 2)
}

/// Best-effort hole fill: triangle-fan-close any boundary loop (an edge
/// used by exactly one triangle) found in the mesh. Degrades gracefully —
/// if a loop can't be closed cleanly it is left as-is.
fn fill_holes(mesh: &mut TriangleMesh) {
    use std::collections::HashMap;

    let mut boundary: HashMap<u32, u32> = HashMap::new();
    for t in 0..mesh.num_triangles() {
        let base = t * 3;
        let tri = [
            mesh.indices[base],
            mesh.indices[base + 1],
            mesh.indices[base + 2],
        ];
        for k in 0..3 {
            let a = tri[k];
            let b = tri[(k + 1) % 3];
            if boundary.remove(&b).is_some() {
                // edge b->a already seen in the opposite direction: interior edge
            } else {
                boundary.insert(a, b);
            }
        }
    }

    while let Some((&start, _)) = boundary.iter().next() {
        let mut loop_verts = vec![start];
        let mut current = start;
        loop {
            match boundary.remove(&current) {
                Some(next) if next != start => {
                    loop_verts.push(next);
                    current = next;
                }
                Some(_) => break,
                None => break,
            }
        }
        if loop_verts.len() >= 3 {
            let anchor = loop_verts[0];
            for w in loop_verts[1..].windows(2) {
                mesh.indices.push(anchor);
                mesh.indices.push(w[0]);
                mesh.indices.push(w[1]);
            }
        }
    }
    mesh.recompute_normals();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn unit_cube() -> TriangleMesh {
        #[rustfmt::skip]
        let vertices: Vec<f32> = vec![
            0.0, 0.0, 0.0,  1.0, 0.0, 0.0,  1.0, 1.0, 0.0,  0.0, 1.0, 0.0,
            0.0, 0.0, 1.0,  1.0, 0.0, 1.0,  1.0, 1.0, 1.0,  0.0, 1.0, 1.0,
        ];
        #[rustfmt::skip]
        let indices: Vec<u32> = vec![
            0, 2, 1,  0, 3, 2,
            4, 5, 6,  4, 6, 7,
            0, 5, 4,  0, 1, 5,
            1, 6, 5,  1, 2, 6,
            2, 7, 6,  2, 3, 7,
            3, 4, 7,  3, 0, 4,
        ];
        TriangleMesh::from_vertices_indices(vertices, indices)
    }

    #[test]
    fn test_round_trip_binary_stl() {
        let cube = unit_cube();
        let mut buf = Vec::new();
        save(&mut buf, &cube).unwrap();
        let mut cursor = Cursor::new(buf);
        let loaded = load(&mut cursor).unwrap();
        assert_eq!(loaded.num_triangles(), cube.num_triangles());
        assert!((loaded.volume() - cube.volume()).abs() < 1e-4);
    }

    #[test]
    fn test_watertight_cube_not_modified() {
        let cube = unit_cube();
        assert!(is_watertight(&cube));
    }
}
