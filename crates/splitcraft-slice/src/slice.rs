//! Mesh slicing — intersect a triangle mesh with an arbitrary plane.

use rayon::prelude::*;
use splitcraft_math::{align_vectors, Dir3, Point3, Transform, Vec3};
use splitcraft_mesh::TriangleMesh;

use crate::error::{Result, SlicerError};

/// Build the rigid transform that maps world space into a plane-local frame:
/// translate by `-origin`, then rotate `normal` onto `+Z`. The composed
/// transform maps the plane itself onto the Z=0 plane.
pub fn plane_local_frame(origin: &Point3, normal: &Dir3) -> Transform {
    let z = Dir3::new_unchecked(Vec3::z());
    let rotation = align_vectors(normal, &z);
    let translation = Transform::translation(-origin.x, -origin.y, -origin.z);
    rotation.then(&translation)
}

/// Signed distance from `p` to the plane `(origin, normal)`.
fn signed_distance(p: &Point3, origin: &Point3, normal: &Vec3) -> f64 {
    (p - origin).dot(normal)
}

struct ClippedTriangle {
    /// The portion of the triangle on the `d >= 0` side, winding preserved.
    kept: Vec<Point3>,
    /// The new edge introduced by clipping, if the triangle straddled the plane.
    cut_edge: Option<(Point3, Point3)>,
}

/// Clip a single triangle against the half-space `(p - origin)Β·normal >= 0`.
fn clip_triangle(v: [Point3; 3], origin: &Point3, normal: &Vec3, eps: f64) -> ClippedTriangle {
    let d = [
        signed_distance(&v[0], origin, normal),
        signed_distance(&v[1], origin, normal),
        signed_distance(&v[2], origin, normal),
    ];

    if d.iter().all(|&x| x >= -eps) {
        return ClippedTriangle {
            kept: v.to_vec(),
            cut_edge: None,
        };
    }
    if d.iter().all(|&x| x <= eps) {
        return ClippedTriangle {
            kept: Vec::new(),
            cut_edge: None,
        };
    }

    let mut kept = Vec::with_capacity(4);
    let mut new_pts = Vec::with_capacity(2);
    for i in 0..3 {
        let cur = v[i];
        let next = v[(i + 1) % 3];
        let dc = d[i];
        let dn = d[(i + 1) % 3];

        if dc >= -eps {
            kept.push(cur);
        }
        if (dc > eps && dn < -eps) || (dc < -eps && dn > eps) {
            let t = dc / (dc - dn);
            let ip = cur + (next - cur) * t;
            kept.push(ip);
            new_pts.push(ip);
        }
    }

    let cut_edge = if new_pts.len() == 2 {
        Some((new_pts[0], new_pts[1]))
    } else {
        None
    };
    ClippedTriangle { kept, cut_edge }
}

/// Clip every triangle in `mesh` against the plane, in parallel — the
/// per-triangle clip is independent work, and this is the hot loop for
/// large meshes.
fn clip_all_triangles(
    mesh: &TriangleMesh,
    origin: &Point3,
    normal: &Vec3,
    eps: f64,
) -> Vec<ClippedTriangle> {
    (0..mesh.num_triangles())
        .into_par_iter()
        .map(|t| clip_triangle(mesh.triangle(t), origin, normal, eps))
        .collect()
}

/// Chain 3D segments lying on a common plane into closed loops, by
/// matching coincident endpoints. Generalizes the classic Z-height slicer's
/// segment chain to an arbitrary cutting plane.
fn chain_segments(segments: Vec<(Point3, Point3)>) -> Vec<Vec<Point3>> {
    let eps = 1e-6;
    let mut remaining = segments;
    let mut loops = Vec::new();

    while !remaining.is_empty() {
        let (start, end) = remaining.remove(0);
        let mut chain = vec![start, end];

        let mut changed = true;
        while changed {
            changed = false;
            let chain_start = *chain.first().unwrap();
            let chain_end = *chain.last().unwrap();

            let mut i = 0;
            while i < remaining.len() {
                let (a, b) = remaining[i];
                if (b - chain_end).norm() < eps {
                    chain.push(a);
                    remaining.remove(i);
                    changed = true;
                } else if (a - chain_end).norm() < eps {
                    chain.push(b);
                    remaining.remove(i);
                    changed = true;
                } else if (b - chain_start).norm() < eps {
                    chain.insert(0, a);
                    remaining.remove(i);
                    changed = true;
                } else if (a - chain_start).norm() < eps {
                    chain.insert(0, b);
                    remaining.remove(i);
                    changed = true;
                } else {
                    i += 1;
                }
            }
        }

        if chain.len() >= 3 {
            if (chain.first().unwrap() - chain.last().unwrap()).norm() < eps {
                chain.pop();
            }
            if chain.len() >= 3 {
                loops.push(chain);
            }
        }
    }

    loops
}

/// Fan-triangulate a closed planar loop, oriented so the resulting faces'
/// outward normal points in `-normal` (the cutting plane's reverse
/// direction, i.e. away from the kept half). Assumes the loop is simple (no
/// self-intersections); does not attempt to resolve holes between loops.
fn triangulate_cap_loop(loop_pts: &[Point3], frame: &Transform) -> TriangleMesh {
    // Signed area in the plane-local XY frame tells us which winding of
    // `loop_pts` yields a face normal along +Z_local (i.e. along `normal`,
    // the opposite of the cap's required outward direction).
    let local: Vec<Point3> = loop_pts.iter().map(|p| frame.apply_point(p)).collect();
    let mut area = 0.0;
    for i in 0..local.len() {
        let j = (i + 1) % local.len();
        area += local[i].x * local[j].y - local[j].x * local[i].y;
    }

    let ordered: Vec<Point3> = if area > 0.0 {
        loop_pts.iter().rev().copied().collect()
    } else {
        loop_pts.to_vec()
    };

    let mut vertices = Vec::with_capacity(ordered.len() * 3);
    for p in &ordered {
        vertices.push(p.x as f32);
        vertices.push(p.y as f32);
        vertices.push(p.z as f32);
    }
    let mut indices = Vec::with_capacity((ordered.len() - 2) * 3);
    for k in 1..ordered.len() - 1 {
        indices.push(0u32);
        indices.push(k as u32);
        indices.push((k + 1) as u32);
    }

    TriangleMesh::from_vertices_indices(vertices, indices)
}

/// Section `mesh` by the plane `(origin, normal)`, returning the
/// cross-section as closed loops of 3D points lying on the plane.
///
/// This is a true plane/mesh intersection over every triangle in `mesh`,
/// not a search for triangles that already lie flush on the plane — unlike
/// [`crate::cut_surface::extract_cut_surface`], it works on an uncut input
/// mesh where the plane generally passes through no existing vertex.
pub fn section(mesh: &TriangleMesh, origin: &Point3, normal: &Dir3) -> Vec<Vec<Point3>> {
    let normal_vec = normal.into_inner();
    let eps = 1e-9;
    let cut_segments = clip_all_triangles(mesh, origin, &normal_vec, eps)
        .into_iter()
        .filter_map(|c| c.cut_edge)
        .collect();
    chain_segments(cut_segments)
}

/// Split a mesh by a plane, keeping the side where `(p - origin)Β·normal >= 0`.
///
/// When `cap` is true, the planar hole left by the cut is retriangulated
/// and welded in, producing a watertight result. Calling with `normal` and
/// `-normal` produces the two complementary halves, whose volumes sum to
/// the input mesh's volume (within floating-point tolerance).
pub fn slice(
    mesh: &TriangleMesh,
    origin: &Point3,
    normal: &Dir3,
    cap: bool,
) -> Result<TriangleMesh> {
    if mesh.num_triangles() == 0 {
        return Err(SlicerError::EmptyMesh);
    }
    if normal.norm() < 1e-12 {
        return Err(SlicerError::DegeneratePlane("zero-length normal".into()));
    }

    let normal_vec = normal.into_inner();
    let eps = 1e-9;

    let mut out_vertices: Vec<f32> = Vec::new();
    let mut out_indices: Vec<u32> = Vec::new();
    let mut cut_segments = Vec::new();

    for clipped in clip_all_triangles(mesh, origin, &normal_vec, eps) {
        if let Some(seg) = clipped.cut_edge {
            cut_segments.push(seg);
        }
        if clipped.kept.len() >= 3 {
            let base = (out_vertices.len() / 3) as u32;
            for p in &clipped.kept {
                out_vertices.push(p.x as f32);
                out_vertices.push(p.y as f32);
                out_vertices.push(p.z as f32);
            }
            for k in 1..clipped.kept.len() - 1 {
                out_indices.push(base);
                out_indices.push(base + k as u32);
                out_indices.push(base + k as u32 + 1);
            }
        }
    }

    let mut result = TriangleMesh::from_vertices_indices(out_vertices, out_indices);

    if cap && !cut_segments.is_empty() {
        let frame = plane_local_frame(origin, normal);
        for loop_pts in chain_segments(cut_segments) {
            let cap_mesh = triangulate_cap_loop(&loop_pts, &frame);
            result.merge(&cap_mesh);
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_slice_halves_conserve_volume() {
        let cube = unit_cube();
        let origin = Point3::new(0.5, 0.5, 0.5);
        let normal = Dir3::new_normalize(Vec3::z());
        let a = slice(&cube, &origin, &normal, true).unwrap();
        let b = slice(&cube, &origin, &Dir3::new_normalize(-Vec3::z()), true).unwrap();
        assert!((a.volume() + b.volume() - cube.volume()).abs() < 1e-6);
    }

    #[test]
    fn test_slice_oblique_plane_conserves_volume() {
        let cube = unit_cube();
        let origin = Point3::new(0.5, 0.5, 0.5);
        let normal = Dir3::new_normalize(Vec3::new(1.0, 1.0, 0.3));
        let a = slice(&cube, &origin, &normal, true).unwrap();
        let b = slice(
            &cube,
            &origin,
            &Dir3::new_normalize(-normal.into_inner()),
            true,
        )
        .unwrap();
        assert!((a.volume() + b.volume() - cube.volume()).abs() < 1e-4);
    }

    #[test]
    fn test_section_of_uncut_mesh_finds_cross_section() {
        let cube = unit_cube();
        // Midplane passes through no existing vertex of a unit cube.
        let origin = Point3::new(0.5, 0.5, 0.5);
        let normal = Dir3::new_normalize(Vec3::x());
        let loops = section(&cube, &origin, &normal);
        assert_eq!(loops.len(), 1);
        // Each of the 4 side faces contributes 2 collinear segments (one per
        // triangle straddling the midplane), so the closed loop has 8 points,
        // not just the 4 face corners.
        assert_eq!(loops[0].len(), 8);
        assert!(loops[0].iter().all(|p| (p.x - 0.5).abs() < 1e-9));
        let ys: Vec<f64> = loops[0].iter().map(|p| p.y).collect();
        let zs: Vec<f64> = loops[0].iter().map(|p| p.z).collect();
        assert!(ys.iter().all(|&y| (0.0..=1.0).contains(&y)));
        assert!(zs.iter().all(|&z| (0.0..=1.0).contains(&z)));
    }

    #[test]
    fn test_slice_empty_mesh_errors() {
        let empty = TriangleMesh::new();
        let origin = Point3::origin();
        let normal = Dir3::new_normalize(Vec3::z());
        assert!(slice(&empty, &origin, &normal, true).is_err());
    }
}
