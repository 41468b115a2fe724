#![warn(missing_docs)]

//! Cap-anchored boolean compositor.
//!
//! Every pin or hole-cutter this system composes is a solid of revolution
//! whose widest ring sits exactly on the cutting plane, inside the cap
//! polygon left by [`splitcraft_slice::slice`]. Instead of a general
//! BSP/exact-arithmetic mesh CSG, the compositor exploits that anchoring:
//! it re-triangulates the cap polygon with the tool's footprint circle
//! carved out (a constrained Delaunay triangulation, the same technique
//! used to cut a circular hole in a flat face), then welds the tool's
//! wall onto the new boundary loop.
//!
//! When the anchoring assumption doesn't hold — the footprint isn't fully
//! inside the cap, or the carve degenerates — this falls back to the
//! documented failure policy rather than guessing.

use geo::{Contains, Point as GeoPoint};
use spade::{ConstrainedDelaunayTriangulation, Point2 as SpadePoint2, Triangulation};
use splitcraft_math::{Dir3, Point3};
use splitcraft_mesh::TriangleMesh;
use splitcraft_slice::{extract_cut_surface, CAP_TOLERANCE};

/// A pin or hole-cutter solid anchored at a point on a shared cutting plane.
pub struct AnchoredTool {
    /// The complete closed solid, in world space — used only for the
    /// concatenation fallback.
    pub full: TriangleMesh,
    /// The wall and top cap only (no bottom fan), in world space — welded
    /// directly onto the carved cap boundary on success.
    pub shell: TriangleMesh,
    /// World-space point on the cutting plane at the center of the tool's
    /// widest ring.
    pub footprint_center: Point3,
    /// Radius of that ring.
    pub footprint_radius: f64,
}

/// The result of a boolean composite: either the exact carved/welded mesh,
/// or a documented fallback with the reason a caller should log.
pub enum CompositeOutcome {
    /// The cap-anchored carve/weld succeeded.
    Composited(TriangleMesh),
    /// The anchoring assumption didn't hold; this is the documented
    /// fallback result instead.
    Fallback {
        /// The fallback mesh (concatenation for union, unchanged minuend for difference).
        mesh: TriangleMesh,
        /// Why the exact composite wasn't used.
        reason: String,
    },
}

impl CompositeOutcome {
    /// The resulting mesh, whichever path produced it.
    pub fn into_mesh(self) -> TriangleMesh {
        match self {
            CompositeOutcome::Composited(m) => m,
            CompositeOutcome::Fallback { mesh, .. } => mesh,
        }
    }
}

/// Union `tools` into `mesh`, anchored at the cutting plane `(origin, normal)`.
///
/// On success, welds each tool's wall onto the cap carved to fit its
/// footprint. On failure, falls back to non-manifold concatenation.
pub fn union(
    mesh: &TriangleMesh,
    origin: &Point3,
    normal: &Dir3,
    tools: &[AnchoredTool],
) -> CompositeOutcome {
    match carve_and_weld(mesh, origin, normal, tools, false) {
        Some(result) => CompositeOutcome::Composited(result),
        None => {
            let mut fallback = mesh.clone();
            for tool in tools {
                fallback.merge(&tool.full);
            }
            CompositeOutcome::Fallback {
                mesh: fallback,
                reason: "cap-anchored carve failed; concatenated tool solids instead".into(),
            }
        }
    }
}

/// Subtract `tools` from `mesh`, anchored at the cutting plane `(origin, normal)`.
///
/// On success, carves each tool's footprint out of the cap and welds the
/// tool's wall in with reversed winding, so it faces into the new cavity.
/// On failure, returns `mesh` unchanged.
pub fn difference(
    mesh: &TriangleMesh,
    origin: &Point3,
    normal: &Dir3,
    tools: &[AnchoredTool],
) -> CompositeOutcome {
    match carve_and_weld(mesh, origin, normal, tools, true) {
        Some(result) => CompositeOutcome::Composited(result),
        None => CompositeOutcome::Fallback {
            mesh: mesh.clone(),
            reason: "cap-anchored carve failed; left minuend unchanged".into(),
        },
    }
}

fn carve_and_weld(
    mesh: &TriangleMesh,
    origin: &Point3,
    normal: &Dir3,
    tools: &[AnchoredTool],
    invert: bool,
) -> Option<TriangleMesh> {
    if tools.is_empty() {
        return Some(mesh.clone());
    }

    let cap = extract_cut_surface(mesh, origin, normal)?;
    let to_local = cap.to_world.inverse()?;

    let local_circles: Vec<(f64, f64, f64)> = tools
        .iter()
        .map(|t| {
            let c = to_local.apply_point(&t.footprint_center);
            (c.x, c.y, t.footprint_radius)
        })
        .collect();

    // Every footprint circle must lie fully inside the cap polygon, or the
    // cap-anchoring assumption is violated.
    const SAMPLES: usize = 32;
    for &(cx, cy, r) in &local_circles {
        for i in 0..SAMPLES {
            let theta = (i as f64 / SAMPLES as f64) * std::f64::consts::TAU;
            let p = GeoPoint::new(cx + r * theta.cos(), cy + r * theta.sin());
            if !cap.polygon.contains(&p) {
                return None;
            }
        }
    }

    let mut cdt = ConstrainedDelaunayTriangulation::<SpadePoint2<f64>>::new();
    for polygon in cap.polygon.iter() {
        insert_ring(
            &mut cdt,
            polygon.exterior().points().map(|p| (p.x(), p.y())),
        )?;
        for hole in polygon.interiors() {
            insert_ring(&mut cdt, hole.points().map(|p| (p.x(), p.y())))?;
        }
    }
    for &(cx, cy, r) in &local_circles {
        let ring = (0..SAMPLES).map(|i| {
            let theta = (i as f64 / SAMPLES as f64) * std::f64::consts::TAU;
            (cx + r * theta.cos(), cy + r * theta.sin())
        });
        insert_ring(&mut cdt, ring)?;
    }

    let mut carved_vertices: Vec<f32> = Vec::new();
    let mut carved_indices: Vec<u32> = Vec::new();
    for face in cdt.inner_faces() {
        let verts = face.vertices();
        let p = [
            verts[0].position(),
            verts[1].position(),
            verts[2].position(),
        ];
        let cx = (p[0].x + p[1].x + p[2].x) / 3.0;
        let cy = (p[0].y + p[1].y + p[2].y) / 3.0;

        if !cap.polygon.contains(&GeoPoint::new(cx, cy)) {
            continue;
        }
        if local_circles
            .iter()
            .any(|&(tx, ty, r)| (cx - tx).powi(2) + (cy - ty).powi(2) < r * r)
        {
            continue;
        }

        // Local +Z (the cutting normal) corresponds to a CCW ring in this
        // XY frame; the cap's outward direction is -normal, so reverse.
        let area = (p[1].x - p[0].x) * (p[2].y - p[0].y) - (p[2].x - p[0].x) * (p[1].y - p[0].y);
        let ordered = if area > 0.0 { [p[0], p[2], p[1]] } else { p };

        let base = (carved_vertices.len() / 3) as u32;
        for pt in &ordered {
            let world = cap.to_world.apply_point(&Point3::new(pt.x, pt.y, 0.0));
            carved_vertices.push(world.x as f32);
            carved_vertices.push(world.y as f32);
            carved_vertices.push(world.z as f32);
        }
        carved_indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    if carved_indices.is_empty() {
        return None;
    }
    let carved_cap = TriangleMesh::from_vertices_indices(carved_vertices, carved_indices);

    let mut result = non_cap_submesh(mesh, origin, normal);
    result.merge(&carved_cap);
    for tool in tools {
        if invert {
            result.merge(&reverse_winding(&tool.shell));
        } else {
            result.merge(&tool.shell);
        }
    }
    Some(result)
}

fn insert_ring(
    cdt: &mut ConstrainedDelaunayTriangulation<SpadePoint2<f64>>,
    points: impl Iterator<Item = (f64, f64)>,
) -> Option<()> {
    let mut handles = Vec::new();
    for (x, y) in points {
        handles.push(cdt.insert(SpadePoint2::new(x, y)).ok()?);
    }
    for i in 0..handles.len() {
        cdt.add_constraint(handles[i], handles[(i + 1) % handles.len()]);
    }
    Some(())
}

fn non_cap_submesh(mesh: &TriangleMesh, origin: &Point3, normal: &Dir3) -> TriangleMesh {
    let normal_vec = normal.into_inner();
    let faces: Vec<usize> = (0..mesh.num_triangles())
        .filter(|&t| {
            let tri = mesh.triangle(t);
            !tri.iter()
                .all(|v| ((v - origin).dot(&normal_vec)).abs() < CAP_TOLERANCE)
        })
        .collect();
    mesh.submesh_by_face_indices(&faces)
}

fn reverse_winding(mesh: &TriangleMesh) -> TriangleMesh {
    let mut out = mesh.clone();
    for tri in out.indices.chunks_mut(3) {
        tri.swap(1, 2);
    }
    for n in out.normals.chunks_mut(3) {
        n[0] = -n[0];
        n[1] = -n[1];
        n[2] = -n[2];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitcraft_generate::{generate_chamfered_solid, place};
    use splitcraft_math::Vec3;
    use splitcraft_slice::slice;

    fn unit_cube() -> TriangleMesh {
        #[rustfmt::skip]
        let vertices: Vec<f32> = vec![
            0.0, 0.0, 0.0,  10.0, 0.0, 0.0,  10.0, 10.0, 0.0,  0.0, 10.0, 0.0,
            0.0, 0.0, 10.0,  10.0, 0.0, 10.0,  10.0, 10.0, 10.0,  0.0, 10.0, 10.0,
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
    fn test_union_pin_increases_volume() {
        let origin = Point3::new(5.0, 5.0, 0.0);
        let normal = Dir3::new_normalize(Vec3::z());
        let half = slice(&unit_cube(), &origin, &normal, true).unwrap();

        let solid = generate_chamfered_solid(2.0, 5.0, 0.4, true, true);
        let center = Point3::new(5.0, 5.0, 0.0);
        let axis = Dir3::new_normalize(Vec3::new(0.0, 0.0, -1.0));
        let tool = AnchoredTool {
            full: place(&solid.full, &center, &axis),
            shell: place(&solid.shell, &center, &axis),
            footprint_center: center,
            footprint_radius: solid.footprint_radius,
        };

        let outcome = union(&half, &origin, &normal, &[tool]);
        let result = outcome.into_mesh();
        assert!(result.volume() > half.volume());
    }

    #[test]
    fn test_union_out_of_bounds_tool_falls_back() {
        let origin = Point3::new(5.0, 5.0, 0.0);
        let normal = Dir3::new_normalize(Vec3::z());
        let half = slice(&unit_cube(), &origin, &normal, true).unwrap();

        let solid = generate_chamfered_solid(2.0, 5.0, 0.4, true, true);
        // Center far outside the cap polygon.
        let center = Point3::new(500.0, 500.0, 0.0);
        let axis = Dir3::new_normalize(Vec3::new(0.0, 0.0, -1.0));
        let tool = AnchoredTool {
            full: place(&solid.full, &center, &axis),
            shell: place(&solid.shell, &center, &axis),
            footprint_center: center,
            footprint_radius: solid.footprint_radius,
        };

        match union(&half, &origin, &normal, &[tool]) {
            CompositeOutcome::Fallback { .. } => {}
            CompositeOutcome::Composited(_) => panic!("expected fallback for out-of-bounds tool"),
        }
    }
}
