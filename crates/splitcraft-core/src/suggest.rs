//! Plane-suggestion heuristic.
//!
//! Picks a cutting plane for a mesh, either from an explicit axis hint or
//! by choosing the mesh's longest extent, and places it at the midplane
//! of that axis while passing through the centroid on the other two.

use spade::{ConstrainedDelaunayTriangulation, Point2 as SpadePoint2, Triangulation};
use splitcraft_math::{Axis, Dir3, Point3, Vec3};
use splitcraft_mesh::TriangleMesh;
use splitcraft_slice::{plane_local_frame, section};

/// A proposed cutting plane plus a decorative visualization of the cap.
#[derive(Debug)]
pub struct PlaneSuggestion {
    /// A point on the plane.
    pub origin: Point3,
    /// The plane's unit normal.
    pub normal: Dir3,
    /// A best-effort mesh approximating the cut cross-section, for display
    /// only; not consumed by the split orchestrator.
    pub visualization: TriangleMesh,
}

/// Suggest a cutting plane for `mesh`.
///
/// `axis_hint` selects the cut axis explicitly; `None` (or an unknown
/// value upstream) means "auto", which picks the mesh's longest extent.
pub fn suggest_plane(mesh: &TriangleMesh, axis_hint: Option<Axis>) -> Option<PlaneSuggestion> {
    let (min, max) = mesh.bounds()?;
    let centroid = mesh.centroid()?;
    let extents = mesh.extents()?;

    let axis = axis_hint.unwrap_or_else(|| Axis::argmax(extents.x, extents.y, extents.z));
    let normal = axis.direction();

    let mut origin = centroid;
    match axis {
        Axis::X => origin.x = (min.x + max.x) / 2.0,
        Axis::Y => origin.y = (min.y + max.y) / 2.0,
        Axis::Z => origin.z = (min.z + max.z) / 2.0,
    }

    let visualization = visualization_cap(mesh, &origin, &normal, &extents)
        .unwrap_or_else(|| fallback_box(&origin, &extents));

    Some(PlaneSuggestion {
        origin,
        normal,
        visualization,
    })
}

fn visualization_cap(
    mesh: &TriangleMesh,
    origin: &Point3,
    normal: &Dir3,
    _extents: &Vec3,
) -> Option<TriangleMesh> {
    // A genuine plane/mesh intersection of the uncut input — the suggested
    // midplane essentially never passes through an existing vertex, so a
    // flush-cap search (`extract_cut_surface`) would return nothing here.
    let loops = section(mesh, origin, normal);
    if loops.is_empty() {
        return None;
    }
    let frame = plane_local_frame(origin, normal);
    let to_world = frame.inverse()?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    for loop_pts in &loops {
        if loop_pts.len() < 3 {
            continue;
        }
        let mut cdt = ConstrainedDelaunayTriangulation::<SpadePoint2<f64>>::new();
        let mut handles = Vec::new();
        for p in loop_pts {
            let local = frame.apply_point(p);
            handles.push(cdt.insert(SpadePoint2::new(local.x, local.y)).ok()?);
        }
        for i in 0..handles.len() {
            cdt.add_constraint(handles[i], handles[(i + 1) % handles.len()]);
        }

        for face in cdt.inner_faces() {
            let base = (vertices.len() / 3) as u32;
            for v in face.vertices() {
                let pos = v.position();
                let world = to_world.apply_point(&Point3::new(pos.x, pos.y, 0.0));
                vertices.push(world.x as f32);
                vertices.push(world.y as f32);
                vertices.push(world.z as f32);
            }
            indices.extend_from_slice(&[base, base + 1, base + 2]);
        }
    }

    if indices.is_empty() {
        return None;
    }
    Some(TriangleMesh::from_vertices_indices(vertices, indices))
}

/// Thin (1 mm) box shim used when no valid cut-surface triangulation is
/// available. Extents are `(extent_x, extent_y, 1)` regardless of cut
/// axis — purely cosmetic, not geometrically meaningful.
fn fallback_box(origin: &Point3, extents: &Vec3) -> TriangleMesh {
    let hx = extents.x / 2.0;
    let hy = extents.y / 2.0;
    let hz = 0.5;
    #[rustfmt::skip]
    let vertices: Vec<f32> = vec![
        (origin.x - hx) as f32, (origin.y - hy) as f32, (origin.z - hz) as f32,
        (origin.x + hx) as f32, (origin.y - hy) as f32, (origin.z - hz) as f32,
        (origin.x + hx) as f32, (origin.y + hy) as f32, (origin.z - hz) as f32,
        (origin.x - hx) as f32, (origin.y + hy) as f32, (origin.z - hz) as f32,
        (origin.x - hx) as f32, (origin.y - hy) as f32, (origin.z + hz) as f32,
        (origin.x + hx) as f32, (origin.y - hy) as f32, (origin.z + hz) as f32,
        (origin.x + hx) as f32, (origin.y + hy) as f32, (origin.z + hz) as f32,
        (origin.x - hx) as f32, (origin.y + hy) as f32, (origin.z + hz) as f32,
    ];
    #[rustfmt::skip]
    let indices: Vec<u32> = vec![
        0, 1, 2,  0, 2, 3,
        4, 6, 5,  4, 7, 6,
        0, 4, 5,  0, 5, 1,
        1, 5, 6,  1, 6, 2,
        2, 6, 7,  2, 7, 3,
        3, 7, 4,  3, 4, 0,
    ];
    TriangleMesh::from_vertices_indices(vertices, indices)
}
