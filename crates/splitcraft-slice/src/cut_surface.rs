//! Extract the planar cap of a sliced half-mesh as a 2D polygon set.

use geo::{BooleanOps, MultiPolygon, Triangle as GeoTriangle, Winding};
use geo_buffer::buffer_multi_polygon;
use splitcraft_math::{Dir3, Point3, Transform};
use splitcraft_mesh::TriangleMesh;

use crate::slice::plane_local_frame;

/// Tolerance (mm) for deciding a vertex lies on the cutting plane.
pub const CAP_TOLERANCE: f64 = 1e-4;

/// The cap of a sliced half-mesh: a (possibly multi) 2D polygon in a
/// plane-local frame, plus the transform mapping that frame back to world
/// space.
pub struct CutSurface {
    /// The cap's footprint, in plane-local XY coordinates (Z dropped).
    pub polygon: MultiPolygon<f64>,
    /// Maps a plane-local `(x, y, 0)` point back to world space.
    pub to_world: Transform,
}

/// Extract the planar cap of `mesh` cut by `(origin, normal)`.
///
/// Selects every triangle whose three vertices lie within
/// [`CAP_TOLERANCE`] of the plane, projects them into a plane-local frame,
/// and unions them into a single (multi)polygon. Returns `None` if no
/// triangle qualifies — callers should treat this as "no valid cut
/// surface; skip keying" rather than an error.
pub fn extract_cut_surface(
    mesh: &TriangleMesh,
    origin: &Point3,
    normal: &Dir3,
) -> Option<CutSurface> {
    let normal_vec = normal.into_inner();
    let to_local = plane_local_frame(origin, normal);
    let to_world = to_local.inverse()?;

    let mut polygon: Option<MultiPolygon<f64>> = None;

    for t in 0..mesh.num_triangles() {
        let tri = mesh.triangle(t);
        let on_plane = tri
            .iter()
            .all(|v| ((v - origin).dot(&normal_vec)).abs() < CAP_TOLERANCE);
        if !on_plane {
            continue;
        }

        let local: Vec<Point3> = tri.iter().map(|v| to_local.apply_point(v)).collect();
        let geo_tri = GeoTriangle::from([
            (local[0].x, local[0].y),
            (local[1].x, local[1].y),
            (local[2].x, local[2].y),
        ]);
        let tri_poly = MultiPolygon(vec![geo_tri.to_polygon()]);

        polygon = Some(match polygon {
            Some(acc) => acc.union(&tri_poly),
            None => tri_poly,
        });
    }

    // The per-triangle unions above can leave slivers with self-touching
    // rings at shared triangle edges; a zero-width buffer resolves those
    // the same way a zero-width Shapely buffer repairs an invalid polygon.
    // geo-buffer's offset requires CCW exteriors/CW holes and collapses a
    // clockwise ring (which `union` can produce) to nothing, so normalize
    // winding first.
    polygon.map(|mut polygon| {
        for p in polygon.iter_mut() {
            p.exterior_mut(|ext| ext.make_ccw_winding());
            p.interiors_mut(|holes| {
                for hole in holes {
                    hole.make_cw_winding();
                }
            });
        }
        CutSurface {
            polygon: buffer_multi_polygon(&polygon, 0.0),
            to_world,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;
    use splitcraft_math::Vec3;

    fn capped_unit_cube() -> TriangleMesh {
        #[rustfmt::skip]
        let vertices: Vec<f32> = vec![
            0.0, 0.0, 0.0,  1.0, 0.0, 0.0,  1.0, 1.0, 0.0,  0.0, 1.0, 0.0,
            0.0, 0.0, 1.0,  1.0, 0.0, 1.0,  1.0, 1.0, 1.0,  0.0, 1.0, 1.0,
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

    #[test]
    fn test_extract_cut_surface_bottom_face() {
        let cube = capped_unit_cube();
        let origin = Point3::new(0.0, 0.0, 0.0);
        let normal = Dir3::new_normalize(Vec3::z());
        let cap = extract_cut_surface(&cube, &origin, &normal).unwrap();
        assert!((cap.polygon.unsigned_area() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_extract_cut_surface_no_match_returns_none() {
        let cube = capped_unit_cube();
        let origin = Point3::new(0.0, 0.0, 0.5);
        let normal = Dir3::new_normalize(Vec3::z());
        assert!(extract_cut_surface(&cube, &origin, &normal).is_none());
    }
}
