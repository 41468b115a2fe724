#![warn(missing_docs)]

//! Parametric chamfered pin/hole solid generator.
//!
//! Produces a closed triangle mesh of revolution around the local +Z axis:
//! a cylindrical pin (or its matching hole cutter) with optional chamfers
//! at either end, built from a 2D (z, radius) profile swept through `S`
//! angular sections.

use splitcraft_math::{align_vectors, Dir3, Point3, Transform, Vec3};
use splitcraft_mesh::TriangleMesh;

/// Angular sections used to revolve the profile.
pub const SECTIONS: u32 = 32;

/// A chamfered cylinder generated around the local +Z axis, before placement.
///
/// `full` is the complete closed solid (wall, bottom fan, top fan) — handy
/// for volume/dimension checks. `shell` omits the bottom fan, since the
/// boolean compositor welds the wall directly onto a carved cap rather than
/// stacking the pin's own floor on top of it.
pub struct ChamferedSolid {
    /// The complete closed mesh, in local coordinates (axis = +Z, base at z=0).
    pub full: TriangleMesh,
    /// The wall and top cap only (no bottom fan), in local coordinates.
    pub shell: TriangleMesh,
    /// Radius of the widest ring at z=0 — the footprint this solid occupies
    /// on the plane it's anchored to.
    pub footprint_radius: f64,
}

/// Build a chamfered cylinder of revolution.
///
/// `(taper_top, flare_bottom)` select which end gets a chamfer. If the
/// requested chamfers wouldn't fit within `height` the chamfer length is
/// rescaled to `height / 3`.
pub fn generate_chamfered_solid(
    radius: f64,
    height: f64,
    chamfer: f64,
    taper_top: bool,
    flare_bottom: bool,
) -> ChamferedSolid {
    debug_assert!(chamfer > 0.0, "chamfer must be positive");
    let needed = (taper_top as u8 + flare_bottom as u8) as f64 * chamfer;
    let chamfer = if needed >= height {
        height / 3.0
    } else {
        chamfer
    };

    let mut profile: Vec<(f64, f64)> = Vec::new(); // (z, r)
    if flare_bottom {
        profile.push((0.0, radius + chamfer));
        profile.push((chamfer, radius));
    } else {
        profile.push((0.0, radius));
    }
    if taper_top {
        profile.push((height - chamfer, radius));
        profile.push((height, radius - chamfer));
    } else {
        profile.push((height, radius));
    }

    let footprint_radius = profile[0].1;
    let (full, shell) = revolve_profile(&profile);
    ChamferedSolid {
        full,
        shell,
        footprint_radius,
    }
}

/// Revolve a (z, radius) profile about +Z using [`SECTIONS`] angular steps,
/// returning `(full_solid, shell_without_bottom_fan)`.
fn revolve_profile(profile: &[(f64, f64)]) -> (TriangleMesh, TriangleMesh) {
    let s = SECTIONS as usize;
    let rings = profile.len();

    // ring_verts[ring][section] = vertex position
    let mut ring_verts: Vec<Vec<Point3>> = Vec::with_capacity(rings);
    for &(z, r) in profile {
        let mut ring = Vec::with_capacity(s);
        for i in 0..s {
            let theta = (i as f64 / s as f64) * std::f64::consts::TAU;
            ring.push(Point3::new(r * theta.cos(), r * theta.sin(), z));
        }
        ring_verts.push(ring);
    }

    let mut wall_vertices: Vec<Point3> = Vec::new();
    let mut wall_indices: Vec<u32> = Vec::new();
    let push = |verts: &mut Vec<Point3>, p: Point3| -> u32 {
        verts.push(p);
        (verts.len() - 1) as u32
    };

    // Side wall: two triangles per quad between consecutive rings/sections.
    let mut ring_base = Vec::with_capacity(rings);
    for ring in &ring_verts {
        let base = wall_vertices.len() as u32;
        for &p in ring {
            push(&mut wall_vertices, p);
        }
        ring_base.push(base);
    }
    for r in 0..rings - 1 {
        for i in 0..s {
            let j = (i + 1) % s;
            let a = ring_base[r] + i as u32;
            let b = ring_base[r] + j as u32;
            let c = ring_base[r + 1] + j as u32;
            let d = ring_base[r + 1] + i as u32;
            wall_indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }

    // Top fan: center at z = height.
    let (top_z, _) = profile[rings - 1];
    let top_center = push(&mut wall_vertices, Point3::new(0.0, 0.0, top_z));
    for i in 0..s {
        let j = (i + 1) % s;
        let a = ring_base[rings - 1] + i as u32;
        let b = ring_base[rings - 1] + j as u32;
        wall_indices.extend_from_slice(&[top_center, a, b]);
    }

    // `shell` = wall + top fan, no bottom fan.
    let shell = build_mesh(&wall_vertices, &wall_indices);

    // Bottom fan: center at z=0, wound opposite to the top fan.
    let mut full_vertices = wall_vertices.clone();
    let mut full_indices = wall_indices.clone();
    let bottom_center = push(&mut full_vertices, Point3::new(0.0, 0.0, profile[0].0));
    for i in 0..s {
        let j = (i + 1) % s;
        let a = ring_base[0] + i as u32;
        let b = ring_base[0] + j as u32;
        full_indices.extend_from_slice(&[bottom_center, b, a]);
    }
    let full = build_mesh(&full_vertices, &full_indices);

    (full, shell)
}

fn build_mesh(points: &[Point3], indices: &[u32]) -> TriangleMesh {
    let mut vertices = Vec::with_capacity(points.len() * 3);
    for p in points {
        vertices.push(p.x as f32);
        vertices.push(p.y as f32);
        vertices.push(p.z as f32);
    }
    TriangleMesh::from_vertices_indices(vertices, indices.to_vec())
}

/// Place a local-frame solid (axis +Z, base at the origin) so its axis
/// points along `target_axis` and its base sits at `center`.
pub fn place(mesh: &TriangleMesh, center: &Point3, target_axis: &Dir3) -> TriangleMesh {
    let local_z = Dir3::new_unchecked(Vec3::z());
    let rotation = align_vectors(&local_z, target_axis);
    let translation = Transform::translation(center.x, center.y, center.z);
    mesh.transformed(&translation.then(&rotation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_profile_volume_positive() {
        let solid = generate_chamfered_solid(3.0, 10.0, 0.6, true, true);
        assert!(solid.full.volume() > 0.0);
        // A chamfered cylinder is smaller than its bounding plain cylinder.
        let plain_cylinder_volume = std::f64::consts::PI * 3.0 * 3.0 * 10.0;
        assert!(solid.full.volume() < plain_cylinder_volume);
    }

    #[test]
    fn test_chamfer_rescaled_when_too_large() {
        // chamfer=6 with both ends chamfered needs 12 >= height(10): rescales to 10/3.
        let solid = generate_chamfered_solid(3.0, 10.0, 6.0, true, true);
        assert!(solid.full.volume() > 0.0);
    }

    #[test]
    fn test_shell_excludes_bottom_fan_vertex_count() {
        let solid = generate_chamfered_solid(3.0, 10.0, 0.6, true, true);
        // shell has no bottom-fan center vertex; full has exactly one more.
        assert_eq!(solid.full.num_vertices(), solid.shell.num_vertices() + 1);
    }

    #[test]
    fn test_footprint_radius_matches_widest_bottom_ring() {
        let flared = generate_chamfered_solid(3.0, 10.0, 0.6, true, true);
        assert!((flared.footprint_radius - 3.6).abs() < 1e-9);
        let straight = generate_chamfered_solid(3.0, 10.0, 0.6, false, false);
        assert!((straight.footprint_radius - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_place_translates_base_to_center() {
        let solid = generate_chamfered_solid(3.0, 10.0, 0.6, true, true);
        let center = Point3::new(5.0, 5.0, 2.0);
        let axis = Dir3::new_normalize(Vec3::new(0.0, 0.0, -1.0));
        let placed = place(&solid.full, &center, &axis);
        let (min, max) = placed.bounds().unwrap();
        // axis -Z means the solid now extends downward from center.
        assert!(max.z <= center.z + 1e-6);
        assert!(min.z < center.z);
    }
}
