//! End-to-end split orchestrator.
//!
//! Slices a mesh into two halves, optionally keys them with a mating
//! pin/hole pair anchored on the shared cut surface, reorients each half
//! so its cut face points down, and sits it on the build plate.

use splitcraft_boolean::{difference, union, AnchoredTool, CompositeOutcome};
use splitcraft_generate::{generate_chamfered_solid, place};
use splitcraft_keying::plan_pins;
use splitcraft_math::{align_vectors, Dir3, Point3, Vec3};
use splitcraft_mesh::TriangleMesh;
use splitcraft_slice::{extract_cut_surface, slice};

use crate::error::{CoreError, Fallback, Result};

/// Diametral clearance between a pin and its mating hole, in millimeters.
pub const HOLE_TOLERANCE: f64 = 0.4;

/// The two halves produced by a split, with their volumes.
pub struct SplitResult {
    /// The positive-side half, cut face reoriented to face down.
    pub half_a: TriangleMesh,
    /// The negative-side half, cut face reoriented to face down.
    pub half_b: TriangleMesh,
    /// Volume of `half_a`.
    pub volume_a: f64,
    /// Volume of `half_b`.
    pub volume_b: f64,
    /// Non-fatal outcomes recorded while producing this result (e.g. keying
    /// skipped, a boolean carve/weld falling back to plain concatenation).
    pub fallbacks: Vec<Fallback>,
}

/// Split `mesh` by the plane `(origin, normal)`.
///
/// `normal` need not be unit length — it is normalized here, after
/// rejecting a (near-)zero vector as a degenerate plane.
///
/// When `add_keys` is set, a mating pin/hole pair is planned from
/// `half_a`'s cap and composited in; if no cap is found or the planner
/// can't place anything, keying is skipped and the raw halves are
/// returned instead (logged via `tracing::warn!`, not raised as an
/// error).
pub fn split_mesh(
    mesh: &TriangleMesh,
    origin: &Point3,
    normal: &Vec3,
    add_keys: bool,
) -> Result<SplitResult> {
    if normal.norm() < 1e-12 {
        return Err(CoreError::DegeneratePlane);
    }
    let normal = Dir3::new_normalize(*normal);
    let neg_normal = Dir3::new_normalize(-normal.into_inner());

    let mut half_a =
        slice(mesh, origin, &normal, true).map_err(|e| CoreError::InvalidMesh(e.to_string()))?;
    let mut half_b = slice(mesh, origin, &neg_normal, true)
        .map_err(|e| CoreError::InvalidMesh(e.to_string()))?;

    let fallbacks = if add_keys {
        key_halves(&mut half_a, &mut half_b, origin, &normal, &neg_normal)
    } else {
        Vec::new()
    };

    reorient(&mut half_a, &neg_normal, "half_a");
    reorient(&mut half_b, &normal, "half_b");
    sit_on_plate(&mut half_a);
    sit_on_plate(&mut half_b);

    let volume_a = half_a.volume();
    let volume_b = half_b.volume();
    Ok(SplitResult {
        half_a,
        half_b,
        volume_a,
        volume_b,
        fallbacks,
    })
}

fn key_halves(
    half_a: &mut TriangleMesh,
    half_b: &mut TriangleMesh,
    origin: &Point3,
    normal: &Dir3,
    neg_normal: &Dir3,
) -> Vec<Fallback> {
    let mut fallbacks = Vec::new();

    let Some(cap) = extract_cut_surface(half_a, origin, normal) else {
        tracing::warn!("no cap found on half_a; skipping keying");
        fallbacks.push(Fallback::NoCapFound);
        return fallbacks;
    };
    let Some(plan) = plan_pins(&cap) else {
        tracing::warn!("cap polygon too degenerate to plan pins; skipping keying");
        fallbacks.push(Fallback::NoCapFound);
        return fallbacks;
    };
    if plan.dropped > 0 {
        tracing::warn!(
            dropped = plan.dropped,
            "dropped pin candidates outside the cap polygon"
        );
        fallbacks.push(Fallback::PlacementWarning {
            dropped: plan.dropped,
        });
    }

    let pin_radius = (0.6 * plan.safe_radius).clamp(2.0, 20.0);
    let pin_height = (3.0 * pin_radius).clamp(10.0, 30.0);
    let pin_chamfer = 0.2 * pin_radius;
    let hole_radius = pin_radius + HOLE_TOLERANCE / 2.0;
    let hole_height = pin_height;
    let hole_chamfer = 0.2 * hole_radius;

    // Both tools are anchored at the same world centers and point the same
    // direction (away from half_a, across the shared cap) so the pin and
    // its mating hole line up when the two halves are reassembled.
    let pin_solid = generate_chamfered_solid(pin_radius, pin_height, pin_chamfer, true, true);
    let hole_solid = generate_chamfered_solid(hole_radius, hole_height, hole_chamfer, false, true);

    let pins: Vec<AnchoredTool> = plan
        .centers_3d
        .iter()
        .map(|c| AnchoredTool {
            full: place(&pin_solid.full, c, neg_normal),
            shell: place(&pin_solid.shell, c, neg_normal),
            footprint_center: *c,
            footprint_radius: pin_solid.footprint_radius,
        })
        .collect();
    let cutters: Vec<AnchoredTool> = plan
        .centers_3d
        .iter()
        .map(|c| AnchoredTool {
            full: place(&hole_solid.full, c, neg_normal),
            shell: place(&hole_solid.shell, c, neg_normal),
            footprint_center: *c,
            footprint_radius: hole_solid.footprint_radius,
        })
        .collect();

    match union(half_a, origin, normal, &pins) {
        CompositeOutcome::Composited(m) => *half_a = m,
        CompositeOutcome::Fallback { mesh, reason } => {
            tracing::warn!(half = "half_a", reason = %reason, "boolean union fell back");
            fallbacks.push(Fallback::BooleanFailure {
                half: "half_a",
                reason,
            });
            *half_a = mesh;
        }
    }
    match difference(half_b, origin, normal, &cutters) {
        CompositeOutcome::Composited(m) => *half_b = m,
        CompositeOutcome::Fallback { mesh, reason } => {
            tracing::warn!(half = "half_b", reason = %reason, "boolean difference fell back");
            fallbacks.push(Fallback::BooleanFailure {
                half: "half_b",
                reason,
            });
            *half_b = mesh;
        }
    }

    fallbacks
}

fn reorient(half: &mut TriangleMesh, cut_face_direction: &Dir3, label: &'static str) {
    let down = Dir3::new_normalize(Vec3::new(0.0, 0.0, -1.0));
    let rotation = align_vectors(cut_face_direction, &down);
    tracing::debug!(half = label, "reorienting cut face to face down");
    *half = half.transformed(&rotation);
}

fn sit_on_plate(half: &mut TriangleMesh) {
    if let Some((min, _)) = half.bounds() {
        *half = half.translated(&Vec3::new(0.0, 0.0, -min.z));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> TriangleMesh {
        #[rustfmt::skip]
        let vertices: Vec<f32> = vec![
            0.0, 0.0, 0.0,  20.0, 0.0, 0.0,  20.0, 20.0, 0.0,  0.0, 20.0, 0.0,
            0.0, 0.0, 20.0,  20.0, 0.0, 20.0,  20.0, 20.0, 20.0,  0.0, 20.0, 20.0,
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
    fn test_split_without_keys_conserves_volume() {
        let cube = unit_cube();
        let origin = Point3::new(10.0, 10.0, 10.0);
        let normal = Vec3::x();
        let result = split_mesh(&cube, &origin, &normal, false).unwrap();
        assert!(
            (result.volume_a + result.volume_b - cube.volume()).abs() < 1e-3 * cube.volume().abs()
        );
    }

    #[test]
    fn test_split_halves_sit_on_plate() {
        let cube = unit_cube();
        let origin = Point3::new(10.0, 10.0, 10.0);
        let normal = Vec3::x();
        let result = split_mesh(&cube, &origin, &normal, false).unwrap();
        let (min_a, _) = result.half_a.bounds().unwrap();
        let (min_b, _) = result.half_b.bounds().unwrap();
        assert!(min_a.z.abs() < 1e-6);
        assert!(min_b.z.abs() < 1e-6);
    }

    #[test]
    fn test_split_with_keys_increases_half_a_volume_relative_to_plain_half() {
        let cube = unit_cube();
        let origin = Point3::new(10.0, 10.0, 10.0);
        let normal = Vec3::x();
        let plain = split_mesh(&cube, &origin, &normal, false).unwrap();
        let keyed = split_mesh(&cube, &origin, &normal, true).unwrap();
        assert!(keyed.volume_a.abs() >= plain.volume_a.abs());
    }

    #[test]
    fn test_split_without_keys_has_no_fallbacks() {
        let cube = unit_cube();
        let origin = Point3::new(10.0, 10.0, 10.0);
        let normal = Vec3::x();
        let result = split_mesh(&cube, &origin, &normal, false).unwrap();
        assert!(result.fallbacks.is_empty());
    }

    #[test]
    fn test_degenerate_normal_errors() {
        let cube = unit_cube();
        let origin = Point3::new(10.0, 10.0, 10.0);
        let normal = Vec3::zeros();
        assert!(split_mesh(&cube, &origin, &normal, false).is_err());
    }
}
