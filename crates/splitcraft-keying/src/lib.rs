#![warn(missing_docs)]

//! Pin-placement planning on a cut surface's 2D cap polygon.
//!
//! Decides how many alignment pins a cap needs from its minimum rotated
//! bounding rectangle's aspect ratio, places them along the rectangle's
//! long centerline (or at a single centroid/pole-of-inaccessibility point
//! for near-square caps), and back-projects the 2D centers to world space.

use geo::{
    Centroid, Contains, Distance, Euclidean, MinimumRotatedRect, Point as GeoPoint, Polygon,
};
use splitcraft_math::Point3;
use splitcraft_slice::CutSurface;

/// Tolerance (mm) used when finding the pole of inaccessibility.
pub const POLE_TOLERANCE: f64 = 0.1;

/// A placement plan: 2D centers on the cap (plane-local frame) plus the
/// safe radius a pin can use without escaping the polygon, and the
/// centers back-projected to world space.
pub struct KeyingPlan {
    /// Plane-local 2D centers, in placement order.
    pub centers_2d: Vec<GeoPoint<f64>>,
    /// World-space centers, one per entry in `centers_2d`.
    pub centers_3d: Vec<Point3>,
    /// Distance from `centers_2d[0]` to the polygon boundary.
    pub safe_radius: f64,
    /// Placement candidates that fell outside the polygon and were dropped.
    pub dropped: usize,
}

/// Plan pin placement for a cap's cut surface.
///
/// Returns `None` only if the cap's polygon is empty (no exterior rings).
pub fn plan_pins(cap: &CutSurface) -> Option<KeyingPlan> {
    let polygon = cap.polygon.0.first()?.clone();
    let rect = MinimumRotatedRect::minimum_rotated_rect(&polygon)?;
    let corners: Vec<GeoPoint<f64>> = rect.exterior().points().take(4).collect();
    if corners.len() < 4 {
        return None;
    }

    let edge_len = |a: &GeoPoint<f64>, b: &GeoPoint<f64>| {
        ((a.x() - b.x()).powi(2) + (a.y() - b.y()).powi(2)).sqrt()
    };
    let edge01 = edge_len(&corners[0], &corners[1]);
    let edge12 = edge_len(&corners[1], &corners[2]);

    // corners[0..4] are in order around the rectangle; (0,1)/(2,3) are one
    // pair of opposite edges, (1,2)/(3,0) the other. The centerline runs
    // along the long axis, so it connects the midpoints of the *short*
    // pair of edges.
    let (long_len, short_len, short_midpoints) = if edge01 >= edge12 {
        (
            edge01,
            edge12,
            (
                midpoint(&corners[1], &corners[2]),
                midpoint(&corners[3], &corners[0]),
            ),
        )
    } else {
        (
            edge12,
            edge01,
            (
                midpoint(&corners[0], &corners[1]),
                midpoint(&corners[2], &corners[3]),
            ),
        )
    };

    let aspect = long_len / short_len.max(0.1);
    let pin_count = if aspect > 10.0 {
        3
    } else if aspect > 3.0 {
        2
    } else {
        1
    };

    let centers_2d = if pin_count == 1 {
        vec![single_pin_center(&polygon)]
    } else {
        let centerline = short_midpoints;
        let mut candidates = Vec::with_capacity(pin_count);
        for i in 0..pin_count {
            let fraction = (2 * i + 1) as f64 / (2 * pin_count) as f64;
            candidates.push(lerp(&centerline.0, &centerline.1, fraction));
        }
        let kept: Vec<GeoPoint<f64>> = candidates
            .iter()
            .filter(|p| polygon.contains(*p))
            .cloned()
            .collect();
        if kept.is_empty() {
            vec![single_pin_center(&polygon)]
        } else {
            kept
        }
    };
    let dropped = pin_count.saturating_sub(centers_2d.len());

    let safe_radius = Euclidean::distance(&centers_2d[0], polygon.exterior());
    let centers_3d = centers_2d
        .iter()
        .map(|p| cap.to_world.apply_point(&Point3::new(p.x(), p.y(), 0.0)))
        .collect();

    Some(KeyingPlan {
        centers_2d,
        centers_3d,
        safe_radius,
        dropped,
    })
}

fn single_pin_center(polygon: &Polygon<f64>) -> GeoPoint<f64> {
    let centroid = polygon.centroid();
    match centroid {
        Some(c) if polygon.contains(&c) => c,
        _ => polylabel::polylabel(polygon, &POLE_TOLERANCE)
            .unwrap_or_else(|_| polygon.exterior().points().next().unwrap()),
    }
}

fn midpoint(a: &GeoPoint<f64>, b: &GeoPoint<f64>) -> GeoPoint<f64> {
    GeoPoint::new((a.x() + b.x()) / 2.0, (a.y() + b.y()) / 2.0)
}

fn lerp(a: &GeoPoint<f64>, b: &GeoPoint<f64>, t: f64) -> GeoPoint<f64> {
    GeoPoint::new(a.x() + (b.x() - a.x()) * t, a.y() + (b.y() - a.y()) * t)
}
