//! Bending-normal estimation for piecewise-linear paths.
//!
//! A vertex of a polyline has no curvature of its own, so the normal at a
//! segment is taken from the turn into the nearest non-parallel segment on
//! either side. Collinear runs are skipped, however long.

use curve_core::Tolerance;
use curve_math::Vector3;

use crate::growable::GrowableXyzArray;

fn is_parallel(a: Vector3, b: Vector3, cross: Vector3) -> bool {
    cross.length() <= Tolerance::DEFAULT_ANGULAR * a.length() * b.length()
}

/// `segment(base) x segment(j)` for the first `j > base` not parallel to
/// the base segment.
pub(super) fn first_nonparallel_cross_forward(
    points: &GrowableXyzArray,
    base: usize,
) -> Option<Vector3> {
    let a = points.vector_between(base, base + 1)?;
    let num_segments = points.len().saturating_sub(1);
    (base + 1..num_segments).find_map(|j| {
        let b = points.vector_between(j, j + 1)?;
        let cross = a.cross(b);
        (!is_parallel(a, b, cross)).then_some(cross)
    })
}

/// `segment(j) x segment(base)` for the last `j < base` not parallel to
/// the base segment.
pub(super) fn first_nonparallel_cross_backward(
    points: &GrowableXyzArray,
    base: usize,
) -> Option<Vector3> {
    let a = points.vector_between(base, base + 1)?;
    (0..base).rev().find_map(|j| {
        let b = points.vector_between(j, j + 1)?;
        let cross = b.cross(a);
        (!is_parallel(a, b, cross)).then_some(cross)
    })
}

/// Unit bending normal for `base_segment` at `local_fraction` within it.
///
/// The first segment looks forward only and the last backward only;
/// interior segments blend both sides, weighting the forward turn by
/// `local_fraction`. A side with no turn defers to the other.
pub(super) fn estimate_bend_normal(
    points: &GrowableXyzArray,
    base_segment: usize,
    local_fraction: f64,
) -> Option<Vector3> {
    let last_segment = points.len().checked_sub(2)?;
    let (weight_back, weight_forward) = if base_segment == 0 {
        (0.0, 1.0)
    } else if base_segment >= last_segment {
        (1.0, 0.0)
    } else {
        let f = local_fraction.clamp(0.0, 1.0);
        (1.0 - f, f)
    };
    let back = first_nonparallel_cross_backward(points, base_segment).and_then(Vector3::try_normalize);
    let forward = first_nonparallel_cross_forward(points, base_segment).and_then(Vector3::try_normalize);
    match (back, forward) {
        (Some(b), Some(f)) => {
            let blend = weight_back * b + weight_forward * f;
            blend
                .try_normalize()
                .or(Some(if weight_forward >= weight_back { f } else { b }))
        }
        (Some(b), None) => Some(b),
        (None, Some(f)) => Some(f),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve_math::DVec3;

    fn zigzag_with_collinear_run() -> GrowableXyzArray {
        GrowableXyzArray::from_points(&[
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(3.0, 0.0, 0.0),
            DVec3::new(3.0, 1.0, 0.0),
        ])
    }

    #[test]
    fn test_forward_search_skips_collinear_run() {
        let points = zigzag_with_collinear_run();
        let cross = first_nonparallel_cross_forward(&points, 0).unwrap();
        assert!((cross.normalize() - DVec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_backward_search_from_last() {
        let points = zigzag_with_collinear_run();
        let cross = first_nonparallel_cross_backward(&points, 3).unwrap();
        assert!((cross.normalize() - DVec3::Z).length() < 1e-12);
        assert!(first_nonparallel_cross_backward(&points, 2).is_none());
    }

    #[test]
    fn test_straight_line_has_no_normal() {
        let points = GrowableXyzArray::from_points(&[
            DVec3::ZERO,
            DVec3::X,
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(5.0, 0.0, 0.0),
        ]);
        for base in 0..3 {
            assert!(estimate_bend_normal(&points, base, 0.5).is_none());
        }
    }

    #[test]
    fn test_interior_blend() {
        // Left turn then right turn: the normal flips across the middle segment.
        let points = GrowableXyzArray::from_points(&[
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(2.0, 1.0, 0.0),
        ]);
        let near_start = estimate_bend_normal(&points, 1, 0.1).unwrap();
        let near_end = estimate_bend_normal(&points, 1, 0.9).unwrap();
        assert!((near_start - DVec3::Z).length() < 1e-12);
        assert!((near_end + DVec3::Z).length() < 1e-12);
        // Exact cancellation falls back to the forward turn.
        let middle = estimate_bend_normal(&points, 1, 0.5).unwrap();
        assert!((middle + DVec3::Z).length() < 1e-12);
    }
}
