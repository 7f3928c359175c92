//! Tessellation utilities for converting curve primitives to linestrings.

use curve_math::Point3;

use crate::curve::{CurvePrimitive, LineString3d};
use crate::stroke::{StrokeCollector, StrokeOptions};

/// Maximum recursion depth for adaptive subdivision.
const MAX_DEPTH: u32 = 12;

/// Stroke `curve` into a fresh linestring.
pub fn stroke_to_linestring(curve: &dyn CurvePrimitive, options: Option<&StrokeOptions>) -> LineString3d {
    let mut dest = LineString3d::new();
    curve.emit_strokes(&mut dest, options);
    dest
}

/// Convert a curve to a linestring using adaptive subdivision.
///
/// Starts from the curve's default stroke intervals and recursively halves
/// any interval whose midpoint deviates from the chord by more than
/// `chord_tolerance`.
pub fn adaptive_strokes(curve: &dyn CurvePrimitive, chord_tolerance: f64) -> LineString3d {
    let mut seeds = StrokeCollector::new();
    curve.emit_strokable_parts(&mut seeds, None);
    let fractions = seeds.fractions();

    let mut dest = LineString3d::new();
    let Some(&first) = fractions.first() else {
        return dest;
    };
    dest.append_stroke_point(curve.fraction_to_point(first));
    for pair in fractions.windows(2) {
        subdivide(curve, pair[0], pair[1], chord_tolerance, &mut dest, 0);
    }
    log::trace!(
        "adaptive strokes: {} seed points refined to {}",
        fractions.len(),
        dest.num_points()
    );
    dest
}

fn subdivide(
    curve: &dyn CurvePrimitive,
    f0: f64,
    f1: f64,
    tolerance: f64,
    dest: &mut LineString3d,
    depth: u32,
) {
    let p1 = curve.fraction_to_point(f1);
    if depth >= MAX_DEPTH {
        dest.append_stroke_point(p1);
        return;
    }

    let f_mid = 0.5 * (f0 + f1);
    let p0 = curve.fraction_to_point(f0);
    let p_mid = curve.fraction_to_point(f_mid);

    // Chord midpoint
    let chord_mid: Point3 = (p0 + p1) * 0.5;
    if (p_mid - chord_mid).length() > tolerance {
        subdivide(curve, f0, f_mid, tolerance, dest, depth + 1);
        subdivide(curve, f_mid, f1, tolerance, dest, depth + 1);
    } else {
        dest.append_stroke_point(p1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{Arc3d, LineSegment3d};
    use curve_math::DVec3;
    use std::f64::consts::PI;

    #[test]
    fn test_line_is_not_subdivided() {
        let line = LineSegment3d::new(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0));
        let strokes = adaptive_strokes(&line, 0.01);
        assert_eq!(strokes.num_points(), 2);
        assert!((strokes.end_point() - DVec3::new(10.0, 0.0, 0.0)).length() < 1e-10);
    }

    #[test]
    fn test_linestring_keeps_vertices() {
        // Symmetric square: a plain midpoint test over [0, 1] would miss
        // the corners, the seeded intervals do not.
        let square = LineString3d::rectangle_xy(0.0, 0.0, 1.0, 1.0, 0.0);
        let strokes = adaptive_strokes(&square, 0.01);
        assert_eq!(strokes.points(), square.points());
    }

    #[test]
    fn test_circle_refines_to_tolerance() {
        let circle = Arc3d::circular_xy(DVec3::ZERO, 1.0, 0.0, 2.0 * PI);
        let strokes = adaptive_strokes(&circle, 0.001);
        assert!(strokes.num_points() > 17, "got {}", strokes.num_points());
        for p in strokes.points() {
            assert!((p.length() - 1.0).abs() < 1e-10);
        }
        for i in 1..strokes.num_points() {
            let a = strokes.point_at(i - 1).unwrap();
            let b = strokes.point_at(i).unwrap();
            // Sagitta of each chord stays under the tolerance.
            assert!(1.0 - (0.5 * (a + b)).length() <= 0.001 + 1e-12);
        }
    }

    #[test]
    fn test_empty_curve() {
        assert_eq!(adaptive_strokes(&LineString3d::new(), 0.1).num_points(), 0);
    }

    #[test]
    fn test_stroke_to_linestring() {
        let arc = Arc3d::circular_xy(DVec3::ZERO, 1.0, 0.0, PI);
        let strokes = stroke_to_linestring(&arc, None);
        assert_eq!(strokes.num_points(), 9);
    }
}
