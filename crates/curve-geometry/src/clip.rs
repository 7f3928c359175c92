//! Clip oracles: classify pieces of curves against a clip region.

use curve_core::Tolerance;
use curve_math::scalar::interpolate;
use curve_math::{Plane, PlaneAltitudeEvaluator, Point3};

use crate::curve::{Arc3d, CurvePrimitive};

/// Capability that finds the parts of a curve piece inside a clip region.
///
/// Implementations call `announce(fraction0, fraction1)` once per inside
/// interval, in increasing fraction order, and return whether anything
/// was announced.
pub trait ClipOracle {
    /// Clip the straight piece `point0..point1`, which the caller
    /// identifies with the fraction range `fraction0..fraction1`.
    fn announce_clipped_segment_intervals(
        &self,
        fraction0: f64,
        fraction1: f64,
        point0: Point3,
        point1: Point3,
        announce: &mut dyn FnMut(f64, f64),
    ) -> bool;

    /// Clip a circular arc; fractions are the arc's own.
    fn announce_clipped_arc_intervals(
        &self,
        arc: &Arc3d,
        announce: &mut dyn FnMut(f64, f64),
    ) -> bool;
}

/// Intersection of half-spaces. Each plane's normal points into the
/// region; points within [`Tolerance::SMALL_METRIC_DISTANCE`] of a plane
/// count as inside.
#[derive(Debug, Clone, Default)]
pub struct ConvexClipPlaneSet {
    planes: Vec<Plane>,
}

impl ConvexClipPlaneSet {
    pub fn new(planes: Vec<Plane>) -> Self {
        Self { planes }
    }

    /// Slab `low <= x <= high` along `axis` (through the origin).
    pub fn from_slab(axis: curve_math::Vector3, low: f64, high: f64) -> Option<Self> {
        let unit = axis.try_normalize()?;
        Some(Self::new(vec![
            Plane::new(unit * low, unit),
            Plane::new(unit * high, -unit),
        ]))
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn add_plane(&mut self, plane: Plane) {
        self.planes.push(plane);
    }

    pub fn is_point_inside(&self, point: Point3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.altitude(point) >= -Tolerance::SMALL_METRIC_DISTANCE)
    }
}

impl ClipOracle for ConvexClipPlaneSet {
    fn announce_clipped_segment_intervals(
        &self,
        fraction0: f64,
        fraction1: f64,
        point0: Point3,
        point1: Point3,
        announce: &mut dyn FnMut(f64, f64),
    ) -> bool {
        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;
        for plane in &self.planes {
            let h0 = snap_altitude(plane.altitude(point0));
            let h1 = snap_altitude(plane.altitude(point1));
            if h0 < 0.0 && h1 < 0.0 {
                return false;
            }
            if h0 >= 0.0 && h1 >= 0.0 {
                continue;
            }
            // Exactly one end is outside, so h0 != h1.
            let t = h0 / (h0 - h1);
            if h0 < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
            if t1 < t0 {
                return false;
            }
        }
        if t1 - t0 <= Tolerance::SMALL_FRACTION && point0 != point1 {
            return false;
        }
        announce(
            interpolate(fraction0, t0, fraction1),
            interpolate(fraction0, t1, fraction1),
        );
        true
    }

    fn announce_clipped_arc_intervals(
        &self,
        arc: &Arc3d,
        announce: &mut dyn FnMut(f64, f64),
    ) -> bool {
        let mut breaks = vec![0.0, 1.0];
        let mut hits = Vec::new();
        for plane in &self.planes {
            hits.clear();
            arc.append_plane_intersection_points(plane, &mut hits);
            breaks.extend(hits.iter().map(|d| d.fraction));
        }
        breaks.sort_by(f64::total_cmp);
        breaks.dedup_by(|b, a| (*b - *a).abs() <= Tolerance::SMALL_FRACTION);

        let mut intervals: Vec<(f64, f64)> = Vec::new();
        for pair in breaks.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if !self.is_point_inside(arc.fraction_to_point(0.5 * (a + b))) {
                continue;
            }
            match intervals.last_mut() {
                Some(last) if (last.1 - a).abs() <= Tolerance::SMALL_FRACTION => last.1 = b,
                _ => intervals.push((a, b)),
            }
        }
        for &(a, b) in &intervals {
            announce(a, b);
        }
        !intervals.is_empty()
    }
}

fn snap_altitude(h: f64) -> f64 {
    if Tolerance::is_small_metric_distance(h) {
        0.0
    } else {
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve_math::{DVec3, Vector3};

    fn slab() -> ConvexClipPlaneSet {
        ConvexClipPlaneSet::from_slab(Vector3::X, 1.0, 3.0).unwrap()
    }

    #[test]
    fn test_segment_crossing_slab() {
        let mut found = Vec::new();
        let hit = slab().announce_clipped_segment_intervals(
            0.0,
            1.0,
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(4.0, 0.0, 0.0),
            &mut |a, b| found.push((a, b)),
        );
        assert!(hit);
        assert_eq!(found.len(), 1);
        assert!((found[0].0 - 0.25).abs() < 1e-12);
        assert!((found[0].1 - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_segment_outside() {
        let mut count = 0;
        let hit = slab().announce_clipped_segment_intervals(
            0.0,
            1.0,
            DVec3::new(5.0, 0.0, 0.0),
            DVec3::new(6.0, 0.0, 0.0),
            &mut |_, _| count += 1,
        );
        assert!(!hit);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_fraction_range_mapping() {
        let mut found = Vec::new();
        slab().announce_clipped_segment_intervals(
            0.5,
            1.0,
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
            &mut |a, b| found.push((a, b)),
        );
        assert_eq!(found.len(), 1);
        assert!((found[0].0 - 0.75).abs() < 1e-12);
        assert!((found[0].1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_arc_clip() {
        // Upper half of the unit circle clipped to x >= 0 keeps the first half.
        let arc = Arc3d::circular_xy(DVec3::ZERO, 1.0, 0.0, std::f64::consts::PI);
        let set = ConvexClipPlaneSet::new(vec![Plane::new(DVec3::ZERO, Vector3::X)]);
        let mut found = Vec::new();
        assert!(set.announce_clipped_arc_intervals(&arc, &mut |a, b| found.push((a, b))));
        assert_eq!(found.len(), 1);
        assert!(found[0].0.abs() < 1e-12);
        assert!((found[0].1 - 0.5).abs() < 1e-9);
    }
}
