//! Distance marching along piecewise-linear paths.

use curve_core::Tolerance;
use curve_math::scalar::{interpolate, interpolate_point, safe_divide_fraction};
use curve_math::Point3;

use crate::growable::GrowableXyzArray;

/// Accumulates distance vertex by vertex until a target distance is met.
///
/// Built fresh for each marching call. `point0`/`fraction0` track the most
/// recently reached position and `distance0` the distance walked so far;
/// once the target is reached they hold the exact target position.
#[derive(Debug, Clone)]
pub struct MoveByDistanceContext {
    pub point0: Point3,
    pub fraction0: f64,
    pub distance0: f64,
    /// Always non-negative.
    pub target_distance: f64,
}

impl MoveByDistanceContext {
    pub fn new(point0: Point3, fraction0: f64, target_distance: f64) -> Self {
        Self {
            point0,
            fraction0,
            distance0: 0.0,
            target_distance: target_distance.abs(),
        }
    }

    /// Distance still to walk.
    pub fn residual(&self) -> f64 {
        self.target_distance - self.distance0
    }

    /// Walk to `point1` (at curve fraction `fraction1`).
    ///
    /// Returns true when the target distance falls on this step; the
    /// context then holds the exact target point, interpolated between the
    /// previous position and `point1`. Returns false when the step was
    /// absorbed whole and the walk must continue.
    pub fn announce_point(&mut self, point1: Point3, fraction1: f64) -> bool {
        let step = self.point0.distance(point1);
        let distance1 = self.distance0 + step;
        if Tolerance::is_same_coordinate(distance1, self.target_distance) {
            self.point0 = point1;
            self.fraction0 = fraction1;
            self.distance0 = self.target_distance;
            return true;
        }
        if distance1 < self.target_distance {
            self.point0 = point1;
            self.fraction0 = fraction1;
            self.distance0 = distance1;
            return false;
        }
        let step_fraction = safe_divide_fraction(self.residual(), step, 0.0).clamp(0.0, 1.0);
        self.point0 = interpolate_point(self.point0, step_fraction, point1);
        self.fraction0 = interpolate(self.fraction0, step_fraction, fraction1);
        self.distance0 = self.target_distance;
        true
    }

    /// Continue past the curve end along the boundary segment.
    ///
    /// `inner_index` and `boundary_index` are adjacent vertices of `points`
    /// with `boundary_index` being the end the walk stopped at; the
    /// fractions are their curve fractions. Returns false (and leaves the
    /// context unchanged) when that segment has zero length.
    pub fn announce_extrapolation(
        &mut self,
        points: &GrowableXyzArray,
        inner_index: usize,
        boundary_index: usize,
        inner_fraction: f64,
        boundary_fraction: f64,
    ) -> bool {
        let Some(edge_length) = points.distance_between(inner_index, boundary_index) else {
            return false;
        };
        if edge_length == 0.0 {
            log::debug!("cannot extrapolate along zero-length end segment {inner_index}..{boundary_index}");
            return false;
        }
        let edge_fraction = 1.0 + self.residual() / edge_length;
        let Some(point) = points.interpolate(inner_index, edge_fraction, boundary_index) else {
            return false;
        };
        self.point0 = point;
        self.fraction0 = interpolate(inner_fraction, edge_fraction, boundary_fraction);
        self.distance0 = self.target_distance;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve_math::DVec3;

    #[test]
    fn test_short_step_is_absorbed() {
        let mut context = MoveByDistanceContext::new(DVec3::ZERO, 0.0, 5.0);
        assert!(!context.announce_point(DVec3::new(2.0, 0.0, 0.0), 0.5));
        assert_eq!(context.distance0, 2.0);
        assert_eq!(context.fraction0, 0.5);
        assert_eq!(context.residual(), 3.0);
    }

    #[test]
    fn test_crossing_step_interpolates() {
        let mut context = MoveByDistanceContext::new(DVec3::ZERO, 0.0, 1.0);
        assert!(context.announce_point(DVec3::new(4.0, 0.0, 0.0), 1.0));
        assert!((context.point0 - DVec3::new(1.0, 0.0, 0.0)).length() < 1e-12);
        assert!((context.fraction0 - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_snap_to_target() {
        let mut context = MoveByDistanceContext::new(DVec3::ZERO, 0.0, 1.0 + 1e-9);
        assert!(context.announce_point(DVec3::new(1.0, 0.0, 0.0), 1.0));
        assert_eq!(context.point0, DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(context.fraction0, 1.0);
    }

    #[test]
    fn test_negative_target_is_absolute() {
        let context = MoveByDistanceContext::new(DVec3::ZERO, 0.3, -2.5);
        assert_eq!(context.target_distance, 2.5);
    }

    #[test]
    fn test_extrapolation() {
        let points = GrowableXyzArray::from_points(&[DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0)]);
        let mut context = MoveByDistanceContext::new(DVec3::ZERO, 0.0, 3.0);
        assert!(!context.announce_point(DVec3::new(2.0, 0.0, 0.0), 1.0));
        assert!(context.announce_extrapolation(&points, 0, 1, 0.0, 1.0));
        assert!((context.point0 - DVec3::new(3.0, 0.0, 0.0)).length() < 1e-12);
        assert!((context.fraction0 - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_extrapolation_zero_length_fails() {
        let points = GrowableXyzArray::from_points(&[DVec3::X, DVec3::X]);
        let mut context = MoveByDistanceContext::new(DVec3::X, 1.0, 3.0);
        assert!(!context.announce_extrapolation(&points, 0, 1, 0.0, 1.0));
        assert_eq!(context.point0, DVec3::X);
    }
}
