use crate::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A point and a direction vector.
///
/// The direction is kept at whatever magnitude the caller supplies, so a
/// ray doubles as a point-and-derivative pair: `at(t)` is
/// `origin + t * direction`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vector3,
}

impl Ray {
    pub fn new(origin: Point3, direction: Vector3) -> Self {
        Self { origin, direction }
    }

    /// Ray with a unit direction, or `None` for a zero direction.
    pub fn new_normalized(origin: Point3, direction: Vector3) -> Option<Self> {
        direction
            .try_normalize()
            .map(|direction| Self { origin, direction })
    }

    /// Ray from `start` through `end`, with `at(1.0) == end`.
    pub fn between(start: Point3, end: Point3) -> Self {
        Self::new(start, end - start)
    }

    /// Get a point along the ray at parameter t.
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Scale the direction to unit length. Returns false (leaving the ray
    /// untouched) when the direction has zero length.
    pub fn try_normalize_in_place(&mut self) -> bool {
        match self.direction.try_normalize() {
            Some(unit) => {
                self.direction = unit;
                true
            }
            None => false,
        }
    }

    /// Parameter of the perpendicular projection of `point`, unclamped.
    /// Zero for a zero-length direction.
    pub fn fraction_of_projection(&self, point: Point3) -> f64 {
        let dd = self.direction.length_squared();
        if dd == 0.0 {
            return 0.0;
        }
        (point - self.origin).dot(self.direction) / dd
    }

    /// Find the closest point on the ray to a given point.
    pub fn closest_point(&self, point: Point3) -> Point3 {
        let t = self.fraction_of_projection(point).max(0.0);
        self.at(t)
    }

    /// Distance from a point to the ray.
    pub fn distance_to_point(&self, point: Point3) -> f64 {
        (point - self.closest_point(point)).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec3;

    #[test]
    fn test_at() {
        let ray = Ray::new(dvec3(0.0, 0.0, 0.0), dvec3(2.0, 0.0, 0.0));
        let p = ray.at(2.5);
        assert!((p - dvec3(5.0, 0.0, 0.0)).length() < 1e-10);
    }

    #[test]
    fn test_distance_to_point() {
        let ray = Ray::new(dvec3(0.0, 0.0, 0.0), dvec3(1.0, 0.0, 0.0));
        let dist = ray.distance_to_point(dvec3(5.0, 3.0, 0.0));
        assert!((dist - 3.0).abs() < 1e-10);
        // Behind the origin the ray start is closest.
        let dist = ray.distance_to_point(dvec3(-4.0, 3.0, 0.0));
        assert!((dist - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_fraction_of_projection() {
        let ray = Ray::between(dvec3(1.0, 0.0, 0.0), dvec3(3.0, 0.0, 0.0));
        assert!((ray.fraction_of_projection(dvec3(2.0, 7.0, 0.0)) - 0.5).abs() < 1e-12);
        assert!((ray.fraction_of_projection(dvec3(-1.0, 0.0, 0.0)) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_zero_direction_fails() {
        let mut ray = Ray::new(dvec3(1.0, 2.0, 3.0), Vector3::ZERO);
        assert!(!ray.try_normalize_in_place());
        assert_eq!(ray.direction, Vector3::ZERO);

        let mut ray = Ray::new(dvec3(1.0, 2.0, 3.0), dvec3(0.0, 3.0, 4.0));
        assert!(ray.try_normalize_in_place());
        assert!((ray.direction.length() - 1.0).abs() < 1e-12);
    }
}
