//! Packed xyz coordinate buffer.

use curve_math::{Aabb3, Point3, Transform, Vector3};
use serde::{Deserialize, Serialize};

use curve_math::scalar::interpolate_point;

/// Resizable sequence of 3D points stored as flat `[x0, y0, z0, x1, ...]`.
///
/// Index order is the path order of whatever curve owns the buffer.
/// Index-taking accessors return `None` for out-of-range indices; the
/// `_unchecked` variants panic instead and are meant for loops that have
/// already bounded the index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowableXyzArray {
    data: Vec<f64>,
}

impl GrowableXyzArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(num_points: usize) -> Self {
        Self {
            data: Vec::with_capacity(3 * num_points),
        }
    }

    pub fn from_points(points: &[Point3]) -> Self {
        let mut array = Self::with_capacity(points.len());
        array.extend_from_slice(points);
        array
    }

    /// Build from packed xyz values. A trailing partial triple is dropped.
    pub fn from_flat(values: &[f64]) -> Self {
        let whole = values.len() - values.len() % 3;
        Self {
            data: values[..whole].to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn push(&mut self, p: Point3) {
        self.data.extend_from_slice(&[p.x, p.y, p.z]);
    }

    pub fn push_xyz(&mut self, x: f64, y: f64, z: f64) {
        self.data.extend_from_slice(&[x, y, z]);
    }

    pub fn pop(&mut self) -> Option<Point3> {
        let p = self.back()?;
        self.data.truncate(self.data.len() - 3);
        Some(p)
    }

    pub fn extend_from_slice(&mut self, points: &[Point3]) {
        self.data.reserve(3 * points.len());
        for p in points {
            self.push(*p);
        }
    }

    /// Append point `index` of `other`. Returns false if `index` is out of range.
    pub fn push_from_other(&mut self, other: &GrowableXyzArray, index: usize) -> bool {
        match other.get_point(index) {
            Some(p) => {
                self.push(p);
                true
            }
            None => false,
        }
    }

    pub fn get_point(&self, index: usize) -> Option<Point3> {
        if index < self.len() {
            Some(self.point_at_unchecked(index))
        } else {
            None
        }
    }

    pub fn point_at_unchecked(&self, index: usize) -> Point3 {
        let i = 3 * index;
        Point3::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// Replace point `index`. Returns false if `index` is out of range.
    pub fn set_point(&mut self, index: usize, p: Point3) -> bool {
        if index >= self.len() {
            return false;
        }
        let i = 3 * index;
        self.data[i] = p.x;
        self.data[i + 1] = p.y;
        self.data[i + 2] = p.z;
        true
    }

    pub fn front(&self) -> Option<Point3> {
        self.get_point(0)
    }

    pub fn back(&self) -> Option<Point3> {
        self.len().checked_sub(1).map(|i| self.point_at_unchecked(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = Point3> + '_ {
        self.data
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
    }

    pub fn to_points(&self) -> Vec<Point3> {
        self.iter().collect()
    }

    pub fn as_flat(&self) -> &[f64] {
        &self.data
    }

    /// Point at `fraction` from point `i` towards point `j`. Fractions
    /// outside [0, 1] extrapolate along the same line.
    pub fn interpolate(&self, i: usize, fraction: f64, j: usize) -> Option<Point3> {
        let a = self.get_point(i)?;
        let b = self.get_point(j)?;
        Some(interpolate_point(a, fraction, b))
    }

    /// Vector from point `i` to point `j`.
    pub fn vector_between(&self, i: usize, j: usize) -> Option<Vector3> {
        Some(self.get_point(j)? - self.get_point(i)?)
    }

    pub fn distance_between(&self, i: usize, j: usize) -> Option<f64> {
        self.vector_between(i, j).map(Vector3::length)
    }

    pub fn distance_to_point(&self, i: usize, p: Point3) -> Option<f64> {
        self.get_point(i).map(|q| q.distance(p))
    }

    /// Sum of distances between consecutive points.
    pub fn sum_lengths(&self) -> f64 {
        let mut sum = 0.0;
        let mut previous: Option<Point3> = None;
        for p in self.iter() {
            if let Some(q) = previous {
                sum += q.distance(p);
            }
            previous = Some(p);
        }
        sum
    }

    pub fn transform_in_place(&mut self, transform: &Transform) {
        let m = transform.to_mat4();
        for c in self.data.chunks_exact_mut(3) {
            let p = m.transform_point3(Point3::new(c[0], c[1], c[2]));
            c[0] = p.x;
            c[1] = p.y;
            c[2] = p.z;
        }
    }

    pub fn reverse_in_place(&mut self) {
        let n = self.len();
        for i in 0..n / 2 {
            let j = n - 1 - i;
            for k in 0..3 {
                self.data.swap(3 * i + k, 3 * j + k);
            }
        }
    }

    pub fn range(&self) -> Option<Aabb3> {
        let mut points = self.iter();
        let first = points.next()?;
        let mut range = Aabb3::new(first, first);
        for p in points {
            range.extend_point(p);
        }
        Some(range)
    }

    /// Same length and every point within `tolerance` of its counterpart.
    pub fn is_almost_equal(&self, other: &GrowableXyzArray, tolerance: f64) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.distance(b) <= tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve_math::DVec3;

    fn sample() -> GrowableXyzArray {
        GrowableXyzArray::from_points(&[
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(3.0, 0.0, 0.0),
            DVec3::new(3.0, 4.0, 0.0),
        ])
    }

    #[test]
    fn test_push_and_get() {
        let mut array = GrowableXyzArray::new();
        assert!(array.is_empty());
        array.push_xyz(1.0, 2.0, 3.0);
        array.push(DVec3::new(4.0, 5.0, 6.0));
        assert_eq!(array.len(), 2);
        assert_eq!(array.get_point(1), Some(DVec3::new(4.0, 5.0, 6.0)));
        assert_eq!(array.get_point(2), None);
        assert_eq!(array.front(), Some(DVec3::new(1.0, 2.0, 3.0)));
        assert_eq!(array.pop(), Some(DVec3::new(4.0, 5.0, 6.0)));
        assert_eq!(array.len(), 1);
    }

    #[test]
    fn test_from_flat_drops_partial_triple() {
        let array = GrowableXyzArray::from_flat(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(array.len(), 1);
        assert_eq!(array.as_flat(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_distances() {
        let array = sample();
        assert_eq!(array.distance_between(0, 1), Some(3.0));
        assert_eq!(array.distance_between(0, 2), Some(5.0));
        assert_eq!(array.distance_between(0, 3), None);
        assert!((array.sum_lengths() - 7.0).abs() < 1e-12);
        assert_eq!(array.distance_to_point(2, DVec3::new(3.0, 4.0, 2.0)), Some(2.0));
    }

    #[test]
    fn test_interpolate_extrapolates() {
        let array = sample();
        let p = array.interpolate(0, 0.5, 1).unwrap();
        assert!((p - DVec3::new(1.5, 0.0, 0.0)).length() < 1e-12);
        let q = array.interpolate(0, 2.0, 1).unwrap();
        assert!((q - DVec3::new(6.0, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_reverse_twice_is_identity() {
        let original = sample();
        let mut array = original.clone();
        array.reverse_in_place();
        assert_eq!(array.front(), original.back());
        array.reverse_in_place();
        assert_eq!(array, original);
    }

    #[test]
    fn test_transform_in_place() {
        let mut array = sample();
        array.transform_in_place(&Transform::from_translation(DVec3::new(0.0, 0.0, 1.0)));
        assert!(array.iter().all(|p| (p.z - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_range() {
        assert!(GrowableXyzArray::new().range().is_none());
        let range = sample().range().unwrap();
        assert_eq!(range.min, DVec3::ZERO);
        assert_eq!(range.max, DVec3::new(3.0, 4.0, 0.0));
    }
}
