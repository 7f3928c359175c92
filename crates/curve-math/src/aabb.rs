use crate::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Axis-aligned range of a curve or point set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb3 {
    pub min: Point3,
    pub max: Point3,
}

impl Aabb3 {
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Tightest range around `points`; `None` when there are none.
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut range = Self::new(*first, *first);
        for &p in rest {
            range.extend_point(p);
        }
        Some(range)
    }

    /// Grow the range to include `p`.
    pub fn extend_point(&mut self, p: Point3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn diagonal(&self) -> Vector3 {
        self.max - self.min
    }

    /// Inclusive containment, widened by `tolerance` on every side.
    pub fn contains_point(&self, p: Point3, tolerance: f64) -> bool {
        let pad = Vector3::splat(tolerance);
        p.cmpge(self.min - pad).all() && p.cmple(self.max + pad).all()
    }
}
