//! The curve-primitive contract and its implementations.
//!
//! Every primitive is parameterized by a fraction in `[0, 1]`. Fractions
//! are not necessarily proportional to arc length: a linestring spreads
//! them uniformly over its segments regardless of segment length.

mod arc;
mod frenet;
mod line;
mod linestring;
mod marching;

use curve_core::{CurveRef, Result};
use curve_math::{Aabb3, PlaneAltitudeEvaluator, Point3, Ray, Transform};

pub use arc::Arc3d;
pub use line::LineSegment3d;
pub use linestring::LineString3d;
pub use marching::MoveByDistanceContext;

use crate::clip::ClipOracle;
use crate::detail::{CurveExtendOptions, CurveLocationDetail};
use crate::stroke::{StrokeHandler, StrokeOptions};

/// Operations shared by every curve representation.
pub trait CurvePrimitive: Send + Sync + std::fmt::Debug {
    /// Identity and revision, for the back-reference in location details.
    fn curve_ref(&self) -> CurveRef;

    /// Evaluate the curve at `fraction`.
    fn fraction_to_point(&self, fraction: f64) -> Point3;

    /// Point and derivative with respect to fraction.
    fn fraction_to_point_and_derivative(&self, fraction: f64) -> Ray;

    /// Point and unit tangent. The direction is zero where the derivative
    /// vanishes.
    fn fraction_to_point_and_unit_tangent(&self, fraction: f64) -> Ray {
        let ray = self.fraction_to_point_and_derivative(fraction);
        Ray::new(ray.origin, ray.direction.normalize_or_zero())
    }

    fn start_point(&self) -> Point3 {
        self.fraction_to_point(0.0)
    }

    fn end_point(&self) -> Point3 {
        self.fraction_to_point(1.0)
    }

    /// Exact arc length.
    fn curve_length(&self) -> f64;

    /// Cheap length estimate; defaults to the exact length.
    fn quick_length(&self) -> f64 {
        self.curve_length()
    }

    /// Arc length between two fractions, unsigned and symmetric in its
    /// arguments.
    fn curve_length_between_fractions(&self, fraction0: f64, fraction1: f64) -> f64;

    /// Walk `signed_distance` along the curve from `start_fraction`.
    ///
    /// Stops at the curve end with `StoppedAtBoundary` unless
    /// `allow_extension` lets it continue past the end (along the end
    /// segment for linestrings, around the circle for arcs).
    fn move_signed_distance_from_fraction(
        &self,
        start_fraction: f64,
        signed_distance: f64,
        allow_extension: bool,
    ) -> CurveLocationDetail;

    /// Closest point to `space_point`; `a` holds the distance. `None` only
    /// for curves with no points at all.
    fn closest_point(
        &self,
        space_point: Point3,
        extend: CurveExtendOptions,
    ) -> Option<CurveLocationDetail>;

    /// Append details for every point where the curve meets the plane.
    /// Returns the number appended.
    fn append_plane_intersection_points(
        &self,
        plane: &dyn PlaneAltitudeEvaluator,
        result: &mut Vec<CurveLocationDetail>,
    ) -> usize;

    /// Announce the fraction intervals that the oracle classifies as
    /// inside. Returns whether anything was announced.
    fn announce_clip_intervals(
        &self,
        clipper: &dyn ClipOracle,
        announce: &mut dyn FnMut(f64, f64),
    ) -> bool;

    /// Copy of the part between two fractions, reversed if
    /// `fraction_b < fraction_a`. `None` when the range misses a curve
    /// that cannot be extended.
    fn clone_partial_curve(&self, fraction_a: f64, fraction_b: f64)
        -> Option<Box<dyn CurvePrimitive>>;

    fn clone_box(&self) -> Box<dyn CurvePrimitive>;

    /// Transformed copy, or `None` if this representation cannot carry the
    /// transform.
    fn clone_transformed(&self, transform: &Transform) -> Option<Box<dyn CurvePrimitive>> {
        let mut copy = self.clone_box();
        copy.try_transform_in_place(transform).ok()?;
        Some(copy)
    }

    /// Append a piecewise-linear approximation to `dest`.
    fn emit_strokes(&self, dest: &mut LineString3d, options: Option<&StrokeOptions>);

    /// Announce stroke intervals to `handler`.
    fn emit_strokable_parts(&self, handler: &mut dyn StrokeHandler, options: Option<&StrokeOptions>);

    /// Rigid frame at `fraction` with x along the tangent and z along the
    /// local bending normal. Degenerates to a translation (or identity
    /// for empty curves) when no such frame exists.
    fn fraction_to_frenet_frame(&self, fraction: f64) -> Transform;

    fn reverse_in_place(&mut self);

    fn try_transform_in_place(&mut self, transform: &Transform) -> Result<()>;

    fn range(&self) -> Option<Aabb3>;

    fn is_physically_closed(&self) -> bool {
        self.start_point().distance(self.end_point()) <= curve_core::Tolerance::SMALL_METRIC_DISTANCE
    }
}

impl Clone for Box<dyn CurvePrimitive> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

