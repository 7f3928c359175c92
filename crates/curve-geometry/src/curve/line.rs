//! Line segment curve.

use curve_core::traits::Validate;
use curve_core::{CurveError, CurveIdentity, CurveRef, Result, Tolerance};
use curve_math::scalar::{interpolate_point, is_sign_change};
use curve_math::{Aabb3, PlaneAltitudeEvaluator, Point3, Ray, Transform, Vector3};
use serde::{Deserialize, Serialize};

use super::{CurvePrimitive, LineString3d};
use crate::clip::ClipOracle;
use crate::detail::{
    CurveExtendOptions, CurveIntervalRole, CurveLocationDetail, CurveSearchStatus,
};
use crate::stroke::{StrokeHandler, StrokeOptions};

/// A line segment from `start` to `end`, parameterized over `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSegment3d {
    pub start: Point3,
    pub end: Point3,
    #[serde(skip)]
    identity: CurveIdentity,
}

impl LineSegment3d {
    pub fn new(start: Point3, end: Point3) -> Self {
        Self {
            start,
            end,
            identity: CurveIdentity::new(),
        }
    }

    /// Vector from start to end; also the derivative at every fraction.
    pub fn vector(&self) -> Vector3 {
        self.end - self.start
    }

    /// Replace both endpoints.
    pub fn set(&mut self, start: Point3, end: Point3) {
        self.start = start;
        self.end = end;
        self.identity.touch();
    }
}

impl Validate for LineSegment3d {
    fn validate(&self) -> Result<()> {
        if self.start.is_finite() && self.end.is_finite() {
            Ok(())
        } else {
            Err(CurveError::Geometry("line segment has non-finite endpoint".into()))
        }
    }
}

impl CurvePrimitive for LineSegment3d {
    fn curve_ref(&self) -> CurveRef {
        self.identity.curve_ref()
    }

    fn fraction_to_point(&self, fraction: f64) -> Point3 {
        interpolate_point(self.start, fraction, self.end)
    }

    fn fraction_to_point_and_derivative(&self, fraction: f64) -> Ray {
        Ray::new(self.fraction_to_point(fraction), self.vector())
    }

    fn start_point(&self) -> Point3 {
        self.start
    }

    fn end_point(&self) -> Point3 {
        self.end
    }

    fn curve_length(&self) -> f64 {
        self.start.distance(self.end)
    }

    fn curve_length_between_fractions(&self, fraction0: f64, fraction1: f64) -> f64 {
        (fraction1 - fraction0).abs() * self.curve_length()
    }

    fn move_signed_distance_from_fraction(
        &self,
        start_fraction: f64,
        signed_distance: f64,
        allow_extension: bool,
    ) -> CurveLocationDetail {
        let length = self.curve_length();
        let curve = self.curve_ref();
        if length == 0.0 {
            let status = if signed_distance == 0.0 {
                CurveSearchStatus::Success
            } else {
                CurveSearchStatus::StoppedAtBoundary
            };
            return CurveLocationDetail::new(curve, start_fraction, self.fraction_to_point(start_fraction))
                .with_distance(0.0)
                .with_status(status);
        }
        let target = start_fraction + signed_distance / length;
        if allow_extension || (0.0..=1.0).contains(&target) {
            return CurveLocationDetail::new(curve, target, self.fraction_to_point(target))
                .with_distance(signed_distance);
        }
        let fraction = target.clamp(0.0, 1.0);
        let moved = (fraction - start_fraction) * length;
        CurveLocationDetail::new(curve, fraction, self.fraction_to_point(fraction))
            .with_distance(moved)
            .with_status(CurveSearchStatus::StoppedAtBoundary)
    }

    fn closest_point(
        &self,
        space_point: Point3,
        extend: CurveExtendOptions,
    ) -> Option<CurveLocationDetail> {
        let mut fraction = Ray::between(self.start, self.end).fraction_of_projection(space_point);
        if fraction < 0.0 && !extend.start {
            fraction = 0.0;
        } else if fraction > 1.0 && !extend.end {
            fraction = 1.0;
        }
        let point = self.fraction_to_point(fraction);
        Some(CurveLocationDetail::new(self.curve_ref(), fraction, point).with_distance(point.distance(space_point)))
    }

    fn append_plane_intersection_points(
        &self,
        plane: &dyn PlaneAltitudeEvaluator,
        result: &mut Vec<CurveLocationDetail>,
    ) -> usize {
        let h0 = plane.altitude(self.start);
        let h1 = plane.altitude(self.end);
        let on0 = Tolerance::is_small_metric_distance(h0);
        let on1 = Tolerance::is_small_metric_distance(h1);
        let curve = self.curve_ref();
        let before = result.len();
        match (on0, on1) {
            (true, true) => {
                result.push(CurveLocationDetail::new(curve, 0.0, self.start).with_interval_role(CurveIntervalRole::IntervalStart));
                result.push(CurveLocationDetail::new(curve, 1.0, self.end).with_interval_role(CurveIntervalRole::IntervalEnd));
            }
            (true, false) => {
                result.push(CurveLocationDetail::new(curve, 0.0, self.start).with_interval_role(CurveIntervalRole::IsolatedAtVertex));
            }
            (false, true) => {
                result.push(CurveLocationDetail::new(curve, 1.0, self.end).with_interval_role(CurveIntervalRole::IsolatedAtVertex));
            }
            (false, false) => {
                if is_sign_change(h0, h1) {
                    let fraction = h0 / (h0 - h1);
                    result.push(
                        CurveLocationDetail::new(curve, fraction, self.fraction_to_point(fraction))
                            .with_interval_role(CurveIntervalRole::IsolatedPoint),
                    );
                }
            }
        }
        result.len() - before
    }

    fn announce_clip_intervals(
        &self,
        clipper: &dyn ClipOracle,
        announce: &mut dyn FnMut(f64, f64),
    ) -> bool {
        clipper.announce_clipped_segment_intervals(0.0, 1.0, self.start, self.end, announce)
    }

    fn clone_partial_curve(&self, fraction_a: f64, fraction_b: f64) -> Option<Box<dyn CurvePrimitive>> {
        Some(Box::new(LineSegment3d::new(
            self.fraction_to_point(fraction_a),
            self.fraction_to_point(fraction_b),
        )))
    }

    fn clone_box(&self) -> Box<dyn CurvePrimitive> {
        Box::new(self.clone())
    }

    fn emit_strokes(&self, dest: &mut LineString3d, options: Option<&StrokeOptions>) {
        let count = options.map_or(1, |o| o.apply_max_edge_length(1, self.curve_length()));
        dest.append_stroke_point(self.start);
        dest.append_interpolated_stroke_points(count, self.start, self.end, false);
        dest.append_stroke_point(self.end);
    }

    fn emit_strokable_parts(&self, handler: &mut dyn StrokeHandler, options: Option<&StrokeOptions>) {
        let count = options.map_or(1, |o| o.apply_max_edge_length(1, self.curve_length()));
        handler.start_primitive(self);
        handler.announce_segment_interval(self, self.start, self.end, count, 0.0, 1.0);
        handler.end_primitive(self);
    }

    fn fraction_to_frenet_frame(&self, fraction: f64) -> Transform {
        let origin = self.fraction_to_point(fraction);
        Transform::rigid_heads_up(origin, self.vector()).unwrap_or_else(|| Transform::from_translation(origin))
    }

    fn reverse_in_place(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
        self.identity.touch();
    }

    fn try_transform_in_place(&mut self, transform: &Transform) -> Result<()> {
        self.start = transform.transform_point(self.start);
        self.end = transform.transform_point(self.end);
        self.identity.touch();
        Ok(())
    }

    fn range(&self) -> Option<Aabb3> {
        Aabb3::from_points(&[self.start, self.end])
    }
}
