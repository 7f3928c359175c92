//! Circular arc curve.

use std::f64::consts::TAU;

use curve_core::traits::Validate;
use curve_core::{CurveError, CurveIdentity, CurveRef, Result, Tolerance};
use curve_math::{Aabb3, PlaneAltitudeEvaluator, Point3, Ray, Transform, Vector3};
use serde::{Deserialize, Serialize};

use super::{CurvePrimitive, LineString3d};
use crate::clip::ClipOracle;
use crate::detail::{
    CurveExtendOptions, CurveIntervalRole, CurveLocationDetail, CurveSearchStatus,
};
use crate::stroke::{StrokeHandler, StrokeOptions};

/// Relative tolerance for the perpendicular, equal-length axis check.
const CIRCULARITY_TOLERANCE: f64 = 1e-9;

/// A circular arc: `center + cos(theta) * vector0 + sin(theta) * vector90`
/// for `theta = start_angle + fraction * sweep`.
///
/// `vector0` and `vector90` are perpendicular and of equal length (the
/// radius). A negative sweep runs clockwise as seen from
/// `vector0 x vector90`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arc3d {
    pub center: Point3,
    pub vector0: Vector3,
    pub vector90: Vector3,
    /// Radians.
    pub start_angle: f64,
    /// Radians; may be negative.
    pub sweep: f64,
    #[serde(skip)]
    identity: CurveIdentity,
}

impl Arc3d {
    pub fn new(
        center: Point3,
        vector0: Vector3,
        vector90: Vector3,
        start_angle: f64,
        sweep: f64,
    ) -> Self {
        Self {
            center,
            vector0,
            vector90,
            start_angle,
            sweep,
            identity: CurveIdentity::new(),
        }
    }

    /// Arc in the plane `z = center.z`, angles measured from +x toward +y.
    pub fn circular_xy(center: Point3, radius: f64, start_angle: f64, sweep: f64) -> Self {
        Self::new(center, Vector3::X * radius, Vector3::Y * radius, start_angle, sweep)
    }

    /// Arc around `normal`, with the angle reference picked from whichever
    /// global axis is least parallel to the normal.
    pub fn from_center_normal_radius(
        center: Point3,
        normal: Vector3,
        radius: f64,
        start_angle: f64,
        sweep: f64,
    ) -> Option<Self> {
        let n = normal.try_normalize()?;
        let reference = if n.x.abs() < 0.9 { Vector3::X } else { Vector3::Y };
        let u = n.cross(reference).try_normalize()?;
        let v = n.cross(u);
        Some(Self::new(center, u * radius, v * radius, start_angle, sweep))
    }

    pub fn radius(&self) -> f64 {
        self.vector0.length()
    }

    /// Unit normal `vector0 x vector90`; zero for a degenerate arc.
    pub fn normal(&self) -> Vector3 {
        self.vector0.cross(self.vector90).normalize_or_zero()
    }

    pub fn is_full_circle(&self) -> bool {
        (self.sweep.abs() - TAU).abs() <= Tolerance::SMALL_FRACTION
    }

    pub fn fraction_to_angle(&self, fraction: f64) -> f64 {
        self.start_angle + fraction * self.sweep
    }

    fn angle_to_point(&self, theta: f64) -> Point3 {
        self.center + theta.cos() * self.vector0 + theta.sin() * self.vector90
    }

    /// Fraction at which the sweep first reaches `theta`, in
    /// `[0, 2pi / |sweep|)`. Zero for a zero sweep.
    fn angle_to_fraction(&self, theta: f64) -> f64 {
        if self.sweep == 0.0 {
            return 0.0;
        }
        let along = (self.sweep.signum() * (theta - self.start_angle)).rem_euclid(TAU);
        // Just short of a full turn back to the start is the start itself.
        if TAU - along <= Tolerance::SMALL_FRACTION {
            return 0.0;
        }
        along / self.sweep.abs()
    }

    fn is_circular(vector0: Vector3, vector90: Vector3) -> bool {
        let r0 = vector0.length();
        let r90 = vector90.length();
        let scale = r0.max(r90).max(f64::MIN_POSITIVE);
        (r0 - r90).abs() <= CIRCULARITY_TOLERANCE * scale
            && vector0.dot(vector90).abs() <= CIRCULARITY_TOLERANCE * scale * scale
    }

    fn detail(&self, fraction: f64) -> CurveLocationDetail {
        CurveLocationDetail::new(self.curve_ref(), fraction, self.fraction_to_point(fraction))
    }

    fn stroke_count(&self, options: Option<&StrokeOptions>) -> usize {
        options
            .copied()
            .unwrap_or_default()
            .arc_stroke_count(self.radius(), self.sweep)
    }
}

impl Validate for Arc3d {
    fn validate(&self) -> Result<()> {
        let finite = self.center.is_finite()
            && self.vector0.is_finite()
            && self.vector90.is_finite()
            && self.start_angle.is_finite()
            && self.sweep.is_finite();
        if !finite {
            return Err(CurveError::Geometry("arc has non-finite data".into()));
        }
        if self.radius() <= Tolerance::SMALL_METRIC_DISTANCE {
            return Err(CurveError::Geometry(format!(
                "arc radius {} is too small",
                self.radius()
            )));
        }
        if !Self::is_circular(self.vector0, self.vector90) {
            return Err(CurveError::Geometry(
                "arc axes must be perpendicular and of equal length".into(),
            ));
        }
        Ok(())
    }
}

impl CurvePrimitive for Arc3d {
    fn curve_ref(&self) -> CurveRef {
        self.identity.curve_ref()
    }

    fn fraction_to_point(&self, fraction: f64) -> Point3 {
        self.angle_to_point(self.fraction_to_angle(fraction))
    }

    fn fraction_to_point_and_derivative(&self, fraction: f64) -> Ray {
        let theta = self.fraction_to_angle(fraction);
        let (sin, cos) = theta.sin_cos();
        let direction = self.sweep * (-sin * self.vector0 + cos * self.vector90);
        Ray::new(self.angle_to_point(theta), direction)
    }

    fn curve_length(&self) -> f64 {
        self.radius() * self.sweep.abs()
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
        if length == 0.0 {
            let status = if signed_distance == 0.0 {
                CurveSearchStatus::Success
            } else {
                CurveSearchStatus::StoppedAtBoundary
            };
            return self
                .detail(start_fraction)
                .with_distance(0.0)
                .with_status(status);
        }
        let target = start_fraction + signed_distance / length;
        if allow_extension || (0.0..=1.0).contains(&target) {
            return self.detail(target).with_distance(signed_distance);
        }
        let fraction = target.clamp(0.0, 1.0);
        self.detail(fraction)
            .with_distance((fraction - start_fraction) * length)
            .with_status(CurveSearchStatus::StoppedAtBoundary)
    }

    fn closest_point(
        &self,
        space_point: Point3,
        extend: CurveExtendOptions,
    ) -> Option<CurveLocationDetail> {
        let mut candidates = vec![0.0, 1.0];
        let r2 = self.vector0.length_squared();
        let w = space_point - self.center;
        let x = w.dot(self.vector0) / r2;
        let y = w.dot(self.vector90) / r2;
        // On the axis every point of the circle is equally far.
        if r2 > 0.0 && x.hypot(y) > Tolerance::SMALL_FRACTION && self.sweep != 0.0 {
            let fraction = self.angle_to_fraction(y.atan2(x));
            let backward = fraction - TAU / self.sweep.abs();
            if fraction <= 1.0 {
                candidates.push(fraction);
            } else {
                // Both extensions land on the same circle point; take the
                // shorter overshoot.
                match (extend.start, extend.end) {
                    (true, true) if -backward < fraction - 1.0 => candidates.push(backward),
                    (_, true) => candidates.push(fraction),
                    (true, false) => candidates.push(backward),
                    (false, false) => {}
                }
            }
        }
        candidates
            .into_iter()
            .map(|fraction| {
                let detail = self.detail(fraction);
                let distance = detail.point.distance(space_point);
                detail.with_distance(distance)
            })
            .min_by(|a, b| a.a.unwrap_or(f64::MAX).total_cmp(&b.a.unwrap_or(f64::MAX)))
    }

    fn append_plane_intersection_points(
        &self,
        plane: &dyn PlaneAltitudeEvaluator,
        result: &mut Vec<CurveLocationDetail>,
    ) -> usize {
        // altitude(theta) = a + b cos(theta) + c sin(theta)
        let a = plane.altitude(self.center);
        let b = plane.velocity(self.vector0);
        let c = plane.velocity(self.vector90);
        let amplitude = b.hypot(c);
        let before = result.len();
        if Tolerance::is_small_metric_distance(amplitude) {
            if Tolerance::is_small_metric_distance(a) {
                result.push(self.detail(0.0).with_interval_role(CurveIntervalRole::IntervalStart));
                result.push(self.detail(1.0).with_interval_role(CurveIntervalRole::IntervalEnd));
            }
            return result.len() - before;
        }
        let cosine = -a / amplitude;
        if cosine.abs() > 1.0 + Tolerance::SMALL_FRACTION {
            return 0;
        }
        let phase = c.atan2(b);
        let offset = cosine.clamp(-1.0, 1.0).acos();
        let mut fractions = vec![self.angle_to_fraction(phase + offset)];
        if offset > Tolerance::SMALL_FRACTION {
            fractions.push(self.angle_to_fraction(phase - offset));
        }
        fractions.retain(|f| *f <= 1.0 + Tolerance::SMALL_FRACTION);
        fractions.sort_by(f64::total_cmp);
        fractions.dedup_by(|f, g| (*f - *g).abs() <= Tolerance::SMALL_FRACTION);
        for fraction in fractions {
            result.push(
                self.detail(fraction.min(1.0))
                    .with_interval_role(CurveIntervalRole::IsolatedPoint),
            );
        }
        result.len() - before
    }

    fn announce_clip_intervals(
        &self,
        clipper: &dyn ClipOracle,
        announce: &mut dyn FnMut(f64, f64),
    ) -> bool {
        clipper.announce_clipped_arc_intervals(self, announce)
    }

    fn clone_partial_curve(&self, fraction_a: f64, fraction_b: f64) -> Option<Box<dyn CurvePrimitive>> {
        Some(Box::new(Arc3d::new(
            self.center,
            self.vector0,
            self.vector90,
            self.fraction_to_angle(fraction_a),
            (fraction_b - fraction_a) * self.sweep,
        )))
    }

    fn clone_box(&self) -> Box<dyn CurvePrimitive> {
        Box::new(self.clone())
    }

    fn emit_strokes(&self, dest: &mut LineString3d, options: Option<&StrokeOptions>) {
        let count = self.stroke_count(options);
        for i in 0..=count {
            dest.append_stroke_point(self.fraction_to_point(i as f64 / count as f64));
        }
    }

    fn emit_strokable_parts(&self, handler: &mut dyn StrokeHandler, options: Option<&StrokeOptions>) {
        handler.start_primitive(self);
        handler.announce_interval_for_uniform_stepping(self, self.stroke_count(options), 0.0, 1.0);
        handler.end_primitive(self);
    }

    fn fraction_to_frenet_frame(&self, fraction: f64) -> Transform {
        let ray = self.fraction_to_point_and_derivative(fraction);
        let binormal = ray.direction.cross(self.center - ray.origin);
        Transform::rigid_from_x_and_normal(ray.origin, ray.direction, binormal)
            .unwrap_or_else(|| Transform::from_translation(ray.origin))
    }

    fn reverse_in_place(&mut self) {
        self.start_angle += self.sweep;
        self.sweep = -self.sweep;
        self.identity.touch();
    }

    fn try_transform_in_place(&mut self, transform: &Transform) -> Result<()> {
        let vector0 = transform.transform_vector(self.vector0);
        let vector90 = transform.transform_vector(self.vector90);
        if !Self::is_circular(vector0, vector90) {
            log::debug!("refusing to transform arc {}: result is not circular", self.identity.id());
            return Err(CurveError::InvalidOperation(
                "transform does not keep the arc circular".into(),
            ));
        }
        self.center = transform.transform_point(self.center);
        self.vector0 = vector0;
        self.vector90 = vector90;
        self.identity.touch();
        Ok(())
    }

    fn range(&self) -> Option<Aabb3> {
        let mut range = Aabb3::from_points(&[self.start_point(), self.end_point()])?;
        // Per axis, the coordinate peaks where the derivative of
        // v0[k] cos + v90[k] sin vanishes.
        for k in 0..3 {
            let peak = self.vector90[k].atan2(self.vector0[k]);
            for theta in [peak, peak + std::f64::consts::PI] {
                if self.angle_to_fraction(theta) <= 1.0 {
                    range.extend_point(self.angle_to_point(theta));
                }
            }
        }
        Some(range)
    }
}
