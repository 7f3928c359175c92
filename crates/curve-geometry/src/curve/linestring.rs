//! Linestring (polyline) curve.
//!
//! Global fraction is uniform in segment count: with `n` points each of the
//! `n - 1` segments owns `1 / (n - 1)` of the fraction domain, whatever its
//! physical length. Every fraction-based operation here honours that, and
//! curve chains built on top of linestrings rely on it.

use curve_core::traits::Validate;
use curve_core::{CurveError, CurveIdentity, CurveRef, Result, Tolerance};
use curve_math::scalar::{interpolate_point, inverse_interpolate, is_sign_change};
use curve_math::{Aabb3, Plane, PlaneAltitudeEvaluator, Point3, Ray, Transform, Vector3};
use serde_json::Value;

use super::frenet::estimate_bend_normal;
use super::{CurvePrimitive, LineSegment3d, MoveByDistanceContext};
use crate::clip::ClipOracle;
use crate::detail::{
    CurveExtendOptions, CurveIntervalRole, CurveLocationDetail, CurveSearchStatus,
};
use crate::growable::GrowableXyzArray;
use crate::stroke::{StrokeHandler, StrokeOptions};

/// Curve through an ordered list of points joined by straight segments.
#[derive(Debug, Clone, Default)]
pub struct LineString3d {
    points: GrowableXyzArray,
    identity: CurveIdentity,
}

impl LineString3d {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: &[Point3]) -> Self {
        Self::from_packed(GrowableXyzArray::from_points(points))
    }

    /// Build from packed `[x0, y0, z0, x1, ...]` values.
    pub fn from_flat(values: &[f64]) -> Self {
        Self::from_packed(GrowableXyzArray::from_flat(values))
    }

    pub fn from_packed(points: GrowableXyzArray) -> Self {
        Self {
            points,
            identity: CurveIdentity::new(),
        }
    }

    /// Closed axis-aligned rectangle in the plane `z`, five points with the
    /// first repeated at the end.
    pub fn rectangle_xy(x0: f64, y0: f64, x1: f64, y1: f64, z: f64) -> Self {
        Self::from_points(&[
            Point3::new(x0, y0, z),
            Point3::new(x1, y0, z),
            Point3::new(x1, y1, z),
            Point3::new(x0, y1, z),
            Point3::new(x0, y0, z),
        ])
    }

    /// Closed regular polygon around `center` in its xy plane, first vertex
    /// on the +x side. `radius_to_vertices` selects whether `radius`
    /// measures to the vertices or to the edge midpoints.
    pub fn regular_polygon_xy(
        center: Point3,
        edge_count: usize,
        radius: f64,
        radius_to_vertices: bool,
    ) -> Self {
        let mut linestring = Self::new();
        if edge_count < 3 {
            return linestring;
        }
        let step = std::f64::consts::TAU / edge_count as f64;
        let r = if radius_to_vertices {
            radius
        } else {
            radius / (0.5 * step).cos()
        };
        for i in 0..edge_count {
            let theta = i as f64 * step;
            linestring
                .points
                .push(center + Vector3::new(r * theta.cos(), r * theta.sin(), 0.0));
        }
        linestring.close();
        linestring
    }

    /// Build from a structured JSON value.
    ///
    /// Nested arrays of any depth are flattened. Coordinate entries are
    /// `[x, y]`, `[x, y, z]` or `{"x": .., "y": .., "z": ..}` (missing `z`
    /// reads as zero); anything else is dropped.
    pub fn from_json(value: &Value) -> Self {
        let mut points = GrowableXyzArray::new();
        let mut dropped = 0usize;
        collect_json_points(value, &mut points, &mut dropped);
        if dropped > 0 {
            log::debug!("dropped {dropped} non-coordinate entries while reading linestring");
        }
        Self::from_packed(points)
    }

    /// Parse JSON text and build with [`LineString3d::from_json`].
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_json(&value))
    }

    /// JSON array of `[x, y, z]` arrays.
    pub fn to_json(&self) -> Value {
        Value::Array(
            self.points
                .iter()
                .map(|p| Value::from(vec![p.x, p.y, p.z]))
                .collect(),
        )
    }

    pub fn from_plain_data(data: &[[f64; 3]]) -> Self {
        let mut points = GrowableXyzArray::with_capacity(data.len());
        for xyz in data {
            points.push_xyz(xyz[0], xyz[1], xyz[2]);
        }
        Self::from_packed(points)
    }

    pub fn to_plain_data(&self) -> Vec<[f64; 3]> {
        self.points.iter().map(|p| p.to_array()).collect()
    }

    /// Replace the contents from plain data, keeping this primitive's identity.
    pub fn set_from_plain_data(&mut self, data: &[[f64; 3]]) {
        self.points.clear();
        for xyz in data {
            self.points.push_xyz(xyz[0], xyz[1], xyz[2]);
        }
        self.identity.touch();
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn num_edges(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn point_at(&self, index: usize) -> Option<Point3> {
        self.points.get_point(index)
    }

    pub fn packed_points(&self) -> &GrowableXyzArray {
        &self.points
    }

    pub fn points(&self) -> Vec<Point3> {
        self.points.to_points()
    }

    pub fn add_point(&mut self, point: Point3) {
        self.points.push(point);
        self.identity.touch();
    }

    pub fn add_points(&mut self, points: &[Point3]) {
        self.points.extend_from_slice(points);
        self.identity.touch();
    }

    pub fn pop_point(&mut self) -> Option<Point3> {
        let p = self.points.pop();
        self.identity.touch();
        p
    }

    /// Replace point `index`; false if out of range.
    pub fn set_point(&mut self, index: usize, point: Point3) -> bool {
        let changed = self.points.set_point(index, point);
        if changed {
            self.identity.touch();
        }
        changed
    }

    /// Append the first point again unless the linestring is already closed.
    pub fn close(&mut self) {
        if let (Some(first), Some(last)) = (self.points.front(), self.points.back()) {
            if first != last {
                self.points.push(first);
                self.identity.touch();
            }
        }
    }

    /// Append the point at `local_fraction` along segment `index` of `source`
    /// (the vertex itself when the fraction is zero).
    pub fn add_resolved_point(&mut self, index: usize, local_fraction: f64, source: &GrowableXyzArray) {
        let point = if local_fraction == 0.0 {
            source.get_point(index)
        } else {
            source.interpolate(index, local_fraction, index + 1)
        };
        if let Some(p) = point {
            self.points.push(p);
            self.identity.touch();
        }
    }

    /// Append `point` unless it repeats the current last point. Returns
    /// whether the point was added.
    pub fn append_stroke_point(&mut self, point: Point3) -> bool {
        if self.points.back() == Some(point) {
            return false;
        }
        self.points.push(point);
        self.identity.touch();
        true
    }

    /// Append the `count - 1` interior points splitting `point0..point1`
    /// into `count` equal edges, plus the ends when `include_end_points`.
    pub fn append_interpolated_stroke_points(
        &mut self,
        count: usize,
        point0: Point3,
        point1: Point3,
        include_end_points: bool,
    ) {
        if include_end_points {
            self.append_stroke_point(point0);
        }
        for i in 1..count {
            self.append_stroke_point(interpolate_point(point0, i as f64 / count as f64, point1));
        }
        if include_end_points {
            self.append_stroke_point(point1);
        }
    }

    /// Segment `index` as a standalone line segment.
    pub fn segment_at(&self, index: usize) -> Option<LineSegment3d> {
        Some(LineSegment3d::new(
            self.points.get_point(index)?,
            self.points.get_point(index + 1)?,
        ))
    }

    /// Global fraction of vertex `index`.
    pub fn vertex_index_to_fraction(&self, index: usize) -> f64 {
        let num_segments = self.num_edges();
        if num_segments == 0 {
            return 0.0;
        }
        index as f64 / num_segments as f64
    }

    /// Resolve a global fraction to `(segment_index, local_fraction)`.
    ///
    /// Fractions outside `[0, 1]` resolve onto the first or last segment
    /// with a local fraction outside `[0, 1]`. `None` for fewer than two
    /// points.
    pub fn global_fraction_to_segment_index_and_local_fraction(
        &self,
        fraction: f64,
    ) -> Option<(usize, f64)> {
        let num_segments = self.num_edges();
        if num_segments == 0 {
            return None;
        }
        let scaled = fraction * num_segments as f64;
        let index = if scaled <= 0.0 {
            0
        } else {
            (scaled.floor() as usize).min(num_segments - 1)
        };
        Some((index, scaled - index as f64))
    }

    pub fn segment_index_and_local_fraction_to_global_fraction(
        &self,
        index: usize,
        local_fraction: f64,
    ) -> f64 {
        let num_segments = self.num_edges();
        if num_segments == 0 {
            return 0.0;
        }
        (index as f64 + local_fraction) / num_segments as f64
    }

    /// Every point within [`Tolerance::SMALL_METRIC_DISTANCE`] of `plane`.
    pub fn is_in_plane(&self, plane: &Plane) -> bool {
        self.points
            .iter()
            .all(|p| Tolerance::is_small_metric_distance(plane.signed_distance(p)))
    }

    pub fn is_almost_equal(&self, other: &LineString3d) -> bool {
        self.points
            .is_almost_equal(&other.points, Tolerance::SMALL_METRIC_DISTANCE)
    }

    /// Partial copy as a concrete linestring. See
    /// [`CurvePrimitive::clone_partial_curve`].
    pub fn clone_partial_linestring(&self, fraction_a: f64, fraction_b: f64) -> Option<LineString3d> {
        if fraction_b < fraction_a {
            let mut partial = self.clone_partial_linestring(fraction_b, fraction_a)?;
            partial.reverse_in_place();
            return Some(partial);
        }
        let num_points = self.points.len();
        if num_points < 2 || fraction_a >= 1.0 || fraction_b <= 0.0 {
            return None;
        }
        let num_segments = (num_points - 1) as f64;
        let scaled_a = fraction_a.max(0.0) * num_segments;
        let scaled_b = fraction_b.min(1.0) * num_segments;
        let index_a = scaled_a.floor() as usize;
        let index_b = scaled_b.floor() as usize;
        let local_a = scaled_a - index_a as f64;
        let local_b = scaled_b - index_b as f64;

        let mut result = LineString3d::new();
        result.add_resolved_point(index_a, local_a, &self.points);
        for index in index_a + 1..=index_b {
            result.points.push_from_other(&self.points, index);
        }
        if !Tolerance::is_small_fraction(local_b) {
            result.add_resolved_point(index_b, local_b, &self.points);
        }
        Some(result)
    }

    /// Partial copies of the inside intervals of `clipper`.
    pub fn clip_to_linestrings(&self, clipper: &dyn ClipOracle) -> Vec<LineString3d> {
        let mut intervals = Vec::new();
        self.announce_clip_intervals(clipper, &mut |f0, f1| intervals.push((f0, f1)));
        intervals
            .into_iter()
            .filter_map(|(f0, f1)| self.clone_partial_linestring(f0, f1))
            .collect()
    }

    fn detail(&self, fraction: f64, point: Point3) -> CurveLocationDetail {
        CurveLocationDetail::new(self.curve_ref(), fraction, point)
    }

    /// Marching result; `a` is the requested distance on success and the
    /// distance actually covered when the walk stopped at an end.
    fn move_result(
        &self,
        context: &MoveByDistanceContext,
        signed_distance: f64,
        status: CurveSearchStatus,
    ) -> CurveLocationDetail {
        let a = match status {
            CurveSearchStatus::Success => signed_distance,
            CurveSearchStatus::StoppedAtBoundary => context.distance0.copysign(signed_distance),
        };
        self.detail(context.fraction0, context.point0)
            .with_distance(a)
            .with_status(status)
    }

    /// March that starts on the extension past an end and moves further out.
    /// No vertex lies ahead, so the walk follows the boundary segment's line.
    fn move_beyond_end(
        &self,
        start_fraction: f64,
        signed_distance: f64,
        allow_extension: bool,
    ) -> CurveLocationDetail {
        let num_segments = self.num_edges();
        let boundary = if start_fraction > 1.0 { num_segments - 1 } else { 0 };
        let edge_length = self
            .points
            .distance_between(boundary, boundary + 1)
            .unwrap_or(0.0);
        if !allow_extension || edge_length == 0.0 {
            return self
                .detail(start_fraction, self.fraction_to_point(start_fraction))
                .with_distance(0.0)
                .with_status(CurveSearchStatus::StoppedAtBoundary);
        }
        let fraction = start_fraction + signed_distance / (edge_length * num_segments as f64);
        self.detail(fraction, self.fraction_to_point(fraction))
            .with_distance(signed_distance)
    }
}

fn collect_json_points(value: &Value, points: &mut GrowableXyzArray, dropped: &mut usize) {
    if let Some(xyz) = json_coordinate(value) {
        points.push(xyz);
        return;
    }
    match value {
        Value::Array(items) => {
            for item in items {
                collect_json_points(item, points, dropped);
            }
        }
        _ => *dropped += 1,
    }
}

fn json_coordinate(value: &Value) -> Option<Point3> {
    match value {
        Value::Array(items) if (2..=3).contains(&items.len()) => {
            let mut xyz = [0.0; 3];
            for (slot, item) in xyz.iter_mut().zip(items) {
                *slot = item.as_f64()?;
            }
            Some(Point3::from_array(xyz))
        }
        Value::Object(map) => {
            let x = map.get("x")?.as_f64()?;
            let y = map.get("y")?.as_f64()?;
            let z = match map.get("z") {
                Some(z) => z.as_f64()?,
                None => 0.0,
            };
            Some(Point3::new(x, y, z))
        }
        _ => None,
    }
}

impl Validate for LineString3d {
    fn validate(&self) -> Result<()> {
        match self.points.iter().position(|p| !p.is_finite()) {
            Some(index) => Err(CurveError::Geometry(format!(
                "linestring point {index} is not finite"
            ))),
            None => Ok(()),
        }
    }
}

impl CurvePrimitive for LineString3d {
    fn curve_ref(&self) -> CurveRef {
        self.identity.curve_ref()
    }

    fn fraction_to_point(&self, fraction: f64) -> Point3 {
        let n = self.points.len();
        match n {
            0 => return Point3::ZERO,
            1 => return self.points.point_at_unchecked(0),
            _ => {}
        }
        let df = 1.0 / (n - 1) as f64;
        let p = &self.points;
        if fraction <= df {
            return interpolate_point(p.point_at_unchecked(0), fraction / df, p.point_at_unchecked(1));
        }
        if fraction + df >= 1.0 {
            return interpolate_point(
                p.point_at_unchecked(n - 1),
                (1.0 - fraction) / df,
                p.point_at_unchecked(n - 2),
            );
        }
        let index0 = ((fraction / df).floor() as usize).min(n - 2);
        let local = (fraction - index0 as f64 * df) / df;
        interpolate_point(p.point_at_unchecked(index0), local, p.point_at_unchecked(index0 + 1))
    }

    fn fraction_to_point_and_derivative(&self, fraction: f64) -> Ray {
        let n = self.points.len();
        if n < 2 {
            return Ray::new(self.fraction_to_point(fraction), Vector3::ZERO);
        }
        // Derivative with respect to the global fraction: segment vector
        // divided by the segment's share 1 / (n - 1).
        let (index, _) = self
            .global_fraction_to_segment_index_and_local_fraction(fraction)
            .unwrap_or((0, 0.0));
        let direction = self.points.vector_between(index, index + 1).unwrap_or(Vector3::ZERO);
        Ray::new(self.fraction_to_point(fraction), direction * (n - 1) as f64)
    }

    fn curve_length(&self) -> f64 {
        self.points.sum_lengths()
    }

    fn curve_length_between_fractions(&self, fraction0: f64, fraction1: f64) -> f64 {
        let num_segments = self.num_edges();
        if fraction0 == fraction1 || num_segments == 0 {
            return 0.0;
        }
        if fraction1 < fraction0 {
            return self.curve_length_between_fractions(fraction1, fraction0);
        }
        let segment_length = |i: usize| self.points.distance_between(i, i + 1).unwrap_or(0.0);
        let scaled0 = fraction0 * num_segments as f64;
        let scaled1 = fraction1 * num_segments as f64;
        // First vertex strictly after fraction0 and last vertex at or before fraction1,
        // both kept off the outer ends.
        let index0 = (scaled0.ceil().max(1.0) as usize).min(num_segments);
        let index1 = if scaled1 <= 0.0 {
            0
        } else {
            (scaled1.floor() as usize).min(num_segments - 1)
        };
        if index0 > index1 {
            // Both fractions inside segment index1 (== index0 - 1).
            return (scaled1 - scaled0).abs() * segment_length(index0 - 1);
        }
        let leading = (index0 as f64 - scaled0) * segment_length(index0 - 1);
        let trailing = (scaled1 - index1 as f64) * segment_length(index1);
        let interior: f64 = (index0..index1).map(segment_length).sum();
        leading + interior + trailing
    }

    fn move_signed_distance_from_fraction(
        &self,
        start_fraction: f64,
        signed_distance: f64,
        allow_extension: bool,
    ) -> CurveLocationDetail {
        let num_points = self.points.len();
        if num_points < 2 {
            let status = if signed_distance == 0.0 {
                CurveSearchStatus::Success
            } else {
                CurveSearchStatus::StoppedAtBoundary
            };
            return self
                .detail(0.0, self.fraction_to_point(0.0))
                .with_distance(0.0)
                .with_status(status);
        }
        if signed_distance == 0.0 {
            return self
                .detail(start_fraction, self.fraction_to_point(start_fraction))
                .with_distance(0.0);
        }
        if (signed_distance > 0.0 && start_fraction > 1.0) || (signed_distance < 0.0 && start_fraction < 0.0) {
            return self.move_beyond_end(start_fraction, signed_distance, allow_extension);
        }
        let num_segments = num_points - 1;
        let df = 1.0 / num_segments as f64;
        let (start_segment, local) = self
            .global_fraction_to_segment_index_and_local_fraction(start_fraction)
            .unwrap_or((0, 0.0));
        let point0 = interpolate_point(
            self.points.point_at_unchecked(start_segment),
            local,
            self.points.point_at_unchecked(start_segment + 1),
        );
        let mut context = MoveByDistanceContext::new(point0, start_fraction, signed_distance);
        let reached = |c: &MoveByDistanceContext| self.move_result(c, signed_distance, CurveSearchStatus::Success);

        if signed_distance > 0.0 {
            for i in start_segment + 1..num_points {
                if context.announce_point(self.points.point_at_unchecked(i), self.vertex_index_to_fraction(i)) {
                    return reached(&context);
                }
            }
            if allow_extension
                && context.announce_extrapolation(&self.points, num_points - 2, num_points - 1, 1.0 - df, 1.0)
            {
                return reached(&context);
            }
        } else {
            for i in (0..=start_segment).rev() {
                if context.announce_point(self.points.point_at_unchecked(i), self.vertex_index_to_fraction(i)) {
                    return reached(&context);
                }
            }
            if allow_extension && context.announce_extrapolation(&self.points, 1, 0, df, 0.0) {
                return reached(&context);
            }
        }
        self.move_result(&context, signed_distance, CurveSearchStatus::StoppedAtBoundary)
    }

    fn closest_point(
        &self,
        space_point: Point3,
        extend: CurveExtendOptions,
    ) -> Option<CurveLocationDetail> {
        let last = self.points.back()?;
        let mut best = self
            .detail(1.0, last)
            .with_distance(last.distance(space_point));
        let num_points = self.points.len();
        if num_points < 2 {
            best.fraction = 0.0;
            return Some(best);
        }
        let last_index = num_points - 1;
        let df = 1.0 / last_index as f64;
        for i in 1..num_points {
            let a = self.points.point_at_unchecked(i - 1);
            let b = self.points.point_at_unchecked(i);
            let mut segment_fraction = Ray::between(a, b).fraction_of_projection(space_point);
            if segment_fraction < 0.0 {
                if !extend.start || i > 1 {
                    segment_fraction = 0.0;
                }
            } else if segment_fraction > 1.0 && (!extend.end || i < last_index) {
                segment_fraction = 1.0;
            }
            let candidate = interpolate_point(a, segment_fraction, b);
            let d = candidate.distance(space_point);
            if best.a.map_or(true, |best_d| d < best_d) {
                best = self
                    .detail((i as f64 - 1.0 + segment_fraction) * df, candidate)
                    .with_distance(d);
            }
        }
        Some(best)
    }

    fn append_plane_intersection_points(
        &self,
        plane: &dyn PlaneAltitudeEvaluator,
        result: &mut Vec<CurveLocationDetail>,
    ) -> usize {
        let n = self.points.len();
        let before = result.len();
        if n == 0 {
            return 0;
        }
        let altitudes: Vec<f64> = self.points.iter().map(|p| plane.altitude(p)).collect();
        let on_plane = |i: usize| Tolerance::is_small_metric_distance(altitudes[i]);
        let fraction_of = |i: usize| self.vertex_index_to_fraction(i);

        let mut i = 0;
        while i < n {
            if on_plane(i) {
                let mut end = i;
                while end + 1 < n && on_plane(end + 1) {
                    end += 1;
                }
                if end == i {
                    result.push(
                        self.detail(fraction_of(i), self.points.point_at_unchecked(i))
                            .with_interval_role(CurveIntervalRole::IsolatedAtVertex),
                    );
                } else {
                    for k in i..=end {
                        let role = if k == i {
                            CurveIntervalRole::IntervalStart
                        } else if k == end {
                            CurveIntervalRole::IntervalEnd
                        } else {
                            CurveIntervalRole::IntervalInterior
                        };
                        result.push(
                            self.detail(fraction_of(k), self.points.point_at_unchecked(k))
                                .with_interval_role(role),
                        );
                    }
                }
                i = end + 1;
                continue;
            }
            if i + 1 < n && !on_plane(i + 1) && is_sign_change(altitudes[i], altitudes[i + 1]) {
                let crossing = inverse_interpolate(
                    altitudes[i],
                    fraction_of(i),
                    altitudes[i + 1],
                    fraction_of(i + 1),
                    0.0,
                );
                let local = inverse_interpolate(altitudes[i], 0.0, altitudes[i + 1], 1.0, 0.0);
                if let (Some(fraction), Some(local)) = (crossing, local) {
                    let point = interpolate_point(
                        self.points.point_at_unchecked(i),
                        local,
                        self.points.point_at_unchecked(i + 1),
                    );
                    result.push(
                        self.detail(fraction, point)
                            .with_interval_role(CurveIntervalRole::IsolatedPoint),
                    );
                }
            }
            i += 1;
        }
        result.len() - before
    }

    fn announce_clip_intervals(
        &self,
        clipper: &dyn ClipOracle,
        announce: &mut dyn FnMut(f64, f64),
    ) -> bool {
        let n = self.points.len();
        if n < 2 {
            return false;
        }
        let mut found = false;
        for i in 0..n - 1 {
            let f0 = self.vertex_index_to_fraction(i);
            let f1 = self.vertex_index_to_fraction(i + 1);
            found |= clipper.announce_clipped_segment_intervals(
                f0,
                f1,
                self.points.point_at_unchecked(i),
                self.points.point_at_unchecked(i + 1),
                announce,
            );
        }
        found
    }

    fn clone_partial_curve(&self, fraction_a: f64, fraction_b: f64) -> Option<Box<dyn CurvePrimitive>> {
        self.clone_partial_linestring(fraction_a, fraction_b)
            .map(|ls| Box::new(ls) as Box<dyn CurvePrimitive>)
    }

    fn clone_box(&self) -> Box<dyn CurvePrimitive> {
        Box::new(self.clone())
    }

    fn emit_strokes(&self, dest: &mut LineString3d, options: Option<&StrokeOptions>) {
        // Already piecewise linear: only the edge-length bound can add points.
        match options.filter(|o| o.has_max_edge_length()) {
            Some(options) => {
                let mut previous: Option<Point3> = None;
                for b in self.points.iter() {
                    if let Some(a) = previous {
                        let count = options.apply_max_edge_length(1, a.distance(b));
                        dest.append_interpolated_stroke_points(count, a, b, false);
                    }
                    dest.append_stroke_point(b);
                    previous = Some(b);
                }
            }
            None => {
                for p in self.points.iter() {
                    dest.add_point(p);
                }
            }
        }
    }

    fn emit_strokable_parts(&self, handler: &mut dyn StrokeHandler, options: Option<&StrokeOptions>) {
        handler.start_primitive(self);
        let n = self.points.len();
        for i in 1..n {
            let a = self.points.point_at_unchecked(i - 1);
            let b = self.points.point_at_unchecked(i);
            let count = options.map_or(1, |o| o.apply_max_edge_length(1, a.distance(b)));
            handler.announce_segment_interval(
                self,
                a,
                b,
                count,
                self.vertex_index_to_fraction(i - 1),
                self.vertex_index_to_fraction(i),
            );
        }
        handler.end_primitive(self);
    }

    fn fraction_to_frenet_frame(&self, fraction: f64) -> Transform {
        let n = self.points.len();
        match n {
            0 => return Transform::identity(),
            1 => return Transform::from_translation(self.points.point_at_unchecked(0)),
            _ => {}
        }
        let (base, local) = self
            .global_fraction_to_segment_index_and_local_fraction(fraction)
            .unwrap_or((0, 0.0));
        let p0 = self.points.point_at_unchecked(base);
        let p1 = self.points.point_at_unchecked(base + 1);
        let origin = interpolate_point(p0, local, p1);
        let tangent = p1 - p0;
        let frame = if n == 2 {
            Transform::rigid_heads_up(origin, tangent)
        } else {
            estimate_bend_normal(&self.points, base, local)
                .and_then(|normal| Transform::rigid_from_x_and_normal(origin, tangent, normal))
        };
        frame.unwrap_or_else(|| {
            log::trace!("frenet frame at fraction {fraction} is degenerate, using translation");
            Transform::from_translation(origin)
        })
    }

    fn reverse_in_place(&mut self) {
        self.points.reverse_in_place();
        self.identity.touch();
    }

    fn try_transform_in_place(&mut self, transform: &Transform) -> Result<()> {
        self.points.transform_in_place(transform);
        self.identity.touch();
        Ok(())
    }

    fn range(&self) -> Option<Aabb3> {
        self.points.range()
    }

    fn start_point(&self) -> Point3 {
        self.points.front().unwrap_or(Point3::ZERO)
    }

    fn end_point(&self) -> Point3 {
        self.points.back().unwrap_or(Point3::ZERO)
    }
}
