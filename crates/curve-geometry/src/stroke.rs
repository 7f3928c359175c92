//! Stroke options and the stroke-handler dispatch surface.
//!
//! Primitives push piecewise-linear approximations outward, either into a
//! destination linestring (`CurvePrimitive::emit_strokes`) or into a
//! [`StrokeHandler`] (`CurvePrimitive::emit_strokable_parts`).

use std::f64::consts::PI;

use curve_core::{CurveError, Result};
use curve_math::scalar::{interpolate, interpolate_point};
use curve_math::Point3;
use serde::{Deserialize, Serialize};

use crate::curve::{CurvePrimitive, LineString3d};

/// Angle step used for arcs when no tolerance is configured.
const DEFAULT_ARC_ANGLE_STEP: f64 = PI / 8.0;

/// `ceil(ratio)` with a little slack so that exact multiples computed in
/// floating point do not gain a spurious extra stroke.
fn stroke_count_for_ratio(ratio: f64) -> usize {
    (ratio - 1e-10).ceil().max(1.0) as usize
}

/// Configuration for piecewise-linear approximation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeOptions {
    /// Upper bound on the length of any emitted edge.
    pub max_edge_length: Option<f64>,
    /// Upper bound on turning angle per edge (radians). Arcs only.
    pub angle_tolerance: Option<f64>,
    /// Upper bound on chord-to-curve distance. Arcs only.
    pub chord_tolerance: Option<f64>,
    /// Lower bound on strokes per curved primitive. Ignored by linestrings.
    pub min_strokes_per_primitive: Option<usize>,
}

impl StrokeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_edge_length(mut self, length: f64) -> Self {
        self.max_edge_length = Some(length);
        self
    }

    pub fn with_angle_tolerance(mut self, radians: f64) -> Self {
        self.angle_tolerance = Some(radians);
        self
    }

    pub fn with_chord_tolerance(mut self, distance: f64) -> Self {
        self.chord_tolerance = Some(distance);
        self
    }

    pub fn with_min_strokes_per_primitive(mut self, count: usize) -> Self {
        self.min_strokes_per_primitive = Some(count);
        self
    }

    /// Parse options from JSON text such as `{"max_edge_length": 0.5}`.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("max_edge_length", self.max_edge_length),
            ("angle_tolerance", self.angle_tolerance),
            ("chord_tolerance", self.chord_tolerance),
        ];
        for (name, value) in checks {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(CurveError::InvalidOperation(format!(
                        "{name} must be positive and finite, got {v}"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn has_max_edge_length(&self) -> bool {
        matches!(self.max_edge_length, Some(len) if len > 0.0)
    }

    /// Smallest count `>= min_count` (and at least 1) that keeps edges of a
    /// `length`-long straight run within `max_edge_length`.
    pub fn apply_max_edge_length(&self, min_count: usize, length: f64) -> usize {
        let mut count = min_count.max(1);
        if let Some(max) = self.max_edge_length {
            if max > 0.0 && length > max {
                count = count.max(stroke_count_for_ratio(length / max));
            }
        }
        count
    }

    /// Stroke count for a circular arc of `radius` sweeping `sweep` radians.
    pub fn arc_stroke_count(&self, radius: f64, sweep: f64) -> usize {
        let sweep = sweep.abs();
        let mut count = self.min_strokes_per_primitive.unwrap_or(1).max(1);
        let angle_step = match self.angle_tolerance {
            Some(angle) if angle > 0.0 => angle,
            _ => DEFAULT_ARC_ANGLE_STEP,
        };
        count = count.max(stroke_count_for_ratio(sweep / angle_step));
        if let Some(chord) = self.chord_tolerance {
            if chord > 0.0 && chord < radius {
                let step = 2.0 * (1.0 - chord / radius).acos();
                if step > 0.0 {
                    count = count.max(stroke_count_for_ratio(sweep / step));
                }
            }
        }
        self.apply_max_edge_length(count, radius * sweep)
    }
}

/// Receiver for stroke intervals announced by curve primitives.
///
/// Announcements arrive in strictly increasing fraction order, bracketed by
/// `start_primitive` and `end_primitive`.
pub trait StrokeHandler {
    fn start_primitive(&mut self, primitive: &dyn CurvePrimitive);

    /// A straight piece from `point0` (at `fraction0`) to `point1` (at
    /// `fraction1`) that should be split into `stroke_count` equal edges.
    fn announce_segment_interval(
        &mut self,
        primitive: &dyn CurvePrimitive,
        point0: Point3,
        point1: Point3,
        stroke_count: usize,
        fraction0: f64,
        fraction1: f64,
    );

    /// A curved piece to be sampled at `stroke_count` equal fraction steps.
    fn announce_interval_for_uniform_stepping(
        &mut self,
        primitive: &dyn CurvePrimitive,
        stroke_count: usize,
        fraction0: f64,
        fraction1: f64,
    );

    fn end_primitive(&mut self, primitive: &dyn CurvePrimitive);
}

/// Stroke handler that gathers every announced point into a linestring,
/// recording the source fraction of each kept point.
#[derive(Debug, Default)]
pub struct StrokeCollector {
    points: LineString3d,
    fractions: Vec<f64>,
    primitive_count: usize,
}

impl StrokeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn linestring(&self) -> &LineString3d {
        &self.points
    }

    pub fn into_linestring(self) -> LineString3d {
        self.points
    }

    pub fn fractions(&self) -> &[f64] {
        &self.fractions
    }

    /// Number of completed `start_primitive`/`end_primitive` brackets.
    pub fn primitive_count(&self) -> usize {
        self.primitive_count
    }

    fn accept(&mut self, point: Point3, fraction: f64) {
        if self.points.append_stroke_point(point) {
            self.fractions.push(fraction);
        }
    }
}

impl StrokeHandler for StrokeCollector {
    fn start_primitive(&mut self, _primitive: &dyn CurvePrimitive) {}

    fn announce_segment_interval(
        &mut self,
        _primitive: &dyn CurvePrimitive,
        point0: Point3,
        point1: Point3,
        stroke_count: usize,
        fraction0: f64,
        fraction1: f64,
    ) {
        let n = stroke_count.max(1);
        self.accept(point0, fraction0);
        for i in 1..=n {
            let s = i as f64 / n as f64;
            let point = interpolate_point(point0, s, point1);
            self.accept(point, interpolate(fraction0, s, fraction1));
        }
    }

    fn announce_interval_for_uniform_stepping(
        &mut self,
        primitive: &dyn CurvePrimitive,
        stroke_count: usize,
        fraction0: f64,
        fraction1: f64,
    ) {
        let n = stroke_count.max(1);
        for i in 0..=n {
            let fraction = interpolate(fraction0, i as f64 / n as f64, fraction1);
            self.accept(primitive.fraction_to_point(fraction), fraction);
        }
    }

    fn end_primitive(&mut self, _primitive: &dyn CurvePrimitive) {
        self.primitive_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_max_edge_length() {
        let options = StrokeOptions::new().with_max_edge_length(0.3);
        assert_eq!(options.apply_max_edge_length(1, 1.0), 4);
        assert_eq!(options.apply_max_edge_length(1, 0.2), 1);
        assert_eq!(options.apply_max_edge_length(6, 1.0), 6);
        assert_eq!(StrokeOptions::new().apply_max_edge_length(0, 100.0), 1);
    }

    #[test]
    fn test_arc_stroke_count_default_angle() {
        let options = StrokeOptions::new();
        assert_eq!(options.arc_stroke_count(1.0, PI), 8);
        assert_eq!(options.arc_stroke_count(1.0, -PI / 2.0), 4);
    }

    #[test]
    fn test_arc_stroke_count_chord() {
        let options = StrokeOptions::new().with_chord_tolerance(0.001);
        let count = options.arc_stroke_count(10.0, 2.0 * PI);
        // Check the chord error of the chosen step actually meets the bound.
        let step = 2.0 * PI / count as f64;
        assert!(10.0 * (1.0 - (step / 2.0).cos()) <= 0.001 + 1e-12);
        assert!(count > 16);
    }

    #[test]
    fn test_from_json_str() {
        let options = StrokeOptions::from_json_str(r#"{"max_edge_length": 0.5}"#).unwrap();
        assert!(options.has_max_edge_length());
        assert!(options.angle_tolerance.is_none());
        assert!(StrokeOptions::from_json_str(r#"{"max_edge_length": -1.0}"#).is_err());
        assert!(StrokeOptions::from_json_str("not json").is_err());
    }
}
