//! Resolved positions on curves.

use curve_core::CurveRef;
use curve_math::Point3;
use serde::{Deserialize, Serialize};

use crate::curve::CurvePrimitive;

/// Outcome of a search along a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveSearchStatus {
    /// The requested position was reached.
    Success,
    /// The curve ended before the requested position; the detail holds
    /// the boundary point.
    StoppedAtBoundary,
}

/// Role of an intersection detail relative to neighbouring details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveIntervalRole {
    /// Transverse crossing strictly inside a segment.
    IsolatedPoint,
    /// Single vertex touching the plane.
    IsolatedAtVertex,
    IntervalStart,
    IntervalInterior,
    IntervalEnd,
}

/// Which ends of a curve may be extended when projecting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveExtendOptions {
    pub start: bool,
    pub end: bool,
}

impl CurveExtendOptions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn both() -> Self {
        Self {
            start: true,
            end: true,
        }
    }
}

impl From<bool> for CurveExtendOptions {
    fn from(extend: bool) -> Self {
        Self {
            start: extend,
            end: extend,
        }
    }
}

/// A fraction and point on a specific curve, with search metadata.
///
/// `curve` identifies the producing primitive at the revision the query
/// ran against. Mutating that primitive makes the detail stale; check
/// with [`CurveLocationDetail::is_current_for`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveLocationDetail {
    pub curve: CurveRef,
    pub fraction: f64,
    pub point: Point3,
    /// Distance associated with the query: signed distance moved for
    /// marching, distance to the space point for closest-point searches.
    pub a: Option<f64>,
    pub status: CurveSearchStatus,
    pub interval_role: Option<CurveIntervalRole>,
}

impl CurveLocationDetail {
    pub fn new(curve: CurveRef, fraction: f64, point: Point3) -> Self {
        Self {
            curve,
            fraction,
            point,
            a: None,
            status: CurveSearchStatus::Success,
            interval_role: None,
        }
    }

    pub fn with_distance(mut self, a: f64) -> Self {
        self.a = Some(a);
        self
    }

    pub fn with_status(mut self, status: CurveSearchStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_interval_role(mut self, role: CurveIntervalRole) -> Self {
        self.interval_role = Some(role);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == CurveSearchStatus::Success
    }

    /// True while `curve` is the primitive that produced this detail and
    /// has not been edited since.
    pub fn is_current_for(&self, curve: &dyn CurvePrimitive) -> bool {
        self.curve == curve.curve_ref()
    }
}
