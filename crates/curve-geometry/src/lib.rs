//! Curve kernel: linestrings, segments and arcs under a shared fractional
//! parameterization, with marching, stroking and clipping.

pub mod clip;
pub mod curve;
pub mod detail;
pub mod growable;
pub mod stroke;
pub mod tessellate;

pub use clip::{ClipOracle, ConvexClipPlaneSet};
pub use curve::{Arc3d, CurvePrimitive, LineSegment3d, LineString3d, MoveByDistanceContext};
pub use detail::{
    CurveExtendOptions, CurveIntervalRole, CurveLocationDetail, CurveSearchStatus,
};
pub use growable::GrowableXyzArray;
pub use stroke::{StrokeCollector, StrokeHandler, StrokeOptions};
