use crate::{DMat3, DMat4, Point3, Vector3};
use curve_core::Tolerance;
use serde::{Deserialize, Serialize};

/// Affine transform stored as a column-major 4x4 matrix.
///
/// Frames produced by curve primitives are rigid (orthonormal,
/// right-handed); general transforms applied to curves may also scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Transform {
    pub matrix: [f64; 16],
}

impl Transform {
    pub fn identity() -> Self {
        Self::from_mat4(DMat4::IDENTITY)
    }

    pub fn from_translation(t: Vector3) -> Self {
        Self::from_mat4(DMat4::from_translation(t))
    }

    pub fn from_scale(s: Vector3) -> Self {
        Self::from_mat4(DMat4::from_scale(s))
    }

    /// Rotation about `axis` (through the origin) by `angle` radians.
    /// `axis` must be normalized.
    pub fn from_axis_angle(axis: Vector3, angle: f64) -> Self {
        Self::from_mat4(DMat4::from_axis_angle(axis, angle))
    }

    /// Frame whose columns are the given axes and whose translation is `origin`.
    pub fn from_origin_and_axes(origin: Point3, x: Vector3, y: Vector3, z: Vector3) -> Self {
        Self::from_mat4(DMat4::from_cols(
            x.extend(0.0),
            y.extend(0.0),
            z.extend(0.0),
            origin.extend(1.0),
        ))
    }

    /// Rigid frame with x along `x_direction` and z as close to
    /// `normal_hint` as possible while perpendicular to x.
    ///
    /// Returns `None` if `x_direction` is zero or parallel to `normal_hint`.
    pub fn rigid_from_x_and_normal(
        origin: Point3,
        x_direction: Vector3,
        normal_hint: Vector3,
    ) -> Option<Self> {
        let x = x_direction.try_normalize()?;
        let z_raw = normal_hint - x * normal_hint.dot(x);
        if z_raw.length() <= Tolerance::DEFAULT_ANGULAR * normal_hint.length() {
            return None;
        }
        let z = z_raw.try_normalize()?;
        let y = z.cross(x);
        Some(Self::from_origin_and_axes(origin, x, y, z))
    }

    /// Rigid frame with x along `x_direction` and z "heads up": global Z
    /// unless x is nearly vertical, in which case global X.
    pub fn rigid_heads_up(origin: Point3, x_direction: Vector3) -> Option<Self> {
        let x = x_direction.try_normalize()?;
        let up = if x.z.abs() < 0.9 { Vector3::Z } else { Vector3::X };
        Self::rigid_from_x_and_normal(origin, x, up)
    }

    pub fn from_mat4(m: DMat4) -> Self {
        Self {
            matrix: m.to_cols_array(),
        }
    }

    pub fn to_mat4(&self) -> DMat4 {
        DMat4::from_cols_array(&self.matrix)
    }

    /// Linear (3x3) part of the transform.
    pub fn matrix3(&self) -> DMat3 {
        DMat3::from_mat4(self.to_mat4())
    }

    pub fn origin(&self) -> Point3 {
        self.to_mat4().w_axis.truncate()
    }

    /// Column `index` (0, 1 or 2) of the linear part.
    pub fn axis(&self, index: usize) -> Vector3 {
        self.matrix3().col(index)
    }

    /// True when the linear part is the identity.
    pub fn is_translation_only(&self) -> bool {
        self.matrix3().abs_diff_eq(DMat3::IDENTITY, Tolerance::DEFAULT_ANGULAR)
    }

    /// True when the linear part is orthonormal and right-handed.
    pub fn is_rigid(&self) -> bool {
        let m = self.matrix3();
        (m.transpose() * m).abs_diff_eq(DMat3::IDENTITY, 1e-9) && m.determinant() > 0.0
    }

    pub fn transform_point(&self, p: Point3) -> Point3 {
        self.to_mat4().transform_point3(p)
    }

    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        self.to_mat4().transform_vector3(v)
    }

    pub fn then(&self, other: &Transform) -> Transform {
        Self::from_mat4(other.to_mat4() * self.to_mat4())
    }

    pub fn inverse(&self) -> Option<Transform> {
        let m = self.to_mat4();
        // Check if inverse is valid (determinant != 0)
        if m.determinant().abs() < 1e-15 {
            None
        } else {
            Some(Self::from_mat4(m.inverse()))
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec3;

    #[test]
    fn test_identity() {
        let t = Transform::identity();
        let p = dvec3(1.0, 2.0, 3.0);
        let result = t.transform_point(p);
        assert!((result - p).length() < 1e-10);
        assert!(t.is_translation_only());
    }

    #[test]
    fn test_translation() {
        let t = Transform::from_translation(dvec3(10.0, 20.0, 30.0));
        let p = dvec3(1.0, 2.0, 3.0);
        let result = t.transform_point(p);
        assert!((result - dvec3(11.0, 22.0, 33.0)).length() < 1e-10);
        assert!((t.origin() - dvec3(10.0, 20.0, 30.0)).length() < 1e-12);
    }

    #[test]
    fn test_inverse() {
        let t = Transform::from_translation(dvec3(10.0, 20.0, 30.0));
        let inv = t.inverse().unwrap();
        let p = dvec3(1.0, 2.0, 3.0);
        let result = inv.transform_point(t.transform_point(p));
        assert!((result - p).length() < 1e-10);
        assert!(Transform::from_scale(dvec3(1.0, 0.0, 1.0)).inverse().is_none());
    }

    #[test]
    fn test_rigid_from_x_and_normal() {
        let frame =
            Transform::rigid_from_x_and_normal(dvec3(1.0, 1.0, 0.0), dvec3(2.0, 0.0, 0.0), dvec3(0.3, 0.0, 5.0))
                .unwrap();
        assert!(frame.is_rigid());
        assert!((frame.axis(0) - Vector3::X).length() < 1e-12);
        assert!((frame.axis(1) - Vector3::Y).length() < 1e-12);
        assert!((frame.axis(2) - Vector3::Z).length() < 1e-12);
    }

    #[test]
    fn test_rigid_rejects_parallel_normal() {
        assert!(Transform::rigid_from_x_and_normal(Point3::ZERO, Vector3::X, dvec3(3.0, 0.0, 0.0)).is_none());
        assert!(Transform::rigid_heads_up(Point3::ZERO, Vector3::ZERO).is_none());
    }

    #[test]
    fn test_heads_up_vertical() {
        let frame = Transform::rigid_heads_up(Point3::ZERO, dvec3(0.0, 0.0, 2.0)).unwrap();
        assert!(frame.is_rigid());
        assert!((frame.axis(0) - Vector3::Z).length() < 1e-12);
    }

    #[test]
    fn test_scale_is_not_rigid() {
        assert!(!Transform::from_scale(dvec3(2.0, 2.0, 2.0)).is_rigid());
        assert!(Transform::from_axis_angle(Vector3::Z, 0.7).is_rigid());
    }
}
