//! Scalar and point interpolation helpers shared by all curve primitives.

use crate::Point3;

/// Relative size below which a denominator is treated as zero.
const DIVIDE_EPSILON: f64 = 1e-14;

/// Interpolate between `a` and `b`.
///
/// Evaluated from the nearer end so that `fraction == 0` returns `a` and
/// `fraction == 1` returns `b` exactly.
pub fn interpolate(a: f64, fraction: f64, b: f64) -> f64 {
    if fraction <= 0.5 {
        a + fraction * (b - a)
    } else {
        b - (1.0 - fraction) * (b - a)
    }
}

/// Point version of [`interpolate`], exact at both ends.
pub fn interpolate_point(a: Point3, fraction: f64, b: Point3) -> Point3 {
    if fraction <= 0.5 {
        a + fraction * (b - a)
    } else {
        b - (1.0 - fraction) * (b - a)
    }
}

/// `numerator / denominator`, or `default` when the quotient would blow up.
pub fn safe_divide_fraction(numerator: f64, denominator: f64, default: f64) -> f64 {
    if denominator.abs() <= DIVIDE_EPSILON * numerator.abs().max(1.0) {
        return default;
    }
    numerator / denominator
}

/// Map `target` from the `x0..x1` range onto `f0..f1`.
///
/// Returns `None` when `x0` and `x1` coincide.
pub fn inverse_interpolate(x0: f64, f0: f64, x1: f64, f1: f64, target: f64) -> Option<f64> {
    let dx = x1 - x0;
    if dx.abs() <= DIVIDE_EPSILON * x0.abs().max(x1.abs()).max(1.0) {
        return None;
    }
    let s = (target - x0) / dx;
    Some(interpolate(f0, s, f1))
}

/// Whether two altitudes lie strictly on opposite sides of zero.
pub fn is_sign_change(h0: f64, h1: f64) -> bool {
    (h0 < 0.0 && h1 > 0.0) || (h0 > 0.0 && h1 < 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::dvec3;

    #[test]
    fn test_interpolate_exact_ends() {
        let a = 0.1;
        let b = 0.7;
        assert_eq!(interpolate(a, 0.0, b), a);
        assert_eq!(interpolate(a, 1.0, b), b);
        let p = dvec3(0.1, 0.2, 0.3);
        let q = dvec3(1.7, -2.9, 3.3);
        assert_eq!(interpolate_point(p, 0.0, q), p);
        assert_eq!(interpolate_point(p, 1.0, q), q);
    }

    #[test]
    fn test_safe_divide() {
        assert_eq!(safe_divide_fraction(1.0, 0.0, 0.25), 0.25);
        assert_relative_eq!(safe_divide_fraction(1.0, 4.0, 0.0), 0.25);
    }

    #[test]
    fn test_inverse_interpolate() {
        let f = inverse_interpolate(-1.0, 0.0, 3.0, 1.0, 0.0).unwrap();
        assert_relative_eq!(f, 0.25);
        assert!(inverse_interpolate(2.0, 0.0, 2.0, 1.0, 0.0).is_none());
    }

    #[test]
    fn test_sign_change() {
        assert!(is_sign_change(-1.0, 2.0));
        assert!(!is_sign_change(0.0, 2.0));
        assert!(!is_sign_change(1.0, 2.0));
    }
}
