/// Global and local tolerance management for geometric computations.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Linear tolerance for distance comparisons (in model units)
    pub linear: f64,
    /// Angular tolerance (in radians)
    pub angular: f64,
}

impl Tolerance {
    pub const DEFAULT_LINEAR: f64 = 1e-7;
    pub const DEFAULT_ANGULAR: f64 = 1e-10;

    /// Distance below which two coordinates are the same point.
    ///
    /// Used for snap-to-target in distance marching and for on-plane
    /// vertex classification.
    pub const SMALL_METRIC_DISTANCE: f64 = 1e-6;

    /// Fraction difference considered zero.
    pub const SMALL_FRACTION: f64 = 1e-10;

    pub fn new(linear: f64, angular: f64) -> Self {
        Self { linear, angular }
    }

    pub fn default_precision() -> Self {
        Self {
            linear: Self::DEFAULT_LINEAR,
            angular: Self::DEFAULT_ANGULAR,
        }
    }

    /// Same coordinate under [`Tolerance::SMALL_METRIC_DISTANCE`].
    pub fn is_same_coordinate(a: f64, b: f64) -> bool {
        (a - b).abs() <= Self::SMALL_METRIC_DISTANCE
    }

    pub fn is_small_metric_distance(d: f64) -> bool {
        d.abs() <= Self::SMALL_METRIC_DISTANCE
    }

    pub fn is_small_fraction(f: f64) -> bool {
        f.abs() <= Self::SMALL_FRACTION
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_default_precision() {
        let tol = Tolerance::default();
        assert_eq!(tol.linear, Tolerance::DEFAULT_LINEAR);
        assert_eq!(tol.angular, Tolerance::DEFAULT_ANGULAR);
    }

    #[test]
    fn test_same_coordinate_snap() {
        assert!(Tolerance::is_same_coordinate(3.0, 3.0 + 5e-7));
        assert!(!Tolerance::is_same_coordinate(3.0, 3.0 + 1e-5));
    }

    #[test]
    fn test_tolerance_json() {
        let json = r#"{"linear": 0.001, "angular": 0.01}"#;
        let tol: Tolerance = serde_json::from_str(json).unwrap();
        assert_eq!(tol.linear, 0.001);
        assert_eq!(tol.angular, 0.01);
    }
}
