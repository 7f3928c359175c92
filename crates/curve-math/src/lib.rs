pub mod aabb;
pub mod plane;
pub mod ray;
pub mod scalar;
pub mod transform;

pub use glam::{DAffine3, DMat3, DMat4, DVec2, DVec3, DVec4};
pub use aabb::Aabb3;
pub use plane::{Plane, PlaneAltitudeEvaluator};
pub use ray::Ray;
pub use transform::Transform;

pub type Point2 = DVec2;
pub type Point3 = DVec3;
pub type Vector2 = DVec2;
pub type Vector3 = DVec3;
