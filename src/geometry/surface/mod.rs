mod plane;

pub use plane::Plane;

use crate::math::{Point3, Vector3};

/// Trait for parametric surfaces in 3D space.
pub trait Surface {
    /// Evaluates the surface at parameters `(u, v)`, returning the 3D point.
    fn evaluate(&self, u: f64, v: f64) -> Point3;

    /// Computes the surface normal at parameters `(u, v)`.
    fn normal(&self, u: f64, v: f64) -> Vector3;
}
