mod line;

pub use line::Line;

use crate::math::{Point3, Vector3};

/// Trait for parametric curves in 3D space.
pub trait Curve {
    /// Evaluates the curve at parameter `t`, returning the 3D point.
    fn evaluate(&self, t: f64) -> Point3;

    /// Computes the tangent vector at parameter `t`.
    fn tangent(&self, t: f64) -> Vector3;
}
