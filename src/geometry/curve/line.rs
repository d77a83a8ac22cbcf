use crate::error::Result;
use crate::math::{Point3, Vector3};

use super::Curve;

/// An infinite line defined by an origin point and a direction vector.
///
/// The parametric form is: `P(t) = origin + t * direction`.
#[derive(Debug, Clone)]
pub struct Line {
    origin: Point3,
    direction: Vector3,
}

impl Line {
    /// Creates a new line from an origin and direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vector is zero-length.
    pub fn new(origin: Point3, direction: Vector3) -> Result<Self> {
        let len = direction.norm();
        if len < crate::math::TOLERANCE {
            return Err(crate::error::GeometryError::ZeroVector.into());
        }
        Ok(Self {
            origin,
            direction: direction / len,
        })
    }

    /// Creates the line through `start` and `end`, returning it with the
    /// parameters of both points.
    ///
    /// # Errors
    ///
    /// Returns an error if the points coincide.
    pub fn through(start: Point3, end: Point3) -> Result<(Self, f64, f64)> {
        let line = Self::new(start, end - start)?;
        let t_end = (end - start).norm();
        Ok((line, 0.0, t_end))
    }

    /// Rebuilds a line from already-normalized parts.
    pub(crate) fn from_raw_parts(origin: Point3, direction: Vector3) -> Self {
        Self { origin, direction }
    }

    /// Returns the origin point of the line.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the unit direction vector of the line.
    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }
}

impl Curve for Line {
    fn evaluate(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    fn tangent(&self, _t: f64) -> Vector3 {
        self.direction
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn through_two_points() {
        let (line, t0, t1) =
            Line::through(Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 3.0, 4.0)).unwrap();
        assert_relative_eq!(t0, 0.0);
        assert_relative_eq!(t1, 5.0);
        let end = line.evaluate(t1);
        assert_relative_eq!(end.y, 3.0, epsilon = 1e-12);
        assert_relative_eq!(end.z, 4.0, epsilon = 1e-12);
        assert_relative_eq!(line.tangent(0.0).norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn coincident_points_fail() {
        let p = Point3::new(1.0, 1.0, 1.0);
        assert!(Line::through(p, p).is_err());
    }
}
