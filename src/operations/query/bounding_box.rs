use crate::error::{OperationError, Result};
use crate::math::Point3;
use crate::topology::Shape;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

/// Computes the axis-aligned bounding box of a shape.
///
/// Every edge is straight and every face planar, so the vertices bound the
/// whole shape.
pub struct BoundingBox<'a> {
    shape: &'a Shape,
}

impl<'a> BoundingBox<'a> {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new(shape: &'a Shape) -> Self {
        Self { shape }
    }

    /// Executes the query, returning the AABB.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is null.
    pub fn execute(&self) -> Result<Aabb> {
        let mut vertices = self.shape.canonical().vertices.iter();
        let Some(&first) = vertices.next() else {
            return Err(
                OperationError::InvalidInput("null shape has no bounding box".into()).into(),
            );
        };
        let mut aabb = Aabb {
            min: first,
            max: first,
        };
        for p in vertices {
            aabb.min = aabb.min.inf(p);
            aabb.max = aabb.max.sup(p);
        }
        Ok(aabb)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::operations::creation::MakeVertex;
    use approx::assert_relative_eq;

    #[test]
    fn vertex_box_is_a_point() {
        let shape = MakeVertex::new(Point::new(1.0, -2.0, 3.0)).execute();
        let aabb = BoundingBox::new(&shape).execute().unwrap();
        assert_relative_eq!(aabb.min.y, -2.0);
        assert_relative_eq!(aabb.max.y, -2.0);
    }

    #[test]
    fn null_shape_fails() {
        assert!(BoundingBox::new(&Shape::null()).execute().is_err());
    }
}
