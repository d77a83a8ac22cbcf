use tracing::debug;

use crate::geometry::Point;
use crate::topology::{Shape, ShapeRef, TopologyStore, VertexData};

/// Creates a vertex shape at a point.
pub struct MakeVertex {
    point: Point,
}

impl MakeVertex {
    /// Creates a new `MakeVertex` operation.
    #[must_use]
    pub fn new(point: Point) -> Self {
        Self { point }
    }

    /// Executes the operation, returning a defined vertex shape.
    ///
    /// Construction cannot fail; non-finite coordinates are kept as given and
    /// reported by [`crate::operations::query::IsValid`].
    #[must_use]
    pub fn execute(&self) -> Shape {
        let mut store = TopologyStore::new();
        let id = store.add_vertex(VertexData::new(*self.point.position()));
        debug!(coord = ?self.point.coord(), "made vertex");
        // The root was inserted just above, so wrapping it cannot fail.
        Shape::from_parts(store, ShapeRef::Vertex(id)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::ShapeKind;

    #[test]
    fn vertex_wraps_its_point() {
        let shape = MakeVertex::new(Point::new(1.0, 2.0, 3.0)).execute();
        assert_eq!(shape.kind(), Some(ShapeKind::Vertex));
        assert_eq!(shape.canonical().vertices.len(), 1);
        let Some(ShapeRef::Vertex(id)) = shape.root() else {
            panic!("expected a vertex root");
        };
        let point = shape.store().vertex_point(id);
        assert!(matches!(point, Ok(p) if p == *Point::new(1.0, 2.0, 3.0).position()));
    }

    #[test]
    fn same_point_same_vertex() {
        let a = MakeVertex::new(Point::new(1.0, 2.0, 3.0)).execute();
        let b = MakeVertex::new(Point::new(1.0, 2.0, 3.0)).execute();
        let c = MakeVertex::new(Point::new(5.0, 7.0, 8.0)).execute();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
