use crate::error::Result;
use crate::topology::{
    CompoundId, EdgeId, FaceId, Shape, ShapeKind, ShellId, SolidId, Traversal, VertexId, WireId,
};

/// The unique sub-shapes of a shape, each list in depth-first first-visit
/// order.
#[derive(Debug, Clone, Default)]
pub struct Exploration {
    pub vertices: Vec<VertexId>,
    pub edges: Vec<EdgeId>,
    pub wires: Vec<WireId>,
    pub faces: Vec<FaceId>,
    pub shells: Vec<ShellId>,
    pub solids: Vec<SolidId>,
    pub compounds: Vec<CompoundId>,
}

impl Exploration {
    /// Number of unique sub-shapes of `kind`.
    #[must_use]
    pub fn count(&self, kind: ShapeKind) -> usize {
        match kind {
            ShapeKind::Vertex => self.vertices.len(),
            ShapeKind::Edge => self.edges.len(),
            ShapeKind::Wire => self.wires.len(),
            ShapeKind::Face => self.faces.len(),
            ShapeKind::Shell => self.shells.len(),
            ShapeKind::Solid => self.solids.len(),
            ShapeKind::Compound => self.compounds.len(),
        }
    }
}

/// Enumerates the sub-shapes of a shape.
///
/// Shared entities (for example an edge bounding two faces) are listed once.
/// The root itself is included in its kind's list. A null shape has no
/// sub-shapes.
pub struct Explore<'a> {
    shape: &'a Shape,
}

impl<'a> Explore<'a> {
    /// Creates a new `Explore` query.
    #[must_use]
    pub fn new(shape: &'a Shape) -> Self {
        Self { shape }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape's arena is inconsistent.
    pub fn execute(&self) -> Result<Exploration> {
        let Some(root) = self.shape.root() else {
            return Ok(Exploration::default());
        };
        let traversal = Traversal::run(self.shape.store(), root)?;
        Ok(Exploration {
            vertices: traversal.vertices.order().to_vec(),
            edges: traversal.edges.order().to_vec(),
            wires: traversal.wires.order().to_vec(),
            faces: traversal.faces.order().to_vec(),
            shells: traversal.shells.order().to_vec(),
            solids: traversal.solids.order().to_vec(),
            compounds: traversal.compounds.order().to_vec(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::operations::creation::{MakeBox, MakeCompound, MakeVertex};

    #[test]
    fn box_topology_counts() {
        let shape = MakeBox::new(10.0, 10.0, 10.0).execute().unwrap();
        let topo = Explore::new(&shape).execute().unwrap();
        assert_eq!(topo.count(ShapeKind::Vertex), 8);
        assert_eq!(topo.count(ShapeKind::Edge), 12);
        assert_eq!(topo.count(ShapeKind::Wire), 6);
        assert_eq!(topo.count(ShapeKind::Face), 6);
        assert_eq!(topo.count(ShapeKind::Shell), 1);
        assert_eq!(topo.count(ShapeKind::Solid), 1);
        assert_eq!(topo.count(ShapeKind::Compound), 0);
    }

    #[test]
    fn explored_ids_resolve_in_the_shape() {
        let shape = MakeBox::new(1.0, 2.0, 3.0).execute().unwrap();
        let topo = Explore::new(&shape).execute().unwrap();
        for &face in &topo.faces {
            assert!(shape.store().face(face).is_ok());
        }
    }

    #[test]
    fn compound_lists_members() {
        let compound = MakeCompound::new(vec![
            MakeBox::new(1.0, 1.0, 1.0).execute().unwrap(),
            MakeVertex::new(Point::new(9.0, 9.0, 9.0)).execute(),
        ])
        .execute()
        .unwrap();
        let topo = Explore::new(&compound).execute().unwrap();
        assert_eq!(topo.count(ShapeKind::Compound), 1);
        assert_eq!(topo.count(ShapeKind::Solid), 1);
        assert_eq!(topo.count(ShapeKind::Vertex), 9);
    }

    #[test]
    fn null_shape_is_empty() {
        let topo = Explore::new(&Shape::null()).execute().unwrap();
        assert_eq!(topo.count(ShapeKind::Vertex), 0);
    }
}
