use tracing::debug;

use crate::error::Result;
use crate::topology::{CompoundData, Shape, ShapeRef, TopologyStore};

/// Groups shapes into a compound shape.
///
/// Each member is copied into the compound's own arena, so the result owns
/// all of its structure. Null members are skipped.
pub struct MakeCompound {
    shapes: Vec<Shape>,
}

impl MakeCompound {
    /// Creates a new `MakeCompound` operation.
    #[must_use]
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    /// Executes the operation, returning the compound shape.
    ///
    /// # Errors
    ///
    /// Returns an error if a member's structure cannot be copied.
    pub fn execute(&self) -> Result<Shape> {
        let mut store = TopologyStore::new();
        let mut children = Vec::with_capacity(self.shapes.len());
        for shape in &self.shapes {
            match shape.canonical().instantiate_into(&mut store)? {
                Some(root) => children.push(root),
                None => debug!("skipping null shape in compound"),
            }
        }
        let count = children.len();
        let id = store.add_compound(CompoundData { children });
        debug!(members = count, "made compound");
        Shape::from_parts(store, ShapeRef::Compound(id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::operations::creation::{MakeBox, MakeVertex};
    use crate::topology::ShapeKind;

    #[test]
    fn compound_owns_copies_of_its_members() {
        let cube = MakeBox::new(1.0, 1.0, 1.0).execute().unwrap();
        let vertex = MakeVertex::new(Point::new(5.0, 5.0, 5.0)).execute();
        let compound = MakeCompound::new(vec![cube, vertex, Shape::null()])
            .execute()
            .unwrap();

        assert_eq!(compound.kind(), Some(ShapeKind::Compound));
        let form = compound.canonical();
        assert_eq!(form.compounds[0].children.len(), 2);
        assert_eq!(form.count(ShapeKind::Solid), 1);
        assert_eq!(form.count(ShapeKind::Vertex), 9);
    }

    #[test]
    fn member_order_matters() {
        let a = MakeVertex::new(Point::new(1.0, 0.0, 0.0)).execute();
        let b = MakeVertex::new(Point::new(0.0, 1.0, 0.0)).execute();
        let ab = MakeCompound::new(vec![a.clone(), b.clone()]).execute().unwrap();
        let ba = MakeCompound::new(vec![b, a]).execute().unwrap();
        assert_ne!(ab, ba);
    }

    #[test]
    fn nested_compounds() {
        let inner = MakeCompound::new(vec![MakeVertex::new(Point::new(1.0, 2.0, 3.0)).execute()])
            .execute()
            .unwrap();
        let outer = MakeCompound::new(vec![inner.clone(), inner]).execute().unwrap();
        assert_eq!(outer.canonical().count(ShapeKind::Compound), 3);
    }
}
