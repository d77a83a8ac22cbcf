use slotmap::{Key, SecondaryMap};
use tracing::trace;

use crate::error::TopologyError;

use super::{
    CompoundId, EdgeId, FaceId, ShapeRef, ShellId, SolidId, TopologyStore, VertexId, WireId,
};

/// Entities of one kind in first-visit order, with their positions.
#[derive(Debug, Clone)]
pub struct Visited<K: Key> {
    order: Vec<K>,
    index: SecondaryMap<K, u32>,
}

impl<K: Key> Default for Visited<K> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            index: SecondaryMap::new(),
        }
    }
}

impl<K: Key> Visited<K> {
    /// Records `key`, returning `true` if it had not been seen before.
    fn visit(&mut self, key: K) -> Result<bool, TopologyError> {
        if self.index.contains_key(key) {
            return Ok(false);
        }
        let position = u32::try_from(self.order.len())
            .map_err(|_| TopologyError::InvalidTopology("too many entities".into()))?;
        self.index.insert(key, position);
        self.order.push(key);
        Ok(true)
    }

    /// The visited keys in first-visit order.
    #[must_use]
    pub fn order(&self) -> &[K] {
        &self.order
    }

    /// Position of `key` in first-visit order.
    #[must_use]
    pub fn index_of(&self, key: K) -> Option<u32> {
        self.index.get(key).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Depth-first walk over everything reachable from a root entity.
///
/// Every entity is recorded once, at its first visit. Children are visited
/// in stored order: compound children, solid shells (outer first), shell
/// faces, face wires (outer first), wire edges, edge start then end vertex.
/// The resulting numbering is independent of arena keys, which makes it the
/// basis of structural identity.
#[derive(Debug, Clone, Default)]
pub struct Traversal {
    pub vertices: Visited<VertexId>,
    pub edges: Visited<EdgeId>,
    pub wires: Visited<WireId>,
    pub faces: Visited<FaceId>,
    pub shells: Visited<ShellId>,
    pub solids: Visited<SolidId>,
    pub compounds: Visited<CompoundId>,
}

impl Traversal {
    /// Walks `store` from `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if a reachable entity is missing from the store.
    pub fn run(store: &TopologyStore, root: ShapeRef) -> Result<Self, TopologyError> {
        let mut traversal = Self::default();
        traversal.visit(store, root)?;
        trace!(
            vertices = traversal.vertices.len(),
            edges = traversal.edges.len(),
            faces = traversal.faces.len(),
            "traversed shape"
        );
        Ok(traversal)
    }

    /// Position of `entity` within the list of its own kind.
    #[must_use]
    pub fn index_of(&self, entity: ShapeRef) -> Option<u32> {
        match entity {
            ShapeRef::Vertex(id) => self.vertices.index_of(id),
            ShapeRef::Edge(id) => self.edges.index_of(id),
            ShapeRef::Wire(id) => self.wires.index_of(id),
            ShapeRef::Face(id) => self.faces.index_of(id),
            ShapeRef::Shell(id) => self.shells.index_of(id),
            ShapeRef::Solid(id) => self.solids.index_of(id),
            ShapeRef::Compound(id) => self.compounds.index_of(id),
        }
    }

    fn visit(&mut self, store: &TopologyStore, entity: ShapeRef) -> Result<(), TopologyError> {
        match entity {
            ShapeRef::Vertex(id) => self.visit_vertex(store, id),
            ShapeRef::Edge(id) => self.visit_edge(store, id),
            ShapeRef::Wire(id) => self.visit_wire(store, id),
            ShapeRef::Face(id) => self.visit_face(store, id),
            ShapeRef::Shell(id) => self.visit_shell(store, id),
            ShapeRef::Solid(id) => self.visit_solid(store, id),
            ShapeRef::Compound(id) => self.visit_compound(store, id),
        }
    }

    fn visit_vertex(&mut self, store: &TopologyStore, id: VertexId) -> Result<(), TopologyError> {
        store.vertex(id)?;
        self.vertices.visit(id)?;
        Ok(())
    }

    fn visit_edge(&mut self, store: &TopologyStore, id: EdgeId) -> Result<(), TopologyError> {
        let edge = store.edge(id)?;
        if self.edges.visit(id)? {
            self.visit_vertex(store, edge.start)?;
            self.visit_vertex(store, edge.end)?;
        }
        Ok(())
    }

    fn visit_wire(&mut self, store: &TopologyStore, id: WireId) -> Result<(), TopologyError> {
        let wire = store.wire(id)?;
        if self.wires.visit(id)? {
            for oe in &wire.edges {
                self.visit_edge(store, oe.edge)?;
            }
        }
        Ok(())
    }

    fn visit_face(&mut self, store: &TopologyStore, id: FaceId) -> Result<(), TopologyError> {
        let face = store.face(id)?;
        if self.faces.visit(id)? {
            self.visit_wire(store, face.outer_wire)?;
            for &inner in &face.inner_wires {
                self.visit_wire(store, inner)?;
            }
        }
        Ok(())
    }

    fn visit_shell(&mut self, store: &TopologyStore, id: ShellId) -> Result<(), TopologyError> {
        let shell = store.shell(id)?;
        if self.shells.visit(id)? {
            for &face in &shell.faces {
                self.visit_face(store, face)?;
            }
        }
        Ok(())
    }

    fn visit_solid(&mut self, store: &TopologyStore, id: SolidId) -> Result<(), TopologyError> {
        let solid = store.solid(id)?;
        if self.solids.visit(id)? {
            for shell in solid.shells() {
                self.visit_shell(store, shell)?;
            }
        }
        Ok(())
    }

    // Compounds may nest arbitrarily deep, so they are walked from an explicit
    // stack of (compound, next child) pairs instead of by recursion.
    fn visit_compound(
        &mut self,
        store: &TopologyStore,
        id: CompoundId,
    ) -> Result<(), TopologyError> {
        store.compound(id)?;
        if !self.compounds.visit(id)? {
            return Ok(());
        }
        let mut stack = vec![(id, 0usize)];
        while let Some((current, next)) = stack.pop() {
            let Some(&child) = store.compound(current)?.children.get(next) else {
                continue;
            };
            stack.push((current, next + 1));
            match child {
                ShapeRef::Compound(inner) => {
                    store.compound(inner)?;
                    if self.compounds.visit(inner)? {
                        stack.push((inner, 0));
                    }
                }
                other => self.visit(store, other)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Line;
    use crate::math::Point3;
    use crate::topology::{CompoundData, EdgeCurve, EdgeData, VertexData};

    #[test]
    fn shared_vertices_are_visited_once() {
        let mut store = TopologyStore::new();
        let a = store.add_vertex(VertexData::new(Point3::new(0.0, 0.0, 0.0)));
        let b = store.add_vertex(VertexData::new(Point3::new(1.0, 0.0, 0.0)));
        let (line, t_start, t_end) =
            Line::through(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)).unwrap();
        let edge = store.add_edge(EdgeData {
            start: b,
            end: a,
            curve: EdgeCurve::Line(line),
            t_start,
            t_end,
        });

        let traversal = Traversal::run(&store, ShapeRef::Edge(edge)).unwrap();
        assert_eq!(traversal.edges.len(), 1);
        assert_eq!(traversal.vertices.order(), &[b, a]);
        assert_eq!(traversal.index_of(ShapeRef::Vertex(a)), Some(1));
    }

    #[test]
    fn compound_children_are_visited_in_order() {
        let mut store = TopologyStore::new();
        let a = store.add_vertex(VertexData::new(Point3::new(0.0, 0.0, 0.0)));
        let b = store.add_vertex(VertexData::new(Point3::new(1.0, 0.0, 0.0)));
        let inner = store.add_compound(CompoundData {
            children: vec![ShapeRef::Vertex(b)],
        });
        let outer = store.add_compound(CompoundData {
            children: vec![ShapeRef::Compound(inner), ShapeRef::Vertex(a)],
        });
        let traversal = Traversal::run(&store, ShapeRef::Compound(outer)).unwrap();
        assert_eq!(traversal.compounds.order(), &[outer, inner]);
        assert_eq!(traversal.vertices.order(), &[b, a]);
    }

    #[test]
    fn deep_compound_chain_does_not_recurse() {
        let mut store = TopologyStore::new();
        let v = store.add_vertex(VertexData::new(Point3::origin()));
        let mut top = ShapeRef::Vertex(v);
        for _ in 0..50_000 {
            top = ShapeRef::Compound(store.add_compound(CompoundData {
                children: vec![top],
            }));
        }
        let traversal = Traversal::run(&store, top).unwrap();
        assert_eq!(traversal.compounds.len(), 50_000);
        assert_eq!(traversal.vertices.len(), 1);
    }

    #[test]
    fn missing_root_is_an_error() {
        let mut other = TopologyStore::new();
        let foreign = other.add_vertex(VertexData::new(Point3::origin()));
        let store = TopologyStore::new();
        assert!(Traversal::run(&store, ShapeRef::Vertex(foreign)).is_err());
    }
}
