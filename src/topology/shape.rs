use std::fmt;

use crate::error::Result;
use crate::identity;

use super::canonical::CanonicalForm;
use super::{CompoundId, EdgeId, FaceId, ShellId, SolidId, TopologyStore, VertexId, WireId};

/// The topological kind of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    Vertex,
    Edge,
    Wire,
    Face,
    Shell,
    Solid,
    Compound,
}

impl ShapeKind {
    /// All kinds, leaf first.
    pub const ALL: [Self; 7] = [
        Self::Vertex,
        Self::Edge,
        Self::Wire,
        Self::Face,
        Self::Shell,
        Self::Solid,
        Self::Compound,
    ];

    /// Stable one-byte tag used in digests and serialized shapes. Zero is
    /// never a kind tag.
    #[must_use]
    pub fn tag(self) -> u8 {
        match self {
            Self::Vertex => 1,
            Self::Edge => 2,
            Self::Wire => 3,
            Self::Face => 4,
            Self::Shell => 5,
            Self::Solid => 6,
            Self::Compound => 7,
        }
    }

    #[must_use]
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Vertex => "vertex",
            Self::Edge => "edge",
            Self::Wire => "wire",
            Self::Face => "face",
            Self::Shell => "shell",
            Self::Solid => "solid",
            Self::Compound => "compound",
        };
        f.write_str(name)
    }
}

/// A typed reference to a topological entity in a [`TopologyStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeRef {
    Vertex(VertexId),
    Edge(EdgeId),
    Wire(WireId),
    Face(FaceId),
    Shell(ShellId),
    Solid(SolidId),
    Compound(CompoundId),
}

impl ShapeRef {
    /// Returns the kind of the referenced entity.
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Vertex(_) => ShapeKind::Vertex,
            Self::Edge(_) => ShapeKind::Edge,
            Self::Wire(_) => ShapeKind::Wire,
            Self::Face(_) => ShapeKind::Face,
            Self::Shell(_) => ShapeKind::Shell,
            Self::Solid(_) => ShapeKind::Solid,
            Self::Compound(_) => ShapeKind::Compound,
        }
    }
}

/// A boundary-representation shape.
///
/// A shape is either null (nothing was built) or fully defined: it owns a
/// topology arena and a root entity in it, and everything reachable from the
/// root resolves. Shapes are immutable once built; equality and hashing are
/// structural (see [`crate::identity`]), never by instance.
#[derive(Clone)]
pub struct Shape {
    store: TopologyStore,
    root: Option<ShapeRef>,
    canonical: CanonicalForm,
    hash: u32,
}

impl Shape {
    /// Returns the null shape.
    #[must_use]
    pub fn null() -> Self {
        let canonical = CanonicalForm::default();
        let hash = identity::canonical_hash(&canonical);
        Self {
            store: TopologyStore::new(),
            root: None,
            canonical,
            hash,
        }
    }

    /// Wraps a store and a root entity into a defined shape.
    ///
    /// Unreachable entities left in `store` do not take part in the shape's
    /// identity or serialization.
    ///
    /// # Errors
    ///
    /// Returns an error if the root, or anything reachable from it, is not in
    /// the store.
    pub fn from_parts(store: TopologyStore, root: ShapeRef) -> Result<Self> {
        let canonical = CanonicalForm::capture(&store, root)?;
        let hash = identity::canonical_hash(&canonical);
        Ok(Self {
            store,
            root: Some(root),
            canonical,
            hash,
        })
    }

    /// Returns `true` if this is the null shape.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the kind of the root entity, or `None` for the null shape.
    #[must_use]
    pub fn kind(&self) -> Option<ShapeKind> {
        self.root.map(|r| r.kind())
    }

    /// Returns the root entity, or `None` for the null shape.
    #[must_use]
    pub fn root(&self) -> Option<ShapeRef> {
        self.root
    }

    /// Returns the topology arena of this shape.
    #[must_use]
    pub fn store(&self) -> &TopologyStore {
        &self.store
    }

    /// Returns the key-independent structural content of this shape.
    #[must_use]
    pub fn canonical(&self) -> &CanonicalForm {
        &self.canonical
    }

    pub(crate) fn cached_hash(&self) -> u32 {
        self.hash
    }

    /// Consumes the shape, returning its arena and root for modification.
    #[must_use]
    pub fn into_parts(self) -> (TopologyStore, Option<ShapeRef>) {
        (self.store, self.root)
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            None => f.write_str("Shape(null)"),
            Some(kind) => f
                .debug_struct("Shape")
                .field("kind", &kind)
                .field("vertices", &self.canonical.vertices.len())
                .field("edges", &self.canonical.edges.len())
                .field("faces", &self.canonical.faces.len())
                .field("hash", &self.hash)
                .finish(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::topology::VertexData;

    #[test]
    fn default_shape_is_null() {
        let shape = Shape::default();
        assert!(shape.is_null());
        assert_eq!(shape.kind(), None);
        assert_eq!(shape, Shape::null());
    }

    #[test]
    fn from_parts_defines_the_shape() {
        let mut store = TopologyStore::new();
        let v = store.add_vertex(VertexData::new(Point3::new(1.0, 2.0, 3.0)));
        let shape = Shape::from_parts(store, ShapeRef::Vertex(v)).unwrap();
        assert!(!shape.is_null());
        assert_eq!(shape.kind(), Some(ShapeKind::Vertex));
        assert_eq!(format!("{}", ShapeKind::Vertex), "vertex");
    }

    #[test]
    fn kind_tags_are_unique_and_invertible() {
        for kind in ShapeKind::ALL {
            assert_ne!(kind.tag(), 0);
            assert_eq!(ShapeKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(ShapeKind::from_tag(0), None);
        assert_eq!(ShapeKind::from_tag(8), None);
    }

    #[test]
    fn from_parts_rejects_dangling_root() {
        let mut other = TopologyStore::new();
        let v = other.add_vertex(VertexData::new(Point3::origin()));
        assert!(Shape::from_parts(TopologyStore::new(), ShapeRef::Vertex(v)).is_err());
    }
}
