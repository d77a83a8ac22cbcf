//! Key-independent description of a shape's structure.
//!
//! A [`CanonicalForm`] lists every entity reachable from a shape's root in
//! [`Traversal`] order, with cross references expressed as positions in those
//! lists instead of arena keys. Two shapes are structurally equal exactly when
//! their canonical forms are equal.

use crate::error::{Result, TopologyError};
use crate::geometry::{Line, Plane};
use crate::math::{point_eq, scalar_eq, vector_eq, Point3, Vector3};

use super::{
    CompoundData, CompoundId, EdgeCurve, EdgeData, EdgeId, FaceData, FaceId, FaceSurface,
    OrientedEdge, ShapeKind, ShapeRef, ShellData, ShellId, SolidData, SolidId, TopologyStore,
    Traversal, VertexData, VertexId, WireData, WireId,
};

/// A reference to a canonical entity: its kind and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanonicalRef {
    pub kind: ShapeKind,
    pub index: u32,
}

#[derive(Debug, Clone)]
pub struct CanonicalEdge {
    pub start: u32,
    pub end: u32,
    pub origin: Point3,
    pub direction: Vector3,
    pub t_start: f64,
    pub t_end: f64,
}

impl PartialEq for CanonicalEdge {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
            && self.end == other.end
            && point_eq(&self.origin, &other.origin)
            && vector_eq(&self.direction, &other.direction)
            && scalar_eq(self.t_start, other.t_start)
            && scalar_eq(self.t_end, other.t_end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalWire {
    /// `(edge index, forward)` pairs in wire order.
    pub edges: Vec<(u32, bool)>,
    pub is_closed: bool,
}

#[derive(Debug, Clone)]
pub struct CanonicalFace {
    pub origin: Point3,
    pub u_dir: Vector3,
    pub v_dir: Vector3,
    pub outer_wire: u32,
    pub inner_wires: Vec<u32>,
    pub same_sense: bool,
}

impl PartialEq for CanonicalFace {
    fn eq(&self, other: &Self) -> bool {
        point_eq(&self.origin, &other.origin)
            && vector_eq(&self.u_dir, &other.u_dir)
            && vector_eq(&self.v_dir, &other.v_dir)
            && self.outer_wire == other.outer_wire
            && self.inner_wires == other.inner_wires
            && self.same_sense == other.same_sense
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalShell {
    pub faces: Vec<u32>,
    pub is_closed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalSolid {
    pub outer_shell: u32,
    pub inner_shells: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCompound {
    pub children: Vec<CanonicalRef>,
}

/// The structural content of a shape, free of arena keys.
///
/// The default value describes the null shape.
#[derive(Debug, Clone, Default)]
pub struct CanonicalForm {
    pub vertices: Vec<Point3>,
    pub edges: Vec<CanonicalEdge>,
    pub wires: Vec<CanonicalWire>,
    pub faces: Vec<CanonicalFace>,
    pub shells: Vec<CanonicalShell>,
    pub solids: Vec<CanonicalSolid>,
    pub compounds: Vec<CanonicalCompound>,
    pub root: Option<CanonicalRef>,
}

impl PartialEq for CanonicalForm {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
            && self.vertices.len() == other.vertices.len()
            && self
                .vertices
                .iter()
                .zip(&other.vertices)
                .all(|(a, b)| point_eq(a, b))
            && self.edges == other.edges
            && self.wires == other.wires
            && self.faces == other.faces
            && self.shells == other.shells
            && self.solids == other.solids
            && self.compounds == other.compounds
    }
}

// Float comparisons go through canonical bit patterns, so equality is reflexive.
impl Eq for CanonicalForm {}

fn missing(what: &str) -> TopologyError {
    TopologyError::InvalidTopology(format!("unreachable {what} referenced during capture"))
}

fn out_of_range(what: &str, index: u32) -> TopologyError {
    TopologyError::InvalidTopology(format!("{what} index {index} out of range"))
}

impl CanonicalForm {
    /// Captures the structure reachable from `root` in `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if a reachable entity is missing from the store.
    pub fn capture(store: &TopologyStore, root: ShapeRef) -> Result<Self> {
        let traversal = Traversal::run(store, root)?;
        let mut form = Self::default();

        for &id in traversal.vertices.order() {
            form.vertices.push(store.vertex(id)?.point);
        }

        for &id in traversal.edges.order() {
            let edge = store.edge(id)?;
            let EdgeCurve::Line(line) = &edge.curve;
            form.edges.push(CanonicalEdge {
                start: traversal.vertices.index_of(edge.start).ok_or_else(|| missing("vertex"))?,
                end: traversal.vertices.index_of(edge.end).ok_or_else(|| missing("vertex"))?,
                origin: *line.origin(),
                direction: *line.direction(),
                t_start: edge.t_start,
                t_end: edge.t_end,
            });
        }

        for &id in traversal.wires.order() {
            let wire = store.wire(id)?;
            let edges = wire
                .edges
                .iter()
                .map(|oe| {
                    traversal
                        .edges
                        .index_of(oe.edge)
                        .map(|i| (i, oe.forward))
                        .ok_or_else(|| missing("edge"))
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;
            form.wires.push(CanonicalWire {
                edges,
                is_closed: wire.is_closed,
            });
        }

        for &id in traversal.faces.order() {
            let face = store.face(id)?;
            let FaceSurface::Plane(plane) = &face.surface;
            let inner_wires = face
                .inner_wires
                .iter()
                .map(|&w| traversal.wires.index_of(w).ok_or_else(|| missing("wire")))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            form.faces.push(CanonicalFace {
                origin: *plane.origin(),
                u_dir: *plane.u_dir(),
                v_dir: *plane.v_dir(),
                outer_wire: traversal
                    .wires
                    .index_of(face.outer_wire)
                    .ok_or_else(|| missing("wire"))?,
                inner_wires,
                same_sense: face.same_sense,
            });
        }

        for &id in traversal.shells.order() {
            let shell = store.shell(id)?;
            let faces = shell
                .faces
                .iter()
                .map(|&f| traversal.faces.index_of(f).ok_or_else(|| missing("face")))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            form.shells.push(CanonicalShell {
                faces,
                is_closed: shell.is_closed,
            });
        }

        for &id in traversal.solids.order() {
            let solid = store.solid(id)?;
            let inner_shells = solid
                .inner_shells
                .iter()
                .map(|&s| traversal.shells.index_of(s).ok_or_else(|| missing("shell")))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            form.solids.push(CanonicalSolid {
                outer_shell: traversal
                    .shells
                    .index_of(solid.outer_shell)
                    .ok_or_else(|| missing("shell"))?,
                inner_shells,
            });
        }

        for &id in traversal.compounds.order() {
            let compound = store.compound(id)?;
            let children = compound
                .children
                .iter()
                .map(|&child| {
                    traversal
                        .index_of(child)
                        .map(|index| CanonicalRef {
                            kind: child.kind(),
                            index,
                        })
                        .ok_or_else(|| missing("child"))
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;
            form.compounds.push(CanonicalCompound { children });
        }

        form.root = Some(CanonicalRef {
            kind: root.kind(),
            index: traversal.index_of(root).ok_or_else(|| missing("root"))?,
        });
        Ok(form)
    }

    /// Number of entities of `kind` in this form.
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

    /// Checks that every cross reference points inside its table.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first out-of-range reference.
    pub fn check_references(&self) -> std::result::Result<(), TopologyError> {
        let check = |what: &str, index: u32, len: usize| {
            if (index as usize) < len {
                Ok(())
            } else {
                Err(out_of_range(what, index))
            }
        };
        for edge in &self.edges {
            check("vertex", edge.start, self.vertices.len())?;
            check("vertex", edge.end, self.vertices.len())?;
        }
        for wire in &self.wires {
            for &(e, _) in &wire.edges {
                check("edge", e, self.edges.len())?;
            }
        }
        for face in &self.faces {
            check("wire", face.outer_wire, self.wires.len())?;
            for &w in &face.inner_wires {
                check("wire", w, self.wires.len())?;
            }
        }
        for shell in &self.shells {
            for &f in &shell.faces {
                check("face", f, self.faces.len())?;
            }
        }
        for solid in &self.solids {
            check("shell", solid.outer_shell, self.shells.len())?;
            for &s in &solid.inner_shells {
                check("shell", s, self.shells.len())?;
            }
        }
        for compound in &self.compounds {
            for child in &compound.children {
                check(&child.kind.to_string(), child.index, self.count(child.kind))?;
            }
        }
        self.check_compounds_acyclic()?;
        if let Some(root) = self.root {
            check("root", root.index, self.count(root.kind))?;
        }
        Ok(())
    }

    fn check_compounds_acyclic(&self) -> std::result::Result<(), TopologyError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unseen,
            Active,
            Done,
        }
        let mut marks = vec![Mark::Unseen; self.compounds.len()];
        for start in 0..self.compounds.len() {
            if marks[start] != Mark::Unseen {
                continue;
            }
            // (compound, position of the next child to look at)
            let mut stack = vec![(start, 0usize)];
            marks[start] = Mark::Active;
            while let Some((current, next)) = stack.pop() {
                let children = &self.compounds[current].children;
                let Some(offset) = children[next..]
                    .iter()
                    .position(|c| c.kind == ShapeKind::Compound)
                else {
                    marks[current] = Mark::Done;
                    continue;
                };
                let target = children[next + offset].index as usize;
                stack.push((current, next + offset + 1));
                match marks[target] {
                    Mark::Active => {
                        return Err(TopologyError::InvalidTopology(
                            "compound contains itself".into(),
                        ))
                    }
                    Mark::Unseen => {
                        marks[target] = Mark::Active;
                        stack.push((target, 0));
                    }
                    Mark::Done => {}
                }
            }
        }
        Ok(())
    }

    /// Rebuilds the described entities inside `store`.
    ///
    /// Returns the new root, or `None` when the form describes the null shape.
    ///
    /// # Errors
    ///
    /// Returns an error if a cross reference is out of range or compounds
    /// contain themselves. Nothing is inserted into `store` on error.
    pub fn instantiate_into(
        &self,
        store: &mut TopologyStore,
    ) -> std::result::Result<Option<ShapeRef>, TopologyError> {
        self.check_references()?;
        let Some(root) = self.root else {
            return Ok(None);
        };

        let vertices: Vec<_> = self
            .vertices
            .iter()
            .map(|&p| store.add_vertex(VertexData::new(p)))
            .collect();

        let edges: Vec<_> = self
            .edges
            .iter()
            .map(|e| {
                store.add_edge(EdgeData {
                    start: vertices[e.start as usize],
                    end: vertices[e.end as usize],
                    curve: EdgeCurve::Line(Line::from_raw_parts(e.origin, e.direction)),
                    t_start: e.t_start,
                    t_end: e.t_end,
                })
            })
            .collect();

        let wires: Vec<_> = self
            .wires
            .iter()
            .map(|w| {
                store.add_wire(WireData {
                    edges: w
                        .edges
                        .iter()
                        .map(|&(e, forward)| OrientedEdge::new(edges[e as usize], forward))
                        .collect(),
                    is_closed: w.is_closed,
                })
            })
            .collect();

        let faces: Vec<_> = self
            .faces
            .iter()
            .map(|f| {
                store.add_face(FaceData {
                    surface: FaceSurface::Plane(Plane::from_raw_parts(f.origin, f.u_dir, f.v_dir)),
                    outer_wire: wires[f.outer_wire as usize],
                    inner_wires: f.inner_wires.iter().map(|&w| wires[w as usize]).collect(),
                    same_sense: f.same_sense,
                })
            })
            .collect();

        let shells: Vec<_> = self
            .shells
            .iter()
            .map(|s| {
                store.add_shell(ShellData::new(
                    s.faces.iter().map(|&f| faces[f as usize]).collect(),
                    s.is_closed,
                ))
            })
            .collect();

        let solids: Vec<_> = self
            .solids
            .iter()
            .map(|s| {
                store.add_solid(SolidData {
                    outer_shell: shells[s.outer_shell as usize],
                    inner_shells: s.inner_shells.iter().map(|&i| shells[i as usize]).collect(),
                })
            })
            .collect();

        let built = BuiltEntities {
            vertices,
            edges,
            wires,
            faces,
            shells,
            solids,
        };
        let mut compounds = vec![None; self.compounds.len()];
        for position in 0..self.compounds.len() {
            self.build_compound(position, &built, &mut compounds, store);
        }

        let root = built
            .resolve(root, &compounds)
            .ok_or_else(|| out_of_range("root", root.index))?;
        Ok(Some(root))
    }

    // Callers have already run `check_references`, so the grouping is acyclic
    // and every index is in range. Nested compounds are built children first
    // from an explicit stack, so nesting depth is bounded by memory only.
    fn build_compound(
        &self,
        position: usize,
        built: &BuiltEntities,
        compounds: &mut [Option<CompoundId>],
        store: &mut TopologyStore,
    ) -> Option<CompoundId> {
        let mut stack = vec![position];
        while let Some(&current) = stack.last() {
            if compounds[current].is_some() {
                stack.pop();
                continue;
            }
            let unbuilt = self.compounds[current].children.iter().find(|child| {
                child.kind == ShapeKind::Compound
                    && matches!(compounds.get(child.index as usize), Some(None))
            });
            if let Some(child) = unbuilt {
                stack.push(child.index as usize);
                continue;
            }
            let children = self.compounds[current]
                .children
                .iter()
                .map(|&child| built.resolve(child, compounds))
                .collect::<Option<Vec<_>>>()?;
            compounds[current] = Some(store.add_compound(CompoundData { children }));
            stack.pop();
        }
        compounds[position]
    }
}

/// Arena keys of rebuilt entities, by canonical position.
struct BuiltEntities {
    vertices: Vec<VertexId>,
    edges: Vec<EdgeId>,
    wires: Vec<WireId>,
    faces: Vec<FaceId>,
    shells: Vec<ShellId>,
    solids: Vec<SolidId>,
}

impl BuiltEntities {
    fn resolve(&self, r: CanonicalRef, compounds: &[Option<CompoundId>]) -> Option<ShapeRef> {
        let i = r.index as usize;
        Some(match r.kind {
            ShapeKind::Vertex => ShapeRef::Vertex(*self.vertices.get(i)?),
            ShapeKind::Edge => ShapeRef::Edge(*self.edges.get(i)?),
            ShapeKind::Wire => ShapeRef::Wire(*self.wires.get(i)?),
            ShapeKind::Face => ShapeRef::Face(*self.faces.get(i)?),
            ShapeKind::Shell => ShapeRef::Shell(*self.shells.get(i)?),
            ShapeKind::Solid => ShapeRef::Solid(*self.solids.get(i)?),
            ShapeKind::Compound => ShapeRef::Compound((*compounds.get(i)?)?),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::operations::creation::{MakeBox, MakeVertex};

    #[test]
    fn arena_keys_do_not_matter() {
        // Insert a throwaway vertex first so the arena keys differ.
        let mut store = TopologyStore::new();
        store.add_vertex(VertexData::new(Point3::new(9.0, 9.0, 9.0)));
        let v = store.add_vertex(VertexData::new(Point3::new(1.0, 2.0, 3.0)));
        let padded = CanonicalForm::capture(&store, ShapeRef::Vertex(v)).unwrap();

        let plain = MakeVertex::new(Point::new(1.0, 2.0, 3.0)).execute();
        assert_eq!(&padded, plain.canonical());
        assert_eq!(padded.vertices.len(), 1);
    }

    #[test]
    fn box_counts() {
        let shape = MakeBox::new(10.0, 10.0, 10.0).execute().unwrap();
        let form = shape.canonical();
        assert_eq!(form.count(ShapeKind::Vertex), 8);
        assert_eq!(form.count(ShapeKind::Edge), 12);
        assert_eq!(form.count(ShapeKind::Wire), 6);
        assert_eq!(form.count(ShapeKind::Face), 6);
        assert_eq!(form.count(ShapeKind::Shell), 1);
        assert_eq!(form.count(ShapeKind::Solid), 1);
    }

    #[test]
    fn instantiate_reproduces_the_form() {
        let shape = MakeBox::new(1.0, 2.0, 3.0).execute().unwrap();
        let mut store = TopologyStore::new();
        let root = shape.canonical().instantiate_into(&mut store).unwrap().unwrap();
        let recaptured = CanonicalForm::capture(&store, root).unwrap();
        assert_eq!(&recaptured, shape.canonical());
    }

    #[test]
    fn out_of_range_reference_is_rejected() {
        let mut form = MakeBox::new(1.0, 1.0, 1.0).execute().unwrap().canonical().clone();
        form.edges[0].end = 99;
        let mut store = TopologyStore::new();
        assert!(form.instantiate_into(&mut store).is_err());
    }

    #[test]
    fn null_form_instantiates_to_nothing() {
        let mut store = TopologyStore::new();
        assert_eq!(CanonicalForm::default().instantiate_into(&mut store).unwrap(), None);
    }

    #[test]
    fn deeply_nested_compounds_instantiate() {
        let depth = 20_000;
        let mut compounds: Vec<_> = (1..depth)
            .map(|next| CanonicalCompound {
                children: vec![CanonicalRef {
                    kind: ShapeKind::Compound,
                    index: next,
                }],
            })
            .collect();
        compounds.push(CanonicalCompound {
            children: vec![CanonicalRef {
                kind: ShapeKind::Vertex,
                index: 0,
            }],
        });
        let form = CanonicalForm {
            vertices: vec![Point3::new(1.0, 2.0, 3.0)],
            compounds,
            root: Some(CanonicalRef {
                kind: ShapeKind::Compound,
                index: 0,
            }),
            ..CanonicalForm::default()
        };
        let mut store = TopologyStore::new();
        let root = form.instantiate_into(&mut store).unwrap().unwrap();
        let recaptured = CanonicalForm::capture(&store, root).unwrap();
        assert_eq!(recaptured, form);
    }

    #[test]
    fn cyclic_compounds_are_rejected() {
        let link = |index| CanonicalRef {
            kind: ShapeKind::Compound,
            index,
        };
        let form = CanonicalForm {
            compounds: vec![
                CanonicalCompound {
                    children: vec![link(1)],
                },
                CanonicalCompound {
                    children: vec![link(0)],
                },
            ],
            root: Some(link(0)),
            ..CanonicalForm::default()
        };
        let mut store = TopologyStore::new();
        assert!(form.instantiate_into(&mut store).is_err());
    }
}
