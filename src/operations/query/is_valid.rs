use tracing::debug;

use crate::math::{is_finite_point, TOLERANCE};
use crate::operations::creation::{edge_uses, PLANARITY_TOLERANCE};
use crate::topology::{FaceSurface, Shape, TopologyStore, Traversal};

/// Validates the topological and geometric consistency of a shape.
///
/// A shape is valid when it is not null and:
/// - every vertex coordinate is finite,
/// - every edge's curve passes through its end vertices,
/// - every wire is a connected chain, returning to its start when closed,
/// - every face is bounded by closed wires lying on its plane,
/// - every shell marked closed uses each edge exactly twice,
/// - every solid is bounded by closed shells.
pub struct IsValid<'a> {
    shape: &'a Shape,
}

impl<'a> IsValid<'a> {
    /// Creates a new `IsValid` query.
    #[must_use]
    pub fn new(shape: &'a Shape) -> Self {
        Self { shape }
    }

    /// Executes the validation, returning `true` if the shape is valid.
    #[must_use]
    pub fn execute(&self) -> bool {
        let Some(root) = self.shape.root() else {
            return false;
        };
        let store = self.shape.store();
        match Traversal::run(store, root) {
            Ok(traversal) => match check(store, &traversal) {
                Ok(()) => true,
                Err(reason) => {
                    debug!(%reason, "shape is invalid");
                    false
                }
            },
            Err(_) => false,
        }
    }
}

fn check(store: &TopologyStore, t: &Traversal) -> Result<(), String> {
    let lookup = |e: crate::error::TopologyError| e.to_string();

    for &v in t.vertices.order() {
        if !is_finite_point(&store.vertex_point(v).map_err(lookup)?) {
            return Err("vertex has a non-finite coordinate".into());
        }
    }

    for &e in t.edges.order() {
        let edge = store.edge(e).map_err(lookup)?;
        for (vertex, param) in [(edge.start, edge.t_start), (edge.end, edge.t_end)] {
            let expected = store.vertex_point(vertex).map_err(lookup)?;
            let actual = edge.curve.evaluate(param);
            let scale = 1.0 + expected.coords.norm();
            if (actual - expected).norm() > TOLERANCE.sqrt() * scale {
                return Err("edge curve misses its vertex".into());
            }
        }
    }

    for &w in t.wires.order() {
        let wire = store.wire(w).map_err(lookup)?;
        let mut first = None;
        let mut cursor = None;
        for oe in &wire.edges {
            let edge = store.edge(oe.edge).map_err(lookup)?;
            if let Some(previous) = cursor {
                if edge.first_vertex(oe.forward) != previous {
                    return Err("wire edges are not connected".into());
                }
            } else {
                first = Some(edge.first_vertex(oe.forward));
            }
            cursor = Some(edge.last_vertex(oe.forward));
        }
        if wire.is_closed && (wire.edges.is_empty() || first != cursor) {
            return Err("closed wire does not return to its start".into());
        }
    }

    for &f in t.faces.order() {
        let face = store.face(f).map_err(lookup)?;
        let FaceSurface::Plane(plane) = &face.surface;
        for &w in std::iter::once(&face.outer_wire).chain(&face.inner_wires) {
            if !store.wire(w).map_err(lookup)?.is_closed {
                return Err("face boundary is open".into());
            }
            for v in store.wire_vertices(w).map_err(lookup)? {
                let p = store.vertex_point(v).map_err(lookup)?;
                if plane.signed_distance(&p).abs() > PLANARITY_TOLERANCE {
                    return Err("face boundary leaves its plane".into());
                }
            }
        }
    }

    for &s in t.shells.order() {
        let shell = store.shell(s).map_err(lookup)?;
        if shell.is_closed {
            let uses = edge_uses(store, &shell.faces).map_err(|e| e.to_string())?;
            if uses.values().any(|&n| n != 2) {
                return Err("closed shell has a free or over-shared edge".into());
            }
        }
    }

    for &s in t.solids.order() {
        for shell in store.solid(s).map_err(lookup)?.shells() {
            if !store.shell(shell).map_err(lookup)?.is_closed {
                return Err("solid is bounded by an open shell".into());
            }
        }
    }

    Ok(())
}
