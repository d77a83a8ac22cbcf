use tracing::{debug, warn};

use crate::error::{OperationError, Result};
use crate::geometry::Line;
use crate::topology::{EdgeCurve, EdgeId, Shape, ShapeRef, TopologyStore, VertexId};

/// Default distance below which [`FixWire`] closes gaps.
pub const DEFAULT_GAP_TOLERANCE: f64 = 1e-7;

/// Repairs a wire into a connected chain of edges.
///
/// Orientation flags are always corrected. Gaps between consecutive edges
/// are closed by snapping edge ends together, but only when geometry
/// modification is allowed and the gap is within the tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixWire {
    modify_geometry_mode: bool,
    tolerance: f64,
}

impl Default for FixWire {
    fn default() -> Self {
        Self {
            modify_geometry_mode: false,
            tolerance: DEFAULT_GAP_TOLERANCE,
        }
    }
}

impl FixWire {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the fix may move edge ends.
    #[must_use]
    pub fn modify_geometry_mode(&self) -> bool {
        self.modify_geometry_mode
    }

    pub fn set_modify_geometry_mode(&mut self, allowed: bool) {
        self.modify_geometry_mode = allowed;
    }

    #[must_use]
    pub fn with_modify_geometry_mode(mut self, allowed: bool) -> Self {
        self.modify_geometry_mode = allowed;
        self
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the fix, returning a repaired copy of the wire `shape`.
    ///
    /// The closed flag of the result reflects whether the repaired chain
    /// returns to its first vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if `shape` is not a wire, or if closing a gap would
    /// collapse an edge.
    pub fn execute(&self, shape: &Shape) -> Result<Shape> {
        let Some(ShapeRef::Wire(wire)) = shape.root() else {
            let found = shape.kind().map_or_else(|| "null shape".to_string(), |k| k.to_string());
            return Err(
                OperationError::InvalidInput(format!("expected a wire, got {found}")).into(),
            );
        };
        let (mut store, _) = shape.clone().into_parts();
        let mut edges = store.wire(wire)?.edges.clone();
        let mut flipped = 0usize;
        let mut merged = 0usize;

        if let [first, second, ..] = edges.as_mut_slice() {
            let next = store.edge(second.edge)?;
            let touches = |v: VertexId| v == next.start || v == next.end;
            let head = store.edge(first.edge)?;
            if !touches(head.last_vertex(first.forward))
                && touches(head.first_vertex(first.forward))
            {
                first.forward = !first.forward;
                flipped += 1;
            }
        }

        let mut start = None;
        let mut cursor: Option<VertexId> = None;
        for oe in &mut edges {
            let edge = store.edge(oe.edge)?;
            let (head, tail) = (edge.first_vertex(oe.forward), edge.last_vertex(oe.forward));
            match cursor {
                None => start = Some(head),
                Some(previous) if head == previous => {}
                Some(previous) if tail == previous => {
                    oe.forward = !oe.forward;
                    flipped += 1;
                }
                Some(previous) if self.modify_geometry_mode => {
                    if let Some(forward) = self.closest_end(&store, oe.edge, previous)? {
                        if forward != oe.forward {
                            oe.forward = forward;
                            flipped += 1;
                        }
                        snap_end(&mut store, oe.edge, forward, previous)?;
                        merged += 1;
                    }
                }
                Some(_) => {}
            }
            cursor = Some(store.edge(oe.edge)?.last_vertex(oe.forward));
        }

        if let (Some(first), Some(last), Some(tail)) = (start, cursor, edges.last()) {
            if self.modify_geometry_mode && edges.len() > 1 && first != last {
                let gap = (store.vertex_point(first)? - store.vertex_point(last)?).norm();
                if gap <= self.tolerance {
                    snap_end(&mut store, tail.edge, !tail.forward, first)?;
                    merged += 1;
                    cursor = Some(first);
                }
            }
        }

        let is_closed = edges.len() > 1 && start.is_some() && start == cursor;
        let data = store.wire_mut(wire)?;
        let reflagged = data.is_closed != is_closed;
        data.edges = edges;
        data.is_closed = is_closed;

        if flipped > 0 || merged > 0 || reflagged {
            warn!(flipped, merged, closed = is_closed, "repaired wire");
        } else {
            debug!("wire needed no repair");
        }
        Shape::from_parts(store, ShapeRef::Wire(wire))
    }

    /// Finds which end of `edge` lies within tolerance of `target`.
    ///
    /// Returns the orientation that makes that end the edge's first vertex.
    fn closest_end(
        &self,
        store: &TopologyStore,
        edge: EdgeId,
        target: VertexId,
    ) -> Result<Option<bool>> {
        let data = store.edge(edge)?;
        let anchor = store.vertex_point(target)?;
        let to_start = (store.vertex_point(data.start)? - anchor).norm();
        let to_end = (store.vertex_point(data.end)? - anchor).norm();
        let (forward, gap) = if to_start <= to_end {
            (true, to_start)
        } else {
            (false, to_end)
        };
        Ok((gap <= self.tolerance).then_some(forward))
    }
}

/// Moves one end of `edge` onto `vertex` and refits its line.
///
/// With `at_start` the edge's start is replaced, otherwise its end.
fn snap_end(
    store: &mut TopologyStore,
    edge: EdgeId,
    at_start: bool,
    vertex: VertexId,
) -> Result<()> {
    let data = store.edge(edge)?;
    let (start, end) = if at_start {
        (vertex, data.end)
    } else {
        (data.start, vertex)
    };
    let (line, t_start, t_end) =
        Line::through(store.vertex_point(start)?, store.vertex_point(end)?)?;
    let data = store.edge_mut(edge)?;
    data.start = start;
    data.end = end;
    data.curve = EdgeCurve::Line(line);
    data.t_start = t_start;
    data.t_end = t_end;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::creation::{MakeBox, MakeEdge, MakeWire};
    use crate::operations::query::IsValid;
    use crate::topology::{OrientedEdge, WireData};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn wire_edges(shape: &Shape) -> Vec<OrientedEdge> {
        let Some(ShapeRef::Wire(w)) = shape.root() else {
            panic!("expected a wire");
        };
        shape.store().wire(w).unwrap().edges.clone()
    }

    /// A closed triangle whose edge flags have been scrambled.
    fn scrambled_triangle() -> Shape {
        let mut store = TopologyStore::new();
        let wire = MakeWire::new(vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)], true)
            .execute(&mut store)
            .unwrap();
        let data = store.wire_mut(wire).unwrap();
        data.edges[0].forward = !data.edges[0].forward;
        data.edges[2].forward = !data.edges[2].forward;
        data.is_closed = false;
        Shape::from_parts(store, ShapeRef::Wire(wire)).unwrap()
    }

    /// Two segments whose shared corner is split by `gap`.
    fn gapped_polyline(gap: f64) -> Shape {
        let mut store = TopologyStore::new();
        let a = MakeEdge::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0))
            .execute(&mut store)
            .unwrap();
        let b = MakeEdge::new(p(1.0 + gap, 0.0, 0.0), p(1.0, 1.0, 0.0))
            .execute(&mut store)
            .unwrap();
        let wire = store.add_wire(WireData {
            edges: vec![OrientedEdge::new(a, true), OrientedEdge::new(b, true)],
            is_closed: false,
        });
        Shape::from_parts(store, ShapeRef::Wire(wire)).unwrap()
    }

    #[test]
    fn mode_getters_and_setters() {
        let mut fix = FixWire::new();
        assert!(!fix.modify_geometry_mode());
        fix.set_modify_geometry_mode(true);
        assert!(fix.modify_geometry_mode());
        let fix = FixWire::new().with_tolerance(1e-3);
        assert!((fix.tolerance() - 1e-3).abs() < f64::EPSILON);
    }

    #[test]
    fn orientation_flags_are_repaired() {
        let broken = scrambled_triangle();
        assert!(!IsValid::new(&broken).execute());

        let fixed = FixWire::new().execute(&broken).unwrap();
        assert!(IsValid::new(&fixed).execute());
        assert!(fixed.canonical().wires[0].is_closed);
        assert!(wire_edges(&fixed).iter().all(|oe| oe.forward));
    }

    #[test]
    fn gaps_stay_open_without_geometry_mode() {
        let broken = gapped_polyline(1e-9);
        let fixed = FixWire::new().execute(&broken).unwrap();
        assert!(!IsValid::new(&fixed).execute());
        assert_eq!(fixed.canonical().vertices.len(), 4);
    }

    #[test]
    fn gaps_within_tolerance_are_closed() {
        let broken = gapped_polyline(1e-9);
        let fixed = FixWire::new()
            .with_modify_geometry_mode(true)
            .execute(&broken)
            .unwrap();
        assert!(IsValid::new(&fixed).execute());
        assert_eq!(fixed.canonical().vertices.len(), 3);
    }

    #[test]
    fn wide_gaps_are_left_alone() {
        let broken = gapped_polyline(0.1);
        let fixed = FixWire::new()
            .with_modify_geometry_mode(true)
            .execute(&broken)
            .unwrap();
        assert!(!IsValid::new(&fixed).execute());
    }

    #[test]
    fn rejects_non_wires() {
        let shape = MakeBox::new(1.0, 1.0, 1.0).execute().unwrap();
        assert!(FixWire::new().execute(&shape).is_err());
        assert!(FixWire::new().execute(&Shape::null()).is_err());
    }
}
