use crate::error::{OperationError, Result, TopologyError};
use crate::math::{Point3, TOLERANCE};
use crate::topology::{OrientedEdge, TopologyStore, VertexData, WireData, WireId};

use super::make_edge::edge_between;

enum WireSource {
    Points { points: Vec<Point3>, close: bool },
    Edges(Vec<OrientedEdge>),
}

/// Creates a wire from a polyline or from existing edges.
pub struct MakeWire {
    source: WireSource,
}

impl MakeWire {
    /// Creates a new `MakeWire` operation over a sequence of 3D points.
    ///
    /// Consecutive segments share their vertex; with `close` a final segment
    /// joins the last point back to the first.
    #[must_use]
    pub fn new(points: Vec<Point3>, close: bool) -> Self {
        Self {
            source: WireSource::Points { points, close },
        }
    }

    /// Creates a new `MakeWire` operation chaining existing edges.
    ///
    /// The wire is closed when the last edge ends where the first one starts.
    #[must_use]
    pub fn from_edges(edges: Vec<OrientedEdge>) -> Self {
        Self {
            source: WireSource::Edges(edges),
        }
    }

    /// Executes the operation, creating the wire in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if there are too few points, two consecutive points
    /// coincide, or the given edges do not form a connected chain.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<WireId> {
        match &self.source {
            WireSource::Points { points, close } => from_points(store, points, *close),
            WireSource::Edges(edges) => from_edges(store, edges),
        }
    }
}

fn from_points(store: &mut TopologyStore, points: &[Point3], close: bool) -> Result<WireId> {
    let min_points = if close { 3 } else { 2 };
    if points.len() < min_points {
        return Err(OperationError::InvalidInput(format!(
            "wire needs at least {min_points} points, got {}",
            points.len()
        ))
        .into());
    }
    let segment_count = if close { points.len() } else { points.len() - 1 };
    for i in 0..segment_count {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        if (b - a).norm() < TOLERANCE {
            return Err(OperationError::InvalidInput(format!(
                "wire points {i} and {} coincide",
                (i + 1) % points.len()
            ))
            .into());
        }
    }

    let vertices: Vec<_> = points
        .iter()
        .map(|&p| store.add_vertex(VertexData::new(p)))
        .collect();
    let mut edges = Vec::with_capacity(segment_count);
    for i in 0..segment_count {
        let edge = edge_between(store, vertices[i], vertices[(i + 1) % vertices.len()])?;
        edges.push(OrientedEdge::new(edge, true));
    }
    Ok(store.add_wire(WireData {
        edges,
        is_closed: close,
    }))
}

fn from_edges(store: &mut TopologyStore, edges: &[OrientedEdge]) -> Result<WireId> {
    let Some(first) = edges.first() else {
        return Err(OperationError::InvalidInput("wire needs at least one edge".into()).into());
    };
    let start = store.edge(first.edge)?.first_vertex(first.forward);
    let mut cursor = store.edge(first.edge)?.last_vertex(first.forward);
    for oe in &edges[1..] {
        let edge = store.edge(oe.edge)?;
        if edge.first_vertex(oe.forward) != cursor {
            return Err(
                TopologyError::InvalidTopology("wire edges are not connected".into()).into(),
            );
        }
        cursor = edge.last_vertex(oe.forward);
    }
    Ok(store.add_wire(WireData {
        edges: edges.to_vec(),
        is_closed: edges.len() > 1 && cursor == start,
    }))
}
