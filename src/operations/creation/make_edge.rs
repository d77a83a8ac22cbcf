use crate::error::Result;
use crate::geometry::Line;
use crate::math::Point3;
use crate::topology::{EdgeCurve, EdgeData, EdgeId, TopologyStore, VertexData, VertexId};

/// Creates a straight edge between two points.
pub struct MakeEdge {
    start: Point3,
    end: Point3,
}

impl MakeEdge {
    /// Creates a new `MakeEdge` operation.
    #[must_use]
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// Executes the operation, creating two vertices and the edge joining them.
    ///
    /// # Errors
    ///
    /// Returns an error if the two points coincide.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<EdgeId> {
        let (line, t_start, t_end) = Line::through(self.start, self.end)?;
        let start = store.add_vertex(VertexData::new(self.start));
        let end = store.add_vertex(VertexData::new(self.end));
        Ok(store.add_edge(EdgeData {
            start,
            end,
            curve: EdgeCurve::Line(line),
            t_start,
            t_end,
        }))
    }
}

/// Joins two existing vertices with a straight edge.
///
/// # Errors
///
/// Returns an error if either vertex is missing or they coincide.
pub(crate) fn edge_between(
    store: &mut TopologyStore,
    start: VertexId,
    end: VertexId,
) -> Result<EdgeId> {
    let (line, t_start, t_end) =
        Line::through(store.vertex_point(start)?, store.vertex_point(end)?)?;
    Ok(store.add_edge(EdgeData {
        start,
        end,
        curve: EdgeCurve::Line(line),
        t_start,
        t_end,
    }))
}
