use crate::error::{GeometryError, Result, TopologyError};
use crate::geometry::Plane;
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::topology::{FaceData, FaceId, FaceSurface, TopologyStore, WireId};

/// Largest distance a boundary vertex may lie off the face plane.
pub const PLANARITY_TOLERANCE: f64 = 1e-7;

/// Creates a planar face bounded by closed wires.
///
/// The plane is fitted to the outer wire: its normal follows the wire's
/// winding by the right-hand rule and its U direction runs along the first
/// edge.
pub struct MakeFace {
    outer_wire: WireId,
    inner_wires: Vec<WireId>,
}

impl MakeFace {
    /// Creates a new `MakeFace` operation.
    #[must_use]
    pub fn new(outer_wire: WireId, inner_wires: Vec<WireId>) -> Self {
        Self {
            outer_wire,
            inner_wires,
        }
    }

    /// Executes the operation, creating the face in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if a wire is open, the outer wire encloses no area,
    /// or any boundary vertex lies off the plane.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<FaceId> {
        let outer = loop_points(store, self.outer_wire)?;
        let normal = newell_normal(&outer);
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::Degenerate("face boundary encloses no area".into()).into());
        }
        let normal = normal / len;
        let u_dir = outer[1] - outer[0];
        let plane = Plane::new(outer[0], u_dir, normal.cross(&u_dir))?;

        for &wire in std::iter::once(&self.outer_wire).chain(&self.inner_wires) {
            for point in loop_points(store, wire)? {
                if plane.signed_distance(&point).abs() > PLANARITY_TOLERANCE {
                    return Err(
                        GeometryError::Degenerate("face boundary is not planar".into()).into(),
                    );
                }
            }
        }

        Ok(store.add_face(FaceData {
            surface: FaceSurface::Plane(plane),
            outer_wire: self.outer_wire,
            inner_wires: self.inner_wires.clone(),
            same_sense: true,
        }))
    }
}

fn loop_points(store: &TopologyStore, wire: WireId) -> Result<Vec<Point3>> {
    if !store.wire(wire)?.is_closed {
        return Err(TopologyError::WireNotClosed.into());
    }
    let points = store
        .wire_vertices(wire)?
        .into_iter()
        .map(|v| store.vertex_point(v))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(points)
}

/// Area-weighted normal of a closed polygon (Newell's method).
///
/// The length of the result is twice the enclosed area.
#[must_use]
pub fn newell_normal(points: &[Point3]) -> Vector3 {
    let mut normal = Vector3::zeros();
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::creation::MakeWire;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn square(store: &mut TopologyStore, z: f64) -> WireId {
        MakeWire::new(
            vec![p(0.0, 0.0, z), p(2.0, 0.0, z), p(2.0, 2.0, z), p(0.0, 2.0, z)],
            true,
        )
        .execute(store)
        .unwrap()
    }

    #[test]
    fn normal_follows_winding() {
        let mut store = TopologyStore::new();
        let wire = square(&mut store, 1.0);
        let face = MakeFace::new(wire, vec![]).execute(&mut store).unwrap();
        let normal = store.face(face).unwrap().oriented_normal();
        assert_relative_eq!(normal.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn newell_length_is_twice_area() {
        let square = [p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(2.0, 2.0, 0.0), p(0.0, 2.0, 0.0)];
        assert_relative_eq!(newell_normal(&square).norm(), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn open_wire_fails() {
        let mut store = TopologyStore::new();
        let wire = MakeWire::new(vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0)], false)
            .execute(&mut store)
            .unwrap();
        assert!(MakeFace::new(wire, vec![]).execute(&mut store).is_err());
    }

    #[test]
    fn non_planar_boundary_fails() {
        let mut store = TopologyStore::new();
        let wire = MakeWire::new(
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 1.0), p(0.0, 1.0, 0.0)],
            true,
        )
        .execute(&mut store)
        .unwrap();
        assert!(MakeFace::new(wire, vec![]).execute(&mut store).is_err());
    }

    #[test]
    fn hole_must_share_the_plane() {
        let mut store = TopologyStore::new();
        let outer = square(&mut store, 0.0);
        let lifted = square(&mut store, 0.5);
        assert!(MakeFace::new(outer, vec![lifted]).execute(&mut store).is_err());
    }
}
