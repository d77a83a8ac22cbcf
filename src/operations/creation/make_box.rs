use tracing::debug;

use crate::error::{OperationError, Result};
use crate::math::{Point3, Vector3};
use crate::topology::{OrientedEdge, Shape, ShapeRef, TopologyStore, VertexData};

use super::make_edge::edge_between;
use super::{MakeFace, MakeShell, MakeSolid, MakeWire};

/// Corner loops of the six box faces, as indices into the corner table
/// (`bit 0` = +X, `bit 1` = +Y, `bit 2` = +Z). Each loop winds
/// counter-clockwise seen from outside, so face normals point outward.
const FACE_LOOPS: [[usize; 4]; 6] = [
    [0, 2, 3, 1], // -Z
    [4, 5, 7, 6], // +Z
    [0, 1, 5, 4], // -Y
    [2, 6, 7, 3], // +Y
    [0, 4, 6, 2], // -X
    [1, 3, 7, 5], // +X
];

/// Creates an axis-aligned box solid.
pub struct MakeBox {
    min_corner: Point3,
    extents: Vector3,
}

impl MakeBox {
    /// Creates a new `MakeBox` operation with one corner at the origin and
    /// the given extents along +X, +Y and +Z.
    #[must_use]
    pub fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            min_corner: Point3::origin(),
            extents: Vector3::new(dx, dy, dz),
        }
    }

    /// Creates a new `MakeBox` operation spanning two corner points.
    #[must_use]
    pub fn from_corners(min_corner: Point3, max_corner: Point3) -> Self {
        Self {
            min_corner,
            extents: max_corner - min_corner,
        }
    }

    /// Executes the operation, returning the box solid.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidDimension`] if any extent is zero,
    /// negative, NaN or infinite.
    pub fn execute(&self) -> Result<Shape> {
        for (parameter, value) in [
            ("dx", self.extents.x),
            ("dy", self.extents.y),
            ("dz", self.extents.z),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(OperationError::InvalidDimension { parameter, value }.into());
            }
        }

        let mut store = TopologyStore::new();
        let corners: Vec<_> = (0..8)
            .map(|bits: usize| {
                let offset = Vector3::new(
                    if bits & 1 == 0 { 0.0 } else { self.extents.x },
                    if bits & 2 == 0 { 0.0 } else { self.extents.y },
                    if bits & 4 == 0 { 0.0 } else { self.extents.z },
                );
                store.add_vertex(VertexData::new(self.min_corner + offset))
            })
            .collect();

        // Each of the 12 edges is created once, running from the lower to the
        // higher corner index, and shared by the two faces that meet there.
        let mut edges = Vec::with_capacity(12);
        let mut faces = Vec::with_capacity(6);
        for face_loop in FACE_LOOPS {
            let mut oriented = Vec::with_capacity(4);
            for i in 0..4 {
                let from = face_loop[i];
                let to = face_loop[(i + 1) % 4];
                let key = (from.min(to), from.max(to));
                let edge = match edges.iter().find(|(k, _)| *k == key) {
                    Some(&(_, edge)) => edge,
                    None => {
                        let edge = edge_between(&mut store, corners[key.0], corners[key.1])?;
                        edges.push((key, edge));
                        edge
                    }
                };
                oriented.push(OrientedEdge::new(edge, from < to));
            }
            let wire = MakeWire::from_edges(oriented).execute(&mut store)?;
            faces.push(MakeFace::new(wire, vec![]).execute(&mut store)?);
        }

        let shell = MakeShell::new(faces).execute(&mut store)?;
        let solid = MakeSolid::new(shell, vec![]).execute(&mut store)?;
        debug!(
            dx = self.extents.x,
            dy = self.extents.y,
            dz = self.extents.z,
            "made box"
        );
        Shape::from_parts(store, ShapeRef::Solid(solid))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::query::{BoundingBox, IsValid, Volume};
    use crate::topology::ShapeKind;
    use approx::assert_relative_eq;

    #[test]
    fn box_is_a_defined_solid() {
        for (dx, dy, dz) in [(10.0, 10.0, 10.0), (100.0, 200.0, 300.0)] {
            let shape = MakeBox::new(dx, dy, dz).execute().unwrap();
            assert!(!shape.is_null());
            assert_eq!(shape.kind(), Some(ShapeKind::Solid));
        }
    }

    #[test]
    fn box_shell_is_closed() {
        let shape = MakeBox::new(1.0, 2.0, 3.0).execute().unwrap();
        let Some(ShapeRef::Solid(solid)) = shape.root() else {
            panic!("expected a solid root");
        };
        let store = shape.store();
        let shell = store.shell(store.solid(solid).unwrap().outer_shell).unwrap();
        assert_eq!(shell.faces.len(), 6);
        assert!(shell.is_closed);
    }

    #[test]
    fn box_is_valid() {
        let shape = MakeBox::new(10.0, 10.0, 10.0).execute().unwrap();
        assert!(IsValid::new(&shape).execute());
    }

    #[test]
    fn box_volume_and_bounds() {
        let shape = MakeBox::new(100.0, 200.0, 300.0).execute().unwrap();
        let volume = Volume::new(&shape).execute().unwrap();
        assert_relative_eq!(volume, 6_000_000.0, max_relative = 1e-12);

        let aabb = BoundingBox::new(&shape).execute().unwrap();
        assert_relative_eq!(aabb.min.x, 0.0);
        assert_relative_eq!(aabb.max.y, 200.0);
        assert_relative_eq!(aabb.max.z, 300.0);
    }

    #[test]
    fn from_corners_offsets_the_box() {
        let shape = MakeBox::from_corners(Point3::new(1.0, 2.0, 3.0), Point3::new(3.0, 5.0, 7.0))
            .execute()
            .unwrap();
        let volume = Volume::new(&shape).execute().unwrap();
        assert_relative_eq!(volume, 24.0, max_relative = 1e-12);
        let aabb = BoundingBox::new(&shape).execute().unwrap();
        assert_relative_eq!(aabb.min.z, 3.0);
        assert_relative_eq!(aabb.max.x, 3.0);
    }

    #[test]
    fn face_normals_point_outward() {
        let shape = MakeBox::new(2.0, 2.0, 2.0).execute().unwrap();
        let center = Point3::new(1.0, 1.0, 1.0);
        for face in &shape.canonical().faces {
            let outward = face.u_dir.cross(&face.v_dir);
            assert!((face.origin - center).dot(&outward) > 0.0);
        }
    }

    #[test]
    fn zero_and_negative_dimensions_fail() {
        for (dx, dy, dz) in [
            (0.0, 10.0, 10.0),
            (-1.0, 10.0, 10.0),
            (10.0, 0.0, 10.0),
            (10.0, 10.0, -5.0),
        ] {
            let err = MakeBox::new(dx, dy, dz).execute().unwrap_err();
            assert!(err.is_invalid_dimension(), "unexpected error: {err}");
        }
    }

    #[test]
    fn non_finite_dimensions_fail() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = MakeBox::new(value, 1.0, 1.0).execute().unwrap_err();
            assert!(err.is_invalid_dimension());
        }
    }

    #[test]
    fn inverted_corners_fail() {
        let result = MakeBox::from_corners(Point3::new(1.0, 1.0, 1.0), Point3::origin()).execute();
        assert!(result.unwrap_err().is_invalid_dimension());
    }
}
