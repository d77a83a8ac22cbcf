use crate::error::{OperationError, Result};
use crate::operations::creation::newell_normal;
use crate::topology::{FaceId, Shape, TopologyStore};

use super::Explore;

/// Computes the enclosed volume of the solids in a shape.
///
/// Uses the divergence theorem over planar faces: each face contributes
/// `(n · p) * area / 3`, where `n` is its outward normal and `p` any point on
/// it. Holes subtract their area from the face they cut.
pub struct Volume<'a> {
    shape: &'a Shape,
}

impl<'a> Volume<'a> {
    /// Creates a new `Volume` query.
    #[must_use]
    pub fn new(shape: &'a Shape) -> Self {
        Self { shape }
    }

    /// Executes the query, returning the volume (absolute value).
    ///
    /// # Errors
    ///
    /// Returns an error if the shape contains no solid.
    pub fn execute(&self) -> Result<f64> {
        let topo = Explore::new(self.shape).execute()?;
        if topo.solids.is_empty() {
            return Err(OperationError::InvalidInput("shape contains no solid".into()).into());
        }
        let store = self.shape.store();

        let mut signed_volume = 0.0;
        for &solid in &topo.solids {
            for shell in store.solid(solid)?.shells() {
                for &face in &store.shell(shell)?.faces {
                    signed_volume += face_contribution(store, face)?;
                }
            }
        }
        Ok(signed_volume.abs())
    }
}

fn face_contribution(store: &TopologyStore, face_id: FaceId) -> Result<f64> {
    let face = store.face(face_id)?;
    let normal = face.oriented_normal();

    let mut area = 0.0;
    let mut anchor = None;
    for (i, &wire) in std::iter::once(&face.outer_wire)
        .chain(&face.inner_wires)
        .enumerate()
    {
        let points = store
            .wire_vertices(wire)?
            .into_iter()
            .map(|v| store.vertex_point(v))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let loop_area = newell_normal(&points).norm() / 2.0;
        if i == 0 {
            anchor = points.first().copied();
            area += loop_area;
        } else {
            area -= loop_area;
        }
    }

    Ok(anchor.map_or(0.0, |p| normal.dot(&p.coords) * area / 3.0))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::math::Point3;
    use crate::operations::creation::{MakeBox, MakeCompound, MakeVertex};
    use approx::assert_relative_eq;

    #[test]
    fn unit_cube() {
        let shape = MakeBox::new(1.0, 1.0, 1.0).execute().unwrap();
        assert_relative_eq!(Volume::new(&shape).execute().unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn volume_does_not_depend_on_placement() {
        let min = Point3::new(-5.0, -5.0, -5.0);
        let max = Point3::new(-3.0, -2.0, 1.0);
        let shape = MakeBox::from_corners(min, max).execute().unwrap();
        assert_relative_eq!(Volume::new(&shape).execute().unwrap(), 36.0, max_relative = 1e-12);
    }

    #[test]
    fn compound_sums_its_solids() {
        let compound = MakeCompound::new(vec![
            MakeBox::new(1.0, 1.0, 1.0).execute().unwrap(),
            MakeBox::from_corners(Point3::new(5.0, 0.0, 0.0), Point3::new(7.0, 1.0, 1.0))
                .execute()
                .unwrap(),
        ])
        .execute()
        .unwrap();
        assert_relative_eq!(Volume::new(&compound).execute().unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn vertex_has_no_volume() {
        let vertex = MakeVertex::new(Point::new(0.0, 0.0, 0.0)).execute();
        assert!(Volume::new(&vertex).execute().is_err());
    }
}
