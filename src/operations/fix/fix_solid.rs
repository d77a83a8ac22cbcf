use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{OperationError, Result};
use crate::math::{Point3, Vector3};
use crate::topology::{Shape, SolidId, TopologyStore, Traversal};

/// Reorients the faces of solids so that their normals point outward.
///
/// A face is considered inward when its oriented normal points toward the
/// vertex centroid of its solid. The test is exact for convex solids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixSolid {
    fix_shell_mode: i32,
}

impl Default for FixSolid {
    fn default() -> Self {
        Self { fix_shell_mode: -1 }
    }
}

impl FixSolid {
    /// Creates a new `FixSolid` operation in automatic mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shell fixing mode: `-1` automatic, `0` off, anything else on.
    #[must_use]
    pub fn fix_shell_mode(&self) -> i32 {
        self.fix_shell_mode
    }

    pub fn set_fix_shell_mode(&mut self, mode: i32) {
        self.fix_shell_mode = mode;
    }

    #[must_use]
    pub fn with_fix_shell_mode(mut self, mode: i32) -> Self {
        self.fix_shell_mode = mode;
        self
    }

    fn enabled(&self) -> bool {
        self.fix_shell_mode != 0
    }

    /// Executes the fix, returning a repaired copy of `shape`.
    ///
    /// # Errors
    ///
    /// Returns an error if `shape` contains no solid.
    pub fn execute(&self, shape: &Shape) -> Result<Shape> {
        let Some(root) = shape.root() else {
            return Err(OperationError::InvalidInput("cannot fix a null shape".into()).into());
        };
        let solids = Traversal::run(shape.store(), root)?.solids.order().to_vec();
        if solids.is_empty() {
            return Err(OperationError::InvalidInput(format!(
                "expected a solid, got a {}",
                root.kind()
            ))
            .into());
        }
        if !self.enabled() {
            debug!("shell fixing disabled");
            return Ok(shape.clone());
        }

        let (mut store, _) = shape.clone().into_parts();
        let mut flipped = 0usize;
        for solid in solids {
            flipped += reorient_faces(&mut store, solid)?;
        }
        if flipped > 0 {
            warn!(flipped, "reoriented inward-facing faces");
        }
        Shape::from_parts(store, root)
    }
}

#[allow(clippy::cast_precision_loss)]
fn reorient_faces(store: &mut TopologyStore, solid: SolidId) -> Result<usize> {
    let mut faces = Vec::new();
    for shell in store.solid(solid)?.shells() {
        faces.extend(store.shell(shell)?.faces.iter().copied());
    }

    let mut seen = HashSet::new();
    let mut sum = Vector3::zeros();
    let mut face_centers = Vec::with_capacity(faces.len());
    for &face in &faces {
        let outer = store.face(face)?.outer_wire;
        let loop_vertices = store.wire_vertices(outer)?;
        let mut center = Vector3::zeros();
        for &v in &loop_vertices {
            let p = store.vertex_point(v)?;
            center += p.coords;
            if seen.insert(v) {
                sum += p.coords;
            }
        }
        let count = loop_vertices.len().max(1) as f64;
        face_centers.push(Point3::from(center / count));
    }
    let Some(centroid) = (!seen.is_empty()).then(|| Point3::from(sum / seen.len() as f64)) else {
        return Ok(0);
    };

    let mut flipped = 0;
    for (face, center) in faces.into_iter().zip(face_centers) {
        let data = store.face_mut(face)?;
        if data.oriented_normal().dot(&(center - centroid)) < 0.0 {
            data.same_sense = !data.same_sense;
            flipped += 1;
        }
    }
    Ok(flipped)
}
