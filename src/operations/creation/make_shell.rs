use std::collections::HashMap;

use crate::error::{OperationError, Result};
use crate::topology::{EdgeId, FaceId, ShellData, ShellId, TopologyStore};

/// Creates a shell from faces.
///
/// The shell is marked closed when every edge on the faces' boundaries is
/// used by exactly two of them.
pub struct MakeShell {
    faces: Vec<FaceId>,
}

impl MakeShell {
    /// Creates a new `MakeShell` operation.
    #[must_use]
    pub fn new(faces: Vec<FaceId>) -> Self {
        Self { faces }
    }

    /// Executes the operation, creating the shell in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if no faces are given or a face is not in the store.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<ShellId> {
        if self.faces.is_empty() {
            return Err(OperationError::InvalidInput("shell needs at least one face".into()).into());
        }
        let uses = edge_uses(store, &self.faces)?;
        let is_closed = uses.values().all(|&count| count == 2);
        Ok(store.add_shell(ShellData::new(self.faces.clone(), is_closed)))
    }
}

/// Counts how many face boundaries use each edge.
///
/// # Errors
///
/// Returns an error if a face, wire or edge is not in the store.
pub fn edge_uses(store: &TopologyStore, faces: &[FaceId]) -> Result<HashMap<EdgeId, usize>> {
    let mut uses = HashMap::new();
    for &face_id in faces {
        let face = store.face(face_id)?;
        for &wire_id in std::iter::once(&face.outer_wire).chain(&face.inner_wires) {
            for oe in &store.wire(wire_id)?.edges {
                store.edge(oe.edge)?;
                *uses.entry(oe.edge).or_insert(0) += 1;
            }
        }
    }
    Ok(uses)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::creation::{MakeFace, MakeWire};

    #[test]
    fn single_face_shell_is_open() {
        let mut store = TopologyStore::new();
        let wire = MakeWire::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            true,
        )
        .execute(&mut store)
        .unwrap();
        let face = MakeFace::new(wire, vec![]).execute(&mut store).unwrap();
        let shell = MakeShell::new(vec![face]).execute(&mut store).unwrap();
        assert!(!store.shell(shell).unwrap().is_closed);
    }

    #[test]
    fn empty_shell_fails() {
        let mut store = TopologyStore::new();
        assert!(MakeShell::new(vec![]).execute(&mut store).is_err());
    }
}
