use super::shape::ShapeRef;

slotmap::new_key_type! {
    /// Unique identifier for a compound in the topology store.
    pub struct CompoundId;
}

/// Data associated with a topological compound.
///
/// A compound groups arbitrary shapes of any kind, including other compounds.
#[derive(Debug, Clone, Default)]
pub struct CompoundData {
    /// The grouped shapes, in insertion order.
    pub children: Vec<ShapeRef>,
}
