pub mod codec;
pub mod container;
pub mod error;
pub mod geometry;
pub mod identity;
pub mod math;
pub mod operations;
pub mod params;
pub mod topology;

pub use codec::{decode, encode};
pub use container::{DoubleVector, IntVector, RawValue, ValueVector};
pub use error::{BrepError, Result};
pub use geometry::Point;
pub use identity::{structural_hash, StructuralIdentity, HASH_UPPER_BOUND};
pub use topology::{Shape, ShapeKind};
