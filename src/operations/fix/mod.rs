mod fix_solid;
mod fix_wire;

pub use fix_solid::FixSolid;
pub use fix_wire::{FixWire, DEFAULT_GAP_TOLERANCE};
