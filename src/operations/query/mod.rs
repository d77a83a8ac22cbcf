mod bounding_box;
mod explore;
mod is_valid;
mod volume;

pub use bounding_box::{Aabb, BoundingBox};
pub use explore::{Exploration, Explore};
pub use is_valid::IsValid;
pub use volume::Volume;
