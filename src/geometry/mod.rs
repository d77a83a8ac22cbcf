pub mod curve;
pub mod point;
pub mod surface;

pub use curve::{Curve, Line};
pub use point::Point;
pub use surface::{Plane, Surface};
