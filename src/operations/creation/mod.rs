mod make_box;
mod make_compound;
mod make_edge;
mod make_face;
mod make_shell;
mod make_solid;
mod make_vertex;
mod make_wire;

pub use make_box::MakeBox;
pub use make_compound::MakeCompound;
pub use make_edge::MakeEdge;
pub use make_face::{newell_normal, MakeFace, PLANARITY_TOLERANCE};
pub use make_shell::{edge_uses, MakeShell};
pub use make_solid::MakeSolid;
pub use make_vertex::MakeVertex;
pub use make_wire::MakeWire;
