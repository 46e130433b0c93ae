//! Procedural mesh generation.
//!
//! Every printed piece is built here, either by revolving a profile around
//! the vertical axis ([`lathe`]) or by extruding and twisting a planar outline
//! ([`sweep`]). The built-in shapes live in [`catalog`].

pub use self::catalog::{Outline, Profile};
pub use self::lathe::lathe;
pub use self::render_mesh::RenderMesh;
pub use self::sweep::sweep;

pub mod catalog;
pub mod curves;
mod lathe;
mod render_mesh;
mod sweep;
pub mod utils;
