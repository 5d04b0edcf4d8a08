//! Engine-side resource types brush resolution reads and mutates:
//! - Mesh: geometry plus its material slot
//! - Geometry: named vertex attributes
//! - ResolvedMaterial: a loaded brush material
//! - Texture: decoded image data and sampling

pub mod geometry;
pub mod material;
pub mod mesh;
pub mod texture;

pub use geometry::{Attribute, Geometry};
pub use material::{MaterialUniform, MaterialValue, ResolvedMaterial};
pub use mesh::{BrushBinding, Mesh, MeshMaterial};
pub use texture::{Texture, TextureSampler};
