//! Brush definitions and the pure parts of brush resolution.
//!
//! - [`BrushCatalog`]: the closed registry of brush descriptors
//! - [`AliasIndex`]: identifier normalization over the catalog
//! - [`AttributeRemapper`]: conforms geometry to a brush's attribute slots
//! - [`MaterialAnimator`]: per-frame semantic uniform updates
//!
//! Nothing in this module performs I/O; shader and texture loading live in
//! [`crate::assets`].

pub mod animator;
pub mod catalog;
pub mod descriptor;
pub mod normalize;
pub mod remap;

pub use animator::{FrameContext, LiveUniform, LiveValue, MaterialAnimator};
pub use catalog::{BrushCatalog, SubstringRule};
pub use descriptor::{
    AttributeRule, BrushDescriptor, ColorTransfer, RenderState, ShaderRefs, Side, UniformDecl,
    UniformSemantic, UniformValue,
};
pub use normalize::{AliasCollision, AliasIndex, MatchRule};
pub use remap::{AttributeRemapper, RemapReport, linear_to_srgb, linear_to_srgb_u8};
