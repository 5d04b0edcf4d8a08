#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Brush material resolution for VR paintings.
//!
//! Paintings reference brushes by GUID or legacy name instead of carrying
//! materials. This crate maps those identifiers onto a closed catalog of
//! brush descriptors, loads the matching shaders and textures once per
//! session, conforms mesh geometry to each brush shader's attribute layout
//! and keeps per-frame uniforms (time, camera, lights, fog) in sync with the
//! host scene.

pub mod assets;
pub mod brushes;
pub mod config;
pub mod errors;
pub mod formats;
pub mod resolver;
pub mod resources;
pub mod scene;
pub mod utils;

pub use assets::{AssetReaderVariant, MemoryAssetReader, ShaderResourceLoader};
pub use brushes::{
    AttributeRemapper, BrushCatalog, BrushDescriptor, FrameContext, MatchRule, MaterialAnimator,
    UniformSemantic, UniformValue,
};
pub use config::BrushConfig;
pub use errors::{BrushError, Result};
pub use formats::{DocumentFormat, detect_format};
pub use resolver::{BrushResolver, ResolveReport, ResolvedBrush};
pub use resources::{Attribute, BrushBinding, Geometry, Mesh, MeshMaterial, ResolvedMaterial};
pub use scene::{Camera, Light, Scene};
pub use utils::Timer;
