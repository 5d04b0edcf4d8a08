//! Brush resource loading.
//!
//! - [`AssetReaderVariant`]: byte source (file, HTTP or memory)
//! - [`ShaderResourceLoader`]: cached, coalescing brush material loader

pub mod io;
pub mod shader_loader;

pub use io::{AssetReaderVariant, FileAssetReader, MemoryAssetReader};
#[cfg(feature = "http")]
pub use io::HttpAssetReader;
pub use shader_loader::ShaderResourceLoader;
