//! Brush Loading Configuration
//!
//! [`BrushConfig`] controls where brush resources come from and how loaded
//! data is post-processed.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sketch_brushes::BrushConfig;
//!
//! // Defaults: resources under `./brushes`, mipmaps on, sRGB vertex colors
//! let config = BrushConfig::default();
//!
//! // Fetch brush shaders from a CDN
//! let config = BrushConfig::default()
//!     .with_base_path("https://cdn.example.com/brushes/");
//!
//! // Or from JSON
//! let config = BrushConfig::from_json_str(r#"{ "base_path": "assets/brushes" }"#)?;
//! ```

use serde::Deserialize;

use crate::errors::{BrushError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrushConfig {
    /// Local directory or HTTP(S) URL holding the `<Name>-<guid>/` folders.
    pub base_path: String,
    /// Whether decoded brush textures request a mip chain.
    pub generate_mipmaps: bool,
    /// Re-encode linear float vertex colors to 8-bit sRGB while remapping.
    pub convert_vertex_colors: bool,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            base_path: "brushes".to_string(),
            generate_mipmaps: true,
            convert_vertex_colors: true,
        }
    }
}

impl BrushConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| BrushError::Config(e.to_string()))
    }

    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    #[must_use]
    pub fn with_generate_mipmaps(mut self, enabled: bool) -> Self {
        self.generate_mipmaps = enabled;
        self
    }

    #[must_use]
    pub fn with_convert_vertex_colors(mut self, enabled: bool) -> Self {
        self.convert_vertex_colors = enabled;
        self
    }

    /// `true` if resources are fetched over HTTP(S).
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.base_path.starts_with("http://") || self.base_path.starts_with("https://")
    }
}
