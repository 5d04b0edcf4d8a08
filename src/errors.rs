//! Error Types
//!
//! This module defines the error type used throughout the brush subsystem.
//!
//! # Overview
//!
//! [`BrushError`] covers every failure mode of brush resolution:
//! - Identifier normalization misses
//! - Shader and texture fetch failures
//! - Malformed documents and catalog data
//! - I/O, HTTP and decoding errors
//!
//! Some of these are local to a single mesh and the load carries on without
//! them; [`BrushError::is_recoverable`] tells them apart from structural
//! failures.
//!
//! The type is `Clone` because one in-flight shader load is awaited by every
//! mesh that requested the same brush, and each of them receives the result.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sketch_brushes::errors::{BrushError, Result};
//!
//! fn load_brush() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for brush resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrushError {
    // ========================================================================
    // Resolution Errors
    // ========================================================================
    /// No catalog entry matches the identifier.
    #[error("Unresolved brush identifier: {0:?}")]
    UnresolvedIdentifier(String),

    /// A canonical name was passed that the catalog does not contain.
    #[error("Unknown brush: {0}")]
    UnknownBrush(String),

    /// A vertex attribute the brush shader expects is absent.
    #[error("Brush {brush} expects attribute {slot}, but the geometry has no source for it")]
    MissingAttribute {
        /// Canonical brush name
        brush: String,
        /// Shader attribute slot
        slot: String,
    },

    // ========================================================================
    // Resource Loading Errors
    // ========================================================================
    /// Vertex or fragment shader source could not be fetched.
    #[error("Failed to fetch shader {path} for brush {brush}: {reason}")]
    ShaderFetch {
        /// Canonical brush name
        brush: String,
        /// Resource path relative to the base path
        path: String,
        /// Underlying failure
        reason: String,
    },

    /// A texture referenced by the brush could not be fetched or decoded.
    #[error("Failed to load texture {slot} for brush {brush}: {reason}")]
    TextureFetch {
        /// Canonical brush name
        brush: String,
        /// Uniform slot the texture binds to
        slot: String,
        /// Underlying failure
        reason: String,
    },

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// The scene document header is malformed or of an unsupported version.
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// The brush catalog data is malformed.
    #[error("Invalid brush catalog: {0}")]
    Catalog(String),

    /// The configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(String),

    /// Image decoding error.
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    // ========================================================================
    // I/O & Network Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// HTTP response error with status code.
    #[error("HTTP response error: status {status} for {url}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The requested resource does not exist in the reader.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    // ========================================================================
    // Async & Threading Errors
    // ========================================================================
    /// A blocking decode task failed to complete.
    #[error("Task join error: {0}")]
    TaskJoin(String),

    /// Feature not enabled.
    #[error("Feature not enabled: {0}")]
    FeatureNotEnabled(String),
}

impl BrushError {
    /// Returns `true` for failures that only affect a single mesh or slot.
    ///
    /// Unrecognized identifiers, missing attributes and texture failures leave
    /// the rest of the painting renderable. Everything else either aborts one
    /// mesh's material (shader fetch) or the whole document.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedIdentifier(_)
                | Self::MissingAttribute { .. }
                | Self::TextureFetch { .. }
        )
    }
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

impl From<std::io::Error> for BrushError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            BrushError::AssetNotFound(err.to_string())
        } else {
            BrushError::Io(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BrushError {
    fn from(err: serde_json::Error) -> Self {
        BrushError::Json(err.to_string())
    }
}

impl From<image::ImageError> for BrushError {
    fn from(err: image::ImageError) -> Self {
        BrushError::ImageDecode(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<url::ParseError> for BrushError {
    fn from(err: url::ParseError) -> Self {
        BrushError::Http(format!("invalid URL: {err}"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<tokio::task::JoinError> for BrushError {
    fn from(err: tokio::task::JoinError) -> Self {
        BrushError::TaskJoin(err.to_string())
    }
}

/// Alias for `Result<T, BrushError>`.
pub type Result<T> = std::result::Result<T, BrushError>;
