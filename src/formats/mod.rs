//! Document adapters
//!
//! Format parsing itself belongs to the host engine. These helpers only read
//! the two things brush resolution needs from a scene document's JSON: which
//! format it is, and which brush each material names.
//!
//! | Format  | `asset.version` | Materials                      | Brush identifier                  |
//! |---------|-----------------|--------------------------------|-----------------------------------|
//! | Legacy  | `1.x`           | object keyed by material id    | the id, e.g. `material_<guid>`     |
//! | Gltf    | `2.x`           | array                          | `GOOGLE_tilt_brush_material.guid`, else `name` |

pub mod gltf;
pub mod legacy;

use serde_json::Value;

use crate::errors::{BrushError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// glTF 1.0-style export of the original painting tool.
    Legacy,
    /// glTF 2.0 with the brush material extension.
    Gltf,
}

/// Reads `asset.version` and classifies the document.
///
/// A missing or unrecognized header is fatal for the whole document.
pub fn detect_format(document: &Value) -> Result<DocumentFormat> {
    let version = document
        .get("asset")
        .and_then(|asset| asset.get("version"))
        .ok_or_else(|| BrushError::UnsupportedFormat("missing asset.version".to_string()))?;

    let version = match version {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(BrushError::UnsupportedFormat(format!(
                "asset.version must be a string, got {other}"
            )));
        }
    };

    match version.split('.').next() {
        Some("1") => Ok(DocumentFormat::Legacy),
        Some("2") => Ok(DocumentFormat::Gltf),
        _ => Err(BrushError::UnsupportedFormat(format!(
            "unsupported asset version {version:?}"
        ))),
    }
}

/// Brush identifier per document material, in material index order.
///
/// `None` marks a material that names no brush.
pub fn material_identifiers(document: &Value) -> Result<Vec<Option<String>>> {
    match detect_format(document)? {
        DocumentFormat::Legacy => legacy::material_identifiers(document),
        DocumentFormat::Gltf => gltf::material_identifiers(document),
    }
}
