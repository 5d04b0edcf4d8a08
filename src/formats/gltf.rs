use serde_json::Value;

use crate::errors::{BrushError, Result};

/// Material extension carrying the brush GUID.
pub const BRUSH_MATERIAL_EXTENSION: &str = "GOOGLE_tilt_brush_material";

/// Brush identifier of one glTF 2.0 material.
///
/// Prefers the extension's `guid` and falls back to the material `name`.
#[must_use]
pub fn brush_identifier(material: &Value) -> Option<String> {
    let from_extension = material
        .get("extensions")
        .and_then(|exts| exts.get(BRUSH_MATERIAL_EXTENSION))
        .and_then(|ext| ext.get("guid"))
        .and_then(Value::as_str);

    from_extension
        .or_else(|| material.get("name").and_then(Value::as_str))
        .map(str::to_string)
}

pub fn material_identifiers(document: &Value) -> Result<Vec<Option<String>>> {
    let Some(materials) = document.get("materials") else {
        return Ok(Vec::new());
    };
    let materials = materials.as_array().ok_or_else(|| {
        BrushError::UnsupportedFormat("glTF `materials` must be an array".to_string())
    })?;

    Ok(materials.iter().map(brush_identifier).collect())
}
