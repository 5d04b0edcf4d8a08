use serde_json::Value;

use crate::errors::{BrushError, Result};

/// Legacy documents key materials by id; the id is the brush identifier.
///
/// Materials are indexed in the order the JSON object iterates them.
pub fn material_identifiers(document: &Value) -> Result<Vec<Option<String>>> {
    let Some(materials) = document.get("materials") else {
        return Ok(Vec::new());
    };
    let materials = materials.as_object().ok_or_else(|| {
        BrushError::UnsupportedFormat("legacy `materials` must be an object".to_string())
    })?;

    Ok(materials.keys().map(|id| Some(id.clone())).collect())
}

/// Position of a legacy material id in [`material_identifiers`] order.
#[must_use]
pub fn material_index(document: &Value, id: &str) -> Option<usize> {
    document
        .get("materials")?
        .as_object()?
        .keys()
        .position(|k| k == id)
}
