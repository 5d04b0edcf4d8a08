//! Attribute Remapper
//!
//! Format loaders emit geometry under conventional names (`position`,
//! `normal`, `uv`, `color`, ...) plus, for legacy documents, namespaced
//! channels such as `_tb_unity_normal`. Brush shaders read fixed slots like
//! `a_normal` or `a_texcoord1`. The remapper copies the first available
//! candidate for each slot and re-encodes vertex colors from linear to sRGB.

use glam::Vec4;
use wgpu::VertexFormat;

use crate::brushes::descriptor::{BrushDescriptor, ColorTransfer};
use crate::errors::BrushError;
use crate::resources::geometry::{Attribute, Geometry};

/// Outcome of remapping one geometry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemapReport {
    pub brush: String,
    /// `(slot, source attribute)` pairs that were filled.
    pub mapped: Vec<(String, String)>,
    /// Required slots with no source attribute.
    pub missing: Vec<String>,
    /// Slots whose colors went through the linear to sRGB transfer.
    pub converted: Vec<String>,
}

impl RemapReport {
    #[must_use]
    pub fn source_of(&self, slot: &str) -> Option<&str> {
        self.mapped
            .iter()
            .find(|(s, _)| s == slot)
            .map(|(_, source)| source.as_str())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// One [`BrushError::MissingAttribute`] per missing required slot.
    pub fn missing_errors(&self) -> impl Iterator<Item = BrushError> + '_ {
        self.missing.iter().map(|slot| BrushError::MissingAttribute {
            brush: self.brush.clone(),
            slot: slot.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AttributeRemapper {
    convert_vertex_colors: bool,
}

impl Default for AttributeRemapper {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeRemapper {
    #[must_use]
    pub fn new() -> Self {
        Self {
            convert_vertex_colors: true,
        }
    }

    /// Disables the sRGB transfer; colors are copied through as-is.
    #[must_use]
    pub fn with_color_conversion(mut self, enabled: bool) -> Self {
        self.convert_vertex_colors = enabled;
        self
    }

    /// Conforms `geometry` to the attribute layout `descriptor` expects.
    ///
    /// Source attributes are left in place; slots share their buffers unless
    /// a color transfer produced new data.
    pub fn remap(&self, geometry: &mut Geometry, descriptor: &BrushDescriptor) -> RemapReport {
        let mut report = RemapReport {
            brush: descriptor.canonical_name.clone(),
            ..Default::default()
        };

        for rule in &descriptor.attributes {
            let found = rule
                .candidates
                .iter()
                .find_map(|name| geometry.get_attribute(name).map(|attr| (name, attr.clone())));

            let Some((source, attr)) = found else {
                if rule.required {
                    log::warn!(
                        "Brush {}: no source attribute for {} (tried {:?})",
                        descriptor.canonical_name,
                        rule.slot,
                        rule.candidates
                    );
                    report.missing.push(rule.slot.clone());
                }
                continue;
            };

            let attr = match rule.transfer {
                ColorTransfer::LinearToSrgb if self.convert_vertex_colors => {
                    match encode_srgb_colors(&attr) {
                        Some(encoded) => {
                            report.converted.push(rule.slot.clone());
                            encoded
                        }
                        None => attr,
                    }
                }
                _ => attr,
            };

            geometry.set_attribute(&rule.slot, attr);
            report.mapped.push((rule.slot.clone(), source.clone()));
        }

        geometry.name = Some(descriptor.geometry_name());
        report
    }
}

// ============================================================================
// Color transfer
// ============================================================================

/// Linear to sRGB transfer for one channel.
#[inline]
#[must_use]
pub fn linear_to_srgb(value: f32) -> f32 {
    if value <= 0.003_130_8 {
        value * 12.92
    } else {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    }
}

/// Linear channel to a display-referred byte. Input is clamped to `[0, 1]`.
#[inline]
#[must_use]
pub fn linear_to_srgb_u8(value: f32) -> u8 {
    let v = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    (linear_to_srgb(v) * 255.0).round() as u8
}

fn encode_rgba(color: Vec4) -> [u8; 4] {
    let alpha = if color.w.is_nan() { 0.0 } else { color.w.clamp(0.0, 1.0) };
    [
        linear_to_srgb_u8(color.x),
        linear_to_srgb_u8(color.y),
        linear_to_srgb_u8(color.z),
        (alpha * 255.0).round() as u8,
    ]
}

/// Float colors become sRGB `Unorm8x4`; byte colors are returned unchanged.
fn encode_srgb_colors(attr: &Attribute) -> Option<Attribute> {
    match attr.format {
        VertexFormat::Float32x3 | VertexFormat::Float32x4 => {
            let packed: Vec<[u8; 4]> = (0..attr.count)
                .map(|i| attr.read_vec4(i).map_or([0; 4], encode_rgba))
                .collect();
            Some(Attribute::new_planar(&packed, VertexFormat::Unorm8x4))
        }
        _ => None,
    }
}
