//! Brush Catalog
//!
//! The closed registry of brushes, keyed by canonical name.
//!
//! The catalog is pure data: `data/brush_catalog.json` is embedded into the
//! binary and parsed once on first use. Brushes share most of their
//! uniforms, render state and attribute layout, so the file groups those into
//! named *profiles* (which may extend one another) and each brush only states
//! what differs.
//!
//! The top-level `host_uniforms` table lists the uniforms the host scene
//! drives (scene lights, ambient, fog) with their fallback values. It sits
//! beneath every profile, so each brush declares them unless it overrides
//! the value.
//!
//! ```rust,ignore
//! let catalog = BrushCatalog::builtin();
//! let fire = catalog.normalize("material_Fire")?;
//! assert_eq!(fire.canonical_name, "Fire");
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use glam::{Vec2, Vec3, Vec4};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use uuid::Uuid;

use crate::brushes::descriptor::{
    AttributeRule, BrushDescriptor, ColorTransfer, RenderState, ShaderRefs, Side, UniformDecl,
    UniformSemantic, UniformValue,
};
use crate::brushes::normalize::{AliasIndex, MatchRule};
use crate::errors::{BrushError, Result};

const BUILTIN_CATALOG: &str = include_str!("../../data/brush_catalog.json");

/// Profiles may extend each other; this bounds the chain.
const MAX_PROFILE_DEPTH: usize = 8;

// ============================================================================
// Catalog
// ============================================================================

/// An ordered containment rule used for export-tool names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubstringRule {
    pub contains: String,
    pub brush: String,
}

#[derive(Debug)]
pub struct BrushCatalog {
    descriptors: Vec<BrushDescriptor>,
    host_uniforms: Vec<UniformDecl>,
    by_name: FxHashMap<String, usize>,
    index: AliasIndex,
}

impl BrushCatalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> Arc<BrushCatalog> {
        static BUILTIN: OnceLock<Arc<BrushCatalog>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| {
                Arc::new(
                    BrushCatalog::from_json_str(BUILTIN_CATALOG)
                        .expect("embedded brush catalog is malformed"),
                )
            })
            .clone()
    }

    /// Builds a catalog from JSON data in the `brush_catalog.json` schema.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawCatalog = serde_json::from_str(json)
            .map_err(|e| BrushError::Catalog(format!("failed to parse catalog: {e}")))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawCatalog) -> Result<Self> {
        let mut descriptors = Vec::with_capacity(raw.brushes.len());
        let mut by_name = FxHashMap::default();

        let host_uniforms = raw
            .host_uniforms
            .iter()
            .map(|(name, uniform)| convert_uniform("host", name.clone(), uniform.clone()))
            .collect::<Result<Vec<_>>>()?;
        if let Some(stray) = host_uniforms.iter().find(|u| !u.semantic.is_dynamic()) {
            return Err(BrushError::Catalog(format!(
                "host uniform {} has no semantic",
                stray.name
            )));
        }

        for brush in &raw.brushes {
            let descriptor = build_descriptor(brush, &raw)?;
            if by_name
                .insert(descriptor.canonical_name.clone(), descriptors.len())
                .is_some()
            {
                return Err(BrushError::Catalog(format!(
                    "duplicate brush name {}",
                    descriptor.canonical_name
                )));
            }
            descriptors.push(descriptor);
        }

        for rule in &raw.substring_rules {
            if !by_name.contains_key(&rule.brush) {
                return Err(BrushError::Catalog(format!(
                    "substring rule {:?} targets unknown brush {}",
                    rule.contains, rule.brush
                )));
            }
        }

        let index = AliasIndex::build(&descriptors, &raw.substring_rules, &by_name);
        for collision in index.collisions() {
            log::warn!(
                "Brush identifier {:?} ({:?}) is claimed by both {} and {}; resolving to {}",
                collision.identifier,
                collision.rule,
                descriptors[collision.kept].canonical_name,
                descriptors[collision.dropped].canonical_name,
                descriptors[collision.kept].canonical_name,
            );
        }

        log::debug!("Brush catalog ready: {} brushes", descriptors.len());

        Ok(Self {
            descriptors,
            host_uniforms,
            by_name,
            index,
        })
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Looks up a descriptor by canonical name only.
    #[must_use]
    pub fn lookup(&self, canonical_name: &str) -> Option<&BrushDescriptor> {
        self.by_name
            .get(canonical_name)
            .map(|&i| &self.descriptors[i])
    }

    /// Resolves any identifier shape to its descriptor.
    pub fn normalize(&self, identifier: &str) -> Result<&BrushDescriptor> {
        self.normalize_with_rule(identifier)
            .map(|(descriptor, _)| descriptor)
    }

    /// Like [`normalize`](Self::normalize), also reporting which rule matched.
    pub fn normalize_with_rule(&self, identifier: &str) -> Result<(&BrushDescriptor, MatchRule)> {
        self.index
            .resolve(identifier)
            .map(|(i, rule)| (&self.descriptors[i], rule))
            .ok_or_else(|| BrushError::UnresolvedIdentifier(identifier.to_string()))
    }

    #[must_use]
    pub fn canonical_name(&self, identifier: &str) -> Option<&str> {
        self.normalize(identifier)
            .ok()
            .map(|d| d.canonical_name.as_str())
    }

    /// Uniforms the host scene drives, with their fallback values.
    #[must_use]
    pub fn host_uniforms(&self) -> &[UniformDecl] {
        &self.host_uniforms
    }

    #[must_use]
    pub fn alias_index(&self) -> &AliasIndex {
        &self.index
    }

    pub fn iter(&self) -> impl Iterator<Item = &BrushDescriptor> {
        self.descriptors.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

// ============================================================================
// Raw data schema
// ============================================================================

fn default_version() -> String {
    "10.0".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalog {
    #[serde(default = "default_version")]
    default_version: String,
    #[serde(default)]
    host_uniforms: BTreeMap<String, RawUniform>,
    #[serde(default)]
    profiles: BTreeMap<String, RawProfile>,
    brushes: Vec<RawBrush>,
    #[serde(default)]
    substring_rules: Vec<SubstringRule>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProfile {
    extends: Option<String>,
    #[serde(default)]
    uniforms: BTreeMap<String, RawUniform>,
    #[serde(default)]
    render: RawRender,
    attributes: Option<Vec<RawAttribute>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBrush {
    name: String,
    guid: String,
    version: Option<String>,
    profile: String,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    textures: Vec<String>,
    #[serde(default)]
    uniforms: BTreeMap<String, RawUniform>,
    #[serde(default)]
    render: RawRender,
    attributes: Option<Vec<RawAttribute>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawUniform {
    Declared { value: RawValue, semantic: String },
    Bare(RawValue),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f32),
    Vector(Vec<f32>),
    Path(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRender {
    side: Option<String>,
    transparent: Option<bool>,
    depth_test: Option<bool>,
    depth_write: Option<bool>,
    depth_func: Option<String>,
    blend: Option<RawBlend>,
    alpha_test: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawBlend {
    Preset(String),
    Custom {
        color: RawBlendComponent,
        alpha: Option<RawBlendComponent>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBlendComponent {
    src: String,
    dst: String,
    #[serde(default)]
    op: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAttribute {
    slot: String,
    from: Vec<String>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    transfer: Option<String>,
}

// ============================================================================
// Profile flattening
// ============================================================================

#[derive(Default)]
struct FlatProfile {
    uniforms: BTreeMap<String, RawUniform>,
    render: RawRender,
    attributes: Option<Vec<RawAttribute>>,
}

impl FlatProfile {
    fn overlay(
        &mut self,
        uniforms: &BTreeMap<String, RawUniform>,
        render: &RawRender,
        attributes: Option<&Vec<RawAttribute>>,
    ) {
        for (name, uniform) in uniforms {
            let merged = match (self.uniforms.get(name), uniform) {
                // A bare override keeps the semantic its parent declared.
                (Some(RawUniform::Declared { semantic, .. }), RawUniform::Bare(value)) => {
                    RawUniform::Declared {
                        value: value.clone(),
                        semantic: semantic.clone(),
                    }
                }
                _ => uniform.clone(),
            };
            self.uniforms.insert(name.clone(), merged);
        }

        let base = &mut self.render;
        base.side = render.side.clone().or(base.side.take());
        base.transparent = render.transparent.or(base.transparent);
        base.depth_test = render.depth_test.or(base.depth_test);
        base.depth_write = render.depth_write.or(base.depth_write);
        base.depth_func = render.depth_func.clone().or(base.depth_func.take());
        base.blend = render.blend.clone().or(base.blend.take());
        base.alpha_test = render.alpha_test.or(base.alpha_test);

        if let Some(attributes) = attributes {
            self.attributes = Some(attributes.clone());
        }
    }
}

fn flatten_profile(name: &str, raw: &RawCatalog, depth: usize) -> Result<FlatProfile> {
    if depth > MAX_PROFILE_DEPTH {
        return Err(BrushError::Catalog(format!(
            "profile chain through {name} is too deep (cycle?)"
        )));
    }
    let profile = raw
        .profiles
        .get(name)
        .ok_or_else(|| BrushError::Catalog(format!("unknown profile {name}")))?;

    let mut flat = match &profile.extends {
        Some(parent) => flatten_profile(parent, raw, depth + 1)?,
        None => FlatProfile {
            uniforms: raw.host_uniforms.clone(),
            ..FlatProfile::default()
        },
    };
    flat.overlay(
        &profile.uniforms,
        &profile.render,
        profile.attributes.as_ref(),
    );
    Ok(flat)
}

// ============================================================================
// Conversion
// ============================================================================

fn canonical_guid(guid: &str) -> Option<String> {
    Uuid::try_parse(guid.trim())
        .ok()
        .map(|u| u.hyphenated().to_string())
}

fn build_descriptor(brush: &RawBrush, raw: &RawCatalog) -> Result<BrushDescriptor> {
    let guid = canonical_guid(&brush.guid).ok_or_else(|| {
        BrushError::Catalog(format!("brush {} has invalid GUID {:?}", brush.name, brush.guid))
    })?;

    let mut flat = flatten_profile(&brush.profile, raw, 0)?;
    flat.overlay(&brush.uniforms, &brush.render, brush.attributes.as_ref());

    let aliases = brush
        .aliases
        .iter()
        .map(|alias| canonical_guid(alias).unwrap_or_else(|| alias.clone()))
        .collect();

    let mut descriptor = BrushDescriptor {
        canonical_name: brush.name.clone(),
        guid,
        version: brush
            .version
            .clone()
            .unwrap_or_else(|| raw.default_version.clone()),
        aliases,
        uniforms: Vec::with_capacity(flat.uniforms.len() + brush.textures.len()),
        shaders: ShaderRefs {
            vertex: String::new(),
            fragment: String::new(),
        },
        render_state: RenderState::default(),
        attributes: Vec::new(),
    };

    descriptor.shaders = ShaderRefs {
        vertex: descriptor.resource_path("vertex.glsl"),
        fragment: descriptor.resource_path("fragment.glsl"),
    };

    for (name, uniform) in flat.uniforms {
        let decl = convert_uniform(&descriptor.canonical_name, name, uniform)?;
        descriptor.uniforms.push(decl);
    }
    for slot in &brush.textures {
        let path = descriptor.resource_path(&format!("{slot}.png"));
        descriptor.uniforms.push(UniformDecl {
            name: format!("u_{slot}"),
            value: UniformValue::Texture(path),
            semantic: UniformSemantic::Static,
        });
    }

    descriptor.render_state = convert_render(&descriptor.canonical_name, &flat.render)?;
    descriptor.attributes = flat
        .attributes
        .unwrap_or_default()
        .into_iter()
        .map(|a| convert_attribute(&descriptor.canonical_name, a))
        .collect::<Result<_>>()?;

    Ok(descriptor)
}

fn convert_uniform(brush: &str, name: String, uniform: RawUniform) -> Result<UniformDecl> {
    let (value, semantic) = match uniform {
        RawUniform::Declared { value, semantic } => (value, semantic.parse()?),
        RawUniform::Bare(value) => (value, UniformSemantic::Static),
    };
    let value = match value {
        RawValue::Number(v) => UniformValue::Float(v),
        RawValue::Path(p) => UniformValue::Texture(p),
        RawValue::Vector(v) => match v.as_slice() {
            [x, y] => UniformValue::Vec2(Vec2::new(*x, *y)),
            [x, y, z] => UniformValue::Vec3(Vec3::new(*x, *y, *z)),
            [x, y, z, w] => UniformValue::Vec4(Vec4::new(*x, *y, *z, *w)),
            _ => {
                return Err(BrushError::Catalog(format!(
                    "{brush}.{name}: vectors must have 2 to 4 components, got {}",
                    v.len()
                )));
            }
        },
    };
    Ok(UniformDecl {
        name,
        value,
        semantic,
    })
}

fn convert_render(brush: &str, raw: &RawRender) -> Result<RenderState> {
    let mut state = RenderState::default();

    if let Some(side) = &raw.side {
        state.side = match side.as_str() {
            "front" => Side::Front,
            "back" => Side::Back,
            "double" => Side::Double,
            other => return Err(BrushError::Catalog(format!("{brush}: unknown side {other:?}"))),
        };
    }
    if let Some(func) = &raw.depth_func {
        state.depth_func = parse_compare(brush, func)?;
    }
    state.transparent = raw.transparent.unwrap_or(state.transparent);
    state.depth_test = raw.depth_test.unwrap_or(state.depth_test);
    state.depth_write = raw.depth_write.unwrap_or(state.depth_write);
    state.alpha_test = raw.alpha_test;
    state.blend = match &raw.blend {
        None => None,
        Some(RawBlend::Preset(preset)) => match preset.as_str() {
            "none" => None,
            "alpha" => Some(wgpu::BlendState::ALPHA_BLENDING),
            "premultiplied" => Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
            "additive" => Some(RenderState::ADDITIVE),
            "multiply" => Some(RenderState::MULTIPLY),
            other => {
                return Err(BrushError::Catalog(format!(
                    "{brush}: unknown blend preset {other:?}"
                )));
            }
        },
        Some(RawBlend::Custom { color, alpha }) => {
            let color = parse_blend_component(brush, color)?;
            let alpha = match alpha {
                Some(alpha) => parse_blend_component(brush, alpha)?,
                None => color,
            };
            Some(wgpu::BlendState { color, alpha })
        }
    };

    Ok(state)
}

fn parse_compare(brush: &str, func: &str) -> Result<wgpu::CompareFunction> {
    use wgpu::CompareFunction as C;
    Ok(match func {
        "never" => C::Never,
        "less" => C::Less,
        "equal" => C::Equal,
        "less_equal" => C::LessEqual,
        "greater" => C::Greater,
        "not_equal" => C::NotEqual,
        "greater_equal" => C::GreaterEqual,
        "always" => C::Always,
        other => {
            return Err(BrushError::Catalog(format!(
                "{brush}: unknown depth function {other:?}"
            )));
        }
    })
}

fn parse_blend_component(brush: &str, raw: &RawBlendComponent) -> Result<wgpu::BlendComponent> {
    use wgpu::BlendFactor as F;
    let factor = |name: &str| -> Result<F> {
        Ok(match name {
            "zero" => F::Zero,
            "one" => F::One,
            "src" => F::Src,
            "one_minus_src" => F::OneMinusSrc,
            "src_alpha" => F::SrcAlpha,
            "one_minus_src_alpha" => F::OneMinusSrcAlpha,
            "dst" => F::Dst,
            "one_minus_dst" => F::OneMinusDst,
            "dst_alpha" => F::DstAlpha,
            "one_minus_dst_alpha" => F::OneMinusDstAlpha,
            "src_alpha_saturated" => F::SrcAlphaSaturated,
            other => {
                return Err(BrushError::Catalog(format!(
                    "{brush}: unknown blend factor {other:?}"
                )));
            }
        })
    };
    let operation = match raw.op.as_deref().unwrap_or("add") {
        "add" => wgpu::BlendOperation::Add,
        "subtract" => wgpu::BlendOperation::Subtract,
        "reverse_subtract" => wgpu::BlendOperation::ReverseSubtract,
        "min" => wgpu::BlendOperation::Min,
        "max" => wgpu::BlendOperation::Max,
        other => {
            return Err(BrushError::Catalog(format!(
                "{brush}: unknown blend operation {other:?}"
            )));
        }
    };
    Ok(wgpu::BlendComponent {
        src_factor: factor(&raw.src)?,
        dst_factor: factor(&raw.dst)?,
        operation,
    })
}

fn convert_attribute(brush: &str, raw: RawAttribute) -> Result<AttributeRule> {
    if raw.from.is_empty() {
        return Err(BrushError::Catalog(format!(
            "{brush}: attribute {} has no source candidates",
            raw.slot
        )));
    }
    let transfer = match raw.transfer.as_deref() {
        None | Some("none") => ColorTransfer::None,
        Some("srgb") => ColorTransfer::LinearToSrgb,
        Some(other) => {
            return Err(BrushError::Catalog(format!(
                "{brush}: unknown color transfer {other:?}"
            )));
        }
    };
    Ok(AttributeRule {
        slot: raw.slot,
        candidates: raw.from,
        required: raw.required,
        transfer,
    })
}
