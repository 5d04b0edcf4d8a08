//! Brush descriptors
//!
//! A [`BrushDescriptor`] is the immutable, fully-specified description of one
//! brush: which shaders it uses, which uniforms it declares (and with which
//! semantic), how it blends, and which vertex attributes its shader reads.
//!
//! Descriptors are built once from the catalog data and shared read-only.

use std::fmt;
use std::str::FromStr;

use glam::{Vec2, Vec3, Vec4};

use crate::errors::BrushError;

// ============================================================================
// Uniforms
// ============================================================================

/// Initial value of a brush uniform.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    /// Texture resource path, relative to the configured base path.
    Texture(String),
}

impl UniformValue {
    #[must_use]
    pub fn as_texture_path(&self) -> Option<&str> {
        match self {
            Self::Texture(path) => Some(path),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_vec4(&self) -> Option<Vec4> {
        match *self {
            Self::Vec4(v) => Some(v),
            Self::Vec3(v) => Some(v.extend(1.0)),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_vec3(&self) -> Option<Vec3> {
        match *self {
            Self::Vec3(v) => Some(v),
            Self::Vec4(v) => Some(v.truncate()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f32> {
        match *self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }
}

/// What drives a uniform at runtime.
///
/// Everything except [`UniformSemantic::Static`] is rewritten once per frame by
/// the [`MaterialAnimator`](crate::brushes::MaterialAnimator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UniformSemantic {
    /// Brush-specific constant; never touched after load.
    #[default]
    Static,
    /// Multi-speed time vector `(t/20, t, 2t, 3t)`.
    Time,
    /// Active camera world position.
    CameraPosition,
    /// Color of the n-th directional scene light (0 = key, 1 = fill).
    SceneLightColor(u8),
    AmbientLightColor,
    FogColor,
    FogDensity,
}

impl UniformSemantic {
    /// Number of directional scene lights brushes know about.
    pub const SCENE_LIGHT_COUNT: usize = 2;

    #[inline]
    #[must_use]
    pub fn is_dynamic(self) -> bool {
        !matches!(self, Self::Static)
    }
}

impl FromStr for UniformSemantic {
    type Err = BrushError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let semantic = match s {
            "static" => Self::Static,
            "time" => Self::Time,
            "camera_position" => Self::CameraPosition,
            "ambient_light_color" => Self::AmbientLightColor,
            "fog_color" => Self::FogColor,
            "fog_density" => Self::FogDensity,
            other => {
                let index = other
                    .strip_prefix("scene_light_color[")
                    .and_then(|rest| rest.strip_suffix(']'))
                    .and_then(|i| i.parse::<u8>().ok())
                    .filter(|&i| usize::from(i) < Self::SCENE_LIGHT_COUNT)
                    .ok_or_else(|| {
                        BrushError::Catalog(format!("unknown uniform semantic {other:?}"))
                    })?;
                Self::SceneLightColor(index)
            }
        };
        Ok(semantic)
    }
}

impl fmt::Display for UniformSemantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => f.write_str("static"),
            Self::Time => f.write_str("time"),
            Self::CameraPosition => f.write_str("camera_position"),
            Self::SceneLightColor(i) => write!(f, "scene_light_color[{i}]"),
            Self::AmbientLightColor => f.write_str("ambient_light_color"),
            Self::FogColor => f.write_str("fog_color"),
            Self::FogDensity => f.write_str("fog_density"),
        }
    }
}

/// A uniform declared by a brush.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformDecl {
    pub name: String,
    pub value: UniformValue,
    pub semantic: UniformSemantic,
}

// ============================================================================
// Render State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    Front,
    Back,
    #[default]
    Double,
}

impl Side {
    /// The face a rasterizer should cull to draw this side.
    #[must_use]
    pub fn cull_mode(self) -> Option<wgpu::Face> {
        match self {
            Self::Front => Some(wgpu::Face::Back),
            Self::Back => Some(wgpu::Face::Front),
            Self::Double => None,
        }
    }
}

/// Pipeline state a brush renders with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pub side: Side,
    pub transparent: bool,
    pub depth_test: bool,
    pub depth_write: bool,
    pub depth_func: wgpu::CompareFunction,
    /// `None` means blending is disabled (opaque replace).
    pub blend: Option<wgpu::BlendState>,
    /// Fragments with alpha below the cutoff are discarded.
    pub alpha_test: Option<f32>,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            side: Side::Double,
            transparent: false,
            depth_test: true,
            depth_write: true,
            depth_func: wgpu::CompareFunction::LessEqual,
            blend: None,
            alpha_test: None,
        }
    }
}

impl RenderState {
    /// `One + One`, the additive glow used by emissive and particle brushes.
    pub const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
    };

    /// `Dst * Src`, used by darkening brushes.
    pub const MULTIPLY: wgpu::BlendState = wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::Dst,
            dst_factor: wgpu::BlendFactor::Zero,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::DstAlpha,
            dst_factor: wgpu::BlendFactor::Zero,
            operation: wgpu::BlendOperation::Add,
        },
    };
}

// ============================================================================
// Attribute Rules
// ============================================================================

/// Color-space conversion applied while copying an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorTransfer {
    #[default]
    None,
    /// Linear float color to display-referred 8-bit sRGB.
    LinearToSrgb,
}

/// Maps engine attribute names onto one shader slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRule {
    /// Shader attribute name, e.g. `a_normal`.
    pub slot: String,
    /// Source names tried in order; the first present wins.
    pub candidates: Vec<String>,
    pub required: bool,
    pub transfer: ColorTransfer,
}

// ============================================================================
// Descriptor
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderRefs {
    pub vertex: String,
    pub fragment: String,
}

/// Static definition of one brush.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushDescriptor {
    pub canonical_name: String,
    /// Primary GUID, lowercase hyphenated.
    pub guid: String,
    /// Shader asset version used in resource paths.
    pub version: String,
    /// Extra identifiers (historical GUIDs, legacy names) mapping to this brush.
    pub aliases: Vec<String>,
    pub uniforms: Vec<UniformDecl>,
    pub shaders: ShaderRefs,
    pub render_state: RenderState,
    pub attributes: Vec<AttributeRule>,
}

impl BrushDescriptor {
    /// Directory holding this brush's resources: `<Name>-<guid>`.
    #[must_use]
    pub fn resource_dir(&self) -> String {
        format!("{}-{}", self.canonical_name, self.guid)
    }

    /// `<Name>-<guid>/<Name>-<guid>-v<version>-<suffix>`
    #[must_use]
    pub fn resource_path(&self, suffix: &str) -> String {
        let dir = self.resource_dir();
        format!("{dir}/{dir}-v{}-{suffix}", self.version)
    }

    #[must_use]
    pub fn uniform(&self, name: &str) -> Option<&UniformDecl> {
        self.uniforms.iter().find(|u| u.name == name)
    }

    /// Uniforms rewritten every frame.
    pub fn dynamic_uniforms(&self) -> impl Iterator<Item = &UniformDecl> {
        self.uniforms.iter().filter(|u| u.semantic.is_dynamic())
    }

    /// `(uniform name, texture path)` pairs.
    pub fn texture_slots(&self) -> impl Iterator<Item = (&str, &str)> {
        self.uniforms
            .iter()
            .filter_map(|u| u.value.as_texture_path().map(|p| (u.name.as_str(), p)))
    }

    /// Every identifier that names this brush exactly.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        [self.canonical_name.as_str(), self.guid.as_str()]
            .into_iter()
            .chain(self.aliases.iter().map(String::as_str))
    }

    #[must_use]
    pub fn geometry_name(&self) -> String {
        format!("geometry_{}", self.canonical_name)
    }

    #[must_use]
    pub fn material_name(&self) -> String {
        format!("material_{}", self.canonical_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_round_trips_through_display() {
        for semantic in [
            UniformSemantic::Static,
            UniformSemantic::Time,
            UniformSemantic::CameraPosition,
            UniformSemantic::SceneLightColor(0),
            UniformSemantic::SceneLightColor(1),
            UniformSemantic::AmbientLightColor,
            UniformSemantic::FogColor,
            UniformSemantic::FogDensity,
        ] {
            assert_eq!(semantic.to_string().parse::<UniformSemantic>(), Ok(semantic));
        }
    }

    #[test]
    fn semantic_rejects_out_of_range_light() {
        assert!("scene_light_color[2]".parse::<UniformSemantic>().is_err());
        assert!("scene_light_color".parse::<UniformSemantic>().is_err());
    }

    #[test]
    fn side_cull_modes() {
        assert_eq!(Side::Front.cull_mode(), Some(wgpu::Face::Back));
        assert_eq!(Side::Back.cull_mode(), Some(wgpu::Face::Front));
        assert_eq!(Side::Double.cull_mode(), None);
    }
}
