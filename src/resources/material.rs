//! Resolved brush materials.
//!
//! A [`ResolvedMaterial`] is what the shader loader builds from a
//! [`BrushDescriptor`](crate::brushes::BrushDescriptor): shader text, the
//! merged uniform table with textures already decoded, and the render state.
//! It is shared read-only through `Arc` by every mesh that uses the brush.

use std::sync::Arc;

use glam::{Vec2, Vec3, Vec4};
use uuid::Uuid;

use crate::brushes::descriptor::{RenderState, UniformSemantic, UniformValue};
use crate::resources::texture::Texture;

/// Current value of a material uniform.
#[derive(Debug, Clone)]
pub enum MaterialValue {
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    /// `None` when the texture failed to load; the slot stays unbound.
    Texture(Option<Arc<Texture>>),
}

impl MaterialValue {
    #[must_use]
    pub fn as_float(&self) -> Option<f32> {
        match *self {
            Self::Float(v) => Some(v),
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
    pub fn as_vec4(&self) -> Option<Vec4> {
        match *self {
            Self::Vec4(v) => Some(v),
            Self::Vec3(v) => Some(v.extend(1.0)),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_texture(&self) -> Option<&Arc<Texture>> {
        match self {
            Self::Texture(t) => t.as_ref(),
            _ => None,
        }
    }

    /// Converts a declared non-texture value. Textures go through the loader.
    #[must_use]
    pub fn from_declared(value: &UniformValue) -> Option<Self> {
        match *value {
            UniformValue::Float(v) => Some(Self::Float(v)),
            UniformValue::Vec2(v) => Some(Self::Vec2(v)),
            UniformValue::Vec3(v) => Some(Self::Vec3(v)),
            UniformValue::Vec4(v) => Some(Self::Vec4(v)),
            UniformValue::Texture(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MaterialUniform {
    pub name: String,
    pub value: MaterialValue,
    pub semantic: UniformSemantic,
}

#[derive(Debug)]
pub struct ResolvedMaterial {
    pub uuid: Uuid,
    /// `material_<brush>`
    pub name: String,
    pub brush: String,

    pub vertex_shader: String,
    pub fragment_shader: String,

    pub uniforms: Vec<MaterialUniform>,
    pub render_state: RenderState,
}

impl ResolvedMaterial {
    #[must_use]
    pub fn uniform_index(&self, name: &str) -> Option<usize> {
        self.uniforms.iter().position(|u| u.name == name)
    }

    #[must_use]
    pub fn uniform(&self, name: &str) -> Option<&MaterialUniform> {
        self.uniforms.iter().find(|u| u.name == name)
    }

    #[must_use]
    pub fn texture(&self, name: &str) -> Option<&Arc<Texture>> {
        self.uniform(name).and_then(|u| u.value.as_texture())
    }

    /// Texture slots that could not be loaded.
    pub fn unbound_textures(&self) -> impl Iterator<Item = &str> {
        self.uniforms
            .iter()
            .filter(|u| matches!(u.value, MaterialValue::Texture(None)))
            .map(|u| u.name.as_str())
    }
}
