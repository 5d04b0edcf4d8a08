//! Per-Frame Uniform Synchronizer
//!
//! Brush shaders read a handful of uniforms that follow the host scene:
//! elapsed time, the camera position, two directional "scene lights", the
//! ambient term and fog. A [`MaterialAnimator`] is attached to every mesh
//! that received a brush material and refreshes exactly those slots once per
//! frame from a [`FrameContext`].
//!
//! The animator never writes into the shared
//! [`ResolvedMaterial`](crate::resources::ResolvedMaterial); it keeps the live
//! values next to the mesh and the renderer reads them through
//! [`BrushBinding::uniform`](crate::resources::BrushBinding::uniform).

use glam::{Vec3, Vec4};
use smallvec::SmallVec;

use crate::brushes::descriptor::UniformSemantic;
use crate::resources::material::{MaterialValue, ResolvedMaterial};

/// Host scene values sampled once per frame.
///
/// Any field left `None` means the scene does not expose that value; slots
/// driven by it keep whatever they held before.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameContext {
    /// Seconds since the session started.
    pub elapsed: f32,
    pub camera_position: Option<Vec3>,
    /// Colors of the first directional lights, in scene order.
    pub scene_lights: [Option<Vec4>; UniformSemantic::SCENE_LIGHT_COUNT],
    pub ambient_light: Option<Vec4>,
    pub fog_color: Option<Vec3>,
    pub fog_density: Option<f32>,
}

impl FrameContext {
    /// Multi-speed time vector `(t/20, t, 2t, 3t)`.
    #[inline]
    #[must_use]
    pub fn time_vector(&self) -> Vec4 {
        let t = self.elapsed;
        Vec4::new(t / 20.0, t, t * 2.0, t * 3.0)
    }
}

/// A live value; same shape as the template value it shadows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiveValue {
    Float(f32),
    Vec3(Vec3),
    Vec4(Vec4),
}

impl LiveValue {
    fn from_material(value: &MaterialValue) -> Option<Self> {
        match *value {
            MaterialValue::Float(v) => Some(Self::Float(v)),
            MaterialValue::Vec3(v) => Some(Self::Vec3(v)),
            MaterialValue::Vec4(v) => Some(Self::Vec4(v)),
            MaterialValue::Vec2(_) | MaterialValue::Texture(_) => None,
        }
    }

    fn set_vector(&mut self, v: Vec4) {
        match self {
            Self::Vec3(slot) => *slot = v.truncate(),
            Self::Vec4(slot) => *slot = v,
            Self::Float(slot) => *slot = v.x,
        }
    }

    fn set_scalar(&mut self, v: f32) {
        match self {
            Self::Float(slot) => *slot = v,
            Self::Vec3(slot) => *slot = Vec3::splat(v),
            Self::Vec4(slot) => *slot = Vec4::splat(v),
        }
    }
}

impl From<LiveValue> for MaterialValue {
    fn from(value: LiveValue) -> Self {
        match value {
            LiveValue::Float(v) => MaterialValue::Float(v),
            LiveValue::Vec3(v) => MaterialValue::Vec3(v),
            LiveValue::Vec4(v) => MaterialValue::Vec4(v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveUniform {
    /// Index into the material's uniform table.
    pub index: usize,
    pub semantic: UniformSemantic,
    pub value: LiveValue,
}

/// Refreshes the semantic uniforms of one mesh's brush material.
#[derive(Debug, Clone, Default)]
pub struct MaterialAnimator {
    slots: SmallVec<[LiveUniform; 8]>,
}

impl MaterialAnimator {
    /// Collects the dynamic uniforms the material declares.
    #[must_use]
    pub fn new(material: &ResolvedMaterial) -> Self {
        let slots = material
            .uniforms
            .iter()
            .enumerate()
            .filter(|(_, u)| u.semantic.is_dynamic())
            .filter_map(|(index, u)| {
                let value = LiveValue::from_material(&u.value)?;
                Some(LiveUniform {
                    index,
                    semantic: u.semantic,
                    value,
                })
            })
            .collect();
        Self { slots }
    }

    /// Updates every declared slot from the frame context.
    ///
    /// Runs once per draw: iterates the declared slots only and never
    /// allocates.
    pub fn on_before_render(&mut self, ctx: &FrameContext) {
        for slot in &mut self.slots {
            match slot.semantic {
                UniformSemantic::Time => slot.value.set_vector(ctx.time_vector()),
                UniformSemantic::CameraPosition => {
                    if let Some(p) = ctx.camera_position {
                        slot.value.set_vector(p.extend(1.0));
                    }
                }
                UniformSemantic::SceneLightColor(i) => {
                    if let Some(Some(color)) = ctx.scene_lights.get(usize::from(i)) {
                        slot.value.set_vector(*color);
                    }
                }
                UniformSemantic::AmbientLightColor => {
                    if let Some(color) = ctx.ambient_light {
                        slot.value.set_vector(color);
                    }
                }
                UniformSemantic::FogColor => {
                    if let Some(color) = ctx.fog_color {
                        slot.value.set_vector(color.extend(1.0));
                    }
                }
                UniformSemantic::FogDensity => {
                    if let Some(density) = ctx.fog_density {
                        slot.value.set_scalar(density);
                    }
                }
                UniformSemantic::Static => {}
            }
        }
    }

    /// Live value for the material uniform at `index`, if it is animated.
    #[must_use]
    pub fn live_value(&self, index: usize) -> Option<LiveValue> {
        self.slots
            .iter()
            .find(|s| s.index == index)
            .map(|s| s.value)
    }

    pub fn slots(&self) -> &[LiveUniform] {
        &self.slots
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
