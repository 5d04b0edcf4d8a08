use glam::{Vec3, Vec4};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Directional,
    Point,
}

#[derive(Debug, Clone)]
pub struct Light {
    pub uuid: Uuid,
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            color,
            intensity,
            kind: LightKind::Directional,
        }
    }

    #[must_use]
    pub fn new_point(color: Vec3, intensity: f32) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            color,
            intensity,
            kind: LightKind::Point,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_directional(&self) -> bool {
        self.kind == LightKind::Directional
    }

    /// Color scaled by intensity, alpha 1. This is what brush shaders receive.
    #[must_use]
    pub fn shader_color(&self) -> Vec4 {
        (self.color * self.intensity).extend(1.0)
    }
}
