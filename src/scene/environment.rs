//! Environment - ambient light and fog
//!
//! Brush shaders read a single ambient term and legacy exponential fog.
//! Either may be absent, in which case brush materials keep their defaults.

use glam::{Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Vec3,
    pub density: f32,
}

#[derive(Default, Clone, Debug, PartialEq)]
pub struct Environment {
    /// Ambient light color; `None` leaves brush defaults in place.
    pub ambient_color: Option<Vec3>,
    /// Ambient light intensity
    pub ambient_intensity: f32,
    pub fog: Option<Fog>,
}

impl Environment {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ambient_color: None,
            ambient_intensity: 1.0,
            fog: None,
        }
    }

    pub fn set_ambient_color(&mut self, color: Vec3) {
        self.ambient_color = Some(color);
    }

    pub fn set_fog(&mut self, color: Vec3, density: f32) {
        self.fog = Some(Fog { color, density });
    }

    /// Ambient color scaled by intensity, alpha 1.
    #[must_use]
    pub fn ambient_light(&self) -> Option<Vec4> {
        self.ambient_color
            .map(|c| (c * self.ambient_intensity).extend(1.0))
    }
}
