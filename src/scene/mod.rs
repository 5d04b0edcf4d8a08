//! Host scene model
//!
//! - Scene: mesh and light storage
//! - Camera: active viewpoint
//! - Light: directional and point lights
//! - Environment: ambient term and fog

pub mod camera;
pub mod environment;
pub mod light;
pub mod scene;

pub use camera::Camera;
pub use environment::{Environment, Fog};
pub use light::{Light, LightKind};
pub use scene::Scene;

use slotmap::new_key_type;

new_key_type! {
    pub struct MeshKey;
    pub struct LightKey;
}
