use std::sync::atomic::{AtomicU32, Ordering};

use slotmap::SlotMap;

use crate::brushes::animator::FrameContext;
use crate::brushes::descriptor::UniformSemantic;
use crate::resources::mesh::Mesh;
use crate::scene::camera::Camera;
use crate::scene::environment::Environment;
use crate::scene::light::Light;
use crate::scene::{LightKey, MeshKey};
use crate::utils::time::Timer;

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Host scene container.
///
/// Holds the meshes brush resolution works on plus everything the per-frame
/// brush uniforms are sampled from: lights, ambient, fog and the active
/// camera.
#[derive(Debug)]
pub struct Scene {
    pub id: u32,

    pub meshes: SlotMap<MeshKey, Mesh>,
    pub lights: SlotMap<LightKey, Light>,
    /// Insertion order of `lights`; decides which light is key and which fill.
    light_order: Vec<LightKey>,

    pub environment: Environment,
    pub camera: Option<Camera>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            meshes: SlotMap::with_key(),
            lights: SlotMap::with_key(),
            light_order: Vec::new(),
            environment: Environment::new(),
            camera: None,
        }
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshKey {
        self.meshes.insert(mesh)
    }

    pub fn add_light(&mut self, light: Light) -> LightKey {
        let key = self.lights.insert(light);
        self.light_order.push(key);
        key
    }

    pub fn remove_light(&mut self, key: LightKey) -> Option<Light> {
        self.light_order.retain(|k| *k != key);
        self.lights.remove(key)
    }

    /// Directional lights in insertion order.
    pub fn directional_lights(&self) -> impl Iterator<Item = &Light> {
        self.light_order
            .iter()
            .filter_map(|k| self.lights.get(*k))
            .filter(|l| l.is_directional())
    }

    /// Samples the values brush uniforms follow this frame.
    #[must_use]
    pub fn frame_context(&self, timer: &Timer) -> FrameContext {
        let mut scene_lights = [None; UniformSemantic::SCENE_LIGHT_COUNT];
        for (slot, light) in scene_lights.iter_mut().zip(self.directional_lights()) {
            *slot = Some(light.shader_color());
        }

        FrameContext {
            elapsed: timer.elapsed_seconds(),
            camera_position: self.camera.as_ref().map(Camera::world_position),
            scene_lights,
            ambient_light: self.environment.ambient_light(),
            fog_color: self.environment.fog.map(|f| f.color),
            fog_density: self.environment.fog.map(|f| f.density),
        }
    }

    /// Runs every brush mesh's animator against this frame's scene state.
    pub fn update_brush_uniforms(&mut self, timer: &Timer) {
        let ctx = self.frame_context(timer);
        for mesh in self.meshes.values_mut() {
            if let Some(binding) = mesh.brush_binding_mut() {
                binding.on_before_render(&ctx);
            }
        }
    }
}
