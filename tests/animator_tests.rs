//! Per-Frame Uniform Synchronizer Tests
//!
//! Tests for:
//! - Time vector updates
//! - Scene light slots (two, one, none, non-directional)
//! - Ambient, fog and camera position
//! - Per-mesh isolation and the shared material template

mod common;

use std::sync::Arc;
use std::time::Duration;

use glam::{Vec3, Vec4};

use sketch_brushes::assets::ShaderResourceLoader;
use sketch_brushes::brushes::{BrushCatalog, FrameContext, MaterialAnimator, UniformSemantic};
use sketch_brushes::resources::{BrushBinding, Geometry, Mesh, MeshMaterial, ResolvedMaterial};
use sketch_brushes::scene::{Camera, Light, MeshKey, Scene};
use sketch_brushes::utils::Timer;

use common::reader_with;

const DEFAULT_LIGHT_0: Vec4 = Vec4::new(0.7780, 0.8157, 0.9914, 1.0);
const DEFAULT_LIGHT_1: Vec4 = Vec4::new(0.4282, 0.4212, 0.3459, 1.0);

async fn material(name: &str) -> Arc<ResolvedMaterial> {
    let catalog = BrushCatalog::builtin();
    let reader = reader_with(&catalog, &[name]);
    ShaderResourceLoader::new(catalog, reader)
        .load(name)
        .await
        .unwrap()
}

fn scene_with(material: &Arc<ResolvedMaterial>) -> (Scene, MeshKey) {
    let mut scene = Scene::new();
    let mut mesh = Mesh::new(Geometry::new());
    mesh.material = MeshMaterial::Brush(BrushBinding::new(material.clone()));
    let key = scene.add_mesh(mesh);
    (scene, key)
}

fn binding(scene: &Scene, key: MeshKey) -> &BrushBinding {
    scene.meshes[key].brush_binding().unwrap()
}

fn vec4_of(scene: &Scene, key: MeshKey, name: &str) -> Vec4 {
    binding(scene, key).uniform(name).unwrap().as_vec4().unwrap()
}

// ============================================================================
// Animator slots
// ============================================================================

#[tokio::test]
async fn animator_tracks_only_dynamic_uniforms() {
    let fire = material("Fire").await;
    let animator = MaterialAnimator::new(&fire);

    assert!(!animator.is_empty());
    for slot in animator.slots() {
        assert!(slot.semantic.is_dynamic());
        assert_eq!(fire.uniforms[slot.index].semantic, slot.semantic);
    }
    assert!(
        animator
            .slots()
            .iter()
            .any(|s| s.semantic == UniformSemantic::Time)
    );
    let scroll = fire.uniform_index("u_ScrollRate").unwrap();
    assert!(animator.live_value(scroll).is_none());
}

// ============================================================================
// Time
// ============================================================================

#[tokio::test]
async fn time_vector_follows_timer() {
    let fire = material("Fire").await;
    let (mut scene, key) = scene_with(&fire);

    scene.update_brush_uniforms(&Timer::at(Duration::from_secs(10)));
    assert_eq!(vec4_of(&scene, key, "u_time"), Vec4::new(0.5, 10.0, 20.0, 30.0));

    scene.update_brush_uniforms(&Timer::at(Duration::from_secs(2)));
    assert_eq!(vec4_of(&scene, key, "u_time"), Vec4::new(0.1, 2.0, 4.0, 6.0));
}

#[tokio::test]
async fn shared_template_is_never_written() {
    let fire = material("Fire").await;
    let (mut scene, _) = scene_with(&fire);

    scene.update_brush_uniforms(&Timer::at(Duration::from_secs(10)));

    assert_eq!(
        fire.uniform("u_time").unwrap().value.as_vec4(),
        Some(Vec4::new(0.05, 1.0, 2.0, 3.0))
    );
}

#[tokio::test]
async fn meshes_sharing_a_material_animate_independently() {
    let fire = material("Fire").await;
    let mut a = BrushBinding::new(fire.clone());
    let b = BrushBinding::new(fire.clone());

    a.on_before_render(&FrameContext {
        elapsed: 4.0,
        ..Default::default()
    });

    assert_eq!(
        a.uniform("u_time").unwrap().as_vec4(),
        Some(Vec4::new(0.2, 4.0, 8.0, 12.0))
    );
    assert_eq!(
        b.uniform("u_time").unwrap().as_vec4(),
        Some(Vec4::new(0.05, 1.0, 2.0, 3.0))
    );
}

// ============================================================================
// Scene lights
// ============================================================================

#[tokio::test]
async fn two_directional_lights_fill_both_slots() {
    let ink = material("Ink").await;
    let (mut scene, key) = scene_with(&ink);

    scene.add_light(Light::new_directional(Vec3::new(1.0, 0.5, 0.25), 2.0));
    scene.add_light(Light::new_directional(Vec3::new(0.2, 0.4, 0.6), 0.5));
    scene.update_brush_uniforms(&Timer::at(Duration::ZERO));

    assert_eq!(
        vec4_of(&scene, key, "u_SceneLight_0_color"),
        Vec4::new(2.0, 1.0, 0.5, 1.0)
    );
    assert_eq!(
        vec4_of(&scene, key, "u_SceneLight_1_color"),
        Vec4::new(0.1, 0.2, 0.3, 1.0)
    );
}

#[tokio::test]
async fn single_light_leaves_second_slot_unchanged() {
    let ink = material("Ink").await;
    let (mut scene, key) = scene_with(&ink);

    scene.add_light(Light::new_directional(Vec3::ONE, 1.0));
    scene.update_brush_uniforms(&Timer::at(Duration::ZERO));

    assert_eq!(vec4_of(&scene, key, "u_SceneLight_0_color"), Vec4::ONE);
    assert_eq!(vec4_of(&scene, key, "u_SceneLight_1_color"), DEFAULT_LIGHT_1);
}

#[tokio::test]
async fn removed_light_keeps_last_value() {
    let ink = material("Ink").await;
    let (mut scene, key) = scene_with(&ink);

    let light = scene.add_light(Light::new_directional(Vec3::new(0.5, 0.5, 0.5), 1.0));
    scene.update_brush_uniforms(&Timer::at(Duration::ZERO));
    scene.remove_light(light);
    scene.update_brush_uniforms(&Timer::at(Duration::from_secs(1)));

    assert_eq!(
        vec4_of(&scene, key, "u_SceneLight_0_color"),
        Vec4::new(0.5, 0.5, 0.5, 1.0)
    );
}

#[tokio::test]
async fn point_lights_are_not_scene_lights() {
    let ink = material("Ink").await;
    let (mut scene, key) = scene_with(&ink);

    scene.add_light(Light::new_point(Vec3::ONE, 5.0));
    scene.add_light(Light::new_directional(Vec3::new(0.0, 1.0, 0.0), 1.0));
    scene.update_brush_uniforms(&Timer::at(Duration::ZERO));

    assert_eq!(
        vec4_of(&scene, key, "u_SceneLight_0_color"),
        Vec4::new(0.0, 1.0, 0.0, 1.0)
    );
    assert_eq!(vec4_of(&scene, key, "u_SceneLight_1_color"), DEFAULT_LIGHT_1);
}

#[tokio::test]
async fn no_lights_keeps_defaults() {
    let ink = material("Ink").await;
    let (mut scene, key) = scene_with(&ink);

    scene.update_brush_uniforms(&Timer::at(Duration::from_secs(3)));

    assert_eq!(vec4_of(&scene, key, "u_SceneLight_0_color"), DEFAULT_LIGHT_0);
    assert_eq!(vec4_of(&scene, key, "u_SceneLight_1_color"), DEFAULT_LIGHT_1);
}

#[test]
fn frame_context_orders_lights_by_insertion() {
    let mut scene = Scene::new();
    scene.add_light(Light::new_directional(Vec3::X, 1.0));
    scene.add_light(Light::new_directional(Vec3::Y, 1.0));
    scene.add_light(Light::new_directional(Vec3::Z, 1.0));

    let ctx = scene.frame_context(&Timer::at(Duration::ZERO));
    assert_eq!(ctx.scene_lights, [Some(Vec4::new(1.0, 0.0, 0.0, 1.0)), Some(Vec4::new(0.0, 1.0, 0.0, 1.0))]);
}

// ============================================================================
// Ambient, fog and camera
// ============================================================================

#[tokio::test]
async fn ambient_and_fog_follow_environment() {
    let ink = material("Ink").await;
    let (mut scene, key) = scene_with(&ink);

    scene.environment.set_ambient_color(Vec3::new(0.2, 0.3, 0.4));
    scene.environment.set_fog(Vec3::new(0.1, 0.2, 0.3), 0.05);
    scene.update_brush_uniforms(&Timer::at(Duration::ZERO));

    let mesh = binding(&scene, key);
    assert_eq!(
        mesh.uniform("u_ambient_light_color").unwrap().as_vec4(),
        Some(Vec4::new(0.2, 0.3, 0.4, 1.0))
    );
    assert_eq!(
        mesh.uniform("u_fogColor").unwrap().as_vec3(),
        Some(Vec3::new(0.1, 0.2, 0.3))
    );
    assert_eq!(mesh.uniform("u_fogDensity").unwrap().as_float(), Some(0.05));
}

#[tokio::test]
async fn missing_fog_keeps_defaults() {
    let ink = material("Ink").await;
    let (mut scene, key) = scene_with(&ink);

    scene.update_brush_uniforms(&Timer::at(Duration::ZERO));

    let mesh = binding(&scene, key);
    assert_eq!(
        mesh.uniform("u_fogColor").unwrap().as_vec3(),
        Some(Vec3::splat(0.0196))
    );
    assert_eq!(mesh.uniform("u_fogDensity").unwrap().as_float(), Some(0.0));
}

#[tokio::test]
async fn camera_position_follows_active_camera() {
    let flat = material("Flat").await;
    let (mut scene, key) = scene_with(&flat);

    scene.camera = Some(Camera::new().with_position(Vec3::new(1.0, 2.0, 3.0)));
    scene.update_brush_uniforms(&Timer::at(Duration::ZERO));

    assert_eq!(
        binding(&scene, key).uniform("cameraPosition").unwrap().as_vec3(),
        Some(Vec3::new(1.0, 2.0, 3.0))
    );

    if let Some(camera) = scene.camera.as_mut() {
        camera.set_position(Vec3::new(-4.0, 0.5, 8.0));
    }
    scene.update_brush_uniforms(&Timer::at(Duration::ZERO));

    assert_eq!(
        binding(&scene, key).uniform("cameraPosition").unwrap().as_vec3(),
        Some(Vec3::new(-4.0, 0.5, 8.0))
    );
}

#[tokio::test]
async fn placeholder_meshes_are_skipped() {
    let mut scene = Scene::new();
    let key = scene.add_mesh(Mesh::new(Geometry::new()));
    scene.add_light(Light::new_directional(Vec3::ONE, 1.0));
    scene.update_brush_uniforms(&Timer::at(Duration::ZERO));
    assert!(scene.meshes[key].brush_binding().is_none());
}
