//! Brush Catalog Tests
//!
//! Tests for:
//! - Built-in catalog integrity (names, GUIDs, resource paths)
//! - Profile flattening into descriptors (uniforms, render state, attributes)
//! - Dynamic uniform semantics
//! - Catalog validation errors

use glam::{Vec3, Vec4};
use uuid::Uuid;

use sketch_brushes::brushes::{
    BrushCatalog, ColorTransfer, RenderState, Side, UniformSemantic, UniformValue,
};
use sketch_brushes::errors::BrushError;

// ============================================================================
// Built-in catalog integrity
// ============================================================================

#[test]
fn builtin_catalog_loads() {
    let catalog = BrushCatalog::builtin();
    assert!(catalog.len() >= 90, "catalog has {} brushes", catalog.len());
    assert!(!catalog.is_empty());
}

#[test]
fn experimental_brushes_resolve_by_name_and_guid() {
    let catalog = BrushCatalog::builtin();
    for (name, display, guid) in [
        ("RisingBubbles", "Rising Bubbles", "a8147ce1-005e-abe4-88e8-09a1eaadcc89"),
        ("Sparks", "Sparks", "50e99447-3861-05f4-697d-a1b96e771b98"),
        ("Gouache", "Gouache", "4465b5ef-3605-bec4-2b3e-6b04508ddb6b"),
        ("DryBrush", "Dry Brush", "725f4c6a-6427-6524-29ab-da371924adab"),
        ("Muscle", "Muscle", "f28c395c-a57d-464b-8f0b-558c59478fa3"),
        ("Guts", "Guts", "99aafe96-1645-44cd-99bd-979bc6ef37c5"),
        ("Fire2", "Fire2", "53d753ef-083c-45e1-98e7-4459b4471219"),
        ("SmoothHull", "Smooth Hull", "355b3579-bf1d-4ff5-a200-704437fe684b"),
        ("LeakyPen", "Leaky Pen", "ddda8745-4bb5-ac54-88b6-d1480370583e"),
        ("Fairy", "Fairy", "d9cc5e99-ace1-4d12-96e0-4a7c18c99cfc"),
        ("Charcoal", "Charcoal", "fde6e778-0f7a-e584-38d6-89d44cee59f6"),
        ("Wind", "Wind", "7136a729-1aab-bd24-f8b2-ca88b6adfb67"),
        ("Rain", "Rain", "03a529e1-f519-3dd4-582d-2d5cd92c3f4f"),
        ("InkGeometry", "Ink Geometry", "7c972c27-d3c2-8af4-7bf8-5d9db8f0b7bb"),
    ] {
        let brush = catalog
            .lookup(name)
            .unwrap_or_else(|| panic!("{name} missing from catalog"));
        assert_eq!(brush.guid, guid, "{name}");
        assert_eq!(catalog.canonical_name(display), Some(name), "{display:?}");
        assert_eq!(catalog.canonical_name(guid), Some(name), "{guid}");
        assert_eq!(
            catalog.canonical_name(&format!("brush_{name}")),
            Some(name),
            "prefixed {name}"
        );
    }
}

#[test]
fn deprecated_flat_name_collapses_onto_flat() {
    let catalog = BrushCatalog::builtin();
    assert_eq!(catalog.canonical_name("FlatDeprecated"), Some("Flat"));
}

#[test]
fn builtin_is_shared() {
    let a = BrushCatalog::builtin();
    let b = BrushCatalog::builtin();
    assert!(std::sync::Arc::ptr_eq(&a, &b));
}

#[test]
fn every_guid_is_canonical_lowercase() {
    let catalog = BrushCatalog::builtin();
    for brush in catalog.iter() {
        let parsed = Uuid::try_parse(&brush.guid).unwrap();
        assert_eq!(parsed.hyphenated().to_string(), brush.guid, "{}", brush.canonical_name);
    }
}

#[test]
fn lookup_is_by_canonical_name_only() {
    let catalog = BrushCatalog::builtin();
    assert!(catalog.lookup("Fire").is_some());
    assert!(catalog.lookup("fire").is_none());
    assert!(catalog.lookup("cb92b597-94ca-4255-b017-0e3f42f12f9e").is_none());
}

#[test]
fn every_brush_has_shaders_and_a_position_slot() {
    let catalog = BrushCatalog::builtin();
    for brush in catalog.iter() {
        let dir = brush.resource_dir();
        assert!(brush.shaders.vertex.starts_with(&format!("{dir}/")));
        assert!(brush.shaders.vertex.ends_with("-vertex.glsl"));
        assert!(brush.shaders.fragment.ends_with("-fragment.glsl"));

        let position = brush
            .attributes
            .iter()
            .find(|a| a.slot == "a_position")
            .unwrap_or_else(|| panic!("{} has no a_position", brush.canonical_name));
        assert!(position.required);
    }
}

#[test]
fn resource_paths_follow_naming_convention() {
    let catalog = BrushCatalog::builtin();
    let fire = catalog.lookup("Fire").unwrap();

    assert_eq!(fire.version, "10.0");
    assert_eq!(
        fire.shaders.fragment,
        "Fire-cb92b597-94ca-4255-b017-0e3f42f12f9e/Fire-cb92b597-94ca-4255-b017-0e3f42f12f9e-v10.0-fragment.glsl"
    );

    let slots: Vec<_> = fire.texture_slots().collect();
    assert_eq!(
        slots,
        [(
            "u_MainTex",
            "Fire-cb92b597-94ca-4255-b017-0e3f42f12f9e/Fire-cb92b597-94ca-4255-b017-0e3f42f12f9e-v10.0-MainTex.png"
        )]
    );
    assert_eq!(fire.geometry_name(), "geometry_Fire");
    assert_eq!(fire.material_name(), "material_Fire");
}

// ============================================================================
// Descriptor contents
// ============================================================================

#[test]
fn fire_is_animated_additive() {
    let catalog = BrushCatalog::builtin();
    let fire = catalog.lookup("Fire").unwrap();

    assert_eq!(
        fire.uniform("u_ScrollRate").unwrap().value,
        UniformValue::Float(0.6)
    );
    assert!(fire.uniform("u_EmissionGain").is_some());

    let time = fire.uniform("u_time").unwrap();
    assert_eq!(time.semantic, UniformSemantic::Time);
    assert_eq!(time.value, UniformValue::Vec4(Vec4::new(0.05, 1.0, 2.0, 3.0)));

    let state = fire.render_state;
    assert!(state.transparent);
    assert!(!state.depth_write);
    assert_eq!(state.blend, Some(RenderState::ADDITIVE));
}

#[test]
fn lighting_uniforms_carry_semantics() {
    let catalog = BrushCatalog::builtin();
    let ink = catalog.lookup("Ink").unwrap();

    let semantics: Vec<_> = ink.dynamic_uniforms().map(|u| u.semantic).collect();
    for expected in [
        UniformSemantic::SceneLightColor(0),
        UniformSemantic::SceneLightColor(1),
        UniformSemantic::AmbientLightColor,
        UniformSemantic::FogColor,
        UniformSemantic::FogDensity,
        UniformSemantic::CameraPosition,
    ] {
        assert!(semantics.contains(&expected), "Ink lacks {expected}");
    }

    assert_eq!(
        ink.uniform("u_fogColor").unwrap().value,
        UniformValue::Vec3(Vec3::splat(0.0196))
    );
}

#[test]
fn brush_level_time_override_keeps_semantic() {
    let catalog = BrushCatalog::builtin();
    for name in ["Disco", "Hypercolor", "LightWire", "WigglyGraphite", "DiamondHull"] {
        let brush = catalog.lookup(name).unwrap();
        assert_eq!(
            brush.uniform("u_time").unwrap().semantic,
            UniformSemantic::Time,
            "{name}"
        );
    }
}

#[test]
fn cutout_brushes_alpha_test_matches_cutoff() {
    let catalog = BrushCatalog::builtin();
    let splatter = catalog.lookup("Splatter").unwrap();
    assert_eq!(
        splatter.uniform("u_Cutoff").unwrap().value,
        UniformValue::Float(0.2)
    );
    assert_eq!(splatter.render_state.alpha_test, Some(0.2));
}

#[test]
fn hull_brushes_are_single_sided_without_uvs() {
    let catalog = BrushCatalog::builtin();
    let hull = catalog.lookup("MatteHull").unwrap();
    assert_eq!(hull.render_state.side, Side::Front);
    assert_eq!(hull.render_state.side.cull_mode(), Some(wgpu::Face::Back));
    assert!(hull.attributes.iter().all(|a| a.slot != "a_texcoord0"));
    assert_eq!(hull.texture_slots().count(), 0);
}

#[test]
fn paint_brushes_are_double_sided() {
    let catalog = BrushCatalog::builtin();
    let paint = catalog.lookup("OilPaint").unwrap();
    assert_eq!(paint.render_state.side, Side::Double);
    assert_eq!(paint.render_state.side.cull_mode(), None);
    assert_eq!(paint.texture_slots().count(), 2);
}

#[test]
fn color_slot_requests_srgb_transfer() {
    let catalog = BrushCatalog::builtin();
    for brush in catalog.iter() {
        if let Some(color) = brush.attributes.iter().find(|a| a.slot == "a_color") {
            assert_eq!(color.transfer, ColorTransfer::LinearToSrgb, "{}", brush.canonical_name);
        }
    }
}

#[test]
fn particle_brushes_prefer_namespaced_channels() {
    let catalog = BrushCatalog::builtin();
    let smoke = catalog.lookup("Smoke").unwrap();
    let normal = smoke.attributes.iter().find(|a| a.slot == "a_normal").unwrap();
    assert_eq!(normal.candidates, ["_tb_unity_normal", "normal"]);

    let uv1 = smoke.attributes.iter().find(|a| a.slot == "a_texcoord1").unwrap();
    assert_eq!(uv1.candidates, ["_tb_unity_texcoord_1", "uv2"]);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn unknown_profile_is_rejected() {
    let json = r#"{
        "brushes": [ { "name": "X", "guid": "aaaaaaaa-0000-4000-8000-000000000001", "profile": "missing" } ]
    }"#;
    assert!(matches!(
        BrushCatalog::from_json_str(json),
        Err(BrushError::Catalog(_))
    ));
}

#[test]
fn duplicate_names_are_rejected() {
    let json = r#"{
        "profiles": { "p": {} },
        "brushes": [
            { "name": "X", "guid": "aaaaaaaa-0000-4000-8000-000000000001", "profile": "p" },
            { "name": "X", "guid": "aaaaaaaa-0000-4000-8000-000000000002", "profile": "p" }
        ]
    }"#;
    assert!(matches!(
        BrushCatalog::from_json_str(json),
        Err(BrushError::Catalog(_))
    ));
}

#[test]
fn substring_rule_must_target_known_brush() {
    let json = r#"{
        "profiles": { "p": {} },
        "brushes": [ { "name": "X", "guid": "aaaaaaaa-0000-4000-8000-000000000001", "profile": "p" } ],
        "substring_rules": [ { "contains": "_Y ", "brush": "Y" } ]
    }"#;
    assert!(matches!(
        BrushCatalog::from_json_str(json),
        Err(BrushError::Catalog(_))
    ));
}

#[test]
fn unknown_semantic_is_rejected() {
    let json = r#"{
        "profiles": { "p": { "uniforms": { "u_x": { "value": 1.0, "semantic": "moon_phase" } } } },
        "brushes": [ { "name": "X", "guid": "aaaaaaaa-0000-4000-8000-000000000001", "profile": "p" } ]
    }"#;
    assert!(BrushCatalog::from_json_str(json).is_err());
}

#[test]
fn custom_blend_is_parsed() {
    let json = r#"{
        "profiles": { "p": { "render": { "blend": {
            "color": { "src": "src_alpha", "dst": "one_minus_src_alpha" },
            "alpha": { "src": "one", "dst": "one", "op": "max" }
        } } } },
        "brushes": [ { "name": "X", "guid": "aaaaaaaa-0000-4000-8000-000000000001", "profile": "p" } ]
    }"#;
    let catalog = BrushCatalog::from_json_str(json).unwrap();
    let blend = catalog.lookup("X").unwrap().render_state.blend.unwrap();
    assert_eq!(blend.color.src_factor, wgpu::BlendFactor::SrcAlpha);
    assert_eq!(blend.color.dst_factor, wgpu::BlendFactor::OneMinusSrcAlpha);
    assert_eq!(blend.alpha.operation, wgpu::BlendOperation::Max);
}
