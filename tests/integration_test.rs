use glam::{Mat4, Quat, Vec3};
use serde_json::{json, Value};
use skinned_model::config::{EngineConfig, ImportConfig};
use skinned_model::resources::gltf_import::import_scene_from_slice;
use skinned_model::{AssetError, EngineError, Model};

// ============================================================================
// 测试资源：内存中构建的 GLB
// ============================================================================

/// 两节骨骼的最小蒙皮场景
///
/// ```text
/// Scene ─ Armature ─┬─ Root (0,1,0) ── Tip (0,2,0)
///                   └─ Mesh (skin 0)
/// ```
///
/// 动画 "Wave" 持续 1 秒：Root 平移 (0,1,0)->(0,2,0)，Tip 绕 Y 轴旋转 0->90°。
fn build_rig_glb() -> Vec<u8> {
    let (bin, document) = rig_parts();
    assemble_glb(&bin, document)
}

fn push_f32s(buffer: &mut Vec<u8>, values: &[f32]) {
    for value in values {
        buffer.extend_from_slice(&value.to_le_bytes());
    }
}

fn push_u16s(buffer: &mut Vec<u8>, values: &[u16]) {
    for value in values {
        buffer.extend_from_slice(&value.to_le_bytes());
    }
}

fn buffer_view(offset: usize, length: usize) -> Value {
    json!({ "buffer": 0, "byteOffset": offset, "byteLength": length })
}

/// 二进制块与 glTF JSON
fn rig_parts() -> (Vec<u8>, Value) {
    let half_angle = std::f32::consts::FRAC_PI_4;
    let mut bin = Vec::new();
    // 0: positions
    push_f32s(&mut bin, &[0.0, 1.0, 0.0, 0.5, 2.0, 0.0, 0.0, 3.0, 0.0]);
    // 36: normals
    push_f32s(&mut bin, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    // 72: joints
    push_u16s(&mut bin, &[0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0]);
    // 96: weights
    push_f32s(
        &mut bin,
        &[1.0, 0.0, 0.0, 0.0, 0.5, 0.5, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
    );
    // 144: indices
    push_u16s(&mut bin, &[0, 1, 2, 0]);
    // 152: inverse bind matrices
    push_f32s(&mut bin, &Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)).to_cols_array());
    push_f32s(&mut bin, &Mat4::from_translation(Vec3::new(0.0, -3.0, 0.0)).to_cols_array());
    // 280: key times
    push_f32s(&mut bin, &[0.0, 1.0]);
    // 288: rotations
    push_f32s(&mut bin, &[0.0, 0.0, 0.0, 1.0, 0.0, half_angle.sin(), 0.0, half_angle.cos()]);
    // 320: translations
    push_f32s(&mut bin, &[0.0, 1.0, 0.0, 0.0, 2.0, 0.0]);
    assert_eq!(bin.len(), 344);

    let document = json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "name": "Scene", "nodes": [0] }],
        "nodes": [
            { "name": "Armature", "children": [1, 3] },
            { "name": "Root", "translation": [0.0, 1.0, 0.0], "children": [2] },
            { "name": "Tip", "translation": [0.0, 2.0, 0.0] },
            { "name": "Mesh", "mesh": 0, "skin": 0 }
        ],
        "meshes": [{
            "name": "Strip",
            "primitives": [{
                "attributes": { "POSITION": 0, "NORMAL": 1, "JOINTS_0": 2, "WEIGHTS_0": 3 },
                "indices": 4
            }]
        }],
        "skins": [{ "joints": [1, 2], "inverseBindMatrices": 5 }],
        "animations": [{
            "name": "Wave",
            "samplers": [
                { "input": 6, "output": 7, "interpolation": "LINEAR" },
                { "input": 6, "output": 8, "interpolation": "LINEAR" }
            ],
            "channels": [
                { "sampler": 0, "target": { "node": 2, "path": "rotation" } },
                { "sampler": 1, "target": { "node": 1, "path": "translation" } }
            ]
        }],
        "buffers": [{ "byteLength": bin.len() }],
        "bufferViews": [
            buffer_view(0, 36),
            buffer_view(36, 36),
            buffer_view(72, 24),
            buffer_view(96, 48),
            buffer_view(144, 6),
            buffer_view(152, 128),
            buffer_view(280, 8),
            buffer_view(288, 32),
            buffer_view(320, 24)
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 1.0, 0.0], "max": [0.5, 3.0, 0.0] },
            { "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3" },
            { "bufferView": 2, "componentType": 5123, "count": 3, "type": "VEC4" },
            { "bufferView": 3, "componentType": 5126, "count": 3, "type": "VEC4" },
            { "bufferView": 4, "componentType": 5123, "count": 3, "type": "SCALAR" },
            { "bufferView": 5, "componentType": 5126, "count": 2, "type": "MAT4" },
            { "bufferView": 6, "componentType": 5126, "count": 2, "type": "SCALAR",
              "min": [0.0], "max": [1.0] },
            { "bufferView": 7, "componentType": 5126, "count": 2, "type": "VEC4" },
            { "bufferView": 8, "componentType": 5126, "count": 2, "type": "VEC3" }
        ]
    });

    (bin, document)
}

/// 以新的 JOINTS_0 / WEIGHTS_0 数据替换蒙皮属性（追加到二进制块末尾）
fn replace_skin_attributes(bin: &mut Vec<u8>, document: &mut Value, joints: &[u16], weights: &[f32]) {
    let count = joints.len() / 4;
    let joints_offset = bin.len();
    push_u16s(bin, joints);
    while bin.len() % 4 != 0 {
        bin.push(0);
    }
    let weights_offset = bin.len();
    push_f32s(bin, weights);

    let views = document["bufferViews"].as_array_mut().expect("bufferViews");
    views.push(buffer_view(joints_offset, joints.len() * 2));
    views.push(buffer_view(weights_offset, weights.len() * 4));
    let weights_view = views.len() - 1;

    document["accessors"][2] =
        json!({ "bufferView": weights_view - 1, "componentType": 5123, "count": count, "type": "VEC4" });
    document["accessors"][3] =
        json!({ "bufferView": weights_view, "componentType": 5126, "count": count, "type": "VEC4" });
}

fn assemble_glb(bin: &[u8], mut document: Value) -> Vec<u8> {
    document["buffers"][0]["byteLength"] = json!(bin.len());

    let mut json_chunk = serde_json::to_vec(&document).expect("serialize glTF json");
    while json_chunk.len() % 4 != 0 {
        json_chunk.push(b' ');
    }

    let total_length = 12 + 8 + json_chunk.len() + 8 + bin.len();
    let mut glb = Vec::with_capacity(total_length);
    glb.extend_from_slice(&0x4654_6C67u32.to_le_bytes());
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total_length as u32).to_le_bytes());
    glb.extend_from_slice(&(json_chunk.len() as u32).to_le_bytes());
    glb.extend_from_slice(&0x4E4F_534Au32.to_le_bytes());
    glb.extend_from_slice(&json_chunk);
    glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    glb.extend_from_slice(&0x004E_4942u32.to_le_bytes());
    glb.extend_from_slice(bin);
    glb
}

fn load_rig(config: &EngineConfig) -> anyhow::Result<Model> {
    let scene = import_scene_from_slice(&build_rig_glb(), "rig.glb", &config.import)?;
    Ok(Model::from_imported(scene, &config.animation)?)
}

// ============================================================================
// 导入
// ============================================================================

#[test]
fn test_import_rig_structure() -> anyhow::Result<()> {
    let scene = import_scene_from_slice(&build_rig_glb(), "rig.glb", &ImportConfig::default())?;

    assert_eq!(scene.hierarchy.len(), 5);
    assert_eq!(scene.hierarchy.root_node().name, "Scene");
    assert!(scene.hierarchy.find_by_name("Tip").is_some());

    assert_eq!(scene.meshes.len(), 1);
    assert_eq!(scene.meshes[0].base_vertex, 0);
    assert_eq!(scene.meshes[0].num_indices, 3);
    assert_eq!(scene.vertices.len(), 3);
    assert_eq!(scene.indices, vec![0, 1, 2]);

    let bones = &scene.skinning.bones;
    assert_eq!(bones.index_of("Root"), Some(0));
    assert_eq!(bones.index_of("Tip"), Some(1));
    assert_eq!(scene.skinning.vertex_bones[0].len(), 1);
    assert_eq!(scene.skinning.vertex_bones[1].len(), 2);

    let clip = &scene.animations[0];
    assert_eq!(clip.name, "Wave");
    assert_eq!(clip.ticks_per_second, 1000.0);
    assert!((clip.duration - 1000.0).abs() < 1e-3);
    assert_eq!(clip.channels.len(), 2);

    // 缺失的轨道由绑定姿态填充
    let tip = clip.find_channel("Tip").expect("Tip channel");
    assert_eq!(tip.position_keys.len(), 1);
    assert_eq!(tip.position_keys.sample(500.0), Vec3::new(0.0, 2.0, 0.0));
    let root = clip.find_channel("Root").expect("Root channel");
    assert_eq!(root.rotation_keys.sample(500.0), Quat::IDENTITY);
    assert_eq!(root.scaling_keys.sample(500.0), Vec3::ONE);

    Ok(())
}

#[test]
fn test_bones_follow_skin_joint_order() -> anyhow::Result<()> {
    // 所有顶点只引用 Tip，Root 没有任何权重
    let (mut bin, mut document) = rig_parts();
    replace_skin_attributes(
        &mut bin,
        &mut document,
        &[1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0],
        &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
    );

    let scene = import_scene_from_slice(&assemble_glb(&bin, document), "rig.glb", &ImportConfig::default())?;
    let bones = &scene.skinning.bones;
    assert_eq!(bones.len(), 2);
    assert_eq!(bones.index_of("Root"), Some(0));
    assert_eq!(bones.index_of("Tip"), Some(1));
    assert_eq!(
        scene.skinning.vertex_bones[0].influences().collect::<Vec<_>>(),
        vec![(1, 1.0)]
    );
    Ok(())
}

#[test]
fn test_skin_attribute_count_mismatch_is_rejected() {
    let (mut bin, mut document) = rig_parts();
    replace_skin_attributes(&mut bin, &mut document, &[0; 20], &[1.0, 0.0, 0.0, 0.0].repeat(5));

    let result = import_scene_from_slice(&assemble_glb(&bin, document), "rig.glb", &ImportConfig::default());
    match result {
        Err(AssetError::InvalidFormat { path, expected }) => {
            assert_eq!(path, "rig.glb");
            assert!(expected.contains("JOINTS_0"));
        }
        other => panic!("expected InvalidFormat, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_flip_winding_order() -> anyhow::Result<()> {
    let config = ImportConfig::left_handed();
    let scene = import_scene_from_slice(&build_rig_glb(), "rig.glb", &config)?;
    assert_eq!(scene.indices, vec![0, 2, 1]);
    Ok(())
}

// ============================================================================
// 播放
// ============================================================================

#[test]
fn test_bind_pose_at_time_zero() -> anyhow::Result<()> {
    let mut model = load_rig(&EngineConfig::default())?;
    model.update(0.0);

    for transform in model.bone_transforms() {
        assert!(transform.abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }
    Ok(())
}

#[test]
fn test_pose_at_half_duration() -> anyhow::Result<()> {
    let mut model = load_rig(&EngineConfig::default())?;
    model.update(0.5);

    let root = model.bone_transforms()[model.bone_name_to_index()["Root"]];
    assert!(root.abs_diff_eq(Mat4::from_translation(Vec3::new(0.0, 0.5, 0.0)), 1e-4));

    let tip = model.bone_transforms()[model.bone_name_to_index()["Tip"]];
    let tip_origin = tip.transform_point3(Vec3::new(0.0, 3.0, 0.0));
    assert!((tip_origin - Vec3::new(0.0, 3.5, 0.0)).length() < 1e-4);

    // Tip 旋转到 45°
    let along_x = tip.transform_point3(Vec3::new(1.0, 3.0, 0.0));
    let half = std::f32::consts::FRAC_1_SQRT_2;
    assert!((along_x - Vec3::new(half, 3.5, -half)).length() < 1e-4);
    Ok(())
}

#[test]
fn test_animation_loops() -> anyhow::Result<()> {
    let mut first = load_rig(&EngineConfig::default())?;
    first.update(0.25);

    let mut looped = load_rig(&EngineConfig::default())?;
    looped.update(1.0);
    looped.update(0.25);

    for (a, b) in first.bone_transforms().iter().zip(looped.bone_transforms()) {
        assert!(a.abs_diff_eq(*b, 1e-4));
    }
    Ok(())
}

#[test]
fn test_gpu_streams() -> anyhow::Result<()> {
    let model = load_rig(&EngineConfig::default())?;

    assert_eq!(model.num_vertices(), 3);
    assert_eq!(model.num_indices(), 3);
    let data = model.animation_data();
    assert_eq!(data[1].bone_indices[..2], [0, 1]);
    assert_eq!(data[1].bone_weights[..2], [0.5, 0.5]);

    let uniform = model.skinning_uniform();
    assert_eq!(uniform.as_bytes().len(), 256 * 64);
    Ok(())
}

#[test]
fn test_load_from_file() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("skinned_model_rig_{}.glb", std::process::id()));
    std::fs::write(&path, build_rig_glb())?;

    let result = Model::load(&path, &EngineConfig::default());
    std::fs::remove_file(&path)?;

    let model = result?;
    assert_eq!(model.num_bones(), 2);
    assert_eq!(model.animations()[0].name, "Wave");
    Ok(())
}

#[test]
fn test_load_missing_file() {
    let result = Model::load("missing/character.glb", &EngineConfig::default());
    assert!(matches!(
        result,
        Err(EngineError::Asset(AssetError::NotFound { .. }))
    ));
}
