//! glTF 场景导入
//!
//! 将 glTF 文档转换为 [`ImportedScene`]：
//! - 节点层级（合成一个以场景命名的根节点）
//! - 每个图元一个子网格条目，顶点与索引合并到共享缓冲区
//! - 蒙皮权重与骨骼偏移矩阵
//! - 动画片段（关键帧时间由秒换算为 tick）

use std::collections::HashMap;
use std::path::Path;

use glam::{Mat4, Quat, Vec3};
use gltf::animation::util::ReadOutputs;
use gltf::animation::Interpolation;
use gltf::mesh::Mode;

use super::scene::{ImportedScene, MaterialSlot, MeshEntry, NormalData, Vertex};
use crate::animation::{
    AnimationChannel, AnimationClip, Interpolate, Keyframe, KeyframeTrack, NodeHierarchy, NodeId,
};
use crate::config::ImportConfig;
use crate::core::{AssetError, AssetResult};

/// 从文件导入场景（.gltf 或 .glb）
pub fn import_scene<P: AsRef<Path>>(path: P, config: &ImportConfig) -> AssetResult<ImportedScene> {
    let path = path.as_ref();
    let source = path.display().to_string();

    if !path.exists() {
        return Err(AssetError::NotFound { path: source });
    }

    tracing::info!(target: "import", "Importing scene from {}", source);

    let gltf::Gltf { document, blob } =
        gltf::Gltf::open(path).map_err(|e| load_failed(&source, e))?;
    let buffers =
        gltf::import_buffers(&document, path.parent(), blob).map_err(|e| load_failed(&source, e))?;

    build_scene(&document, &buffers, config, &source)
}

/// 从内存导入场景
///
/// 外部 URI 引用的缓冲区无法解析，只支持内嵌数据（GLB 或 data URI）。
pub fn import_scene_from_slice(
    bytes: &[u8],
    source: &str,
    config: &ImportConfig,
) -> AssetResult<ImportedScene> {
    let gltf::Gltf { document, blob } =
        gltf::Gltf::from_slice(bytes).map_err(|e| load_failed(source, e))?;
    let buffers = gltf::import_buffers(&document, None, blob).map_err(|e| load_failed(source, e))?;

    build_scene(&document, &buffers, config, source)
}

fn load_failed(source: &str, error: gltf::Error) -> AssetError {
    tracing::error!(target: "import", "Failed to import {}: {}", source, error);
    AssetError::LoadFailed {
        path: source.to_string(),
        reason: error.to_string(),
    }
}

fn build_scene(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    config: &ImportConfig,
    source: &str,
) -> AssetResult<ImportedScene> {
    let gltf_scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| AssetError::InvalidFormat {
            path: source.to_string(),
            expected: "at least one scene".to_string(),
        })?;

    let root_name = gltf_scene.name().unwrap_or("Scene").to_string();
    let mut hierarchy = NodeHierarchy::new(root_name, Mat4::IDENTITY);
    let root = hierarchy.root();
    let mut mesh_nodes = Vec::new();
    for node in gltf_scene.nodes() {
        add_node(&mut hierarchy, root, node, &mut mesh_nodes);
    }

    let mut scene = ImportedScene::empty(hierarchy);
    scene.materials = document.materials().enumerate().map(material_slot).collect();

    for node in &mesh_nodes {
        let Some(mesh) = node.mesh() else {
            continue;
        };
        let binding = node.skin().map(|skin| SkinBinding::read(&skin, buffers));
        for primitive in mesh.primitives() {
            append_primitive(&mut scene, &primitive, buffers, binding.as_ref(), config, source)?;
        }
    }

    scene.animations = document
        .animations()
        .map(|animation| import_animation(&animation, buffers, config))
        .collect();

    scene.skinning.log_overflow();

    tracing::info!(
        target: "import",
        "Imported {}: {} nodes, {} meshes, {} vertices, {} indices, {} bones, {} animations",
        source,
        scene.hierarchy.len(),
        scene.meshes.len(),
        scene.vertices.len(),
        scene.indices.len(),
        scene.skinning.bones.len(),
        scene.animations.len()
    );

    Ok(scene)
}

/// 节点名称（未命名节点以索引命名）
fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()))
}

fn add_node<'a>(
    hierarchy: &mut NodeHierarchy,
    parent: NodeId,
    node: gltf::Node<'a>,
    mesh_nodes: &mut Vec<gltf::Node<'a>>,
) {
    let transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let id = hierarchy.add_child(parent, node_name(&node), transform);

    if node.mesh().is_some() {
        mesh_nodes.push(node.clone());
    }
    for child in node.children() {
        add_node(hierarchy, id, child, mesh_nodes);
    }
}

fn material_slot((index, material): (usize, gltf::Material)) -> MaterialSlot {
    let base_color_texture = material
        .pbr_metallic_roughness()
        .base_color_texture()
        .and_then(|info| match info.texture().source().source() {
            gltf::image::Source::Uri { uri, .. } => Some(uri.to_string()),
            gltf::image::Source::View { .. } => None,
        });

    MaterialSlot {
        name: material
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("material_{}", index)),
        base_color_texture,
    }
}

// ============================================================================
// 网格
// ============================================================================

/// 蒙皮关节到骨骼的映射数据
struct SkinBinding {
    joint_names: Vec<String>,
    inverse_bind_matrices: Vec<Mat4>,
}

impl SkinBinding {
    fn read(skin: &gltf::Skin, buffers: &[gltf::buffer::Data]) -> Self {
        let joint_names: Vec<String> = skin.joints().map(|joint| node_name(&joint)).collect();
        let reader = skin.reader(|buffer| Some(&buffers[buffer.index()]));
        let inverse_bind_matrices = match reader.read_inverse_bind_matrices() {
            Some(matrices) => matrices.map(|m| Mat4::from_cols_array_2d(&m)).collect(),
            None => vec![Mat4::IDENTITY; joint_names.len()],
        };

        Self {
            joint_names,
            inverse_bind_matrices,
        }
    }

    fn offset_matrix(&self, joint: usize) -> Mat4 {
        self.inverse_bind_matrices
            .get(joint)
            .copied()
            .unwrap_or(Mat4::IDENTITY)
    }
}

fn append_primitive(
    scene: &mut ImportedScene,
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    binding: Option<&SkinBinding>,
    config: &ImportConfig,
    source: &str,
) -> AssetResult<()> {
    if primitive.mode() != Mode::Triangles {
        return Err(AssetError::InvalidFormat {
            path: source.to_string(),
            expected: format!("triangle list primitives, found {:?}", primitive.mode()),
        });
    }

    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or_else(|| AssetError::InvalidFormat {
            path: source.to_string(),
            expected: "POSITION attribute on every primitive".to_string(),
        })?
        .collect();
    let vertex_count = positions.len();

    let mut indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..vertex_count as u32).collect(),
    };
    if indices.len() % 3 != 0 {
        return Err(AssetError::InvalidFormat {
            path: source.to_string(),
            expected: format!("index count divisible by 3, found {}", indices.len()),
        });
    }

    let normals: Vec<[f32; 3]> = match reader.read_normals() {
        Some(normals) => normals.collect(),
        None if config.generate_smooth_normals => generate_smooth_normals(&positions, &indices),
        None => vec![[0.0; 3]; vertex_count],
    };

    if config.flip_winding_order {
        for triangle in indices.chunks_exact_mut(3) {
            triangle.swap(1, 2);
        }
    }

    let tex_coords: Vec<[f32; 2]> = match reader.read_tex_coords(0) {
        Some(coords) => coords
            .into_f32()
            .map(|[u, v]| if config.flip_uvs { [u, 1.0 - v] } else { [u, v] })
            .collect(),
        None => vec![[0.0; 2]; vertex_count],
    };

    let normal_data: Vec<NormalData> = match reader.read_tangents() {
        Some(tangents) => tangents
            .zip(&normals)
            .map(|([x, y, z, w], normal)| {
                let tangent = Vec3::new(x, y, z);
                let bitangent = Vec3::from(*normal).cross(tangent) * w;
                NormalData {
                    tangent: tangent.to_array(),
                    bitangent: bitangent.to_array(),
                }
            })
            .collect(),
        None => vec![NormalData::default(); vertex_count],
    };

    let skin_sets = match binding {
        Some(_) => read_skin_sets(&reader, vertex_count, source)?,
        None => Vec::new(),
    };

    let base_vertex = scene.vertices.len();
    let base_index = scene.indices.len();

    scene.meshes.push(MeshEntry {
        base_vertex: base_vertex as u32,
        base_index: base_index as u32,
        num_indices: indices.len() as u32,
        material_index: primitive.material().index(),
    });

    scene.vertices.extend((0..vertex_count).map(|i| Vertex {
        position: positions[i],
        tex_coord: tex_coords.get(i).copied().unwrap_or_default(),
        normal: normals.get(i).copied().unwrap_or_default(),
    }));
    scene
        .normal_data
        .extend((0..vertex_count).map(|i| normal_data.get(i).copied().unwrap_or_default()));
    scene.indices.extend(indices);

    scene.skinning.resize_vertices(scene.vertices.len());

    let Some(binding) = binding else {
        return Ok(());
    };

    // 每个关节一根骨骼，按关节顺序注册（无权重的关节同样注册）
    let bone_indices: Vec<usize> = binding
        .joint_names
        .iter()
        .enumerate()
        .map(|(joint, name)| {
            scene
                .skinning
                .bones
                .register_bone(name, binding.offset_matrix(joint))
        })
        .collect();

    for (joints, weights) in skin_sets {
        for (local_vertex, (joint_ids, joint_weights)) in joints.iter().zip(&weights).enumerate() {
            for (&joint, &weight) in joint_ids.iter().zip(joint_weights) {
                if weight <= 0.0 {
                    continue;
                }
                let Some(&bone_index) = bone_indices.get(joint as usize) else {
                    tracing::warn!(
                        target: "import",
                        "Joint {} out of range in {} (skin has {} joints)",
                        joint,
                        source,
                        bone_indices.len()
                    );
                    continue;
                };
                scene
                    .skinning
                    .add_vertex_bone_influence(base_vertex + local_vertex, bone_index, weight);
            }
        }
    }

    Ok(())
}

type SkinSet = (Vec<[u16; 4]>, Vec<[f32; 4]>);

/// 读取所有 JOINTS_n / WEIGHTS_n 集合，数量须与顶点数一致
fn read_skin_sets<'a, 's, F>(
    reader: &gltf::mesh::Reader<'a, 's, F>,
    vertex_count: usize,
    source: &str,
) -> AssetResult<Vec<SkinSet>>
where
    F: Clone + Fn(gltf::Buffer<'a>) -> Option<&'s [u8]>,
{
    let mut sets = Vec::new();
    let mut set = 0;
    while let (Some(joints), Some(weights)) = (reader.read_joints(set), reader.read_weights(set)) {
        let joints: Vec<[u16; 4]> = joints.into_u16().collect();
        let weights: Vec<[f32; 4]> = weights.into_f32().collect();
        if joints.len() != vertex_count || weights.len() != vertex_count {
            return Err(AssetError::InvalidFormat {
                path: source.to_string(),
                expected: format!(
                    "JOINTS_{0}/WEIGHTS_{0} count equal to vertex count {1}, found {2} joints and {3} weights",
                    set,
                    vertex_count,
                    joints.len(),
                    weights.len()
                ),
            });
        }
        sets.push((joints, weights));
        set += 1;
    }
    Ok(sets)
}

/// 按面积加权累加面法线生成平滑法线
pub fn generate_smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut accumulated = vec![Vec3::ZERO; positions.len()];

    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let p0 = Vec3::from(positions[a]);
        let face_normal = (Vec3::from(positions[b]) - p0).cross(Vec3::from(positions[c]) - p0);
        accumulated[a] += face_normal;
        accumulated[b] += face_normal;
        accumulated[c] += face_normal;
    }

    accumulated
        .into_iter()
        .map(|n| n.normalize_or_zero().to_array())
        .collect()
}

// ============================================================================
// 动画
// ============================================================================

/// 单个目标节点上收集到的轨道
struct PendingChannel {
    node_name: String,
    bind_translation: Vec3,
    bind_rotation: Quat,
    bind_scale: Vec3,
    position_keys: Option<KeyframeTrack<Vec3>>,
    rotation_keys: Option<KeyframeTrack<Quat>>,
    scaling_keys: Option<KeyframeTrack<Vec3>>,
}

impl PendingChannel {
    fn new(node: &gltf::Node) -> Self {
        let (translation, rotation, scale) = node.transform().decomposed();
        Self {
            node_name: node_name(node),
            bind_translation: Vec3::from(translation),
            bind_rotation: Quat::from_array(rotation),
            bind_scale: Vec3::from(scale),
            position_keys: None,
            rotation_keys: None,
            scaling_keys: None,
        }
    }

    /// 缺失的轨道以绑定姿态分量的单个关键帧填充
    fn finish(self) -> AnimationChannel {
        AnimationChannel::new(
            self.node_name,
            non_empty_or(self.position_keys, self.bind_translation),
            non_empty_or(self.rotation_keys, self.bind_rotation),
            non_empty_or(self.scaling_keys, self.bind_scale),
        )
    }
}

fn non_empty_or<T: Interpolate>(track: Option<KeyframeTrack<T>>, bind: T) -> KeyframeTrack<T> {
    match track {
        Some(track) if !track.is_empty() => track,
        _ => KeyframeTrack::constant(bind),
    }
}

/// 组装关键帧轨道；三次样条只保留每组 (入切线, 值, 出切线) 中的值
fn build_track<T: Interpolate>(times: &[f32], values: Vec<T>, interpolation: Interpolation) -> KeyframeTrack<T> {
    let values: Vec<T> = match interpolation {
        Interpolation::CubicSpline => values.chunks_exact(3).map(|triplet| triplet[1]).collect(),
        _ => values,
    };

    KeyframeTrack::from_keyframes(
        times
            .iter()
            .zip(values)
            .map(|(&time, value)| Keyframe::new(time, value))
            .collect(),
    )
}

fn last_key_time<T>(track: &Option<KeyframeTrack<T>>) -> f32 {
    track
        .as_ref()
        .and_then(|t| t.keyframes.last())
        .map_or(0.0, |key| key.time)
}

fn import_animation(
    animation: &gltf::Animation,
    buffers: &[gltf::buffer::Data],
    config: &ImportConfig,
) -> AnimationClip {
    let name = animation
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("animation_{}", animation.index()));

    let mut pending: Vec<PendingChannel> = Vec::new();
    let mut by_node: HashMap<usize, usize> = HashMap::new();

    for channel in animation.channels() {
        let target = channel.target().node();
        let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));

        let (Some(inputs), Some(outputs)) = (reader.read_inputs(), reader.read_outputs()) else {
            tracing::warn!(
                target: "import",
                "Animation '{}' has a channel without sampler data on node {}",
                name,
                node_name(&target)
            );
            continue;
        };
        let times: Vec<f32> = inputs.map(|seconds| seconds * config.ticks_per_second).collect();
        let interpolation = channel.sampler().interpolation();

        let slot = *by_node.entry(target.index()).or_insert_with(|| {
            pending.push(PendingChannel::new(&target));
            pending.len() - 1
        });
        let entry = &mut pending[slot];

        match outputs {
            ReadOutputs::Translations(values) => {
                entry.position_keys = Some(build_track(&times, values.map(Vec3::from).collect(), interpolation));
            }
            ReadOutputs::Rotations(values) => {
                let values = values.into_f32().map(|r| Quat::from_array(r).normalize()).collect();
                entry.rotation_keys = Some(build_track(&times, values, interpolation));
            }
            ReadOutputs::Scales(values) => {
                entry.scaling_keys = Some(build_track(&times, values.map(Vec3::from).collect(), interpolation));
            }
            ReadOutputs::MorphTargetWeights(_) => {
                tracing::debug!(target: "import", "Skipping morph target weights in '{}'", name);
            }
        }
    }

    let duration = pending
        .iter()
        .flat_map(|channel| {
            [
                last_key_time(&channel.position_keys),
                last_key_time(&channel.rotation_keys),
                last_key_time(&channel.scaling_keys),
            ]
        })
        .fold(0.0f32, f32::max);

    let mut clip = AnimationClip::new(name, config.ticks_per_second, duration);
    for channel in pending {
        clip.add_channel(channel.finish());
    }

    tracing::debug!(
        target: "import",
        "Animation '{}': {} channels, {} ticks at {} ticks/s",
        clip.name,
        clip.channels.len(),
        clip.duration,
        clip.ticks_per_second
    );

    clip
}
