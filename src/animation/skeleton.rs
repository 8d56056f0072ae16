//! 骨骼数据结构
//!
//! 导入期构建的骨骼名称表与逐顶点骨骼影响。

use std::collections::HashMap;

use glam::Mat4;

use super::skinned_mesh::AnimationData;
use super::MAX_BONES_PER_VERTEX;
use crate::impl_default_and_new;

// ============================================================================
// 骨骼
// ============================================================================

/// 骨骼
#[derive(Clone, Debug, PartialEq)]
pub struct Bone {
    /// 骨骼名称（与场景节点名称一致）
    pub name: String,
    /// 偏移矩阵（将顶点从模型空间变换到骨骼空间）
    pub offset_matrix: Mat4,
    /// 最终蒙皮矩阵（每帧更新）
    pub final_transformation: Mat4,
}

impl Bone {
    pub fn new(name: impl Into<String>, offset_matrix: Mat4) -> Self {
        Self {
            name: name.into(),
            offset_matrix,
            final_transformation: Mat4::IDENTITY,
        }
    }
}

// ============================================================================
// 骨骼表
// ============================================================================

/// 骨骼名称表
///
/// 索引按首次注册顺序分配，从 0 连续递增。
#[derive(Clone, Debug, Default)]
pub struct BoneTable {
    bones: Vec<Bone>,
    name_to_index: HashMap<String, usize>,
}

impl BoneTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册骨骼并返回索引
    ///
    /// 同名骨骼重复注册时返回已有索引，不覆盖已记录的偏移矩阵。
    pub fn register_bone(&mut self, name: &str, offset_matrix: Mat4) -> usize {
        if let Some(&index) = self.name_to_index.get(name) {
            return index;
        }

        let index = self.bones.len();
        self.bones.push(Bone::new(name, offset_matrix));
        self.name_to_index.insert(name.to_string(), index);
        index
    }

    /// 通过名称获取骨骼索引
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn get(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    /// 设置骨骼最终矩阵
    pub fn set_final_transformation(&mut self, index: usize, transform: Mat4) {
        if let Some(bone) = self.bones.get_mut(index) {
            bone.final_transformation = transform;
        }
    }

    /// 所有骨骼的最终矩阵（按索引排列）
    pub fn final_transforms(&self) -> Vec<Mat4> {
        self.bones.iter().map(|b| b.final_transformation).collect()
    }

    pub fn name_to_index(&self) -> &HashMap<String, usize> {
        &self.name_to_index
    }
}

// ============================================================================
// 顶点骨骼影响
// ============================================================================

/// 单个顶点的骨骼影响
///
/// 槽位按添加顺序填充，超出容量的影响被丢弃并计数。权重不做归一化。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexBoneData {
    pub bone_ids: [u32; MAX_BONES_PER_VERTEX],
    pub weights: [f32; MAX_BONES_PER_VERTEX],
    len: usize,
    dropped: usize,
}

impl_default_and_new!(VertexBoneData {
    bone_ids: [0; MAX_BONES_PER_VERTEX],
    weights: [0.0; MAX_BONES_PER_VERTEX],
    len: 0,
    dropped: 0,
});

impl VertexBoneData {
    /// 添加骨骼影响；槽位已满时忽略
    pub fn add_bone_data(&mut self, bone_index: u32, weight: f32) {
        if self.len < MAX_BONES_PER_VERTEX {
            self.bone_ids[self.len] = bone_index;
            self.weights[self.len] = weight;
            self.len += 1;
        } else {
            self.dropped += 1;
        }
    }

    /// 已填充的槽位数
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 因容量不足被丢弃的影响数
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// 已填充的 (骨骼索引, 权重) 对
    pub fn influences(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.bone_ids[..self.len]
            .iter()
            .copied()
            .zip(self.weights[..self.len].iter().copied())
    }

    /// 打包前四个槽位用于 GPU 顶点流
    pub fn to_gpu(&self) -> AnimationData {
        let mut data = AnimationData::default();
        data.bone_indices.copy_from_slice(&self.bone_ids[..4]);
        data.bone_weights.copy_from_slice(&self.weights[..4]);
        data
    }
}

// ============================================================================
// 蒙皮数据
// ============================================================================

/// 整个模型的蒙皮数据：骨骼表加上按全局顶点索引排列的骨骼影响
#[derive(Clone, Debug, Default)]
pub struct SkinningData {
    pub bones: BoneTable,
    pub vertex_bones: Vec<VertexBoneData>,
}

impl SkinningData {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为指定顶点数预分配影响槽
    pub fn with_vertex_count(vertex_count: usize) -> Self {
        Self {
            bones: BoneTable::new(),
            vertex_bones: vec![VertexBoneData::default(); vertex_count],
        }
    }

    /// 扩展影响槽以容纳新增顶点
    pub fn resize_vertices(&mut self, vertex_count: usize) {
        self.vertex_bones
            .resize(vertex_count, VertexBoneData::default());
    }

    /// 为全局顶点添加骨骼影响
    ///
    /// # Panics
    ///
    /// 顶点索引越界时 panic。
    pub fn add_vertex_bone_influence(&mut self, global_vertex: usize, bone_index: usize, weight: f32) {
        self.vertex_bones[global_vertex].add_bone_data(bone_index as u32, weight);
    }

    /// 所有顶点被丢弃的影响总数
    pub fn dropped_influences(&self) -> usize {
        self.vertex_bones.iter().map(VertexBoneData::dropped).sum()
    }

    /// 报告容量溢出（每次加载一次）
    pub fn log_overflow(&self) {
        let dropped = self.dropped_influences();
        if dropped > 0 {
            tracing::debug!(
                target: "animation",
                "Dropped {} bone influences beyond {} per vertex",
                dropped,
                MAX_BONES_PER_VERTEX
            );
        }
    }

    /// 生成 GPU 顶点动画数据流
    pub fn animation_data(&self) -> Vec<AnimationData> {
        self.vertex_bones.iter().map(VertexBoneData::to_gpu).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_register_bone_is_idempotent() {
        let mut table = BoneTable::new();
        let offset = Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0));

        let first = table.register_bone("spine", offset);
        let second = table.register_bone("spine", Mat4::IDENTITY);

        assert_eq!(first, second);
        assert_eq!(table.len(), 1);
        // 重复注册不覆盖偏移矩阵
        assert_eq!(table.get(first).unwrap().offset_matrix, offset);
    }

    #[test]
    fn test_indices_follow_insertion_order() {
        let mut table = BoneTable::new();
        assert_eq!(table.register_bone("hips", Mat4::IDENTITY), 0);
        assert_eq!(table.register_bone("spine", Mat4::IDENTITY), 1);
        assert_eq!(table.register_bone("hips", Mat4::IDENTITY), 0);
        assert_eq!(table.register_bone("head", Mat4::IDENTITY), 2);
        assert_eq!(table.index_of("head"), Some(2));
        assert_eq!(table.index_of("tail"), None);
    }

    #[test]
    fn test_vertex_keeps_first_sixteen_influences() {
        let mut data = VertexBoneData::new();
        for i in 0..20u32 {
            data.add_bone_data(i, 0.05);
        }

        assert_eq!(data.len(), MAX_BONES_PER_VERTEX);
        assert_eq!(data.dropped(), 4);
        let kept: Vec<u32> = data.influences().map(|(id, _)| id).collect();
        assert_eq!(kept, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_weights_are_not_normalized() {
        let mut data = VertexBoneData::new();
        data.add_bone_data(3, 0.7);
        data.add_bone_data(5, 0.7);

        let sum: f32 = data.influences().map(|(_, w)| w).sum();
        assert!((sum - 1.4).abs() < 1e-6);
    }

    #[test]
    fn test_to_gpu_packs_first_four_slots() {
        let mut data = VertexBoneData::new();
        for i in 0..6u32 {
            data.add_bone_data(i + 10, 0.1 * (i + 1) as f32);
        }

        let gpu = data.to_gpu();
        assert_eq!(gpu.bone_indices, [10, 11, 12, 13]);
        assert!((gpu.bone_weights[3] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_skinning_data_routes_to_global_vertex() {
        let mut skinning = SkinningData::with_vertex_count(3);
        let bone = skinning.bones.register_bone("arm", Mat4::IDENTITY);
        skinning.add_vertex_bone_influence(2, bone, 1.0);

        assert!(skinning.vertex_bones[0].is_empty());
        assert_eq!(skinning.vertex_bones[2].len(), 1);
        assert_eq!(skinning.dropped_influences(), 0);
        assert_eq!(skinning.animation_data().len(), 3);
    }
}
