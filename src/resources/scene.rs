//! 导入场景数据
//!
//! 与具体文件格式无关的中间表示：节点层级、网格、骨骼与动画。

use crate::animation::{AnimationClip, NodeHierarchy, SkinningData};

/// 网格顶点
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// 位置
    pub position: [f32; 3],
    /// 纹理坐标
    pub tex_coord: [f32; 2],
    /// 法线
    pub normal: [f32; 3],
}

/// 切线空间数据（缺失时为零）
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NormalData {
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

/// 子网格条目
///
/// 所有子网格共享同一顶点/索引缓冲区，条目记录各自的起始偏移。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshEntry {
    /// 顶点缓冲区中的起始顶点
    pub base_vertex: u32,
    /// 索引缓冲区中的起始索引
    pub base_index: u32,
    /// 索引数量
    pub num_indices: u32,
    /// 材质索引（无材质时为 None）
    pub material_index: Option<usize>,
}

/// 材质槽
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialSlot {
    pub name: String,
    /// 基础颜色纹理的 URI（内嵌纹理为 None）
    pub base_color_texture: Option<String>,
}

/// 导入后的场景
#[derive(Clone, Debug)]
pub struct ImportedScene {
    pub hierarchy: NodeHierarchy,
    pub meshes: Vec<MeshEntry>,
    pub vertices: Vec<Vertex>,
    pub normal_data: Vec<NormalData>,
    pub indices: Vec<u32>,
    pub skinning: SkinningData,
    pub animations: Vec<AnimationClip>,
    pub materials: Vec<MaterialSlot>,
}

impl ImportedScene {
    /// 只有根节点、没有几何体的空场景
    pub fn empty(hierarchy: NodeHierarchy) -> Self {
        Self {
            hierarchy,
            meshes: Vec::new(),
            vertices: Vec::new(),
            normal_data: Vec::new(),
            indices: Vec::new(),
            skinning: SkinningData::new(),
            animations: Vec::new(),
            materials: Vec::new(),
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_indices(&self) -> usize {
        self.indices.len()
    }

    pub fn has_animations(&self) -> bool {
        !self.animations.is_empty()
    }
}
