//! 蒙皮 GPU 数据布局
//!
//! 顶点动画数据流与骨骼矩阵常量缓冲区。

use glam::Mat4;

use super::MAX_NUM_BONES;
use crate::config::MatrixLayout;

/// 顶点动画数据（最多 4 个骨骼影响）
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AnimationData {
    /// 骨骼索引
    pub bone_indices: [u32; 4],
    /// 骨骼权重
    pub bone_weights: [f32; 4],
}

/// 骨骼矩阵常量缓冲区
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkinningUniform {
    pub bone_transforms: [[[f32; 4]; 4]; MAX_NUM_BONES],
}

impl Default for SkinningUniform {
    fn default() -> Self {
        bytemuck::Zeroable::zeroed()
    }
}

impl SkinningUniform {
    /// 从骨骼最终矩阵构建
    ///
    /// 超出 `MAX_NUM_BONES` 的矩阵被截断，剩余槽位保持为零。
    pub fn from_transforms(transforms: &[Mat4], layout: MatrixLayout) -> Self {
        let mut uniform = Self::default();
        for (slot, transform) in uniform.bone_transforms.iter_mut().zip(transforms) {
            *slot = match layout {
                MatrixLayout::ColumnMajor => transform.to_cols_array_2d(),
                MatrixLayout::RowMajor => transform.transpose().to_cols_array_2d(),
            };
        }
        uniform
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
