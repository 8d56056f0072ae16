//! 骨骼动画模块
//!
//! 提供关键帧插值、动画片段、骨骼表与层级姿态求值。
//!
//! ## 功能特性
//!
//! - 关键帧轨道（位置/缩放线性插值，旋转球面插值）
//! - 按节点名称组织的动画通道
//! - 骨骼名称表与逐顶点骨骼影响（每顶点最多 16 个）
//! - 沿节点层级递归合成最终骨骼矩阵
//!
//! ## 使用示例
//!
//! ```rust
//! use skinned_model::animation::{
//!     AnimationChannel, AnimationClip, BoneTable, NodeHierarchy, PoseEvaluator,
//! };
//! use glam::{Mat4, Quat, Vec3};
//!
//! let mut hierarchy = NodeHierarchy::new("root", Mat4::IDENTITY);
//! hierarchy.add_child(0, "hips", Mat4::IDENTITY);
//!
//! let mut bones = BoneTable::new();
//! bones.register_bone("hips", Mat4::IDENTITY);
//!
//! let mut clip = AnimationClip::new("idle", 25.0, 10.0);
//! clip.add_channel(AnimationChannel::constant(
//!     "hips",
//!     Vec3::new(0.0, 1.0, 0.0),
//!     Quat::IDENTITY,
//!     Vec3::ONE,
//! ));
//!
//! let mut evaluator = PoseEvaluator::new(&hierarchy);
//! evaluator.evaluate(&hierarchy, Some(&clip), 0.0, &mut bones);
//! assert_eq!(bones.final_transforms()[0], Mat4::from_translation(Vec3::Y));
//! ```

pub mod clip;
pub mod evaluator;
pub mod hierarchy;
pub mod keyframe;
pub mod skeleton;
pub mod skinned_mesh;

pub use clip::{AnimationChannel, AnimationClip};
pub use evaluator::{Animator, PoseEvaluator};
pub use hierarchy::{NodeHierarchy, NodeId, SceneNode};
pub use keyframe::{Interpolate, Keyframe, KeyframeTrack};
pub use skeleton::{Bone, BoneTable, SkinningData, VertexBoneData};
pub use skinned_mesh::{AnimationData, SkinningUniform};

/// 蒙皮常量缓冲区可容纳的最大骨骼数
pub const MAX_NUM_BONES: usize = 256;

/// 每个顶点记录的最大骨骼影响数
pub const MAX_BONES_PER_VERTEX: usize = 16;
