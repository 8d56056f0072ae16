//! 层级姿态求值
//!
//! 每帧沿节点层级自顶向下合成全局变换，并为与骨骼同名的节点写入最终蒙皮矩阵：
//!
//! ```text
//! global = parent_global * local
//! final  = global_inverse_root * global * offset
//! ```

use glam::Mat4;

use super::clip::AnimationClip;
use super::hierarchy::{NodeHierarchy, NodeId};
use super::skeleton::BoneTable;

// ============================================================================
// 播放状态
// ============================================================================

/// 动画播放状态
///
/// 记录累计秒数与当前片段；tick 换算与循环由 [`AnimationClip::animation_time_ticks`] 完成。
#[derive(Clone, Debug, PartialEq)]
pub struct Animator {
    elapsed_seconds: f32,
    active_clip: usize,
    speed: f32,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Animator {
    pub fn new(active_clip: usize) -> Self {
        Self {
            elapsed_seconds: 0.0,
            active_clip,
            speed: 1.0,
        }
    }

    /// 推进时间
    pub fn advance(&mut self, delta_seconds: f32) {
        self.elapsed_seconds += delta_seconds * self.speed;
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed_seconds
    }

    pub fn reset(&mut self) {
        self.elapsed_seconds = 0.0;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// 设置播放速度倍率
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn active_clip(&self) -> usize {
        self.active_clip
    }

    /// 切换当前片段（不重置时间）
    pub fn set_active_clip(&mut self, index: usize) {
        self.active_clip = index;
    }

    /// 按名称切换片段，找不到时保持不变并返回 false
    pub fn select_clip_by_name(&mut self, clips: &[AnimationClip], name: &str) -> bool {
        match clips.iter().position(|clip| clip.name == name) {
            Some(index) => {
                self.active_clip = index;
                true
            }
            None => false,
        }
    }

    /// 当前片段（索引越界时为 None）
    pub fn current_clip<'a>(&self, clips: &'a [AnimationClip]) -> Option<&'a AnimationClip> {
        clips.get(self.active_clip)
    }

    /// 当前片段内的 tick 时间
    pub fn time_ticks(&self, clip: &AnimationClip, fallback_ticks_per_second: f32) -> f32 {
        clip.animation_time_ticks(self.elapsed_seconds, fallback_ticks_per_second)
    }
}

// ============================================================================
// 姿态求值器
// ============================================================================

/// 层级姿态求值器
#[derive(Clone, Debug)]
pub struct PoseEvaluator {
    global_inverse_transform: Mat4,
    node_globals: Vec<Mat4>,
}

impl PoseEvaluator {
    /// 以根节点绑定变换的逆作为全局逆变换
    pub fn new(hierarchy: &NodeHierarchy) -> Self {
        Self::with_global_inverse(hierarchy, hierarchy.root_node().transform.inverse())
    }

    pub fn with_global_inverse(hierarchy: &NodeHierarchy, global_inverse_transform: Mat4) -> Self {
        Self {
            global_inverse_transform,
            node_globals: vec![Mat4::IDENTITY; hierarchy.len()],
        }
    }

    pub fn global_inverse_transform(&self) -> Mat4 {
        self.global_inverse_transform
    }

    /// 最近一次求值得到的节点全局变换（按节点索引）
    pub fn node_globals(&self) -> &[Mat4] {
        &self.node_globals
    }

    /// 求值整棵层级
    ///
    /// `clip` 为 None 时所有节点使用绑定姿态。
    pub fn evaluate(
        &mut self,
        hierarchy: &NodeHierarchy,
        clip: Option<&AnimationClip>,
        time_ticks: f32,
        bones: &mut BoneTable,
    ) {
        if self.node_globals.len() != hierarchy.len() {
            self.node_globals.resize(hierarchy.len(), Mat4::IDENTITY);
        }
        self.read_node_hierarchy(hierarchy, clip, time_ticks, hierarchy.root(), Mat4::IDENTITY, bones);
    }

    fn read_node_hierarchy(
        &mut self,
        hierarchy: &NodeHierarchy,
        clip: Option<&AnimationClip>,
        time_ticks: f32,
        node_id: NodeId,
        parent_transform: Mat4,
        bones: &mut BoneTable,
    ) {
        let Some(node) = hierarchy.get(node_id) else {
            return;
        };

        let node_transform = match clip.and_then(|c| c.find_channel(&node.name)) {
            Some(channel) => channel.local_transform(time_ticks),
            None => node.transform,
        };

        let global_transform = parent_transform * node_transform;
        self.node_globals[node_id] = global_transform;

        if let Some(bone_index) = bones.index_of(&node.name) {
            let offset = bones.bones()[bone_index].offset_matrix;
            bones.set_final_transformation(
                bone_index,
                self.global_inverse_transform * global_transform * offset,
            );
        }

        for &child in &node.children {
            self.read_node_hierarchy(hierarchy, clip, time_ticks, child, global_transform, bones);
        }
    }
}
