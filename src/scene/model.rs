//! 蒙皮模型
//!
//! 串联导入、蒙皮数据与每帧姿态求值。

use std::collections::HashMap;
use std::path::Path;

use glam::Mat4;

use crate::animation::{
    AnimationClip, AnimationData, Animator, NodeHierarchy, PoseEvaluator, SkinningUniform,
    MAX_NUM_BONES,
};
use crate::config::{AnimationConfig, EngineConfig};
use crate::core::{AssetError, EngineResult};
use crate::resources::{self, ImportedScene, MaterialSlot, MeshEntry, NormalData, Vertex};

/// 已加载的蒙皮模型
#[derive(Clone, Debug)]
pub struct Model {
    scene: ImportedScene,
    evaluator: PoseEvaluator,
    animator: Animator,
    config: AnimationConfig,
    bone_transforms: Vec<Mat4>,
    animation_data: Vec<AnimationData>,
}

impl Model {
    /// 从文件加载模型
    pub fn load<P: AsRef<Path>>(path: P, config: &EngineConfig) -> EngineResult<Self> {
        let path = path.as_ref();
        let scene = resources::import_scene(path, &config.import)?;
        let model = Self::from_imported(scene, &config.animation)?;

        tracing::info!(
            target: "model",
            "Loaded model {}: {} meshes, {} bones, {} animations",
            path.display(),
            model.meshes().len(),
            model.num_bones(),
            model.animations().len()
        );

        Ok(model)
    }

    /// 由导入结果构建模型
    ///
    /// 骨骼数超过 `config.max_bones`（上限 [`MAX_NUM_BONES`]）时返回 [`AssetError::TooManyBones`]。
    pub fn from_imported(scene: ImportedScene, config: &AnimationConfig) -> EngineResult<Self> {
        let bone_count = scene.skinning.bones.len();
        let max_bones = config.max_bones.min(MAX_NUM_BONES);
        if bone_count > max_bones {
            return Err(AssetError::TooManyBones {
                count: bone_count,
                max: max_bones,
            }
            .into());
        }

        let mut active_clip = config.active_clip;
        if !scene.animations.is_empty() && active_clip >= scene.animations.len() {
            tracing::warn!(
                target: "model",
                "Active clip {} out of range ({} animations), using clip 0",
                active_clip,
                scene.animations.len()
            );
            active_clip = 0;
        }

        let evaluator = PoseEvaluator::new(&scene.hierarchy);
        let animation_data = scene.skinning.animation_data();

        Ok(Self {
            evaluator,
            animator: Animator::new(active_clip),
            config: config.clone(),
            bone_transforms: vec![Mat4::IDENTITY; bone_count],
            animation_data,
            scene,
        })
    }

    /// 推进时间并重新求值骨骼矩阵
    ///
    /// 没有动画的模型不做任何求值。
    pub fn update(&mut self, delta_seconds: f32) {
        if self.scene.animations.is_empty() {
            return;
        }

        self.animator.advance(delta_seconds);

        let Some(clip) = self.animator.current_clip(&self.scene.animations) else {
            return;
        };
        let time_ticks = self
            .animator
            .time_ticks(clip, self.config.default_ticks_per_second);

        self.evaluator.evaluate(
            &self.scene.hierarchy,
            Some(clip),
            time_ticks,
            &mut self.scene.skinning.bones,
        );

        for (slot, bone) in self
            .bone_transforms
            .iter_mut()
            .zip(self.scene.skinning.bones.bones())
        {
            *slot = bone.final_transformation;
        }
    }

    /// 按索引切换动画，越界时返回 false
    pub fn set_active_animation(&mut self, index: usize) -> bool {
        if index >= self.scene.animations.len() {
            return false;
        }
        self.animator.set_active_clip(index);
        true
    }

    /// 按名称切换动画
    pub fn set_active_animation_by_name(&mut self, name: &str) -> bool {
        self.animator
            .select_clip_by_name(&self.scene.animations, name)
    }

    pub fn active_animation(&self) -> Option<&AnimationClip> {
        self.animator.current_clip(&self.scene.animations)
    }

    pub fn set_playback_speed(&mut self, speed: f32) {
        self.animator.set_speed(speed);
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.animator.elapsed_seconds()
    }

    /// 骨骼最终矩阵（按骨骼索引）
    pub fn bone_transforms(&self) -> &[Mat4] {
        &self.bone_transforms
    }

    /// 按配置的内存布局打包骨骼矩阵
    pub fn skinning_uniform(&self) -> SkinningUniform {
        SkinningUniform::from_transforms(&self.bone_transforms, self.config.matrix_layout)
    }

    /// 顶点动画数据流
    pub fn animation_data(&self) -> &[AnimationData] {
        &self.animation_data
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.scene.vertices
    }

    pub fn normal_data(&self) -> &[NormalData] {
        &self.scene.normal_data
    }

    pub fn indices(&self) -> &[u32] {
        &self.scene.indices
    }

    pub fn meshes(&self) -> &[MeshEntry] {
        &self.scene.meshes
    }

    pub fn materials(&self) -> &[MaterialSlot] {
        &self.scene.materials
    }

    pub fn animations(&self) -> &[AnimationClip] {
        &self.scene.animations
    }

    pub fn hierarchy(&self) -> &NodeHierarchy {
        &self.scene.hierarchy
    }

    /// 最近一次求值得到的节点全局变换
    pub fn node_globals(&self) -> &[Mat4] {
        self.evaluator.node_globals()
    }

    pub fn num_vertices(&self) -> usize {
        self.scene.num_vertices()
    }

    pub fn num_indices(&self) -> usize {
        self.scene.num_indices()
    }

    pub fn num_bones(&self) -> usize {
        self.scene.skinning.bones.len()
    }

    pub fn bone_name_to_index(&self) -> &HashMap<String, usize> {
        self.scene.skinning.bones.name_to_index()
    }
}
