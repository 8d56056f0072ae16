use super::keyframe::KeyframeTrack;
use glam::{Mat4, Quat, Vec3};

/// 节点动画通道
///
/// 位置、旋转、缩放三条独立轨道，每条至少包含一个关键帧。
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationChannel {
    /// 目标节点名称
    pub node_name: String,
    /// 位置轨道
    pub position_keys: KeyframeTrack<Vec3>,
    /// 旋转轨道
    pub rotation_keys: KeyframeTrack<Quat>,
    /// 缩放轨道
    pub scaling_keys: KeyframeTrack<Vec3>,
}

impl AnimationChannel {
    pub fn new(
        node_name: impl Into<String>,
        position_keys: KeyframeTrack<Vec3>,
        rotation_keys: KeyframeTrack<Quat>,
        scaling_keys: KeyframeTrack<Vec3>,
    ) -> Self {
        Self {
            node_name: node_name.into(),
            position_keys,
            rotation_keys,
            scaling_keys,
        }
    }

    /// 由静态 TRS 构造只有单个关键帧的通道
    pub fn constant(node_name: impl Into<String>, translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self::new(
            node_name,
            KeyframeTrack::constant(translation),
            KeyframeTrack::constant(rotation),
            KeyframeTrack::constant(scale),
        )
    }

    /// 计算指定时间的局部变换矩阵
    ///
    /// 先缩放，再旋转，最后平移。
    pub fn local_transform(&self, time_ticks: f32) -> Mat4 {
        let scaling = self.scaling_keys.sample(time_ticks);
        let rotation = self.rotation_keys.sample(time_ticks);
        let translation = self.position_keys.sample(time_ticks);

        Mat4::from_translation(translation)
            * Mat4::from_quat(rotation)
            * Mat4::from_scale(scaling)
    }
}

/// 动画片段
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    /// 动画名称
    pub name: String,
    /// 每秒 tick 数（0 表示未指定）
    pub ticks_per_second: f32,
    /// 持续时间 (tick)
    pub duration: f32,
    /// 节点通道
    pub channels: Vec<AnimationChannel>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, ticks_per_second: f32, duration: f32) -> Self {
        Self {
            name: name.into(),
            ticks_per_second,
            duration,
            channels: Vec::new(),
        }
    }

    /// 添加节点通道
    pub fn add_channel(&mut self, channel: AnimationChannel) {
        self.channels.push(channel);
    }

    /// 按节点名称查找通道（线性扫描）
    pub fn find_channel(&self, node_name: &str) -> Option<&AnimationChannel> {
        self.channels
            .iter()
            .find(|channel| channel.node_name == node_name)
    }

    /// 实际使用的每秒 tick 数
    pub fn effective_ticks_per_second(&self, fallback: f32) -> f32 {
        if self.ticks_per_second != 0.0 {
            self.ticks_per_second
        } else {
            fallback
        }
    }

    /// 将经过的秒数换算为循环内的 tick 时间
    ///
    /// 按持续时间取模，动画无限循环；负的经过时间（倒放）同样落在 `[0, duration)` 内。
    /// 持续时间非正时固定为 0。
    pub fn animation_time_ticks(&self, elapsed_seconds: f32, fallback_ticks_per_second: f32) -> f32 {
        if self.duration <= f32::EPSILON {
            return 0.0;
        }
        let time_in_ticks = elapsed_seconds * self.effective_ticks_per_second(fallback_ticks_per_second);
        let wrapped = time_in_ticks.rem_euclid(self.duration);
        // 极小的负值取模后可能舍入为 duration 本身
        if wrapped >= self.duration {
            0.0
        } else {
            wrapped
        }
    }
}
