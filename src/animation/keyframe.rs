use glam::{Quat, Vec3};

/// 关键帧
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T> {
    /// 时间 (tick)
    pub time: f32,
    /// 值
    pub value: T,
}

impl<T> Keyframe<T> {
    pub fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

/// 可在两个关键帧之间插值的值类型
pub trait Interpolate: Copy {
    fn interpolate(&self, other: &Self, factor: f32) -> Self;
}

impl Interpolate for Vec3 {
    /// 线性插值
    fn interpolate(&self, other: &Self, factor: f32) -> Self {
        self.lerp(*other, factor)
    }
}

impl Interpolate for Quat {
    /// 球面线性插值
    fn interpolate(&self, other: &Self, factor: f32) -> Self {
        self.slerp(*other, factor)
    }
}

/// 关键帧轨道
///
/// 关键帧按时间升序排列（由导入方保证，不做校验）。
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeTrack<T> {
    /// 关键帧列表
    pub keyframes: Vec<Keyframe<T>>,
}

impl<T> Default for KeyframeTrack<T> {
    fn default() -> Self {
        Self {
            keyframes: Vec::new(),
        }
    }
}

impl<T: Interpolate> KeyframeTrack<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 只含一个关键帧的轨道
    pub fn constant(value: T) -> Self {
        Self {
            keyframes: vec![Keyframe::new(0.0, value)],
        }
    }

    pub fn from_keyframes(keyframes: Vec<Keyframe<T>>) -> Self {
        Self { keyframes }
    }

    /// 追加关键帧
    pub fn add_keyframe(&mut self, time: f32, value: T) {
        self.keyframes.push(Keyframe::new(time, value));
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// 查找区间起点索引
    ///
    /// 返回第一个满足 `keyframes[i + 1].time > time` 的 `i`。
    /// 查询时间超过所有关键帧时回退到 0，而不是最后一个区间。
    pub fn find_key_index(&self, time: f32) -> usize {
        assert!(!self.keyframes.is_empty(), "keyframe track must not be empty");
        self.keyframes
            .windows(2)
            .position(|pair| time < pair[1].time)
            .unwrap_or(0)
    }

    /// 采样指定时间的值
    ///
    /// # Panics
    ///
    /// 轨道为空时 panic。
    pub fn sample(&self, time: f32) -> T {
        assert!(!self.keyframes.is_empty(), "keyframe track must not be empty");
        if self.keyframes.len() == 1 {
            return self.keyframes[0].value;
        }

        let index = self.find_key_index(time);
        let start = &self.keyframes[index];
        let end = &self.keyframes[index + 1];

        let delta_time = end.time - start.time;
        let factor = (time - start.time) / delta_time;
        debug_assert!(
            (0.0..=1.0).contains(&factor),
            "interpolation factor {} out of range at time {}",
            factor,
            time
        );

        start.value.interpolate(&end.value, factor)
    }
}
