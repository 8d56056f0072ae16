use super::{ConfigError, ConfigResult};
use crate::animation::MAX_NUM_BONES;
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 动画配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// 动画片段未声明每秒 tick 数（为 0）时使用的默认值
    pub default_ticks_per_second: f32,

    /// 默认播放的动画片段索引
    pub active_clip: usize,

    /// 单个模型允许的最大骨骼数（不超过蒙皮常量缓冲区容量）
    pub max_bones: usize,

    /// 上传骨骼矩阵时的内存布局
    pub matrix_layout: MatrixLayout,
}

impl_default!(AnimationConfig {
    default_ticks_per_second: 25.0,
    active_clip: 0,
    max_bones: MAX_NUM_BONES,
    matrix_layout: MatrixLayout::ColumnMajor,
});

impl AnimationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_ticks_per_second <= 0.0 || !self.default_ticks_per_second.is_finite() {
            return Err(ConfigError::ValidationError(
                "default_ticks_per_second must be a positive finite number".to_string(),
            ));
        }
        if self.max_bones == 0 || self.max_bones > MAX_NUM_BONES {
            return Err(ConfigError::ValidationError(format!(
                "max_bones must be in 1..={}",
                MAX_NUM_BONES
            )));
        }
        Ok(())
    }
}

/// 骨骼矩阵内存布局
///
/// glam 的 `Mat4` 按列存储；着色器常量布局为行主序时需要转置后上传。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatrixLayout {
    /// 列主序（glam 原生布局）
    ColumnMajor,
    /// 行主序（上传前转置）
    RowMajor,
}
