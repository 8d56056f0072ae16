use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 模型导入配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// 导入动画时使用的每秒 tick 数
    ///
    /// glTF 关键帧时间以秒为单位，导入时乘以该值转换为 tick。
    pub ticks_per_second: f32,

    /// 翻转纹理 V 坐标
    pub flip_uvs: bool,

    /// 翻转三角形环绕顺序
    pub flip_winding_order: bool,

    /// 缺失法线时生成平滑法线
    pub generate_smooth_normals: bool,
}

impl_default!(ImportConfig {
    ticks_per_second: 1000.0,
    flip_uvs: false,
    flip_winding_order: false,
    generate_smooth_normals: true,
});

impl ImportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 左手坐标系导入预设（翻转 UV 与环绕顺序）
    pub fn left_handed() -> Self {
        Self {
            flip_uvs: true,
            flip_winding_order: true,
            ..Self::default()
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.ticks_per_second <= 0.0 || !self.ticks_per_second.is_finite() {
            return Err(ConfigError::ValidationError(
                "import ticks_per_second must be a positive finite number".to_string(),
            ));
        }
        Ok(())
    }
}
