//! 场景物体运动
//!
//! 以数据描述简单物体随时间变化的世界矩阵，构造时选定运动类型，求值时不做动态分派。

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// 运动描述
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum MotionProfile {
    /// 固定世界矩阵
    Static { world: Mat4 },

    /// 均匀缩放后绕 Y 轴自转
    Spin {
        scale: f32,
        /// 角速度 (rad/s)
        rate: f32,
    },

    /// 绕 Y 轴公转
    ///
    /// 依次应用：缩放、绕 Z 轴自转、平移（含 Y 方向正弦浮动）、绕 Y 轴公转。
    /// `scale_after_orbit` 为 true 时缩放改为最后应用。
    Orbit {
        scale: f32,
        spin_z_rate: f32,
        offset: Vec3,
        bob_amplitude: f32,
        bob_frequency: f32,
        orbit_rate: f32,
        scale_after_orbit: bool,
    },
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self::Static {
            world: Mat4::IDENTITY,
        }
    }
}

impl MotionProfile {
    /// 计算经过 `elapsed` 秒后的世界矩阵
    pub fn world_matrix(&self, elapsed: f32) -> Mat4 {
        match *self {
            Self::Static { world } => world,
            Self::Spin { scale, rate } => {
                Mat4::from_rotation_y(rate * elapsed) * Mat4::from_scale(Vec3::splat(scale))
            }
            Self::Orbit {
                scale,
                spin_z_rate,
                offset,
                bob_amplitude,
                bob_frequency,
                orbit_rate,
                scale_after_orbit,
            } => {
                let scaling = Mat4::from_scale(Vec3::splat(scale));
                let spin = Mat4::from_rotation_z(spin_z_rate * elapsed);
                let bob = Vec3::new(0.0, bob_amplitude * (bob_frequency * elapsed).sin(), 0.0);
                let translation = Mat4::from_translation(offset + bob);
                let orbit = Mat4::from_rotation_y(orbit_rate * elapsed);

                if scale_after_orbit {
                    scaling * orbit * translation * spin
                } else {
                    orbit * translation * spin * scaling
                }
            }
        }
    }

    fn orbit(scale: f32, offset: Vec3, orbit_rate: f32) -> Self {
        Self::Orbit {
            scale,
            spin_z_rate: 0.0,
            offset,
            bob_amplitude: 0.0,
            bob_frequency: 0.0,
            orbit_rate,
            scale_after_orbit: false,
        }
    }

    /// 中心自转（缩放 1）
    pub fn turntable() -> Self {
        Self::Spin {
            scale: 1.0,
            rate: 1.0,
        }
    }

    /// 缩小的中心自转体
    pub fn sun() -> Self {
        Self::Spin {
            scale: 0.7,
            rate: 1.0,
        }
    }

    /// 近距离快速公转
    pub fn orbiting_cube() -> Self {
        Self::orbit(0.4, Vec3::new(-2.0, 0.0, 0.0), -4.0)
    }

    /// 远距离公转
    pub fn earth() -> Self {
        Self::orbit(0.5, Vec3::new(-4.0, 0.0, 0.0), -2.0)
    }

    /// 自转并公转的小卫星
    pub fn moon() -> Self {
        Self::Orbit {
            scale: 0.3,
            spin_z_rate: -1.0,
            offset: Vec3::new(-4.0, 0.0, 0.0),
            bob_amplitude: 0.0,
            bob_frequency: 0.0,
            orbit_rate: -2.0,
            scale_after_orbit: false,
        }
    }

    /// 上下浮动的公转体，缩放在公转之后应用
    pub fn bobbing_cube() -> Self {
        Self::Orbit {
            scale: 0.6,
            spin_z_rate: 0.0,
            offset: Vec3::new(4.0, 0.0, 0.0),
            bob_amplitude: 1.0,
            bob_frequency: 10.0,
            orbit_rate: 2.0,
            scale_after_orbit: true,
        }
    }

    /// 高空远处的慢速公转
    pub fn sky_orbit() -> Self {
        Self::orbit(1.0, Vec3::new(0.0, 30.0, -50.0), -2.0)
    }
}

/// 带运动描述的场景物体
#[derive(Clone, Debug, Default)]
pub struct MovingObject {
    pub name: String,
    pub motion: MotionProfile,
    world: Mat4,
}

impl MovingObject {
    pub fn new(name: impl Into<String>, motion: MotionProfile) -> Self {
        Self {
            name: name.into(),
            motion,
            world: motion.world_matrix(0.0),
        }
    }

    /// 以累计秒数更新世界矩阵
    pub fn update(&mut self, elapsed: f32) {
        self.world = self.motion.world_matrix(elapsed);
    }

    pub fn world(&self) -> Mat4 {
        self.world
    }
}
