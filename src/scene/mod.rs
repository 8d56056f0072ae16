//! 场景模块
//!
//! - `model` - 已加载的蒙皮模型与每帧更新
//! - `motion` - 简单场景物体的运动描述

pub mod model;
pub mod motion;

pub use model::Model;
pub use motion::{MotionProfile, MovingObject};
