//! 核心模块
//!
//! 包含引擎的基础设施：
//! - `error` - 错误类型定义
//! - `logging` - 日志系统初始化
//! - `macros` - 通用宏

pub mod error;
pub mod logging;
pub mod macros;

// 重新导出错误类型
pub use error::{AssetError, AssetResult, EngineError, EngineResult};
pub use logging::init_logging;
