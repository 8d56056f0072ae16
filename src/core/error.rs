//! 统一错误处理模块
//!
//! 提供引擎范围内的统一错误类型定义
//!
//! ## 错误分类
//!
//! - **资源导入错误** (`AssetError`): 模型文件缺失、解析失败、格式不支持
//! - **配置错误** (`config::ConfigError`): 配置文件读取、解析、验证失败
//!
//! 骨骼影响数超出上限不是错误（静默截断），
//! 空关键帧轨道属于调用约定违背（断言），均不在此列。

use crate::config::ConfigError;
use thiserror::Error;

/// 引擎核心错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("General error: {0}")]
    General(String),
}

/// 资源导入错误
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Asset not found: {path}")]
    NotFound { path: String },

    #[error("Failed to load asset: {path}, reason: {reason}")]
    LoadFailed { path: String, reason: String },

    #[error("Invalid asset format: {path}, expected: {expected}")]
    InvalidFormat { path: String, expected: String },

    #[error("Too many bones: {count} (max {max})")]
    TooManyBones { count: usize, max: usize },

    #[error("Asset importer unavailable: {0}")]
    ImporterUnavailable(String),
}

/// 引擎结果类型别名
pub type EngineResult<T> = Result<T, EngineError>;
pub type AssetResult<T> = Result<T, AssetError>;
