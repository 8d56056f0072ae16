//! 统一配置系统
//!
//! 提供TOML/JSON配置文件与环境变量覆盖

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod animation;
pub mod import;

pub use animation::{AnimationConfig, MatrixLayout};
pub use import::ImportConfig;

/// 引擎配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 引擎主配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 动画配置
    #[serde(default)]
    pub animation: AnimationConfig,

    /// 模型导入配置
    #[serde(default)]
    pub import: ImportConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 保存为JSON文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        // 动画配置
        if let Ok(val) = env::var("SKINNED_MODEL_DEFAULT_TICKS_PER_SECOND") {
            if let Ok(tps) = val.parse() {
                self.animation.default_ticks_per_second = tps;
            }
        }
        if let Ok(val) = env::var("SKINNED_MODEL_ACTIVE_CLIP") {
            if let Ok(clip) = val.parse() {
                self.animation.active_clip = clip;
            }
        }
        if let Ok(val) = env::var("SKINNED_MODEL_MATRIX_LAYOUT") {
            match val.to_ascii_lowercase().as_str() {
                "column_major" => self.animation.matrix_layout = MatrixLayout::ColumnMajor,
                "row_major" => self.animation.matrix_layout = MatrixLayout::RowMajor,
                _ => {}
            }
        }

        // 导入配置
        if let Ok(val) = env::var("SKINNED_MODEL_IMPORT_FLIP_UVS") {
            self.import.flip_uvs = val.parse().unwrap_or(self.import.flip_uvs);
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.animation.validate()?;
        self.import.validate()?;
        Ok(())
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./skinned_model.toml
    /// 2. ./skinned_model.json
    /// 3. ~/.config/skinned_model/config.toml
    /// 4. 使用默认配置
    pub fn load_or_default() -> Self {
        // 尝试当前目录的TOML
        if let Ok(config) = Self::from_toml_file("skinned_model.toml") {
            tracing::info!(target: "config", "Loaded config from skinned_model.toml");
            return config;
        }

        // 尝试当前目录的JSON
        if let Ok(config) = Self::from_json_file("skinned_model.json") {
            tracing::info!(target: "config", "Loaded config from skinned_model.json");
            return config;
        }

        // 尝试用户配置目录
        if let Some(home) = env::var_os("HOME") {
            let config_path = PathBuf::from(home)
                .join(".config")
                .join("skinned_model")
                .join("config.toml");

            if let Ok(config) = Self::from_toml_file(&config_path) {
                tracing::info!(target: "config", "Loaded config from {:?}", config_path);
                return config;
            }
        }

        tracing::info!(target: "config", "Using default configuration");
        Self::default()
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,

    /// 是否输出到文件
    pub log_to_file: bool,

    /// 日志文件路径
    pub log_file_path: String,

    /// 是否输出到控制台
    pub log_to_console: bool,
}

use crate::impl_default;

impl_default!(LoggingConfig {
    level: LogLevel::Info,
    log_to_file: false,
    log_file_path: "skinned_model.log".to_string(),
    log_to_console: true,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}
