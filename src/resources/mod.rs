//! 资源导入模块
//!
//! - `scene` - 与文件格式无关的导入结果
//! - `gltf_import` - glTF/GLB 导入（需要启用 `gltf` feature）

use std::path::Path;

use crate::config::ImportConfig;
use crate::core::AssetResult;

#[cfg(feature = "gltf")]
pub mod gltf_import;
pub mod scene;

pub use scene::{ImportedScene, MaterialSlot, MeshEntry, NormalData, Vertex};

/// 导入场景文件
pub fn import_scene<P: AsRef<Path>>(path: P, config: &ImportConfig) -> AssetResult<ImportedScene> {
    #[cfg(feature = "gltf")]
    {
        gltf_import::import_scene(path, config)
    }

    #[cfg(not(feature = "gltf"))]
    {
        let _ = config;
        Err(crate::core::AssetError::ImporterUnavailable(format!(
            "cannot import {}: built without the `gltf` feature",
            path.as_ref().display()
        )))
    }
}
