//! # Skinned Model
//!
//! Skeletal animation core of an instructional real-time renderer.
//!
//! ## Features
//!
//! - **Scene import**: glTF scenes converted into neutral node, mesh, bone and animation records
//! - **Skinning data**: bone name table, per-vertex bone influences (up to 16 per vertex)
//! - **Animation evaluation**: keyframe interpolation and hierarchical bone transform composition
//! - **Motion profiles**: data-driven world transforms for simple scene objects
//!
//! ## Pipeline
//!
//! ```text
//! resources::gltf_import  ->  animation::skeleton  ->  animation::evaluator
//!      (load time)              (load time)              (every frame)
//! ```
//!
//! ### Example
//!
//! ```ignore
//! use skinned_model::{config::EngineConfig, scene::Model};
//!
//! let config = EngineConfig::load_or_default();
//! let mut model = Model::load("assets/character.glb", &config)?;
//! model.update(1.0 / 60.0);
//! let uniform = model.skinning_uniform();
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Error types, logging and shared macros
//! - [`config`]: Configuration system
//! - [`animation`]: Keyframes, clips, bone tables and hierarchy evaluation
//! - [`resources`]: Scene import
//! - [`scene`]: Loaded models and motion profiles

/// Error types, logging setup and shared macros
pub mod core;
/// Configuration system
pub mod config;
/// Skeletal animation: keyframes, clips, skinning data and evaluation
pub mod animation;
/// Scene import and imported data records
pub mod resources;
/// Loaded models and scene object motion
pub mod scene;

pub use crate::core::{AssetError, AssetResult, EngineError, EngineResult};
pub use scene::Model;
