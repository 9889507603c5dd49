//! Lumen Core - render configuration and scene description.
//!
//! This crate provides:
//!
//! - **Configuration**: the `Config` record and its text file reader
//! - **Scene model**: `Scene`, `Material`, `Sphere`, `Cylinder`
//! - **Scene files**: line-based scene parsing with typed errors
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{load_config, load_scene};
//!
//! let config = load_config("config.txt")?;
//! let scene = load_scene("scene.txt")?;
//! println!("{} primitives", scene.primitive_count());
//! ```

pub mod config;
pub mod parser;
pub mod scene;
mod text;

// Re-export commonly used types
pub use config::{load_config, parse_config, Config, ConfigError, ConfigResult};
pub use parser::{load_scene, parse_scene, SceneError, SceneResult};
pub use scene::{Color, Cylinder, Material, MaterialKind, Scene, Sphere};
