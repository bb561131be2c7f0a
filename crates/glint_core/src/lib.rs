//! Glint Core - renderer-agnostic scene data.
//!
//! This crate provides:
//!
//! - **Surfaces**: `SurfaceKind` and `Surface`, the material description a
//!   primitive carries
//! - **Textures**: solid colors, decoded images and Perlin noise
//! - **Meshes**: shared vertex/index buffers for mesh instances
//! - **Errors**: `SceneError`, raised when scene data is malformed

pub mod error;
pub mod mesh;
pub mod perlin;
pub mod surface;
pub mod texture;

// Re-export commonly used types
pub use error::{SceneError, SceneResult};
pub use mesh::Mesh;
pub use perlin::Perlin;
pub use surface::{Surface, SurfaceKind};
pub use texture::{ImageTexture, NoiseTexture, Texture};
