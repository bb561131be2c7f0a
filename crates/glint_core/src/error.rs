//! Errors raised while assembling a scene.

use thiserror::Error;

/// Everything that can be wrong with scene data.
///
/// These are data errors: they abort construction of the offending object
/// and never occur once rendering has started.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Invalid surface kind: {0:?}")]
    InvalidSurfaceKind(String),

    #[error("Invalid surface: {0}")]
    InvalidSurface(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("Invalid camera: {0}")]
    InvalidCamera(String),

    #[error("Invalid texture: {0}")]
    InvalidTexture(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("OBJ loading error: {0}")]
    ObjError(#[from] tobj::LoadError),
}

pub type SceneResult<T> = Result<T, SceneError>;
