//! Everything a render needs besides its settings.

use crate::camera::Camera;
use crate::primitive::Primitive;

/// A camera and the primitives it looks at.
#[derive(Debug, Clone)]
pub struct Scene {
    camera: Camera,
    primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            primitives: Vec::new(),
        }
    }

    /// Add a primitive.
    pub fn add(&mut self, primitive: impl Into<Primitive>) -> &mut Self {
        self.primitives.push(primitive.into());
        self
    }

    /// Builder-style `add`.
    pub fn with(mut self, primitive: impl Into<Primitive>) -> Self {
        self.add(primitive);
        self
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Get the number of primitives.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}
