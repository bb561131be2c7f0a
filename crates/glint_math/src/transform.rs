// Model transform for mesh instances.
//
// Applied with discrete operations (change of basis, scale, translation)
// instead of a homogeneous matrix; front and top are expected to be orthogonal.

use crate::{Vec3, NEAR_ZERO};

/// Places a mesh instance in the world.
///
/// A vertex `v` maps to `origin + scale * (v.right, v.top, v.front)`, where each
/// coordinate is the projection of `v` onto that basis vector divided by the
/// basis vector's squared length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    pub origin: Vec3,
    pub front: Vec3,
    pub top: Vec3,
    /// Derived: `(-front) x top`.
    pub right: Vec3,
    /// Per-axis scale applied in (right, top, front) order.
    pub scale: Vec3,
}

impl ModelTransform {
    /// Build a transform; `right` is derived from `front` and `top`.
    pub fn new(origin: Vec3, front: Vec3, top: Vec3, scale: Vec3) -> Self {
        Self {
            origin,
            front,
            top,
            right: (-front).cross(top),
            scale,
        }
    }

    /// The transform that leaves every point where it is.
    pub fn identity() -> Self {
        Self::new(Vec3::ZERO, Vec3::Z, Vec3::Y, Vec3::ONE)
    }

    /// A basis vector of zero length would divide by zero in `apply`.
    pub fn is_valid(&self) -> bool {
        let finite = self.origin.is_finite()
            && self.front.is_finite()
            && self.top.is_finite()
            && self.scale.is_finite();
        finite
            && self.right.length_squared() > NEAR_ZERO
            && self.top.length_squared() > NEAR_ZERO
            && self.front.length_squared() > NEAR_ZERO
    }

    /// Transform a point from mesh space into world space.
    pub fn apply(&self, p: Vec3) -> Vec3 {
        let local = Vec3::new(
            p.dot(self.right) / self.right.length_squared(),
            p.dot(self.top) / self.top.length_squared(),
            p.dot(self.front) / self.front.length_squared(),
        );
        local * self.scale + self.origin
    }
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self::identity()
    }
}
