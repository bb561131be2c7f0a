//! Hittable trait and HitRecord for ray-object intersection.

use glint_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Smallest accepted hit distance. Keeps a bounced ray from hitting the
/// surface it just left.
pub const T_MIN: f64 = 1e-6;

/// The full forward range of a ray, starting past the self-intersection epsilon.
pub fn forward() -> Interval {
    Interval::new(T_MIN, f64::INFINITY)
}

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// UV texture coordinates
    pub u: f64,
    pub v: f64,
}

impl HitRecord {
    /// Build a record at `t`, orienting `outward_normal` against the ray.
    pub fn new(ray: &Ray, t: f64, outward_normal: Vec3, (u, v): (f64, f64)) -> Self {
        let mut rec = Self {
            t,
            p: ray.at(t),
            normal: outward_normal,
            front_face: true,
            u,
            v,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `t` strictly inside `ray_t`.
    ///
    /// Participating media consume randomness, hence the generator.
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord>;

    /// Get the axis-aligned bounding box of this object (padded).
    fn bounding_box(&self) -> Aabb;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_normal_orientation() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);

        // Outward normal facing the ray: front face
        let rec = HitRecord::new(&ray, 4.0, Vec3::Z, (0.0, 0.0));
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
        assert_eq!(rec.p, Vec3::new(0.0, 0.0, 1.0));

        // Outward normal facing away: back face, normal flipped
        let rec = HitRecord::new(&ray, 4.0, -Vec3::Z, (0.0, 0.0));
        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }
}
