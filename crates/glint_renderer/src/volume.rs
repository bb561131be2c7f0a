//! Constant-density participating medium bounded by a sphere (fog, smoke).

use glint_core::{SceneError, SceneResult, Texture};
use glint_math::{gen_f64, Aabb, Color, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};

/// A spherical volume of uniform density.
///
/// A ray crossing the volume scatters after a random free-flight distance;
/// if that distance exceeds the chord through the sphere, the ray passes
/// through untouched.
#[derive(Debug, Clone)]
pub struct SphereVolume {
    center: Vec3,
    radius: f64,
    density: f64,
    albedo: Texture,
    bbox: Aabb,
}

impl SphereVolume {
    /// Create a volume. Radius and density must be positive.
    pub fn new(center: Vec3, radius: f64, density: f64, albedo: impl Into<Texture>) -> SceneResult<Self> {
        if !(radius.is_finite() && radius > 0.0) || !center.is_finite() {
            return Err(SceneError::InvalidGeometry(format!(
                "volume at {center} with radius {radius}"
            )));
        }
        if !(density.is_finite() && density > 0.0) {
            return Err(SceneError::InvalidGeometry(format!(
                "volume density must be positive, got {density}"
            )));
        }

        let rvec = Vec3::splat(radius);
        Ok(Self {
            center,
            radius,
            density,
            albedo: albedo.into(),
            bbox: Aabb::from_points(center - rvec, center + rvec).padded(),
        })
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    /// Scattering color at a point inside the volume.
    pub fn albedo_at(&self, p: Vec3) -> Color {
        self.albedo.sample(0.0, 0.0, p)
    }

    /// Entry and exit times of the bounding sphere, unclipped.
    fn chord(&self, ray: &Ray) -> Option<(f64, f64)> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();
        Some(((h - sqrtd) / a, (h + sqrtd) / a))
    }
}

impl Hittable for SphereVolume {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord> {
        let (enter, exit) = self.chord(ray)?;
        let enter = enter.max(ray_t.min);
        let exit = exit.min(ray_t.max);
        if enter >= exit {
            return None;
        }

        // U in (0, 1] keeps ln finite
        let u = 1.0 - gen_f64(rng);
        let distance_inside = (exit - enter) * ray.direction().length();
        let hit_distance = -(1.0 / self.density) * u.ln();
        if hit_distance > distance_inside {
            return None;
        }

        let t = enter + hit_distance / ray.direction().length();

        // Normal and face are arbitrary inside a medium
        Some(HitRecord {
            t,
            p: ray.at(t),
            normal: Vec3::X,
            front_face: true,
            u: 0.0,
            v: 0.0,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
