//! Planar parallelogram primitive.

use glint_core::{SceneError, SceneResult, Surface};
use glint_math::{Aabb, Interval, Ray, Vec3, NEAR_ZERO};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};

/// A parallelogram spanned by `width` and `height` from corner `origin`.
#[derive(Debug, Clone)]
pub struct Quad {
    origin: Vec3,
    width: Vec3,
    height: Vec3,
    /// Unit normal, `width x height`
    normal: Vec3,
    /// Plane offset: `normal . origin`
    d: f64,
    /// `n / (n . n)` for the unnormalized `n = width x height`
    w: Vec3,
    surface: Surface,
    bbox: Aabb,
}

impl Quad {
    /// Create a quad. `width` and `height` must not be parallel.
    pub fn new(origin: Vec3, width: Vec3, height: Vec3, surface: Surface) -> SceneResult<Self> {
        let n = width.cross(height);
        if n.length_squared() < NEAR_ZERO || !origin.is_finite() {
            return Err(SceneError::InvalidGeometry(format!(
                "quad at {origin} spanned by {width} and {height} has no area"
            )));
        }

        let normal = n.normalize();
        let bbox = Aabb::enclosing([
            origin,
            origin + width,
            origin + height,
            origin + width + height,
        ])
        .padded();

        Ok(Self {
            origin,
            width,
            height,
            normal,
            d: normal.dot(origin),
            w: n / n.dot(n),
            surface,
            bbox,
        })
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

impl Hittable for Quad {
    fn hit(&self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord> {
        let denom = self.normal.dot(ray.direction());

        // Ray is parallel to the plane
        if denom.abs() < NEAR_ZERO {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        // Planar coordinates of the hit in the (width, height) frame
        let planar = ray.at(t) - self.origin;
        let alpha = self.w.dot(planar.cross(self.height));
        let beta = self.w.dot(self.width.cross(planar));

        let unit = Interval::new(0.0, 1.0);
        if !unit.contains(alpha) || !unit.contains(beta) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, (alpha, beta)))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::forward;
    use glint_math::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn wall() -> Quad {
        // 3x3 wall at z = -4
        Quad::new(
            Vec3::new(1.0, -1.5, -4.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(0.0, 3.0, 0.0),
            Surface::emissive(Color::ONE),
        )
        .unwrap()
    }

    #[test]
    fn test_quad_hit_planar_coordinates() {
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new(Vec3::new(2.5, 0.0, 0.0), -Vec3::Z);
        let rec = wall().hit(&ray, forward(), &mut rng).expect("should hit");

        assert!((rec.t - 4.0).abs() < 1e-12);
        assert!((rec.u - 0.5).abs() < 1e-12);
        assert!((rec.v - 0.5).abs() < 1e-12);
        assert!(rec.front_face);
    }

    #[test]
    fn test_quad_miss_outside() {
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new(Vec3::new(0.5, 0.0, 0.0), -Vec3::Z);
        assert!(wall().hit(&ray, forward(), &mut rng).is_none());

        let ray = Ray::new(Vec3::new(2.5, 1.6, 0.0), -Vec3::Z);
        assert!(wall().hit(&ray, forward(), &mut rng).is_none());
    }

    #[test]
    fn test_quad_parallel_ray_misses() {
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -4.0), Vec3::X);
        assert!(wall().hit(&ray, forward(), &mut rng).is_none());
    }

    #[test]
    fn test_quad_bbox_is_padded() {
        let bbox = wall().bounding_box();
        assert!(bbox.z.size() > 0.0);
        assert!(bbox.contains(Vec3::new(4.0, 1.5, -4.0)));
    }

    #[test]
    fn test_degenerate_quad() {
        let result = Quad::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0, Surface::mirror());
        assert!(result.is_err());
    }
}
