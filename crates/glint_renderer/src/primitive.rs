//! The closed set of renderable shapes.

use glint_core::Surface;
use glint_math::{Aabb, Interval, Ray};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};
use crate::material::{scatter, scatter_isotropic, Collision};
use crate::{Model, Quad, Sphere, SphereVolume, Triangle};

/// Any shape that can appear in a scene.
#[derive(Debug, Clone)]
pub enum Primitive {
    Sphere(Sphere),
    Triangle(Triangle),
    Quad(Quad),
    Volume(SphereVolume),
    Model(Model),
}

impl Primitive {
    /// The surface shading this primitive. Volumes have none.
    pub fn surface(&self) -> Option<&Surface> {
        match self {
            Primitive::Sphere(s) => Some(s.surface()),
            Primitive::Triangle(t) => Some(t.surface()),
            Primitive::Quad(q) => Some(q.surface()),
            Primitive::Model(m) => Some(m.surface()),
            Primitive::Volume(_) => None,
        }
    }

    fn as_hittable(&self) -> &dyn Hittable {
        match self {
            Primitive::Sphere(s) => s,
            Primitive::Triangle(t) => t,
            Primitive::Quad(q) => q,
            Primitive::Volume(v) => v,
            Primitive::Model(m) => m,
        }
    }

    /// Intersect and scatter in one step.
    pub fn collide(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Collision {
        let Some(rec) = self.hit(ray, ray_t, rng) else {
            return Collision::Missed;
        };
        self.scatter(ray, &rec, rng)
    }

    /// Scatter `ray` at a hit previously found on this primitive.
    pub fn scatter(&self, ray: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Collision {
        match self {
            Primitive::Volume(v) => scatter_isotropic(v.albedo_at(rec.p), ray, rec, rng),
            _ => match self.surface() {
                Some(surface) => scatter(surface, ray, rec, rng),
                None => Collision::Missed,
            },
        }
    }
}

impl Hittable for Primitive {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord> {
        self.as_hittable().hit(ray, ray_t, rng)
    }

    fn bounding_box(&self) -> Aabb {
        self.as_hittable().bounding_box()
    }
}

impl From<Sphere> for Primitive {
    fn from(s: Sphere) -> Self {
        Primitive::Sphere(s)
    }
}

impl From<Triangle> for Primitive {
    fn from(t: Triangle) -> Self {
        Primitive::Triangle(t)
    }
}

impl From<Quad> for Primitive {
    fn from(q: Quad) -> Self {
        Primitive::Quad(q)
    }
}

impl From<SphereVolume> for Primitive {
    fn from(v: SphereVolume) -> Self {
        Primitive::Volume(v)
    }
}

impl From<Model> for Primitive {
    fn from(m: Model) -> Self {
        Primitive::Model(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::forward;
    use glint_math::{Color, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_collide_emissive_sphere() {
        let mut rng = StdRng::seed_from_u64(0);
        let light: Primitive = Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, Surface::emissive(Color::ONE))
            .unwrap()
            .into();
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);

        match light.collide(&ray, forward(), &mut rng) {
            Collision::Absorbed { attenuation, t } => {
                assert_eq!(attenuation, Color::ONE);
                assert!((t - 2.0).abs() < 1e-12);
            }
            other => panic!("expected absorption, got {other:?}"),
        }

        let away = Ray::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(light.collide(&away, forward(), &mut rng), Collision::Missed);
    }

    #[test]
    fn test_volume_scatters_with_albedo() {
        let mut rng = StdRng::seed_from_u64(1);
        let fog: Primitive = SphereVolume::new(Vec3::ZERO, 1.0, 1000.0, Color::new(0.2, 0.3, 0.4))
            .unwrap()
            .into();
        assert!(fog.surface().is_none());

        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), -Vec3::Z);
        match fog.collide(&ray, forward(), &mut rng) {
            Collision::Reflected { attenuation, .. } => {
                assert_eq!(attenuation, Color::new(0.2, 0.3, 0.4));
            }
            other => panic!("expected scattering, got {other:?}"),
        }
    }
}
