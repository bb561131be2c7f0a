//! Surface scattering.
//!
//! Every bounce ends in one of three outcomes: the ray is reflected and
//! keeps travelling, it is absorbed and the path ends with a contribution,
//! or it missed everything.

use glint_core::{Surface, SurfaceKind};
use glint_math::{gen_f64, Color, Ray, Vec3, Vec3Ext};
use rand::RngCore;

use crate::hittable::HitRecord;

/// Outcome of tracing one ray segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collision {
    /// The path continues with `scattered`.
    Reflected {
        scattered: Ray,
        attenuation: Color,
        t: f64,
    },
    /// The path ends here and contributes `attenuation` times its carried color.
    Absorbed { attenuation: Color, t: f64 },
    /// Nothing was hit.
    Missed,
}

/// Scatter `ray` off `surface` at the hit described by `rec`.
pub fn scatter(surface: &Surface, ray: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Collision {
    let t = rec.t;
    match surface.kind() {
        SurfaceKind::Specular => {
            let direction = reflect(ray.direction(), rec.normal)
                + surface.fuzz() * Vec3::random_unit(rng);

            // Fuzzed below the surface
            if direction.dot(rec.normal) <= 0.0 {
                return Collision::Absorbed {
                    attenuation: Color::ZERO,
                    t,
                };
            }

            Collision::Reflected {
                scattered: ray.bounce(rec.p, direction, ray.refractive_index),
                attenuation: Color::ONE,
                t,
            }
        }
        SurfaceKind::Diffuse => {
            let mut direction = rec.normal + Vec3::random_unit(rng);

            // Catch degenerate scatter direction
            if direction.near_zero() {
                direction = rec.normal;
            }

            Collision::Reflected {
                scattered: ray.bounce(rec.p, direction, ray.refractive_index),
                attenuation: surface.color_at(rec.u, rec.v, rec.p),
                t,
            }
        }
        SurfaceKind::Dielectric => {
            let (ratio, next_index) = if rec.front_face {
                (ray.refractive_index / surface.refractive_index(), surface.refractive_index())
            } else {
                (surface.refractive_index() / Ray::AIR, Ray::AIR)
            };

            let unit_direction = ray.direction();
            let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
            let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

            // Check for total internal reflection
            let cannot_refract = ratio * sin_theta > 1.0;

            let scattered = if cannot_refract || reflectance(cos_theta, ratio) > gen_f64(rng) {
                ray.bounce(rec.p, reflect(unit_direction, rec.normal), ray.refractive_index)
            } else {
                ray.bounce(rec.p, refract(unit_direction, rec.normal, ratio), next_index)
            };

            Collision::Reflected {
                scattered,
                attenuation: Color::ONE,
                t,
            }
        }
        SurfaceKind::Emissive => Collision::Absorbed {
            attenuation: surface.color_at(rec.u, rec.v, rec.p),
            t,
        },
    }
}

/// Isotropic scattering inside a participating medium.
pub fn scatter_isotropic(
    albedo: Color,
    ray: &Ray,
    rec: &HitRecord,
    rng: &mut dyn RngCore,
) -> Collision {
    Collision::Reflected {
        scattered: ray.bounce(rec.p, Vec3::random_unit(rng), ray.refractive_index),
        attenuation: albedo,
        t: rec.t,
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance
fn reflectance(cosine: f64, ratio: f64) -> f64 {
    let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
