//! Vector and color helpers layered on glam's `DVec3`.

use glam::DVec3;
use rand::{Rng, RngCore};

/// Positions, directions and normals.
pub type Vec3 = DVec3;

/// RGB intensity, nominally in [0, 1) per channel.
///
/// Values may exceed 1 while samples are accumulated; they are only clamped
/// when converted to bytes.
pub type Color = DVec3;

/// Threshold below which a component is treated as zero.
pub const NEAR_ZERO: f64 = 1e-8;

/// Draw a uniform f64 in [0, 1).
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Extra vector operations the renderer needs on top of glam.
pub trait Vec3Ext: Sized {
    /// A uniformly distributed direction on the unit sphere.
    fn random_unit(rng: &mut dyn RngCore) -> Self;

    /// A uniformly distributed point in the unit disk (z = 0).
    fn random_in_unit_disk(rng: &mut dyn RngCore) -> Self;

    /// Clamp every component into [0, max].
    fn clip(self, max: f64) -> Self;

    /// True if every component is within `NEAR_ZERO` of zero.
    fn near_zero(self) -> bool;
}

impl Vec3Ext for DVec3 {
    fn random_unit(rng: &mut dyn RngCore) -> Self {
        // Rejection sampling keeps the distribution uniform on the sphere
        loop {
            let v = DVec3::new(
                gen_f64(rng) * 2.0 - 1.0,
                gen_f64(rng) * 2.0 - 1.0,
                gen_f64(rng) * 2.0 - 1.0,
            );
            let len_sq = v.length_squared();
            if len_sq > 1e-12 && len_sq <= 1.0 {
                return v / len_sq.sqrt();
            }
        }
    }

    fn random_in_unit_disk(rng: &mut dyn RngCore) -> Self {
        loop {
            let p = DVec3::new(gen_f64(rng) * 2.0 - 1.0, gen_f64(rng) * 2.0 - 1.0, 0.0);
            if p.length_squared() < 1.0 {
                return p;
            }
        }
    }

    fn clip(self, max: f64) -> Self {
        DVec3::new(
            self.x.clamp(0.0, max),
            self.y.clamp(0.0, max),
            self.z.clamp(0.0, max),
        )
    }

    fn near_zero(self) -> bool {
        self.x.abs() < NEAR_ZERO && self.y.abs() < NEAR_ZERO && self.z.abs() < NEAR_ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_unit_is_normalized() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = Vec3::random_unit(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_random_in_unit_disk() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let p = Vec3::random_in_unit_disk(&mut rng);
            assert!(p.length_squared() < 1.0);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn test_clip() {
        let c = Color::new(-0.5, 0.5, 2.0).clip(1.0);
        assert_eq!(c, Color::new(0.0, 0.5, 1.0));
    }

    #[test]
    fn test_near_zero() {
        assert!(Vec3::new(1e-10, -1e-10, 0.0).near_zero());
        assert!(!Vec3::new(1e-3, 0.0, 0.0).near_zero());
    }

    #[test]
    fn test_normalize_zero_vector() {
        // Normalizing the zero vector must not produce NaN
        assert_eq!(Vec3::ZERO.normalize_or_zero(), Vec3::ZERO);
    }
}
