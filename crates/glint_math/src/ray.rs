use crate::{Color, Vec3, Vec3Ext};

/// A ray in 3D space that carries light back toward the camera.
///
/// Besides the origin and (normalized) direction, a ray tracks the color it
/// has accumulated so far and the refractive index of the medium it is
/// currently travelling through. Both are updated in place as it bounces.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    /// Product of every attenuation applied so far. Starts white.
    pub color: Color,
    /// Refractive index of the current medium. Starts at 1.0 (air).
    pub refractive_index: f64,
}

impl Ray {
    /// Refractive index of vacuum/air.
    pub const AIR: f64 = 1.0;

    /// Create a new white ray in air. The direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            color: Color::ONE,
            refractive_index: Self::AIR,
        }
    }

    /// Continue this path from a new origin in a new direction.
    ///
    /// The carried color is preserved; the caller applies attenuation.
    pub fn bounce(&self, origin: Vec3, direction: Vec3, refractive_index: f64) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            color: self.color,
            refractive_index,
        }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Multiply the carried color component-wise by `attenuation`.
    #[inline]
    pub fn attenuate(&mut self, attenuation: Color) {
        self.color *= attenuation;
    }

    /// A ray may only be traced if its direction is finite and non-zero.
    pub fn is_valid(&self) -> bool {
        self.origin.is_finite() && self.direction.is_finite() && !self.direction.near_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let ray = Ray::new(origin, Vec3::new(0.0, 4.0, 0.0));

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, Vec3::Y);
        assert_eq!(ray.color, Color::ONE);
        assert_eq!(ray.refractive_index, 1.0);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_attenuate_and_bounce() {
        let mut ray = Ray::new(Vec3::ZERO, Vec3::Z);
        ray.attenuate(Color::new(0.5, 0.25, 1.0));
        ray.attenuate(Color::new(0.5, 1.0, 0.0));
        assert_eq!(ray.color, Color::new(0.25, 0.25, 0.0));

        let next = ray.bounce(Vec3::ONE, Vec3::new(0.0, -2.0, 0.0), 1.5);
        assert_eq!(next.color, ray.color);
        assert_eq!(next.direction, -Vec3::Y);
        assert_eq!(next.refractive_index, 1.5);
    }

    #[test]
    fn test_ray_validity() {
        assert!(Ray::new(Vec3::ZERO, Vec3::X).is_valid());
        assert!(!Ray::new(Vec3::ZERO, Vec3::ZERO).is_valid());
        assert!(!Ray::new(Vec3::ZERO, Vec3::new(f64::NAN, 0.0, 1.0)).is_valid());
    }
}
