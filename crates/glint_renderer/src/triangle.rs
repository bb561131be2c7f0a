//! Triangle primitive for ray tracing.
//!
//! Intersects the triangle's plane, then classifies the hit point with
//! barycentric weights computed from sub-triangle area ratios.

use glint_core::Surface;
use glint_math::{Aabb, Interval, Ray, Vec3, NEAR_ZERO};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};

/// A triangle primitive.
#[derive(Debug, Clone)]
pub struct Triangle {
    vertices: [Vec3; 3],
    /// Pre-computed face normal (unit length, zero for degenerate triangles)
    normal: Vec3,
    surface: Surface,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// Winding decides the outward side: `(b - a) x (c - a)`.
    pub fn new(a: Vec3, b: Vec3, c: Vec3, surface: Surface) -> Self {
        Self {
            vertices: [a, b, c],
            normal: face_normal(a, b, c),
            surface,
            bbox: Aabb::enclosing([a, b, c]).padded(),
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        self.vertices
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Barycentric weights of `p` (assumed to lie in the triangle's plane).
    ///
    /// The weights always sum to 1; all three lie in [0, 1] iff `p` is inside.
    pub fn barycentric(&self, p: Vec3) -> Vec3 {
        let [a, b, c] = self.vertices;
        barycentric(a, b, c, self.normal, p)
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord> {
        let [a, b, c] = self.vertices;
        hit_face(a, b, c, self.normal, ray, ray_t)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Unit normal of the triangle (a, b, c), zero if it has no area.
pub(crate) fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}

/// Signed area ratios of the sub-triangles opposite each vertex.
pub(crate) fn barycentric(a: Vec3, b: Vec3, c: Vec3, normal: Vec3, p: Vec3) -> Vec3 {
    let area = normal.dot((b - a).cross(c - a));
    if area.abs() < NEAR_ZERO {
        return Vec3::splat(f64::NAN);
    }

    let wa = normal.dot((b - p).cross(c - p)) / area;
    let wb = normal.dot((c - p).cross(a - p)) / area;
    Vec3::new(wa, wb, 1.0 - wa - wb)
}

/// Ray against the triangle (a, b, c) with unit normal `normal`.
///
/// Near-parallel rays and degenerate triangles miss.
pub(crate) fn hit_face(
    a: Vec3,
    b: Vec3,
    c: Vec3,
    normal: Vec3,
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord> {
    let denom = normal.dot(ray.direction());
    if denom.abs() < NEAR_ZERO {
        return None;
    }

    let t = normal.dot(a - ray.origin()) / denom;
    if !ray_t.surrounds(t) {
        return None;
    }

    let weights = barycentric(a, b, c, normal, ray.at(t));
    let unit = Interval::new(0.0, 1.0);
    if !(unit.contains(weights.x) && unit.contains(weights.y) && unit.contains(weights.z)) {
        return None;
    }

    Some(HitRecord::new(ray, t, normal, (weights.y, weights.z)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::forward;
    use glint_math::Color;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Surface::diffuse(Color::splat(0.5)),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let mut rng = StdRng::seed_from_u64(0);
        let tri = unit_triangle();
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, -1.0));

        let rec = tri.hit(&ray, forward(), &mut rng).expect("should hit");
        assert!((rec.t - 1.0).abs() < 1e-12);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_triangle_miss() {
        let mut rng = StdRng::seed_from_u64(0);
        let tri = unit_triangle();

        // Outside the edges
        let ray = Ray::new(Vec3::new(0.75, 0.75, 1.0), -Vec3::Z);
        assert!(tri.hit(&ray, forward(), &mut rng).is_none());

        // Parallel to the plane
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::X);
        assert!(tri.hit(&ray, forward(), &mut rng).is_none());
    }

    #[test]
    fn test_triangle_back_face() {
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new(Vec3::new(0.25, 0.25, -1.0), Vec3::Z);
        let rec = unit_triangle().hit(&ray, forward(), &mut rng).expect("should hit");
        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::Z);
    }

    #[test]
    fn test_hit_through_centroid() {
        let mut rng = StdRng::seed_from_u64(0);
        let tri = unit_triangle();
        let centroid = Vec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0);
        let ray = Ray::new(centroid + Vec3::new(0.5, -0.25, 2.0), Vec3::new(-0.5, 0.25, -2.0));

        let rec = tri.hit(&ray, forward(), &mut rng).expect("should hit");
        assert!((rec.p - centroid).length() < 1e-12);
        assert!((rec.u - 1.0 / 3.0).abs() < 1e-12);
        assert!((rec.v - 1.0 / 3.0).abs() < 1e-12);
        assert!((tri.barycentric(rec.p) - Vec3::splat(1.0 / 3.0)).length() < 1e-12);
    }

    #[test]
    fn test_barycentric_vertices() {
        let tri = unit_triangle();
        let [a, b, c] = tri.vertices();
        assert!((tri.barycentric(a) - Vec3::X).length() < 1e-12);
        assert!((tri.barycentric(b) - Vec3::Y).length() < 1e-12);
        assert!((tri.barycentric(c) - Vec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_barycentric_sums_to_one_random() {
        let mut rng = StdRng::seed_from_u64(8);
        let tri = Triangle::new(
            Vec3::new(-2.0, 1.0, 3.0),
            Vec3::new(4.0, 0.5, -1.0),
            Vec3::new(0.0, 5.0, 2.0),
            Surface::diffuse(Color::ONE),
        );
        let [a, b, c] = tri.vertices();

        for _ in 0..500 {
            // Arbitrary affine combination, inside or outside
            let s: f64 = rng.gen_range(-1.0..2.0);
            let t: f64 = rng.gen_range(-1.0..2.0);
            let p = a + s * (b - a) + t * (c - a);
            let w = tri.barycentric(p);
            assert!((w.x + w.y + w.z - 1.0).abs() < 1e-9);
            assert!((w.y - s).abs() < 1e-9);
            assert!((w.z - t).abs() < 1e-9);
        }
    }

    #[test]
    fn test_degenerate_triangle_misses() {
        let mut rng = StdRng::seed_from_u64(0);
        let tri = Triangle::new(
            Vec3::ZERO,
            Vec3::X,
            Vec3::X * 2.0,
            Surface::diffuse(Color::ONE),
        );
        let ray = Ray::new(Vec3::new(0.5, 0.0, 1.0), -Vec3::Z);
        assert!(tri.hit(&ray, forward(), &mut rng).is_none());
    }

    #[test]
    fn test_axis_aligned_triangle_bbox_has_thickness() {
        let bbox = unit_triangle().bounding_box();
        assert!(bbox.z.size() > 0.0);
    }
}
