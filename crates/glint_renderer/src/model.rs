//! Mesh instance placed in the world by a `ModelTransform`.
//!
//! Vertices stay in mesh space and are transformed on every test, so any
//! number of instances can share one `Mesh` without copying it.

use std::sync::Arc;

use glint_core::{Mesh, SceneError, SceneResult, Surface};
use glint_math::{Aabb, Interval, ModelTransform, Ray};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};
use crate::triangle::{face_normal, hit_face};

/// An instance of a shared triangle mesh.
#[derive(Debug, Clone)]
pub struct Model {
    mesh: Arc<Mesh>,
    transform: ModelTransform,
    surface: Surface,
    bbox: Aabb,
}

impl Model {
    pub fn new(mesh: Arc<Mesh>, transform: ModelTransform, surface: Surface) -> SceneResult<Self> {
        if !transform.is_valid() {
            return Err(SceneError::InvalidGeometry(format!(
                "degenerate model transform {transform:?}"
            )));
        }

        let bbox = Aabb::enclosing(mesh.positions().iter().map(|&p| transform.apply(p))).padded();

        Ok(Self {
            mesh,
            transform,
            surface,
            bbox,
        })
    }

    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    pub fn transform(&self) -> &ModelTransform {
        &self.transform
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

impl Hittable for Model {
    fn hit(&self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;

        for [a, b, c] in self.mesh.faces() {
            let (a, b, c) = (
                self.transform.apply(a),
                self.transform.apply(b),
                self.transform.apply(c),
            );
            let limit = closest.map_or(ray_t.max, |rec| rec.t);
            if let Some(rec) = hit_face(a, b, c, face_normal(a, b, c), ray, Interval::new(ray_t.min, limit)) {
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::forward;
    use glint_math::{Color, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Two parallel unit squares facing +Z, at z = 0 and z = -1.
    fn two_layers() -> Arc<Mesh> {
        Arc::new(
            Mesh::new(
                vec![
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::new(1.0, 1.0, 0.0),
                    Vec3::new(0.0, 1.0, 0.0),
                    Vec3::new(0.0, 0.0, -1.0),
                    Vec3::new(1.0, 0.0, -1.0),
                    Vec3::new(1.0, 1.0, -1.0),
                    Vec3::new(0.0, 1.0, -1.0),
                ],
                // Back layer listed first so the closest-face rule is exercised
                vec![4, 5, 6, 4, 6, 7, 0, 1, 2, 0, 2, 3],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_closest_face_wins() {
        let mut rng = StdRng::seed_from_u64(0);
        let model = Model::new(two_layers(), ModelTransform::identity(), Surface::mirror()).unwrap();
        let ray = Ray::new(Vec3::new(0.5, 0.25, 5.0), -Vec3::Z);

        let rec = model.hit(&ray, forward(), &mut rng).expect("should hit");
        assert!((rec.t - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_instances_are_transformed() {
        let mut rng = StdRng::seed_from_u64(0);
        let mesh = two_layers();
        let transform = ModelTransform::new(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::Z,
            Vec3::Y,
            Vec3::new(2.0, 2.0, 2.0),
        );
        let moved = Model::new(mesh.clone(), transform, Surface::diffuse(Color::ONE)).unwrap();
        let original = Model::new(mesh.clone(), ModelTransform::identity(), Surface::mirror()).unwrap();

        // Both instances share one mesh
        assert_eq!(Arc::strong_count(&mesh), 3);

        // The moved instance spans x in [10, 12]
        let ray = Ray::new(Vec3::new(11.5, 1.5, 5.0), -Vec3::Z);
        let rec = moved.hit(&ray, forward(), &mut rng).expect("should hit moved");
        assert!((rec.t - 5.0).abs() < 1e-12);
        assert!(original.hit(&ray, forward(), &mut rng).is_none());

        let bbox = moved.bounding_box();
        assert!(bbox.contains(Vec3::new(12.0, 2.0, -2.0)));
        assert!(!bbox.contains(Vec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn test_empty_mesh_box_is_never_entered() {
        let mut rng = StdRng::seed_from_u64(0);
        let empty = Arc::new(Mesh::new(Vec::new(), Vec::new()).unwrap());
        let model = Model::new(empty, ModelTransform::identity(), Surface::mirror()).unwrap();
        let ray = Ray::new(Vec3::new(0.2, 0.3, 5.0), Vec3::new(0.1, 0.2, -1.0));

        assert!(model.bounding_box().intersects(&ray).is_none());
        assert!(model.hit(&ray, forward(), &mut rng).is_none());
    }

    #[test]
    fn test_degenerate_transform_rejected() {
        let transform = ModelTransform::new(Vec3::ZERO, Vec3::Y, Vec3::Y, Vec3::ONE);
        assert!(Model::new(two_layers(), transform, Surface::mirror()).is_err());
    }
}
