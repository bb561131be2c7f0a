//! Triangle mesh data shared by mesh instances.
//!
//! A mesh is plain vertex/index data in its own local space. Instances place
//! it in the world with a `ModelTransform`; many instances may share one mesh
//! through an `Arc`.

use std::path::Path;

use glint_math::{Aabb, Vec3};

use crate::error::{SceneError, SceneResult};

/// Vertex positions and triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    positions: Vec<Vec3>,

    /// Triangle indices (every 3 indices form a triangle)
    indices: Vec<u32>,

    /// Local-space bounding box (unpadded)
    bounds: Aabb,
}

impl Mesh {
    /// Create a mesh, checking that the indices describe whole triangles
    /// and only reference existing vertices.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> SceneResult<Self> {
        if indices.len() % 3 != 0 {
            return Err(SceneError::InvalidMesh(format!(
                "index count {} is not a multiple of 3",
                indices.len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(SceneError::InvalidMesh(format!(
                "index {} out of bounds for {} vertices",
                bad,
                positions.len()
            )));
        }
        if let Some(p) = positions.iter().find(|p| !p.is_finite()) {
            return Err(SceneError::InvalidMesh(format!("non-finite vertex {p}")));
        }

        let bounds = Aabb::enclosing(positions.iter().copied());
        Ok(Self {
            positions,
            indices,
            bounds,
        })
    }

    /// Load every model of an OBJ file and merge them into one mesh.
    ///
    /// Faces are triangulated on load. Normals, texture coordinates and
    /// materials in the file are ignored.
    pub fn load_obj(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let options = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        };
        let (models, _materials) = tobj::load_obj(path, &options)?;

        let mut positions = Vec::new();
        let mut indices = Vec::new();
        for model in &models {
            let base = positions.len() as u32;
            positions.extend(
                model
                    .mesh
                    .positions
                    .chunks_exact(3)
                    .map(|p| Vec3::new(p[0] as f64, p[1] as f64, p[2] as f64)),
            );
            indices.extend(model.mesh.indices.iter().map(|&i| base + i));
        }

        let mesh = Self::new(positions, indices)?;
        log::info!(
            "Loaded mesh {}: {} models, {} vertices, {} triangles",
            path.display(),
            models.len(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Iterate the triangles as vertex triples in local space.
    pub fn faces(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn quad_mesh() -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
        .unwrap()
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = quad_mesh();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_bounds_computation() {
        let mesh = Mesh::new(
            vec![
                Vec3::new(-1.0, -2.0, -3.0),
                Vec3::new(4.0, 5.0, 6.0),
                Vec3::new(0.0, 0.0, 0.0),
            ],
            vec![0, 1, 2],
        )
        .unwrap();

        assert_eq!(mesh.bounds().min(), Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(mesh.bounds().max(), Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_faces() {
        let faces: Vec<[Vec3; 3]> = quad_mesh().faces().collect();
        assert_eq!(faces.len(), 2);
        assert_eq!(faces[1][0], Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(faces[1][1], Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(faces[1][2], Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_invalid_indices() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        assert!(matches!(
            Mesh::new(positions.clone(), vec![0, 1]),
            Err(SceneError::InvalidMesh(_))
        ));
        assert!(matches!(
            Mesh::new(positions, vec![0, 1, 3]),
            Err(SceneError::InvalidMesh(_))
        ));
    }

    #[test]
    fn test_load_obj() {
        let path = std::env::temp_dir().join(format!("glint_mesh_{}.obj", std::process::id()));
        {
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "v 0 0 0").unwrap();
            writeln!(file, "v 1 0 0").unwrap();
            writeln!(file, "v 1 1 0").unwrap();
            writeln!(file, "v 0 1 0").unwrap();
            writeln!(file, "f 1 2 3 4").unwrap();
        }

        let mesh = Mesh::load_obj(&path).unwrap();
        std::fs::remove_file(&path).ok();

        // The quad face is triangulated
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.bounds().max(), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_load_obj_missing_file() {
        assert!(Mesh::load_obj("/nonexistent/mesh.obj").is_err());
    }
}
