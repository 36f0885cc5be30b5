use glam::DVec3;
use thiserror::Error;

use crate::{pointcloud::PointCloud, transforms::RigidTransform};

/// Error type for mesh construction.
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    /// A face references a vertex that does not exist
    #[error("Face {face} references vertex {index} but the mesh has {num_vertices} vertices")]
    FaceIndexOutOfBounds {
        /// Index of the offending face.
        face: usize,
        /// The out of range vertex index.
        index: usize,
        /// Number of vertices in the mesh.
        num_vertices: usize,
    },
}

/// An indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    vertices: Vec<[f64; 3]>,
    faces: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Create a mesh from vertices and triangle indices.
    ///
    /// Returns an error if any face index is out of range.
    pub fn new(vertices: Vec<[f64; 3]>, faces: Vec<[usize; 3]>) -> Result<Self, MeshError> {
        for (face_idx, face) in faces.iter().enumerate() {
            if let Some(&index) = face.iter().find(|&&i| i >= vertices.len()) {
                return Err(MeshError::FaceIndexOutOfBounds {
                    face: face_idx,
                    index,
                    num_vertices: vertices.len(),
                });
            }
        }
        Ok(Self { vertices, faces })
    }

    /// The mesh vertices.
    pub fn vertices(&self) -> &[[f64; 3]] {
        &self.vertices
    }

    /// The triangle vertex indices.
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate over the triangles as vertex positions.
    pub fn triangles(&self) -> impl Iterator<Item = [[f64; 3]; 3]> + '_ {
        self.faces
            .iter()
            .map(|f| [self.vertices[f[0]], self.vertices[f[1]], self.vertices[f[2]]])
    }

    /// Unit normal of a triangle, zero if the triangle is degenerate.
    pub fn face_normal(triangle: &[[f64; 3]; 3]) -> [f64; 3] {
        let [a, b, c] = triangle.map(DVec3::from_array);
        (b - a).cross(c - a).normalize_or_zero().to_array()
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        self.triangles()
            .map(|t| {
                let [a, b, c] = t.map(DVec3::from_array);
                0.5 * (b - a).cross(c - a).length()
            })
            .sum()
    }

    /// Minimum and maximum corners of the axis aligned bounding box.
    pub fn bounding_box(&self) -> Option<([f64; 3], [f64; 3])> {
        crate::ops::bounding_box(&self.vertices)
    }

    /// Length of the bounding box diagonal, zero for an empty mesh.
    pub fn diagonal(&self) -> f64 {
        crate::ops::bounding_box_diagonal(&self.vertices)
    }

    /// Return a copy of the mesh with `transform` applied to every vertex.
    pub fn transformed(&self, transform: &RigidTransform) -> TriangleMesh {
        TriangleMesh {
            vertices: transform.transform_points(&self.vertices),
            faces: self.faces.clone(),
        }
    }

    /// The vertices as a point cloud.
    pub fn to_point_cloud(&self) -> PointCloud {
        PointCloud::from_points(self.vertices.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> TriangleMesh {
        TriangleMesh::new(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .expect("valid mesh")
    }

    #[test]
    fn test_mesh_basics() {
        let mesh = unit_square();
        assert_eq!(mesh.num_triangles(), 2);
        assert!(!mesh.is_empty());
        assert_relative_eq!(mesh.surface_area(), 1.0);
        assert_relative_eq!(mesh.diagonal(), 2.0f64.sqrt());
        assert_eq!(
            mesh.bounding_box(),
            Some(([0.0, 0.0, 0.0], [1.0, 1.0, 0.0]))
        );
        let normal = TriangleMesh::face_normal(&mesh.triangles().next().expect("triangle"));
        assert_eq!(normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_mesh_invalid_face() {
        let res = TriangleMesh::new(vec![[0.0; 3]; 3], vec![[0, 1, 3]]);
        assert_eq!(
            res,
            Err(MeshError::FaceIndexOutOfBounds {
                face: 0,
                index: 3,
                num_vertices: 3
            })
        );
    }

    #[test]
    fn test_mesh_transformed() {
        let mesh = unit_square();
        let moved = mesh.transformed(&RigidTransform::from_translation([0.0, 0.0, 2.0]));
        assert_eq!(moved.vertices()[2], [1.0, 1.0, 2.0]);
        assert_eq!(moved.faces(), mesh.faces());
        assert_eq!(mesh.vertices()[2], [1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_degenerate_normal() {
        let normal = TriangleMesh::face_normal(&[[0.0; 3], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        assert_eq!(normal, [0.0, 0.0, 0.0]);
    }
}
