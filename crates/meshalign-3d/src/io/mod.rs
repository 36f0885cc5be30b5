/// JSON point cloud reader and writer module.
pub mod points;

/// STL reader and writer module.
pub mod stl;

use crate::mesh::MeshError;

/// Error types for the I/O module.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Failed to read or write the file
    #[error("Failed to access file")]
    Io(#[from] std::io::Error),

    /// The file decoded into an invalid mesh
    #[error("Invalid mesh in file")]
    Mesh(#[from] MeshError),

    /// The file contains no triangles
    #[error("Mesh file {0} contains no triangles")]
    EmptyMesh(String),

    /// The file is not a JSON array of points
    #[error("Invalid point cloud file")]
    Json(#[from] serde_json::Error),
}
