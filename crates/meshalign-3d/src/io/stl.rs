use std::{fs::File, io::BufReader, path::Path};

use stl_io::{Normal, Triangle, Vertex};

use super::IoError;
use crate::mesh::TriangleMesh;

/// Read a triangle mesh from an ASCII or binary STL file.
///
/// Identical vertices shared by several facets are merged, so the returned
/// mesh is indexed. Coordinates are widened from the single precision stored
/// in the file.
///
/// # Arguments
///
/// * `path` - The path to the STL file.
///
/// # Returns
///
/// The indexed mesh, or an error if the file cannot be read or holds no triangles.
pub fn read_stl(path: impl AsRef<Path>) -> Result<TriangleMesh, IoError> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    let stl = stl_io::read_stl(&mut reader)?;

    if stl.faces.is_empty() {
        return Err(IoError::EmptyMesh(path.display().to_string()));
    }

    let vertices = stl
        .vertices
        .iter()
        .map(|v| [v[0] as f64, v[1] as f64, v[2] as f64])
        .collect::<Vec<_>>();
    let faces = stl.faces.iter().map(|f| f.vertices).collect::<Vec<_>>();

    log::debug!(
        "read {} vertices and {} triangles from {}",
        vertices.len(),
        faces.len(),
        path.display()
    );

    Ok(TriangleMesh::new(vertices, faces)?)
}

/// Write a triangle mesh to a binary STL file.
///
/// Facet normals are recomputed from the vertex winding.
///
/// # Arguments
///
/// * `mesh` - The mesh to write.
/// * `path` - The destination path, overwritten if it exists.
pub fn write_stl(mesh: &TriangleMesh, path: impl AsRef<Path>) -> Result<(), IoError> {
    let to_f32 = |p: [f64; 3]| [p[0] as f32, p[1] as f32, p[2] as f32];

    let triangles = mesh
        .triangles()
        .map(|tri| Triangle {
            normal: Normal::new(to_f32(TriangleMesh::face_normal(&tri))),
            vertices: tri.map(|p| Vertex::new(to_f32(p))),
        })
        .collect::<Vec<_>>();

    let mut file = File::create(path)?;
    stl_io::write_stl(&mut file, triangles.iter())?;

    Ok(())
}
