#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// I/O utilities for reading and writing 3D data.
pub mod io;

/// Linear algebra utilities.
pub mod linalg;

/// Triangle meshes.
pub mod mesh;

/// Operations on 3D data processing.
pub mod ops;

/// Principal component analysis of point sets.
pub mod pca;

/// Point cloud type.
pub mod pointcloud;

/// Voxel sampling of point sets and mesh surfaces.
pub mod sampling;

/// 3D transforms algorithms.
pub mod transforms;
