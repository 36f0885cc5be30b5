#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Eigen-decomposition of symmetric 3x3 matrices.
pub mod eigen;

/// Least-squares rigid alignment of corresponding point sets.
pub mod rigid;

/// Module to calculate SVD of a 3x3 matrix
pub mod svd;
