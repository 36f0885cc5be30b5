//! Cyclic Jacobi eigenvalue algorithm for symmetric 3×3 matrices.
//!
//! The matrix is diagonalised by a sequence of plane rotations, each one
//! zeroing a single off-diagonal pair. For 3×3 inputs the off-diagonal mass
//! decreases quadratically and a handful of sweeps reach machine precision.
//!
//! # Example
//!
//! ```
//! use glam::{DMat3, DVec3};
//! use meshalign_linalg::eigen::symmetric_eigen3;
//!
//! let m = DMat3::from_diagonal(DVec3::new(1.0, 3.0, 2.0));
//! let eig = symmetric_eigen3(&m);
//! assert_eq!(eig.values, DVec3::new(3.0, 2.0, 1.0));
//! ```

use glam::{DMat3, DVec3};

const MAX_SWEEPS: usize = 50;

/// Off-diagonal pairs visited in one cyclic sweep.
const PAIRS: [(usize, usize); 3] = [(0, 1), (0, 2), (1, 2)];

/// Eigenvalues and eigenvectors of a symmetric 3×3 matrix.
#[derive(Debug, Clone, Copy)]
pub struct SymmetricEigen3 {
    /// Eigenvalues sorted in descending order.
    pub values: DVec3,
    /// Unit eigenvectors stored as columns, in the same order as `values`.
    pub vectors: DMat3,
}

/// Compute the eigen-decomposition of a symmetric 3×3 matrix.
///
/// Only the upper triangle is read; the input is assumed symmetric.
///
/// # Arguments
///
/// * `m` - A symmetric matrix.
///
/// # Returns
///
/// The eigenvalues sorted in descending order and the matching orthonormal
/// eigenvectors as matrix columns.
pub fn symmetric_eigen3(m: &DMat3) -> SymmetricEigen3 {
    // a[i][j] is row i, column j
    let mut a = [[0.0f64; 3]; 3];
    for (i, row) in a.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = if i <= j { m.col(j)[i] } else { m.col(i)[j] };
        }
    }
    let mut v = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    for _ in 0..MAX_SWEEPS {
        let off = a[0][1] * a[0][1] + a[0][2] * a[0][2] + a[1][2] * a[1][2];
        let total = a.iter().flatten().map(|x| x * x).sum::<f64>();
        if off == 0.0 || off <= f64::EPSILON * f64::EPSILON * total {
            break;
        }
        for &(p, q) in PAIRS.iter() {
            jacobi_rotate(&mut a, &mut v, p, q);
        }
    }

    let mut order = [0usize, 1, 2];
    order.sort_by(|&i, &j| a[j][j].total_cmp(&a[i][i]));

    let column = |k: usize| DVec3::new(v[0][k], v[1][k], v[2][k]);
    SymmetricEigen3 {
        values: DVec3::new(a[order[0]][order[0]], a[order[1]][order[1]], a[order[2]][order[2]]),
        vectors: DMat3::from_cols(column(order[0]), column(order[1]), column(order[2])),
    }
}

/// Apply the plane rotation that zeroes `a[p][q]`, accumulating it into `v`.
fn jacobi_rotate(a: &mut [[f64; 3]; 3], v: &mut [[f64; 3]; 3], p: usize, q: usize) {
    let apq = a[p][q];
    if apq == 0.0 {
        return;
    }

    let theta = (a[q][q] - a[p][p]) / (2.0 * apq);
    let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
    let c = 1.0 / (t * t + 1.0).sqrt();
    let s = t * c;

    // A <- A * J
    for row in a.iter_mut() {
        let (akp, akq) = (row[p], row[q]);
        row[p] = c * akp - s * akq;
        row[q] = s * akp + c * akq;
    }

    // A <- J^T * A
    for k in 0..3 {
        let (apk, aqk) = (a[p][k], a[q][k]);
        a[p][k] = c * apk - s * aqk;
        a[q][k] = s * apk + c * aqk;
    }

    // V <- V * J
    for row in v.iter_mut() {
        let (vkp, vkq) = (row[p], row[q]);
        row[p] = c * vkp - s * vkq;
        row[q] = s * vkp + c * vkq;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_mat_eq(a: &DMat3, b: &DMat3, epsilon: f64) {
        for j in 0..3 {
            for i in 0..3 {
                assert_relative_eq!(a.col(j)[i], b.col(j)[i], epsilon = epsilon);
            }
        }
    }

    #[test]
    fn test_eigen_diagonal() {
        let m = DMat3::from_diagonal(DVec3::new(-1.0, 5.0, 2.0));
        let eig = symmetric_eigen3(&m);
        assert_eq!(eig.values, DVec3::new(5.0, 2.0, -1.0));
        assert_relative_eq!(eig.vectors.col(0).y.abs(), 1.0);
        assert_relative_eq!(eig.vectors.col(1).z.abs(), 1.0);
        assert_relative_eq!(eig.vectors.col(2).x.abs(), 1.0);
    }

    #[test]
    fn test_eigen_reconstruction() {
        let m = DMat3::from_cols(
            DVec3::new(4.0, 1.0, -2.0),
            DVec3::new(1.0, 2.0, 0.5),
            DVec3::new(-2.0, 0.5, 3.0),
        );
        let eig = symmetric_eigen3(&m);

        // eigenvalues are sorted
        assert!(eig.values.x >= eig.values.y);
        assert!(eig.values.y >= eig.values.z);

        // V is orthonormal
        assert_mat_eq(&(eig.vectors.transpose() * eig.vectors), &DMat3::IDENTITY, 1e-12);

        // V * diag(values) * V^T == m
        let rebuilt = eig.vectors * DMat3::from_diagonal(eig.values) * eig.vectors.transpose();
        assert_mat_eq(&rebuilt, &m, 1e-12);
    }

    #[test]
    fn test_eigen_repeated_values() {
        let m = DMat3::from_diagonal(DVec3::new(2.0, 2.0, 2.0));
        let eig = symmetric_eigen3(&m);
        assert_eq!(eig.values, DVec3::splat(2.0));
        assert_mat_eq(&eig.vectors, &DMat3::IDENTITY, 1e-15);
    }

    #[test]
    fn test_eigen_zero_matrix() {
        let eig = symmetric_eigen3(&DMat3::ZERO);
        assert_eq!(eig.values, DVec3::ZERO);
        assert_mat_eq(&eig.vectors, &DMat3::IDENTITY, 1e-15);
    }
}
