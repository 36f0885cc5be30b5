//! Singular Value Decomposition (SVD) of 3×3 matrices.
//!
//! For any matrix A ∈ ℝ³ˣ³:
//!
//! ```text
//! A = U Σ Vᵀ
//! ```
//!
//! where U and V are orthogonal and Σ = diag(σ₁, σ₂, σ₃) with σ₁ ≥ σ₂ ≥ σ₃ ≥ 0.
//!
//! V and Σ come from the Jacobi eigen-decomposition of AᵀA. The left singular
//! vectors are then recovered as `uᵢ = A vᵢ / σᵢ`, orthogonalised with
//! Gram-Schmidt, and the last one is completed with a cross product so that
//! rank deficient inputs still yield an orthonormal U.
//!
//! # Example
//!
//! ```
//! use glam::{DMat3, DVec3};
//! use meshalign_linalg::svd::svd3;
//!
//! let a = DMat3::from_diagonal(DVec3::new(1.0, 2.0, 3.0));
//! let svd = svd3(&a);
//! let rebuilt = *svd.u() * DMat3::from_diagonal(*svd.s()) * svd.v().transpose();
//! assert!((rebuilt - a).abs_diff_eq(DMat3::ZERO, 1e-12));
//! ```

use glam::{DMat3, DVec3};

use crate::eigen::symmetric_eigen3;

/// Result of a 3×3 singular value decomposition.
#[derive(Debug, Clone, Copy)]
pub struct Svd3 {
    u: DMat3,
    s: DVec3,
    v: DMat3,
}

impl Svd3 {
    /// Left singular vectors as columns.
    pub fn u(&self) -> &DMat3 {
        &self.u
    }

    /// Singular values in descending order.
    pub fn s(&self) -> &DVec3 {
        &self.s
    }

    /// Right singular vectors as columns.
    pub fn v(&self) -> &DMat3 {
        &self.v
    }

    /// Ratio σ₂ / σ₁, zero when the matrix vanishes.
    ///
    /// A value close to zero means the matrix has rank one or less.
    pub fn second_ratio(&self) -> f64 {
        if self.s.x > 0.0 {
            self.s.y / self.s.x
        } else {
            0.0
        }
    }
}

/// Compute the singular value decomposition of a 3×3 matrix.
///
/// # Arguments
///
/// * `a` - The matrix to decompose.
///
/// # Returns
///
/// The decomposition `a = U Σ Vᵀ` with singular values sorted in descending order.
pub fn svd3(a: &DMat3) -> Svd3 {
    let eig = symmetric_eigen3(&(a.transpose() * *a));
    let v = eig.vectors;
    let s = DVec3::new(
        eig.values.x.max(0.0).sqrt(),
        eig.values.y.max(0.0).sqrt(),
        eig.values.z.max(0.0).sqrt(),
    );

    // the tolerance is relative to the largest singular value
    let tiny = s.x * 1e-12;

    let av1 = *a * v.x_axis;
    let u1 = if s.x > 0.0 && av1.length() > tiny {
        av1.normalize()
    } else {
        DVec3::X
    };

    let av2 = *a * v.y_axis;
    let av2_ortho = av2 - u1 * u1.dot(av2);
    let u2 = if av2_ortho.length() > tiny && s.y > tiny {
        av2_ortho.normalize()
    } else {
        u1.any_orthonormal_vector()
    };

    let mut u3 = u1.cross(u2);
    if u3.dot(*a * v.z_axis) < 0.0 {
        u3 = -u3;
    }

    Svd3 {
        u: DMat3::from_cols(u1, u2, u3),
        s,
        v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn assert_mat_eq(a: &DMat3, b: &DMat3, epsilon: f64) {
        for j in 0..3 {
            for i in 0..3 {
                assert_relative_eq!(a.col(j)[i], b.col(j)[i], epsilon = epsilon);
            }
        }
    }

    fn reconstruct(svd: &Svd3) -> DMat3 {
        *svd.u() * DMat3::from_diagonal(*svd.s()) * svd.v().transpose()
    }

    #[test]
    fn test_svd3_diagonal() {
        let a = DMat3::from_diagonal(DVec3::new(2.0, -3.0, 1.0));
        let svd = svd3(&a);
        assert_relative_eq!(svd.s().x, 3.0, epsilon = 1e-12);
        assert_relative_eq!(svd.s().y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(svd.s().z, 1.0, epsilon = 1e-12);
        assert_mat_eq(&reconstruct(&svd), &a, 1e-12);
    }

    #[test]
    fn test_svd3_random() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let a = DMat3::from_cols_array(&std::array::from_fn::<f64, 9, _>(|_| {
                rng.random_range(-1.0..1.0)
            }));
            let svd = svd3(&a);

            assert!(svd.s().x >= svd.s().y && svd.s().y >= svd.s().z);
            assert_mat_eq(&(svd.u().transpose() * *svd.u()), &DMat3::IDENTITY, 1e-9);
            assert_mat_eq(&(svd.v().transpose() * *svd.v()), &DMat3::IDENTITY, 1e-9);
            assert_mat_eq(&reconstruct(&svd), &a, 1e-7);
        }
    }

    #[test]
    fn test_svd3_rank_one() {
        // outer product of two vectors has a single non-zero singular value
        let x = DVec3::new(1.0, 2.0, 2.0);
        let y = DVec3::new(0.0, 3.0, 4.0);
        let a = DMat3::from_cols(x * y.x, x * y.y, x * y.z);
        let svd = svd3(&a);

        assert_relative_eq!(svd.s().x, 15.0, epsilon = 1e-9);
        assert!(svd.second_ratio() < 1e-6);
        assert_mat_eq(&(svd.u().transpose() * *svd.u()), &DMat3::IDENTITY, 1e-9);
        assert_mat_eq(&reconstruct(&svd), &a, 1e-6);
    }

    #[test]
    fn test_svd3_zero() {
        let svd = svd3(&DMat3::ZERO);
        assert_eq!(*svd.s(), DVec3::ZERO);
        assert_eq!(svd.second_ratio(), 0.0);
        assert_mat_eq(&(svd.u().transpose() * *svd.u()), &DMat3::IDENTITY, 1e-12);
    }
}
