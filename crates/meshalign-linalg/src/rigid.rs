//! Rigid alignment of corresponding point sets (Kabsch / Arun).

use glam::{DMat3, DVec3};
use thiserror::Error;

use crate::svd::svd3;

/// Minimum number of correspondences needed to fix a rigid transform.
pub const MIN_RIGID_POINTS: usize = 3;

/// Error type for rigid alignment operations.
#[derive(Debug, Error, PartialEq)]
pub enum RigidFitError {
    /// Source and destination arrays must have the same length
    #[error("Source and destination arrays must have the same length ({0} != {1})")]
    MismatchedInputLengths(usize, usize),

    /// Not enough correspondences to estimate a rigid transform
    #[error("Rigid alignment requires at least {required} correspondences, got {actual}")]
    NotEnoughPoints {
        /// Minimum number of correspondences.
        required: usize,
        /// Number of correspondences provided.
        actual: usize,
    },

    /// The source points are collinear or coincident and the rotation is undetermined
    #[error("Degenerate point configuration (singular value ratio {ratio:e}), rotation is undetermined")]
    Degenerate {
        /// Ratio between the second and the first singular value of the cross-covariance.
        ratio: f64,
    },
}

/// Rotation and translation mapping source points onto destination points.
#[derive(Debug, Clone, Copy)]
pub struct RigidFit {
    /// Rotation matrix with determinant +1.
    pub rotation: DMat3,
    /// Translation vector.
    pub translation: DVec3,
    /// Singular values of the centered cross-covariance, in descending order.
    pub singular_values: DVec3,
}

/// Compute the centroid of a set of points.
///
/// Returns zero for an empty set.
pub fn compute_centroid(points: &[[f64; 3]]) -> DVec3 {
    if points.is_empty() {
        return DVec3::ZERO;
    }
    let sum = points
        .iter()
        .fold(DVec3::ZERO, |acc, p| acc + DVec3::from_array(*p));
    sum / points.len() as f64
}

/// Compute the least-squares rigid transformation between two corresponding point sets.
///
/// Finds `R` and `t` minimizing `Σ |R * src_i + t - dst_i|²`:
///
/// 1. Compute the centroids of both sets.
/// 2. Build the cross-covariance `H = Σ (src_i - src_mean) * (dst_i - dst_mean)^T`.
/// 3. Decompose `H = U * S * V^T`.
/// 4. `R = V * U^T`, flipping the last column of `V` when `det(R) < 0`.
/// 5. `t = dst_mean - R * src_mean`.
///
/// For more details, see: Arun, K., Huang, T. S., and Blostein, S. D.
/// "Least-squares fitting of two 3-D point sets." IEEE PAMI, 1987.
///
/// # Arguments
///
/// * `points_src` - Source points.
/// * `points_dst` - Destination points, same length as `points_src`.
/// * `degeneracy_tolerance` - Minimum accepted ratio between the second and the
///   first singular value of `H`. Below it the rotation about the dominant axis
///   is undetermined and [`RigidFitError::Degenerate`] is returned.
pub fn fit_rigid_transform(
    points_src: &[[f64; 3]],
    points_dst: &[[f64; 3]],
    degeneracy_tolerance: f64,
) -> Result<RigidFit, RigidFitError> {
    if points_src.len() != points_dst.len() {
        return Err(RigidFitError::MismatchedInputLengths(
            points_src.len(),
            points_dst.len(),
        ));
    }
    if points_src.len() < MIN_RIGID_POINTS {
        return Err(RigidFitError::NotEnoughPoints {
            required: MIN_RIGID_POINTS,
            actual: points_src.len(),
        });
    }

    let src_centroid = compute_centroid(points_src);
    let dst_centroid = compute_centroid(points_dst);

    let mut h = DMat3::ZERO;
    for (p_src, p_dst) in points_src.iter().zip(points_dst.iter()) {
        let src_centered = DVec3::from_array(*p_src) - src_centroid;
        let dst_centered = DVec3::from_array(*p_dst) - dst_centroid;
        h += DMat3::from_cols(
            src_centered * dst_centered.x,
            src_centered * dst_centered.y,
            src_centered * dst_centered.z,
        );
    }

    let svd = svd3(&h);
    let ratio = svd.second_ratio();
    if ratio <= degeneracy_tolerance {
        return Err(RigidFitError::Degenerate { ratio });
    }

    let u = *svd.u();
    let v = *svd.v();

    let mut rotation = v * u.transpose();
    if rotation.determinant() < 0.0 {
        let v_corrected = DMat3::from_cols(v.x_axis, v.y_axis, -v.z_axis);
        rotation = v_corrected * u.transpose();
    }

    Ok(RigidFit {
        rotation,
        translation: dst_centroid - rotation * src_centroid,
        singular_values: *svd.s(),
    })
}
