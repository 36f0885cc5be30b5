use glam::{DMat3, DQuat, DVec3};
use meshalign_linalg::{eigen::symmetric_eigen3, rigid::compute_centroid};
use thiserror::Error;

use crate::transforms::RigidTransform;

/// Error type for principal component analysis.
#[derive(Debug, Error, PartialEq)]
pub enum PcaError {
    /// The point set is empty
    #[error("Cannot compute principal axes of an empty point set")]
    EmptyPointSet,

    /// The requested target direction has zero length
    #[error("Target axis must be a non-zero vector")]
    ZeroTargetAxis,
}

/// Principal axes of a point set.
#[derive(Debug, Clone, Copy)]
pub struct PrincipalAxes {
    /// Mean of the points.
    pub centroid: DVec3,
    /// Variances along each axis, in descending order.
    pub eigenvalues: DVec3,
    /// Unit axes as matrix columns, matching `eigenvalues`.
    ///
    /// The first two axes are oriented so that their largest component is
    /// positive and the third completes a right handed frame.
    pub axes: DMat3,
}

impl PrincipalAxes {
    /// The direction of largest variance.
    pub fn major_axis(&self) -> DVec3 {
        self.axes.x_axis
    }
}

/// Flip `v` so that its component of largest magnitude is positive.
fn canonical_sign(v: DVec3) -> DVec3 {
    let largest = v
        .to_array()
        .into_iter()
        .max_by(|a, b| a.abs().total_cmp(&b.abs()))
        .unwrap_or(0.0);
    if largest < 0.0 {
        -v
    } else {
        v
    }
}

/// Compute the principal axes of `points` from their covariance matrix.
///
/// # Arguments
///
/// * `points` - The point set, must not be empty.
///
/// # Returns
///
/// The centroid together with the eigen-decomposition of the covariance.
pub fn principal_axes(points: &[[f64; 3]]) -> Result<PrincipalAxes, PcaError> {
    if points.is_empty() {
        return Err(PcaError::EmptyPointSet);
    }

    let centroid = compute_centroid(points);
    let covariance = points
        .iter()
        .map(|p| {
            let d = DVec3::from_array(*p) - centroid;
            DMat3::from_cols(d * d.x, d * d.y, d * d.z)
        })
        .fold(DMat3::ZERO, |acc, m| acc + m)
        * (1.0 / points.len() as f64);

    let eig = symmetric_eigen3(&covariance);
    let first = canonical_sign(eig.vectors.x_axis);
    let second = canonical_sign(eig.vectors.y_axis);

    Ok(PrincipalAxes {
        centroid,
        eigenvalues: eig.values,
        axes: DMat3::from_cols(first, second, first.cross(second)),
    })
}

/// Rigid rotation about the centroid that brings the major axis of `points` onto `target`.
///
/// The rotation is the shortest arc between the two directions, so no twist
/// is applied about the target axis. The centroid is left in place.
///
/// Example:
/// ```
/// use meshalign_3d::pca::align_principal_axis;
///
/// let points: Vec<[f64; 3]> = (0..10).map(|i| [i as f64, 0.0, 0.0]).collect();
/// let xf = align_principal_axis(&points, [0.0, 0.0, 1.0]).unwrap();
/// let end = xf.apply(&[9.0, 0.0, 0.0]);
/// assert!((end[0] - 4.5).abs() < 1e-9);
/// assert!((end[2] - 4.5).abs() < 1e-9);
/// ```
pub fn align_principal_axis(
    points: &[[f64; 3]],
    target: [f64; 3],
) -> Result<RigidTransform, PcaError> {
    let target = DVec3::from_array(target);
    if target.length_squared() == 0.0 || !target.is_finite() {
        return Err(PcaError::ZeroTargetAxis);
    }

    let pca = principal_axes(points)?;
    let rotation = DMat3::from_quat(DQuat::from_rotation_arc(
        pca.major_axis(),
        target.normalize(),
    ));
    log::debug!(
        "aligning major axis {:?} (variance {:.6}) with {:?}",
        pca.major_axis(),
        pca.eigenvalues.x,
        target
    );

    let center = pca.centroid;
    Ok(RigidTransform::from_glam(&rotation, center - rotation * center))
}
