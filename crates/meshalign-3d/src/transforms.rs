use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::linalg::{rotation_from_rows, rotation_to_rows, transform_points};

/// Error type for transform conversions.
#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    /// The rotation axis has zero length
    #[error("cannot compute rotation matrix from a zero vector")]
    ZeroAxis,
}

/// Compute the rotation matrix from an axis and angle.
///
/// # Arguments
///
/// * `axis` - The axis of rotation. It does not need to be normalized.
/// * `angle` - The angle of rotation in radians.
///
/// # Returns
///
/// The row-major rotation matrix.
///
/// Example:
///
/// ```
/// use meshalign_3d::transforms::axis_angle_to_rotation_matrix;
///
/// let axis = [1.0, 0.0, 0.0];
/// let angle = std::f64::consts::PI / 2.0;
/// let rotation = axis_angle_to_rotation_matrix(&axis, angle).unwrap();
/// assert!((rotation[1][2] + 1.0).abs() < 1e-12);
/// ```
pub fn axis_angle_to_rotation_matrix(
    axis: &[f64; 3],
    angle: f64,
) -> Result<[[f64; 3]; 3], TransformError> {
    let magnitude = (axis[0].powi(2) + axis[1].powi(2) + axis[2].powi(2)).sqrt();
    if magnitude < 1e-10 {
        return Err(TransformError::ZeroAxis);
    }

    let [x, y, z] = axis.map(|v| v / magnitude);

    let c = angle.cos();
    let s = angle.sin();
    let t = 1.0 - c;

    Ok([
        [c + x * x * t, x * y * t - z * s, x * z * t + y * s],
        [x * y * t + z * s, c + y * y * t, y * z * t - x * s],
        [x * z * t - y * s, y * z * t + x * s, c + z * z * t],
    ])
}

/// Convert a rotation matrix into its axis-angle representation.
///
/// # Returns
///
/// The unit rotation axis and the angle in `[0, π]`. The identity maps to the x axis with a zero angle.
pub fn rotation_matrix_to_axis_angle(rotation: &[[f64; 3]; 3]) -> ([f64; 3], f64) {
    let r = rotation;
    let skew = DVec3::new(r[2][1] - r[1][2], r[0][2] - r[2][0], r[1][0] - r[0][1]);
    let cos_angle = 0.5 * (r[0][0] + r[1][1] + r[2][2] - 1.0);
    let sin_angle = 0.5 * skew.length();
    let angle = sin_angle.atan2(cos_angle);

    if angle < 1e-12 {
        return ([1.0, 0.0, 0.0], 0.0);
    }

    if sin_angle > 1e-6 {
        return (skew.normalize().to_array(), angle);
    }

    // close to pi the skew part vanishes, recover the axis from the symmetric part
    let k = (0..3)
        .max_by(|&a, &b| r[a][a].total_cmp(&r[b][b]))
        .unwrap_or(0);
    let mut axis = DVec3::ZERO;
    let xk = ((r[k][k] + 1.0) * 0.5).max(0.0).sqrt();
    axis[k] = xk;
    for j in (0..3).filter(|&j| j != k) {
        axis[j] = (r[k][j] + r[j][k]) / (4.0 * xk);
    }
    (axis.normalize().to_array(), angle)
}

/// A rigid transformation made of a rotation and a translation.
///
/// Points are mapped as `p' = R * p + t`. The rotation is stored row major.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    /// Row-major rotation matrix.
    pub rotation: [[f64; 3]; 3],
    /// Translation vector.
    pub translation: [f64; 3],
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RigidTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        translation: [0.0, 0.0, 0.0],
    };

    /// Create a transform from a row-major rotation and a translation.
    pub fn new(rotation: [[f64; 3]; 3], translation: [f64; 3]) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// A pure translation.
    pub fn from_translation(translation: [f64; 3]) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// A pure rotation about the origin.
    pub fn from_rotation(rotation: [[f64; 3]; 3]) -> Self {
        Self {
            rotation,
            translation: [0.0; 3],
        }
    }

    /// A rotation about `center`: `p' = R * (p - c) + c`.
    pub fn from_rotation_about(rotation: [[f64; 3]; 3], center: [f64; 3]) -> Self {
        let r = rotation_from_rows(&rotation);
        let c = DVec3::from_array(center);
        Self::from_glam(&r, c - r * c)
    }

    /// Create a transform from glam types.
    pub fn from_glam(rotation: &DMat3, translation: DVec3) -> Self {
        Self {
            rotation: rotation_to_rows(rotation),
            translation: translation.to_array(),
        }
    }

    /// The rotation as a glam matrix.
    pub fn rotation_mat(&self) -> DMat3 {
        rotation_from_rows(&self.rotation)
    }

    /// The translation as a glam vector.
    pub fn translation_vec(&self) -> DVec3 {
        DVec3::from_array(self.translation)
    }

    /// Compose two transforms, `other` is applied first.
    ///
    /// `(self ∘ other)(p) = self(other(p))`.
    pub fn compose(&self, other: &RigidTransform) -> RigidTransform {
        let r_self = self.rotation_mat();
        let rotation = r_self * other.rotation_mat();
        let translation = r_self * other.translation_vec() + self.translation_vec();
        Self::from_glam(&rotation, translation)
    }

    /// The inverse transform.
    pub fn inverse(&self) -> RigidTransform {
        let r_inv = self.rotation_mat().transpose();
        Self::from_glam(&r_inv, -(r_inv * self.translation_vec()))
    }

    /// Apply the transform to a single point.
    pub fn apply(&self, point: &[f64; 3]) -> [f64; 3] {
        (self.rotation_mat() * DVec3::from_array(*point) + self.translation_vec()).to_array()
    }

    /// Apply the transform to a set of points, returning the transformed copy.
    pub fn transform_points(&self, points: &[[f64; 3]]) -> Vec<[f64; 3]> {
        let mut dst_points = vec![[0.0; 3]; points.len()];
        transform_points(points, &self.rotation, &self.translation, &mut dst_points);
        dst_points
    }

    /// The 4x4 homogeneous matrix, row major.
    pub fn to_homogeneous(&self) -> [[f64; 4]; 4] {
        let r = &self.rotation;
        let t = &self.translation;
        [
            [r[0][0], r[0][1], r[0][2], t[0]],
            [r[1][0], r[1][1], r[1][2], t[1]],
            [r[2][0], r[2][1], r[2][2], t[2]],
            [0.0, 0.0, 0.0, 1.0],
        ]
    }

    /// The rotation angle in radians, in `[0, π]`.
    pub fn rotation_angle(&self) -> f64 {
        rotation_matrix_to_axis_angle(&self.rotation).1
    }

    /// Norm of the translation vector.
    pub fn translation_norm(&self) -> f64 {
        self.translation_vec().length()
    }

    /// Project the rotation back onto an orthonormal basis.
    ///
    /// Repeated compositions slowly accumulate floating point drift; the first
    /// two columns are re-orthogonalised with Gram-Schmidt and the third is
    /// rebuilt with a cross product, which keeps the determinant at +1.
    pub fn orthonormalized(&self) -> RigidTransform {
        let r = self.rotation_mat();
        let x = r.x_axis.normalize();
        let y = (r.y_axis - x * x.dot(r.y_axis)).normalize();
        let z = x.cross(y);
        Self::from_glam(&DMat3::from_cols(x, y, z), self.translation_vec())
    }

    /// Whether the rotation is orthonormal with determinant +1 within `tolerance`.
    pub fn is_rigid(&self, tolerance: f64) -> bool {
        let r = self.rotation_mat();
        (r.transpose() * r).abs_diff_eq(DMat3::IDENTITY, tolerance)
            && (r.determinant() - 1.0).abs() <= tolerance
    }
}
