use meshalign_3d::pca::PcaError;
use meshalign_linalg::rigid::RigidFitError;
use thiserror::Error;

/// Errors reported before registration starts.
///
/// Failures that happen while iterating are not errors; they are reported
/// through [`crate::RegistrationStatus`] together with the last valid transform.
#[derive(Debug, Error, PartialEq)]
pub enum IcpError {
    /// One of the input point sets is empty
    #[error("The {0} point set is empty")]
    EmptyPointSet(&'static str),

    /// One of the input point sets is too small to fix a rigid transform
    #[error("The {role} point set needs at least {required} points, got {actual}")]
    NotEnoughPoints {
        /// Which point set, `fixed` or `floating`.
        role: &'static str,
        /// Minimum number of points.
        required: usize,
        /// Number of points provided.
        actual: usize,
    },

    /// A point has a NaN or infinite coordinate
    #[error("The {role} point set has a non-finite coordinate at index {index}")]
    NonFinitePoint {
        /// Which point set, `fixed` or `floating`.
        role: &'static str,
        /// Index of the offending point.
        index: usize,
    },

    /// The configuration holds an invalid value
    #[error("Invalid ICP configuration: {0}")]
    InvalidConfig(String),

    /// The initial transform is not a proper rotation plus translation
    #[error("The initial transform is not rigid")]
    NonRigidInitialTransform,

    /// The least-squares rigid fit rejected its input
    #[error(transparent)]
    RigidFit(#[from] RigidFitError),

    /// Principal axis computation failed
    #[error(transparent)]
    Pca(#[from] PcaError),
}
