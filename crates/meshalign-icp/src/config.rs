use meshalign_linalg::rigid::MIN_RIGID_POINTS;
use serde::{Deserialize, Serialize};

use crate::IcpError;

/// Fraction of the bounding box diagonal used as sampling voxel size.
pub const VOXEL_SIZE_RATIO: f64 = 0.01;

/// Fraction of the bounding box diagonal used as correspondence distance threshold.
pub const DISTANCE_THRESHOLD_RATIO: f64 = 0.1;

fn default_sampling_voxel_size() -> f64 {
    VOXEL_SIZE_RATIO
}

fn default_distance_threshold_sq() -> f64 {
    DISTANCE_THRESHOLD_RATIO * DISTANCE_THRESHOLD_RATIO
}

fn default_iteration_limit() -> usize {
    100
}

fn default_min_correspondences() -> usize {
    MIN_RIGID_POINTS
}

fn default_degeneracy_tolerance() -> f64 {
    1e-6
}

/// Parameters of the ICP registration.
///
/// The exit tolerance has no default and must always be supplied by the
/// caller. The remaining defaults describe a model whose bounding box
/// diagonal is about one unit; use [`IcpConfig::from_diagonal`] to scale
/// them to the actual geometry.
///
/// When deserialized, every field except `exit_tolerance` may be omitted:
///
/// ```
/// use meshalign_icp::IcpConfig;
///
/// let config: IcpConfig = serde_json::from_str(r#"{ "exit_tolerance": 1e-4 }"#).unwrap();
/// assert_eq!(config.iteration_limit, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcpConfig {
    /// Voxel size used to sample the input geometry before registration.
    ///
    /// Not read by the registration loop itself.
    #[serde(default = "default_sampling_voxel_size")]
    pub sampling_voxel_size: f64,
    /// Correspondences with a larger squared distance are discarded.
    #[serde(default = "default_distance_threshold_sq")]
    pub distance_threshold_sq: f64,
    /// Registration converges once the RMS residual drops to this value.
    pub exit_tolerance: f64,
    /// Maximum number of iterations.
    #[serde(default = "default_iteration_limit")]
    pub iteration_limit: usize,
    /// Fewer surviving correspondences abort with insufficient overlap.
    #[serde(default = "default_min_correspondences")]
    pub min_correspondences: usize,
    /// Minimum ratio between the second and first singular value of the
    /// correspondence cross-covariance before the alignment is ambiguous.
    #[serde(default = "default_degeneracy_tolerance")]
    pub degeneracy_tolerance: f64,
}

impl IcpConfig {
    /// Create a configuration with the given exit tolerance and default values elsewhere.
    pub fn new(exit_tolerance: f64) -> Self {
        Self {
            sampling_voxel_size: default_sampling_voxel_size(),
            distance_threshold_sq: default_distance_threshold_sq(),
            exit_tolerance,
            iteration_limit: default_iteration_limit(),
            min_correspondences: default_min_correspondences(),
            degeneracy_tolerance: default_degeneracy_tolerance(),
        }
    }

    /// Derive the parameters from the bounding box diagonal of the fixed geometry.
    ///
    /// The voxel size is 1% of the diagonal, the distance threshold 10% of the
    /// diagonal and the exit tolerance `exit_ratio` times the diagonal.
    ///
    /// # Arguments
    ///
    /// * `diagonal` - Bounding box diagonal of the fixed geometry.
    /// * `exit_ratio` - Exit tolerance as a fraction of the diagonal.
    pub fn from_diagonal(diagonal: f64, exit_ratio: f64) -> Self {
        let threshold = DISTANCE_THRESHOLD_RATIO * diagonal;
        Self {
            sampling_voxel_size: VOXEL_SIZE_RATIO * diagonal,
            distance_threshold_sq: threshold * threshold,
            ..Self::new(exit_ratio * diagonal)
        }
    }

    /// Set the correspondence distance threshold from an unsquared distance.
    pub fn with_distance_threshold(mut self, distance: f64) -> Self {
        self.distance_threshold_sq = distance * distance;
        self
    }

    /// Set the maximum number of iterations.
    pub fn with_iteration_limit(mut self, iteration_limit: usize) -> Self {
        self.iteration_limit = iteration_limit;
        self
    }

    /// Check that every parameter is finite and in range.
    pub fn validate(&self) -> Result<(), IcpError> {
        let positive = [
            ("sampling_voxel_size", self.sampling_voxel_size),
            ("distance_threshold_sq", self.distance_threshold_sq),
            ("exit_tolerance", self.exit_tolerance),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(IcpError::InvalidConfig(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }

        if self.iteration_limit == 0 {
            return Err(IcpError::InvalidConfig(
                "iteration_limit must be at least 1".to_string(),
            ));
        }

        if self.min_correspondences < MIN_RIGID_POINTS {
            return Err(IcpError::InvalidConfig(format!(
                "min_correspondences must be at least {MIN_RIGID_POINTS}, got {}",
                self.min_correspondences
            )));
        }

        if !(0.0..1.0).contains(&self.degeneracy_tolerance) {
            return Err(IcpError::InvalidConfig(format!(
                "degeneracy_tolerance must be in [0, 1), got {}",
                self.degeneracy_tolerance
            )));
        }

        Ok(())
    }
}
