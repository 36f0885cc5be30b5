use glam::DVec3;
use meshalign_3d::{pointcloud::PointCloud, transforms::RigidTransform};
use meshalign_linalg::rigid::{fit_rigid_transform, RigidFitError, MIN_RIGID_POINTS};
use serde::{Deserialize, Serialize};

use crate::{
    ops::{find_correspondences, FixedTree},
    IcpConfig, IcpError,
};

/// Tolerance used to accept a caller supplied initial transform as rigid.
const RIGIDITY_TOLERANCE: f64 = 1e-6;

/// How the registration loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// The RMS residual dropped to the exit tolerance.
    Converged,
    /// The iteration limit was reached first. The transform is a best effort.
    IterationLimitReached,
    /// Too few correspondences survived the distance threshold.
    InsufficientOverlap,
    /// The correspondences are collinear or coincident and the rotation is undetermined.
    AmbiguousAlignment,
}

impl RegistrationStatus {
    /// Whether the transform can be applied to the floating geometry.
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Converged | Self::IterationLimitReached)
    }
}

/// Result of the ICP registration.
///
/// The transform maps the floating points onto the fixed points. For the
/// failure statuses it is the last transform accepted before the failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationResult {
    /// Accumulated floating to fixed transform.
    pub transform: RigidTransform,
    /// Termination status.
    pub status: RegistrationStatus,
    /// Number of correspondence searches performed.
    pub iterations: usize,
    /// RMS residual after the last applied update, `None` if no update was applied.
    pub rmse: Option<f64>,
    /// Mean residual distance after the last applied update, `None` if no update was applied.
    pub mean_residual: Option<f64>,
    /// Surviving correspondences in the last iteration.
    pub num_correspondences: usize,
}

fn check_point_set(points: &[[f64; 3]], role: &'static str) -> Result<(), IcpError> {
    if points.is_empty() {
        return Err(IcpError::EmptyPointSet(role));
    }
    if points.len() < MIN_RIGID_POINTS {
        return Err(IcpError::NotEnoughPoints {
            role,
            required: MIN_RIGID_POINTS,
            actual: points.len(),
        });
    }
    if let Some(index) = points
        .iter()
        .position(|p| p.iter().any(|v| !v.is_finite()))
    {
        return Err(IcpError::NonFinitePoint { role, index });
    }
    Ok(())
}

/// Rigidly register the floating points onto the fixed points with point-to-point ICP.
///
/// Each iteration transforms the original floating points with the
/// accumulated transform, pairs them with their nearest fixed point, drops
/// pairs further apart than the distance threshold and fits the least-squares
/// rigid increment, which is composed on the left of the accumulated transform.
/// The loop stops when the RMS residual of the surviving pairs after the
/// increment is at most the exit tolerance, when the iteration limit is
/// reached, or when the correspondences cannot fix a rotation.
///
/// # Arguments
///
/// * `fixed` - Reference points, left untouched.
/// * `floating` - Points to align onto `fixed`.
/// * `initial` - Starting floating to fixed transform.
/// * `config` - Registration parameters.
///
/// # Returns
///
/// The registration result, or an error if the inputs are unusable. Running
/// out of overlap or hitting a degenerate configuration is reported through
/// [`RegistrationStatus`], not as an error.
///
/// Example:
/// ```
/// use meshalign_3d::transforms::RigidTransform;
/// use meshalign_icp::{compute_registration, IcpConfig, RegistrationStatus};
///
/// let fixed = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 3.0]];
/// let floating = fixed.iter().map(|p| [p[0] + 0.1, p[1], p[2]]).collect::<Vec<_>>();
///
/// let result =
///     compute_registration(&fixed, &floating, &RigidTransform::IDENTITY, &IcpConfig::new(1e-9))?;
/// assert_eq!(result.status, RegistrationStatus::Converged);
/// assert!((result.transform.translation[0] + 0.1).abs() < 1e-9);
/// # Ok::<(), meshalign_icp::IcpError>(())
/// ```
pub fn compute_registration(
    fixed: &[[f64; 3]],
    floating: &[[f64; 3]],
    initial: &RigidTransform,
    config: &IcpConfig,
) -> Result<RegistrationResult, IcpError> {
    config.validate()?;
    check_point_set(fixed, "fixed")?;
    check_point_set(floating, "floating")?;
    if !initial.is_rigid(RIGIDITY_TOLERANCE) {
        return Err(IcpError::NonRigidInitialTransform);
    }

    // the tree over the fixed points is built once and only read afterwards
    let kdtree = FixedTree::new_from_slice(fixed);

    let mut result = RegistrationResult {
        transform: initial.orthonormalized(),
        status: RegistrationStatus::IterationLimitReached,
        iterations: 0,
        rmse: None,
        mean_residual: None,
        num_correspondences: 0,
    };

    for iteration in 1..=config.iteration_limit {
        let now = std::time::Instant::now();
        result.iterations = iteration;

        let current = result.transform.transform_points(floating);
        let matches =
            find_correspondences(&current, fixed, &kdtree, config.distance_threshold_sq);
        result.num_correspondences = matches.len();

        if matches.len() < config.min_correspondences {
            log::warn!(
                "ICP stopped at iteration {}: {} correspondences within the distance threshold, {} required",
                iteration,
                matches.len(),
                config.min_correspondences
            );
            result.status = RegistrationStatus::InsufficientOverlap;
            return Ok(result);
        }

        let fit = match fit_rigid_transform(
            &matches.floating,
            &matches.fixed,
            config.degeneracy_tolerance,
        ) {
            Ok(fit) => fit,
            Err(RigidFitError::Degenerate { ratio }) => {
                log::warn!(
                    "ICP stopped at iteration {}: correspondences are degenerate (singular value ratio {:e})",
                    iteration,
                    ratio
                );
                result.status = RegistrationStatus::AmbiguousAlignment;
                return Ok(result);
            }
            Err(err) => return Err(err.into()),
        };

        // residuals of the surviving pairs once the increment is applied
        let (sum_sq, sum) = matches
            .floating
            .iter()
            .zip(matches.fixed.iter())
            .map(|(p, q)| {
                let d = (fit.rotation * DVec3::from_array(*p) + fit.translation)
                    .distance_squared(DVec3::from_array(*q));
                (d, d.sqrt())
            })
            .fold((0.0, 0.0), |(acc_sq, acc), (d_sq, d)| (acc_sq + d_sq, acc + d));
        let n = matches.len() as f64;
        let rmse = (sum_sq / n).sqrt();
        let mean_residual = sum / n;
        result.rmse = Some(rmse);
        result.mean_residual = Some(mean_residual);

        let increment = RigidTransform::from_glam(&fit.rotation, fit.translation);
        result.transform = increment.compose(&result.transform).orthonormalized();

        log::debug!(
            "iteration {}: {} correspondences, rmse {:.6e} -> {:.6e}, mean residual {:.6e}, step angle {:.3e} rad, elapsed {:?}",
            iteration,
            matches.len(),
            matches.rmse(),
            rmse,
            mean_residual,
            increment.rotation_angle(),
            now.elapsed()
        );

        if rmse <= config.exit_tolerance {
            log::info!(
                "ICP converged in {} iterations with rmse {:.6e}",
                iteration,
                rmse
            );
            result.status = RegistrationStatus::Converged;
            return Ok(result);
        }
    }

    log::info!(
        "ICP reached the iteration limit ({}) with rmse {:?}",
        config.iteration_limit,
        result.rmse
    );
    Ok(result)
}

/// Register two point clouds, see [`compute_registration`].
pub fn register_point_clouds(
    fixed: &PointCloud,
    floating: &PointCloud,
    initial: &RigidTransform,
    config: &IcpConfig,
) -> Result<RegistrationResult, IcpError> {
    compute_registration(fixed.points(), floating.points(), initial, config)
}
