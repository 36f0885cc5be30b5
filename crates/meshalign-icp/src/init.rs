use std::{fmt, str::FromStr};

use meshalign_3d::{pca, transforms::RigidTransform};
use meshalign_linalg::rigid::compute_centroid;
use serde::{Deserialize, Serialize};

use crate::IcpError;

/// Strategy for the starting pose of the registration.
///
/// Point-to-point ICP only converges to the nearest local minimum, so the
/// floating geometry should start roughly aligned with the fixed one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialAlignment {
    /// Start from the identity.
    #[default]
    Identity,
    /// Translate the floating centroid onto the fixed centroid.
    Centroid,
    /// Match the centroids and rotate the floating major principal axis onto the fixed one.
    PrincipalAxis,
}

impl FromStr for InitialAlignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identity" => Ok(Self::Identity),
            "centroid" => Ok(Self::Centroid),
            "pca" | "principal_axis" => Ok(Self::PrincipalAxis),
            _ => Err(format!(
                "unknown initial alignment '{s}', expected identity, centroid or pca"
            )),
        }
    }
}

impl fmt::Display for InitialAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Identity => "identity",
            Self::Centroid => "centroid",
            Self::PrincipalAxis => "pca",
        };
        f.write_str(name)
    }
}

/// Compute a starting floating to fixed transform.
///
/// # Arguments
///
/// * `fixed` - Reference points.
/// * `floating` - Points to align onto `fixed`.
/// * `mode` - The alignment strategy.
pub fn initial_transform(
    fixed: &[[f64; 3]],
    floating: &[[f64; 3]],
    mode: InitialAlignment,
) -> Result<RigidTransform, IcpError> {
    if mode == InitialAlignment::Identity {
        return Ok(RigidTransform::IDENTITY);
    }
    if fixed.is_empty() {
        return Err(IcpError::EmptyPointSet("fixed"));
    }
    if floating.is_empty() {
        return Err(IcpError::EmptyPointSet("floating"));
    }

    let offset = compute_centroid(fixed) - compute_centroid(floating);
    let to_fixed_centroid = RigidTransform::from_translation(offset.to_array());

    let transform = match mode {
        InitialAlignment::PrincipalAxis => {
            // the rotation is about the floating centroid, which stays in place
            let fixed_axis = pca::principal_axes(fixed)?.major_axis();
            let rotation = pca::align_principal_axis(floating, fixed_axis.to_array())?;
            to_fixed_centroid.compose(&rotation)
        }
        _ => to_fixed_centroid,
    };

    log::debug!(
        "initial alignment {}: translation {:?}, rotation angle {:.4} rad",
        mode,
        transform.translation,
        transform.rotation_angle()
    );
    Ok(transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use meshalign_3d::transforms::axis_angle_to_rotation_matrix;

    fn rod() -> Vec<[f64; 3]> {
        (0..20)
            .flat_map(|i| {
                let x = i as f64 * 0.2;
                [[x, 0.1, 0.0], [x, -0.1, 0.0], [x, 0.0, 0.05]]
            })
            .collect()
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "identity".parse::<InitialAlignment>(),
            Ok(InitialAlignment::Identity)
        );
        assert_eq!(
            "centroid".parse::<InitialAlignment>(),
            Ok(InitialAlignment::Centroid)
        );
        assert_eq!(
            "pca".parse::<InitialAlignment>(),
            Ok(InitialAlignment::PrincipalAxis)
        );
        assert!("global".parse::<InitialAlignment>().is_err());
        assert_eq!(InitialAlignment::PrincipalAxis.to_string(), "pca");
    }

    #[test]
    fn test_identity() -> Result<(), IcpError> {
        let xf = initial_transform(&[], &[], InitialAlignment::Identity)?;
        assert_eq!(xf, RigidTransform::IDENTITY);
        Ok(())
    }

    #[test]
    fn test_centroid() -> Result<(), IcpError> {
        let fixed = rod();
        let floating = RigidTransform::from_translation([1.0, 2.0, 3.0]).transform_points(&fixed);
        let xf = initial_transform(&fixed, &floating, InitialAlignment::Centroid)?;
        for (t, expected) in xf.translation.iter().zip([-1.0, -2.0, -3.0]) {
            assert_relative_eq!(*t, expected, epsilon = 1e-12);
        }
        assert!(matches!(
            initial_transform(&fixed, &[], InitialAlignment::Centroid),
            Err(IcpError::EmptyPointSet("floating"))
        ));
        Ok(())
    }

    #[test]
    fn test_principal_axis() -> Result<(), Box<dyn std::error::Error>> {
        let fixed = rod();
        let rotation = axis_angle_to_rotation_matrix(&[0.0, 0.0, 1.0], 1.2)?;
        let floating = RigidTransform::new(rotation, [0.5, -1.0, 2.0]).transform_points(&fixed);

        let xf = initial_transform(&fixed, &floating, InitialAlignment::PrincipalAxis)?;
        let aligned = xf.transform_points(&floating);

        let fixed_pca = pca::principal_axes(&fixed)?;
        let aligned_pca = pca::principal_axes(&aligned)?;
        assert!(aligned_pca.centroid.abs_diff_eq(fixed_pca.centroid, 1e-9));
        assert!(aligned_pca
            .major_axis()
            .abs_diff_eq(fixed_pca.major_axis(), 1e-9));
        Ok(())
    }
}
