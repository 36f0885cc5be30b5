#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Rigid registration
//!
//! Aligns a *floating* point set onto a *fixed* one by alternating nearest
//! neighbour search and least-squares rigid fitting. The fixed points are
//! indexed once in a k-d tree and searched in parallel.
//!
//! ```rust
//! use meshalign_3d::transforms::{axis_angle_to_rotation_matrix, RigidTransform};
//! use meshalign_icp::{compute_registration, IcpConfig, RegistrationStatus};
//!
//! let fixed = (0..100)
//!     .map(|i| {
//!         let (x, y) = ((i % 10) as f64 * 0.1, (i / 10) as f64 * 0.1);
//!         [x, y, 0.2 * (3.0 * x).sin() * (2.0 * y).cos()]
//!     })
//!     .collect::<Vec<_>>();
//!
//! let moved = RigidTransform::new(
//!     axis_angle_to_rotation_matrix(&[0.0, 0.0, 1.0], 0.02)?,
//!     [0.01, 0.0, 0.0],
//! );
//! let floating = moved.transform_points(&fixed);
//!
//! let result = compute_registration(
//!     &fixed,
//!     &floating,
//!     &RigidTransform::IDENTITY,
//!     &IcpConfig::new(1e-9).with_distance_threshold(0.5),
//! )?;
//!
//! assert!(result.status.is_usable());
//! println!("{} iterations, rmse {:?}", result.iterations, result.rmse);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
pub use config::*;

mod error;
pub use error::IcpError;

/// Starting pose heuristics.
pub mod init;
pub use init::{initial_transform, InitialAlignment};

mod ops;

mod registration;
pub use registration::*;
