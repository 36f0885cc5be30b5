use std::collections::HashMap;

use glam::DVec3;
use thiserror::Error;

use crate::{mesh::TriangleMesh, pointcloud::PointCloud};

/// Error type for voxel sampling.
#[derive(Debug, Error, PartialEq)]
pub enum SamplingError {
    /// The voxel size is zero, negative or not finite
    #[error("Voxel size must be finite and positive, got {0}")]
    InvalidVoxelSize(f64),
}

/// A voxel grid for reducing point sets to one representative per cell.
///
/// Points falling in the same cubic cell are replaced by their centroid.
/// Output points follow the order in which cells are first occupied, so the
/// result is deterministic for a given input order.
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    voxel_size: f64,
}

impl VoxelGrid {
    /// Create a new voxel grid with cubic cells of side `voxel_size`.
    pub fn new(voxel_size: f64) -> Result<Self, SamplingError> {
        if !voxel_size.is_finite() || voxel_size <= 0.0 {
            return Err(SamplingError::InvalidVoxelSize(voxel_size));
        }
        Ok(Self { voxel_size })
    }

    /// The cell side length.
    pub fn voxel_size(&self) -> f64 {
        self.voxel_size
    }

    /// Compute the voxel index for a given point.
    fn voxel_index(&self, point: &[f64; 3]) -> [i64; 3] {
        point.map(|v| (v / self.voxel_size).floor() as i64)
    }

    /// Downsample the points by averaging the points in each voxel.
    pub fn downsample(&self, points: &[[f64; 3]]) -> Vec<[f64; 3]> {
        let mut cells: HashMap<[i64; 3], usize> = HashMap::new();
        let mut accumulators: Vec<(DVec3, usize)> = Vec::new();

        for point in points {
            let slot = *cells.entry(self.voxel_index(point)).or_insert_with(|| {
                accumulators.push((DVec3::ZERO, 0));
                accumulators.len() - 1
            });
            let (sum, count) = &mut accumulators[slot];
            *sum += DVec3::from_array(*point);
            *count += 1;
        }

        accumulators
            .into_iter()
            .map(|(sum, count)| (sum / count as f64).to_array())
            .collect()
    }
}

/// Reduce `points` to at most one point per voxel of side `voxel_size`.
///
/// Example:
/// ```
/// use meshalign_3d::sampling::voxel_downsample;
///
/// let points = vec![[0.1, 0.1, 0.1], [0.3, 0.3, 0.3], [1.5, 0.0, 0.0]];
/// let sampled = voxel_downsample(&points, 1.0).unwrap();
/// assert_eq!(sampled.len(), 2);
/// ```
pub fn voxel_downsample(
    points: &[[f64; 3]],
    voxel_size: f64,
) -> Result<Vec<[f64; 3]>, SamplingError> {
    Ok(VoxelGrid::new(voxel_size)?.downsample(points))
}

/// Sample the surface of a triangle mesh uniformly at the resolution of `voxel_size`.
///
/// Every triangle is covered by a barycentric lattice whose spacing is at most
/// half the voxel size, then the samples are reduced with a [`VoxelGrid`].
/// Large triangles therefore contribute points proportionally to their area
/// instead of only their three corners.
pub fn sample_mesh_surface(
    mesh: &TriangleMesh,
    voxel_size: f64,
) -> Result<PointCloud, SamplingError> {
    let grid = VoxelGrid::new(voxel_size)?;
    let spacing = 0.5 * voxel_size;

    let mut samples = Vec::with_capacity(mesh.vertices().len());
    for triangle in mesh.triangles() {
        let [a, b, c] = triangle.map(DVec3::from_array);
        let longest = (b - a)
            .length()
            .max((c - a).length())
            .max((c - b).length());
        let steps = ((longest / spacing).ceil() as usize).max(1);

        let ab = (b - a) / steps as f64;
        let ac = (c - a) / steps as f64;
        for i in 0..=steps {
            for j in 0..=(steps - i) {
                samples.push((a + ab * i as f64 + ac * j as f64).to_array());
            }
        }
    }

    // isolated vertices are not covered by any triangle
    if mesh.num_triangles() == 0 {
        samples.extend_from_slice(mesh.vertices());
    }

    let points = grid.downsample(&samples);
    log::debug!(
        "sampled {} surface points ({} candidates) at voxel size {}",
        points.len(),
        samples.len(),
        voxel_size
    );
    Ok(PointCloud::from_points(points))
}

/// Sample a point cloud at the resolution of `voxel_size`.
pub fn sample_point_cloud(
    cloud: &PointCloud,
    voxel_size: f64,
) -> Result<PointCloud, SamplingError> {
    Ok(PointCloud::from_points(voxel_downsample(
        cloud.points(),
        voxel_size,
    )?))
}
