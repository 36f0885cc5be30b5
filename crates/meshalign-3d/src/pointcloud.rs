use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::transforms::RigidTransform;

/// A point cloud.
///
/// Serializes as a plain array of `[x, y, z]` triples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointCloud {
    // The points in the point cloud.
    points: Vec<[f64; 3]>,
}

impl PointCloud {
    /// Create a new point cloud from its points.
    pub fn from_points(points: Vec<[f64; 3]>) -> Self {
        Self { points }
    }

    /// Get the number of points in the point cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get as reference the points in the point cloud.
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Consume the point cloud and return its points.
    pub fn into_points(self) -> Vec<[f64; 3]> {
        self.points
    }

    /// Get the minimum bound of the point cloud.
    pub fn get_min_bound(&self) -> DVec3 {
        self.points
            .iter()
            .map(|p| DVec3::from_array(*p))
            .reduce(|a, b| a.min(b))
            .unwrap_or(DVec3::ZERO)
    }

    /// Get the maximum bound of the point cloud.
    pub fn get_max_bound(&self) -> DVec3 {
        self.points
            .iter()
            .map(|p| DVec3::from_array(*p))
            .reduce(|a, b| a.max(b))
            .unwrap_or(DVec3::ZERO)
    }

    /// Length of the bounding box diagonal.
    pub fn diagonal(&self) -> f64 {
        (self.get_max_bound() - self.get_min_bound()).length()
    }

    /// Mean of the points, zero for an empty cloud.
    pub fn centroid(&self) -> DVec3 {
        meshalign_linalg::rigid::compute_centroid(&self.points)
    }

    /// Return a copy of the cloud with `transform` applied to every point.
    pub fn transformed(&self, transform: &RigidTransform) -> PointCloud {
        PointCloud::from_points(transform.transform_points(&self.points))
    }
}

impl From<Vec<[f64; 3]>> for PointCloud {
    fn from(points: Vec<[f64; 3]>) -> Self {
        Self::from_points(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pointcloud() {
        let pointcloud = PointCloud::from_points(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);

        assert_eq!(pointcloud.len(), 2);
        assert!(!pointcloud.is_empty());
        assert_eq!(pointcloud.points().len(), 2);

        if let Some(p1) = pointcloud.points().last() {
            assert_eq!(*p1, [1.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn test_bounds() {
        let pointcloud =
            PointCloud::from_points(vec![[1.0, -2.0, 0.5], [-1.0, 3.0, 0.0], [0.0, 0.0, 2.5]]);
        assert_eq!(pointcloud.get_min_bound(), DVec3::new(-1.0, -2.0, 0.0));
        assert_eq!(pointcloud.get_max_bound(), DVec3::new(1.0, 3.0, 2.5));
        assert_relative_eq!(pointcloud.diagonal(), (4.0f64 + 25.0 + 6.25).sqrt());

        let empty = PointCloud::default();
        assert_eq!(empty.get_min_bound(), DVec3::ZERO);
        assert_eq!(empty.diagonal(), 0.0);
    }

    #[test]
    fn test_transformed_keeps_original() {
        let pointcloud = PointCloud::from_points(vec![[1.0, 0.0, 0.0]]);
        let xf = RigidTransform::new(
            [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            [0.0, 0.0, 5.0],
        );
        let moved = pointcloud.transformed(&xf);

        assert_eq!(moved.points(), &[[0.0, 1.0, 5.0]]);
        assert_eq!(pointcloud.points(), &[[1.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_json_layout() -> Result<(), serde_json::Error> {
        let pointcloud = PointCloud::from_points(vec![[1.0, 2.0, 3.0], [-0.5, 0.0, 4.0]]);
        let json = serde_json::to_string(&pointcloud)?;
        assert_eq!(json, "[[1.0,2.0,3.0],[-0.5,0.0,4.0]]");

        let parsed: PointCloud = serde_json::from_str(&json)?;
        assert_eq!(parsed, pointcloud);
        Ok(())
    }
}
