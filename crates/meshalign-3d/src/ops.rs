use serde::{Deserialize, Serialize};

/// Utility function to compute the squared Euclidean distance between two points.
///
/// Example:
/// ```
/// use meshalign_3d::ops::squared_distance;
///
/// let a = [1.0, 2.0, 3.0];
/// let b = [4.0, 6.0, 3.0];
/// assert_eq!(squared_distance(&a, &b), 25.0);
/// ```
pub fn squared_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

/// Utility function to compute the Euclidean distance between two points.
pub fn euclidean_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    squared_distance(a, b).sqrt()
}

/// Minimum and maximum corners of the axis aligned bounding box of `points`.
///
/// Returns `None` for an empty set.
pub fn bounding_box(points: &[[f64; 3]]) -> Option<([f64; 3], [f64; 3])> {
    let first = *points.first()?;
    Some(points.iter().fold((first, first), |(mut lo, mut hi), p| {
        for i in 0..3 {
            lo[i] = lo[i].min(p[i]);
            hi[i] = hi[i].max(p[i]);
        }
        (lo, hi)
    }))
}

/// Length of the bounding box diagonal, zero for an empty set.
///
/// Registration parameters such as the sampling voxel size and the outlier
/// distance are usually expressed as fractions of this length.
pub fn bounding_box_diagonal(points: &[[f64; 3]]) -> f64 {
    bounding_box(points)
        .map(|(lo, hi)| euclidean_distance(&lo, &hi))
        .unwrap_or(0.0)
}

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// The x axis.
    X,
    /// The y axis.
    Y,
    /// The z axis.
    Z,
}

impl Axis {
    /// Index of the axis in a `[x, y, z]` array.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Unit vector along the axis.
    pub fn unit(self) -> [f64; 3] {
        let mut v = [0.0; 3];
        v[self.index()] = 1.0;
        v
    }
}

/// Keep the points whose coordinate along `axis` is at most `max_value`.
///
/// Used to cut away the part of a scan that lies beyond a plane orthogonal to
/// one of the coordinate axes, typically after aligning the principal axis of
/// the cloud with that coordinate axis.
///
/// Example:
/// ```
/// use meshalign_3d::ops::{crop_along_axis, Axis};
///
/// let points = vec![[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, 2.0]];
/// let kept = crop_along_axis(&points, Axis::Z, 1.0);
/// assert_eq!(kept, vec![[0.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
/// ```
pub fn crop_along_axis(points: &[[f64; 3]], axis: Axis, max_value: f64) -> Vec<[f64; 3]> {
    let i = axis.index();
    points.iter().filter(|p| p[i] <= max_value).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_euclidean_distance() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        assert_relative_eq!(euclidean_distance(&a, &b), 5.196152422706632);
        assert_eq!(squared_distance(&a, &b), 27.0);
    }

    #[test]
    fn test_bounding_box() {
        let points = vec![[1.0, 5.0, -1.0], [-2.0, 0.0, 3.0], [0.0, 1.0, 0.0]];
        assert_eq!(
            bounding_box(&points),
            Some(([-2.0, 0.0, -1.0], [1.0, 5.0, 3.0]))
        );
        assert_relative_eq!(bounding_box_diagonal(&points), 50.0f64.sqrt());
        assert_eq!(bounding_box(&[]), None);
        assert_eq!(bounding_box_diagonal(&[]), 0.0);
    }

    #[test]
    fn test_crop_along_axis() {
        let points = vec![[0.0, 1.0, 0.0], [0.5, -1.0, 0.0], [2.0, 3.0, 0.0]];
        assert_eq!(
            crop_along_axis(&points, Axis::Y, 1.0),
            vec![[0.0, 1.0, 0.0], [0.5, -1.0, 0.0]]
        );
        assert_eq!(crop_along_axis(&points, Axis::X, 0.4), vec![[0.0, 1.0, 0.0]]);
        assert!(crop_along_axis(&points, Axis::Z, -1.0).is_empty());
    }

    #[test]
    fn test_axis() {
        assert_eq!(Axis::Z.unit(), [0.0, 0.0, 1.0]);
        assert_eq!(Axis::Y.index(), 1);
    }
}
