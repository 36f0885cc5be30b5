use glam::{DMat3, DVec3};

/// Transform a set of points using a rotation and translation.
///
/// # Arguments
///
/// * `src_points` - A set of points to be transformed.
/// * `dst_r_src` - A row-major rotation matrix.
/// * `dst_t_src` - A translation vector.
/// * `dst_points` - A pre-allocated vector to store the transformed points.
///
/// PRECONDITION: dst_points is a pre-allocated vector of the same size as source.
///
/// Example:
///
/// ```
/// use meshalign_3d::linalg::transform_points;
///
/// let src_points = vec![[2.0, 2.0, 2.0], [3.0, 4.0, 5.0]];
/// let rotation = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
/// let translation = [0.0, 0.0, 0.0];
/// let mut dst_points = vec![[0.0; 3]; src_points.len()];
/// transform_points(&src_points, &rotation, &translation, &mut dst_points);
/// assert_eq!(dst_points, src_points);
/// ```
pub fn transform_points(
    src_points: &[[f64; 3]],
    dst_r_src: &[[f64; 3]; 3],
    dst_t_src: &[f64; 3],
    dst_points: &mut [[f64; 3]],
) {
    assert_eq!(src_points.len(), dst_points.len());

    let rotation = rotation_from_rows(dst_r_src);
    let translation = DVec3::from_array(*dst_t_src);

    for (point_dst, point_src) in dst_points.iter_mut().zip(src_points.iter()) {
        *point_dst = (rotation * DVec3::from_array(*point_src) + translation).to_array();
    }
}

/// Convert a row-major 3x3 array into a glam matrix.
///
/// glam stores matrices column-major, so the array is read as columns and transposed.
pub fn rotation_from_rows(rows: &[[f64; 3]; 3]) -> DMat3 {
    DMat3::from_cols_array_2d(rows).transpose()
}

/// Convert a glam matrix into a row-major 3x3 array.
pub fn rotation_to_rows(mat: &DMat3) -> [[f64; 3]; 3] {
    mat.transpose().to_cols_array_2d()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_points_identity() {
        let src_points = vec![[2.0, 2.0, 2.0], [3.0, 4.0, 5.0]];
        let rotation = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let translation = [0.0, 0.0, 0.0];
        let mut dst_points = vec![[0.0; 3]; src_points.len()];
        transform_points(&src_points, &rotation, &translation, &mut dst_points);

        assert_eq!(dst_points, src_points);
    }

    #[test]
    fn test_transform_points_row_major() {
        // 90 degrees about x: y -> z, z -> -y
        let src_points = vec![[1.0, 2.0, 3.0]];
        let rotation = [[1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]];
        let translation = [1.0, 2.0, 3.0];
        let mut dst_points = vec![[0.0; 3]; 1];
        transform_points(&src_points, &rotation, &translation, &mut dst_points);

        assert_eq!(dst_points, vec![[2.0, -1.0, 5.0]]);
    }

    #[test]
    fn test_rotation_rows_roundtrip() {
        let rows = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        let mat = rotation_from_rows(&rows);
        assert_eq!(mat.row(0), DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(mat.col(0), DVec3::new(1.0, 4.0, 7.0));
        assert_eq!(rotation_to_rows(&mat), rows);
    }
}
