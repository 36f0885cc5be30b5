use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use super::IoError;
use crate::pointcloud::PointCloud;

/// Read a point cloud stored as a JSON array of `[x, y, z]` triples.
///
/// # Arguments
///
/// * `path` - The path to the JSON file.
pub fn read_points(path: impl AsRef<Path>) -> Result<PointCloud, IoError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let cloud: PointCloud = serde_json::from_reader(reader)?;
    log::debug!("read {} points from {}", cloud.len(), path.display());
    Ok(cloud)
}

/// Write a point cloud as a JSON array of `[x, y, z]` triples.
///
/// # Arguments
///
/// * `cloud` - The points to write.
/// * `path` - The destination path, overwritten if it exists.
pub fn write_points(cloud: &PointCloud, path: impl AsRef<Path>) -> Result<(), IoError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, cloud)?;
    writer.flush()?;
    Ok(())
}
