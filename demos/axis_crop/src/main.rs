use argh::FromArgs;
use std::path::PathBuf;

use meshalign::k3d::{self, ops::Axis, pointcloud::PointCloud};

/// Scale applied to the mid height when no keep fraction is given.
const MID_HEIGHT_SCALE: f64 = 1.225;

#[derive(FromArgs)]
/// Align the principal axis of a mesh with z and keep the lower part of its samples
struct Args {
    /// path to the input mesh
    #[argh(option)]
    input_path: PathBuf,

    /// path of the json file receiving the kept points
    #[argh(option)]
    output_path: PathBuf,

    /// voxel size used to sample the mesh, defaults to 1% of its diagonal
    #[argh(option)]
    sampling_voxel_size: Option<f64>,

    /// fraction of the aligned height to keep, measured from the bottom. When
    /// omitted the cut is at 1.225 times the mid height (min_z + max_z) / 2
    #[argh(option)]
    keep_fraction: Option<f64>,
}

/// Highest z value kept by the crop.
///
/// The default rule scales the absolute mid height, so it depends on where
/// the aligned cloud sits along z.
fn crop_height(min_z: f64, max_z: f64, keep_fraction: Option<f64>) -> f64 {
    match keep_fraction {
        Some(fraction) => min_z + fraction * (max_z - min_z),
        None => MID_HEIGHT_SCALE * 0.5 * (min_z + max_z),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mesh = k3d::io::stl::read_stl(&args.input_path)?;
    let voxel_size = args
        .sampling_voxel_size
        .unwrap_or(0.01 * mesh.diagonal());
    let cloud = k3d::sampling::sample_mesh_surface(&mesh, voxel_size)?;
    println!("Sampled #{} points", cloud.len());

    let alignment = k3d::pca::align_principal_axis(cloud.points(), Axis::Z.unit())?;
    let aligned = cloud.transformed(&alignment);

    let (min_z, max_z) = (aligned.get_min_bound().z, aligned.get_max_bound().z);
    let max_value = crop_height(min_z, max_z, args.keep_fraction);
    let kept = PointCloud::from_points(k3d::ops::crop_along_axis(
        aligned.points(),
        Axis::Z,
        max_value,
    ));
    println!(
        "Kept #{} of #{} points below z = {:.4}",
        kept.len(),
        aligned.len(),
        max_value
    );

    k3d::io::points::write_points(&kept, &args.output_path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_height() {
        assert!((crop_height(10.0, 20.0, None) - 18.375).abs() < 1e-12);
        assert_eq!(crop_height(10.0, 20.0, Some(0.5)), 15.0);
        assert_eq!(crop_height(-2.0, 2.0, Some(1.0)), 2.0);
        // centred on the origin the default keeps everything below zero
        assert_eq!(crop_height(-2.0, 2.0, None), 0.0);
    }
}
