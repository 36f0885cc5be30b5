use argh::FromArgs;
use std::{
    fs::File,
    path::{Path, PathBuf},
};

use meshalign::icp::{self as micp, IcpConfig, InitialAlignment};
use meshalign::k3d::{
    self, io::IoError, mesh::TriangleMesh, pointcloud::PointCloud, sampling::SamplingError,
    transforms::RigidTransform,
};

#[derive(FromArgs)]
/// Rigidly register floating geometry onto fixed geometry with ICP
struct Args {
    /// path to the fixed mesh or point cloud, .json files are read as point clouds and anything else as STL
    #[argh(option)]
    fixed_path: PathBuf,

    /// path to the floating mesh or point cloud
    #[argh(option)]
    floating_path: PathBuf,

    /// path where the registered floating geometry is written, in the format of the floating input
    #[argh(option)]
    output_path: PathBuf,

    /// stop once the RMS residual reaches this distance
    #[argh(option)]
    exit_tolerance: f64,

    /// voxel size used to sample both inputs, defaults to 1% of the fixed diagonal
    #[argh(option)]
    sampling_voxel_size: Option<f64>,

    /// maximum correspondence distance, defaults to 10% of the fixed diagonal
    #[argh(option)]
    distance_threshold: Option<f64>,

    /// maximum number of iterations
    #[argh(option, default = "100")]
    iteration_limit: usize,

    /// initial alignment: identity, centroid or pca
    #[argh(option, default = "InitialAlignment::Identity")]
    init: InitialAlignment,

    /// json file with the full ICP configuration, overrides the numeric options
    #[argh(option)]
    config: Option<PathBuf>,

    /// write the registration result as json to this path
    #[argh(option)]
    report: Option<PathBuf>,
}

/// Registration input, either a mesh or a bare point cloud.
enum Geometry {
    Mesh(TriangleMesh),
    Points(PointCloud),
}

impl Geometry {
    fn read(path: &Path) -> Result<Self, IoError> {
        if path.extension().is_some_and(|ext| ext == "json") {
            Ok(Self::Points(k3d::io::points::read_points(path)?))
        } else {
            Ok(Self::Mesh(k3d::io::stl::read_stl(path)?))
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Mesh(mesh) => format!(
                "mesh with #{} vertices, #{} triangles",
                mesh.vertices().len(),
                mesh.num_triangles()
            ),
            Self::Points(cloud) => format!("point cloud with #{} points", cloud.len()),
        }
    }

    fn diagonal(&self) -> f64 {
        match self {
            Self::Mesh(mesh) => mesh.diagonal(),
            Self::Points(cloud) => cloud.diagonal(),
        }
    }

    fn sample(&self, voxel_size: f64) -> Result<PointCloud, SamplingError> {
        match self {
            Self::Mesh(mesh) => k3d::sampling::sample_mesh_surface(mesh, voxel_size),
            Self::Points(cloud) => k3d::sampling::sample_point_cloud(cloud, voxel_size),
        }
    }

    fn write_transformed(&self, transform: &RigidTransform, path: &Path) -> Result<(), IoError> {
        match self {
            Self::Mesh(mesh) => k3d::io::stl::write_stl(&mesh.transformed(transform), path),
            Self::Points(cloud) => {
                k3d::io::points::write_points(&cloud.transformed(transform), path)
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let fixed = Geometry::read(&args.fixed_path)?;
    println!("Fixed {}", fixed.describe());

    let floating = Geometry::read(&args.floating_path)?;
    println!("Floating {}", floating.describe());

    let config = match &args.config {
        Some(path) => serde_json::from_reader(File::open(path)?)?,
        None => {
            let diagonal = fixed.diagonal();
            let threshold = args
                .distance_threshold
                .unwrap_or(micp::DISTANCE_THRESHOLD_RATIO * diagonal);
            IcpConfig {
                sampling_voxel_size: args
                    .sampling_voxel_size
                    .unwrap_or(micp::VOXEL_SIZE_RATIO * diagonal),
                ..IcpConfig::new(args.exit_tolerance)
                    .with_distance_threshold(threshold)
                    .with_iteration_limit(args.iteration_limit)
            }
        }
    };
    config.validate()?;
    log::info!("ICP configuration: {:?}", config);

    let fixed_cloud = fixed.sample(config.sampling_voxel_size)?;
    let floating_cloud = floating.sample(config.sampling_voxel_size)?;
    println!(
        "Sampled #{} fixed and #{} floating points",
        fixed_cloud.len(),
        floating_cloud.len()
    );

    let initial = micp::initial_transform(fixed_cloud.points(), floating_cloud.points(), args.init)?;
    let result = micp::register_point_clouds(&fixed_cloud, &floating_cloud, &initial, &config)?;
    println!(
        "ICP finished with status {:?} after {} iterations, rmse {:?}, {} correspondences",
        result.status, result.iterations, result.rmse, result.num_correspondences
    );
    println!("Transform: {:?}", result.transform.to_homogeneous());

    if let Some(path) = &args.report {
        serde_json::to_writer_pretty(File::create(path)?, &result)?;
    }

    if !result.status.is_usable() {
        return Err(format!("registration failed with status {:?}", result.status).into());
    }

    floating.write_transformed(&result.transform, &args.output_path)?;
    println!("Registered geometry written to {}", args.output_path.display());

    Ok(())
}
