use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use meshalign_3d::transforms::{axis_angle_to_rotation_matrix, RigidTransform};
use meshalign_icp::{compute_registration, IcpConfig};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn bench_registration(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_registration");
    let mut rng = StdRng::seed_from_u64(42);

    for num_points in [1000, 10000, 50000].iter() {
        let fixed = (0..*num_points)
            .map(|_| {
                let (x, y) = (rng.random_range(0.0..1.0), rng.random_range(0.0..1.0));
                [x, y, 0.2 * (4.0 * x).sin() * (3.0 * y).cos()]
            })
            .collect::<Vec<[f64; 3]>>();

        let rotation = axis_angle_to_rotation_matrix(&[0.2, 1.0, 0.4], 0.05)
            .unwrap_or(RigidTransform::IDENTITY.rotation);
        let floating = RigidTransform::new(rotation, [0.02, -0.01, 0.01]).transform_points(&fixed);

        let config = IcpConfig::new(1e-6)
            .with_distance_threshold(0.2)
            .with_iteration_limit(30);

        group.bench_with_input(
            BenchmarkId::new("point_to_point", num_points),
            &(fixed, floating),
            |b, (fixed, floating)| {
                b.iter(|| {
                    black_box(compute_registration(
                        fixed,
                        floating,
                        &RigidTransform::IDENTITY,
                        &config,
                    ))
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_registration);
criterion_main!(benches);
