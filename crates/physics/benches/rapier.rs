use std::path::PathBuf;

use criterion::{criterion_group, criterion_main, Criterion};
use physics::{CameraConfig, ConnectionMode, PhysicsClient, Pose, RapierClient};

fn unicycle_session() -> RapierClient {
    let mut client = RapierClient::connect(ConnectionMode::Direct);
    client.set_time_step(0.01);
    client.set_gravity([0.0, 0.0, -10.0]);
    client.load_plane().unwrap();
    let urdf = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../rl/assets/unicycle.urdf");
    client
        .load_urdf(&urdf, Pose::new([0.0, 0.0, 0.3], [0.0, 0.0, 0.0, 1.0]))
        .unwrap();
    client
}

fn bench_step(c: &mut Criterion) {
    let mut client = unicycle_session();
    c.bench_function("rapier_step", |b| b.iter(|| client.step_simulation()));
}

fn bench_camera(c: &mut Criterion) {
    let client = unicycle_session();
    let camera = CameraConfig::default();
    c.bench_function("camera_320x320", |b| b.iter(|| client.camera_image(&camera)));
}

criterion_group!(benches, bench_step, bench_camera);
criterion_main!(benches);
