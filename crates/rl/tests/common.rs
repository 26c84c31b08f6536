#![allow(dead_code)]

use physics::mock::MockClient;
use physics::{ConnectionMode, JointKind, Pose};
use rl::{UnicycleConfig, UnicycleEnv};

pub fn mock_client() -> MockClient {
    MockClient::new(ConnectionMode::Direct).with_joints(&[
        ("wheel", JointKind::Continuous),
        ("human", JointKind::Prismatic),
    ])
}

pub fn headless() -> UnicycleConfig {
    UnicycleConfig {
        visualize: false,
        ..UnicycleConfig::default()
    }
}

pub fn mock_env(config: UnicycleConfig) -> UnicycleEnv<MockClient> {
    UnicycleEnv::with_client(mock_client(), config).unwrap()
}

/// Upright base pose at `(x, 0, z)`.
pub fn at(x: f32, z: f32) -> Pose {
    Pose::new([x, 0.0, z], [0.0, 0.0, 0.0, 1.0])
}
