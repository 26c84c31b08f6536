mod common;

use physics::{JointIndex, PhysicsClient};
use rl::unicycle::OBSERVATION_SIZE;
use rl::{Env, EnvError, UnicycleConfig, UnicycleEnv};

#[test]
fn reset_returns_start_observation() {
    let mut env = common::mock_env(common::headless());
    env.client_mut().script_poses([common::at(0.4, 0.2)]);
    env.step(&[0.5, 0.5]).unwrap();

    let obs = env.reset().unwrap();
    assert_eq!(env.step_id(), 0);
    assert_eq!(env.pose(), env.start_pose());
    assert_eq!(obs.len(), OBSERVATION_SIZE);
    assert_eq!(&obs[0..3], &[5.0, 0.0, 0.0]);
    assert_eq!(&obs[3..7], &[0.0, 0.0, 0.0, 1.0]);
    assert_eq!(obs[10], 0.0);
    assert_eq!(obs[11], 0.0);
}

#[test]
fn reset_zeroes_joints_and_base_velocity() {
    let mut env = common::mock_env(common::headless());
    env.step(&[0.0, 1.0]).unwrap();
    let robot = env.robot();
    env.client_mut()
        .reset_base_velocity(robot, [1.0, 0.0, 0.0], [0.0, 2.0, 0.0])
        .unwrap();

    env.reset().unwrap();
    let client = env.client();
    assert_eq!(client.base_velocity(robot).unwrap(), ([0.0; 3], [0.0; 3]));
    for joint in [JointIndex(0), JointIndex(1)] {
        let state = client.joint_state(robot, joint).unwrap();
        assert_eq!((state.position, state.velocity), (0.0, 0.0));
    }
    assert_eq!(env.human_position(), 0.0);
}

#[test]
fn step_after_mid_episode_reset_counts_from_one() {
    let mut env = common::mock_env(common::headless());
    for _ in 0..4 {
        env.step(&[0.0, 0.0]).unwrap();
    }
    env.reset().unwrap();
    env.step(&[0.0, 0.0]).unwrap();
    assert_eq!(env.step_id(), 1);
}

#[test]
fn reset_keeps_session_and_sliders() {
    let config = UnicycleConfig {
        debug: true,
        ..common::headless()
    };
    let mut env = common::mock_env(config);
    env.reset().unwrap();
    env.reset().unwrap();
    assert_eq!(env.client().loaded().len(), 1);
    assert_eq!(env.client().find_debug_parameter("human").map(|id| id.0), Some(1));
}

#[test]
fn construction_loads_plane_and_robot_at_start_pose() {
    let config = UnicycleConfig {
        start_position: [1.0, 2.0, 0.5],
        ..common::headless()
    };
    let env = common::mock_env(config);
    assert_ne!(env.plane(), env.robot());
    let base = env.client().base_pose(env.robot()).unwrap();
    assert_eq!(base.position, [1.0, 2.0, 0.5]);
    assert_eq!(env.client().gravity(), [0.0, 0.0, -10.0]);
    assert!((env.client().time_step() - 0.05).abs() < 1e-9);
    assert_eq!(env.joint_indices()["wheel"], JointIndex(0));
    assert_eq!(env.joint_indices()["human"], JointIndex(1));
}

#[test]
fn missing_human_joint_fails_construction() {
    let client = physics::mock::MockClient::new(physics::ConnectionMode::Direct)
        .with_joints(&[("wheel", physics::JointKind::Continuous)]);
    let err = UnicycleEnv::with_client(client, common::headless())
        .err()
        .unwrap();
    assert!(matches!(err, EnvError::MissingJoint("human")));
}

#[test]
fn missing_wheel_joint_fails_construction() {
    let client = physics::mock::MockClient::new(physics::ConnectionMode::Direct);
    let err = UnicycleEnv::with_client(client, common::headless())
        .err()
        .unwrap();
    assert!(matches!(err, EnvError::MissingJoint("wheel")));
}

#[test]
fn environments_do_not_share_state() {
    let mut a = common::mock_env(common::headless());
    let b = common::mock_env(UnicycleConfig {
        goal: [-3.0, 1.0, 0.3],
        ..common::headless()
    });
    a.client_mut().script_poses([common::at(1.0, 0.3)]);
    a.step(&[0.0, 0.0]).unwrap();

    assert_eq!(a.goal(), [5.0, 0.0, 0.3]);
    assert_eq!(b.goal(), [-3.0, 1.0, 0.3]);
    assert_eq!(a.pose().position, [1.0, 0.0, 0.3]);
    assert_eq!(b.pose().position, [0.0, 0.0, 0.3]);
    assert_eq!((a.step_id(), b.step_id()), (1, 0));
}

#[test]
fn declared_spaces() {
    let env = common::mock_env(common::headless());
    assert_eq!(env.obs_size(), 12);
    assert_eq!(env.action_size(), 2);
    let actions = env.action_space();
    assert_eq!((actions.low, actions.high, actions.shape.clone()), (-1.0, 1.0, vec![2]));
    let observations = env.observation_space();
    assert_eq!(
        (observations.low, observations.high, observations.len()),
        (-20.0, 20.0, 12)
    );
    assert_eq!(env.reward_range(), (-1.0, 1.0));
    assert_eq!(UnicycleEnv::<physics::mock::MockClient>::RENDER_MODES, ["ansi"]);
}

#[test]
fn ansi_render_summarises_state() {
    let mut env = common::mock_env(common::headless());
    env.step(&[0.0, 0.0]).unwrap();
    let text = env.render_ansi();
    assert!(text.starts_with("step     1"), "{text}");
    assert!(text.contains("goal distance 5.000"), "{text}");
}
