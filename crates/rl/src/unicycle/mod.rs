//! The unicycle balancing environment.

mod action;
mod config;
mod observation;
mod reward;

use std::collections::HashMap;
use std::path::Path;

use physics::{
    BodyId, CameraConfig, ConnectionMode, ForceFrame, JointIndex, PhysicsClient, Pose,
    RapierClient,
};
use render::{FrameRecorder, FrameSink};

use crate::env::{Env, Info, StepResult};
use crate::error::EnvError;
use crate::spaces::BoxSpace;

pub use action::{ActionSource, Actuation, HUMAN_SLIDER, WHEEL_SLIDER};
pub use config::{default_robot_path, UnicycleConfig};
pub use observation::{observation, OBSERVATION_SIZE};
pub use reward::{is_done, reward};

pub const WHEEL_JOINT: &str = "wheel";
pub const HUMAN_JOINT: &str = "human";
pub const ACTION_SIZE: usize = 2;

/// A self-balancing unicycle on a flat ground plane.
///
/// Each environment owns one physics session. The wheel is driven by an
/// external torque about its axle and the rider mass by the position servo of
/// the `human` joint. Reward is `+1` for every step that does not move the
/// robot away from the goal while its base stays above `penalty_height`, and
/// the episode ends once the base drops below `fall_height`.
pub struct UnicycleEnv<C: PhysicsClient = RapierClient> {
    client: C,
    config: UnicycleConfig,
    plane: BodyId,
    robot: BodyId,
    joints: HashMap<String, JointIndex>,
    wheel: JointIndex,
    human: JointIndex,
    action_source: ActionSource,
    start_pose: Pose,
    camera: CameraConfig,
    pose: Pose,
    previous_pose: Pose,
    human_position: f32,
    step_id: u64,
    recorder: Option<FrameRecorder>,
}

impl UnicycleEnv<RapierClient> {
    /// Opens a `rapier3d` session and builds the environment in it.
    ///
    /// # Errors
    ///
    /// See [`UnicycleEnv::with_client`].
    pub fn new(config: UnicycleConfig) -> Result<Self, EnvError> {
        let mode = if config.visualize {
            ConnectionMode::Gui
        } else {
            ConnectionMode::Direct
        };
        Self::with_client(RapierClient::connect(mode), config)
    }
}

impl<C: PhysicsClient> UnicycleEnv<C> {
    /// Render modes understood by this environment.
    pub const RENDER_MODES: [&'static str; 1] = ["ansi"];

    /// Builds the scene in an already connected session.
    ///
    /// # Errors
    ///
    /// Fails if the robot cannot be loaded, if it lacks a `wheel` or `human`
    /// joint ([`EnvError::MissingJoint`]), or if the initial frame cannot be
    /// recorded.
    pub fn with_client(mut client: C, config: UnicycleConfig) -> Result<Self, EnvError> {
        client.set_time_step(config.time_step);
        client.set_gravity(config.gravity);

        let plane = client.load_plane()?;
        let start_pose = config.start_pose();
        let robot = client.load_urdf(&config.robot_path, start_pose)?;

        let mut joints = HashMap::new();
        for index in 0..client.num_joints(robot)? {
            let info = client.joint_info(robot, JointIndex(index))?;
            joints.insert(info.name, info.index);
        }
        let wheel = *joints
            .get(WHEEL_JOINT)
            .ok_or(EnvError::MissingJoint(WHEEL_JOINT))?;
        let human = *joints
            .get(HUMAN_JOINT)
            .ok_or(EnvError::MissingJoint(HUMAN_JOINT))?;
        for (name, index) in [(WHEEL_JOINT, wheel), (HUMAN_JOINT, human)] {
            let kind = client.joint_info(robot, index)?.kind;
            if !kind.is_actuated() {
                tracing::warn!("{name} joint is {kind} and will not respond to actions");
            }
        }

        let action_source = if config.debug {
            ActionSource::register(&mut client)
        } else {
            ActionSource::External
        };

        let camera = config.camera();
        let recorder = if config.record {
            tracing::info!("recording frames at {}x{}", camera.width, camera.height);
            let mut recorder = FrameRecorder::new();
            recorder.push(client.camera_image(&camera))?;
            Some(recorder)
        } else {
            tracing::info!("not recording");
            None
        };

        tracing::info!(
            "unicycle ready: {:?} session, wheel={wheel}, human={human}, debug={}",
            client.mode(),
            config.debug
        );

        Ok(Self {
            client,
            plane,
            robot,
            joints,
            wheel,
            human,
            action_source,
            start_pose,
            camera,
            pose: start_pose,
            previous_pose: start_pose,
            human_position: 0.0,
            step_id: 0,
            recorder,
            config,
        })
    }

    /// Writes the recorded frames as an animated GIF.
    ///
    /// # Errors
    ///
    /// [`EnvError::RecordingDisabled`] when the environment does not record,
    /// otherwise any [`render::RecordError`].
    pub fn save_img(&self, path: &Path) -> Result<(), EnvError> {
        let recorder = self.recorder.as_ref().ok_or(EnvError::RecordingDisabled)?;
        recorder.save_gif(path, self.config.frame_delay(), self.config.frame_loop)?;
        Ok(())
    }

    /// One-line text summary of the current state.
    #[must_use]
    pub fn render_ansi(&self) -> String {
        let [x, y, z] = self.pose.position;
        format!(
            "step {:>5} | base ({x:+.3}, {y:+.3}, {z:+.3}) | goal distance {:.3} | human {:+.3}",
            self.step_id,
            self.pose.distance_to(self.config.goal),
            self.human_position
        )
    }

    /// Moves the current pose into the previous slot and reads the robot
    /// state from the simulator.
    fn update_coordinate(&mut self) -> Result<(), EnvError> {
        self.previous_pose = self.pose;
        self.pose = self.client.base_pose(self.robot)?;
        self.human_position = self.client.joint_state(self.robot, self.human)?.position;
        Ok(())
    }

    fn observe(&self) -> Result<Vec<f32>, EnvError> {
        let wheel_velocity = self.client.joint_state(self.robot, self.wheel)?.velocity;
        Ok(observation(
            self.config.goal,
            &self.pose,
            self.human_position,
            wheel_velocity,
        ))
    }

    fn apply(&mut self, actuation: Actuation) -> Result<(), EnvError> {
        self.client.apply_external_torque(
            self.robot,
            Some(self.wheel),
            [0.0, 0.0, actuation.wheel_torque],
            ForceFrame::Link,
        )?;
        self.client
            .set_joint_position_target(self.robot, self.human, actuation.human_target)?;
        Ok(())
    }

    #[must_use]
    pub fn step_id(&self) -> u64 {
        self.step_id
    }

    /// Joint name to index map of the robot.
    #[must_use]
    pub fn joint_indices(&self) -> &HashMap<String, JointIndex> {
        &self.joints
    }

    #[must_use]
    pub fn pose(&self) -> Pose {
        self.pose
    }

    #[must_use]
    pub fn previous_pose(&self) -> Pose {
        self.previous_pose
    }

    #[must_use]
    pub fn start_pose(&self) -> Pose {
        self.start_pose
    }

    #[must_use]
    pub fn human_position(&self) -> f32 {
        self.human_position
    }

    #[must_use]
    pub fn goal(&self) -> [f32; 3] {
        self.config.goal
    }

    #[must_use]
    pub fn config(&self) -> &UnicycleConfig {
        &self.config
    }

    #[must_use]
    pub fn action_source(&self) -> ActionSource {
        self.action_source
    }

    #[must_use]
    pub fn robot(&self) -> BodyId {
        self.robot
    }

    #[must_use]
    pub fn plane(&self) -> BodyId {
        self.plane
    }

    /// Number of recorded frames; 0 when not recording.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.recorder.as_ref().map_or(0, FrameSink::len)
    }

    #[must_use]
    pub fn recorder(&self) -> Option<&FrameRecorder> {
        self.recorder.as_ref()
    }

    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Mutable session access, e.g. to move the debug sliders.
    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }
}

impl<C: PhysicsClient> Env for UnicycleEnv<C> {
    fn step(&mut self, action: &[f32]) -> Result<StepResult, EnvError> {
        let action = self.action_source.resolve(&self.client, action)?;
        self.apply(Actuation::from_action(
            action,
            self.config.torque_scale,
            self.config.human_scale,
        ))?;

        self.client.step_simulation();
        self.step_id += 1;
        self.update_coordinate()?;

        if let Some(wait) = self.config.wait() {
            std::thread::sleep(wait);
        }
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.push(self.client.camera_image(&self.camera))?;
        }

        let observation = self.observe()?;
        let reward = reward(
            self.config.goal,
            &self.previous_pose,
            &self.pose,
            self.config.penalty_height,
        );
        let done = is_done(self.pose.position, self.config.fall_height);
        if done {
            tracing::debug!(
                "fell at step {} with base height {:.3}",
                self.step_id,
                self.pose.position[2]
            );
        }
        Ok((observation, reward, done, Info::new()))
    }

    fn reset(&mut self) -> Result<Vec<f32>, EnvError> {
        self.step_id = 0;
        self.client.reset_base_pose(self.robot, self.start_pose)?;
        self.client
            .reset_base_velocity(self.robot, [0.0; 3], [0.0; 3])?;
        self.client.reset_joint_state(self.robot, self.wheel, 0.0, 0.0)?;
        self.client.reset_joint_state(self.robot, self.human, 0.0, 0.0)?;
        self.update_coordinate()?;
        self.observe()
    }

    fn obs_size(&self) -> usize {
        OBSERVATION_SIZE
    }

    fn action_size(&self) -> usize {
        ACTION_SIZE
    }

    fn action_space(&self) -> BoxSpace {
        BoxSpace::new(-1.0, 1.0, &[ACTION_SIZE])
    }

    fn observation_space(&self) -> BoxSpace {
        BoxSpace::new(-20.0, 20.0, &[OBSERVATION_SIZE])
    }

    fn reward_range(&self) -> (f32, f32) {
        (-1.0, 1.0)
    }
}
