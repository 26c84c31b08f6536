//! In-memory [`PhysicsClient`] for deterministic environment tests.
//!
//! No dynamics are simulated. Every loaded URDF gets the joint layout set up
//! with [`MockClient::with_joints`], base poses are replayed from a script one
//! per step, and position servos reach their target on the next step.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::client::PhysicsClient;
use crate::debug::DebugParameters;
use crate::error::PhysicsError;
use crate::types::{
    BodyId, CameraConfig, CameraImage, ConnectionMode, DebugParamId, ForceFrame, JointIndex,
    JointInfo, JointKind, JointState, Pose,
};

/// Color of every captured mock frame.
pub const MOCK_FRAME_COLOR: [u8; 4] = [40, 80, 120, 255];

/// One recorded `apply_external_torque` call.
#[derive(Clone, Debug, PartialEq)]
pub struct TorqueCall {
    pub body: BodyId,
    pub link: Option<JointIndex>,
    pub torque: [f32; 3],
    pub frame: ForceFrame,
}

#[derive(Clone, Debug)]
struct MockBody {
    pose: Pose,
    velocity: ([f32; 3], [f32; 3]),
    joints: Vec<JointInfo>,
    states: Vec<JointState>,
    targets: Vec<Option<f32>>,
}

#[derive(Debug)]
pub struct MockClient {
    mode: ConnectionMode,
    time_step: f32,
    gravity: [f32; 3],
    joint_layout: Vec<(String, JointKind)>,
    bodies: Vec<MockBody>,
    robot: Option<BodyId>,
    script: VecDeque<Pose>,
    steps: u64,
    torques: Vec<TorqueCall>,
    position_targets: Vec<(JointIndex, f32)>,
    loaded: Vec<PathBuf>,
    debug_parameters: DebugParameters,
}

impl MockClient {
    #[must_use]
    pub fn new(mode: ConnectionMode) -> Self {
        Self {
            mode,
            time_step: 1.0 / 240.0,
            gravity: [0.0; 3],
            joint_layout: Vec::new(),
            bodies: Vec::new(),
            robot: None,
            script: VecDeque::new(),
            steps: 0,
            torques: Vec::new(),
            position_targets: Vec::new(),
            loaded: Vec::new(),
            debug_parameters: DebugParameters::new(),
        }
    }

    /// Joint layout given to every body loaded with `load_urdf`.
    #[must_use]
    pub fn with_joints(mut self, joints: &[(&str, JointKind)]) -> Self {
        self.joint_layout = joints
            .iter()
            .map(|(name, kind)| ((*name).to_owned(), *kind))
            .collect();
        self
    }

    /// Queues base poses for the most recently loaded robot, one per step.
    ///
    /// Once the script runs out the robot stays where it is.
    pub fn script_poses(&mut self, poses: impl IntoIterator<Item = Pose>) {
        self.script.extend(poses);
    }

    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[must_use]
    pub fn gravity(&self) -> [f32; 3] {
        self.gravity
    }

    #[must_use]
    pub fn torques(&self) -> &[TorqueCall] {
        &self.torques
    }

    #[must_use]
    pub fn position_targets(&self) -> &[(JointIndex, f32)] {
        &self.position_targets
    }

    /// Paths passed to `load_urdf`, in call order.
    #[must_use]
    pub fn loaded(&self) -> &[PathBuf] {
        &self.loaded
    }

    /// Linear and angular base velocity last set through `reset_base_velocity`.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] for a handle not issued by this client.
    pub fn base_velocity(&self, body: BodyId) -> Result<([f32; 3], [f32; 3]), PhysicsError> {
        Ok(self.body(body)?.velocity)
    }

    fn body(&self, body: BodyId) -> Result<&MockBody, PhysicsError> {
        self.bodies.get(body.0).ok_or(PhysicsError::UnknownBody(body))
    }

    fn body_mut(&mut self, body: BodyId) -> Result<&mut MockBody, PhysicsError> {
        self.bodies
            .get_mut(body.0)
            .ok_or(PhysicsError::UnknownBody(body))
    }

    fn check_joint(&self, body: BodyId, joint: JointIndex) -> Result<(), PhysicsError> {
        if joint.0 < self.body(body)?.joints.len() {
            Ok(())
        } else {
            Err(PhysicsError::UnknownJoint { body, joint })
        }
    }

    fn push_body(&mut self, pose: Pose, joints: Vec<JointInfo>) -> BodyId {
        let count = joints.len();
        self.bodies.push(MockBody {
            pose,
            velocity: ([0.0; 3], [0.0; 3]),
            joints,
            states: vec![JointState::default(); count],
            targets: vec![None; count],
        });
        BodyId(self.bodies.len() - 1)
    }
}

impl PhysicsClient for MockClient {
    fn mode(&self) -> ConnectionMode {
        self.mode
    }

    fn set_time_step(&mut self, dt: f32) {
        self.time_step = dt;
    }

    fn time_step(&self) -> f32 {
        self.time_step
    }

    fn set_gravity(&mut self, gravity: [f32; 3]) {
        self.gravity = gravity;
    }

    fn step_simulation(&mut self) {
        self.steps += 1;
        for body in &mut self.bodies {
            for (state, target) in body.states.iter_mut().zip(&body.targets) {
                if let Some(target) = target {
                    state.position = *target;
                }
            }
        }
        if let (Some(robot), Some(pose)) = (self.robot, self.script.pop_front()) {
            self.bodies[robot.0].pose = pose;
        }
    }

    fn load_plane(&mut self) -> Result<BodyId, PhysicsError> {
        Ok(self.push_body(Pose::IDENTITY, Vec::new()))
    }

    fn load_urdf(&mut self, path: &Path, base: Pose) -> Result<BodyId, PhysicsError> {
        self.loaded.push(path.to_path_buf());
        let joints = self
            .joint_layout
            .iter()
            .enumerate()
            .map(|(index, (name, kind))| JointInfo {
                index: JointIndex(index),
                name: name.clone(),
                kind: *kind,
                parent_link: String::from("base"),
                child_link: name.clone(),
                lower: None,
                upper: None,
                max_force: 100.0,
                max_velocity: 0.0,
            })
            .collect();
        let id = self.push_body(base, joints);
        self.robot = Some(id);
        Ok(id)
    }

    fn num_joints(&self, body: BodyId) -> Result<usize, PhysicsError> {
        Ok(self.body(body)?.joints.len())
    }

    fn joint_info(&self, body: BodyId, joint: JointIndex) -> Result<JointInfo, PhysicsError> {
        self.body(body)?
            .joints
            .get(joint.0)
            .cloned()
            .ok_or(PhysicsError::UnknownJoint { body, joint })
    }

    fn apply_external_torque(
        &mut self,
        body: BodyId,
        link: Option<JointIndex>,
        torque: [f32; 3],
        frame: ForceFrame,
    ) -> Result<(), PhysicsError> {
        match link {
            Some(joint) => self.check_joint(body, joint)?,
            None => {
                self.body(body)?;
            }
        }
        self.torques.push(TorqueCall {
            body,
            link,
            torque,
            frame,
        });
        Ok(())
    }

    fn set_joint_position_target(
        &mut self,
        body: BodyId,
        joint: JointIndex,
        target: f32,
    ) -> Result<(), PhysicsError> {
        self.check_joint(body, joint)?;
        self.body_mut(body)?.targets[joint.0] = Some(target);
        self.position_targets.push((joint, target));
        Ok(())
    }

    fn joint_state(&self, body: BodyId, joint: JointIndex) -> Result<JointState, PhysicsError> {
        self.check_joint(body, joint)?;
        Ok(self.body(body)?.states[joint.0])
    }

    fn reset_joint_state(
        &mut self,
        body: BodyId,
        joint: JointIndex,
        position: f32,
        velocity: f32,
    ) -> Result<(), PhysicsError> {
        self.check_joint(body, joint)?;
        let body = self.body_mut(body)?;
        body.states[joint.0] = JointState { position, velocity };
        body.targets[joint.0] = None;
        Ok(())
    }

    fn base_pose(&self, body: BodyId) -> Result<Pose, PhysicsError> {
        Ok(self.body(body)?.pose)
    }

    fn reset_base_pose(&mut self, body: BodyId, pose: Pose) -> Result<(), PhysicsError> {
        self.body_mut(body)?.pose = pose;
        Ok(())
    }

    fn reset_base_velocity(
        &mut self,
        body: BodyId,
        linear: [f32; 3],
        angular: [f32; 3],
    ) -> Result<(), PhysicsError> {
        self.body_mut(body)?.velocity = (linear, angular);
        Ok(())
    }

    fn camera_image(&self, camera: &CameraConfig) -> CameraImage {
        CameraImage::filled(camera.width, camera.height, MOCK_FRAME_COLOR)
    }

    fn add_debug_parameter(
        &mut self,
        name: &str,
        min: f32,
        max: f32,
        default: f32,
    ) -> DebugParamId {
        self.debug_parameters.add(name, min, max, default)
    }

    fn read_debug_parameter(&self, id: DebugParamId) -> Result<f32, PhysicsError> {
        self.debug_parameters.read(id)
    }

    fn set_debug_parameter(&mut self, id: DebugParamId, value: f32) -> Result<(), PhysicsError> {
        self.debug_parameters.set(id, value)
    }

    fn find_debug_parameter(&self, name: &str) -> Option<DebugParamId> {
        self.debug_parameters.find(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> (MockClient, BodyId) {
        let mut client = MockClient::new(ConnectionMode::Direct).with_joints(&[
            ("wheel", JointKind::Continuous),
            ("human", JointKind::Prismatic),
        ]);
        let id = client.load_urdf(Path::new("robot.urdf"), Pose::IDENTITY).unwrap();
        (client, id)
    }

    #[test]
    fn script_replays_one_pose_per_step() {
        let (mut client, id) = client();
        client.script_poses([
            Pose::new([0.0, 0.0, 0.5], [0.0, 0.0, 0.0, 1.0]),
            Pose::new([0.0, 0.0, 0.05], [0.0, 0.0, 0.0, 1.0]),
        ]);
        client.step_simulation();
        assert!((client.base_pose(id).unwrap().position[2] - 0.5).abs() < 1e-6);
        client.step_simulation();
        client.step_simulation();
        assert!((client.base_pose(id).unwrap().position[2] - 0.05).abs() < 1e-6);
        assert_eq!(client.steps(), 3);
    }

    #[test]
    fn servo_reaches_target_on_next_step() {
        let (mut client, id) = client();
        client
            .set_joint_position_target(id, JointIndex(1), 0.07)
            .unwrap();
        assert_eq!(client.joint_state(id, JointIndex(1)).unwrap().position, 0.0);
        client.step_simulation();
        assert_eq!(client.joint_state(id, JointIndex(1)).unwrap().position, 0.07);
        assert_eq!(client.position_targets(), &[(JointIndex(1), 0.07)]);
    }

    #[test]
    fn torque_calls_are_recorded() {
        let (mut client, id) = client();
        client
            .apply_external_torque(id, Some(JointIndex(0)), [0.0, 0.0, 2.5], ForceFrame::Link)
            .unwrap();
        assert_eq!(client.torques().len(), 1);
        assert_eq!(client.torques()[0].torque, [0.0, 0.0, 2.5]);
        assert!(client
            .apply_external_torque(id, Some(JointIndex(5)), [0.0; 3], ForceFrame::Link)
            .is_err());
    }

    #[test]
    fn joint_names_follow_layout() {
        let (client, id) = client();
        assert_eq!(client.num_joints(id).unwrap(), 2);
        assert_eq!(client.joint_info(id, JointIndex(0)).unwrap().name, "wheel");
        assert_eq!(client.loaded(), &[PathBuf::from("robot.urdf")]);
    }
}
