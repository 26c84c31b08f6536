use std::path::Path;

use crate::error::PhysicsError;
use crate::types::{
    BodyId, CameraConfig, CameraImage, ConnectionMode, DebugParamId, ForceFrame, JointIndex,
    JointInfo, JointState, Pose,
};

/// A connected simulation session.
///
/// The interface is modelled on the classic Bullet client API: bodies and
/// joints are addressed by small integer handles, joint `i` of a body drives
/// the body's link `i`, and external forces only last for the next call to
/// [`step_simulation`].
///
/// Lookups of handles that were never issued by this session fail with
/// [`PhysicsError::UnknownBody`] or [`PhysicsError::UnknownJoint`]; apart from
/// that, state reads and actuator writes do not fail once a session is open.
///
/// [`step_simulation`]: PhysicsClient::step_simulation
pub trait PhysicsClient {
    fn mode(&self) -> ConnectionMode;

    fn set_time_step(&mut self, dt: f32);

    fn time_step(&self) -> f32;

    fn set_gravity(&mut self, gravity: [f32; 3]);

    /// Advances the simulation by one integration tick.
    fn step_simulation(&mut self);

    /// Loads a static ground plane through the origin with a +Z normal.
    ///
    /// # Errors
    ///
    /// Backend specific; the built-in backends never fail here.
    fn load_plane(&mut self) -> Result<BodyId, PhysicsError>;

    /// Loads an articulated body from a URDF file with its base at `base`.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed, or when it uses joint
    /// types or geometry the backend does not support.
    fn load_urdf(&mut self, path: &Path, base: Pose) -> Result<BodyId, PhysicsError>;

    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] for a handle not issued by this session.
    fn num_joints(&self, body: BodyId) -> Result<usize, PhysicsError>;

    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] or [`PhysicsError::UnknownJoint`].
    fn joint_info(&self, body: BodyId, joint: JointIndex) -> Result<JointInfo, PhysicsError>;

    /// Applies a torque to a link for the next tick.
    ///
    /// `link` selects the link driven by that joint; `None` targets the base.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] or [`PhysicsError::UnknownJoint`].
    fn apply_external_torque(
        &mut self,
        body: BodyId,
        link: Option<JointIndex>,
        torque: [f32; 3],
        frame: ForceFrame,
    ) -> Result<(), PhysicsError>;

    /// Commands the joint's position servo towards `target`.
    ///
    /// The servo is force limited by the joint's `max_force` and speed limited
    /// by its `max_velocity`, so the joint converges over several ticks.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] or [`PhysicsError::UnknownJoint`].
    fn set_joint_position_target(
        &mut self,
        body: BodyId,
        joint: JointIndex,
        target: f32,
    ) -> Result<(), PhysicsError>;

    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] or [`PhysicsError::UnknownJoint`].
    fn joint_state(&self, body: BodyId, joint: JointIndex) -> Result<JointState, PhysicsError>;

    /// Teleports a joint to the given generalized position and velocity.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] or [`PhysicsError::UnknownJoint`].
    fn reset_joint_state(
        &mut self,
        body: BodyId,
        joint: JointIndex,
        position: f32,
        velocity: f32,
    ) -> Result<(), PhysicsError>;

    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] for a handle not issued by this session.
    fn base_pose(&self, body: BodyId) -> Result<Pose, PhysicsError>;

    /// Teleports the base; the rest of the body keeps its joint configuration.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] for a handle not issued by this session.
    fn reset_base_pose(&mut self, body: BodyId, pose: Pose) -> Result<(), PhysicsError>;

    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] for a handle not issued by this session.
    fn reset_base_velocity(
        &mut self,
        body: BodyId,
        linear: [f32; 3],
        angular: [f32; 3],
    ) -> Result<(), PhysicsError>;

    fn camera_image(&self, camera: &CameraConfig) -> CameraImage;

    fn add_debug_parameter(&mut self, name: &str, min: f32, max: f32, default: f32)
        -> DebugParamId;

    /// # Errors
    ///
    /// [`PhysicsError::UnknownDebugParameter`] for an unregistered id.
    fn read_debug_parameter(&self, id: DebugParamId) -> Result<f32, PhysicsError>;

    /// # Errors
    ///
    /// [`PhysicsError::UnknownDebugParameter`] for an unregistered id.
    fn set_debug_parameter(&mut self, id: DebugParamId, value: f32) -> Result<(), PhysicsError>;

    fn find_debug_parameter(&self, name: &str) -> Option<DebugParamId>;
}
