//! [`RapierClient`]: the [`PhysicsClient`] backend built on raw `rapier3d`.
//!
//! Every URDF link becomes a dynamic rigid body and every joint an impulse
//! joint. Joint frames are built so that the joint always moves along (or
//! about) its local X axis, which keeps joint readback and the position servo
//! independent of how the URDF orients its axes.

use std::collections::HashMap;
use std::path::Path;

use rapier3d::prelude::{
    CCDSolver, ColliderBuilder, ColliderSet, DefaultBroadPhase, GenericJoint,
    GenericJointBuilder, Group, ImpulseJointHandle, ImpulseJointSet, IntegrationParameters,
    InteractionGroups, IslandManager, Isometry, JointAxesMask, JointAxis, MassProperties,
    MultibodyJointSet, NarrowPhase, PhysicsPipeline, Point, Real, RigidBodyBuilder,
    RigidBodyHandle, RigidBodySet, Vector,
};

use crate::camera;
use crate::client::PhysicsClient;
use crate::debug::DebugParameters;
use crate::error::PhysicsError;
use crate::transform::{self, isometry_to_pose, pose_to_isometry, x_axis_onto};
use crate::types::{
    BodyId, CameraConfig, CameraImage, ConnectionMode, DebugParamId, ForceFrame, JointIndex,
    JointInfo, JointKind, JointState, Pose,
};
use crate::urdf::{self, Geometry, LinkDescription, RobotDescription};

/// Servo cap used when a URDF joint declares no effort limit.
const DEFAULT_MAX_FORCE: f32 = 100.0;
const POSITION_STIFFNESS: f32 = 200.0;
const POSITION_DAMPING: f32 = 20.0;
/// Density of links whose URDF declares no inertial block (kg/m^3).
const LINK_DENSITY: f32 = 1000.0;

const GROUND_COLOR: [f32; 4] = [0.55, 0.57, 0.6, 1.0];
const LINK_COLOR: [f32; 4] = [0.85, 0.45, 0.2, 1.0];

// Robot links collide with the ground but never with each other.
const GROUND_GROUP: Group = Group::GROUP_1;
const ROBOT_GROUP: Group = Group::GROUP_2;

/// A body loaded into the session: the ground plane or a URDF robot.
struct LoadedBody {
    name: String,
    base: RigidBodyHandle,
    /// Every rigid body of the body, base first.
    links: Vec<RigidBodyHandle>,
    joints: Vec<LoadedJoint>,
}

struct LoadedJoint {
    info: JointInfo,
    handle: ImpulseJointHandle,
    parent: RigidBodyHandle,
    child: RigidBodyHandle,
    /// Joint frame in the parent body's frame.
    frame1: Isometry<Real>,
    /// Joint frame in the child body's frame.
    frame2: Isometry<Real>,
}

impl LoadedJoint {
    const fn motor_axis(&self) -> Option<JointAxis> {
        match self.info.kind {
            JointKind::Revolute | JointKind::Continuous => Some(JointAxis::AngX),
            JointKind::Prismatic => Some(JointAxis::LinX),
            JointKind::Fixed => None,
        }
    }
}

/// A `rapier3d` simulation session.
///
/// `PhysicsPipeline::step()` needs mutable access to every set at once, so
/// all pipeline state lives together in this struct.
pub struct RapierClient {
    mode: ConnectionMode,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    bodies: Vec<LoadedBody>,
    debug_parameters: DebugParameters,
}

impl RapierClient {
    /// Opens an empty session with zero gravity and rapier's default time step.
    #[must_use]
    pub fn connect(mode: ConnectionMode) -> Self {
        match mode {
            ConnectionMode::Gui => {
                tracing::info!("GUI session requested; no viewer is attached, running headless");
            }
            ConnectionMode::Direct => tracing::debug!("headless session opened"),
        }
        Self {
            mode,
            gravity: Vector::zeros(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            bodies: Vec::new(),
            debug_parameters: DebugParameters::new(),
        }
    }

    /// Name of a loaded body (the URDF robot name, or `"plane"`).
    ///
    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] for a handle not issued by this session.
    pub fn body_name(&self, body: BodyId) -> Result<&str, PhysicsError> {
        self.body(body).map(|b| b.name.as_str())
    }

    /// Builds an already parsed robot description into the session.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::InvalidTree`] if the joints do not form a tree rooted
    /// at `robot.root_link`, [`PhysicsError::UnknownLink`] if a joint names a
    /// link the description does not have.
    pub fn spawn_robot(
        &mut self,
        robot: &RobotDescription,
        base: Pose,
    ) -> Result<BodyId, PhysicsError> {
        // URDF joint origins are relative to the parent link, so walk the tree
        // from the root and accumulate world poses.
        let mut link_poses: HashMap<&str, Isometry<Real>> = HashMap::new();
        link_poses.insert(robot.root_link.as_str(), pose_to_isometry(&base));
        let mut queue = vec![robot.root_link.as_str()];
        while let Some(parent) = queue.pop() {
            let parent_pose = link_poses[parent];
            for joint in robot.joints.iter().filter(|j| j.parent == parent) {
                let child = joint.child.as_str();
                if link_poses.contains_key(child) {
                    return Err(PhysicsError::InvalidTree {
                        link: joint.child.clone(),
                        reason: "closes a joint loop",
                    });
                }
                link_poses.insert(child, parent_pose * joint.origin.isometry());
                queue.push(child);
            }
        }

        let mut handles: HashMap<&str, RigidBodyHandle> = HashMap::new();
        let mut links = Vec::with_capacity(robot.links.len());
        // Root first so `links[0]` is always the base.
        let ordered = robot
            .links
            .iter()
            .filter(|l| l.name == robot.root_link)
            .chain(robot.links.iter().filter(|l| l.name != robot.root_link));
        for link in ordered {
            let pose = link_poses
                .get(link.name.as_str())
                .copied()
                .ok_or_else(|| PhysicsError::InvalidTree {
                    link: link.name.clone(),
                    reason: "is not reachable from the root link",
                })?;
            let handle = self.insert_link(link, pose);
            handles.insert(link.name.as_str(), handle);
            links.push(handle);
        }

        let mut joints = Vec::with_capacity(robot.joints.len());
        for (index, description) in robot.joints.iter().enumerate() {
            let link_handle = |name: &str| {
                handles
                    .get(name)
                    .copied()
                    .ok_or_else(|| PhysicsError::UnknownLink {
                        joint: description.name.clone(),
                        link: name.to_owned(),
                    })
            };
            let parent = link_handle(description.parent.as_str())?;
            let child = link_handle(description.child.as_str())?;

            let axis_frame = Isometry::from_parts(
                Vector::zeros().into(),
                x_axis_onto(description.axis),
            );
            let frame1 = description.origin.isometry() * axis_frame;
            let frame2 = axis_frame;

            let mask = match description.kind {
                JointKind::Revolute | JointKind::Continuous => JointAxesMask::LOCKED_REVOLUTE_AXES,
                JointKind::Prismatic => JointAxesMask::LOCKED_PRISMATIC_AXES,
                JointKind::Fixed => JointAxesMask::LOCKED_FIXED_AXES,
            };
            let mut data: GenericJoint = GenericJointBuilder::new(mask)
                .contacts_enabled(false)
                .build();
            data.local_frame1 = frame1;
            data.local_frame2 = frame2;
            if let (Some(lo), Some(hi)) = (description.lower, description.upper) {
                let axis = match description.kind {
                    JointKind::Prismatic => JointAxis::LinX,
                    _ => JointAxis::AngX,
                };
                data.set_limits(axis, [lo, hi]);
            }

            let handle = self.impulse_joint_set.insert(parent, child, data, true);
            let max_force = if description.effort > 0.0 {
                description.effort
            } else {
                DEFAULT_MAX_FORCE
            };
            joints.push(LoadedJoint {
                info: JointInfo {
                    index: JointIndex(index),
                    name: description.name.clone(),
                    kind: description.kind,
                    parent_link: description.parent.clone(),
                    child_link: description.child.clone(),
                    lower: description.lower,
                    upper: description.upper,
                    max_force,
                    max_velocity: description.velocity,
                },
                handle,
                parent,
                child,
                frame1,
                frame2,
            });
        }

        let id = BodyId(self.bodies.len());
        tracing::debug!(
            "loaded robot {} as {id} with {} links and {} joints",
            robot.name,
            links.len(),
            joints.len()
        );
        self.bodies.push(LoadedBody {
            name: robot.name.clone(),
            base: links[0],
            links,
            joints,
        });
        Ok(id)
    }

    fn insert_link(&mut self, link: &LinkDescription, pose: Isometry<Real>) -> RigidBodyHandle {
        let mut builder = RigidBodyBuilder::dynamic().position(pose).can_sleep(false);
        if let Some(inertial) = &link.inertial {
            let com = inertial.origin.xyz;
            builder = builder.additional_mass_properties(MassProperties::new(
                Point::new(com[0], com[1], com[2]),
                inertial.mass,
                transform::vector(inertial.principal_inertia),
            ));
        }
        let handle = self.rigid_body_set.insert(builder.build());

        let density = if link.inertial.is_some() { 0.0 } else { LINK_DENSITY };
        let color = camera::pack_color(link.color.unwrap_or(LINK_COLOR), false);
        for shape in &link.collisions {
            let collider = collider_builder(shape.geometry, shape.origin.isometry())
                .density(density)
                .collision_groups(InteractionGroups::new(ROBOT_GROUP, GROUND_GROUP))
                .user_data(color)
                .build();
            self.collider_set
                .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        }
        handle
    }

    fn body(&self, body: BodyId) -> Result<&LoadedBody, PhysicsError> {
        self.bodies.get(body.0).ok_or(PhysicsError::UnknownBody(body))
    }

    fn joint(&self, body: BodyId, joint: JointIndex) -> Result<&LoadedJoint, PhysicsError> {
        self.body(body)?
            .joints
            .get(joint.0)
            .ok_or(PhysicsError::UnknownJoint { body, joint })
    }

    /// `link` plus every link below it in the joint tree.
    fn subtree(&self, body: &LoadedBody, link: RigidBodyHandle) -> Vec<RigidBodyHandle> {
        let mut found = vec![link];
        let mut cursor = 0;
        while cursor < found.len() {
            let parent = found[cursor];
            found.extend(
                body.joints
                    .iter()
                    .filter(|j| j.parent == parent)
                    .map(|j| j.child),
            );
            cursor += 1;
        }
        found
    }

    /// Rigidly moves a set of bodies by `delta` and gives them one velocity.
    fn move_bodies(
        &mut self,
        handles: &[RigidBodyHandle],
        delta: &Isometry<Real>,
        linvel: Vector<Real>,
        angvel: Vector<Real>,
    ) {
        for &handle in handles {
            let rb = &mut self.rigid_body_set[handle];
            let pose = delta * rb.position();
            rb.set_position(pose, true);
            rb.set_linvel(linvel, true);
            rb.set_angvel(angvel, true);
        }
    }
}

/// Moves a servo target at most `max_velocity * dt` away from `current`.
///
/// A non-positive `max_velocity` means the joint declares no speed limit.
fn rate_limited_target(current: f32, target: f32, max_velocity: f32, dt: f32) -> f32 {
    if max_velocity > 0.0 {
        let reach = max_velocity * dt;
        target.clamp(current - reach, current + reach)
    } else {
        target
    }
}

fn collider_builder(geometry: Geometry, origin: Isometry<Real>) -> ColliderBuilder {
    match geometry {
        Geometry::Box { half_extents: [x, y, z] } => ColliderBuilder::cuboid(x, y, z).position(origin),
        Geometry::Sphere { radius } => ColliderBuilder::ball(radius).position(origin),
        Geometry::Cylinder { radius, length } => {
            // rapier cylinders run along Y, URDF cylinders along Z.
            let y_to_z = Isometry::rotation(Vector::x() * std::f32::consts::FRAC_PI_2);
            ColliderBuilder::cylinder(length * 0.5, radius).position(origin * y_to_z)
        }
        Geometry::Capsule { radius, length } => {
            ColliderBuilder::capsule_z(length * 0.5, radius).position(origin)
        }
    }
}

impl PhysicsClient for RapierClient {
    fn mode(&self) -> ConnectionMode {
        self.mode
    }

    fn set_time_step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    fn time_step(&self) -> f32 {
        self.integration_parameters.dt
    }

    fn set_gravity(&mut self, gravity: [f32; 3]) {
        self.gravity = transform::vector(gravity);
    }

    fn step_simulation(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
        // External forces only last for one tick.
        for (_, rb) in self.rigid_body_set.iter_mut() {
            rb.reset_forces(false);
            rb.reset_torques(false);
        }
    }

    fn load_plane(&mut self) -> Result<BodyId, PhysicsError> {
        let base = self.rigid_body_set.insert(RigidBodyBuilder::fixed().build());
        let collider = ColliderBuilder::halfspace(Vector::z_axis())
            .collision_groups(InteractionGroups::new(GROUND_GROUP, Group::ALL))
            .user_data(camera::pack_color(GROUND_COLOR, true))
            .build();
        self.collider_set
            .insert_with_parent(collider, base, &mut self.rigid_body_set);

        let id = BodyId(self.bodies.len());
        self.bodies.push(LoadedBody {
            name: String::from("plane"),
            base,
            links: vec![base],
            joints: Vec::new(),
        });
        Ok(id)
    }

    fn load_urdf(&mut self, path: &Path, base: Pose) -> Result<BodyId, PhysicsError> {
        let robot = urdf::parse_file(path)?;
        tracing::info!("loading {} from {}", robot.name, path.display());
        self.spawn_robot(&robot, base)
    }

    fn num_joints(&self, body: BodyId) -> Result<usize, PhysicsError> {
        Ok(self.body(body)?.joints.len())
    }

    fn joint_info(&self, body: BodyId, joint: JointIndex) -> Result<JointInfo, PhysicsError> {
        Ok(self.joint(body, joint)?.info.clone())
    }

    fn apply_external_torque(
        &mut self,
        body: BodyId,
        link: Option<JointIndex>,
        torque: [f32; 3],
        frame: ForceFrame,
    ) -> Result<(), PhysicsError> {
        let handle = match link {
            Some(joint) => self.joint(body, joint)?.child,
            None => self.body(body)?.base,
        };
        let rb = &mut self.rigid_body_set[handle];
        let torque = transform::vector(torque);
        let torque = match frame {
            ForceFrame::Link => rb.position().rotation * torque,
            ForceFrame::World => torque,
        };
        rb.add_torque(torque, true);
        Ok(())
    }

    fn set_joint_position_target(
        &mut self,
        body: BodyId,
        joint: JointIndex,
        target: f32,
    ) -> Result<(), PhysicsError> {
        let current = self.joint_state(body, joint)?.position;
        let loaded = self.joint(body, joint)?;
        let Some(axis) = loaded.motor_axis() else {
            return Ok(());
        };
        let (handle, max_force) = (loaded.handle, loaded.info.max_force);
        let target = rate_limited_target(
            current,
            target,
            loaded.info.max_velocity,
            self.integration_parameters.dt,
        );
        if let Some(impulse_joint) = self.impulse_joint_set.get_mut(handle) {
            impulse_joint
                .data
                .set_motor_position(axis, target, POSITION_STIFFNESS, POSITION_DAMPING)
                .set_motor_max_force(axis, max_force);
        }
        Ok(())
    }

    fn joint_state(&self, body: BodyId, joint: JointIndex) -> Result<JointState, PhysicsError> {
        let loaded = self.joint(body, joint)?;
        let parent = &self.rigid_body_set[loaded.parent];
        let child = &self.rigid_body_set[loaded.child];

        let world1 = parent.position() * loaded.frame1;
        let world2 = child.position() * loaded.frame2;
        let relative = world1.inverse() * world2;
        let axis = world1.rotation * Vector::x();

        Ok(match loaded.info.kind {
            JointKind::Prismatic => JointState {
                position: relative.translation.vector.x,
                velocity: (child.linvel() - parent.linvel()).dot(&axis),
            },
            // Angles are wrapped to [-pi, pi].
            JointKind::Revolute | JointKind::Continuous => JointState {
                position: relative.rotation.scaled_axis().x,
                velocity: (child.angvel() - parent.angvel()).dot(&axis),
            },
            JointKind::Fixed => JointState::default(),
        })
    }

    fn reset_joint_state(
        &mut self,
        body: BodyId,
        joint: JointIndex,
        position: f32,
        velocity: f32,
    ) -> Result<(), PhysicsError> {
        let loaded = self.joint(body, joint)?;
        let (kind, child, frame1, frame2) =
            (loaded.info.kind, loaded.child, loaded.frame1, loaded.frame2);
        let parent = &self.rigid_body_set[loaded.parent];
        let (parent_pose, parent_linvel, parent_angvel) =
            (*parent.position(), *parent.linvel(), *parent.angvel());

        let world1 = parent_pose * frame1;
        let axis = world1.rotation * Vector::x();
        let (motion, linvel, angvel) = match kind {
            JointKind::Prismatic => (
                Isometry::translation(position, 0.0, 0.0),
                parent_linvel + axis * velocity,
                parent_angvel,
            ),
            JointKind::Revolute | JointKind::Continuous => (
                Isometry::rotation(Vector::x() * position),
                parent_linvel,
                parent_angvel + axis * velocity,
            ),
            JointKind::Fixed => (Isometry::identity(), parent_linvel, parent_angvel),
        };

        let target = world1 * motion * frame2.inverse();
        let delta = target * self.rigid_body_set[child].position().inverse();
        let subtree = self.subtree(self.body(body)?, child);
        self.move_bodies(&subtree, &delta, linvel, angvel);
        Ok(())
    }

    fn base_pose(&self, body: BodyId) -> Result<Pose, PhysicsError> {
        let base = self.body(body)?.base;
        Ok(isometry_to_pose(self.rigid_body_set[base].position()))
    }

    fn reset_base_pose(&mut self, body: BodyId, pose: Pose) -> Result<(), PhysicsError> {
        let loaded = self.body(body)?;
        let links = loaded.links.clone();
        let delta = pose_to_isometry(&pose) * self.rigid_body_set[loaded.base].position().inverse();

        // Velocities are left untouched; see `reset_base_velocity`.
        for handle in links {
            let rb = &mut self.rigid_body_set[handle];
            let moved = delta * rb.position();
            rb.set_position(moved, true);
        }
        Ok(())
    }

    fn reset_base_velocity(
        &mut self,
        body: BodyId,
        linear: [f32; 3],
        angular: [f32; 3],
    ) -> Result<(), PhysicsError> {
        let links = self.body(body)?.links.clone();
        self.move_bodies(
            &links,
            &Isometry::identity(),
            transform::vector(linear),
            transform::vector(angular),
        );
        Ok(())
    }

    fn camera_image(&self, camera: &CameraConfig) -> CameraImage {
        camera::render(&self.rigid_body_set, &self.collider_set, camera)
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
