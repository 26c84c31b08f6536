#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Unicycle Physics Client
//!
//! The physics layer the unicycle environment is built on. The environment
//! never talks to a rigid-body engine directly; it drives a session through
//! the [`PhysicsClient`] trait, which exposes the small set of capabilities an
//! RL environment needs from a simulator.
//!
//! ## Key Components
//!
//! -   **Client interface:** [`PhysicsClient`] in the [`client`] module covers
//!     session configuration, scene loading, joint introspection and control,
//!     base state, camera capture and debug sliders.
//! -   **Rapier backend:** [`RapierClient`] implements the interface on top of
//!     `rapier3d`. Robots are loaded from URDF files through the [`urdf`]
//!     module and every link becomes a dynamic rigid body connected by
//!     impulse joints.
//! -   **Camera:** [`camera`] ray-casts the collider set into an RGBA buffer so
//!     episodes can be recorded without a window system.
//! -   **Mock backend:** with the `mock` feature, [`mock::MockClient`] replays
//!     scripted base poses and records every actuator call.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use physics::{ConnectionMode, ForceFrame, PhysicsClient, Pose, RapierClient};
//!
//! let mut client = RapierClient::connect(ConnectionMode::Direct);
//! client.set_time_step(0.01);
//! client.set_gravity([0.0, 0.0, -10.0]);
//! client.load_plane()?;
//! let robot = client.load_urdf("assets/unicycle.urdf".as_ref(), Pose::IDENTITY)?;
//! client.step_simulation();
//! let pose = client.base_pose(robot)?;
//! ```

pub mod camera;
pub mod client;
pub mod debug;
pub mod error;
#[cfg(feature = "mock")]
pub mod mock;
pub mod rapier;
pub mod transform;
pub mod types;
pub mod urdf;

pub use client::PhysicsClient;
pub use debug::{DebugParameter, DebugParameters};
pub use error::PhysicsError;
pub use rapier::RapierClient;
pub use types::{
    BodyId, CameraConfig, CameraImage, ConnectionMode, DebugParamId, ForceFrame, JointIndex,
    JointInfo, JointKind, JointState, Pose,
};
