#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Unicycle Environment
//!
//! A reinforcement-learning environment around a simulated self-balancing
//! unicycle. The agent drives the wheel with a torque and shifts a rider mass
//! (the "human") along the frame to keep the robot upright while rolling
//! towards a goal.
//!
//! The environment only translates: actions become actuator calls on a
//! [`physics::PhysicsClient`], and simulator state becomes a fixed-size
//! observation, a reward and a termination flag. Physics is delegated to the
//! client, frame export to the [`render`] crate.
//!
//! ```rust,ignore
//! use rl::{Env, UnicycleConfig, UnicycleEnv};
//!
//! let mut env = UnicycleEnv::new(UnicycleConfig::default())?;
//! let mut obs = env.reset()?;
//! loop {
//!     let (next, reward, done, _info) = env.step(&[0.0, 0.0])?;
//!     obs = next;
//!     if done {
//!         break;
//!     }
//! }
//! ```

pub mod env;
pub mod error;
pub mod spaces;
pub mod unicycle;

pub use env::{Env, Info, StepResult};
pub use error::EnvError;
pub use spaces::BoxSpace;
pub use unicycle::{ActionSource, Actuation, UnicycleConfig, UnicycleEnv};
