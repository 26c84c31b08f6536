#![deny(clippy::all, clippy::pedantic)]
//! # Unicycle Runner
//!
//! Command-line front end for the unicycle balancing environment.
//!
//! ## Project Architecture
//!
//! -   **[`physics`]:** the `PhysicsClient` interface and its `rapier3d`
//!     backend, URDF loading, the software camera and debug sliders.
//! -   **[`render`]:** in-memory frame recording with GIF and PNG export.
//! -   **[`rl`]:** the `Env` contract and the `UnicycleEnv` itself.
//! -   **`unicycle`:** this crate. [`cli`] layers configuration from defaults,
//!     an optional JSON file and command-line flags; [`app`] runs episodes
//!     with a fixed or random policy and exports the recording.
//!
//! ## Running
//!
//! ```text
//! cargo run -p unicycle -- --headless --episodes 3 --policy random --seed 7
//! cargo run -p unicycle -- --headless --record run.gif --max-steps 400
//! RUST_LOG=debug cargo run -p unicycle -- --debug --wheel 0.3
//! ```

pub mod app;
pub mod cli;

pub use app::{run, EpisodeSummary};
pub use cli::{Cli, Policy};
