#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Frame Recording
//!
//! Turns the raw RGBA captures of a [`physics::PhysicsClient`] session into
//! image files: an animated GIF of a whole run, or a PNG of a single frame.
//! Frames are kept in memory until exported.

pub mod error;
pub mod recorder;

pub use error::RecordError;
pub use recorder::{timestamped_file_name, FrameRecorder, FrameSink};
