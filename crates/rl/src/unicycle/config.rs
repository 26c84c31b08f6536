use std::path::{Path, PathBuf};
use std::time::Duration;

use physics::{CameraConfig, Pose};
use serde::{Deserialize, Serialize};

use crate::error::EnvError;

/// Every tunable of a [`UnicycleEnv`](super::UnicycleEnv).
///
/// Each environment copies its configuration at construction, so two
/// environments never share start poses, goals or scales. Missing JSON fields
/// take their default; unknown fields are rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnicycleConfig {
    /// Integration step in seconds.
    pub time_step: f32,
    /// Real-time sleep after each step, in seconds.
    pub time_wait: Option<f32>,
    /// Drive the actuators from the `wheel`/`human` sliders instead of actions.
    pub debug: bool,
    /// Open an interactive session rather than a headless one.
    pub visualize: bool,
    /// Capture a camera frame at construction and after every step.
    pub record: bool,
    /// Where a runner exports the recording. Unset means a timestamped
    /// file name in the working directory.
    pub record_path: Option<PathBuf>,
    pub robot_path: PathBuf,
    pub start_position: [f32; 3],
    /// Roll, pitch and yaw in radians.
    pub start_orientation: [f32; 3],
    pub goal: [f32; 3],
    pub gravity: [f32; 3],
    pub torque_scale: f32,
    pub human_scale: f32,
    /// Below this base height every step is penalised.
    pub penalty_height: f32,
    /// Below this base height the episode is over.
    pub fall_height: f32,
    pub camera_width: u32,
    pub camera_height: u32,
    /// GIF frame duration is `time_step * frame_duration_scale`.
    pub frame_duration_scale: f32,
    /// GIF loop count; 0 loops forever.
    pub frame_loop: u16,
}

impl Default for UnicycleConfig {
    fn default() -> Self {
        Self {
            time_step: 0.05,
            time_wait: None,
            debug: false,
            visualize: true,
            record: false,
            record_path: None,
            robot_path: default_robot_path(),
            start_position: [0.0, 0.0, 0.3],
            start_orientation: [0.0, 0.0, 0.0],
            goal: [5.0, 0.0, 0.3],
            gravity: [0.0, 0.0, -10.0],
            torque_scale: 5.0,
            human_scale: 0.05,
            penalty_height: 0.15,
            fall_height: 0.1,
            camera_width: 320,
            camera_height: 320,
            frame_duration_scale: 5.0,
            frame_loop: 1,
        }
    }
}

/// The unicycle model shipped with this crate.
#[must_use]
pub fn default_robot_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/unicycle.urdf")
}

impl UnicycleConfig {
    /// # Errors
    ///
    /// [`EnvError::Config`] for malformed JSON, wrong types or unknown fields.
    pub fn from_json_str(json: &str) -> Result<Self, EnvError> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// [`EnvError::ConfigIo`] if the file cannot be read, otherwise as
    /// [`UnicycleConfig::from_json_str`].
    pub fn from_file(path: &Path) -> Result<Self, EnvError> {
        let json = std::fs::read_to_string(path).map_err(|source| EnvError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    #[must_use]
    pub fn start_pose(&self) -> Pose {
        Pose::from_euler(self.start_position, self.start_orientation)
    }

    #[must_use]
    pub fn camera(&self) -> CameraConfig {
        CameraConfig::with_size(self.camera_width, self.camera_height)
    }

    /// Display time of one exported frame. Non-finite or negative values
    /// collapse to zero.
    #[must_use]
    pub fn frame_delay(&self) -> Duration {
        Duration::try_from_secs_f32(self.time_step * self.frame_duration_scale).unwrap_or_default()
    }

    /// Sleep after each step, if any. Invalid durations disable the wait.
    #[must_use]
    pub fn wait(&self) -> Option<Duration> {
        self.time_wait
            .and_then(|secs| Duration::try_from_secs_f32(secs).ok())
    }
}
