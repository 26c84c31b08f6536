use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rl::{EnvError, UnicycleConfig};

/// Runs the unicycle balancing environment.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// JSON configuration file; flags below override its values.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of episodes to run.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub episodes: u32,

    /// Maximum steps per episode.
    #[arg(short, long, default_value_t = 5000)]
    pub max_steps: u64,

    /// Integration step in seconds.
    #[arg(long)]
    pub time_step: Option<f32>,

    /// Real-time sleep after each step, in seconds.
    #[arg(long)]
    pub time_wait: Option<f32>,

    /// Drive the robot from the `wheel`/`human` sliders.
    #[arg(long)]
    pub debug: bool,

    /// Open a headless session.
    #[arg(long)]
    pub headless: bool,

    /// Record frames and export them as a GIF. Without a file name a
    /// timestamped one is used.
    #[arg(long, value_name = "FILE")]
    pub record: Option<Option<PathBuf>>,

    /// URDF robot description to load instead of the bundled unicycle.
    #[arg(long, value_name = "FILE")]
    pub robot: Option<PathBuf>,

    /// Action policy outside debug mode.
    #[arg(long, value_enum, default_value_t = Policy::Zero)]
    pub policy: Policy,

    /// Seed of the random policy.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Initial `wheel` slider value in debug mode.
    #[arg(long, allow_negative_numbers = true)]
    pub wheel: Option<f32>,

    /// Initial `human` slider value in debug mode.
    #[arg(long, allow_negative_numbers = true)]
    pub human: Option<f32>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Policy {
    /// Always `[0, 0]`.
    Zero,
    /// Uniform samples from the action space.
    Random,
}

impl Cli {
    /// Defaults, then the config file, then flags.
    ///
    /// # Errors
    ///
    /// Any error reading or parsing the config file.
    pub fn config(&self) -> Result<UnicycleConfig, EnvError> {
        let mut config = match &self.config {
            Some(path) => UnicycleConfig::from_file(path)?,
            None => UnicycleConfig::default(),
        };
        if let Some(time_step) = self.time_step {
            config.time_step = time_step;
        }
        if self.time_wait.is_some() {
            config.time_wait = self.time_wait;
        }
        if let Some(robot) = &self.robot {
            config.robot_path.clone_from(robot);
        }
        config.debug |= self.debug;
        if let Some(record) = &self.record {
            config.record = true;
            if record.is_some() {
                config.record_path.clone_from(record);
            }
        }
        if self.headless {
            config.visualize = false;
        }
        Ok(config)
    }
}
