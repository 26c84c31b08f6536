//! Episode loop of the runner.

use std::path::PathBuf;

use anyhow::{Context, Result};
use physics::PhysicsClient;
use rl::unicycle::{HUMAN_SLIDER, WHEEL_SLIDER};
use rl::{Env, UnicycleConfig, UnicycleEnv};

use crate::cli::{Cli, Policy};

/// Outcome of one episode.
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeSummary {
    pub steps: u64,
    pub total_reward: f32,
    /// The robot fell before `max_steps` ran out.
    pub fell: bool,
}

/// Runs `cli.episodes` episodes and exports the recording if requested.
///
/// # Errors
///
/// Configuration, environment construction, simulator and export failures.
pub fn run(cli: &Cli) -> Result<Vec<EpisodeSummary>> {
    let config = cli.config().context("failed to build configuration")?;
    let robot_path = config.robot_path.clone();
    let export = record_path(&config);
    let mut env = UnicycleEnv::new(config)
        .with_context(|| format!("failed to create environment for {}", robot_path.display()))?;

    if env.config().debug {
        preset_slider(&mut env, WHEEL_SLIDER, cli.wheel)?;
        preset_slider(&mut env, HUMAN_SLIDER, cli.human)?;
    }

    let rng = cli.seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
    let action_space = env.action_space();
    let mut summaries = Vec::new();

    for episode in 0..cli.episodes {
        let mut summary = EpisodeSummary {
            steps: 0,
            total_reward: 0.0,
            fell: false,
        };
        for _ in 0..cli.max_steps {
            let action = match cli.policy {
                Policy::Zero => vec![0.0; action_space.len()],
                Policy::Random => action_space.sample(&rng),
            };
            let (_, reward, done, _) = env
                .step(&action)
                .with_context(|| format!("step failed in episode {episode}"))?;
            summary.steps += 1;
            summary.total_reward += reward;
            tracing::trace!("{}", env.render_ansi());
            if done {
                tracing::info!("done");
                summary.fell = true;
                break;
            }
        }
        tracing::info!(
            "episode {episode}: {} steps, return {}",
            summary.steps,
            summary.total_reward
        );
        summaries.push(summary);

        tracing::info!("reset");
        env.reset().context("reset failed")?;
    }

    if let Some(path) = export {
        env.save_img(&path)
            .with_context(|| format!("failed to export {}", path.display()))?;
    }
    Ok(summaries)
}

/// Where a recording configured by `config` is exported, if it records at
/// all. Without an explicit path a timestamped name is used.
#[must_use]
pub fn record_path(config: &UnicycleConfig) -> Option<PathBuf> {
    config.record.then(|| {
        config
            .record_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(render::timestamped_file_name("unicycle", "gif")))
    })
}

fn preset_slider<C: PhysicsClient>(
    env: &mut UnicycleEnv<C>,
    name: &str,
    value: Option<f32>,
) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    let client = env.client_mut();
    let id = client
        .find_debug_parameter(name)
        .with_context(|| format!("no {name} slider registered"))?;
    client.set_debug_parameter(id, value)?;
    Ok(())
}
