use std::collections::BTreeMap;

use crate::error::EnvError;
use crate::spaces::BoxSpace;

/// Auxiliary diagnostics returned with every step.
pub type Info = BTreeMap<String, f32>;

/// `(observation, reward, done, info)`.
pub type StepResult = (Vec<f32>, f32, bool, Info);

/// Reinforcement learning environment trait.
///
/// Inspired by classic frameworks like OpenAI Gym, this trait defines the core
/// interface an environment must provide. Each call to [`step`] advances the
/// simulation by one action and returns the new observation vector, a reward
/// signal, whether the episode has terminated, and an info map.
///
/// [`step`]: Env::step
pub trait Env {
    /// Advance the environment by one action.
    ///
    /// # Errors
    ///
    /// Any simulator failure; these are not recoverable within the episode.
    fn step(&mut self, action: &[f32]) -> Result<StepResult, EnvError>;

    /// Reset the environment to its starting state and return the initial
    /// observation vector.
    ///
    /// # Errors
    ///
    /// Any simulator failure.
    fn reset(&mut self) -> Result<Vec<f32>, EnvError>;

    /// Size of the observation vector.
    fn obs_size(&self) -> usize;

    /// Size of the action vector.
    fn action_size(&self) -> usize;

    fn action_space(&self) -> BoxSpace;

    /// Declared bounds of the observation. Not enforced.
    fn observation_space(&self) -> BoxSpace;

    fn reward_range(&self) -> (f32, f32);
}
