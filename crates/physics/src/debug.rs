//! Registry of named scalar sliders.
//!
//! Sliders let a person steer a running session by hand. The registry only
//! stores values; whatever front-end drives the session writes into it and
//! the environment reads from it.

use crate::error::PhysicsError;
use crate::types::DebugParamId;

#[derive(Clone, Debug, PartialEq)]
pub struct DebugParameter {
    pub name: String,
    pub min: f32,
    pub max: f32,
    value: f32,
}

impl DebugParameter {
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }
}

#[derive(Clone, Debug, Default)]
pub struct DebugParameters {
    params: Vec<DebugParameter>,
}

impl DebugParameters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a slider over `[min, max]` starting at `default`.
    ///
    /// Reversed bounds are swapped and the default is clamped into range.
    pub fn add(&mut self, name: &str, min: f32, max: f32, default: f32) -> DebugParamId {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.params.push(DebugParameter {
            name: name.to_owned(),
            min,
            max,
            value: default.clamp(min, max),
        });
        DebugParamId(self.params.len() - 1)
    }

    /// Current value of a slider.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownDebugParameter`] for an unregistered id.
    pub fn read(&self, id: DebugParamId) -> Result<f32, PhysicsError> {
        self.get(id).map(DebugParameter::value)
    }

    /// Moves a slider, clamping the value into its range.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownDebugParameter`] for an unregistered id.
    pub fn set(&mut self, id: DebugParamId, value: f32) -> Result<(), PhysicsError> {
        let param = self
            .params
            .get_mut(id.0)
            .ok_or(PhysicsError::UnknownDebugParameter(id))?;
        param.value = value.clamp(param.min, param.max);
        Ok(())
    }

    /// Looks up a slider by name; the first registration wins.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<DebugParamId> {
        self.params
            .iter()
            .position(|p| p.name == name)
            .map(DebugParamId)
    }

    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownDebugParameter`] for an unregistered id.
    pub fn get(&self, id: DebugParamId) -> Result<&DebugParameter, PhysicsError> {
        self.params
            .get(id.0)
            .ok_or(PhysicsError::UnknownDebugParameter(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
