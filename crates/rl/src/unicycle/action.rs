use physics::{DebugParamId, PhysicsClient, PhysicsError};

/// Slider names registered in debug mode.
pub const WHEEL_SLIDER: &str = "wheel";
pub const HUMAN_SLIDER: &str = "human";

/// Where the effective action of a step comes from. Chosen once at
/// construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionSource {
    /// The action passed to `step`.
    External,
    /// Two debug sliders; the action passed to `step` is ignored.
    InteractiveOverride {
        wheel: DebugParamId,
        human: DebugParamId,
    },
}

impl ActionSource {
    /// Registers the `wheel` and `human` sliders, range `[-1, 1]`, default 0.
    pub fn register<C: PhysicsClient + ?Sized>(client: &mut C) -> Self {
        let wheel = client.add_debug_parameter(WHEEL_SLIDER, -1.0, 1.0, 0.0);
        let human = client.add_debug_parameter(HUMAN_SLIDER, -1.0, 1.0, 0.0);
        Self::InteractiveOverride { wheel, human }
    }

    /// `[wheel, human]` for this step.
    ///
    /// Missing external components count as zero and extra ones are ignored.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::UnknownDebugParameter`] if a slider disappeared.
    pub fn resolve<C: PhysicsClient + ?Sized>(
        &self,
        client: &C,
        action: &[f32],
    ) -> Result<[f32; 2], PhysicsError> {
        match *self {
            Self::External => Ok([
                action.first().copied().unwrap_or(0.0),
                action.get(1).copied().unwrap_or(0.0),
            ]),
            Self::InteractiveOverride { wheel, human } => Ok([
                client.read_debug_parameter(wheel)?,
                client.read_debug_parameter(human)?,
            ]),
        }
    }
}

/// Actuator commands derived from one action.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Actuation {
    /// Torque about the wheel link's local Z axis.
    pub wheel_torque: f32,
    /// Position target of the human joint.
    pub human_target: f32,
}

impl Actuation {
    /// Clamps each component to `[-1, 1]` and scales it. NaN counts as zero.
    #[must_use]
    pub fn from_action(action: [f32; 2], torque_scale: f32, human_scale: f32) -> Self {
        Self {
            wheel_torque: unit(action[0]) * torque_scale,
            human_target: unit(action[1]) * human_scale,
        }
    }
}

fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}
