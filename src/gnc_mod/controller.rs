use nalgebra::Vector3;

use crate::dynamics::state::{ControlInput, State};

/// What a controller hands back to the driver each step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlOutput {
    pub input: ControlInput,
    /// `target - position`, kept for logging.
    pub position_error: Vector3<f64>,
}

/// Trait for flight controllers.
///
/// Implement this to plug a custom control law into the simulation loop.
pub trait Controller {
    /// Compute thrust and torques driving `state` toward `target`.
    fn update(&mut self, state: &State, target: &Vector3<f64>) -> ControlOutput;

    /// Reset controller internal state, if any.
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}
