use nalgebra::Vector3;

use crate::config::SimConfig;
use crate::dynamics::state::{ControlInput, State};
use super::controller::{ControlOutput, Controller};
use super::pd::Pd;

// ---------------------------------------------------------------------------
// Cascaded position -> attitude PD controller
// ---------------------------------------------------------------------------

/// Two-loop PD controller.
///
/// The outer loop turns position error into a desired acceleration; the
/// vertical part sets collective thrust, the horizontal part is inverted
/// through the small-angle force equations into roll/pitch setpoints. The
/// inner loop turns attitude error into body torques. Heading is held at zero.
///
/// No integral term and no memory between calls: the output is a pure
/// function of state, target and gains.
#[derive(Debug, Clone)]
pub struct CascadedPd {
    mass: f64,
    gravity: f64,
    position: Pd,
    attitude: Pd,
}

impl CascadedPd {
    pub fn new(config: &SimConfig) -> Self {
        let gains = &config.gains;
        Self {
            mass: config.mass,
            gravity: config.gravity,
            position: Pd::new(gains.kp_pos(), gains.kd_pos()),
            attitude: Pd::new(gains.kp_att(), gains.kd_att()),
        }
    }

    /// Outer loop. Returns `(desired acceleration, position error)`.
    pub fn desired_acceleration(
        &self,
        state: &State,
        target: &Vector3<f64>,
    ) -> (Vector3<f64>, Vector3<f64>) {
        let error = target - state.pos;
        (self.position.update(&error, &state.vel), error)
    }

    /// Vertical channel inversion, clamped at zero.
    pub fn thrust(&self, accel_z: f64) -> f64 {
        (self.mass * (self.gravity + accel_z)).max(0.0)
    }

    /// Roll/pitch setpoints for a horizontal acceleration at the current yaw.
    /// Valid near hover; desired yaw is always zero.
    pub fn desired_attitude(&self, accel: &Vector3<f64>, yaw: f64) -> Vector3<f64> {
        let (sin_psi, cos_psi) = yaw.sin_cos();
        let roll = (accel.x * sin_psi - accel.y * cos_psi) / self.gravity;
        let pitch = (accel.x * cos_psi + accel.y * sin_psi) / self.gravity;
        Vector3::new(roll, pitch, 0.0)
    }

    /// Inner loop: torque from attitude error, damped by body rates.
    pub fn torque(&self, state: &State, desired: &Vector3<f64>) -> Vector3<f64> {
        let error = desired - state.euler;
        self.attitude.update(&error, &state.omega)
    }

    pub fn compute(&self, state: &State, target: &Vector3<f64>) -> ControlOutput {
        let (accel, position_error) = self.desired_acceleration(state, target);
        let thrust = self.thrust(accel.z);
        let desired = self.desired_attitude(&accel, state.yaw());
        let torque = self.torque(state, &desired);

        ControlOutput {
            input: ControlInput::new(thrust, torque),
            position_error,
        }
    }
}

impl Controller for CascadedPd {
    fn update(&mut self, state: &State, target: &Vector3<f64>) -> ControlOutput {
        self.compute(state, target)
    }

    fn name(&self) -> &str {
        "CascadedPd"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
