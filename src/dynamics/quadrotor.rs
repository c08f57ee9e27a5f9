use nalgebra::Vector3;

use crate::config::SimConfig;
use crate::dynamics::state::{ControlInput, Deriv, State};
use crate::sim::integrator::Integrator;

// ---------------------------------------------------------------------------
// Newton-Euler equations of motion
// ---------------------------------------------------------------------------

/// Compute the 12-component state derivative.
///
/// Forces & moments:
///   1. Collective thrust along body +Z, rotated to inertial by Rz(yaw)·Ry(pitch)·Rx(roll)
///   2. Uniform gravity along inertial -Z
///   3. Body torques with gyroscopic cross-coupling from the current rates
///
/// Euler-angle rates are taken equal to the body rates, a small-angle
/// simplification of the full kinematic mapping.
pub fn derivatives(state: &State, config: &SimConfig, input: &ControlInput) -> Deriv {
    let (sin_phi, cos_phi) = state.roll().sin_cos();
    let (sin_theta, cos_theta) = state.pitch().sin_cos();
    let (sin_psi, cos_psi) = state.yaw().sin_cos();

    // --- Translational: third column of R times T/m, minus gravity ---
    let t_over_m = input.thrust / config.mass;
    let accel = Vector3::new(
        (cos_phi * sin_theta * cos_psi + sin_phi * sin_psi) * t_over_m,
        (cos_phi * sin_theta * sin_psi - sin_phi * cos_psi) * t_over_m,
        cos_phi * cos_theta * t_over_m - config.gravity,
    );

    // --- Rotational: Euler's equations, diagonal inertia ---
    let [ix, iy, iz] = config.inertia;
    let (p, q, r) = (state.omega.x, state.omega.y, state.omega.z);
    let domega = Vector3::new(
        (input.torque.x - (iz - iy) * q * r) / ix,
        (input.torque.y - (ix - iz) * p * r) / iy,
        (input.torque.z - (iy - ix) * p * q) / iz,
    );

    Deriv {
        dpos: state.vel,
        deuler: state.omega,
        dvel: accel,
        domega,
    }
}

// ---------------------------------------------------------------------------
// Vehicle model: owns the state, advances it one fixed step at a time
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Quadrotor {
    state: State,
    config: SimConfig,
}

impl Quadrotor {
    /// Vehicle at rest at the origin.
    pub fn new(config: SimConfig) -> Self {
        Self::with_state(config, State::default())
    }

    pub fn with_state(config: SimConfig, state: State) -> Self {
        Self { state, config }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn derivative(&self, input: &ControlInput) -> Deriv {
        derivatives(&self.state, &self.config, input)
    }

    /// Advance by `dt` with the input held constant over the step.
    pub fn step(&mut self, input: &ControlInput) -> &State {
        self.state = match self.config.integrator {
            Integrator::Euler => {
                crate::sim::integrator::euler_step(&self.state, &self.config, input, self.config.dt)
            }
            Integrator::Rk4 => {
                crate::sim::integrator::rk4_step(&self.state, &self.config, input, self.config.dt)
            }
        };
        &self.state
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
