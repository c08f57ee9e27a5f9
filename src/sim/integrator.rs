use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::dynamics;
use crate::dynamics::state::{ControlInput, State};

/// Fixed-step update rule used by [`crate::dynamics::Quadrotor::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Integrator {
    /// First-order explicit update. Drifts in energy over long horizons.
    #[default]
    Euler,
    /// Classical 4th-order Runge-Kutta, input held constant over the step.
    Rk4,
}

// ---------------------------------------------------------------------------
// Forward Euler
// ---------------------------------------------------------------------------

/// `state + f(state, input) * dt`.
pub fn euler_step(state: &State, config: &SimConfig, input: &ControlInput, dt: f64) -> State {
    let d = dynamics::derivatives(state, config, input);
    state.apply(&d, dt)
}

// ---------------------------------------------------------------------------
// RK4 with constant control input over the step
// ---------------------------------------------------------------------------

pub fn rk4_step(state: &State, config: &SimConfig, input: &ControlInput, dt: f64) -> State {
    let k1 = dynamics::derivatives(state, config, input);
    let k2 = dynamics::derivatives(&state.apply(&k1, dt * 0.5), config, input);
    let k3 = dynamics::derivatives(&state.apply(&k2, dt * 0.5), config, input);
    let k4 = dynamics::derivatives(&state.apply(&k3, dt), config, input);

    State {
        pos: state.pos + (k1.dpos + 2.0 * k2.dpos + 2.0 * k3.dpos + k4.dpos) * (dt / 6.0),
        euler: state.euler
            + (k1.deuler + 2.0 * k2.deuler + 2.0 * k3.deuler + k4.deuler) * (dt / 6.0),
        vel: state.vel + (k1.dvel + 2.0 * k2.dvel + 2.0 * k3.dvel + k4.dvel) * (dt / 6.0),
        omega: state.omega
            + (k1.domega + 2.0 * k2.domega + 2.0 * k3.domega + k4.domega) * (dt / 6.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;

    #[test]
    fn rk4_free_fall_is_exact() {
        let config = SimConfig::default();
        let mut s = State::at_rest(Vector3::new(0.0, 0.0, 10.0));
        for _ in 0..100 {
            s = rk4_step(&s, &config, &ControlInput::default(), config.dt);
        }
        // constant acceleration: RK4 reproduces the parabola
        let t = 1.0;
        assert_abs_diff_eq!(s.pos.z, 10.0 - 0.5 * config.gravity * t * t, epsilon = 1e-9);
        assert_abs_diff_eq!(s.vel.z, -config.gravity * t, epsilon = 1e-9);
    }

    #[test]
    fn euler_lags_rk4_in_free_fall() {
        let config = SimConfig::default();
        let start = State::at_rest(Vector3::new(0.0, 0.0, 10.0));
        let (mut e, mut r) = (start, start);
        for _ in 0..100 {
            e = euler_step(&e, &config, &ControlInput::default(), config.dt);
            r = rk4_step(&r, &config, &ControlInput::default(), config.dt);
        }
        // Euler uses the start-of-step velocity, so it falls less far
        assert!(e.pos.z > r.pos.z);
    }

    #[test]
    fn integrator_parses_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            integrator: Integrator,
        }
        let w: Wrapper = toml::from_str("integrator = \"euler\"").unwrap();
        assert_eq!(w.integrator, Integrator::Euler);
    }
}
