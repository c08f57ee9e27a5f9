use tracing::{debug, error, info};

use crate::config::SimConfig;
use crate::dynamics::state::State;
use crate::dynamics::Quadrotor;
use crate::error::{Result, SimError};
use crate::gnc::{CascadedPd, Controller};
use crate::route::WaypointList;
use super::event::WaypointTracker;
use super::log::{LogEntry, SimulationLog};

/// Upper bound on the log entries reserved up front.
const PREALLOC_LIMIT: usize = 200_000;

// ---------------------------------------------------------------------------
// Closed-loop waypoint mission
// ---------------------------------------------------------------------------

/// Fly `route` from `initial` with a custom controller.
///
/// Runs the full horizon (`config.steps()` steps) regardless of arrival. The
/// controller is reset first. Each step picks the active target, checks
/// arrival, then controls, integrates and logs. A non-finite state aborts the
/// run with [`SimError::NumericInstability`].
pub fn simulate_from(
    config: &SimConfig,
    route: &WaypointList,
    controller: &mut dyn Controller,
    initial: State,
) -> Result<SimulationLog> {
    config.validate()?;

    let steps = config.steps();
    let mut quad = Quadrotor::with_state(config.clone(), initial);
    let mut tracker = WaypointTracker::new(route, config.waypoint_tolerance);
    let mut log = SimulationLog::with_capacity(route.clone(), steps.min(PREALLOC_LIMIT));
    controller.reset();

    debug!(
        steps,
        dt = config.dt,
        waypoints = route.len(),
        controller = controller.name(),
        integrator = ?config.integrator,
        "starting simulation"
    );

    for step in 0..steps {
        let time = step as f64 * config.dt;

        // Target for this step is fixed before the arrival check
        let waypoint = tracker.index();
        let target = *tracker.target(route);

        if let Some(event) = tracker.check(route, &quad.state().pos, time) {
            info!(
                index = event.index + 1,
                time = event.time,
                "Reached waypoint {:?}",
                route[event.index].as_slice()
            );
            log.push_event(event);
        }

        let out = controller.update(quad.state(), &target);
        let state = *quad.step(&out.input);

        if !state.is_finite() {
            error!(step, time, "state diverged");
            return Err(SimError::NumericInstability { step, time });
        }

        log.push(LogEntry {
            time,
            state,
            position_error: out.position_error,
            input: out.input,
            waypoint,
        });
    }

    debug!(
        entries = log.len(),
        reached = log.waypoints_reached(),
        "simulation complete"
    );
    Ok(log)
}

/// Fly `route` from rest at the origin with a custom controller.
pub fn simulate_with(
    config: &SimConfig,
    route: &WaypointList,
    controller: &mut dyn Controller,
) -> Result<SimulationLog> {
    simulate_from(config, route, controller, State::default())
}

/// Fly `route` with the default cascaded PD controller (convenience wrapper).
pub fn simulate(config: &SimConfig, route: &WaypointList) -> Result<SimulationLog> {
    let mut controller = CascadedPd::new(config);
    simulate_with(config, route, &mut controller)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Gains, SimConfigBuilder};
    use crate::dynamics::state::ControlInput;
    use crate::gnc::ControlOutput;
    use crate::route::presets;
    use crate::sim::integrator::Integrator;
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;

    fn route(points: &[[f64; 3]]) -> WaypointList {
        WaypointList::new(points.iter().map(|p| Vector3::from(*p)).collect()).unwrap()
    }

    #[test]
    fn full_horizon_step_count() {
        let config = SimConfig::default();
        let log = simulate(&config, &presets::square()).unwrap();
        assert_eq!(log.len(), 3000);
        assert_eq!(log.entries()[0].time, 0.0);
        assert_abs_diff_eq!(log.last().unwrap().time, 29.99, epsilon = 1e-9);
    }

    #[test]
    fn square_route_visits_every_waypoint_in_order() {
        let config = SimConfig::default();
        let log = simulate(&config, &presets::square()).unwrap();

        let events = log.events();
        assert_eq!(events.len(), 7, "events: {:?}", events);
        for (i, ev) in events.iter().enumerate() {
            assert_eq!(ev.index, i);
        }
        for pair in events.windows(2) {
            assert!(pair[1].time > pair[0].time, "{:?}", pair);
        }
        // starts on the first waypoint
        assert_eq!(events[0].time, 0.0);
        assert!(events[6].time < 30.0);

        let max_z = log.positions().map(|p| p.z).fold(f64::MIN, f64::max);
        assert!(max_z > 0.9 && max_z < 1.2, "max altitude {}", max_z);

        // settles back on the landing waypoint
        let end = log.final_state().unwrap();
        assert!(end.pos.norm() < 0.05, "final position {:?}", end.pos);
    }

    #[test]
    fn climb_rises_toward_target_altitude() {
        let config = SimConfigBuilder::new().t_max(5.0).build().unwrap();
        let log = simulate(&config, &route(&[[0.0, 0.0, 0.0], [0.0, 0.0, 1.0]])).unwrap();
        let z: Vec<f64> = log.positions().map(|p| p.z).collect();
        assert!(z[99] > 0.0);
        assert!((z[z.len() - 1] - 1.0).abs() < 0.1);
        // no horizontal motion on a vertical route
        for p in log.positions() {
            assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn runs_are_bit_identical() {
        let config = SimConfig::default();
        let a = simulate(&config, &presets::square()).unwrap();
        let b = simulate(&config, &presets::square()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn stacked_waypoints_advance_one_per_step() {
        let config = SimConfigBuilder::new().t_max(0.1).build().unwrap();
        let log = simulate(&config, &route(&[[0.0; 3], [0.0; 3], [0.0; 3]])).unwrap();

        let idx: Vec<usize> = log.entries().iter().map(|e| e.waypoint).collect();
        assert_eq!(&idx[..4], &[0, 1, 2, 2]);

        let times: Vec<f64> = log.events().iter().map(|e| e.time).collect();
        assert_eq!(times.len(), 3);
        assert_abs_diff_eq!(times[1] - times[0], config.dt, epsilon = 1e-12);
        assert_abs_diff_eq!(times[2] - times[1], config.dt, epsilon = 1e-12);
    }

    #[test]
    fn final_target_never_changes() {
        let config = SimConfig::default();
        let log = simulate(&config, &presets::square()).unwrap();
        let last = log.route().last_index();
        let first_hold = log
            .entries()
            .iter()
            .position(|e| e.waypoint == last)
            .unwrap();
        assert!(log.entries()[first_hold..].iter().all(|e| e.waypoint == last));
    }

    #[test]
    fn logged_thrust_never_negative() {
        let config = SimConfig::default();
        let log = simulate(&config, &route(&[[0.0, 0.0, 5.0], [0.0, 0.0, -5.0]])).unwrap();
        assert!(log.entries().iter().all(|e| e.input.thrust >= 0.0));
        assert!(log.entries().iter().any(|e| e.input.thrust == 0.0));
    }

    #[test]
    fn divergent_gains_abort_with_instability() {
        let gains = Gains {
            kp_att: [1.0e6, 1.0e6, 1.0e6],
            kd_att: [0.0, 0.0, 0.0],
            ..Gains::default()
        };
        let config = SimConfigBuilder::new().gains(gains).build().unwrap();
        let err = simulate(&config, &route(&[[0.0; 3], [2.0, 0.0, 1.0]])).unwrap_err();
        match err {
            SimError::NumericInstability { step, .. } => assert!(step < 1000, "step {}", step),
            other => panic!("expected instability, got {:?}", other),
        }
    }

    #[test]
    fn invalid_config_rejected_before_running() {
        let config = SimConfig { dt: 0.0, ..SimConfig::default() };
        let err = simulate(&config, &presets::square()).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration(_)));
    }

    #[test]
    fn long_horizon_runs_without_full_preallocation() {
        let config = SimConfigBuilder::new().dt(1e-3).t_max(250.0).build().unwrap();
        assert!(config.steps() > PREALLOC_LIMIT);
        let log = simulate(&config, &route(&[[0.0; 3], [0.0, 0.0, 1.0]])).unwrap();
        assert_eq!(log.len(), config.steps());
    }

    /// Counts steps since the last reset; outputs hover thrust.
    struct Counting {
        steps: usize,
        resets: usize,
    }

    impl Controller for Counting {
        fn update(&mut self, _state: &State, target: &Vector3<f64>) -> ControlOutput {
            self.steps += 1;
            ControlOutput {
                input: ControlInput::new(9.81, Vector3::zeros()),
                position_error: *target,
            }
        }

        fn reset(&mut self) {
            self.steps = 0;
            self.resets += 1;
        }
    }

    #[test]
    fn controller_is_reset_before_each_run() {
        let config = SimConfigBuilder::new().t_max(0.1).build().unwrap();
        let r = route(&[[0.0; 3], [0.0, 0.0, 1.0]]);
        let mut ctrl = Counting { steps: 0, resets: 0 };

        simulate_with(&config, &r, &mut ctrl).unwrap();
        simulate_with(&config, &r, &mut ctrl).unwrap();
        assert_eq!(ctrl.resets, 2);
        assert_eq!(ctrl.steps, 10);
    }

    #[test]
    fn rk4_also_completes_square_route() {
        let config = SimConfigBuilder::new().integrator(Integrator::Rk4).build().unwrap();
        let log = simulate(&config, &presets::square()).unwrap();
        assert_eq!(log.waypoints_reached(), 7);
    }

    #[test]
    fn custom_start_state_is_respected() {
        let config = SimConfigBuilder::new().t_max(0.05).build().unwrap();
        let start = State::at_rest(Vector3::new(0.0, 0.0, 1.0));
        let mut ctrl = CascadedPd::new(&config);
        let hold = route(&[[0.0, 0.0, 1.0], [0.0, 0.0, 1.0]]);
        let log = simulate_from(&config, &hold, &mut ctrl, start).unwrap();
        // hovering on target: nothing moves
        for e in log.entries() {
            assert_abs_diff_eq!(e.state.pos, start.pos, epsilon = 1e-12);
        }
    }
}
