use nalgebra::Vector3;

use quadrotor_sim::dynamics::{ControlInput, State};
use quadrotor_sim::gnc::{ControlOutput, Controller};
use quadrotor_sim::route::WaypointList;
use quadrotor_sim::{sim, SimConfigBuilder};

/// Altitude-only PD: tracks target z with collective thrust and never tilts.
struct AltitudeHold {
    mass: f64,
    gravity: f64,
    kp: f64,
    kd: f64,
}

impl Controller for AltitudeHold {
    fn update(&mut self, state: &State, target: &Vector3<f64>) -> ControlOutput {
        let error = target - state.pos;
        let accel = self.kp * error.z - self.kd * state.vel.z;
        ControlOutput {
            input: ControlInput::new(self.mass * (self.gravity + accel), Vector3::zeros()),
            position_error: error,
        }
    }

    fn name(&self) -> &str {
        "AltitudeHold"
    }
}

fn main() -> quadrotor_sim::Result<()> {
    let config = SimConfigBuilder::new().t_max(15.0).build()?;
    let route = WaypointList::new(vec![
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(0.0, 0.0, 2.0),
        Vector3::new(0.0, 0.0, 0.5),
    ])?;

    let mut controller = AltitudeHold {
        mass: config.mass,
        gravity: config.gravity,
        kp: 3.0,
        kd: 2.5,
    };

    println!("Simulating with {} controller...", controller.name());
    let log = sim::simulate_with(&config, &route, &mut controller)?;

    for ev in log.events() {
        println!("Reached waypoint {} at t={:.2} s", ev.index + 1, ev.time);
    }
    let max_z = log.positions().map(|p| p.z).fold(0.0_f64, f64::max);
    println!("Max altitude: {:.2} m", max_z);
    if let Some(end) = log.final_state() {
        println!("Final altitude: {:.3} m", end.pos.z);
    }
    println!("Log entries: {}", log.len());
    Ok(())
}
