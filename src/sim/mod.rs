pub mod integrator;
pub mod runner;
pub mod event;
pub mod log;

pub use runner::{simulate, simulate_from, simulate_with};
pub use integrator::{euler_step, rk4_step, Integrator};
pub use event::{WaypointEvent, WaypointTracker};
pub use log::{LogEntry, SimulationLog};
