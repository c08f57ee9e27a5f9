pub mod config;
pub mod error;
pub mod dynamics;
mod gnc_mod;
pub mod sim;
pub mod route;
pub mod io;
pub mod viz;

// The gnc module: expose gnc_mod as `gnc` publicly
pub mod gnc {
    pub use crate::gnc_mod::*;
}

pub use config::{Gains, SimConfig, SimConfigBuilder};
pub use error::{Result, SimError};
pub use route::{Waypoint, WaypointList};
pub use sim::{simulate, simulate_with, SimulationLog};
