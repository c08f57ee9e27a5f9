pub mod controller;
pub mod pd;
pub mod cascade;

pub use controller::{ControlOutput, Controller};
pub use pd::Pd;
pub use cascade::CascadedPd;
