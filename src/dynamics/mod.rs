pub mod state;
pub mod quadrotor;

pub use quadrotor::{derivatives, Quadrotor};
pub use state::{ControlInput, Deriv, State};
