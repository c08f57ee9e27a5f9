use thiserror::Error;

/// Errors surfaced by the simulation and its input/output layers.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("Numeric instability at step {step} (t={time:.3}s): state is no longer finite")]
    NumericInstability { step: usize, time: f64 },

    #[error("Waypoint input closed before the route was complete")]
    InputClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
