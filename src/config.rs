use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::sim::integrator::Integrator;

/// Largest step count a single run may request.
pub const MAX_STEPS: usize = 10_000_000;

// ---------------------------------------------------------------------------
// Controller gains
// ---------------------------------------------------------------------------

/// Per-axis PD gains for both loops of the cascade.
///
/// Position gains are indexed `[x, y, z]`; attitude gains `[roll, pitch, yaw]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gains {
    pub kp_pos: [f64; 3],
    pub kd_pos: [f64; 3],
    pub kp_att: [f64; 3],
    pub kd_att: [f64; 3],
}

impl Gains {
    pub fn kp_pos(&self) -> Vector3<f64> {
        Vector3::from(self.kp_pos)
    }

    pub fn kd_pos(&self) -> Vector3<f64> {
        Vector3::from(self.kd_pos)
    }

    pub fn kp_att(&self) -> Vector3<f64> {
        Vector3::from(self.kp_att)
    }

    pub fn kd_att(&self) -> Vector3<f64> {
        Vector3::from(self.kd_att)
    }
}

impl Default for Gains {
    fn default() -> Self {
        Self {
            kp_pos: [2.0, 2.0, 4.0],
            kd_pos: [1.5, 1.5, 2.5],
            kp_att: [6.0, 6.0, 2.0],
            kd_att: [1.5, 1.5, 0.1],
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

/// Physical constants, timing and gains for one run. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub gravity: f64,            // m/s^2
    pub mass: f64,               // kg
    pub arm_length: f64,         // m, not used by the rigid-body model
    pub inertia: [f64; 3],       // [Ix, Iy, Iz] principal moments, kg·m^2
    pub dt: f64,                 // s
    pub t_max: f64,              // s
    pub waypoint_tolerance: f64, // m
    pub integrator: Integrator,
    pub gains: Gains,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            mass: 1.0,
            arm_length: 0.25,
            inertia: [0.01, 0.01, 0.02],
            dt: 0.01,
            t_max: 30.0,
            waypoint_tolerance: 0.2,
            integrator: Integrator::Euler,
            gains: Gains::default(),
        }
    }
}

impl SimConfig {
    /// Parse a TOML document; omitted fields keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SimConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn inertia(&self) -> Vector3<f64> {
        Vector3::from(self.inertia)
    }

    /// Number of fixed steps covering `[0, t_max)`.
    ///
    /// A quotient within rounding noise of an integer counts as that integer, so
    /// 30.0 / 0.01 gives 3000 rather than 3001.
    pub fn steps(&self) -> usize {
        let ratio = self.t_max / self.dt;
        let nearest = ratio.round();
        let steps = if (ratio - nearest).abs() < 1e-9 * nearest.max(1.0) {
            nearest
        } else {
            ratio.ceil()
        };
        steps.max(0.0) as usize
    }

    /// Reject values that would make the run meaningless or divide by zero.
    pub fn validate(&self) -> Result<()> {
        positive("dt", self.dt)?;
        positive("t_max", self.t_max)?;
        positive("gravity", self.gravity)?;
        positive("mass", self.mass)?;
        positive("waypoint_tolerance", self.waypoint_tolerance)?;
        for (name, value) in ["Ix", "Iy", "Iz"].iter().zip(self.inertia) {
            positive(name, value)?;
        }
        let ratio = self.t_max / self.dt;
        if !ratio.is_finite() || ratio > MAX_STEPS as f64 {
            return Err(SimError::InvalidConfiguration(format!(
                "t_max / dt = {:e} exceeds the step limit of {}",
                ratio, MAX_STEPS
            )));
        }
        if !self.arm_length.is_finite() || self.arm_length < 0.0 {
            return Err(SimError::InvalidConfiguration(format!(
                "arm_length must be finite and non-negative, got {}",
                self.arm_length
            )));
        }

        let g = &self.gains;
        let all_gains = [
            ("kp_pos", g.kp_pos),
            ("kd_pos", g.kd_pos),
            ("kp_att", g.kp_att),
            ("kd_att", g.kd_att),
        ];
        for (name, values) in all_gains {
            if values.iter().any(|v| !v.is_finite()) {
                return Err(SimError::InvalidConfiguration(format!(
                    "gain {} has a non-finite entry: {:?}",
                    name, values
                )));
            }
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfiguration(format!(
            "{} must be finite and > 0, got {}",
            name, value
        )))
    }
}

// ---------------------------------------------------------------------------
// Config builder
// ---------------------------------------------------------------------------

pub struct SimConfigBuilder {
    config: SimConfig,
}

impl SimConfigBuilder {
    pub fn new() -> Self {
        Self { config: SimConfig::default() }
    }

    pub fn gravity(mut self, v: f64) -> Self { self.config.gravity = v; self }
    pub fn mass(mut self, v: f64) -> Self { self.config.mass = v; self }
    pub fn arm_length(mut self, v: f64) -> Self { self.config.arm_length = v; self }
    pub fn inertia(mut self, v: [f64; 3]) -> Self { self.config.inertia = v; self }
    pub fn dt(mut self, v: f64) -> Self { self.config.dt = v; self }
    pub fn t_max(mut self, v: f64) -> Self { self.config.t_max = v; self }
    pub fn waypoint_tolerance(mut self, v: f64) -> Self { self.config.waypoint_tolerance = v; self }
    pub fn integrator(mut self, v: Integrator) -> Self { self.config.integrator = v; self }
    pub fn gains(mut self, v: Gains) -> Self { self.config.gains = v; self }

    /// Validate and return the finished config.
    pub fn build(self) -> Result<SimConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for SimConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.steps(), 3000);
    }

    #[test]
    fn steps_round_up_partial_interval() {
        let config = SimConfigBuilder::new().dt(0.3).t_max(1.0).build().unwrap();
        assert_eq!(config.steps(), 4);
    }

    #[test]
    fn rejects_non_positive_timing() {
        let err = SimConfigBuilder::new().dt(0.0).build().unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration(_)));

        let err = SimConfigBuilder::new().t_max(-1.0).build().unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration(_)));
    }

    #[test]
    fn rejects_zero_gravity_and_bad_inertia() {
        assert!(SimConfigBuilder::new().gravity(0.0).build().is_err());
        assert!(SimConfigBuilder::new().inertia([0.01, 0.0, 0.02]).build().is_err());
        assert!(SimConfigBuilder::new().mass(f64::NAN).build().is_err());
    }

    #[test]
    fn rejects_unrepresentable_step_count() {
        let err = SimConfigBuilder::new().dt(1e-3).t_max(1e17).build().unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration(_)));
        assert!(SimConfigBuilder::new().dt(1e-300).t_max(1e300).build().is_err());

        let at_limit = SimConfigBuilder::new()
            .dt(1.0)
            .t_max(MAX_STEPS as f64)
            .build()
            .unwrap();
        assert_eq!(at_limit.steps(), MAX_STEPS);
    }

    #[test]
    fn rejects_non_finite_gains() {
        let gains = Gains {
            kd_att: [1.5, f64::INFINITY, 0.1],
            ..Gains::default()
        };
        assert!(SimConfigBuilder::new().gains(gains).build().is_err());
    }

    #[test]
    fn toml_overrides_subset() {
        let text = r#"
            mass = 1.5
            t_max = 10.0
            integrator = "rk4"

            [gains]
            kp_pos = [3.0, 3.0, 5.0]
        "#;
        let config = SimConfig::from_toml_str(text).unwrap();
        assert_eq!(config.mass, 1.5);
        assert_eq!(config.t_max, 10.0);
        assert_eq!(config.integrator, Integrator::Rk4);
        assert_eq!(config.gains.kp_pos, [3.0, 3.0, 5.0]);
        // untouched fields keep defaults
        assert_eq!(config.gains.kd_pos, [1.5, 1.5, 2.5]);
        assert_eq!(config.dt, 0.01);
    }

    #[test]
    fn toml_validation_runs_after_parse() {
        let err = SimConfig::from_toml_str("dt = -0.01").unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration(_)));
    }
}
