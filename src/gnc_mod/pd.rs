use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// PD law on measurement (three axes)
// ---------------------------------------------------------------------------

/// `kp * error - kd * rate`, per axis.
///
/// Damping acts on the measured rate rather than on the derivative of the
/// error, so a step in the setpoint never produces a derivative kick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pd {
    pub kp: Vector3<f64>,
    pub kd: Vector3<f64>,
}

impl Pd {
    pub fn new(kp: Vector3<f64>, kd: Vector3<f64>) -> Self {
        Self { kp, kd }
    }

    pub fn update(&self, error: &Vector3<f64>, rate: &Vector3<f64>) -> Vector3<f64> {
        self.kp.component_mul(error) - self.kd.component_mul(rate)
    }
}
