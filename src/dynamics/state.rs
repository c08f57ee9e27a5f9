use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Vehicle state: position, attitude, velocity, body rates
// ---------------------------------------------------------------------------

/// Full 12-dimensional quadrotor state.
///
/// `vel` is kept in the inertial frame rather than the body frame; `omega` is
/// the body-frame angular velocity `[p, q, r]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub pos: Vector3<f64>,   // m, inertial [x, y, z]
    pub euler: Vector3<f64>, // rad, [roll, pitch, yaw], applied yaw-pitch-roll
    pub vel: Vector3<f64>,   // m/s, inertial [u, v, w]
    pub omega: Vector3<f64>, // rad/s, body [p, q, r]
}

impl Default for State {
    fn default() -> Self {
        Self {
            pos: Vector3::zeros(),
            euler: Vector3::zeros(),
            vel: Vector3::zeros(),
            omega: Vector3::zeros(),
        }
    }
}

impl State {
    /// At rest at `pos`, level, heading zero.
    pub fn at_rest(pos: Vector3<f64>) -> Self {
        Self { pos, ..Self::default() }
    }

    /// `self + d * dt`, component-wise.
    pub fn apply(&self, d: &Deriv, dt: f64) -> State {
        State {
            pos: self.pos + d.dpos * dt,
            euler: self.euler + d.deuler * dt,
            vel: self.vel + d.dvel * dt,
            omega: self.omega + d.domega * dt,
        }
    }

    pub fn roll(&self) -> f64 {
        self.euler.x
    }

    pub fn pitch(&self) -> f64 {
        self.euler.y
    }

    pub fn yaw(&self) -> f64 {
        self.euler.z
    }

    /// Angle between body z and inertial z (rad).
    pub fn tilt(&self) -> f64 {
        (self.roll().cos() * self.pitch().cos()).clamp(-1.0, 1.0).acos()
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }

    /// Flatten to `[x, y, z, roll, pitch, yaw, u, v, w, p, q, r]`.
    pub fn to_array(&self) -> [f64; 12] {
        [
            self.pos.x,
            self.pos.y,
            self.pos.z,
            self.euler.x,
            self.euler.y,
            self.euler.z,
            self.vel.x,
            self.vel.y,
            self.vel.z,
            self.omega.x,
            self.omega.y,
            self.omega.z,
        ]
    }

    /// Inverse of [`State::to_array`].
    pub fn from_array(arr: &[f64; 12]) -> Self {
        State {
            pos: Vector3::new(arr[0], arr[1], arr[2]),
            euler: Vector3::new(arr[3], arr[4], arr[5]),
            vel: Vector3::new(arr[6], arr[7], arr[8]),
            omega: Vector3::new(arr[9], arr[10], arr[11]),
        }
    }
}

// ---------------------------------------------------------------------------
// State derivative
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deriv {
    pub dpos: Vector3<f64>,
    pub deuler: Vector3<f64>,
    pub dvel: Vector3<f64>,   // linear acceleration, inertial
    pub domega: Vector3<f64>, // angular acceleration, body
}

// ---------------------------------------------------------------------------
// Control input
// ---------------------------------------------------------------------------

/// Collective thrust plus body-axis torques.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlInput {
    pub thrust: f64,          // N, never negative
    pub torque: Vector3<f64>, // N·m, [roll, pitch, yaw]
}

impl ControlInput {
    /// Builds an input with the thrust clamped at zero.
    pub fn new(thrust: f64, torque: Vector3<f64>) -> Self {
        Self { thrust: thrust.max(0.0), torque }
    }

    /// `[u1, u2, u3, u4]` = thrust, roll, pitch, yaw torque.
    pub fn to_array(&self) -> [f64; 4] {
        [self.thrust, self.torque.x, self.torque.y, self.torque.z]
    }
}

impl Default for ControlInput {
    fn default() -> Self {
        Self { thrust: 0.0, torque: Vector3::zeros() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_order_is_fixed() {
        let s = State {
            pos: Vector3::new(1.0, 2.0, 3.0),
            euler: Vector3::new(0.1, 0.2, 0.3),
            vel: Vector3::new(4.0, 5.0, 6.0),
            omega: Vector3::new(0.4, 0.5, 0.6),
        };
        assert_eq!(
            s.to_array(),
            [1.0, 2.0, 3.0, 0.1, 0.2, 0.3, 4.0, 5.0, 6.0, 0.4, 0.5, 0.6]
        );
        assert_eq!(State::from_array(&s.to_array()), s);
    }

    #[test]
    fn negative_thrust_is_clamped() {
        let input = ControlInput::new(-3.0, Vector3::new(0.1, 0.0, 0.0));
        assert_eq!(input.thrust, 0.0);
        assert_eq!(input.to_array(), [0.0, 0.1, 0.0, 0.0]);
    }

    #[test]
    fn non_finite_state_detected() {
        let mut s = State::default();
        assert!(s.is_finite());
        s.omega.y = f64::NAN;
        assert!(!s.is_finite());
    }
}
