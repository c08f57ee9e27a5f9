use nalgebra::Vector3;

use crate::error::{Result, SimError};

pub type Waypoint = Vector3<f64>;

// ---------------------------------------------------------------------------
// WaypointList: ordered, at least two points, fixed for the run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct WaypointList {
    points: Vec<Waypoint>,
}

impl WaypointList {
    pub fn new(points: Vec<Waypoint>) -> Result<Self> {
        if points.len() < 2 {
            return Err(SimError::InvalidRoute(format!(
                "need at least 2 waypoints, got {}",
                points.len()
            )));
        }
        if let Some(i) = points.iter().position(|p| p.iter().any(|v| !v.is_finite())) {
            return Err(SimError::InvalidRoute(format!(
                "waypoint {} is not finite: {:?}",
                i + 1,
                points[i]
            )));
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a list holds at least two points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.points.len() - 1
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Waypoint> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[Waypoint] {
        &self.points
    }

    /// Total straight-line length of the route.
    pub fn path_length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }
}

impl std::ops::Index<usize> for WaypointList {
    type Output = Waypoint;

    fn index(&self, idx: usize) -> &Waypoint {
        &self.points[idx]
    }
}

impl<'a> IntoIterator for &'a WaypointList {
    type Item = &'a Waypoint;
    type IntoIter = std::slice::Iter<'a, Waypoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

// ---------------------------------------------------------------------------
// Preset routes
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Take off, fly a 2 m square at 1 m altitude, return and land.
    pub fn square() -> WaypointList {
        WaypointList {
            points: vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(0.0, 0.0, 1.0),
                Vector3::new(2.0, 0.0, 1.0),
                Vector3::new(2.0, 2.0, 1.0),
                Vector3::new(0.0, 2.0, 1.0),
                Vector3::new(0.0, 0.0, 1.0),
                Vector3::new(0.0, 0.0, 0.0),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_single_point() {
        let err = WaypointList::new(vec![Vector3::zeros()]).unwrap_err();
        assert!(matches!(err, SimError::InvalidRoute(_)));
    }

    #[test]
    fn rejects_non_finite_point() {
        let err = WaypointList::new(vec![Vector3::zeros(), Vector3::new(0.0, f64::NAN, 1.0)])
            .unwrap_err();
        assert!(err.to_string().contains("waypoint 2"));
    }

    #[test]
    fn square_route_shape() {
        let route = presets::square();
        assert_eq!(route.len(), 7);
        assert_eq!(route[0], route[6]);
        assert_eq!(route.last_index(), 6);
        // 1 up, 2 + 2 + 2 + 2 around, 1 down
        assert!((route.path_length() - 10.0).abs() < 1e-12);
    }
}
