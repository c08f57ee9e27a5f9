use nalgebra::Vector3;
use serde::Serialize;

use crate::route::{Waypoint, WaypointList};

// ---------------------------------------------------------------------------
// Waypoint arrival events
// ---------------------------------------------------------------------------

/// The vehicle came within tolerance of waypoint `index` at `time`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaypointEvent {
    pub index: usize,
    pub time: f64,
    pub position: [f64; 3],
}

// ---------------------------------------------------------------------------
// Active-waypoint state machine
// ---------------------------------------------------------------------------

/// Tracks which waypoint is active.
///
/// The index moves forward by at most one per `check`. Once the last
/// waypoint is active it stays active; its first arrival is still reported,
/// exactly once.
#[derive(Debug, Clone)]
pub struct WaypointTracker {
    index: usize,
    last: usize,
    tolerance: f64,
    final_reached: bool,
}

impl WaypointTracker {
    pub fn new(route: &WaypointList, tolerance: f64) -> Self {
        Self {
            index: 0,
            last: route.last_index(),
            tolerance,
            final_reached: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn target<'r>(&self, route: &'r WaypointList) -> &'r Waypoint {
        &route[self.index]
    }

    pub fn is_holding_final(&self) -> bool {
        self.index == self.last
    }

    pub fn final_reached(&self) -> bool {
        self.final_reached
    }

    /// Compare `position` against the active waypoint and advance if reached.
    pub fn check(
        &mut self,
        route: &WaypointList,
        position: &Vector3<f64>,
        time: f64,
    ) -> Option<WaypointEvent> {
        let target = self.target(route);
        if (position - target).norm() >= self.tolerance {
            return None;
        }

        let event = WaypointEvent {
            index: self.index,
            time,
            position: [position.x, position.y, position.z],
        };

        if self.index < self.last {
            self.index += 1;
            Some(event)
        } else if !self.final_reached {
            self.final_reached = true;
            Some(event)
        } else {
            None
        }
    }
}
