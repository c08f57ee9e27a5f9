use nalgebra::Vector3;

use crate::dynamics::state::{ControlInput, State};
use crate::route::WaypointList;
use super::event::WaypointEvent;

/// One simulated step: start-of-step time, post-step state, and what the
/// controller produced for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogEntry {
    pub time: f64,
    pub state: State,
    pub position_error: Vector3<f64>,
    pub input: ControlInput,
    /// Index of the waypoint that was the target for this step.
    pub waypoint: usize,
}

// ---------------------------------------------------------------------------
// Append-only run record
// ---------------------------------------------------------------------------

/// Time-ordered record of a run plus the route it flew.
///
/// Only the driver appends; everything else gets `&SimulationLog`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationLog {
    entries: Vec<LogEntry>,
    events: Vec<WaypointEvent>,
    route: WaypointList,
}

impl SimulationLog {
    pub(crate) fn with_capacity(route: WaypointList, steps: usize) -> Self {
        Self {
            entries: Vec::with_capacity(steps),
            events: Vec::new(),
            route,
        }
    }

    pub(crate) fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn push_event(&mut self, event: WaypointEvent) {
        self.events.push(event);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn events(&self) -> &[WaypointEvent] {
        &self.events
    }

    pub fn route(&self) -> &WaypointList {
        &self.route
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn final_state(&self) -> Option<&State> {
        self.entries.last().map(|e| &e.state)
    }

    pub fn positions(&self) -> impl Iterator<Item = Vector3<f64>> + '_ {
        self.entries.iter().map(|e| e.state.pos)
    }

    /// Number of distinct waypoints reached.
    pub fn waypoints_reached(&self) -> usize {
        self.events.len()
    }
}
