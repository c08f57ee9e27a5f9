pub mod waypoint;
pub mod source;

pub use waypoint::{presets, Waypoint, WaypointList};
pub use source::{
    acquire_route, parse_point, DefaultRoute, EntryError, InteractivePrompt, WaypointSource,
};
