use std::io::{BufRead, Write};

use nalgebra::Vector3;
use thiserror::Error;
use tracing::debug;

use crate::error::{Result, SimError};
use super::waypoint::{presets, Waypoint, WaypointList};

/// Anything that can produce the route for a run.
pub trait WaypointSource {
    fn waypoints(&mut self) -> Result<WaypointList>;
}

// ---------------------------------------------------------------------------
// Built-in route
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRoute;

impl WaypointSource for DefaultRoute {
    fn waypoints(&mut self) -> Result<WaypointList> {
        Ok(presets::square())
    }
}

// ---------------------------------------------------------------------------
// Line-oriented entry: "x,y,z" per line, "done" to finish, "default" for the preset
// ---------------------------------------------------------------------------

/// Why a single entry line was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntryError {
    #[error("must enter exactly 3 numbers separated by commas (got {0})")]
    WrongCount(usize),
    #[error("invalid number: {0:?}")]
    NotANumber(String),
    #[error("entry is not valid UTF-8 text")]
    NotUtf8,
}

/// Parse one `x,y,z` entry.
pub fn parse_point(line: &str) -> std::result::Result<Waypoint, EntryError> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(EntryError::WrongCount(parts.len()));
    }
    let mut xyz = [0.0; 3];
    for (slot, part) in xyz.iter_mut().zip(&parts) {
        *slot = part
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| EntryError::NotANumber(part.to_string()))?;
    }
    Ok(Vector3::from(xyz))
}

/// Prompts on `output` and reads entries from `input` until the route is complete.
pub struct InteractivePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractivePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> WaypointSource for InteractivePrompt<R, W> {
    fn waypoints(&mut self) -> Result<WaypointList> {
        writeln!(self.output, "--- Drone Trajectory Input ---")?;
        writeln!(self.output, "Enter trajectory points (x, y, z).")?;
        writeln!(self.output, "Type 'done' when finished.")?;
        writeln!(self.output, "Type 'default' to load a standard test square.")?;

        let mut points: Vec<Waypoint> = Vec::new();
        let mut buf = Vec::new();

        loop {
            write!(self.output, "Point {} [x,y,z] > ", points.len() + 1)?;
            self.output.flush()?;

            buf.clear();
            if self.input.read_until(b'\n', &mut buf)? == 0 {
                return Err(SimError::InputClosed);
            }
            let entry = match std::str::from_utf8(&buf) {
                Ok(text) => text.trim(),
                Err(_) => {
                    writeln!(self.output, "Error: {}", EntryError::NotUtf8)?;
                    continue;
                }
            };

            if entry.eq_ignore_ascii_case("default") {
                return Ok(presets::square());
            }
            if entry.eq_ignore_ascii_case("done") {
                if points.len() < 2 {
                    writeln!(self.output, "Please enter at least 2 points.")?;
                    continue;
                }
                break;
            }
            if entry.is_empty() {
                continue;
            }

            match parse_point(entry) {
                Ok(p) => {
                    debug!(x = p.x, y = p.y, z = p.z, "waypoint entered");
                    points.push(p);
                }
                Err(e) => writeln!(self.output, "Error: {}", e)?,
            }
        }

        WaypointList::new(points)
    }
}

/// Route for a binary run: the preset when `use_default` is set, otherwise
/// prompted on stdin/stdout.
pub fn acquire_route(use_default: bool) -> Result<WaypointList> {
    if use_default {
        DefaultRoute.waypoints()
    } else {
        let stdin = std::io::stdin();
        InteractivePrompt::new(stdin.lock(), std::io::stdout()).waypoints()
    }
}
