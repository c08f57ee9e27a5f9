use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::sim::{SimulationLog, WaypointEvent};

/// Summary statistics computed from a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSummary {
    pub steps: usize,
    pub duration_s: f64,
    pub waypoints_total: usize,
    pub waypoints_reached: usize,
    pub arrivals: Vec<WaypointEvent>,
    pub final_position: [f64; 3],
    pub final_error_m: f64,
    pub max_thrust_n: f64,
    pub max_speed_ms: f64,
    pub max_tilt_deg: f64,
}

impl FlightSummary {
    /// Compute summary from log data.
    pub fn from_log(log: &SimulationLog) -> Self {
        let entries = log.entries();

        let max_thrust = entries.iter().map(|e| e.input.thrust).fold(0.0_f64, f64::max);
        let max_speed = entries.iter().map(|e| e.state.vel.norm()).fold(0.0_f64, f64::max);
        let max_tilt = entries.iter().map(|e| e.state.tilt()).fold(0.0_f64, f64::max);

        let (final_position, final_error, duration) = match log.last() {
            Some(last) => (
                [last.state.pos.x, last.state.pos.y, last.state.pos.z],
                last.position_error.norm(),
                last.time,
            ),
            None => ([0.0; 3], 0.0, 0.0),
        };

        FlightSummary {
            steps: entries.len(),
            duration_s: duration,
            waypoints_total: log.route().len(),
            waypoints_reached: log.waypoints_reached(),
            arrivals: log.events().to_vec(),
            final_position,
            final_error_m: final_error,
            max_thrust_n: max_thrust,
            max_speed_ms: max_speed,
            max_tilt_deg: max_tilt.to_degrees(),
        }
    }
}

/// Write flight summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &FlightSummary) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)?;
    Ok(())
}

/// Write flight summary JSON to a file.
pub fn write_summary_file(path: impl AsRef<Path>, summary: &FlightSummary) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::route::presets;
    use crate::sim::simulate;

    #[test]
    fn summary_reports_all_arrivals() {
        let log = simulate(&SimConfig::default(), &presets::square()).unwrap();
        let s = FlightSummary::from_log(&log);
        assert_eq!(s.steps, 3000);
        assert_eq!(s.waypoints_total, 7);
        assert_eq!(s.waypoints_reached, 7);
        assert!(s.max_thrust_n > 9.81);
        assert!(s.max_tilt_deg > 0.0 && s.max_tilt_deg < 45.0);
        assert!(s.final_error_m < 0.05);
    }

    #[test]
    fn json_output_is_valid() {
        let log = simulate(&SimConfig::default(), &presets::square()).unwrap();
        let summary = FlightSummary::from_log(&log);

        let mut buf = Vec::new();
        write_summary(&mut buf, &summary).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["waypoints_reached"], 7);
        assert_eq!(value["arrivals"].as_array().unwrap().len(), 7);
        assert_eq!(value["arrivals"][0]["index"], 0);
    }
}
