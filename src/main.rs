use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quadrotor_sim::io::{csv, json, FlightSummary};
use quadrotor_sim::route::acquire_route;
use quadrotor_sim::sim::simulate;
use quadrotor_sim::SimConfig;

#[derive(Parser, Debug)]
#[command(name = "quad-sim")]
#[command(about = "Quadrotor waypoint-following simulation", long_about = None)]
struct Args {
    /// TOML file overriding any subset of the default configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Fly the built-in square route instead of prompting for waypoints
    #[arg(long, default_value_t = false)]
    default_route: bool,
    /// Write the per-step log as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Write a JSON flight summary
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };
    info!(?config, "config loaded");

    let route = acquire_route(args.default_route)?;

    println!();
    println!("Starting simulation: {} waypoints, {} steps", route.len(), config.steps());
    let log = simulate(&config, &route)?;
    let summary = FlightSummary::from_log(&log);

    // -----------------------------------------------------------------------
    // Report
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  QUADROTOR WAYPOINT FLIGHT");
    println!("====================================================================");
    println!();
    println!("  Waypoint Arrivals");
    println!("  ──────────────────────────────────────────────────────────────────");
    for ev in log.events() {
        let wp = &log.route()[ev.index];
        println!(
            "  #{:<2}  t={:>6.2}s   target=({:>5.2}, {:>5.2}, {:>5.2})",
            ev.index + 1,
            ev.time,
            wp.x,
            wp.y,
            wp.z
        );
    }
    if summary.waypoints_reached < summary.waypoints_total {
        println!(
            "  ({} of {} waypoints not reached)",
            summary.waypoints_total - summary.waypoints_reached,
            summary.waypoints_total
        );
    }
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    let [x, y, z] = summary.final_position;
    println!("  Final position: ({:.3}, {:.3}, {:.3}) m", x, y, z);
    println!("  Final error:   {:>8.3} m", summary.final_error_m);
    println!("  Max thrust:    {:>8.2} N", summary.max_thrust_n);
    println!("  Max speed:     {:>8.2} m/s", summary.max_speed_ms);
    println!("  Max tilt:      {:>8.1} deg", summary.max_tilt_deg);
    println!();
    println!("  Simulation: {} steps, dt={} s", summary.steps, config.dt);
    println!("====================================================================");
    println!();

    if let Some(path) = &args.csv {
        csv::write_log_file(path, &log)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), rows = log.len(), "CSV log written");
    }
    if let Some(path) = &args.summary {
        json::write_summary_file(path, &summary)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "summary written");
    }

    Ok(())
}
