use quadrotor_sim::io::csv;
use quadrotor_sim::io::json::{self, FlightSummary};
use quadrotor_sim::route::presets;
use quadrotor_sim::{sim, SimConfig};

fn main() -> quadrotor_sim::Result<()> {
    let route = presets::square();
    let config = SimConfig::default();

    println!("Simulating square route ({:.1} m) ...", route.path_length());
    let log = sim::simulate(&config, &route)?;

    let summary = FlightSummary::from_log(&log);
    println!("Waypoints reached: {}/{}", summary.waypoints_reached, summary.waypoints_total);
    println!("Max thrust: {:.2} N", summary.max_thrust_n);
    println!("Max tilt: {:.1} deg", summary.max_tilt_deg);
    println!("Final error: {:.3} m", summary.final_error_m);

    csv::write_log_file("square_route.csv", &log)?;
    json::write_summary_file("square_route_summary.json", &summary)?;

    println!("Exported: square_route.csv, square_route_summary.json");
    Ok(())
}
