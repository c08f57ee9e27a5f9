use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints, Points};
use tracing::info;

use quadrotor_sim::route::acquire_route;
use quadrotor_sim::sim::{self, LogEntry, SimulationLog};
use quadrotor_sim::viz::{Bounds, ReplayFrames};
use quadrotor_sim::SimConfig;

#[derive(Parser, Debug)]
#[command(name = "quad-viz")]
#[command(about = "Fly a quadrotor route and show the dashboard and replay", long_about = None)]
struct Args {
    /// TOML file overriding any subset of the default configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Fly the built-in square route instead of prompting for waypoints
    #[arg(long, default_value_t = false)]
    default_route: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };

    let route = acquire_route(args.default_route)?;
    let log = sim::simulate(&config, &route)?;
    info!(
        entries = log.len(),
        reached = log.waypoints_reached(),
        "simulation complete, opening viewer"
    );
    let bounds = Bounds::from_log(&log, 0.5);

    let app = QuadViz {
        log,
        bounds,
        cursor: 0,
        playing: true,
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1400.0, 900.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Quadrotor Flight Simulator",
        options,
        Box::new(|_| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}

struct QuadViz {
    log: SimulationLog,
    bounds: Bounds,
    cursor: usize,
    playing: bool,
}

fn series(sampled: &[&LogEntry], f: impl Fn(&LogEntry) -> f64) -> PlotPoints<'static> {
    sampled.iter().map(|e| [e.time, f(e)]).collect()
}

fn time_plot(
    ui: &mut egui::Ui,
    id: &str,
    title: &str,
    size: [f32; 2],
    lines: Vec<(&str, PlotPoints<'static>)>,
) {
    ui.vertical(|ui| {
        ui.label(title);
        Plot::new(id)
            .width(size[0])
            .height(size[1])
            .x_axis_label("Time (s)")
            .show(ui, |plot_ui| {
                for (name, points) in lines {
                    plot_ui.line(Line::new(name, points));
                }
            });
    });
}

impl eframe::App for QuadViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let step = (self.log.len() / 2000).max(1);
        let sampled: Vec<&LogEntry> = self.log.entries().iter().step_by(step).collect();
        let waypoints: Vec<[f64; 2]> = self.log.route().iter().map(|w| [w.x, w.y]).collect();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading("Quadrotor waypoint flight");
            let max_z = self.log.positions().map(|p| p.z).fold(0.0_f64, f64::max);
            ui.label(format!(
                "Waypoints: {}/{}  |  Max altitude: {:.2} m  |  Steps: {}  |  Flight: {:.1} s",
                self.log.waypoints_reached(),
                self.log.route().len(),
                max_z,
                self.log.len(),
                self.log.last().map_or(0.0, |e| e.time),
            ));
        });

        // -------------------------------------------------------------------
        // Replay panel
        // -------------------------------------------------------------------
        let total = ReplayFrames::new(&self.log).count();
        egui::SidePanel::right("replay").min_width(420.0).show(ctx, |ui| {
            ui.heading("Replay");
            ui.horizontal(|ui| {
                let label = if self.playing { "Pause" } else { "Play" };
                if ui.button(label).clicked() {
                    self.playing = !self.playing;
                }
                if ui.button("Restart").clicked() {
                    self.cursor = 0;
                    self.playing = true;
                }
                let range = 0..=total.saturating_sub(1);
                ui.add(egui::Slider::new(&mut self.cursor, range).text("frame"));
            });

            if let Some(frame) = ReplayFrames::new(&self.log).nth(self.cursor) {
                ui.label(format!(
                    "t = {:5.2} s   pos = ({:.2}, {:.2}, {:.2})",
                    frame.time, frame.position.x, frame.position.y, frame.position.z
                ));
                let trail: PlotPoints = frame
                    .trail
                    .iter()
                    .map(|e| [e.state.pos.x, e.state.pos.y])
                    .collect();
                let vehicle = vec![[frame.position.x, frame.position.y]];
                let b = self.bounds;
                Plot::new("replay_xy")
                    .data_aspect(1.0)
                    .include_x(b.min.x)
                    .include_x(b.max.x)
                    .include_y(b.min.y)
                    .include_y(b.max.y)
                    .x_axis_label("x (m)")
                    .show(ui, |plot_ui| {
                        plot_ui.points(Points::new("Waypoints", waypoints.clone()).radius(4.0));
                        plot_ui.line(Line::new("Trail", trail));
                        plot_ui.points(Points::new("Vehicle", vehicle).radius(6.0));
                    });
            }
        });

        if self.playing {
            if self.cursor + 1 < total {
                self.cursor += 1;
                ctx.request_repaint();
            } else {
                self.playing = false;
            }
        }

        // -------------------------------------------------------------------
        // Dashboard
        // -------------------------------------------------------------------
        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let size = [available.x / 2.0 - 8.0, available.y / 3.0 - 24.0];

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Top-down path (m)");
                    let path: PlotPoints = sampled
                        .iter()
                        .map(|e| [e.state.pos.x, e.state.pos.y])
                        .collect();
                    Plot::new("path")
                        .width(size[0])
                        .height(size[1])
                        .data_aspect(1.0)
                        .x_axis_label("x (m)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Path", path));
                            plot_ui.points(Points::new("Waypoints", waypoints.clone()).radius(4.0));
                        });
                });
                time_plot(ui, "altitude", "Altitude (m)", size, vec![
                    ("z", series(&sampled, |e| e.state.pos.z)),
                ]);
            });

            ui.horizontal(|ui| {
                time_plot(ui, "errors", "Position error (m)", size, vec![
                    ("ex", series(&sampled, |e| e.position_error.x)),
                    ("ey", series(&sampled, |e| e.position_error.y)),
                    ("ez", series(&sampled, |e| e.position_error.z)),
                ]);
                time_plot(ui, "velocity", "Velocity (m/s)", size, vec![
                    ("u", series(&sampled, |e| e.state.vel.x)),
                    ("v", series(&sampled, |e| e.state.vel.y)),
                    ("w", series(&sampled, |e| e.state.vel.z)),
                ]);
            });

            ui.horizontal(|ui| {
                time_plot(ui, "thrust", "Thrust u1 (N)", size, vec![
                    ("u1", series(&sampled, |e| e.input.thrust)),
                ]);
                time_plot(ui, "torques", "Torques (N m)", size, vec![
                    ("u2", series(&sampled, |e| e.input.torque.x)),
                    ("u3", series(&sampled, |e| e.input.torque.y)),
                    ("u4", series(&sampled, |e| e.input.torque.z)),
                ]);
            });
        });
    }
}
