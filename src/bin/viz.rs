use std::{env, path::Path};

use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use coldgas_sim::io::RunFile;
use coldgas_sim::sim::BlowdownRun;
use coldgas_sim::system::{presets, Scenario};

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    // Optional run file as first argument, reference scenario otherwise
    let scenario = match env::args().nth(1) {
        Some(path) => RunFile::read(Path::new(&path))?.scenario()?,
        None => presets::reference()?,
    };
    let run = scenario.run()?;
    let impulse = run.cumulative_impulse()?;

    let app = BlowdownViz { scenario, run, impulse };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 900.0]),
        ..Default::default()
    };
    eframe::run_native("Cold Gas Blowdown", options, Box::new(|_| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("{e}"))
}

struct BlowdownViz {
    scenario: Scenario,
    run: BlowdownRun,
    impulse: Vec<f64>,
}

impl BlowdownViz {
    fn curve(&self, values: impl Iterator<Item = f64>) -> PlotPoints {
        self.run.series.time.iter().zip(values).map(|(t, v)| [*t, v]).collect()
    }
}

fn plot(ui: &mut egui::Ui, id: &str, title: &str, w: f32, h: f32, points: PlotPoints) {
    ui.vertical(|ui| {
        ui.label(title);
        Plot::new(id)
            .width(w)
            .height(h)
            .x_axis_label("Time (s)")
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(title, points));
            });
    });
}

impl eframe::App for BlowdownViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let s = &self.run.series;

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(format!("Scenario: {}", self.scenario.name));
            ui.label(format!(
                "Total impulse: {:.2} N·s  |  Peak thrust: {:.2} N  |  Peak Isp: {:.1} s  |  tau: {:.3} s",
                self.run.total_impulse,
                self.run.peak_thrust(),
                self.run.peak_isp(),
                self.run.tau,
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let w = available.x / 2.0 - 8.0;
            let h = available.y / 3.0 - 24.0;

            ui.horizontal(|ui| {
                plot(ui, "thrust", "Thrust (N)", w, h, self.curve(s.thrust.iter().copied()));
                plot(ui, "pressure", "Tank Pressure (bar)", w, h, self.curve(s.pressure_bar().iter().copied()));
            });
            ui.horizontal(|ui| {
                plot(ui, "mdot", "Mass Flow Rate (kg/s)", w, h, self.curve(s.mdot.iter().copied()));
                plot(ui, "temperature", "Temperature (K)", w, h, self.curve(s.temperature_k.iter().copied()));
            });
            ui.horizontal(|ui| {
                plot(ui, "impulse", "Delivered Impulse (N·s)", w, h, self.curve(self.impulse.iter().copied()));
                plot(ui, "isp", "Specific Impulse (s)", w, h, self.curve(s.isp.iter().copied()));
            });
        });
    }
}
