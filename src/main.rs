use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use coldgas_sim::io::json::{self, Report};
use coldgas_sim::io::{csv, RunFile};
use coldgas_sim::physics::pa_to_bar;
use coldgas_sim::sim::{BlowdownRun, SampleStatus, TimeGrid};
use coldgas_sim::system::{presets, ConfigurationBuilder, Scenario};

/// Blowdown cold-gas thruster: thrust curve and total impulse.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML run file
    #[arg(short, long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Built-in scenario used when no run file is given
    #[arg(short, long, default_value = "reference")]
    preset: String,

    /// Tank volume [L]
    #[arg(long)]
    volume_l: Option<f64>,

    /// Initial tank pressure [bar]
    #[arg(long)]
    pressure_bar: Option<f64>,

    /// Nozzle throat radius [mm]
    #[arg(long)]
    radius_mm: Option<f64>,

    /// End of the time range [s] (exclusive)
    #[arg(long)]
    end_s: Option<f64>,

    /// Time step [s]
    #[arg(long)]
    step_s: Option<f64>,

    /// Write the time series to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the summary to this JSON file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Approximate number of rows in the printed table
    #[arg(long, default_value_t = 30)]
    table: usize,
}

fn main() -> Result<()> {
    // Default log level to "info"
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    let args = Args::parse();

    let (scenario, mut csv_out, mut json_out) = match &args.config {
        Some(path) => {
            let file = RunFile::read(path)?;
            (file.scenario()?, file.output.csv.clone(), file.output.json.clone())
        }
        None => (presets::by_name(&args.preset)?, None, None),
    };
    let scenario = apply_overrides(scenario, &args)?;
    csv_out = args.csv.clone().or(csv_out);
    json_out = args.json.clone().or(json_out);

    info!("Running scenario '{}'", scenario.name);
    let run = scenario.run()?;

    print_report(&scenario, &run, args.table);

    if let Some(path) = csv_out {
        csv::write_series_file(&path, &run.series)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Exported time series to '{}'", path.display());
    }
    if let Some(path) = json_out {
        json::write_report_file(&path, &Report::new(&scenario, &run))
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Exported summary to '{}'", path.display());
    }

    Ok(())
}

/// Command-line values replace the scenario's.
fn apply_overrides(scenario: Scenario, args: &Args) -> Result<Scenario> {
    let c = &scenario.configuration;
    let mut builder = ConfigurationBuilder::new()
        .volume_l(args.volume_l.unwrap_or(c.volume_l))
        .initial_pressure_bar(args.pressure_bar.unwrap_or(c.initial_pressure_bar))
        .nozzle_radius_mm(args.radius_mm.unwrap_or(c.nozzle_radius_mm))
        .samples(c.time_grid.as_slice().to_vec());

    let grid = match (args.end_s, args.step_s) {
        (Some(end), step) => {
            let t = c.time_grid.as_slice();
            Some(TimeGrid::arange(end, step.unwrap_or(t[1] - t[0]))?)
        }
        (None, Some(step)) => Some(c.time_grid.restep(step)?),
        (None, None) => None,
    };
    if let Some(grid) = grid {
        builder = builder.samples(grid.as_slice().to_vec());
    }

    Ok(Scenario::new(scenario.name.clone(), builder.build()?, scenario.gas))
}

fn print_report(scenario: &Scenario, run: &BlowdownRun, table_rows: usize) {
    let c = &scenario.configuration;
    let gas = &scenario.gas;
    let series = &run.series;

    println!();
    println!("====================================================================");
    println!("  COLD GAS BLOWDOWN — {}", scenario.name);
    println!("====================================================================");
    println!();
    println!("  System");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Volume:        {:>8.3} L     Pressure:     {:>8.1} bar",
        c.volume_l, c.initial_pressure_bar
    );
    println!(
        "  Throat r:      {:>8.3} mm    Propellant:   {:>8.4} kg",
        c.nozzle_radius_mm,
        run.initial.propellant_mass()
    );
    println!(
        "  gamma:         {:>8.3}       R:            {:>8.1} J/(kg·K)",
        gas.gamma, gas.r
    );
    println!(
        "  T0:            {:>8.2} K     Cd:           {:>8.3}",
        run.initial.temperature_k, gas.cd
    );
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Total Impulse:     {:>10.2} N·s", run.total_impulse);
    println!("  Peak Thrust:       {:>10.2} N", run.peak_thrust());
    println!("  Peak Isp:          {:>10.2} s", run.peak_isp());
    println!("  Mean Thrust:       {:>10.2} N", run.mean_thrust());
    println!("  Tau:               {:>10.4} s", run.tau);
    println!("  Ambient crossing:  {:>10.3} s", run.ambient_crossing_time);
    println!();

    println!("  Blowdown");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>9}  {:>8}  {:>10}  {:>8}  {:>7}  {:>6}",
        "t (s)", "P (bar)", "T (K)", "mdot(g/s)", "F (N)", "Isp (s)", "flag"
    );
    println!("  {}", "─".repeat(66));

    let interval = (series.len() / table_rows.max(1)).max(1);
    for (i, s) in series.iter().enumerate() {
        if i % interval != 0 && i != series.len() - 1 {
            continue;
        }
        let flag = match s.status {
            SampleStatus::Nominal => "",
            SampleStatus::Subambient => "SUB",
            SampleStatus::OutOfDomain => "OOD",
        };
        println!(
            "  {:>7.2}  {:>9.3}  {:>8.2}  {:>10.4}  {:>8.3}  {:>7.2}  {:>6}",
            s.time,
            pa_to_bar(s.pressure_pa),
            s.temperature_k,
            s.mdot * 1000.0,
            s.thrust,
            s.isp,
            flag
        );
    }

    println!();
    println!("  {} samples, t = 0 .. {:.2} s", series.len(), c.time_grid.end());
    println!("====================================================================");
    println!();
}
