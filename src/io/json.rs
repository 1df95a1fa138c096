use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::physics::GasProperties;
use crate::sim::blowdown::SampleStatus;
use crate::sim::runner::BlowdownRun;
use crate::system::Scenario;

/// Inputs echoed next to the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInputs {
    pub name: String,
    pub volume_l: f64,
    pub initial_pressure_bar: f64,
    pub nozzle_radius_mm: f64,
    pub gas: GasProperties,
    pub samples: usize,
    pub time_end_s: f64,
}

/// Summary figures of one blowdown run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub total_impulse_ns: f64,
    pub peak_thrust_n: f64,
    pub peak_isp_s: f64,
    pub mean_thrust_n: f64,
    pub tau_s: f64,
    pub ambient_crossing_s: f64,
    pub propellant_mass_kg: f64,
    pub subambient_samples: usize,
    pub out_of_domain_samples: usize,
}

impl PerformanceSummary {
    pub fn from_run(run: &BlowdownRun) -> Self {
        Self {
            total_impulse_ns: run.total_impulse,
            peak_thrust_n: run.peak_thrust(),
            peak_isp_s: run.peak_isp(),
            mean_thrust_n: run.mean_thrust(),
            tau_s: run.tau,
            ambient_crossing_s: run.ambient_crossing_time,
            propellant_mass_kg: run.initial.propellant_mass(),
            subambient_samples: run.series.count(SampleStatus::Subambient),
            out_of_domain_samples: run.series.count(SampleStatus::OutOfDomain),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub inputs: RunInputs,
    pub performance: PerformanceSummary,
}

impl Report {
    pub fn new(scenario: &Scenario, run: &BlowdownRun) -> Self {
        let c = &scenario.configuration;
        Self {
            inputs: RunInputs {
                name: scenario.name.clone(),
                volume_l: c.volume_l,
                initial_pressure_bar: c.initial_pressure_bar,
                nozzle_radius_mm: c.nozzle_radius_mm,
                gas: scenario.gas,
                samples: c.time_grid.len(),
                time_end_s: c.time_grid.end(),
            },
            performance: PerformanceSummary::from_run(run),
        }
    }
}

/// Write the report as pretty-printed JSON.
pub fn write_report<W: Write>(writer: &mut W, report: &Report) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    Ok(())
}

/// Write the report JSON to a file.
pub fn write_report_file(path: &Path, report: &Report) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_report(&mut file, report)
}
