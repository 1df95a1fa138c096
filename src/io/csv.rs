use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::sim::blowdown::{BlowdownSeries, SampleStatus};

#[derive(Debug, Serialize)]
struct Row {
    time_s: f64,
    pressure_pa: f64,
    density_kg_m3: f64,
    temperature_k: f64,
    mdot_kg_s: f64,
    thrust_n: f64,
    isp_s: f64,
    status: SampleStatus,
}

/// Write the blowdown time series in CSV format, one row per sample.
///
/// Columns: time_s, pressure_pa, density_kg_m3, temperature_k,
///          mdot_kg_s, thrust_n, isp_s, status
pub fn write_series<W: Write>(writer: W, series: &BlowdownSeries) -> Result<()> {
    let mut csv = ::csv::Writer::from_writer(writer);
    for s in series.iter() {
        csv.serialize(Row {
            time_s: s.time,
            pressure_pa: s.pressure_pa,
            density_kg_m3: s.density,
            temperature_k: s.temperature_k,
            mdot_kg_s: s.mdot,
            thrust_n: s.thrust,
            isp_s: s.isp,
            status: s.status,
        })?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the time series to a CSV file at the given path.
pub fn write_series_file(path: &Path, series: &BlowdownSeries) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_series(file, series)
}
