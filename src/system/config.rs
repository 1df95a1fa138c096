use crate::error::{require_positive, Result};
use crate::sim::grid::TimeGrid;

// ---------------------------------------------------------------------------
// Thruster configuration (engineering units, as an engineer enters them)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub volume_l: f64,              // tank volume, L
    pub initial_pressure_bar: f64,  // fill pressure, bar
    pub nozzle_radius_mm: f64,      // throat radius, mm
    pub time_grid: TimeGrid,        // sample times, s
}

impl Configuration {
    /// Fails on the first non-positive or non-finite geometry/fill value.
    /// The time grid is validated on construction.
    pub fn validate(&self) -> Result<()> {
        require_positive("volume_l", self.volume_l)?;
        require_positive("initial_pressure_bar", self.initial_pressure_bar)?;
        require_positive("nozzle_radius_mm", self.nozzle_radius_mm)?;
        Ok(())
    }

    /// Same tank and fill with a different throat radius.
    pub fn with_nozzle_radius_mm(&self, radius_mm: f64) -> Self {
        Self { nozzle_radius_mm: radius_mm, ..self.clone() }
    }

    pub fn with_time_grid(&self, time_grid: TimeGrid) -> Self {
        Self { time_grid, ..self.clone() }
    }
}

// ---------------------------------------------------------------------------
// Configuration builder
// ---------------------------------------------------------------------------

pub struct ConfigurationBuilder {
    volume_l: f64,
    initial_pressure_bar: f64,
    nozzle_radius_mm: f64,
    end_s: f64,
    step_s: f64,
    samples: Option<Vec<f64>>,
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationBuilder {
    pub fn new() -> Self {
        Self {
            volume_l: 0.15,
            initial_pressure_bar: 120.0,
            nozzle_radius_mm: 0.5,
            end_s: 6.0,
            step_s: 0.01,
            samples: None,
        }
    }

    pub fn volume_l(mut self, v: f64) -> Self { self.volume_l = v; self }
    pub fn initial_pressure_bar(mut self, v: f64) -> Self { self.initial_pressure_bar = v; self }
    pub fn nozzle_radius_mm(mut self, v: f64) -> Self { self.nozzle_radius_mm = v; self }
    pub fn end_s(mut self, v: f64) -> Self { self.end_s = v; self }
    pub fn step_s(mut self, v: f64) -> Self { self.step_s = v; self }

    /// Explicit sample times; overrides `end_s` / `step_s`.
    pub fn samples(mut self, v: Vec<f64>) -> Self { self.samples = Some(v); self }

    pub fn build(self) -> Result<Configuration> {
        // Scalars first, so a bad fill is reported before a bad grid.
        require_positive("volume_l", self.volume_l)?;
        require_positive("initial_pressure_bar", self.initial_pressure_bar)?;
        require_positive("nozzle_radius_mm", self.nozzle_radius_mm)?;

        let time_grid = match self.samples {
            Some(samples) => TimeGrid::from_samples(samples)?,
            None => TimeGrid::arange(self.end_s, self.step_s)?,
        };

        Ok(Configuration {
            volume_l: self.volume_l,
            initial_pressure_bar: self.initial_pressure_bar,
            nozzle_radius_mm: self.nozzle_radius_mm,
            time_grid,
        })
    }
}
