use crate::error::Result;
use crate::physics::{self, nozzle, GasProperties};
use super::config::Configuration;

/// SI-unit tank and throat state at t = 0, derived once per run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialState {
    pub volume_m3: f64,
    pub pressure_pa: f64,
    pub temperature_k: f64,
    pub density: f64,          // kg/m^3
    pub sound_speed: f64,      // m/s
    pub throat_area: f64,      // m^2
}

impl InitialState {
    /// Validates both inputs, then converts to SI and applies the ideal-gas law.
    pub fn derive(config: &Configuration, gas: &GasProperties) -> Result<Self> {
        config.validate()?;
        gas.validate()?;

        let volume_m3 = physics::liters_to_m3(config.volume_l);
        let pressure_pa = physics::bar_to_pa(config.initial_pressure_bar);
        let temperature_k = gas.t0_kelvin();

        Ok(Self {
            volume_m3,
            pressure_pa,
            temperature_k,
            density: gas.density(pressure_pa, temperature_k),
            sound_speed: gas.sound_speed(temperature_k),
            throat_area: nozzle::throat_area(physics::mm_to_m(config.nozzle_radius_mm)),
        })
    }

    /// Propellant loaded at t = 0, kg.
    pub fn propellant_mass(&self) -> f64 {
        self.density * self.volume_m3
    }
}
