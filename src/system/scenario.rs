use crate::error::Result;
use crate::physics::GasProperties;
use crate::sim::runner::{self, BlowdownRun};
use super::config::{Configuration, ConfigurationBuilder};

// ---------------------------------------------------------------------------
// Scenario: a named thruster configuration paired with its propellant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub configuration: Configuration,
    pub gas: GasProperties,
}

impl Scenario {
    pub fn new(name: impl Into<String>, configuration: Configuration, gas: GasProperties) -> Self {
        Self { name: name.into(), configuration, gas }
    }

    pub fn run(&self) -> Result<BlowdownRun> {
        runner::run(&self.configuration, &self.gas)
    }
}

// ---------------------------------------------------------------------------
// Preset scenarios
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;
    use crate::physics::NozzleProfile;

    /// 0.15 L nitrogen bottle at 120 bar through a 0.5 mm conical throat, 0-6 s.
    pub fn reference() -> Result<Scenario> {
        Ok(Scenario::new(
            "Reference N2",
            ConfigurationBuilder::new().build()?,
            GasProperties::reference(),
        ))
    }

    /// Larger 0.5 L, 200 bar nitrogen tank with a bell nozzle, run to 20 s.
    pub fn bell_nitrogen() -> Result<Scenario> {
        Ok(Scenario::new(
            "Bell N2",
            ConfigurationBuilder::new()
                .volume_l(0.5)
                .initial_pressure_bar(200.0)
                .nozzle_radius_mm(0.8)
                .end_s(20.0)
                .build()?,
            GasProperties::nitrogen().with_nozzle(NozzleProfile::Bell),
        ))
    }

    pub fn by_name(name: &str) -> Result<Scenario> {
        match name.to_ascii_lowercase().as_str() {
            "bell" | "bell_nitrogen" => bell_nitrogen(),
            "reference" => reference(),
            _ => Err(crate::error::Error::UnknownPreset(name.to_string())),
        }
    }
}
