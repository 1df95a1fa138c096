use std::{fs, path::{Path, PathBuf}};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::physics::{GasProperties, NozzleProfile};
use crate::system::{Configuration, ConfigurationBuilder, Scenario};

// ---------------------------------------------------------------------------
// TOML run file
// ---------------------------------------------------------------------------

/// Run description as written by the user.
///
/// ```toml
/// [system]
/// volume_l = 0.15
/// initial_pressure_bar = 120.0
/// nozzle_radius_mm = 0.5
///
/// [gas]
/// preset = "reference"
/// nozzle = "conical"
///
/// [time]
/// end_s = 6.0
/// step_s = 0.01
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunFile {
    #[serde(default)]
    pub name: Option<String>,
    pub system: SystemSection,
    #[serde(default)]
    pub gas: GasSection,
    #[serde(default)]
    pub time: TimeSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemSection {
    pub volume_l: f64,
    pub initial_pressure_bar: f64,
    pub nozzle_radius_mm: f64,
}

/// Starts from `preset` (default "reference"); every other field overrides it.
/// An explicit `cd` wins over `nozzle`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GasSection {
    pub preset: Option<String>,
    pub gamma: Option<f64>,
    pub r: Option<f64>,
    pub t0_degc: Option<f64>,
    pub nozzle: Option<NozzleProfile>,
    pub cd: Option<f64>,
}

/// Either a uniform `[0, end_s)` range or explicit `samples`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeSection {
    pub end_s: Option<f64>,
    pub step_s: Option<f64>,
    pub samples: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    pub csv: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

impl RunFile {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn read(path: &Path) -> Result<Self> {
        info!("Reading run file '{}'", path.display());
        Self::from_toml(&fs::read_to_string(path)?)
    }

    pub fn gas(&self) -> Result<GasProperties> {
        let g = &self.gas;
        let mut gas = match &g.preset {
            Some(name) => GasProperties::preset(name)?,
            None => GasProperties::reference(),
        };
        if let Some(v) = g.gamma { gas.gamma = v; }
        if let Some(v) = g.r { gas.r = v; }
        if let Some(v) = g.t0_degc { gas.t0_degc = v; }
        if let Some(profile) = g.nozzle { gas = gas.with_nozzle(profile); }
        if let Some(v) = g.cd { gas.cd = v; }

        gas.validate()?;
        Ok(gas)
    }

    pub fn configuration(&self) -> Result<Configuration> {
        let mut builder = ConfigurationBuilder::new()
            .volume_l(self.system.volume_l)
            .initial_pressure_bar(self.system.initial_pressure_bar)
            .nozzle_radius_mm(self.system.nozzle_radius_mm);

        if let Some(v) = self.time.end_s { builder = builder.end_s(v); }
        if let Some(v) = self.time.step_s { builder = builder.step_s(v); }
        if let Some(v) = &self.time.samples { builder = builder.samples(v.clone()); }

        builder.build()
    }

    pub fn scenario(&self) -> Result<Scenario> {
        let name = self.name.clone().unwrap_or_else(|| "Run file".to_string());
        Ok(Scenario::new(name, self.configuration()?, self.gas()?))
    }
}
