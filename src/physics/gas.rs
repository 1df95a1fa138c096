use serde::{Deserialize, Serialize};

use crate::error::{require_positive, Error, Result};
use super::nozzle::NozzleProfile;
use super::celsius_to_kelvin;

// ---------------------------------------------------------------------------
// Propellant gas properties (ideal gas, calorically perfect)
// ---------------------------------------------------------------------------

/// Constants for the chosen propellant and nozzle quality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasProperties {
    pub gamma: f64,       // specific heat ratio
    pub r: f64,           // specific gas constant, J/(kg·K)
    pub t0_degc: f64,     // initial tank temperature, °C
    pub cd: f64,          // nozzle discharge coefficient, (0, 1]
}

impl Default for GasProperties {
    fn default() -> Self {
        Self::reference()
    }
}

impl GasProperties {
    /// Checks γ > 1, R > 0, T0 > 0 K and Cd in (0, 1].
    pub fn validate(&self) -> Result<()> {
        if !(self.gamma.is_finite() && self.gamma > 1.0) {
            return Err(Error::InvalidParameter {
                name: "gamma",
                value: self.gamma,
                reason: "must be finite and > 1",
            });
        }
        require_positive("r", self.r)?;
        if !self.t0_degc.is_finite() || celsius_to_kelvin(self.t0_degc) <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "t0_degc",
                value: self.t0_degc,
                reason: "must be above absolute zero",
            });
        }
        if !(self.cd.is_finite() && self.cd > 0.0 && self.cd <= 1.0) {
            return Err(Error::InvalidParameter {
                name: "cd",
                value: self.cd,
                reason: "must lie in (0, 1]",
            });
        }
        Ok(())
    }

    /// Initial absolute temperature, K.
    pub fn t0_kelvin(&self) -> f64 {
        celsius_to_kelvin(self.t0_degc)
    }

    /// Speed of sound at temperature `t_k`: c = sqrt(γ·R·T)
    pub fn sound_speed(&self, t_k: f64) -> f64 {
        (self.gamma * self.r * t_k).sqrt()
    }

    /// Ideal-gas density: ρ = P / (R·T)
    pub fn density(&self, p_pa: f64, t_k: f64) -> f64 {
        p_pa / (self.r * t_k)
    }

    pub fn with_cd(mut self, cd: f64) -> Self {
        self.cd = cd;
        self
    }

    pub fn with_nozzle(self, profile: NozzleProfile) -> Self {
        self.with_cd(profile.discharge_coefficient())
    }

    pub fn with_t0_degc(mut self, t0_degc: f64) -> Self {
        self.t0_degc = t0_degc;
        self
    }

    /// Looks up a preset by name (case-insensitive).
    pub fn preset(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "reference" => Ok(Self::reference()),
            "nitrogen" | "n2" => Ok(Self::nitrogen()),
            "air" => Ok(Self::air()),
            "helium" | "he" => Ok(Self::helium()),
            "carbon_dioxide" | "co2" => Ok(Self::carbon_dioxide()),
            _ => Err(Error::UnknownPreset(name.to_string())),
        }
    }

    // -----------------------------------------------------------------------
    // Presets (20 °C fill, poor conical nozzle)
    // -----------------------------------------------------------------------

    /// Rounded nitrogen figures used for quick sizing studies.
    pub fn reference() -> Self {
        Self { gamma: 1.4, r: 300.0, t0_degc: 20.0, cd: NozzleProfile::Conical.discharge_coefficient() }
    }

    pub fn nitrogen() -> Self {
        Self { r: 296.8, ..Self::reference() }
    }

    pub fn air() -> Self {
        Self { r: 287.05, ..Self::reference() }
    }

    pub fn helium() -> Self {
        Self { gamma: 1.667, r: 2077.1, ..Self::reference() }
    }

    pub fn carbon_dioxide() -> Self {
        Self { gamma: 1.289, r: 188.9, ..Self::reference() }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
