use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Nozzle quality presets
// ---------------------------------------------------------------------------

/// Nozzle contour, mapped to a typical discharge coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NozzleProfile {
    Conical,
    Bell,
    Frictionless,
}

impl NozzleProfile {
    pub fn discharge_coefficient(self) -> f64 {
        match self {
            NozzleProfile::Conical => 0.6,
            NozzleProfile::Bell => 0.98,
            NozzleProfile::Frictionless => 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Throat geometry and choked flow
// ---------------------------------------------------------------------------

/// Circular orifice area, m^2.
pub fn throat_area(radius_m: f64) -> f64 {
    PI * radius_m.powi(2)
}

/// Exponent (γ+1)/(2(γ-1)) shared by the choked-flow and tau relations.
fn choke_exponent(gamma: f64) -> f64 {
    (gamma + 1.0) / (2.0 * (gamma - 1.0))
}

/// Choked-flow factor (2/(γ+1))^((γ+1)/(2(γ-1))).
pub fn choke_factor(gamma: f64) -> f64 {
    (2.0 / (gamma + 1.0)).powf(choke_exponent(gamma))
}

/// Reciprocal of [`choke_factor`], as it appears in the blowdown time constant.
pub fn tau_factor(gamma: f64) -> f64 {
    ((gamma + 1.0) / 2.0).powf(choke_exponent(gamma))
}

/// Mass flow through a sonic throat: ṁ = Cd·A·ρ·c·choke_factor(γ)
pub fn choked_mass_flow(cd: f64, area: f64, density: f64, sound_speed: f64, gamma: f64) -> f64 {
    cd * area * density * sound_speed * choke_factor(gamma)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn half_millimetre_throat() {
        assert_relative_eq!(throat_area(0.5e-3), 7.853_981_6e-7, epsilon = 1e-13);
    }

    #[test]
    fn diatomic_choke_factor() {
        // γ = 1.4: exponent 3, (1/1.2)^3
        assert_relative_eq!(choke_factor(1.4), 0.578_703_7, epsilon = 1e-7);
        assert_relative_eq!(tau_factor(1.4), 1.728, epsilon = 1e-12);
        assert_relative_eq!(choke_factor(1.4) * tau_factor(1.4), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn doubling_area_doubles_flow() {
        let a = throat_area(0.5e-3);
        let a2 = throat_area(0.5e-3 * 2f64.sqrt());
        assert_relative_eq!(a2, 2.0 * a, epsilon = 1e-15);
        let m1 = choked_mass_flow(0.6, a, 136.4, 350.9, 1.4);
        let m2 = choked_mass_flow(0.6, a2, 136.4, 350.9, 1.4);
        assert_relative_eq!(m2, 2.0 * m1, max_relative = 1e-12);
    }

    #[test]
    fn profiles_map_to_cd() {
        assert_eq!(NozzleProfile::Conical.discharge_coefficient(), 0.6);
        assert_eq!(NozzleProfile::Bell.discharge_coefficient(), 0.98);
        assert_eq!(NozzleProfile::Frictionless.discharge_coefficient(), 1.0);
    }
}
