pub mod gas;
pub mod nozzle;

pub use gas::GasProperties;
pub use nozzle::NozzleProfile;

// ---------------------------------------------------------------------------
// Physical constants and unit conversions
// ---------------------------------------------------------------------------

pub const G0: f64 = 9.81;                 // gravity used for Isp, m/s^2
pub const P_REF: f64 = 1.0e5;             // expansion reference pressure, Pa
pub const PA_PER_BAR: f64 = 1.0e5;
pub const LITERS_PER_M3: f64 = 1000.0;
pub const MM_PER_M: f64 = 1000.0;
pub const ZERO_CELSIUS: f64 = 273.15;     // K

pub fn liters_to_m3(volume_l: f64) -> f64 {
    volume_l / LITERS_PER_M3
}

pub fn bar_to_pa(pressure_bar: f64) -> f64 {
    pressure_bar * PA_PER_BAR
}

pub fn pa_to_bar(pressure_pa: f64) -> f64 {
    pressure_pa / PA_PER_BAR
}

pub fn celsius_to_kelvin(t_degc: f64) -> f64 {
    t_degc + ZERO_CELSIUS
}

pub fn mm_to_m(length_mm: f64) -> f64 {
    length_mm / MM_PER_M
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_conversions() {
        assert_eq!(liters_to_m3(0.15), 0.15 / 1000.0);
        assert_eq!(bar_to_pa(120.0), 1.2e7);
        assert_eq!(pa_to_bar(1.2e7), 120.0);
        assert_eq!(celsius_to_kelvin(20.0), 293.15);
        assert_eq!(mm_to_m(0.5), 0.5e-3);
    }
}
