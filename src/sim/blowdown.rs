use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::physics::{nozzle, GasProperties, G0, P_REF};
use crate::system::{Configuration, InitialState};
use super::grid::TimeGrid;

// ---------------------------------------------------------------------------
// Per-sample validity marker
// ---------------------------------------------------------------------------

/// How a sample relates to the range where the closed-form model is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleStatus {
    /// Tank above the reference pressure; every value follows the closed form.
    Nominal,
    /// Tank below the reference pressure. Tank state and mass flow are still
    /// reported; the expansion term is clamped so thrust and Isp are 0.
    Subambient,
    /// φ(t) is not positive and finite; all values are NaN.
    OutOfDomain,
}

/// Every model output at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlowdownSample {
    pub time: f64,            // s
    pub pressure_pa: f64,
    pub density: f64,         // kg/m^3
    pub temperature_k: f64,
    pub mdot: f64,            // kg/s
    pub thrust: f64,          // N
    pub isp: f64,             // s
    pub status: SampleStatus,
}

impl BlowdownSample {
    fn out_of_domain(time: f64) -> Self {
        Self {
            time,
            pressure_pa: f64::NAN,
            density: f64::NAN,
            temperature_k: f64::NAN,
            mdot: f64::NAN,
            thrust: f64::NAN,
            isp: f64::NAN,
            status: SampleStatus::OutOfDomain,
        }
    }
}

// ---------------------------------------------------------------------------
// Isentropic blowdown through a choked throat
// ---------------------------------------------------------------------------

/// Closed-form blowdown model.
///
/// Every quantity is a function of φ(t) = 1 + (γ-1)/2 · t/τ alone, so samples
/// are independent and may be evaluated in any order.
#[derive(Debug, Clone)]
pub struct BlowdownModel {
    gamma: f64,
    r: f64,
    cd: f64,
    initial: InitialState,
    tau: f64,
}

impl BlowdownModel {
    pub fn new(config: &Configuration, gas: &GasProperties) -> Result<Self> {
        let initial = InitialState::derive(config, gas)?;
        let tau = initial.volume_m3 / (gas.cd * initial.throat_area * initial.sound_speed)
            * nozzle::tau_factor(gas.gamma);

        Ok(Self {
            gamma: gas.gamma,
            r: gas.r,
            cd: gas.cd,
            initial,
            tau,
        })
    }

    /// Blowdown time constant, s.
    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn initial(&self) -> &InitialState {
        &self.initial
    }

    /// Dimensionless decay factor φ(t).
    pub fn phi(&self, t: f64) -> f64 {
        1.0 + ((self.gamma - 1.0) / 2.0) * (t / self.tau)
    }

    /// Earliest time at which φ stops being positive. Infinite when φ stays
    /// positive for all non-negative time, which holds for every γ > 1.
    pub fn domain_limit(&self) -> f64 {
        let t_zero = -2.0 * self.tau / (self.gamma - 1.0);
        if t_zero > 0.0 {
            t_zero
        } else {
            f64::INFINITY
        }
    }

    /// Time at which tank pressure falls to the reference pressure, after
    /// which the thrust relation yields nothing. 0 if the tank starts there.
    pub fn ambient_crossing_time(&self) -> f64 {
        let ratio = self.initial.pressure_pa / P_REF;
        if ratio <= 1.0 {
            return 0.0;
        }
        let phi = ratio.powf((self.gamma - 1.0) / (2.0 * self.gamma));
        (phi - 1.0) * 2.0 * self.tau / (self.gamma - 1.0)
    }

    /// Evaluates all outputs at elapsed time `t`.
    pub fn sample(&self, t: f64) -> BlowdownSample {
        let phi = self.phi(t);
        if !(phi.is_finite() && phi > 0.0) {
            return BlowdownSample::out_of_domain(t);
        }

        let g = self.gamma;
        let s = &self.initial;

        let pressure_pa = s.pressure_pa * phi.powf(2.0 * g / (1.0 - g));
        let density = s.density * phi.powf(2.0 / (1.0 - g));
        let temperature_k = s.temperature_k * phi.powi(-2);
        let sound_speed = (g * self.r * temperature_k).sqrt();
        let mdot = nozzle::choked_mass_flow(self.cd, s.throat_area, density, sound_speed, g);

        if pressure_pa < P_REF {
            return BlowdownSample {
                time: t,
                pressure_pa,
                density,
                temperature_k,
                mdot,
                thrust: 0.0,
                isp: 0.0,
                status: SampleStatus::Subambient,
            };
        }

        // Expansion against the fixed 1e5 Pa reference, not the tank history.
        let expansion = ((P_REF / pressure_pa).powf((g - 1.0) / -g) - 1.0).max(0.0);
        let thrust = mdot * (expansion / ((g - 1.0) / 2.0)).sqrt() * s.sound_speed;
        let isp = if mdot > 0.0 {
            thrust / (mdot * G0)
        } else {
            f64::NAN
        };

        BlowdownSample {
            time: t,
            pressure_pa,
            density,
            temperature_k,
            mdot,
            thrust,
            isp,
            status: SampleStatus::Nominal,
        }
    }

    /// Evaluates the model over the full grid.
    pub fn evaluate(&self, grid: &TimeGrid) -> BlowdownSeries {
        let samples: Vec<BlowdownSample> = grid.iter().map(|t| self.sample(t)).collect();
        BlowdownSeries::from_samples(grid, &samples)
    }
}

// ---------------------------------------------------------------------------
// Parallel output series
// ---------------------------------------------------------------------------

/// Six model outputs plus the status marker, all indexed like the time grid.
#[derive(Debug, Clone)]
pub struct BlowdownSeries {
    pub time: DVector<f64>,
    pub pressure_pa: DVector<f64>,
    pub density: DVector<f64>,
    pub temperature_k: DVector<f64>,
    pub mdot: DVector<f64>,
    pub thrust: DVector<f64>,
    pub isp: DVector<f64>,
    pub status: Vec<SampleStatus>,
}

impl BlowdownSeries {
    fn from_samples(grid: &TimeGrid, samples: &[BlowdownSample]) -> Self {
        let n = samples.len();
        let column = |f: fn(&BlowdownSample) -> f64| DVector::from_iterator(n, samples.iter().map(f));

        Self {
            time: grid.as_vector().clone(),
            pressure_pa: column(|s| s.pressure_pa),
            density: column(|s| s.density),
            temperature_k: column(|s| s.temperature_k),
            mdot: column(|s| s.mdot),
            thrust: column(|s| s.thrust),
            isp: column(|s| s.isp),
            status: samples.iter().map(|s| s.status).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Row `i` as a single sample.
    pub fn get(&self, i: usize) -> Option<BlowdownSample> {
        (i < self.len()).then(|| BlowdownSample {
            time: self.time[i],
            pressure_pa: self.pressure_pa[i],
            density: self.density[i],
            temperature_k: self.temperature_k[i],
            mdot: self.mdot[i],
            thrust: self.thrust[i],
            isp: self.isp[i],
            status: self.status[i],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = BlowdownSample> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Index of the first out-of-domain sample, if any.
    pub fn first_out_of_domain(&self) -> Option<usize> {
        self.status.iter().position(|s| *s == SampleStatus::OutOfDomain)
    }

    /// Number of leading samples that carry real values.
    pub fn in_domain_len(&self) -> usize {
        self.first_out_of_domain().unwrap_or(self.len())
    }

    pub fn count(&self, status: SampleStatus) -> usize {
        self.status.iter().filter(|s| **s == status).count()
    }

    /// Tank pressure in bar, for reporting.
    pub fn pressure_bar(&self) -> DVector<f64> {
        self.pressure_pa.map(crate::physics::pa_to_bar)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::ConfigurationBuilder;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn reference_model() -> (BlowdownModel, TimeGrid) {
        let config = ConfigurationBuilder::new().build().unwrap();
        let model = BlowdownModel::new(&config, &GasProperties::reference()).unwrap();
        (model, config.time_grid)
    }

    #[test]
    fn reference_tau() {
        let (model, _) = reference_model();
        // Independent evaluation of the time-constant formula
        let (g, r, t0, cd) = (1.4_f64, 300.0_f64, 293.15_f64, 0.6_f64);
        let v = 0.15 / 1000.0;
        let a = std::f64::consts::PI * (0.5e-3_f64).powi(2);
        let c0 = (g * r * t0).sqrt();
        let expected = (v / (cd * a * c0)) * ((g + 1.0) / 2.0).powf((g + 1.0) / (2.0 * (g - 1.0)));
        assert_relative_eq!(model.tau(), expected, max_relative = 1e-12);
        assert_relative_eq!(model.tau(), 1.567_560_354, epsilon = 1e-8);
    }

    #[test]
    fn initial_sample_matches_fill_state_exactly() {
        let (model, _) = reference_model();
        let s0 = model.sample(0.0);
        assert_eq!(model.phi(0.0), 1.0);
        assert_eq!(s0.pressure_pa, 1.2e7);
        assert_eq!(s0.temperature_k, 293.15);
        assert_eq!(s0.density, model.initial().density);
        assert_eq!(s0.status, SampleStatus::Nominal);
    }

    #[test]
    fn reference_peak_figures() {
        let (model, _) = reference_model();
        let s0 = model.sample(0.0);
        assert_relative_eq!(s0.mdot, 0.013_056_81, epsilon = 1e-8);
        assert_relative_eq!(s0.thrust, 17.526_570, epsilon = 1e-5);
        assert_relative_eq!(s0.isp, 136.832_996, epsilon = 1e-5);
    }

    #[test]
    fn isp_is_exit_velocity_over_g() {
        // F / (ṁ·g0) cancels ṁ: Isp depends on pressure only
        let (model, _) = reference_model();
        let s = model.sample(2.0);
        let g = 1.4;
        let expansion = (s.pressure_pa / P_REF).powf((g - 1.0) / g) - 1.0;
        let ve = (expansion / ((g - 1.0) / 2.0)).sqrt() * model.initial().sound_speed;
        assert_relative_eq!(s.isp, ve / G0, max_relative = 1e-12);
    }

    #[test]
    fn reference_pressure_strictly_decreasing() {
        let (model, grid) = reference_model();
        let series = model.evaluate(&grid);
        assert_eq!(series.len(), 600);
        assert_eq!(series.count(SampleStatus::Nominal), 600);
        for w in series.pressure_pa.as_slice().windows(2) {
            assert!(w[1] < w[0]);
        }
        assert_relative_eq!(series.pressure_pa[599], 225_563.673, epsilon = 1e-2);
    }

    #[test]
    fn tank_state_is_monotone_non_increasing() {
        let (model, _) = reference_model();
        // Out to just under five time constants, slightly past the ambient crossing
        let grid = TimeGrid::linspace(2.0 * model.tau() / 0.4 * 0.999, 2_000).unwrap();
        let series = model.evaluate(&grid);
        for v in [&series.pressure_pa, &series.density, &series.temperature_k] {
            assert!(v.as_slice().windows(2).all(|w| w[1] <= w[0]));
            assert!(v.iter().all(|x| x.is_finite() && *x > 0.0));
        }
    }

    #[test]
    fn isentropic_relations_hold() {
        let (model, _) = reference_model();
        let s0 = model.initial();
        for t in [0.3, 1.0, 4.5] {
            let s = model.sample(t);
            let p_ratio = s.pressure_pa / s0.pressure_pa;
            let rho_ratio = s.density / s0.density;
            let t_ratio = s.temperature_k / s0.temperature_k;
            assert_relative_eq!(p_ratio, rho_ratio.powf(1.4), max_relative = 1e-10);
            assert_relative_eq!(p_ratio, rho_ratio * t_ratio, max_relative = 1e-10);
        }
    }

    #[test]
    fn subambient_samples_are_flagged_and_clamped() {
        let (model, _) = reference_model();
        let crossing = model.ambient_crossing_time();
        assert_relative_eq!(crossing, 7.693_940_22, epsilon = 1e-6);

        let before = model.sample(crossing * 0.99);
        assert_eq!(before.status, SampleStatus::Nominal);
        assert!(before.thrust > 0.0);

        let after = model.sample(crossing * 1.01);
        assert_eq!(after.status, SampleStatus::Subambient);
        assert!(after.pressure_pa < P_REF);
        assert!(after.mdot > 0.0);
        assert_eq!(after.thrust, 0.0);
        assert_eq!(after.isp, 0.0);
    }

    #[test]
    fn pressure_at_crossing_is_reference() {
        let (model, _) = reference_model();
        let s = model.sample(model.ambient_crossing_time());
        assert_relative_eq!(s.pressure_pa, P_REF, max_relative = 1e-9);
        assert_abs_diff_eq!(s.thrust, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn low_fill_crosses_immediately() {
        let config = ConfigurationBuilder::new().initial_pressure_bar(0.8).build().unwrap();
        let model = BlowdownModel::new(&config, &GasProperties::reference()).unwrap();
        assert_eq!(model.ambient_crossing_time(), 0.0);
        assert_eq!(model.sample(0.0).status, SampleStatus::Subambient);
    }

    #[test]
    fn negative_phi_is_out_of_domain() {
        let (model, _) = reference_model();
        assert!(model.domain_limit().is_infinite());
        // Only reachable before t = 0
        let t = -2.0 * model.tau() / 0.4 - 1.0;
        assert!(model.phi(t) < 0.0);
        let s = model.sample(t);
        assert_eq!(s.status, SampleStatus::OutOfDomain);
        assert!(s.pressure_pa.is_nan() && s.isp.is_nan());
        assert_eq!(model.sample(f64::NAN).status, SampleStatus::OutOfDomain);
    }

    #[test]
    fn doubling_throat_area_halves_tau() {
        let config = ConfigurationBuilder::new().build().unwrap();
        let gas = GasProperties::reference();
        let m1 = BlowdownModel::new(&config, &gas).unwrap();
        let m2 = BlowdownModel::new(&config.with_nozzle_radius_mm(0.5 * 2f64.sqrt()), &gas).unwrap();
        assert_relative_eq!(m2.tau(), m1.tau() / 2.0, max_relative = 1e-12);
        // Self-similar in t/τ: the wider throat reaches the same state twice as fast
        assert_relative_eq!(
            m2.sample(1.0).pressure_pa,
            m1.sample(2.0).pressure_pa,
            max_relative = 1e-12
        );
    }

    #[test]
    fn series_rows_match_samples() {
        let (model, grid) = reference_model();
        let series = model.evaluate(&grid);
        let row = series.get(123).unwrap();
        assert_eq!(row, model.sample(grid.as_slice()[123]));
        assert!(series.get(600).is_none());
        assert_eq!(series.iter().count(), 600);
        assert_eq!(series.in_domain_len(), 600);
        assert_relative_eq!(series.pressure_bar()[0], 120.0, epsilon = 1e-12);
    }
}
