use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::physics::GasProperties;
use crate::system::{Configuration, InitialState};
use super::blowdown::{BlowdownModel, BlowdownSeries, SampleStatus};
use super::integrator::{cumulative_trapezoid, trapezoid};

// ---------------------------------------------------------------------------
// Run result
// ---------------------------------------------------------------------------

/// Immutable snapshot of one model evaluation.
#[derive(Debug, Clone)]
pub struct BlowdownRun {
    pub initial: InitialState,
    pub tau: f64,                     // s
    pub ambient_crossing_time: f64,   // s
    pub series: BlowdownSeries,
    pub total_impulse: f64,           // N·s
}

impl BlowdownRun {
    /// Fails if any sample fell outside the model's domain.
    pub fn ensure_in_domain(&self) -> Result<()> {
        match self.series.first_out_of_domain() {
            Some(index) => Err(Error::OutOfDomain { index, time: self.series.time[index] }),
            None => Ok(()),
        }
    }

    /// Impulse delivered up to each sample, N·s.
    pub fn cumulative_impulse(&self) -> Result<Vec<f64>> {
        let n = self.series.in_domain_len();
        cumulative_trapezoid(&self.series.time.as_slice()[..n], &self.series.thrust.as_slice()[..n])
    }

    /// Thrust at t = 0, the maximum of a blowdown curve.
    pub fn peak_thrust(&self) -> f64 {
        self.series.thrust[0]
    }

    pub fn peak_isp(&self) -> f64 {
        self.series.isp[0]
    }

    /// Time-averaged thrust over the ambient-pressure burn, N.
    pub fn mean_thrust(&self) -> f64 {
        if self.ambient_crossing_time > 0.0 {
            self.total_impulse / self.ambient_crossing_time.min(self.series.time[self.series.len() - 1])
        } else {
            0.0
        }
    }
}

// ---------------------------------------------------------------------------
// Full run: validate, derive, evaluate, integrate
// ---------------------------------------------------------------------------

/// Integrates thrust over the leading in-domain samples, N·s.
fn in_domain_impulse(series: &BlowdownSeries) -> Result<f64> {
    let in_domain = series.in_domain_len();
    if in_domain < series.len() {
        warn!(
            "{} samples from t={:.3} s lie outside the blowdown domain; excluded from impulse",
            series.len() - in_domain,
            series.time[in_domain],
        );
    }
    trapezoid(
        &series.time.as_slice()[..in_domain],
        &series.thrust.as_slice()[..in_domain],
    )
}

pub fn run(config: &Configuration, gas: &GasProperties) -> Result<BlowdownRun> {
    let model = BlowdownModel::new(config, gas)?;
    let initial = *model.initial();

    debug!(
        "Initial state: V={:.3e} m^3, P0={:.3e} Pa, T0={:.2} K, rho0={:.3} kg/m^3, c0={:.2} m/s, A={:.3e} m^2",
        initial.volume_m3,
        initial.pressure_pa,
        initial.temperature_k,
        initial.density,
        initial.sound_speed,
        initial.throat_area,
    );
    debug!("tau = {:.6} s", model.tau());

    let grid = &config.time_grid;
    let series = model.evaluate(grid);

    let subambient = series.count(SampleStatus::Subambient);
    if subambient > 0 {
        warn!(
            "{subambient} samples below reference pressure after t={:.3} s carry zero thrust",
            model.ambient_crossing_time(),
        );
    } else if grid.end() < model.ambient_crossing_time() {
        info!(
            "Time grid ends at {:.2} s, before the ambient crossing at {:.2} s; impulse is truncated",
            grid.end(),
            model.ambient_crossing_time(),
        );
    }

    let total_impulse = in_domain_impulse(&series)?;

    info!(
        "Blowdown evaluated: {} samples, tau={:.4} s, total impulse {:.3} N·s",
        series.len(),
        model.tau(),
        total_impulse,
    );

    Ok(BlowdownRun {
        initial,
        tau: model.tau(),
        ambient_crossing_time: model.ambient_crossing_time(),
        series,
        total_impulse,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::TimeGrid;
    use crate::system::ConfigurationBuilder;
    use approx::assert_relative_eq;

    fn reference() -> (Configuration, GasProperties) {
        (ConfigurationBuilder::new().build().unwrap(), GasProperties::reference())
    }

    #[test]
    fn reference_run_figures() {
        let (config, gas) = reference();
        let run = run(&config, &gas).unwrap();
        assert_eq!(run.series.len(), config.time_grid.len());
        assert_eq!(run.series.pressure_pa[0], 1.2e7);
        assert_eq!(run.series.temperature_k[0], 293.15);
        assert_relative_eq!(run.tau, 1.567_560_354, epsilon = 1e-8);
        assert!(run.total_impulse.is_finite() && run.total_impulse > 0.0);
        assert_relative_eq!(run.total_impulse, 20.520_184, epsilon = 1e-4);
        assert!(run.ensure_in_domain().is_ok());
    }

    #[test]
    fn total_impulse_converges_quadratically() {
        let (config, gas) = reference();
        let impulse = |n: usize| {
            let c = config.with_time_grid(TimeGrid::linspace(6.0, n).unwrap());
            run(&c, &gas).unwrap().total_impulse
        };
        let reference = impulse(12_001);
        let e1 = impulse(601) - reference;   // h = 0.01
        let e2 = impulse(301) - reference;   // h = 0.02
        assert!(e1.abs() < 1e-3, "error at h=0.01: {e1}");
        let ratio = e2 / e1;
        assert!((3.5..4.5).contains(&ratio), "convergence ratio {ratio}");
    }

    #[test]
    fn impulse_independent_of_throat_area() {
        let (config, gas) = reference();
        let grid = TimeGrid::linspace(8.0, 8_001).unwrap();
        let narrow = run(&config.with_time_grid(grid.clone()), &gas).unwrap();
        let wide_cfg = config.with_time_grid(grid).with_nozzle_radius_mm(0.5 * 2f64.sqrt());
        let wide = run(&wide_cfg, &gas).unwrap();

        assert_relative_eq!(wide.tau, narrow.tau / 2.0, max_relative = 1e-12);
        assert_relative_eq!(wide.peak_thrust(), 2.0 * narrow.peak_thrust(), max_relative = 1e-12);
        assert_relative_eq!(wide.total_impulse, narrow.total_impulse, max_relative = 1e-3);
    }

    #[test]
    fn long_grid_flags_subambient_tail() {
        let (config, gas) = reference();
        let run = run(&config.with_time_grid(TimeGrid::arange(10.0, 0.01).unwrap()), &gas).unwrap();
        let subambient = run.series.count(SampleStatus::Subambient);
        assert!(subambient > 0);
        let first = run.series.status.iter().position(|s| *s == SampleStatus::Subambient).unwrap();
        assert!(run.series.time[first] >= run.ambient_crossing_time);
        assert!(run.series.time[first - 1] < run.ambient_crossing_time);
        assert!(run.total_impulse.is_finite());
        assert!(run.series.thrust.iter().skip(first).all(|f| *f == 0.0));
    }

    #[test]
    fn cumulative_impulse_ends_at_total() {
        let (config, gas) = reference();
        let run = run(&config, &gas).unwrap();
        let running = run.cumulative_impulse().unwrap();
        assert_eq!(running.len(), run.series.len());
        assert_relative_eq!(running[running.len() - 1], run.total_impulse, epsilon = 1e-12);
    }

    #[test]
    fn invalid_config_fails_before_evaluation() {
        let (config, gas) = reference();
        let gas = gas.with_cd(1.5);
        assert!(matches!(run(&config, &gas), Err(Error::InvalidParameter { name: "cd", .. })));
    }

    #[test]
    fn out_of_domain_tail_is_reported_and_excluded() {
        let (config, gas) = reference();
        let mut run = run(&config, &gas).unwrap();
        for i in 400..run.series.len() {
            run.series.status[i] = SampleStatus::OutOfDomain;
            run.series.thrust[i] = f64::NAN;
        }

        match run.ensure_in_domain() {
            Err(Error::OutOfDomain { index, time }) => {
                assert_eq!(index, 400);
                assert_eq!(time, run.series.time[400]);
            }
            other => panic!("expected out-of-domain error, got {other:?}"),
        }

        let impulse = in_domain_impulse(&run.series).unwrap();
        let expected = trapezoid(
            &run.series.time.as_slice()[..400],
            &run.series.thrust.as_slice()[..400],
        )
        .unwrap();
        assert!(impulse.is_finite());
        assert_eq!(impulse, expected);
        assert!(impulse < run.total_impulse);
        assert_eq!(run.cumulative_impulse().unwrap().len(), 400);
    }

    #[test]
    fn mean_thrust_within_peak() {
        let (config, gas) = reference();
        let run = run(&config, &gas).unwrap();
        assert!(run.mean_thrust() > 0.0 && run.mean_thrust() < run.peak_thrust());
    }
}
