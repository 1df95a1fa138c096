use nalgebra::DVector;

use crate::error::{Error, Result};

/// Largest grid accepted by the uniform constructors.
pub const MAX_SAMPLES: usize = 100_000_000;

fn check_sample_count(n: f64) -> Result<usize> {
    if n.is_finite() && n <= MAX_SAMPLES as f64 {
        Ok(n as usize)
    } else {
        Err(Error::InvalidTimeGrid(format!(
            "{n} samples exceeds the limit of {MAX_SAMPLES}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Time grid: strictly increasing sample times starting at t = 0
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: DVector<f64>,      // s
}

impl TimeGrid {
    /// Validates an explicit list of sample times.
    ///
    /// Requires at least two finite samples, the first one exactly 0, and
    /// strictly increasing values. Steps need not be uniform.
    pub fn from_samples(samples: Vec<f64>) -> Result<Self> {
        if samples.len() < 2 {
            return Err(Error::InvalidTimeGrid(format!(
                "need at least 2 samples, got {}",
                samples.len()
            )));
        }
        if let Some(i) = samples.iter().position(|t| !t.is_finite()) {
            return Err(Error::InvalidTimeGrid(format!("sample {i} is not finite")));
        }
        if samples[0] != 0.0 {
            return Err(Error::InvalidTimeGrid(format!(
                "must start at 0, starts at {}",
                samples[0]
            )));
        }
        if let Some(i) = samples.windows(2).position(|w| w[1] <= w[0]) {
            return Err(Error::InvalidTimeGrid(format!(
                "not strictly increasing at sample {}",
                i + 1
            )));
        }

        Ok(Self { times: DVector::from_vec(samples) })
    }

    /// Uniform half-open grid `[0, end)` with spacing `step`: t_i = i·step.
    pub fn arange(end: f64, step: f64) -> Result<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(Error::InvalidTimeGrid(format!("step must be > 0, got {step}")));
        }
        if !(end.is_finite() && end > 0.0) {
            return Err(Error::InvalidTimeGrid(format!("end must be > 0, got {end}")));
        }
        let n = check_sample_count((end / step).ceil())?;
        Self::from_samples((0..n).map(|i| i as f64 * step).collect())
    }

    /// Same `[0, end)` span as a uniform grid, resampled at `step`.
    pub fn restep(&self, step: f64) -> Result<Self> {
        let t = self.as_slice();
        Self::arange(self.len() as f64 * (t[1] - t[0]), step)
    }

    /// Uniform closed grid `[0, end]` with `samples` points.
    pub fn linspace(end: f64, samples: usize) -> Result<Self> {
        if !(end.is_finite() && end > 0.0) {
            return Err(Error::InvalidTimeGrid(format!("end must be > 0, got {end}")));
        }
        if samples < 2 {
            return Err(Error::InvalidTimeGrid(format!(
                "need at least 2 samples, got {samples}"
            )));
        }
        check_sample_count(samples as f64)?;
        let h = end / (samples - 1) as f64;
        let mut times: Vec<f64> = (0..samples).map(|i| i as f64 * h).collect();
        times[samples - 1] = end;
        Self::from_samples(times)
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false: a validated grid holds at least two samples.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn end(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    pub fn as_slice(&self) -> &[f64] {
        self.times.as_slice()
    }

    pub fn as_vector(&self) -> &DVector<f64> {
        &self.times
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.times.iter().copied()
    }
}
