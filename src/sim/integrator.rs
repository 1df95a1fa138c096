use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Composite trapezoidal rule on arbitrary (non-uniform) sample spacing
// ---------------------------------------------------------------------------

fn check_lengths(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(Error::LengthMismatch { expected: x.len(), found: y.len() });
    }
    Ok(())
}

/// Approximates ∫y dx as Σ (y[i] + y[i+1]) / 2 · (x[i+1] - x[i]).
///
/// Each interval uses its own Δx. Fewer than two samples integrate to 0.
pub fn trapezoid(x: &[f64], y: &[f64]) -> Result<f64> {
    check_lengths(x, y)?;
    Ok(x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| 0.5 * (ys[0] + ys[1]) * (xs[1] - xs[0]))
        .sum())
}

/// Running trapezoidal integral, same length as the input, starting at 0.
pub fn cumulative_trapezoid(x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
    check_lengths(x, y)?;
    let mut out = Vec::with_capacity(x.len());
    if x.is_empty() {
        return Ok(out);
    }

    let mut acc = 0.0;
    out.push(acc);
    for (xs, ys) in x.windows(2).zip(y.windows(2)) {
        acc += 0.5 * (ys[0] + ys[1]) * (xs[1] - xs[0]);
        out.push(acc);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
