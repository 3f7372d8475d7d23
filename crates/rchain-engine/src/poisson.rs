//! Poisson probabilities used by every chain link.

use rchain_core::ChainError;

/// Probability of observing exactly `k` events when `lambda` are expected.
///
/// `k = 0` is handled explicitly so that `0^0 = 1` and `lambda = 0` yields
/// exactly one.
pub fn poisson_pmf(k: u32, lambda: f64) -> Result<f64, ChainError> {
    check_expected(lambda)?;
    if k == 0 {
        return Ok((-lambda).exp());
    }
    if lambda == 0.0 {
        return Ok(0.0);
    }
    let ln_factorial: f64 = (2..=k).map(|i| f64::from(i).ln()).sum();
    Ok((f64::from(k) * lambda.ln() - lambda - ln_factorial).exp())
}

/// Probability of at least one background event: `1 - exp(-lambda)`.
///
/// Evaluated through `exp_m1` so that small expectations keep full
/// relative precision.
pub fn survival_probability(lambda: f64) -> Result<f64, ChainError> {
    check_expected(lambda)?;
    Ok(-(-lambda).exp_m1())
}

fn check_expected(lambda: f64) -> Result<(), ChainError> {
    if !lambda.is_finite() || lambda < 0.0 {
        return Err(ChainError::numeric(
            "invalid-expectation",
            "expected event count must be finite and non-negative",
        )
        .with_context("expected", lambda));
    }
    Ok(())
}
