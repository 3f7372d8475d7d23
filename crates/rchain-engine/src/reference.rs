//! Closed-form expectation for stores in which every pixel is identical.

use rchain_core::{ChainError, DecayChain, EnergyWindow, RunContext};
use rchain_spectra::{Condition, PixelSpectra, SpectrumStore};

/// `P * implants * prod(1 - exp(-rate * t))`, computed from the first
/// pixel without going through the rate estimator or the evaluator.
///
/// Fails with a `Config` error when the store is not uniform.
pub fn uniform_total(
    store: &SpectrumStore,
    ctx: &RunContext,
    chain: &DecayChain,
) -> Result<f64, ChainError> {
    check_uniform(store)?;
    let windows = ctx.windows();
    let implants = first_pixel_sum(store.implant_source(), windows.implant)? as f64;
    let mut product = 1.0;
    for link in chain.links() {
        let counts = match windows.for_decay(link.decay_type) {
            Some(window) => first_pixel_sum(store.reconstructed(link.beam), window)? as f64,
            None => store.fission().effective().first().copied().unwrap_or(0.0),
        };
        let expected = counts / ctx.live_time() * link.time_span;
        product *= -(-expected).exp_m1();
    }
    Ok(ctx.pixels() as f64 * implants * product)
}

/// Relative difference `|a - b| / max(|a|, |b|)`, zero when both are zero.
pub fn relative_difference(a: f64, b: f64) -> f64 {
    let scale = a.abs().max(b.abs());
    if scale == 0.0 {
        0.0
    } else {
        (a - b).abs() / scale
    }
}

fn first_pixel_sum(spectra: &PixelSpectra, window: EnergyWindow) -> Result<u64, ChainError> {
    spectra.window_sum(0, window)
}

fn check_uniform(store: &SpectrumStore) -> Result<(), ChainError> {
    for condition in Condition::ALL {
        let Some(spectra) = store.condition(condition) else {
            continue;
        };
        let first = spectra.pixel(0);
        if let Some(pixel) = (1..spectra.pixels()).find(|&p| spectra.pixel(p) != first) {
            return Err(non_uniform(condition.name(), pixel));
        }
    }
    let fission = store.fission().effective();
    if let Some(pixel) = fission.iter().position(|&value| value != fission[0]) {
        return Err(non_uniform("fission", pixel));
    }
    Ok(())
}

fn non_uniform(source: &str, pixel: usize) -> ChainError {
    ChainError::config(
        "non-uniform-store",
        "closed-form reference needs identical pixels",
    )
    .with_context("source", source)
    .with_context("pixel", pixel)
}
