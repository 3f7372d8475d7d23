//! Per-pixel background rates derived from the spectrum store.

use rayon::prelude::*;
use rchain_core::{BeamState, ChainError, DecayType, RunContext};
use rchain_spectra::SpectrumStore;
use tracing::debug;

/// Converts windowed spectrum sums and fission tags into rates.
#[derive(Debug, Clone, Copy)]
pub struct RateEstimator<'a> {
    store: &'a SpectrumStore,
    ctx: &'a RunContext,
}

impl<'a> RateEstimator<'a> {
    /// Binds an estimator to a store built for the same run context.
    pub fn new(store: &'a SpectrumStore, ctx: &'a RunContext) -> Result<Self, ChainError> {
        if store.pixels() != ctx.pixels() || store.bins() != ctx.bins() {
            return Err(ChainError::config(
                "store-context-mismatch",
                "spectrum store geometry differs from the run context",
            )
            .with_context("store_pixels", store.pixels())
            .with_context("store_bins", store.bins())
            .with_context("pixels", ctx.pixels())
            .with_context("bins", ctx.bins()));
        }
        Ok(Self { store, ctx })
    }

    /// Rate of one pixel in counts per second. The beam state is ignored
    /// for fissions.
    pub fn rate_at(
        &self,
        pixel: usize,
        decay: DecayType,
        beam: BeamState,
    ) -> Result<f64, ChainError> {
        let counts = match self.ctx.windows().for_decay(decay) {
            Some(window) => self.store.reconstructed(beam).window_sum(pixel, window)? as f64,
            None => self
                .store
                .fission()
                .effective()
                .get(pixel)
                .copied()
                .unwrap_or(0.0),
        };
        Ok(counts / self.ctx.live_time())
    }

    /// Rates of every pixel, in pixel order.
    pub fn rate(&self, decay: DecayType, beam: BeamState) -> Result<Vec<f64>, ChainError> {
        let rates: Vec<f64> = (0..self.ctx.pixels())
            .into_par_iter()
            .map(|pixel| self.rate_at(pixel, decay, beam))
            .collect::<Result<_, _>>()?;
        if let Some((pixel, rate)) = rates
            .iter()
            .enumerate()
            .find(|(_, rate)| !rate.is_finite() || **rate < 0.0)
        {
            return Err(ChainError::numeric("invalid-rate", "rate must be finite and >= 0")
                .with_context("pixel", pixel)
                .with_context("rate", rate)
                .with_context("decay_type", decay));
        }
        Ok(rates)
    }
}

/// The five distinct rate vectors a chain can reference.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    alpha_on: Vec<f64>,
    alpha_off: Vec<f64>,
    escape_on: Vec<f64>,
    escape_off: Vec<f64>,
    fission: Vec<f64>,
}

impl RateTable {
    /// Computes every rate vector once.
    pub fn build(estimator: &RateEstimator<'_>) -> Result<Self, ChainError> {
        let table = Self {
            alpha_on: estimator.rate(DecayType::Alpha, BeamState::On)?,
            alpha_off: estimator.rate(DecayType::Alpha, BeamState::Off)?,
            escape_on: estimator.rate(DecayType::Escape, BeamState::On)?,
            escape_off: estimator.rate(DecayType::Escape, BeamState::Off)?,
            fission: estimator.rate(DecayType::Fission, BeamState::Off)?,
        };
        debug!(pixels = table.pixels(), "rate table built");
        Ok(table)
    }

    /// Rate vector for a link's decay type and beam state.
    pub fn get(&self, decay: DecayType, beam: BeamState) -> &[f64] {
        match (decay, beam) {
            (DecayType::Alpha, BeamState::On) => &self.alpha_on,
            (DecayType::Alpha, BeamState::Off) => &self.alpha_off,
            (DecayType::Escape, BeamState::On) => &self.escape_on,
            (DecayType::Escape, BeamState::Off) => &self.escape_off,
            (DecayType::Fission, _) => &self.fission,
        }
    }

    /// Number of pixels covered.
    pub fn pixels(&self) -> usize {
        self.fission.len()
    }
}
