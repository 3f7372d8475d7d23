//! Implant counts: the trial base of every random chain.

use rayon::prelude::*;
use rchain_core::{ChainError, RunContext};
use rchain_spectra::{checked_sum, SpectrumStore};
use serde::{Deserialize, Serialize};

/// Implants per pixel and whether they came from the raw beam-on spectrum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplantCounts {
    counts: Vec<u64>,
    pure_beam: bool,
}

impl ImplantCounts {
    /// Wraps precomputed counts.
    pub fn new(counts: Vec<u64>, pure_beam: bool) -> Self {
        Self { counts, pure_beam }
    }

    /// Counts in pixel order.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// False when the reconstructed beam-on spectrum stood in for the raw one.
    pub fn pure_beam(&self) -> bool {
        self.pure_beam
    }

    /// Number of pixels covered.
    pub fn pixels(&self) -> usize {
        self.counts.len()
    }

    /// Sum over all pixels, `None` when it does not fit in `u64`.
    pub fn total(&self) -> Option<u64> {
        checked_sum(&self.counts)
    }
}

/// Sums the implant window of the beam-on spectrum per pixel.
#[derive(Debug, Clone, Copy)]
pub struct ImplantCounter<'a> {
    store: &'a SpectrumStore,
    ctx: &'a RunContext,
}

impl<'a> ImplantCounter<'a> {
    /// Binds the counter to a store and its run context.
    pub fn new(store: &'a SpectrumStore, ctx: &'a RunContext) -> Self {
        Self { store, ctx }
    }

    /// Implants per pixel from the raw beam-on spectrum, or the
    /// reconstructed one when raw data is absent.
    pub fn implants(&self) -> Result<ImplantCounts, ChainError> {
        let source = self.store.implant_source();
        let window = self.ctx.windows().implant;
        let counts = (0..self.ctx.pixels())
            .into_par_iter()
            .map(|pixel| source.window_sum(pixel, window))
            .collect::<Result<_, _>>()?;
        Ok(ImplantCounts::new(counts, self.store.pure_beam()))
    }
}
