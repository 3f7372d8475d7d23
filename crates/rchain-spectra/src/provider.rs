//! Spectrum providers and store construction.

use rchain_core::{ChainError, RunContext};
use tracing::{info, warn};

use crate::fission::FissionTags;
use crate::store::{Condition, PixelSpectra, SpectrumStore};

/// Supplier of spectra and fission tags for one run.
///
/// Returning `Ok(None)` means the input is absent; whether that is fatal is
/// decided by [`load_store`], not by the provider.
pub trait SpectrumProvider {
    /// Short description used in logs and report provenance.
    fn describe(&self) -> String;

    /// Spectra of every pixel for one condition.
    fn condition(
        &self,
        condition: Condition,
        ctx: &RunContext,
    ) -> Result<Option<PixelSpectra>, ChainError>;

    /// Raw fission counts per pixel.
    fn fission_counts(&self, ctx: &RunContext) -> Result<Option<Vec<u64>>, ChainError>;
}

/// Builds the read-only store, aborting on missing mandatory input.
pub fn load_store(
    provider: &dyn SpectrumProvider,
    ctx: &RunContext,
) -> Result<SpectrumStore, ChainError> {
    let source = provider.describe();
    let raw = provider.condition(Condition::BeamOnRaw, ctx)?;
    if raw.is_none() {
        warn!(
            source = %source,
            "beam_on_raw spectrum absent; implants counted from beam_on_reconstructed"
        );
    }
    let on = require(provider, Condition::BeamOnReconstructed, ctx, &source)?;
    let off = require(provider, Condition::BeamOffReconstructed, ctx, &source)?;
    let counts = provider.fission_counts(ctx)?.ok_or_else(|| {
        ChainError::input("missing-fission-tags", "fission tags are mandatory")
            .with_context("source", &source)
    })?;
    if counts.len() != ctx.pixels() {
        return Err(ChainError::input(
            "fission-shape-mismatch",
            "fission tags cover a different number of pixels",
        )
        .with_context("source", &source)
        .with_context("pixels", counts.len())
        .with_context("expected_pixels", ctx.pixels()));
    }
    let store = SpectrumStore::new(ctx, raw, on, off, FissionTags::from_raw_counts(counts))?;
    info!(
        source = %source,
        pixels = store.pixels(),
        bins = store.bins(),
        pure_beam = store.pure_beam(),
        "spectrum store loaded"
    );
    Ok(store)
}

fn require(
    provider: &dyn SpectrumProvider,
    condition: Condition,
    ctx: &RunContext,
    source: &str,
) -> Result<PixelSpectra, ChainError> {
    provider.condition(condition, ctx)?.ok_or_else(|| {
        ChainError::input("missing-condition", "mandatory spectrum condition missing")
            .with_context("condition", condition.name())
            .with_context("source", source)
    })
}
