//! Read-only snapshot of every spectrum a run needs.

use rchain_core::{cell_count, BeamState, ChainError, EnergyWindow, RunContext};
use serde::{Deserialize, Serialize};

use crate::fission::FissionTags;

/// Acquisition condition of a binned spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    /// Beam-on energies without escape reconstruction (optional).
    BeamOnRaw,
    /// Beam-on energies with escape reconstruction.
    BeamOnReconstructed,
    /// Beam-off energies with escape reconstruction.
    BeamOffReconstructed,
}

impl Condition {
    /// All spectrum conditions, mandatory ones last.
    pub const ALL: [Condition; 3] = [
        Condition::BeamOnRaw,
        Condition::BeamOnReconstructed,
        Condition::BeamOffReconstructed,
    ];

    /// Stable name used in logs, errors and config keys.
    pub fn name(&self) -> &'static str {
        match self {
            Condition::BeamOnRaw => "beam_on_raw",
            Condition::BeamOnReconstructed => "beam_on_reconstructed",
            Condition::BeamOffReconstructed => "beam_off_reconstructed",
        }
    }

    /// Whether a run must abort when the condition is missing.
    pub fn is_mandatory(&self) -> bool {
        !matches!(self, Condition::BeamOnRaw)
    }

    /// Reconstructed condition for the given beam state.
    pub fn reconstructed(beam: BeamState) -> Self {
        match beam {
            BeamState::On => Condition::BeamOnReconstructed,
            BeamState::Off => Condition::BeamOffReconstructed,
        }
    }
}

/// Bin counts for every pixel of one condition, stored pixel-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelSpectra {
    pixels: usize,
    bins: usize,
    counts: Vec<u64>,
}

impl PixelSpectra {
    /// All-zero spectra.
    pub fn zeros(pixels: usize, bins: usize) -> Result<Self, ChainError> {
        let cells = cell_count(pixels, bins)?;
        Ok(Self {
            pixels,
            bins,
            counts: vec![0; cells],
        })
    }

    /// Wraps a flat pixel-major buffer of exactly `pixels * bins` counts.
    pub fn from_flat(pixels: usize, bins: usize, counts: Vec<u64>) -> Result<Self, ChainError> {
        let cells = cell_count(pixels, bins)?;
        if counts.len() != cells {
            return Err(ChainError::input(
                "spectrum-size-mismatch",
                "flat spectrum length must equal pixels * bins",
            )
            .with_context("expected", cells)
            .with_context("found", counts.len()));
        }
        Ok(Self {
            pixels,
            bins,
            counts,
        })
    }

    /// Builds spectra where every pixel carries the same bin contents.
    pub fn uniform(pixels: usize, template: &[u64]) -> Result<Self, ChainError> {
        let bins = template.len();
        let mut counts = Vec::with_capacity(cell_count(pixels, bins)?);
        for _ in 0..pixels {
            counts.extend_from_slice(template);
        }
        Ok(Self {
            pixels,
            bins,
            counts,
        })
    }

    /// Number of pixels.
    pub fn pixels(&self) -> usize {
        self.pixels
    }

    /// Number of bins per pixel.
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Bin contents of one pixel, `None` when out of range.
    pub fn pixel(&self, pixel: usize) -> Option<&[u64]> {
        if pixel >= self.pixels {
            return None;
        }
        let start = pixel * self.bins;
        Some(&self.counts[start..start + self.bins])
    }

    /// Overwrites one bin.
    pub fn set(&mut self, pixel: usize, bin: usize, count: u64) -> Result<(), ChainError> {
        let index = self.index(pixel, bin)?;
        self.counts[index] = count;
        Ok(())
    }

    /// Adds to one bin.
    pub fn add(&mut self, pixel: usize, bin: usize, count: u64) -> Result<(), ChainError> {
        let index = self.index(pixel, bin)?;
        self.counts[index] = self.counts[index].checked_add(count).ok_or_else(|| {
            count_overflow()
                .with_context("pixel", pixel)
                .with_context("bin", bin)
        })?;
        Ok(())
    }

    /// Integer sum of a pixel's counts over `[window.lower, window.upper)`.
    ///
    /// Windows are validated against the bin count when the run context is
    /// built, so the range is always in bounds for a store built from it.
    /// A sum that does not fit in `u64` is an `Input` error `count-overflow`.
    pub fn window_sum(&self, pixel: usize, window: EnergyWindow) -> Result<u64, ChainError> {
        let Some(bins) = self.pixel(pixel) else {
            return Ok(0);
        };
        let upper = window.upper.min(bins.len());
        let lower = window.lower.min(upper);
        checked_sum(&bins[lower..upper]).ok_or_else(|| {
            count_overflow()
                .with_context("pixel", pixel)
                .with_context("window", format!("[{}, {})", window.lower, window.upper))
        })
    }

    /// Per-bin sum over all pixels.
    pub fn totals(&self) -> Result<Vec<u64>, ChainError> {
        let mut totals = vec![0u64; self.bins];
        for (pixel, chunk) in self.counts.chunks(self.bins.max(1)).enumerate() {
            for (bin, (total, count)) in totals.iter_mut().zip(chunk).enumerate() {
                *total = total.checked_add(*count).ok_or_else(|| {
                    count_overflow()
                        .with_context("pixel", pixel)
                        .with_context("bin", bin)
                })?;
            }
        }
        Ok(totals)
    }

    fn index(&self, pixel: usize, bin: usize) -> Result<usize, ChainError> {
        if pixel >= self.pixels || bin >= self.bins {
            return Err(ChainError::input("bin-out-of-range", "pixel or bin out of range")
                .with_context("pixel", pixel)
                .with_context("bin", bin));
        }
        Ok(pixel * self.bins + bin)
    }

    fn check_shape(&self, condition: Condition, ctx: &RunContext) -> Result<(), ChainError> {
        if self.pixels != ctx.pixels() || self.bins != ctx.bins() {
            return Err(ChainError::input(
                "spectrum-shape-mismatch",
                "spectrum geometry differs from the run context",
            )
            .with_context("condition", condition.name())
            .with_context("pixels", self.pixels)
            .with_context("bins", self.bins)
            .with_context("expected_pixels", ctx.pixels())
            .with_context("expected_bins", ctx.bins()));
        }
        Ok(())
    }
}

/// Immutable per-run snapshot of spectra and fission tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumStore {
    pixels: usize,
    bins: usize,
    beam_on_raw: Option<PixelSpectra>,
    beam_on_reconstructed: PixelSpectra,
    beam_off_reconstructed: PixelSpectra,
    fission: FissionTags,
}

impl SpectrumStore {
    /// Assembles a store, checking every spectrum against the run geometry.
    pub fn new(
        ctx: &RunContext,
        beam_on_raw: Option<PixelSpectra>,
        beam_on_reconstructed: PixelSpectra,
        beam_off_reconstructed: PixelSpectra,
        fission: FissionTags,
    ) -> Result<Self, ChainError> {
        if let Some(raw) = &beam_on_raw {
            raw.check_shape(Condition::BeamOnRaw, ctx)?;
        }
        beam_on_reconstructed.check_shape(Condition::BeamOnReconstructed, ctx)?;
        beam_off_reconstructed.check_shape(Condition::BeamOffReconstructed, ctx)?;
        if fission.pixels() != ctx.pixels() {
            return Err(ChainError::input(
                "fission-shape-mismatch",
                "fission tags cover a different number of pixels",
            )
            .with_context("pixels", fission.pixels())
            .with_context("expected_pixels", ctx.pixels()));
        }
        Ok(Self {
            pixels: ctx.pixels(),
            bins: ctx.bins(),
            beam_on_raw,
            beam_on_reconstructed,
            beam_off_reconstructed,
            fission,
        })
    }

    /// Number of pixels.
    pub fn pixels(&self) -> usize {
        self.pixels
    }

    /// Number of bins per spectrum.
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Spectra for a condition, `None` only for a missing optional one.
    pub fn condition(&self, condition: Condition) -> Option<&PixelSpectra> {
        match condition {
            Condition::BeamOnRaw => self.beam_on_raw.as_ref(),
            Condition::BeamOnReconstructed => Some(&self.beam_on_reconstructed),
            Condition::BeamOffReconstructed => Some(&self.beam_off_reconstructed),
        }
    }

    /// Reconstructed spectra used for alpha/escape rates.
    pub fn reconstructed(&self, beam: BeamState) -> &PixelSpectra {
        match beam {
            BeamState::On => &self.beam_on_reconstructed,
            BeamState::Off => &self.beam_off_reconstructed,
        }
    }

    /// Spectra used for implant counting: raw beam-on when present.
    pub fn implant_source(&self) -> &PixelSpectra {
        self.beam_on_raw
            .as_ref()
            .unwrap_or(&self.beam_on_reconstructed)
    }

    /// False when the raw beam-on spectrum was absent and implants fall back
    /// to the reconstructed beam-on spectrum.
    pub fn pure_beam(&self) -> bool {
        self.beam_on_raw.is_some()
    }

    /// Smoothed fission tags.
    pub fn fission(&self) -> &FissionTags {
        &self.fission
    }

    /// Per-bin totals over all pixels for one condition, `None` when the
    /// condition is absent.
    pub fn totals(&self, condition: Condition) -> Result<Option<Vec<u64>>, ChainError> {
        self.condition(condition)
            .map(PixelSpectra::totals)
            .transpose()
    }
}

/// Sum of integer counts, `None` on `u64` overflow.
pub fn checked_sum<'a>(counts: impl IntoIterator<Item = &'a u64>) -> Option<u64> {
    counts
        .into_iter()
        .try_fold(0u64, |acc, &count| acc.checked_add(count))
}

fn count_overflow() -> ChainError {
    ChainError::input("count-overflow", "summed counts exceed the u64 range")
}
