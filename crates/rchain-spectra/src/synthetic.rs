//! Deterministic synthetic spectra in which every pixel is identical.

use rchain_core::{ChainError, EnergyWindow, RunContext};
use serde::{Deserialize, Serialize};

use crate::provider::SpectrumProvider;
use crate::store::{Condition, PixelSpectra};

/// Live time paired with [`LegacyFill::default`].
pub const LEGACY_LIVE_TIME: f64 = 1_000_000.0;

/// Constant per-bin contents of the historical test-run spectra.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyFill {
    /// Content of every escape-window bin, beam on.
    pub escape_on: u64,
    /// Content of every escape-window bin, beam off.
    pub escape_off: u64,
    /// Content of the bins between escape and alpha windows, beam on.
    pub gap_on: u64,
    /// Content of the bins between escape and alpha windows, beam off.
    pub gap_off: u64,
    /// Content of every alpha-window bin, beam on.
    pub alpha_on: u64,
    /// Content of every alpha-window bin, beam off.
    pub alpha_off: u64,
    /// Implants per pixel, placed in the first implant-window bin.
    pub implants: u64,
    /// Fission tags per pixel.
    pub fissions: u64,
}

impl Default for LegacyFill {
    fn default() -> Self {
        Self {
            escape_on: 4,
            escape_off: 3,
            gap_on: 3,
            gap_off: 2,
            alpha_on: 2,
            alpha_off: 1,
            implants: 100,
            fissions: 2,
        }
    }
}

/// Target per-pixel rates (counts per second) and implant count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UniformRates {
    /// Alpha rate, beam on.
    pub alpha_on: f64,
    /// Alpha rate, beam off.
    pub alpha_off: f64,
    /// Escape rate, beam on.
    pub escape_on: f64,
    /// Escape rate, beam off.
    pub escape_off: f64,
    /// Fission rate.
    pub fission: f64,
    /// Implants per pixel.
    pub implants: u64,
}

/// Synthetic provider; every pixel carries the same template spectra.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticSpectra {
    label: String,
    pixels: usize,
    raw_on: Option<Vec<u64>>,
    on: Vec<u64>,
    off: Vec<u64>,
    fissions: u64,
}

impl SyntheticSpectra {
    /// Historical test-run layout: constant contents across the escape,
    /// gap and alpha regions, implants in one bin, constant fission tags.
    pub fn legacy(ctx: &RunContext, fill: &LegacyFill) -> Result<Self, ChainError> {
        let windows = ctx.windows();
        if windows.escape.upper > windows.alpha.lower || windows.implant.lower < windows.alpha.upper
        {
            return Err(ChainError::config(
                "synthetic-layout",
                "legacy fill needs escape < alpha < implant windows in bin order",
            ));
        }
        let mut on = vec![0u64; ctx.bins()];
        let mut off = vec![0u64; ctx.bins()];
        for bin in windows.escape.lower..windows.alpha.upper {
            let (value_on, value_off) = if bin < windows.escape.upper {
                (fill.escape_on, fill.escape_off)
            } else if bin < windows.alpha.lower {
                (fill.gap_on, fill.gap_off)
            } else {
                (fill.alpha_on, fill.alpha_off)
            };
            on[bin] = value_on;
            off[bin] = value_off;
        }
        place(&mut on, windows.implant, fill.implants, "implant")?;
        Ok(Self {
            label: "synthetic-legacy".to_string(),
            pixels: ctx.pixels(),
            raw_on: Some(on.clone()),
            on,
            off,
            fissions: fill.fissions,
        })
    }

    /// Spectra reproducing the given rates exactly: each window holds
    /// `rate * live_time` counts in its first bin. The product must be a
    /// non-negative integer and the windows must not overlap.
    pub fn from_rates(ctx: &RunContext, rates: &UniformRates) -> Result<Self, ChainError> {
        let windows = ctx.windows();
        let spans = [
            ("alpha", windows.alpha),
            ("escape", windows.escape),
            ("implant", windows.implant),
        ];
        for (i, (name_a, a)) in spans.iter().enumerate() {
            for (name_b, b) in spans.iter().skip(i + 1) {
                if a.lower < b.upper && b.lower < a.upper {
                    return Err(ChainError::config(
                        "synthetic-overlap",
                        "synthetic windows must be disjoint",
                    )
                    .with_context("first", name_a)
                    .with_context("second", name_b));
                }
            }
        }
        let live_time = ctx.live_time();
        let mut on = vec![0u64; ctx.bins()];
        let mut off = vec![0u64; ctx.bins()];
        let fills = [
            ("alpha", windows.alpha, rates.alpha_on, rates.alpha_off),
            ("escape", windows.escape, rates.escape_on, rates.escape_off),
        ];
        for (name, window, rate_on, rate_off) in fills {
            place(&mut on, window, counts_for(rate_on, live_time, name)?, name)?;
            place(&mut off, window, counts_for(rate_off, live_time, name)?, name)?;
        }
        place(&mut on, windows.implant, rates.implants, "implant")?;
        Ok(Self {
            label: "synthetic-rates".to_string(),
            pixels: ctx.pixels(),
            raw_on: Some(on.clone()),
            on,
            off,
            fissions: counts_for(rates.fission, live_time, "fission")?,
        })
    }

    /// Drops the raw beam-on spectrum, forcing the reconstructed fallback.
    pub fn without_raw(mut self) -> Self {
        self.raw_on = None;
        self
    }

    /// Template spectrum shared by every pixel.
    pub fn template(&self, condition: Condition) -> Option<&[u64]> {
        match condition {
            Condition::BeamOnRaw => self.raw_on.as_deref(),
            Condition::BeamOnReconstructed => Some(&self.on),
            Condition::BeamOffReconstructed => Some(&self.off),
        }
    }

    /// Fission tags per pixel.
    pub fn fissions_per_pixel(&self) -> u64 {
        self.fissions
    }
}

impl SpectrumProvider for SyntheticSpectra {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn condition(
        &self,
        condition: Condition,
        ctx: &RunContext,
    ) -> Result<Option<PixelSpectra>, ChainError> {
        check_geometry(self, ctx)?;
        self.template(condition)
            .map(|template| PixelSpectra::uniform(self.pixels, template))
            .transpose()
    }

    fn fission_counts(&self, ctx: &RunContext) -> Result<Option<Vec<u64>>, ChainError> {
        check_geometry(self, ctx)?;
        Ok(Some(vec![self.fissions; self.pixels]))
    }
}

fn check_geometry(spectra: &SyntheticSpectra, ctx: &RunContext) -> Result<(), ChainError> {
    if spectra.pixels != ctx.pixels() || spectra.on.len() != ctx.bins() {
        return Err(ChainError::config(
            "synthetic-geometry",
            "synthetic spectra were generated for another run context",
        ));
    }
    Ok(())
}

fn counts_for(rate: f64, live_time: f64, name: &str) -> Result<u64, ChainError> {
    let counts = rate * live_time;
    let rounded = counts.round();
    if !counts.is_finite() || counts < 0.0 || (counts - rounded).abs() > 1e-9 * rounded.max(1.0) {
        return Err(ChainError::config(
            "synthetic-rate",
            "rate * live_time must be a non-negative integer count",
        )
        .with_context("rate", name)
        .with_context("counts", counts));
    }
    Ok(rounded as u64)
}

fn place(
    template: &mut [u64],
    window: EnergyWindow,
    counts: u64,
    name: &str,
) -> Result<(), ChainError> {
    if counts == 0 {
        return Ok(());
    }
    if window.width() == 0 {
        return Err(ChainError::config(
            "synthetic-empty-window",
            "cannot place counts in an empty window",
        )
        .with_context("window", name));
    }
    template[window.lower] += counts;
    Ok(())
}
