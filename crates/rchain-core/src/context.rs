//! Immutable run context: detector geometry, live time and energy windows.

use serde::{Deserialize, Serialize};

use crate::chain::DecayType;
use crate::errors::ChainError;

/// Half-open bin interval `[lower, upper)` selecting one signal type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyWindow {
    /// First bin included in the window.
    pub lower: usize,
    /// First bin past the window.
    pub upper: usize,
}

impl EnergyWindow {
    /// Creates a window from its bin bounds.
    pub const fn new(lower: usize, upper: usize) -> Self {
        Self { lower, upper }
    }

    /// Number of bins covered by the window.
    pub fn width(&self) -> usize {
        self.upper.saturating_sub(self.lower)
    }

    /// Returns true if `bin` falls inside the window.
    pub fn contains(&self, bin: usize) -> bool {
        bin >= self.lower && bin < self.upper
    }

    fn validate(&self, name: &str, bins: usize) -> Result<(), ChainError> {
        if self.lower > self.upper || self.upper > bins {
            return Err(ChainError::config(
                "window-out-of-range",
                format!("{name} window must satisfy lower <= upper <= bins"),
            )
            .with_context("window", name)
            .with_context("lower", self.lower)
            .with_context("upper", self.upper)
            .with_context("bins", bins));
        }
        Ok(())
    }
}

/// The three energy windows configured once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalWindows {
    /// Accepted alpha-decay energies.
    #[serde(default = "SignalWindows::default_alpha")]
    pub alpha: EnergyWindow,
    /// Energy deposits of alphas escaping the implantation detector.
    #[serde(default = "SignalWindows::default_escape")]
    pub escape: EnergyWindow,
    /// Implanted nuclei, beam on only.
    #[serde(default = "SignalWindows::default_implant")]
    pub implant: EnergyWindow,
}

impl SignalWindows {
    fn default_alpha() -> EnergyWindow {
        EnergyWindow::new(900, 1100)
    }

    fn default_escape() -> EnergyWindow {
        EnergyWindow::new(0, 400)
    }

    fn default_implant() -> EnergyWindow {
        EnergyWindow::new(1100, 1800)
    }

    /// Window used for a spectrum-derived decay type; fissions have none.
    pub fn for_decay(&self, decay: DecayType) -> Option<EnergyWindow> {
        match decay {
            DecayType::Alpha => Some(self.alpha),
            DecayType::Escape => Some(self.escape),
            DecayType::Fission => None,
        }
    }
}

impl Default for SignalWindows {
    fn default() -> Self {
        Self {
            alpha: Self::default_alpha(),
            escape: Self::default_escape(),
            implant: Self::default_implant(),
        }
    }
}

/// Reference pixel count of the Lund implantation detector.
pub const REFERENCE_PIXELS: usize = 1024;
/// Reference bin count (10 keV bins up to 40.96 MeV).
pub const REFERENCE_BINS: usize = 4096;
/// Largest `pixels * bins` accepted for one spectrum condition.
pub const MAX_CELLS: usize = 1 << 28;

/// Number of bin cells in one condition, `pixels * bins`.
///
/// Fails with `geometry-too-large` when the product overflows or exceeds
/// [`MAX_CELLS`].
pub fn cell_count(pixels: usize, bins: usize) -> Result<usize, ChainError> {
    match pixels.checked_mul(bins) {
        Some(cells) if cells <= MAX_CELLS => Ok(cells),
        _ => Err(ChainError::config(
            "geometry-too-large",
            "pixels * bins exceeds the supported spectrum size",
        )
        .with_context("pixels", pixels)
        .with_context("bins", bins)
        .with_context("max_cells", MAX_CELLS)),
    }
}

/// Immutable parameters shared by every stage of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunContext {
    pixels: usize,
    bins: usize,
    live_time: f64,
    windows: SignalWindows,
}

impl RunContext {
    /// Validates and creates a run context.
    pub fn new(
        pixels: usize,
        bins: usize,
        live_time: f64,
        windows: SignalWindows,
    ) -> Result<Self, ChainError> {
        if pixels == 0 {
            return Err(ChainError::config("zero-pixels", "pixel count must be positive"));
        }
        if bins == 0 {
            return Err(ChainError::config("zero-bins", "bin count must be positive"));
        }
        cell_count(pixels, bins)?;
        if !live_time.is_finite() || live_time <= 0.0 {
            return Err(ChainError::config(
                "invalid-live-time",
                "live time must be a finite positive number of seconds",
            )
            .with_context("live_time", live_time));
        }
        windows.alpha.validate("alpha", bins)?;
        windows.escape.validate("escape", bins)?;
        windows.implant.validate("implant", bins)?;
        Ok(Self {
            pixels,
            bins,
            live_time,
            windows,
        })
    }

    /// Reference geometry (1024 pixels, 4096 bins, default windows).
    pub fn reference(live_time: f64) -> Result<Self, ChainError> {
        Self::new(
            REFERENCE_PIXELS,
            REFERENCE_BINS,
            live_time,
            SignalWindows::default(),
        )
    }

    /// Number of independent detector pixels.
    pub fn pixels(&self) -> usize {
        self.pixels
    }

    /// Number of bins per spectrum.
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Experiment live time in seconds.
    pub fn live_time(&self) -> f64 {
        self.live_time
    }

    /// Configured energy windows.
    pub fn windows(&self) -> &SignalWindows {
        &self.windows
    }
}
