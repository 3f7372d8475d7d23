//! Spectra from tscan text dumps.
//!
//! Every dump is a whitespace-separated stream of bin counts, pixel-major,
//! `bins` values per pixel and `pixels * bins` values in total.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rchain_core::{cell_count, ChainError, RunContext};
use rchain_spectra::{Condition, PixelSpectra, SpectrumProvider};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::fission_list::read_fission_counts;

/// Input files of a file-backed run. Absent entries are reported as missing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DataPaths {
    /// Beam-on dump without escape reconstruction (`on.txt`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beam_on_raw: Option<PathBuf>,
    /// Beam-on dump with escape reconstruction (`recon.txt`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beam_on_reconstructed: Option<PathBuf>,
    /// Beam-off dump with escape reconstruction (`recoff.txt`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beam_off_reconstructed: Option<PathBuf>,
    /// List of pixels in which a fission was tagged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fission_pixels: Option<PathBuf>,
}

impl DataPaths {
    /// Path configured for a spectrum condition.
    pub fn condition(&self, condition: Condition) -> Option<&Path> {
        match condition {
            Condition::BeamOnRaw => self.beam_on_raw.as_deref(),
            Condition::BeamOnReconstructed => self.beam_on_reconstructed.as_deref(),
            Condition::BeamOffReconstructed => self.beam_off_reconstructed.as_deref(),
        }
    }

    /// Resolves relative entries against `base`.
    pub fn resolved(&self, base: &Path) -> Self {
        let join = |path: &Option<PathBuf>| {
            path.as_ref().map(|path| {
                if path.is_absolute() {
                    path.clone()
                } else {
                    base.join(path)
                }
            })
        };
        Self {
            beam_on_raw: join(&self.beam_on_raw),
            beam_on_reconstructed: join(&self.beam_on_reconstructed),
            beam_off_reconstructed: join(&self.beam_off_reconstructed),
            fission_pixels: join(&self.fission_pixels),
        }
    }
}

/// File-backed spectrum provider reading tscan dumps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TscanProvider {
    paths: DataPaths,
}

impl TscanProvider {
    /// Provider over already resolved paths.
    pub fn new(paths: DataPaths) -> Self {
        Self { paths }
    }

    /// Configured paths.
    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }
}

impl SpectrumProvider for TscanProvider {
    fn describe(&self) -> String {
        self.paths
            .beam_on_reconstructed
            .as_deref()
            .and_then(Path::parent)
            .map(|dir| format!("tscan:{}", dir.display()))
            .unwrap_or_else(|| "tscan".to_string())
    }

    fn condition(
        &self,
        condition: Condition,
        ctx: &RunContext,
    ) -> Result<Option<PixelSpectra>, ChainError> {
        let Some(path) = self.paths.condition(condition) else {
            return Ok(None);
        };
        let Some(text) = read_optional(path)? else {
            warn!(condition = condition.name(), path = %path.display(), "spectrum dump not found");
            return Ok(None);
        };
        let spectra = parse_counts(&text, ctx.pixels(), ctx.bins()).map_err(|err| {
            err.with_context("path", path.display())
                .with_context("condition", condition.name())
        })?;
        debug!(condition = condition.name(), path = %path.display(), "spectrum dump read");
        Ok(Some(spectra))
    }

    fn fission_counts(&self, ctx: &RunContext) -> Result<Option<Vec<u64>>, ChainError> {
        match &self.paths.fission_pixels {
            Some(path) => read_fission_counts(path, ctx.pixels()),
            None => Ok(None),
        }
    }
}

/// Reads a file, mapping "not found" to `None`.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>, ChainError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(ChainError::input("input-read", err.to_string())
            .with_context("path", path.display())),
    }
}

/// Parses one pixel-major dump of exactly `pixels * bins` counts.
pub fn parse_counts(text: &str, pixels: usize, bins: usize) -> Result<PixelSpectra, ChainError> {
    let expected = cell_count(pixels, bins)?;
    let mut counts = Vec::new();
    for (index, token) in text.split_whitespace().enumerate() {
        let count: u64 = token.parse().map_err(|_| {
            ChainError::input("invalid-count", "bin counts must be non-negative integers")
                .with_context("token", token)
                .with_context("index", index)
                .with_context("pixel", index / bins.max(1))
        })?;
        counts.push(count);
    }
    if counts.len() != expected {
        return Err(ChainError::input(
            "spectrum-size-mismatch",
            "dump does not hold pixels * bins counts",
        )
        .with_context("expected", expected)
        .with_context("found", counts.len()));
    }
    PixelSpectra::from_flat(pixels, bins, counts)
}

/// Renders spectra in the dump format, one pixel per line.
pub fn dump_counts(spectra: &PixelSpectra) -> String {
    let mut out = String::new();
    for pixel in 0..spectra.pixels() {
        if let Some(bins) = spectra.pixel(pixel) {
            let line: Vec<String> = bins.iter().map(u64::to_string).collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
    }
    out
}
