//! YAML run configuration.

use std::fs;
use std::path::{Path, PathBuf};

use rchain_core::{
    ChainError, ChainSource, ChainSpec, RunContext, SignalWindows, REFERENCE_BINS,
    REFERENCE_PIXELS,
};
use rchain_spectra::{LegacyFill, SpectrumProvider, SyntheticSpectra};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::chain_file::ChainFile;
use crate::tscan::{DataPaths, TscanProvider};

/// Where the chains of a run come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChainsConfig {
    /// Path to a chain description file.
    File(PathBuf),
    /// Chains written inline in the configuration.
    Inline(Vec<ChainSpec>),
}

impl Default for ChainsConfig {
    fn default() -> Self {
        ChainsConfig::Inline(Vec::new())
    }
}

/// Run configuration for the reference experiment or a custom detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Independent detector pixels.
    #[serde(default = "RunConfig::default_pixels")]
    pub pixels: usize,
    /// Bins per spectrum.
    #[serde(default = "RunConfig::default_bins")]
    pub bins: usize,
    /// Experiment live time in seconds.
    pub live_time: f64,
    /// Alpha, escape and implant windows.
    #[serde(default)]
    pub windows: SignalWindows,
    /// Worker threads for per-pixel work.
    #[serde(default = "RunConfig::default_threads")]
    pub threads: usize,
    /// Spectrum and fission-tag files.
    #[serde(default)]
    pub data: DataPaths,
    /// Synthetic fill used when no spectrum files are configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthetic: Option<LegacyFill>,
    /// Chains evaluated by `run`.
    #[serde(default)]
    pub chains: ChainsConfig,
    /// Directory containing the configuration on disk (ignored when serializing).
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl RunConfig {
    fn default_pixels() -> usize {
        REFERENCE_PIXELS
    }

    fn default_bins() -> usize {
        REFERENCE_BINS
    }

    fn default_threads() -> usize {
        1
    }

    /// Validated run context.
    pub fn context(&self) -> Result<RunContext, ChainError> {
        RunContext::new(self.pixels, self.bins, self.live_time, self.windows)
    }

    /// Resolves a path relative to the configuration file.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Whether any spectrum or fission file is configured.
    pub fn has_data_files(&self) -> bool {
        self.data != DataPaths::default()
    }

    /// Provider for the configured inputs: tscan files when any are listed,
    /// otherwise the synthetic fill.
    pub fn provider(&self, ctx: &RunContext) -> Result<Box<dyn SpectrumProvider>, ChainError> {
        if self.has_data_files() {
            return Ok(Box::new(TscanProvider::new(self.data.resolved(&self.base_dir))));
        }
        match &self.synthetic {
            Some(fill) => Ok(Box::new(SyntheticSpectra::legacy(ctx, fill)?)),
            None => Err(ChainError::config("missing-data", "no spectrum source configured")
                .with_hint("list files under `data` or add a `synthetic` fill")),
        }
    }

    /// Chains from the inline list or the referenced file.
    pub fn chain_source(&self) -> Result<Vec<Result<ChainSpec, ChainError>>, ChainError> {
        match &self.chains {
            ChainsConfig::Inline(chains) => Ok(chains.chains()),
            ChainsConfig::File(path) => Ok(ChainFile::read(self.resolve(path))?.chains()),
        }
    }
}

/// Loads and validates a run configuration.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RunConfig, ChainError> {
    let config_path = path.as_ref();
    let bytes = fs::read(config_path).map_err(|err| {
        ChainError::config("config-read", err.to_string())
            .with_context("path", config_path.display())
    })?;
    let mut config: RunConfig = serde_yaml::from_slice(&bytes).map_err(|err| {
        ChainError::config("config-parse", err.to_string())
            .with_context("path", config_path.display())
    })?;
    config.base_dir = config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    config
        .context()
        .map_err(|err| err.with_context("path", config_path.display()))?;
    info!(
        path = %config_path.display(),
        pixels = config.pixels,
        bins = config.bins,
        live_time = config.live_time,
        "run configuration loaded"
    );
    Ok(config)
}
