//! One module per `rchain` subcommand plus the shared setup.

pub mod article;
pub mod chains;
pub mod pixels;
pub mod run;
pub mod sanity;

use std::error::Error;
use std::path::Path;

use rchain_engine::{Engine, EngineOpts};
use rchain_io::{load_config, RunConfig};
use rchain_spectra::load_store;

/// Configuration and engine prepared from a config file.
pub struct Prepared {
    /// Parsed configuration, paths resolved against its directory.
    pub config: RunConfig,
    /// Engine holding the store, rates and implants.
    pub engine: Engine,
}

/// Loads the configuration and spectra and derives rates and implants.
pub fn prepare(
    config_path: &Path,
    threads: Option<usize>,
    per_pixel: bool,
) -> Result<Prepared, Box<dyn Error>> {
    let config = load_config(config_path)?;
    let ctx = config.context()?;
    let provider = config.provider(&ctx)?;
    let store = load_store(provider.as_ref(), &ctx)?;
    let opts = EngineOpts {
        threads: threads.unwrap_or(config.threads),
        per_pixel,
        data_source: provider.describe(),
    };
    let engine = Engine::new(ctx, store, opts)?;
    Ok(Prepared { config, engine })
}
