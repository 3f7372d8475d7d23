//! `rchain pixels`: per-pixel CSV breakdown of one chain.

use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use rchain_core::{ChainSource, DecayChain};
use rchain_io::ChainFile;

use super::prepare;
use crate::export::write_breakdown_csv;

/// Arguments of `rchain pixels`.
#[derive(Args, Debug)]
pub struct PixelsArgs {
    /// YAML run configuration.
    #[arg(long)]
    pub config: PathBuf,
    /// Chain description file overriding the configured chains.
    #[arg(long)]
    pub chains: Option<PathBuf>,
    /// Zero-based index of the chain to tabulate.
    #[arg(long)]
    pub chain_index: usize,
    /// CSV destination.
    #[arg(long)]
    pub out: PathBuf,
}

/// Writes the breakdown of chain `--chain-index` as CSV.
pub fn run(args: &PixelsArgs) -> Result<(), Box<dyn Error>> {
    let prepared = prepare(&args.config, None, false)?;
    let chains = match &args.chains {
        Some(path) => ChainFile::read(path)?.chains(),
        None => prepared.config.chain_source()?,
    };
    let spec = chains
        .into_iter()
        .nth(args.chain_index)
        .ok_or_else(|| format!("no chain at index {}", args.chain_index))??;
    let chain = DecayChain::from_spec(&spec)?;
    let rows = prepared.engine.breakdown(&chain)?;
    write_breakdown_csv(&args.out, &rows)
}
