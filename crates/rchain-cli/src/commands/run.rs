//! `rchain run`: evaluates configured or file-supplied chains.

use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use rchain_core::ChainSource;
use rchain_engine::aggregate::render_text;
use rchain_io::ChainFile;

use super::prepare;
use crate::export::write_run_outputs;

/// Arguments of `rchain run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// YAML run configuration.
    #[arg(long)]
    pub config: PathBuf,
    /// Chain description file overriding the configured chains.
    #[arg(long)]
    pub chains: Option<PathBuf>,
    /// Directory receiving `report.json` and `dump_input.txt`.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Keep per-pixel expectations in the report.
    #[arg(long)]
    pub per_pixel: bool,
    /// Worker threads, overriding the configuration.
    #[arg(long)]
    pub threads: Option<usize>,
}

/// Evaluates the chains, prints the text report and writes the outputs.
pub fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let prepared = prepare(&args.config, args.threads, args.per_pixel)?;
    let chains = match &args.chains {
        Some(path) => ChainFile::read(path)?.chains(),
        None => prepared.config.chain_source()?,
    };
    if chains.is_empty() {
        return Err("no chains to evaluate; pass --chains or list chains in the config".into());
    }
    let report = prepared.engine.report(&chains)?;
    print!("{}", render_text(&report));
    if let Some(out) = &args.out {
        write_run_outputs(out, &report, "dump_input.txt")?;
    }
    Ok(())
}
