//! `rchain chains`: writes a preset as an editable chain file.

use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use rchain_core::DecayChain;
use rchain_io::{write_chain_file, Preset};

/// Arguments of `rchain chains`.
#[derive(Args, Debug)]
pub struct ChainsArgs {
    /// Chain set to write (`article` or `test`).
    #[arg(long)]
    pub preset: Preset,
    /// Destination chain description file.
    #[arg(long)]
    pub out: PathBuf,
}

/// Writes the chosen preset to `--out`.
pub fn run(args: &ChainsArgs) -> Result<(), Box<dyn Error>> {
    let chains = args
        .preset
        .chains()
        .iter()
        .map(DecayChain::from_spec)
        .collect::<Result<Vec<_>, _>>()?;
    write_chain_file(&args.out, &chains)?;
    println!("wrote {} chains to {}", chains.len(), args.out.display());
    Ok(())
}
