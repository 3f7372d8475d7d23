use std::error::Error;

use clap::{Parser, Subcommand};
use rchain_cli::commands::{
    article::{self, ArticleArgs},
    chains::{self, ChainsArgs},
    pixels::{self, PixelsArgs},
    run::{self, RunArgs},
    sanity::{self, SanityArgs},
};
use rchain_cli::observe::{init_logging, LogConfig, LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "rchain",
    about = "Expected number of random decay chains from background spectra"
)]
struct Cli {
    /// Minimum log level; `RUST_LOG` takes precedence when set.
    #[arg(long, global = true, value_enum, default_value = "info")]
    log_level: LogLevel,
    /// Log output format.
    #[arg(long, global = true, value_enum, default_value = "compact")]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate the configured or supplied chains.
    Run(RunArgs),
    /// Evaluate the seven published chains on the configured spectra.
    Article(ArticleArgs),
    /// Compare the evaluator with the closed form on synthetic spectra.
    Sanity(SanityArgs),
    /// Write the per-pixel breakdown of one chain as CSV.
    Pixels(PixelsArgs),
    /// Write a preset chain set as an editable description file.
    Chains(ChainsArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&LogConfig {
        level: cli.log_level,
        format: cli.log_format,
        filter: None,
    })?;
    match cli.command {
        Command::Run(args) => run::run(&args),
        Command::Article(args) => article::run(&args),
        Command::Sanity(args) => sanity::run(&args),
        Command::Pixels(args) => pixels::run(&args),
        Command::Chains(args) => chains::run(&args),
    }
}
