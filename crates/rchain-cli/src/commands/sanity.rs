//! `rchain sanity`: evaluator against the closed form on synthetic data.

use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use rchain_core::{DecayChain, RunContext};
use rchain_engine::aggregate::render_text;
use rchain_engine::reference::{relative_difference, uniform_total};
use rchain_engine::{Engine, EngineOpts, RunReport};
use rchain_io::Preset;
use rchain_spectra::{load_store, LegacyFill, SyntheticSpectra, LEGACY_LIVE_TIME};
use tracing::info;

use crate::export::{evaluated_chains, write_run_outputs};

/// Largest accepted relative difference between evaluator and closed form.
pub const TOLERANCE: f64 = 1e-12;

/// Arguments of `rchain sanity`.
#[derive(Args, Debug)]
pub struct SanityArgs {
    /// Directory receiving `report.json` and `dump_test.txt`.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Worker threads.
    #[arg(long, default_value_t = 1)]
    pub threads: usize,
}

/// Evaluator total, closed-form total and their relative difference.
#[derive(Debug, Clone, PartialEq)]
pub struct SanityCheck {
    /// Chain that was checked.
    pub chain: DecayChain,
    /// Evaluator total.
    pub total: f64,
    /// Closed-form total.
    pub reference: f64,
    /// `|total - reference| / max(|total|, |reference|)`.
    pub relative_difference: f64,
}

/// Runs the test preset on the legacy synthetic spectra.
pub fn check(threads: usize) -> Result<(RunReport, Vec<SanityCheck>), Box<dyn Error>> {
    let ctx = RunContext::reference(LEGACY_LIVE_TIME)?;
    let synthetic = SyntheticSpectra::legacy(&ctx, &LegacyFill::default())?;
    let store = load_store(&synthetic, &ctx)?;
    let opts = EngineOpts {
        threads,
        per_pixel: false,
        data_source: "synthetic-legacy".to_string(),
    };
    let engine = Engine::new(ctx, store, opts)?;
    let report = engine.report(&Preset::Test.chains())?;
    let mut checks = Vec::new();
    for (chain, (_, total)) in evaluated_chains(&report)?.into_iter().zip(report.totals()) {
        let reference = uniform_total(engine.store(), engine.context(), &chain)?;
        checks.push(SanityCheck {
            relative_difference: relative_difference(total, reference),
            chain,
            total,
            reference,
        });
    }
    Ok((report, checks))
}

/// Runs [`check`] and fails when any chain exceeds [`TOLERANCE`].
pub fn run(args: &SanityArgs) -> Result<(), Box<dyn Error>> {
    let (report, checks) = check(args.threads)?;
    print!("{}", render_text(&report));
    for check in &checks {
        println!(
            "closed form {:e}, relative difference {:e}",
            check.reference, check.relative_difference
        );
    }
    if let Some(out) = &args.out {
        write_run_outputs(out, &report, Preset::Test.dump_name())?;
    }
    if checks.is_empty() {
        return Err("test preset produced no evaluated chains".into());
    }
    if let Some(failed) = checks
        .iter()
        .find(|check| {
            check.relative_difference.is_nan() || check.relative_difference >= TOLERANCE
        })
    {
        return Err(format!(
            "sanity check failed: evaluator {:e} vs closed form {:e}",
            failed.total, failed.reference
        )
        .into());
    }
    info!(chains = checks.len(), "sanity check passed");
    Ok(())
}
