//! `rchain article`: the published chains on measured spectra.

use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use rchain_engine::aggregate::render_text;
use rchain_io::{Preset, ARTICLE_LIVE_TIME};
use tracing::warn;

use super::prepare;
use crate::export::write_run_outputs;

/// Arguments of `rchain article`.
#[derive(Args, Debug)]
pub struct ArticleArgs {
    /// YAML run configuration pointing at the measured spectra.
    #[arg(long)]
    pub config: PathBuf,
    /// Directory receiving `report.json` and `dump_article.txt`.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Evaluates the article preset and writes `dump_article.txt`.
pub fn run(args: &ArticleArgs) -> Result<(), Box<dyn Error>> {
    let prepared = prepare(&args.config, None, false)?;
    let live_time = prepared.engine.context().live_time();
    if live_time != ARTICLE_LIVE_TIME {
        warn!(
            live_time,
            published = ARTICLE_LIVE_TIME,
            "live time differs from the published measurement"
        );
    }
    let report = prepared.engine.report(&Preset::Article.chains())?;
    print!("{}", render_text(&report));
    if let Some(out) = &args.out {
        write_run_outputs(out, &report, Preset::Article.dump_name())?;
    }
    Ok(())
}
