//! Files written by the CLI commands.

use std::error::Error;
use std::fs;
use std::path::Path;

use rchain_core::{ChainError, DecayChain};
use rchain_engine::{to_canonical_json, ChainOutcome, JsonLayout, PixelBreakdown, RunReport};
use tracing::info;

/// Chains of a report that were evaluated, with their labels.
pub fn evaluated_chains(report: &RunReport) -> Result<Vec<DecayChain>, ChainError> {
    report
        .chains
        .iter()
        .filter_map(|chain| match &chain.outcome {
            ChainOutcome::Evaluated { links, .. } => Some(
                DecayChain::new(links.clone()).map(|built| match &chain.label {
                    Some(label) => built.with_label(label.clone()),
                    None => built,
                }),
            ),
            ChainOutcome::Rejected { .. } => None,
        })
        .collect()
}

/// Writes `report.json` and the chain dump into `out`.
pub fn write_run_outputs(
    out: &Path,
    report: &RunReport,
    dump_name: &str,
) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(out)?;
    fs::write(out.join("report.json"), to_canonical_json(report, JsonLayout::Pretty)?)?;
    rchain_io::write_chain_file(out.join(dump_name), &evaluated_chains(report)?)?;
    info!(out = %out.display(), dump = dump_name, "run outputs written");
    Ok(())
}

/// Writes the per-pixel breakdown of one chain as CSV.
pub fn write_breakdown_csv(path: &Path, rows: &[PixelBreakdown]) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let links = rows.first().map(|row| row.rates.len()).unwrap_or(0);
    let mut writer = csv::Writer::from_path(path)?;
    let mut header = vec!["pixel".to_string(), "implants".to_string()];
    header.extend((0..links).map(|link| format!("rate_{link}")));
    header.extend((0..links).map(|link| format!("survival_{link}")));
    header.push("expectation".to_string());
    writer.write_record(&header)?;
    for row in rows {
        let mut record = vec![row.pixel.to_string(), row.implants.to_string()];
        record.extend(row.rates.iter().map(f64::to_string));
        record.extend(row.survival.iter().map(f64::to_string));
        record.push(row.expectation.to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    info!(path = %path.display(), pixels = rows.len(), "per-pixel table written");
    Ok(())
}
