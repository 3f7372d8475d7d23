//! Summation of per-pixel expectations and text rendering of results.

use crate::report::{ChainOutcome, RunReport};

/// Sum of per-pixel expectations in pixel order.
///
/// The order is fixed so that totals do not depend on how pixel work was
/// scheduled.
pub fn total(per_pixel: &[f64]) -> f64 {
    per_pixel.iter().fold(0.0, |acc, value| acc + value)
}

/// Plain-text summary: one `For chain k: total` line per chain.
pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();
    if !report.pure_beam {
        out.push_str(
            "note: beam_on_raw spectrum missing, implants counted from beam_on_reconstructed\n",
        );
    }
    for chain in &report.chains {
        let name = match &chain.label {
            Some(label) => format!("{} ({label})", chain.index),
            None => chain.index.to_string(),
        };
        let line = match &chain.outcome {
            ChainOutcome::Evaluated { total, .. } => format!("For chain {name}: {total:e}\n"),
            ChainOutcome::Rejected { error } => format!("For chain {name}: rejected, {error}\n"),
        };
        out.push_str(&line);
    }
    out
}
