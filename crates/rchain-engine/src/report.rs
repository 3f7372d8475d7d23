//! Serializable run report.

use std::collections::BTreeMap;

use chrono::Utc;
use rchain_core::{ChainError, DecayLink, RunProvenance, SchemaVersion};
use serde::{Deserialize, Serialize};

use crate::canonical::{digest, DigestScope};

/// Result of one input chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ChainOutcome {
    /// Chain evaluated; `total` is the detector-wide expectation.
    Evaluated {
        /// Expected number of random chains over the whole detector.
        total: f64,
        /// Links as evaluated.
        links: Vec<DecayLink>,
        /// Per-pixel expectations when diagnostics were requested.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        per_pixel: Option<Vec<f64>>,
    },
    /// Chain descriptor was malformed; the rest of the run continued.
    Rejected {
        /// Why the chain was rejected.
        error: ChainError,
    },
}

impl ChainOutcome {
    /// Total for an evaluated chain.
    pub fn total(&self) -> Option<f64> {
        match self {
            ChainOutcome::Evaluated { total, .. } => Some(*total),
            ChainOutcome::Rejected { .. } => None,
        }
    }
}

/// Outcome of the chain at `index` in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainReport {
    /// Zero-based input position.
    pub index: usize,
    /// Optional label from the chain source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Evaluation result.
    pub outcome: ChainOutcome,
}

#[derive(Serialize)]
struct ReportPayload<'a> {
    pure_beam: bool,
    live_time: f64,
    pixels: usize,
    chains: &'a [ChainReport],
}

/// Complete result of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Report schema version.
    pub schema: SchemaVersion,
    /// Inputs, tool versions and timestamp.
    pub provenance: RunProvenance,
    /// False when implants fell back to the reconstructed beam-on spectrum.
    pub pure_beam: bool,
    /// Live time in seconds.
    pub live_time: f64,
    /// Pixel count.
    pub pixels: usize,
    /// One entry per input chain, in input order.
    pub chains: Vec<ChainReport>,
    /// SHA-256 of the numeric payload; provenance is excluded.
    pub report_hash: String,
}

impl RunReport {
    /// Assembles a report and stamps it with its payload hash.
    pub fn assemble(
        input_hash: String,
        data_source: String,
        pure_beam: bool,
        live_time: f64,
        pixels: usize,
        chains: Vec<ChainReport>,
    ) -> Result<Self, ChainError> {
        let mut tool_versions = BTreeMap::new();
        tool_versions.insert(
            "rchain-engine".to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        );
        let mut report = Self {
            schema: SchemaVersion::default(),
            provenance: RunProvenance {
                input_hash,
                data_source,
                created_at: Utc::now().to_rfc3339(),
                tool_versions,
            },
            pure_beam,
            live_time,
            pixels,
            chains,
            report_hash: String::new(),
        };
        report.report_hash = report.payload_hash()?;
        Ok(report)
    }

    /// Recomputes the hash over pure-beam flag, live time, pixels and chains.
    pub fn payload_hash(&self) -> Result<String, ChainError> {
        digest(
            DigestScope::Report,
            &ReportPayload {
                pure_beam: self.pure_beam,
                live_time: self.live_time,
                pixels: self.pixels,
                chains: &self.chains,
            },
        )
    }

    /// Totals of evaluated chains as `(index, total)`, in input order.
    pub fn totals(&self) -> Vec<(usize, f64)> {
        self.chains
            .iter()
            .filter_map(|chain| chain.outcome.total().map(|total| (chain.index, total)))
            .collect()
    }
}
