//! Plain-text chain description files.
//!
//! ```text
//! <description line, ignored>
//! <column legend, ignored>
//! #3
//! a 1 2
//! a 0 10
//! f 0 50
//! ```
//!
//! `#N` opens a chain of `N` links; an optional label may follow the count.
//! Each link line holds `type beam time`.

use std::fs;
use std::path::{Path, PathBuf};

use rchain_core::{BeamToken, ChainError, ChainSource, ChainSpec, DecayChain, LinkSpec};
use tracing::{debug, warn};

/// Two header lines written at the top of every dump and skipped on read.
pub const DESCRIPTION_LINES: [&str; 2] = [
    "Lines starting with a '#' indicates the start of a new chain. OBS, the two first lines are not read in.",
    "Type (alpha=a, escape=e and fission=f) \tBeam ON (=1) or OFF (=0)\tTime span (s)",
];

struct PendingChain {
    line: usize,
    declared: Option<usize>,
    label: Option<String>,
    links: Vec<LinkSpec>,
    error: Option<ChainError>,
}

impl PendingChain {
    fn open(line: usize, header: &str) -> Self {
        let mut parts = header.split_whitespace();
        let count = parts.next().unwrap_or("");
        let label = parts.collect::<Vec<_>>().join(" ");
        let mut pending = Self {
            line,
            declared: None,
            label: (!label.is_empty()).then_some(label),
            links: Vec::new(),
            error: None,
        };
        match count.parse::<usize>() {
            Ok(declared) => pending.declared = Some(declared),
            Err(_) => {
                pending.error = Some(
                    ChainError::chain("invalid-chain-header", "chain header needs a link count")
                        .with_context("header", header),
                )
            }
        }
        pending
    }

    fn push(&mut self, line: usize, text: &str) {
        if self.error.is_some() {
            return;
        }
        match parse_link(text) {
            Ok(link) => self.links.push(link),
            Err(err) => self.error = Some(err.with_context("line", line)),
        }
    }

    fn finish(self) -> Result<ChainSpec, ChainError> {
        let header_line = self.line;
        let result = self.close();
        result.map_err(|err| err.with_context("header_line", header_line))
    }

    fn close(self) -> Result<ChainSpec, ChainError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let declared = self.declared.unwrap_or(0);
        if declared != self.links.len() {
            return Err(ChainError::chain(
                "link-count-mismatch",
                "number of link lines differs from the chain header",
            )
            .with_context("declared", declared)
            .with_context("found", self.links.len()));
        }
        Ok(ChainSpec {
            label: self.label,
            links: self.links,
        })
    }
}

fn parse_link(text: &str) -> Result<LinkSpec, ChainError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let [decay_type, beam, time] = tokens.as_slice() else {
        return Err(ChainError::chain(
            "malformed-link",
            "link lines need exactly three columns: type beam time",
        )
        .with_context("text", text));
    };
    let time_span: f64 = time.parse().map_err(|_| {
        ChainError::chain("malformed-link", "time span is not a number").with_context("text", text)
    })?;
    let spec = LinkSpec {
        decay_type: (*decay_type).to_string(),
        beam: Some(BeamToken::Name((*beam).to_string())),
        time_span,
    };
    spec.to_link()?;
    Ok(spec)
}

/// Parses chain descriptions. Individual chains may fail; a link line
/// appearing before any header fails the whole file.
pub fn parse_chains(text: &str) -> Result<Vec<Result<ChainSpec, ChainError>>, ChainError> {
    let mut chains = Vec::new();
    let mut current: Option<PendingChain> = None;
    for (index, raw) in text.lines().enumerate().skip(DESCRIPTION_LINES.len()) {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(header) = trimmed.strip_prefix('#') {
            if let Some(done) = current.take() {
                chains.push(done.finish());
            }
            current = Some(PendingChain::open(line, header.trim()));
            continue;
        }
        match current.as_mut() {
            Some(pending) => pending.push(line, trimmed),
            None => {
                return Err(ChainError::config(
                    "link-before-header",
                    "link line found before any '#N' chain header",
                )
                .with_context("line", line)
                .with_hint("start each chain with a '#N' line"))
            }
        }
    }
    if let Some(done) = current.take() {
        chains.push(done.finish());
    }
    for (index, chain) in chains.iter().enumerate() {
        if let Err(err) = chain {
            warn!(chain = index, error = %err, "chain description rejected");
        }
    }
    debug!(chains = chains.len(), "chain descriptions parsed");
    Ok(chains)
}

/// Renders chains in the format read by [`parse_chains`].
pub fn dump_chains(chains: &[DecayChain]) -> String {
    let mut out = String::new();
    for line in DESCRIPTION_LINES {
        out.push_str(line);
        out.push('\n');
    }
    for chain in chains {
        out.push('#');
        out.push_str(&chain.len().to_string());
        if let Some(label) = chain.label() {
            out.push(' ');
            out.push_str(label);
        }
        out.push('\n');
        for link in chain.links() {
            out.push_str(&link.to_string());
            out.push('\n');
        }
    }
    out
}

/// Chains loaded from a description file.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainFile {
    path: PathBuf,
    chains: Vec<Result<ChainSpec, ChainError>>,
}

impl ChainFile {
    /// Reads and parses a chain description file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ChainError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            ChainError::config("chain-file-read", err.to_string())
                .with_context("path", path.display())
        })?;
        let chains =
            parse_chains(&text).map_err(|err| err.with_context("path", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            chains,
        })
    }

    /// Location the chains were read from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChainSource for ChainFile {
    fn chains(&self) -> Vec<Result<ChainSpec, ChainError>> {
        self.chains.clone()
    }
}

/// Writes chains to `path` in the description format.
pub fn write_chain_file(path: impl AsRef<Path>, chains: &[DecayChain]) -> Result<(), ChainError> {
    let path = path.as_ref();
    fs::write(path, dump_chains(chains)).map_err(|err| {
        ChainError::config("chain-file-write", err.to_string()).with_context("path", path.display())
    })
}
