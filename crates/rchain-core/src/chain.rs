//! Decay links and chains, plus the loosely typed descriptors they are parsed from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ChainError;

/// Signal type of a single decay link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecayType {
    /// Full-energy alpha in the implantation detector.
    Alpha,
    /// Alpha escaping the implantation detector, reconstructed from a box hit.
    Escape,
    /// Spontaneous fission.
    Fission,
}

impl DecayType {
    /// Single-letter code used by the chain-description text format.
    pub fn code(&self) -> char {
        match self {
            DecayType::Alpha => 'a',
            DecayType::Escape => 'e',
            DecayType::Fission => 'f',
        }
    }
}

impl FromStr for DecayType {
    type Err = ChainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "a" | "alpha" => Ok(DecayType::Alpha),
            "e" | "escape" => Ok(DecayType::Escape),
            "f" | "fission" => Ok(DecayType::Fission),
            other => Err(ChainError::chain("unknown-decay-type", "unknown decay type")
                .with_context("decay_type", other)
                .with_hint("use a/alpha, e/escape or f/fission")),
        }
    }
}

impl fmt::Display for DecayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DecayType::Alpha => "alpha",
            DecayType::Escape => "escape",
            DecayType::Fission => "fission",
        };
        f.write_str(name)
    }
}

/// Beam state during which a decay link was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BeamState {
    /// Beam on target.
    On,
    /// Beam off (pause between macro pulses or shutdown).
    Off,
}

impl BeamState {
    /// Numeric flag used by the chain-description text format (1 = on).
    pub fn flag(&self) -> u8 {
        match self {
            BeamState::On => 1,
            BeamState::Off => 0,
        }
    }
}

impl FromStr for BeamState {
    type Err = ChainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "on" => Ok(BeamState::On),
            "0" | "off" => Ok(BeamState::Off),
            other => Err(ChainError::chain("unknown-beam-state", "unknown beam state")
                .with_context("beam", other)
                .with_hint("use 1/on or 0/off")),
        }
    }
}

impl fmt::Display for BeamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeamState::On => f.write_str("on"),
            BeamState::Off => f.write_str("off"),
        }
    }
}

/// One validated step of a candidate decay chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayLink {
    /// Signal type of the link.
    pub decay_type: DecayType,
    /// Beam state; ignored for fissions.
    pub beam: BeamState,
    /// Accepted time window in seconds. Zero is allowed and zeroes the chain.
    pub time_span: f64,
}

impl DecayLink {
    /// Validates and creates a link.
    pub fn new(decay_type: DecayType, beam: BeamState, time_span: f64) -> Result<Self, ChainError> {
        if !time_span.is_finite() || time_span < 0.0 {
            return Err(
                ChainError::chain("invalid-time-span", "time span must be finite and >= 0")
                    .with_context("time_span", time_span),
            );
        }
        Ok(Self {
            decay_type,
            beam,
            time_span,
        })
    }

    /// Converts the link back into its descriptor form.
    pub fn to_spec(&self) -> LinkSpec {
        LinkSpec {
            decay_type: self.decay_type.to_string(),
            beam: Some(BeamToken::Flag(self.beam.flag())),
            time_span: self.time_span,
        }
    }
}

impl fmt::Display for DecayLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.decay_type.code(),
            self.beam.flag(),
            self.time_span
        )
    }
}

/// Non-empty ordered sequence of decay links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayChain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    links: Vec<DecayLink>,
}

impl DecayChain {
    /// Creates a chain, rejecting empty link lists.
    pub fn new(links: Vec<DecayLink>) -> Result<Self, ChainError> {
        if links.is_empty() {
            return Err(ChainError::chain(
                "empty-chain",
                "a decay chain needs at least one link",
            ));
        }
        Ok(Self { label: None, links })
    }

    /// Attaches a human readable label. Runs of whitespace collapse to a
    /// single space; a blank label clears it.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        let words: Vec<&str> = label.split_whitespace().collect();
        self.label = (!words.is_empty()).then(|| words.join(" "));
        self
    }

    /// Validates a loosely typed descriptor.
    pub fn from_spec(spec: &ChainSpec) -> Result<Self, ChainError> {
        let mut links = Vec::with_capacity(spec.links.len());
        for (position, link) in spec.links.iter().enumerate() {
            let parsed = link
                .to_link()
                .map_err(|err| err.with_context("link", position))?;
            links.push(parsed);
        }
        let chain = Self::new(links)?;
        Ok(match &spec.label {
            Some(label) => {
                if let Some(bad) = label.chars().find(|&c| c.is_control() && c != '\t') {
                    return Err(ChainError::chain(
                        "invalid-label",
                        "chain labels must be a single line of printable text",
                    )
                    .with_context("label", label.escape_debug())
                    .with_context("char", bad.escape_unicode()));
                }
                chain.with_label(label.as_str())
            }
            None => chain,
        })
    }

    /// Optional label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Links in evaluation order.
    pub fn links(&self) -> &[DecayLink] {
        &self.links
    }

    /// Number of links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Always false for a constructed chain; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Converts the chain back into its descriptor form.
    pub fn to_spec(&self) -> ChainSpec {
        ChainSpec {
            label: self.label.clone(),
            links: self.links.iter().map(DecayLink::to_spec).collect(),
        }
    }
}

/// Beam token as written by users: `1`/`0` or `on`/`off`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BeamToken {
    /// Numeric flag.
    Flag(u8),
    /// Textual state.
    Name(String),
}

impl BeamToken {
    fn parse(&self) -> Result<BeamState, ChainError> {
        match self {
            BeamToken::Flag(flag) => flag.to_string().parse(),
            BeamToken::Name(name) => name.parse(),
        }
    }
}

/// Decay link as supplied by a chain source, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSpec {
    /// Decay type token (`a`, `escape`, ...).
    pub decay_type: String,
    /// Beam token; may be omitted for fissions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beam: Option<BeamToken>,
    /// Accepted time window in seconds.
    pub time_span: f64,
}

impl LinkSpec {
    /// Validates the descriptor into a [`DecayLink`].
    pub fn to_link(&self) -> Result<DecayLink, ChainError> {
        let decay_type: DecayType = self.decay_type.parse()?;
        let beam = match (&self.beam, decay_type) {
            (Some(token), _) => token.parse()?,
            (None, DecayType::Fission) => BeamState::Off,
            (None, _) => {
                return Err(ChainError::chain(
                    "missing-beam-state",
                    "alpha and escape links need a beam state",
                )
                .with_context("decay_type", decay_type))
            }
        };
        DecayLink::new(decay_type, beam, self.time_span)
    }
}

/// Decay chain as supplied by a chain source, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChainSpec {
    /// Optional human readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Ordered link descriptors.
    pub links: Vec<LinkSpec>,
}
