#![deny(missing_docs)]
#![doc = "Core types shared by the random decay-chain estimator: run context, decay chains, errors and provenance."]

pub mod chain;
pub mod context;
pub mod errors;
pub mod provenance;

pub use chain::{BeamState, BeamToken, ChainSpec, DecayChain, DecayLink, DecayType, LinkSpec};
pub use context::{
    cell_count, EnergyWindow, RunContext, SignalWindows, MAX_CELLS, REFERENCE_BINS,
    REFERENCE_PIXELS,
};
pub use errors::{ChainError, ErrorFamily, ErrorInfo};
pub use provenance::{RunProvenance, SchemaVersion};

/// Source of decay chains, each either a descriptor or an error raised while reading it.
pub trait ChainSource {
    /// Returns the chains in input order.
    fn chains(&self) -> Vec<Result<ChainSpec, ChainError>>;
}

impl ChainSource for [ChainSpec] {
    fn chains(&self) -> Vec<Result<ChainSpec, ChainError>> {
        self.iter().cloned().map(Ok).collect()
    }
}

impl ChainSource for Vec<ChainSpec> {
    fn chains(&self) -> Vec<Result<ChainSpec, ChainError>> {
        self.as_slice().chains()
    }
}

impl ChainSource for [Result<ChainSpec, ChainError>] {
    fn chains(&self) -> Vec<Result<ChainSpec, ChainError>> {
        self.to_vec()
    }
}

impl ChainSource for Vec<Result<ChainSpec, ChainError>> {
    fn chains(&self) -> Vec<Result<ChainSpec, ChainError>> {
        self.clone()
    }
}
