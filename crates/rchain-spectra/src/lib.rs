#![deny(missing_docs)]
//! Per-pixel spectra, fission tags and the providers that supply them.

pub mod fission;
pub mod provider;
pub mod store;
pub mod synthetic;

pub use fission::{count_pixel_list, FissionTags};
pub use provider::{load_store, SpectrumProvider};
pub use store::{checked_sum, Condition, PixelSpectra, SpectrumStore};
pub use synthetic::{LegacyFill, SyntheticSpectra, UniformRates, LEGACY_LIVE_TIME};
