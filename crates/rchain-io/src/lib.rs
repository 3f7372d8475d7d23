#![deny(missing_docs)]
#![doc = "File formats and configuration for the random-chain estimator."]

pub mod chain_file;
pub mod config;
pub mod fission_list;
pub mod presets;
pub mod tscan;

pub use chain_file::{dump_chains, parse_chains, write_chain_file, ChainFile, DESCRIPTION_LINES};
pub use config::{load_config, ChainsConfig, RunConfig};
pub use fission_list::{parse_pixel_list, read_fission_counts};
pub use presets::{Preset, ARTICLE_LIVE_TIME};
pub use tscan::{dump_counts, parse_counts, DataPaths, TscanProvider};
