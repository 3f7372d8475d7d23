//! Lists of pixels with a tagged fission.

use std::path::Path;

use rchain_core::ChainError;
use rchain_spectra::count_pixel_list;
use tracing::{info, warn};

use crate::tscan::read_optional;

/// Parses whitespace-separated pixel indices, one per observed fission.
pub fn parse_pixel_list(text: &str) -> Result<Vec<usize>, ChainError> {
    text.split_whitespace()
        .enumerate()
        .map(|(entry, token)| {
            token.parse().map_err(|_| {
                ChainError::input("invalid-fission-pixel", "fission pixel must be an index")
                    .with_context("token", token)
                    .with_context("entry", entry)
            })
        })
        .collect()
}

/// Reads a pixel list and counts fissions per pixel. `None` when the file
/// does not exist.
pub fn read_fission_counts(path: &Path, pixels: usize) -> Result<Option<Vec<u64>>, ChainError> {
    let Some(text) = read_optional(path)? else {
        return Ok(None);
    };
    let with_path = |err: ChainError| err.with_context("path", path.display());
    let indices = parse_pixel_list(&text).map_err(with_path)?;
    if indices.is_empty() {
        warn!(path = %path.display(), "fission pixel list is empty");
    }
    let counts = count_pixel_list(&indices, pixels).map_err(with_path)?;
    info!(path = %path.display(), fissions = indices.len(), "fission pixel list read");
    Ok(Some(counts))
}
