//! Fission tags per pixel and the zero-pixel averaging rule.

use rchain_core::ChainError;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Per-pixel fission counts after smoothing.
///
/// A pixel whose raw count is exactly zero is assigned the detector-wide
/// average `total / pixels` instead, so no pixel is treated as fission-free.
/// Pixels with any non-zero count keep their raw value; there is no
/// threshold for "low" counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FissionTags {
    raw: Vec<u64>,
    effective: Vec<f64>,
    total: u64,
    substituted: usize,
}

impl FissionTags {
    /// Applies the zero-pixel averaging to raw per-pixel counts.
    pub fn from_raw_counts(raw: Vec<u64>) -> Self {
        let total = raw.iter().fold(0u64, |acc, &count| acc.saturating_add(count));
        let pixels = raw.len();
        let average = if pixels == 0 {
            0.0
        } else {
            total as f64 / pixels as f64
        };
        let mut substituted = 0;
        let effective = raw
            .iter()
            .map(|&count| {
                if count == 0 {
                    substituted += 1;
                    average
                } else {
                    count as f64
                }
            })
            .collect();
        if total == 0 {
            warn!(pixels, "no fissions tagged; every fission rate is zero");
        } else {
            info!(total, substituted, average, "fission tags smoothed");
        }
        Self {
            raw,
            effective,
            total,
            substituted,
        }
    }

    /// Counts a list of pixel indices, one entry per observed fission.
    pub fn from_pixel_list(indices: &[usize], pixels: usize) -> Result<Self, ChainError> {
        Ok(Self::from_raw_counts(count_pixel_list(indices, pixels)?))
    }

    /// Number of pixels covered.
    pub fn pixels(&self) -> usize {
        self.raw.len()
    }

    /// Raw counts as tagged.
    pub fn raw(&self) -> &[u64] {
        &self.raw
    }

    /// Counts after zero-pixel averaging.
    pub fn effective(&self) -> &[f64] {
        &self.effective
    }

    /// Total number of tagged fissions.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of pixels that received the average.
    pub fn substituted(&self) -> usize {
        self.substituted
    }
}

/// Raw per-pixel counts of a fission pixel list; indices must be `< pixels`.
pub fn count_pixel_list(indices: &[usize], pixels: usize) -> Result<Vec<u64>, ChainError> {
    let mut raw = vec![0u64; pixels];
    for (position, &pixel) in indices.iter().enumerate() {
        let Some(slot) = raw.get_mut(pixel) else {
            return Err(ChainError::input(
                "fission-pixel-out-of-range",
                "fission tag refers to a pixel outside the detector",
            )
            .with_context("pixel", pixel)
            .with_context("entry", position)
            .with_context("pixels", pixels));
        };
        *slot += 1;
    }
    Ok(raw)
}
