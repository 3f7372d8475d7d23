//! Per-pixel chain expectations.

use rayon::prelude::*;
use rchain_core::{ChainError, DecayChain, DecayLink};
use serde::{Deserialize, Serialize};

use crate::aggregate;
use crate::implants::ImplantCounts;
use crate::poisson::survival_probability;
use crate::rates::RateTable;

/// Evaluates decay chains against fixed rates and implant counts.
///
/// Each pixel starts from its implant count and is multiplied by the
/// survival probability of every link. Pixels never mix.
#[derive(Debug, Clone, Copy)]
pub struct ChainEvaluator<'a> {
    rates: &'a RateTable,
    implants: &'a ImplantCounts,
}

/// Per-pixel breakdown of one chain, used for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelBreakdown {
    /// Pixel index.
    pub pixel: usize,
    /// Implants in the pixel.
    pub implants: u64,
    /// Rate used by each link, in link order.
    pub rates: Vec<f64>,
    /// Survival probability of each link, in link order.
    pub survival: Vec<f64>,
    /// Expected number of random chains seeded in the pixel.
    pub expectation: f64,
}

impl<'a> ChainEvaluator<'a> {
    /// Pairs rates with implant counts covering the same pixels.
    pub fn new(rates: &'a RateTable, implants: &'a ImplantCounts) -> Result<Self, ChainError> {
        if rates.pixels() != implants.pixels() {
            return Err(ChainError::config(
                "pixel-count-mismatch",
                "rate table and implant counts cover different pixels",
            )
            .with_context("rates", rates.pixels())
            .with_context("implants", implants.pixels()));
        }
        Ok(Self { rates, implants })
    }

    /// Number of pixels evaluated per chain.
    pub fn pixels(&self) -> usize {
        self.implants.pixels()
    }

    /// Expectation for a single pixel.
    pub fn pixel_value(&self, pixel: usize, chain: &DecayChain) -> Result<f64, ChainError> {
        let mut value = self.implants.counts().get(pixel).copied().unwrap_or(0) as f64;
        for (position, link) in chain.links().iter().enumerate() {
            value *= self.link_survival(pixel, position, link)?;
        }
        Ok(value)
    }

    /// Expectation of every pixel, in pixel order.
    pub fn evaluate(&self, chain: &DecayChain) -> Result<Vec<f64>, ChainError> {
        (0..self.pixels())
            .into_par_iter()
            .map(|pixel| self.pixel_value(pixel, chain))
            .collect()
    }

    /// Detector-wide expectation, summed in pixel order.
    pub fn total(&self, chain: &DecayChain) -> Result<f64, ChainError> {
        Ok(aggregate::total(&self.evaluate(chain)?))
    }

    /// Rates, survival probabilities and expectation of every pixel.
    pub fn breakdown(&self, chain: &DecayChain) -> Result<Vec<PixelBreakdown>, ChainError> {
        (0..self.pixels())
            .into_par_iter()
            .map(|pixel| {
                let implants = self.implants.counts().get(pixel).copied().unwrap_or(0);
                let mut rates = Vec::with_capacity(chain.len());
                let mut survival = Vec::with_capacity(chain.len());
                let mut expectation = implants as f64;
                for (position, link) in chain.links().iter().enumerate() {
                    let probability = self.link_survival(pixel, position, link)?;
                    rates.push(self.rate(pixel, link));
                    survival.push(probability);
                    expectation *= probability;
                }
                Ok(PixelBreakdown {
                    pixel,
                    implants,
                    rates,
                    survival,
                    expectation,
                })
            })
            .collect()
    }

    fn rate(&self, pixel: usize, link: &DecayLink) -> f64 {
        self.rates
            .get(link.decay_type, link.beam)
            .get(pixel)
            .copied()
            .unwrap_or(0.0)
    }

    fn link_survival(
        &self,
        pixel: usize,
        position: usize,
        link: &DecayLink,
    ) -> Result<f64, ChainError> {
        survival_probability(self.rate(pixel, link) * link.time_span).map_err(|err| {
            err.with_context("pixel", pixel)
                .with_context("link", position)
        })
    }
}
