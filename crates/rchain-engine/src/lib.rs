#![deny(missing_docs)]
#![doc = "Random-coincidence expectation engine: rates, implants, Poisson link probabilities and chain totals."]

/// Summation and text rendering.
pub mod aggregate;
pub mod canonical;
/// Per-pixel chain evaluation.
pub mod evaluate;
/// Implant counting.
pub mod implants;
/// Poisson probability primitives.
pub mod poisson;
/// Background rate estimation.
pub mod rates;
/// Closed-form cross-check for uniform stores.
pub mod reference;
/// Run report types.
pub mod report;

use rchain_core::{ChainError, ChainSource, ChainSpec, DecayChain, RunContext};
use rchain_spectra::SpectrumStore;
use tracing::{debug, info, warn};

pub use evaluate::{ChainEvaluator, PixelBreakdown};
pub use canonical::{digest, to_canonical_json, DigestScope, JsonLayout};
pub use implants::{ImplantCounter, ImplantCounts};
pub use poisson::{poisson_pmf, survival_probability};
pub use rates::{RateEstimator, RateTable};
pub use report::{ChainOutcome, ChainReport, RunReport};

/// Options governing one evaluation run.
#[derive(Debug, Clone)]
pub struct EngineOpts {
    /// Worker threads for per-pixel work.
    pub threads: usize,
    /// Keep per-pixel expectation vectors in the report.
    pub per_pixel: bool,
    /// Label of the spectrum source recorded in provenance.
    pub data_source: String,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            threads: 1,
            per_pixel: false,
            data_source: "unspecified".to_string(),
        }
    }
}

/// Rates and implants derived once from a store, ready to evaluate chains.
#[derive(Debug)]
pub struct Engine {
    ctx: RunContext,
    store: SpectrumStore,
    rates: RateTable,
    implants: ImplantCounts,
    pool: rayon::ThreadPool,
    opts: EngineOpts,
}

impl Engine {
    /// Derives rates and implant counts for the store.
    pub fn new(ctx: RunContext, store: SpectrumStore, opts: EngineOpts) -> Result<Self, ChainError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.threads.max(1))
            .build()
            .map_err(|err| ChainError::config("thread-pool", err.to_string()))?;
        let (rates, implants) = pool.install(|| -> Result<_, ChainError> {
            let estimator = RateEstimator::new(&store, &ctx)?;
            let rates = RateTable::build(&estimator)?;
            let implants = ImplantCounter::new(&store, &ctx).implants()?;
            Ok((rates, implants))
        })?;
        if !implants.pure_beam() {
            warn!("implants counted from beam_on_reconstructed; report marked pure_beam=false");
        }
        info!(
            pixels = ctx.pixels(),
            implants = ?implants.total(),
            threads = opts.threads.max(1),
            "rates and implants derived"
        );
        Ok(Self {
            ctx,
            store,
            rates,
            implants,
            pool,
            opts,
        })
    }

    /// Run context the engine was built for.
    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// Underlying spectrum store.
    pub fn store(&self) -> &SpectrumStore {
        &self.store
    }

    /// Cached rate vectors.
    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Implant counts per pixel.
    pub fn implants(&self) -> &ImplantCounts {
        &self.implants
    }

    /// Evaluator bound to the cached rates and implants.
    pub fn evaluator(&self) -> Result<ChainEvaluator<'_>, ChainError> {
        ChainEvaluator::new(&self.rates, &self.implants)
    }

    /// Per-pixel expectations of one chain.
    pub fn evaluate(&self, chain: &DecayChain) -> Result<Vec<f64>, ChainError> {
        let evaluator = self.evaluator()?;
        self.pool.install(|| evaluator.evaluate(chain))
    }

    /// Per-pixel diagnostic table of one chain.
    pub fn breakdown(&self, chain: &DecayChain) -> Result<Vec<PixelBreakdown>, ChainError> {
        let evaluator = self.evaluator()?;
        self.pool.install(|| evaluator.breakdown(chain))
    }

    /// Evaluates every chain in input order.
    ///
    /// Malformed chains are recorded as rejected; numeric errors abort.
    pub fn compute<S: ChainSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<Vec<ChainReport>, ChainError> {
        let specs = source.chains();
        self.compute_specs(&specs)
    }

    /// Evaluates the chains and wraps the outcomes in a hashed report.
    pub fn report<S: ChainSource + ?Sized>(&self, source: &S) -> Result<RunReport, ChainError> {
        let specs = source.chains();
        let input_hash = digest(DigestScope::Inputs, &(&self.ctx, &specs))?;
        let chains = self.compute_specs(&specs)?;
        RunReport::assemble(
            input_hash,
            self.opts.data_source.clone(),
            self.implants.pure_beam(),
            self.ctx.live_time(),
            self.ctx.pixels(),
            chains,
        )
    }

    fn compute_specs(
        &self,
        specs: &[Result<ChainSpec, ChainError>],
    ) -> Result<Vec<ChainReport>, ChainError> {
        let mut reports = Vec::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            let label = spec.as_ref().ok().and_then(|spec| spec.label.clone());
            let chain = match spec.clone().and_then(|spec| DecayChain::from_spec(&spec)) {
                Ok(chain) => chain,
                Err(err) if err.is_chain_scoped() => {
                    warn!(chain = index, error = %err, "chain rejected");
                    reports.push(ChainReport {
                        index,
                        label,
                        outcome: ChainOutcome::Rejected {
                            error: err.with_context("chain", index),
                        },
                    });
                    continue;
                }
                Err(err) => return Err(err.with_context("chain", index)),
            };
            let per_pixel = self
                .evaluate(&chain)
                .map_err(|err| err.with_context("chain", index))?;
            let total = aggregate::total(&per_pixel);
            info!(chain = index, links = chain.len(), total, "chain evaluated");
            debug!(
                chain = index,
                max_pixel = per_pixel.iter().cloned().fold(0.0, f64::max),
                "per-pixel spread"
            );
            reports.push(ChainReport {
                index,
                label,
                outcome: ChainOutcome::Evaluated {
                    total,
                    links: chain.links().to_vec(),
                    per_pixel: self.opts.per_pixel.then_some(per_pixel),
                },
            });
        }
        Ok(reports)
    }
}
