use proptest::prelude::*;
use rchain_core::{
    BeamState, ChainSpec, DecayChain, DecayLink, DecayType, EnergyWindow, LinkSpec, RunContext,
    SignalWindows,
};
use rchain_engine::{ChainOutcome, Engine, EngineOpts};
use rchain_spectra::{load_store, SyntheticSpectra, UniformRates};

fn engine() -> Engine {
    let ctx = RunContext::new(
        4,
        10,
        10_000.0,
        SignalWindows {
            alpha: EnergyWindow::new(2, 4),
            escape: EnergyWindow::new(0, 2),
            implant: EnergyWindow::new(5, 8),
        },
    )
    .unwrap();
    let rates = UniformRates {
        alpha_on: 0.002,
        alpha_off: 0.001,
        escape_on: 0.0005,
        escape_off: 0.0,
        fission: 0.0003,
        implants: 5,
    };
    let synthetic = SyntheticSpectra::from_rates(&ctx, &rates).unwrap();
    let store = load_store(&synthetic, &ctx).unwrap();
    Engine::new(ctx, store, EngineOpts::default()).unwrap()
}

fn link(decay_type: &str, beam: u8, time_span: f64) -> LinkSpec {
    LinkSpec {
        decay_type: decay_type.to_string(),
        beam: Some(rchain_core::BeamToken::Flag(beam)),
        time_span,
    }
}

fn chain(links: Vec<LinkSpec>) -> ChainSpec {
    ChainSpec { label: None, links }
}

#[test]
fn zero_time_span_zeroes_every_pixel() {
    let engine = engine();
    let chain = DecayChain::new(vec![
        DecayLink::new(DecayType::Alpha, BeamState::On, 10.0).unwrap(),
        DecayLink::new(DecayType::Escape, BeamState::On, 0.0).unwrap(),
        DecayLink::new(DecayType::Fission, BeamState::Off, 100.0).unwrap(),
    ])
    .unwrap();
    let per_pixel = engine.evaluate(&chain).unwrap();
    assert!(per_pixel.iter().all(|&value| value == 0.0));
}

#[test]
fn zero_rate_link_zeroes_the_chain() {
    let engine = engine();
    let chain = DecayChain::new(vec![
        DecayLink::new(DecayType::Alpha, BeamState::On, 10.0).unwrap(),
        DecayLink::new(DecayType::Escape, BeamState::Off, 10.0).unwrap(),
    ])
    .unwrap();
    assert_eq!(engine.evaluator().unwrap().total(&chain).unwrap(), 0.0);
}

#[test]
fn chains_evaluated_together_match_individual_runs() {
    let engine = engine();
    let first = chain(vec![link("a", 1, 2.0), link("f", 0, 10.0)]);
    let second = chain(vec![link("e", 1, 2.0), link("a", 0, 10.0), link("f", 0, 50.0)]);

    let together = engine.compute(&vec![first.clone(), second.clone()]).unwrap();
    let alone_first = engine.compute(&vec![first]).unwrap();
    let alone_second = engine.compute(&vec![second]).unwrap();

    assert_eq!(together.len(), 2);
    assert_eq!(together[0].outcome, alone_first[0].outcome);
    assert_eq!(together[1].outcome, alone_second[0].outcome);
    assert_eq!(together[1].index, 1);
}

#[test]
fn malformed_chain_is_rejected_without_aborting() {
    let engine = engine();
    let chains = vec![
        chain(vec![link("a", 1, 2.0)]),
        chain(vec![link("x", 1, 2.0)]),
        chain(vec![link("a", 7, 2.0)]),
        chain(vec![link("a", 1, -2.0)]),
        chain(vec![]),
        chain(vec![link("e", 0, 4.0)]),
    ];
    let reports = engine.compute(&chains).unwrap();
    let codes: Vec<Option<String>> = reports
        .iter()
        .map(|report| match &report.outcome {
            ChainOutcome::Rejected { error } => Some(error.info().code.clone()),
            ChainOutcome::Evaluated { .. } => None,
        })
        .collect();
    assert_eq!(
        codes,
        vec![
            None,
            Some("unknown-decay-type".to_string()),
            Some("unknown-beam-state".to_string()),
            Some("invalid-time-span".to_string()),
            Some("empty-chain".to_string()),
            None,
        ]
    );
    assert!(reports[0].outcome.total().unwrap() > 0.0);
}

#[test]
fn link_order_does_not_change_the_total() {
    let engine = engine();
    let forward = chain(vec![link("a", 1, 2.0), link("e", 1, 3.0), link("f", 0, 5.0)]);
    let backward = chain(vec![link("f", 0, 5.0), link("e", 1, 3.0), link("a", 1, 2.0)]);
    let reports = engine.compute(&vec![forward, backward]).unwrap();
    let a = reports[0].outcome.total().unwrap();
    let b = reports[1].outcome.total().unwrap();
    assert!((a - b).abs() <= 1e-15 * a.abs());
}

proptest! {
    #[test]
    fn longer_windows_never_lower_the_expectation(
        base in 0.0f64..1_000.0,
        extra in 1e-3f64..1_000.0,
        position in 0usize..3,
    ) {
        let engine = engine();
        let mut spans = [base, base, base];
        let shorter = chain_with_spans(spans);
        spans[position] += extra;
        let longer = chain_with_spans(spans);
        let evaluator = engine.evaluator().unwrap();
        let low = evaluator.total(&shorter).unwrap();
        let high = evaluator.total(&longer).unwrap();
        prop_assert!(high >= low);
        if base > 1e-3 {
            prop_assert!(high > low);
        }
        prop_assert!(high <= 4.0 * 5.0);
    }
}

fn chain_with_spans(spans: [f64; 3]) -> DecayChain {
    DecayChain::new(vec![
        DecayLink::new(DecayType::Alpha, BeamState::On, spans[0]).unwrap(),
        DecayLink::new(DecayType::Alpha, BeamState::Off, spans[1]).unwrap(),
        DecayLink::new(DecayType::Fission, BeamState::Off, spans[2]).unwrap(),
    ])
    .unwrap()
}
