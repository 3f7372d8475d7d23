use criterion::{criterion_group, criterion_main, Criterion};
use rchain_core::{BeamState, DecayChain, DecayLink, DecayType, RunContext};
use rchain_engine::{Engine, EngineOpts};
use rchain_spectra::{load_store, LegacyFill, SyntheticSpectra, LEGACY_LIVE_TIME};

fn make_engine(threads: usize) -> Engine {
    let ctx = RunContext::reference(LEGACY_LIVE_TIME).expect("context");
    let synthetic = SyntheticSpectra::legacy(&ctx, &LegacyFill::default()).expect("fixture");
    let store = load_store(&synthetic, &ctx).expect("store");
    let opts = EngineOpts {
        threads,
        ..EngineOpts::default()
    };
    Engine::new(ctx, store, opts).expect("engine")
}

fn make_chain() -> DecayChain {
    DecayChain::new(vec![
        DecayLink::new(DecayType::Alpha, BeamState::On, 1.0).expect("link"),
        DecayLink::new(DecayType::Escape, BeamState::Off, 2.0).expect("link"),
        DecayLink::new(DecayType::Alpha, BeamState::Off, 3.0).expect("link"),
        DecayLink::new(DecayType::Escape, BeamState::On, 4.0).expect("link"),
        DecayLink::new(DecayType::Fission, BeamState::On, 5.0).expect("link"),
    ])
    .expect("chain")
}

fn bench_evaluate(c: &mut Criterion) {
    let chain = make_chain();
    for threads in [1, 4] {
        let engine = make_engine(threads);
        c.bench_function(&format!("evaluate_reference_{threads}t"), |b| {
            b.iter(|| {
                let _ = engine.evaluate(&chain).expect("evaluate");
            });
        });
    }
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
