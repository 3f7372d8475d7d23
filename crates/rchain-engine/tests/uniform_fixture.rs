use rchain_core::{BeamState, DecayChain, DecayLink, DecayType, EnergyWindow, RunContext, SignalWindows};
use rchain_engine::reference::{relative_difference, uniform_total};
use rchain_engine::{Engine, EngineOpts};
use rchain_spectra::{load_store, SyntheticSpectra, UniformRates};

fn context() -> RunContext {
    RunContext::new(
        4,
        10,
        10_000.0,
        SignalWindows {
            alpha: EnergyWindow::new(2, 4),
            escape: EnergyWindow::new(0, 2),
            implant: EnergyWindow::new(5, 8),
        },
    )
    .unwrap()
}

fn engine() -> Engine {
    let ctx = context();
    let rates = UniformRates {
        alpha_on: 0.002,
        alpha_off: 0.001,
        escape_on: 0.0,
        escape_off: 0.0,
        fission: 0.0003,
        implants: 5,
    };
    let synthetic = SyntheticSpectra::from_rates(&ctx, &rates).unwrap();
    let store = load_store(&synthetic, &ctx).unwrap();
    Engine::new(ctx, store, EngineOpts::default()).unwrap()
}

fn three_link_chain() -> DecayChain {
    DecayChain::new(vec![
        DecayLink::new(DecayType::Alpha, BeamState::On, 2.0).unwrap(),
        DecayLink::new(DecayType::Alpha, BeamState::Off, 3.0).unwrap(),
        DecayLink::new(DecayType::Fission, BeamState::Off, 5.0).unwrap(),
    ])
    .unwrap()
}

fn close(a: f64, b: f64) -> bool {
    relative_difference(a, b) < 1e-12
}

#[test]
fn every_pixel_matches_the_closed_form() {
    let engine = engine();
    let expected = 5.0
        * (1.0 - (-0.002f64 * 2.0).exp())
        * (1.0 - (-0.001f64 * 3.0).exp())
        * (1.0 - (-0.0003f64 * 5.0).exp());
    let per_pixel = engine.evaluate(&three_link_chain()).unwrap();
    assert_eq!(per_pixel.len(), 4);
    for value in &per_pixel {
        assert!(close(*value, expected), "{value} vs {expected}");
    }
    let total = engine.evaluator().unwrap().total(&three_link_chain()).unwrap();
    assert!(close(total, 4.0 * expected));
}

#[test]
fn reference_agrees_with_evaluator() {
    let engine = engine();
    let chain = three_link_chain();
    let reference = uniform_total(engine.store(), engine.context(), &chain).unwrap();
    let total = engine.evaluator().unwrap().total(&chain).unwrap();
    assert!(close(reference, total));
}

#[test]
fn implants_and_rates_come_from_the_fixture() {
    let engine = engine();
    assert_eq!(engine.implants().counts(), &[5, 5, 5, 5]);
    assert!(engine.implants().pure_beam());
    assert_eq!(
        engine.rates().get(DecayType::Alpha, BeamState::On),
        &[0.002, 0.002, 0.002, 0.002]
    );
    assert_eq!(
        engine.rates().get(DecayType::Fission, BeamState::On),
        &[0.0003; 4]
    );
}

#[test]
fn breakdown_lists_each_link() {
    let engine = engine();
    let rows = engine.breakdown(&three_link_chain()).unwrap();
    assert_eq!(rows.len(), 4);
    let row = &rows[2];
    assert_eq!(row.pixel, 2);
    assert_eq!(row.implants, 5);
    assert_eq!(row.rates, vec![0.002, 0.001, 0.0003]);
    assert_eq!(row.survival.len(), 3);
    let product: f64 = row.survival.iter().product::<f64>() * 5.0;
    assert!(close(product, row.expectation));
}

#[test]
fn reference_rejects_non_uniform_stores() {
    let ctx = context();
    let mut on = rchain_spectra::PixelSpectra::zeros(4, 10).unwrap();
    on.set(3, 2, 1).unwrap();
    let store = rchain_spectra::SpectrumStore::new(
        &ctx,
        None,
        on,
        rchain_spectra::PixelSpectra::zeros(4, 10).unwrap(),
        rchain_spectra::FissionTags::from_raw_counts(vec![1; 4]),
    )
    .unwrap();
    let err = uniform_total(&store, &ctx, &three_link_chain()).unwrap_err();
    assert_eq!(err.info().code, "non-uniform-store");
}
