use proptest::prelude::*;
use rchain_core::{EnergyWindow, RunContext, SignalWindows};
use rchain_spectra::{
    load_store, Condition, LegacyFill, SyntheticSpectra, UniformRates, LEGACY_LIVE_TIME,
};

fn small_windows() -> SignalWindows {
    SignalWindows {
        alpha: EnergyWindow::new(2, 4),
        escape: EnergyWindow::new(0, 2),
        implant: EnergyWindow::new(5, 8),
    }
}

#[test]
fn legacy_fill_matches_historical_layout() {
    let ctx = RunContext::reference(LEGACY_LIVE_TIME).expect("ctx");
    let synthetic = SyntheticSpectra::legacy(&ctx, &LegacyFill::default()).expect("fill");
    let on = synthetic.template(Condition::BeamOnReconstructed).unwrap();
    let off = synthetic.template(Condition::BeamOffReconstructed).unwrap();
    assert_eq!(on[0], 4);
    assert_eq!(off[399], 3);
    assert_eq!(on[400], 3);
    assert_eq!(off[899], 2);
    assert_eq!(on[900], 2);
    assert_eq!(off[1099], 1);
    assert_eq!(on[1100], 100);
    assert_eq!(off[1100], 0);
    assert_eq!(synthetic.fissions_per_pixel(), 2);
}

#[test]
fn legacy_fill_rejects_out_of_order_windows() {
    let windows = SignalWindows {
        alpha: EnergyWindow::new(0, 2),
        escape: EnergyWindow::new(2, 4),
        implant: EnergyWindow::new(5, 8),
    };
    let ctx = RunContext::new(4, 10, 1.0, windows).expect("ctx");
    let err = SyntheticSpectra::legacy(&ctx, &LegacyFill::default()).unwrap_err();
    assert_eq!(err.info().code, "synthetic-layout");
}

#[test]
fn rates_must_produce_integer_counts() {
    let ctx = RunContext::new(4, 10, 1_000.0, small_windows()).expect("ctx");
    let rates = UniformRates {
        fission: 0.0003,
        ..UniformRates::default()
    };
    let err = SyntheticSpectra::from_rates(&ctx, &rates).unwrap_err();
    assert_eq!(err.info().code, "synthetic-rate");
}

#[test]
fn overlapping_windows_are_rejected_for_rate_fixtures() {
    let windows = SignalWindows {
        alpha: EnergyWindow::new(1, 4),
        escape: EnergyWindow::new(0, 2),
        implant: EnergyWindow::new(5, 8),
    };
    let ctx = RunContext::new(4, 10, 1.0, windows).expect("ctx");
    let err = SyntheticSpectra::from_rates(&ctx, &UniformRates::default()).unwrap_err();
    assert_eq!(err.info().code, "synthetic-overlap");
}

#[test]
fn without_raw_drops_only_the_raw_condition() {
    let ctx = RunContext::new(4, 10, 10_000.0, small_windows()).expect("ctx");
    let synthetic = SyntheticSpectra::from_rates(
        &ctx,
        &UniformRates {
            implants: 5,
            ..UniformRates::default()
        },
    )
    .expect("fixture")
    .without_raw();
    assert!(synthetic.template(Condition::BeamOnRaw).is_none());
    assert!(synthetic.template(Condition::BeamOnReconstructed).is_some());
}

proptest! {
    #[test]
    fn every_pixel_is_identical(
        pixels in 1usize..16,
        alpha_on in 0u64..50,
        alpha_off in 0u64..50,
        escape_on in 0u64..50,
        fission in 0u64..5,
        implants in 0u64..100,
    ) {
        let live_time = 1_000.0;
        let ctx = RunContext::new(pixels, 10, live_time, small_windows()).unwrap();
        let rates = UniformRates {
            alpha_on: alpha_on as f64 / live_time,
            alpha_off: alpha_off as f64 / live_time,
            escape_on: escape_on as f64 / live_time,
            escape_off: 0.0,
            fission: fission as f64 / live_time,
            implants,
        };
        let synthetic = SyntheticSpectra::from_rates(&ctx, &rates).unwrap();
        let store = load_store(&synthetic, &ctx).unwrap();
        for condition in Condition::ALL {
            let spectra = store.condition(condition).unwrap();
            let first = spectra.pixel(0).unwrap().to_vec();
            for pixel in 1..pixels {
                prop_assert_eq!(spectra.pixel(pixel).unwrap(), first.as_slice());
            }
        }
        let window = ctx.windows().alpha;
        prop_assert_eq!(store.reconstructed(rchain_core::BeamState::On).window_sum(0, window).unwrap(), alpha_on);
        prop_assert_eq!(store.implant_source().window_sum(pixels - 1, ctx.windows().implant).unwrap(), implants);
    }
}
