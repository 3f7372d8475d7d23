use rchain_core::{ChainSpec, EnergyWindow, LinkSpec, RunContext, SignalWindows};
use rchain_engine::{aggregate, to_canonical_json, Engine, EngineOpts, JsonLayout, RunReport};
use rchain_spectra::{FissionTags, PixelSpectra, SpectrumStore};

const PIXELS: usize = 64;
const BINS: usize = 32;

fn context() -> RunContext {
    RunContext::new(
        PIXELS,
        BINS,
        3_600.0,
        SignalWindows {
            alpha: EnergyWindow::new(12, 20),
            escape: EnergyWindow::new(0, 8),
            implant: EnergyWindow::new(20, 32),
        },
    )
    .unwrap()
}

fn varied(seed: u64) -> PixelSpectra {
    let counts = (0..(PIXELS * BINS) as u64)
        .map(|i| (i.wrapping_mul(2_654_435_761).wrapping_add(seed) >> 7) % 13)
        .collect();
    PixelSpectra::from_flat(PIXELS, BINS, counts).unwrap()
}

fn engine(threads: usize, raw: bool, per_pixel: bool) -> Engine {
    let ctx = context();
    let fissions = (0..PIXELS as u64).map(|p| p % 3).collect();
    let store = SpectrumStore::new(
        &ctx,
        raw.then(|| varied(11)),
        varied(3),
        varied(5),
        FissionTags::from_raw_counts(fissions),
    )
    .unwrap();
    let opts = EngineOpts {
        threads,
        per_pixel,
        data_source: "varied".to_string(),
    };
    Engine::new(ctx, store, opts).unwrap()
}

fn chains() -> Vec<ChainSpec> {
    let link = |decay_type: &str, beam: &str, time_span: f64| LinkSpec {
        decay_type: decay_type.to_string(),
        beam: Some(rchain_core::BeamToken::Name(beam.to_string())),
        time_span,
    };
    vec![
        ChainSpec {
            label: Some("short".to_string()),
            links: vec![link("alpha", "on", 2.0), link("fission", "off", 10.0)],
        },
        ChainSpec {
            label: None,
            links: vec![
                link("escape", "off", 2.0),
                link("alpha", "off", 10.0),
                link("fission", "off", 50.0),
            ],
        },
    ]
}

#[test]
fn totals_do_not_depend_on_thread_count() {
    let single = engine(1, true, false).compute(&chains()).unwrap();
    let pooled = engine(4, true, false).compute(&chains()).unwrap();
    assert_eq!(single, pooled);
}

#[test]
fn report_hash_ignores_timestamp() {
    let engine = engine(2, true, false);
    let first = engine.report(&chains()).unwrap();
    let second = engine.report(&chains()).unwrap();
    assert_eq!(first.report_hash, second.report_hash);
    assert_eq!(first.provenance.input_hash, second.provenance.input_hash);
    assert_eq!(first.report_hash, first.payload_hash().unwrap());
    assert_eq!(first.provenance.data_source, "varied");
}

#[test]
fn report_records_degraded_implant_source() {
    let report = engine(1, false, false).report(&chains()).unwrap();
    assert!(!report.pure_beam);
    let text = aggregate::render_text(&report);
    assert!(text.starts_with("note: beam_on_raw spectrum missing"));
    assert!(text.contains("For chain 0 (short): "));
    assert!(text.contains("For chain 1: "));
}

#[test]
fn per_pixel_vectors_are_optional_and_sum_to_total() {
    let report = engine(1, true, true).report(&chains()).unwrap();
    for chain in &report.chains {
        match &chain.outcome {
            rchain_engine::ChainOutcome::Evaluated { total, per_pixel, .. } => {
                let per_pixel = per_pixel.as_ref().unwrap();
                assert_eq!(per_pixel.len(), PIXELS);
                assert_eq!(aggregate::total(per_pixel), *total);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }
    let compact = engine(1, true, false).report(&chains()).unwrap();
    assert_eq!(compact.totals(), report.totals());
}

#[test]
fn rejected_chains_render_their_error() {
    let mut specs = chains();
    specs.push(ChainSpec {
        label: Some("bad".to_string()),
        links: vec![LinkSpec {
            decay_type: "q".to_string(),
            beam: None,
            time_span: 1.0,
        }],
    });
    let report = engine(1, true, false).report(&specs).unwrap();
    let text = aggregate::render_text(&report);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("For chain 0 (short): "));
    assert!(lines[2].starts_with("For chain 2 (bad): rejected, chain error [unknown-decay-type]"));
}

#[test]
fn report_survives_canonical_json() {
    let report = engine(1, true, false).report(&chains()).unwrap();
    let bytes = to_canonical_json(&report, JsonLayout::Compact).unwrap();
    let text = String::from_utf8(bytes.clone()).unwrap();
    assert!(text.contains("\"status\":\"evaluated\""));
    let back: RunReport = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(back.report_hash, report.report_hash);
    assert_eq!(back.provenance, report.provenance);
    assert_eq!(back.chains.len(), 2);
    assert_eq!(back.chains[0].label.as_deref(), Some("short"));
}
