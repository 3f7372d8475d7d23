use rchain_core::{BeamState, BeamToken, ChainSpec, DecayChain, DecayLink, DecayType, LinkSpec};

fn link(decay_type: &str, beam: Option<&str>, time_span: f64) -> LinkSpec {
    LinkSpec {
        decay_type: decay_type.to_string(),
        beam: beam.map(|b| BeamToken::Name(b.to_string())),
        time_span,
    }
}

#[test]
fn decay_tokens_parse_short_and_long_forms() {
    assert_eq!("a".parse::<DecayType>().unwrap(), DecayType::Alpha);
    assert_eq!("Escape".parse::<DecayType>().unwrap(), DecayType::Escape);
    assert_eq!(" f ".parse::<DecayType>().unwrap(), DecayType::Fission);
    assert_eq!("1".parse::<BeamState>().unwrap(), BeamState::On);
    assert_eq!("OFF".parse::<BeamState>().unwrap(), BeamState::Off);
}

#[test]
fn unknown_decay_type_is_a_chain_error() {
    let err = "x".parse::<DecayType>().unwrap_err();
    assert!(err.is_chain_scoped());
    assert_eq!(err.info().code, "unknown-decay-type");
}

#[test]
fn unknown_beam_state_is_a_chain_error() {
    let spec = ChainSpec {
        label: None,
        links: vec![link("a", Some("maybe"), 1.0)],
    };
    let err = DecayChain::from_spec(&spec).unwrap_err();
    assert_eq!(err.info().code, "unknown-beam-state");
    assert_eq!(err.info().context.get("link").map(String::as_str), Some("0"));
}

#[test]
fn negative_and_non_finite_time_spans_are_rejected() {
    assert!(DecayLink::new(DecayType::Alpha, BeamState::On, -1.0).is_err());
    assert!(DecayLink::new(DecayType::Alpha, BeamState::On, f64::NAN).is_err());
    assert!(DecayLink::new(DecayType::Alpha, BeamState::On, f64::INFINITY).is_err());
}

#[test]
fn zero_time_span_is_accepted() {
    let link = DecayLink::new(DecayType::Escape, BeamState::Off, 0.0).expect("zero span");
    assert_eq!(link.time_span, 0.0);
}

#[test]
fn empty_chain_is_rejected() {
    let err = DecayChain::new(Vec::new()).unwrap_err();
    assert_eq!(err.info().code, "empty-chain");
}

#[test]
fn labels_are_single_line_and_whitespace_normalised() {
    let spec = ChainSpec {
        label: Some("  odd   even\tchain ".into()),
        links: vec![link("f", None, 5.0)],
    };
    let chain = DecayChain::from_spec(&spec).unwrap();
    assert_eq!(chain.label(), Some("odd even chain"));

    let spec = ChainSpec {
        label: Some("x\na 1 2".into()),
        links: vec![link("f", None, 5.0)],
    };
    let err = DecayChain::from_spec(&spec).unwrap_err();
    assert_eq!(err.info().code, "invalid-label");
    assert!(err.is_chain_scoped());

    let blank = DecayChain::from_spec(&ChainSpec {
        label: Some("   ".into()),
        links: vec![link("f", None, 5.0)],
    })
    .unwrap();
    assert_eq!(blank.label(), None);

    let built = DecayChain::new(vec![DecayLink::new(DecayType::Fission, BeamState::Off, 1.0).unwrap()])
        .unwrap()
        .with_label("x\na 1 2");
    assert_eq!(built.label(), Some("x a 1 2"));
}

#[test]
fn fission_may_omit_beam_but_alpha_may_not() {
    let spec = ChainSpec {
        label: None,
        links: vec![link("f", None, 5.0)],
    };
    assert!(DecayChain::from_spec(&spec).is_ok());

    let spec = ChainSpec {
        label: None,
        links: vec![link("a", None, 5.0)],
    };
    assert_eq!(
        DecayChain::from_spec(&spec).unwrap_err().info().code,
        "missing-beam-state"
    );
}

#[test]
fn link_display_uses_legacy_codes() {
    let link = DecayLink::new(DecayType::Alpha, BeamState::On, 2.0).unwrap();
    assert_eq!(link.to_string(), "a 1 2");
}
