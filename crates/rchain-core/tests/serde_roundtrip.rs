use rchain_core::errors::ChainError;
use rchain_core::provenance::{RunProvenance, SchemaVersion};
use rchain_core::{ChainSpec, DecayChain};

#[test]
fn provenance_round_trip_json() {
    let provenance = RunProvenance {
        input_hash: "input".into(),
        data_source: "synthetic".into(),
        created_at: "2026-10-16T00:00:00Z".into(),
        tool_versions: [("rchain-core".into(), "0.1.0".into())].into_iter().collect(),
    };
    let json = serde_json::to_string_pretty(&provenance).expect("serialize");
    let decoded: RunProvenance = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, provenance);
    assert_eq!(SchemaVersion::default(), SchemaVersion::new(1, 0, 0));
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = ChainError::chain("empty-chain", "no links").with_context("chain", 0);
    let json = serde_json::to_value(&err).expect("serialize");
    assert_eq!(json["family"], "chain");
    assert_eq!(json["info"]["code"], "empty-chain");
    assert_eq!(json["info"]["context"]["chain"], "0");
    assert!(json["info"].get("hint").is_none());
    let decoded: ChainError = serde_json::from_value(json).expect("deserialize");
    assert_eq!(decoded, err);
}

#[test]
fn chain_specs_accept_flags_and_names_from_yaml() {
    let yaml = r#"
label: E115 3-link
links:
  - { decay_type: a, beam: 1, time_span: 2 }
  - { decay_type: alpha, beam: off, time_span: 10 }
  - { decay_type: f, time_span: 50 }
"#;
    let spec: ChainSpec = serde_yaml::from_str(yaml).expect("yaml");
    let chain = DecayChain::from_spec(&spec).expect("valid chain");
    assert_eq!(chain.len(), 3);
    assert_eq!(chain.label(), Some("E115 3-link"));
    let reparsed = DecayChain::from_spec(&chain.to_spec()).expect("round trip");
    assert_eq!(reparsed, chain);
}
