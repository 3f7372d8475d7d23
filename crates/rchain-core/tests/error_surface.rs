use rchain_core::errors::{ChainError, ErrorFamily, ErrorInfo};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("pixel", 17)
        .with_context("source", "recoff.txt")
}

#[test]
fn input_error_surface() {
    let err = ChainError::Input(sample_info("missing-condition", "beam-off spectrum absent"));
    assert_eq!(err.info().code, "missing-condition");
    assert_eq!(err.info().context.get("pixel").map(String::as_str), Some("17"));
    assert!(!err.is_chain_scoped());
}

#[test]
fn chain_error_is_chain_scoped() {
    let err = ChainError::chain("unknown-decay-type", "unknown decay type");
    assert!(err.is_chain_scoped());
    assert!(!ChainError::numeric("negative-expected", "x").is_chain_scoped());
    assert!(!ChainError::config("zero-bins", "x").is_chain_scoped());
}

#[test]
fn display_renders_context_and_hint() {
    let err = ChainError::config("window-out-of-range", "bad window")
        .with_context("window", "alpha")
        .with_hint("shrink the window");
    assert_eq!(
        err.to_string(),
        "config error [window-out-of-range] bad window (window=alpha); hint: shrink the window"
    );
    let bare = ChainError::numeric("invalid-rate", "rate must be finite");
    assert_eq!(bare.to_string(), "numeric error [invalid-rate] rate must be finite");
    let two = ChainError::input("count-overflow", "too many")
        .with_context("pixel", 3)
        .with_context("bin", 1);
    assert_eq!(two.info().to_string(), "[count-overflow] too many (bin=1, pixel=3)");
}

#[test]
fn families_round_trip_through_constructor() {
    for family in [
        ErrorFamily::Config,
        ErrorFamily::Input,
        ErrorFamily::Chain,
        ErrorFamily::Numeric,
        ErrorFamily::Serde,
    ] {
        let err = ChainError::new(family, "code", "message");
        assert_eq!(err.family(), family);
        assert_eq!(err.is_chain_scoped(), family == ErrorFamily::Chain);
        assert!(err.to_string().starts_with(family.name()));
    }
}

#[test]
fn context_is_attached_to_every_family() {
    let errors = [
        ChainError::config("c", "m"),
        ChainError::input("i", "m"),
        ChainError::chain("ch", "m"),
        ChainError::numeric("n", "m"),
        ChainError::serde("s", "m"),
    ];
    for err in errors {
        let err = err.with_context("chain", 3);
        assert_eq!(err.info().context.get("chain").map(String::as_str), Some("3"));
    }
}
