//! Error type shared by every rchain crate.
//!
//! Each error belongs to a [`ErrorFamily`] and carries an [`ErrorInfo`]
//! with a stable kebab-case code plus key/value context (paths, pixels,
//! chain and link positions). Only [`ErrorFamily::Chain`] errors are
//! recoverable: they reject one chain and the run goes on.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad origin of an error, deciding whether a run can continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorFamily {
    /// Run configuration (geometry, windows, live time, config files).
    Config,
    /// Spectrum and fission-tag input.
    Input,
    /// One malformed decay-chain descriptor.
    Chain,
    /// Numeric invariant broken inside the probability model.
    Numeric,
    /// JSON encoding of reports.
    Serde,
}

impl ErrorFamily {
    /// Lowercase name used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorFamily::Config => "config",
            ErrorFamily::Input => "input",
            ErrorFamily::Chain => "chain",
            ErrorFamily::Numeric => "numeric",
            ErrorFamily::Serde => "serde",
        }
    }
}

/// Code, message and diagnostic context of one error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable kebab-case code, e.g. `missing-condition`.
    pub code: String,
    /// Human readable message.
    pub message: String,
    /// Where the error happened.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
    /// How to fix it, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload without context or hint.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records one context entry, replacing an earlier value for `key`.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets the hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// `[code] message (key=value, ...); hint: ...`
impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        let mut entries = self.context.iter();
        if let Some((key, value)) = entries.next() {
            write!(f, " ({key}={value}")?;
            for (key, value) in entries {
                write!(f, ", {key}={value}")?;
            }
            f.write_str(")")?;
        }
        match &self.hint {
            Some(hint) => write!(f, "; hint: {hint}"),
            None => Ok(()),
        }
    }
}

/// Error returned throughout the estimator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "info", rename_all = "kebab-case")]
pub enum ChainError {
    /// Bad run configuration; aborts the run.
    #[error("config error {0}")]
    Config(ErrorInfo),
    /// Missing or malformed spectra or fission tags; aborts the run.
    #[error("input error {0}")]
    Input(ErrorInfo),
    /// Malformed decay chain; rejects that chain only.
    #[error("chain error {0}")]
    Chain(ErrorInfo),
    /// Negative or non-finite rate or expectation; aborts the run.
    #[error("numeric error {0}")]
    Numeric(ErrorInfo),
    /// Report encoding failure.
    #[error("serde error {0}")]
    Serde(ErrorInfo),
}

impl ChainError {
    /// Builds an error of the given family.
    pub fn new(family: ErrorFamily, code: &str, message: impl Into<String>) -> Self {
        let info = ErrorInfo::new(code, message);
        match family {
            ErrorFamily::Config => ChainError::Config(info),
            ErrorFamily::Input => ChainError::Input(info),
            ErrorFamily::Chain => ChainError::Chain(info),
            ErrorFamily::Numeric => ChainError::Numeric(info),
            ErrorFamily::Serde => ChainError::Serde(info),
        }
    }

    /// [`ErrorFamily::Config`] error.
    pub fn config(code: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorFamily::Config, code, message)
    }

    /// [`ErrorFamily::Input`] error.
    pub fn input(code: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorFamily::Input, code, message)
    }

    /// [`ErrorFamily::Chain`] error.
    pub fn chain(code: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorFamily::Chain, code, message)
    }

    /// [`ErrorFamily::Numeric`] error.
    pub fn numeric(code: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorFamily::Numeric, code, message)
    }

    /// [`ErrorFamily::Serde`] error.
    pub fn serde(code: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorFamily::Serde, code, message)
    }

    /// Family and payload.
    pub fn parts(&self) -> (ErrorFamily, &ErrorInfo) {
        match self {
            ChainError::Config(info) => (ErrorFamily::Config, info),
            ChainError::Input(info) => (ErrorFamily::Input, info),
            ChainError::Chain(info) => (ErrorFamily::Chain, info),
            ChainError::Numeric(info) => (ErrorFamily::Numeric, info),
            ChainError::Serde(info) => (ErrorFamily::Serde, info),
        }
    }

    /// Family of the error.
    pub fn family(&self) -> ErrorFamily {
        self.parts().0
    }

    /// Payload of the error.
    pub fn info(&self) -> &ErrorInfo {
        self.parts().1
    }

    /// True when the error only invalidates a single chain.
    pub fn is_chain_scoped(&self) -> bool {
        self.family() == ErrorFamily::Chain
    }

    /// Adds context to the payload.
    pub fn with_context(self, key: impl Into<String>, value: impl ToString) -> Self {
        self.map_info(|info| info.with_context(key, value))
    }

    /// Sets the payload's hint.
    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        self.map_info(|info| info.with_hint(hint))
    }

    fn map_info(self, f: impl FnOnce(ErrorInfo) -> ErrorInfo) -> Self {
        match self {
            ChainError::Config(info) => ChainError::Config(f(info)),
            ChainError::Input(info) => ChainError::Input(f(info)),
            ChainError::Chain(info) => ChainError::Chain(f(info)),
            ChainError::Numeric(info) => ChainError::Numeric(f(info)),
            ChainError::Serde(info) => ChainError::Serde(f(info)),
        }
    }
}
