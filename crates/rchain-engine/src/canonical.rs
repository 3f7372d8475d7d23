//! Canonical JSON for run reports and the SHA-256 digests taken over it.
//!
//! Object keys are sorted at every depth, so the bytes and the digests do
//! not depend on field order or on how `serde_json` stores maps.

use rchain_core::ChainError;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Output layout of [`to_canonical_json`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonLayout {
    /// Single line; the form every digest is computed over.
    Compact,
    /// Indented, newline terminated; the form written to `report.json`.
    Pretty,
}

/// What a digest identifies. The scope tag is hashed ahead of the JSON so
/// an input hash can never collide with a report hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestScope {
    /// Run context together with the chain descriptors.
    Inputs,
    /// Report payload without provenance.
    Report,
}

impl DigestScope {
    fn tag(&self) -> &'static [u8] {
        match self {
            DigestScope::Inputs => b"rchain/inputs/v1\0",
            DigestScope::Report => b"rchain/report/v1\0",
        }
    }
}

/// Serializes `value` with sorted object keys.
pub fn to_canonical_json<T: Serialize>(value: &T, layout: JsonLayout) -> Result<Vec<u8>, ChainError> {
    let mut tree = serde_json::to_value(value).map_err(|err| json_error("json-serialize", err))?;
    sort_keys(&mut tree);
    let mut bytes = match layout {
        JsonLayout::Compact => serde_json::to_vec(&tree),
        JsonLayout::Pretty => serde_json::to_vec_pretty(&tree),
    }
    .map_err(|err| json_error("json-write", err))?;
    if layout == JsonLayout::Pretty {
        bytes.push(b'\n');
    }
    Ok(bytes)
}

/// Lowercase hex SHA-256 of the scope tag followed by the compact canonical
/// JSON of `value`.
pub fn digest<T: Serialize>(scope: DigestScope, value: &T) -> Result<String, ChainError> {
    let mut hasher = Sha256::new();
    hasher.update(scope.tag());
    hasher.update(to_canonical_json(value, JsonLayout::Compact)?);
    Ok(format!("{:x}", hasher.finalize()))
}

fn sort_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            for (key, mut child) in entries {
                sort_keys(&mut child);
                map.insert(key, child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(sort_keys),
        _ => {}
    }
}

fn json_error(code: &str, err: serde_json::Error) -> ChainError {
    ChainError::serde(code, err.to_string())
}
