#![deny(missing_docs)]
//! Command implementations behind the `rchain` binary.

pub mod commands;
pub mod export;
pub mod observe;
