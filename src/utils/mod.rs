//! Shared utilities: URL canonicalization and crate-wide constants.

pub mod constants;
pub mod url_utils;

pub use url_utils::{canonicalize, canonicalize_in, registrable_stem};
