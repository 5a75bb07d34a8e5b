// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - extract: turns page anchors into absolute, checkable links
// - probe: the HTTP request behind each check
// - validate: classifies each link as active, broken or network error
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

mod extract;
pub mod probe;
mod validate;

pub use extract::{extract_links, Extraction};
pub use probe::{ReqwestProbe, StatusProbe};
pub use validate::{LinkCheckResult, LinkOutcome, LinkValidator};
