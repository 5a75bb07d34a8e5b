// src/error.rs
// =============================================================================
// Error types for the link checking pipeline.
//
// Only two kinds of failure can stop a run:
// - PageLoadFailure: the starting page could not be loaded at all
// - HttpClient / InvalidConfig: we could not even set up the run
//
// Everything that goes wrong with an individual link is NOT an error here.
// Broken links and network failures are classified outcomes on a
// LinkCheckResult, and malformed hrefs become InvalidLink records that the
// extractor logs and records before moving on.
// =============================================================================

use serde::Serialize;
use thiserror::Error;

/// An href that could not be turned into an absolute URL.
///
/// Raised during extraction, logged, recorded on the report and skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("invalid link '{href}': {reason}")]
pub struct InvalidLink {
    pub href: String,
    pub text: String,
    pub reason: String,
}

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("failed to load page {url}: {reason}")]
    PageLoadFailure { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CheckError>;
