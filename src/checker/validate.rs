// src/checker/validate.rs
// =============================================================================
// This module checks every normalized link and classifies the answer.
//
// Key functionality:
// - Sends a HEAD request first (lightweight, no body download)
// - Falls back to GET when the server rejects HEAD (405 / 501)
// - Classifies: status < 400 is Active, status >= 400 is Broken, no status
//   at all is a NetworkError
// - Runs checks concurrently with a bounded number in flight
//
// validate() never fails. Whatever happens to one link ends up in that
// link's LinkCheckResult and cannot stop the others from being checked.
// =============================================================================

use std::time::Duration;

use futures::stream::{self, Stream, StreamExt};
use reqwest::Method;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{info, warn};

use super::extract::NormalizedLink;
use super::probe::{FailureKind, ProbeFailure, ProbeRequest, StatusProbe};
use crate::config::CheckConfig;

/// Status codes that mean "this server does not do HEAD, try GET".
const HEAD_REJECTED: [u16; 2] = [405, 501];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkOutcome {
    Active,
    Broken,
    NetworkError,
}

/// The result of checking a single link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkCheckResult {
    pub url: String,
    pub text: String,
    /// None only for NetworkError
    pub status: Option<u16>,
    pub outcome: LinkOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ProbeFailure>,
}

impl LinkCheckResult {
    fn from_status(link: NormalizedLink, status: u16) -> Self {
        Self {
            url: link.absolute_url.to_string(),
            text: link.text,
            status: Some(status),
            outcome: classify(status),
            failure: None,
        }
    }

    fn from_failure(link: NormalizedLink, failure: ProbeFailure) -> Self {
        Self {
            url: link.absolute_url.to_string(),
            text: link.text,
            status: None,
            outcome: LinkOutcome::NetworkError,
            failure: Some(failure),
        }
    }

    /// Link text for display; anchors without text get a placeholder.
    pub fn display_text(&self) -> &str {
        if self.text.is_empty() {
            "No link text"
        } else {
            &self.text
        }
    }

    // Emits the human-readable line for this result
    fn log(&self) {
        match self.outcome {
            LinkOutcome::Active => info!("✅ Working Link: {}", self.url),
            LinkOutcome::Broken => warn!(
                "❌ Broken Link Found: {} (status {}, text: {})",
                self.url,
                self.status.unwrap_or_default(),
                self.display_text()
            ),
            LinkOutcome::NetworkError => warn!(
                "⚠️  Network error: {} ({})",
                self.url,
                self.failure
                    .as_ref()
                    .map(|f| f.message.as_str())
                    .unwrap_or("unknown failure")
            ),
        }
    }
}

/// Classifies an HTTP status code.
pub fn classify(status: u16) -> LinkOutcome {
    if status >= 400 {
        LinkOutcome::Broken
    } else {
        LinkOutcome::Active
    }
}

pub struct LinkValidator<P> {
    probe: P,
    timeout: Duration,
    follow_redirects: bool,
}

impl<P: StatusProbe> LinkValidator<P> {
    pub fn new(probe: P, config: &CheckConfig) -> Self {
        Self {
            probe,
            timeout: config.link_request_timeout,
            follow_redirects: config.follow_redirects,
        }
    }

    // Sends one request, giving it whatever is left of the link's budget
    async fn request_before(
        &self,
        link: &NormalizedLink,
        method: Method,
        deadline: Instant,
    ) -> Result<u16, ProbeFailure> {
        let request = ProbeRequest {
            url: link.absolute_url.clone(),
            method,
            timeout: deadline.saturating_duration_since(Instant::now()),
            follow_redirects: self.follow_redirects,
        };

        match tokio::time::timeout_at(deadline, self.probe.request(request)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ProbeFailure {
                kind: FailureKind::Timeout,
                message: "Request timed out".to_string(),
            }),
        }
    }

    // Checks a single link and logs the outcome
    //
    // HEAD and the GET fallback share one link_request_timeout.
    pub async fn validate(&self, link: NormalizedLink) -> LinkCheckResult {
        let deadline = Instant::now() + self.timeout;
        let mut outcome = self.request_before(&link, Method::HEAD, deadline).await;

        if matches!(outcome, Ok(status) if HEAD_REJECTED.contains(&status)) {
            outcome = self.request_before(&link, Method::GET, deadline).await;
        }

        let result = match outcome {
            Ok(status) => LinkCheckResult::from_status(link, status),
            Err(failure) => LinkCheckResult::from_failure(link, failure),
        };
        result.log();
        result
    }

    // Checks many links with at most `max_in_flight` requests running at once
    //
    // Results come out in completion order, not input order.
    pub fn validate_all(
        &self,
        links: Vec<NormalizedLink>,
        max_in_flight: usize,
    ) -> impl Stream<Item = LinkCheckResult> + '_ {
        stream::iter(links)
            .map(move |link| self.validate(link))
            .buffer_unordered(max_in_flight.max(1))
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does validate() return LinkCheckResult and not Result<...>?
//    - A dead link is an answer, not a failure of our program
//    - Returning a plain value means the caller cannot forget a link: every
//      input produces exactly one output
//
// 2. What is buffer_unordered?
//    - It polls up to N futures at once and yields results as they finish
//    - Like Promise.all() with a concurrency limit, but streaming
//
// 3. Why the '_ in impl Stream + '_?
//    - The stream borrows the validator (and its probe) while it runs
//    - '_ tells the compiler the stream cannot outlive &self
// -----------------------------------------------------------------------------
