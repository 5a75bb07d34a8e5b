// src/config.rs
// =============================================================================
// Runtime settings for a link check.
//
// Values normally come from the command line (see cli.rs), but the
// pipeline only ever sees this struct, so tests can build one directly.
// =============================================================================

use std::time::Duration;

use crate::error::{CheckError, Result};

/// Schemes that never point at something we can request over HTTP.
pub const DEFAULT_EXCLUDED_SCHEMES: [&str; 3] = ["javascript:", "mailto:", "tel:"];

#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// How long the starting page may take to load
    pub page_load_timeout: Duration,
    /// Time budget for each link, shared by HEAD and the GET fallback
    pub link_request_timeout: Duration,
    /// Upper bound on link checks in flight at once
    pub max_concurrent_validations: usize,
    /// href prefixes that are skipped during extraction (case-sensitive)
    pub excluded_schemes: Vec<String>,
    /// Wall-clock limit for the whole run, starting before the page load
    pub crawl_timeout: Option<Duration>,
    pub follow_redirects: bool,
    /// Extra attempts when the starting page fails at the network level
    pub page_load_retries: u32,
    pub user_agent: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            page_load_timeout: Duration::from_secs(30),
            link_request_timeout: Duration::from_secs(10),
            max_concurrent_validations: 8,
            excluded_schemes: DEFAULT_EXCLUDED_SCHEMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            crawl_timeout: None,
            follow_redirects: true,
            page_load_retries: 2,
            user_agent: concat!("link-patrol/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl CheckConfig {
    /// Rejects settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_validations == 0 {
            return Err(CheckError::InvalidConfig(
                "max concurrent validations must be at least 1".to_string(),
            ));
        }
        if self.link_request_timeout.is_zero() {
            return Err(CheckError::InvalidConfig(
                "link request timeout must be greater than zero".to_string(),
            ));
        }
        if self.page_load_timeout.is_zero() {
            return Err(CheckError::InvalidConfig(
                "page load timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns true if `href` starts with one of the excluded scheme prefixes.
    pub fn is_excluded(&self, href: &str) -> bool {
        self.excluded_schemes
            .iter()
            .any(|scheme| href.starts_with(scheme.as_str()))
    }
}
