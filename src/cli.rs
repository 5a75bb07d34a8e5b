// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things). The parsed arguments are
// turned into a CheckConfig, which is all the pipeline ever sees.
// =============================================================================

use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::config::{CheckConfig, DEFAULT_EXCLUDED_SCHEMES};

#[derive(Parser, Debug)]
#[command(
    name = "link-patrol",
    version,
    about = "Load a page and report which of its links are broken",
    long_about = "link-patrol loads a single page, extracts every link on it and checks each \
                  one for an HTTP error status. It does not follow links into other pages."
)]
pub struct Cli {
    /// Page to check (e.g., https://example.com/status_codes)
    pub url: Url,

    /// Timeout for loading the page itself, in milliseconds
    #[arg(long, default_value_t = 30_000)]
    pub page_load_timeout_ms: u64,

    /// Timeout for each link request, in milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub link_timeout_ms: u64,

    /// Maximum number of link checks running at once
    #[arg(long, default_value_t = 8)]
    pub max_concurrent: usize,

    /// href prefix to skip (repeatable). Replaces the defaults when given
    ///
    /// Defaults: javascript: mailto: tel:
    #[arg(long = "exclude-scheme", value_name = "PREFIX")]
    pub exclude_schemes: Vec<String>,

    /// Wall-clock limit in milliseconds for the whole run, page load included.
    /// Links still pending when it expires are reported as not checked
    #[arg(long)]
    pub crawl_timeout_ms: Option<u64>,

    /// Report redirects by their own status instead of following them
    #[arg(long)]
    pub no_follow_redirects: bool,

    /// Extra attempts when the page fails to load at the network level
    #[arg(long, default_value_t = 2)]
    pub page_load_retries: u32,

    /// Output the report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Exit with code 1 when any broken link is found
    #[arg(long)]
    pub fail_on_broken: bool,

    /// Show debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn to_config(&self) -> CheckConfig {
        let excluded_schemes = if self.exclude_schemes.is_empty() {
            DEFAULT_EXCLUDED_SCHEMES.iter().map(|s| s.to_string()).collect()
        } else {
            self.exclude_schemes.clone()
        };

        CheckConfig {
            page_load_timeout: Duration::from_millis(self.page_load_timeout_ms),
            link_request_timeout: Duration::from_millis(self.link_timeout_ms),
            max_concurrent_validations: self.max_concurrent,
            excluded_schemes,
            crawl_timeout: self.crawl_timeout_ms.map(Duration::from_millis),
            follow_redirects: !self.no_follow_redirects,
            page_load_retries: self.page_load_retries,
            ..CheckConfig::default()
        }
    }
}
