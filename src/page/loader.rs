// src/page/loader.rs
// =============================================================================
// Loads the starting page over HTTP.
//
// How it works:
// 1. GET the page with the page-load timeout
// 2. Retry a few times if the request fails at the network level
// 3. Treat any HTTP error status as a fatal PageLoadFailure
// 4. Parse the body into a RenderedPage, using the final URL after redirects
//
// A page that loads but has sloppy markup is fine: the parser's complaints
// end up as warnings on the RenderedPage.
// =============================================================================

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::dom::RenderedPage;
use crate::config::CheckConfig;
use crate::error::{CheckError, Result};

// Pause between attempts when the page fails at the network level
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Something that can turn a URL into a queryable page.
pub trait PageLoader {
    fn load(&self, url: &Url) -> impl Future<Output = Result<RenderedPage>>;
}

pub struct HttpPageLoader {
    client: Client,
    retries: u32,
}

impl HttpPageLoader {
    pub fn new(config: &CheckConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.page_load_timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            retries: config.page_load_retries,
        })
    }

    // Fetches a web page and returns its final URL and HTML content
    async fn fetch_page(&self, url: &Url) -> std::result::Result<(Url, String), FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::Network)?;

        // 3xx pages that reach us (not redirects we followed) still have a body
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.url().clone();
        let html = response.text().await.map_err(FetchError::Network)?;
        Ok((final_url, html))
    }
}

impl PageLoader for HttpPageLoader {
    async fn load(&self, url: &Url) -> Result<RenderedPage> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!("Loading page {} (attempt {})", url, attempt);

            match self.fetch_page(url).await {
                Ok((final_url, html)) => {
                    let page = RenderedPage::parse(&html, final_url);
                    if !page.warnings().is_empty() {
                        debug!(
                            "Page {} parsed with {} markup warning(s)",
                            url,
                            page.warnings().len()
                        );
                    }
                    return Ok(page);
                }
                Err(FetchError::Network(e)) if attempt <= self.retries => {
                    warn!("Network failure loading {}: {}, retrying", url, e);
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e @ FetchError::Status(_)) => {
                    return Err(CheckError::PageLoadFailure {
                        url: url.to_string(),
                        reason: e.to_string(),
                    });
                }
                Err(e @ FetchError::Network(_)) => {
                    return Err(CheckError::PageLoadFailure {
                        url: url.to_string(),
                        reason: format!("{} (gave up after {} attempt(s))", e, attempt),
                    });
                }
            }
        }
    }
}

// Why a single fetch attempt failed; only Network is worth retrying
#[derive(Debug)]
enum FetchError {
    Network(reqwest::Error),
    Status(u16),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network(e) => write!(f, "{}", e),
            FetchError::Status(code) => write!(f, "HTTP {}", code),
        }
    }
}
