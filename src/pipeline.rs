// src/pipeline.rs
// =============================================================================
// Runs one full check: load page -> extract links -> validate -> report.
//
// Data only flows forward. The page is dropped as soon as its links have
// been extracted, validation results are folded into a ReportBuilder one at
// a time, and the finished LinkReport is handed back to the caller.
//
// The only error that escapes is a failure to load the starting page (or a
// bad configuration). Everything else ends up inside the report.
// =============================================================================

use futures::StreamExt;
use tokio::time::Instant;
use tracing::{info, warn};
use url::Url;

use crate::checker::{extract_links, Extraction, LinkValidator, StatusProbe};
use crate::config::CheckConfig;
use crate::error::{CheckError, Result};
use crate::page::PageLoader;
use crate::report::{LinkReport, ReportBuilder};

pub async fn check_page<L, P>(
    url: &Url,
    config: &CheckConfig,
    loader: &L,
    probe: P,
) -> Result<LinkReport>
where
    L: PageLoader,
    P: StatusProbe,
{
    config.validate()?;

    // The crawl deadline covers the page load (and its retries) as well
    let deadline = config.crawl_timeout.map(|limit| Instant::now() + limit);

    info!("🔍 Loading page: {}", url);
    let page = match deadline {
        Some(at) => tokio::time::timeout_at(at, loader.load(url))
            .await
            .map_err(|_| CheckError::PageLoadFailure {
                url: url.to_string(),
                reason: "crawl deadline reached before the page loaded".to_string(),
            })??,
        None => loader.load(url).await?,
    };
    let Extraction { links, invalid } = extract_links(&page, config);
    drop(page);

    info!(
        "🌐 Checking {} link(s) ({} invalid skipped)",
        links.len(),
        invalid.len()
    );

    let submitted = links.len();
    let validator = LinkValidator::new(probe, config);

    // Resolves when the crawl deadline passes; never resolves without one
    let expired = async move {
        match deadline {
            Some(at) => tokio::time::sleep_until(at).await,
            None => futures::future::pending::<()>().await,
        }
    };

    let report = validator
        .validate_all(links, config.max_concurrent_validations)
        .take_until(expired)
        .fold(ReportBuilder::new(invalid), |builder, result| async move {
            builder.record(result)
        })
        .await
        .finish(submitted);

    if report.unchecked_count > 0 {
        warn!(
            "Crawl deadline reached, {} link(s) were not checked",
            report.unchecked_count
        );
    }

    Ok(report)
}
