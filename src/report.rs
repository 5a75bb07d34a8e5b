// src/report.rs
// =============================================================================
// Collects per-link results into the final report and renders it.
//
// ReportBuilder is the only place counts are updated. The pipeline folds the
// stream of results into it one at a time, so there are no shared counters
// for concurrent checks to fight over.
//
// Output formats:
// - summary_lines(): human-readable lines for the console or a CI log
// - serde: LinkReport serializes to JSON for --json
// =============================================================================

use serde::Serialize;

use crate::checker::{LinkCheckResult, LinkOutcome};
use crate::error::InvalidLink;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub total_checked: usize,
    pub active_count: usize,
    pub broken_count: usize,
    pub network_error_count: usize,
    /// Broken results in the order they were produced
    pub broken_details: Vec<LinkCheckResult>,
    pub network_error_details: Vec<LinkCheckResult>,
    /// hrefs dropped during extraction; not part of total_checked
    pub invalid_links: Vec<InvalidLink>,
    /// Links never checked because the crawl deadline expired
    pub unchecked_count: usize,
}

impl LinkReport {
    pub fn has_broken_links(&self) -> bool {
        self.broken_count > 0
    }

    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "=== Link Check Summary ===".to_string(),
            format!("Total Links Checked: {}", self.total_checked),
            format!("Active Links: {}", self.active_count),
            format!("Broken Links: {}", self.broken_count),
            format!("Network Errors: {}", self.network_error_count),
        ];

        if !self.invalid_links.is_empty() {
            lines.push(format!("Invalid Links Skipped: {}", self.invalid_links.len()));
        }
        if self.unchecked_count > 0 {
            lines.push(format!(
                "Not Checked (deadline reached): {}",
                self.unchecked_count
            ));
        }

        if !self.broken_details.is_empty() {
            lines.push(String::new());
            lines.push("=== Broken Links Details ===".to_string());
            for link in &self.broken_details {
                lines.push(format!("URL: {}", link.url));
                lines.push(format!("Status: {}", link.status.unwrap_or_default()));
                lines.push(format!("Text: {}", link.display_text()));
                lines.push("---".to_string());
            }
        }

        if !self.network_error_details.is_empty() {
            lines.push(String::new());
            lines.push("=== Network Errors ===".to_string());
            for link in &self.network_error_details {
                let reason = link
                    .failure
                    .as_ref()
                    .map(|f| f.message.as_str())
                    .unwrap_or("unknown failure");
                lines.push(format!("URL: {}", link.url));
                lines.push(format!("Error: {}", reason));
                lines.push("---".to_string());
            }
        }

        lines.push(format!(
            "Found {} broken links out of {} total links",
            self.broken_count, self.total_checked
        ));
        lines
    }
}

#[derive(Debug, Default)]
pub struct ReportBuilder {
    total_checked: usize,
    active_count: usize,
    broken_details: Vec<LinkCheckResult>,
    network_error_details: Vec<LinkCheckResult>,
    invalid_links: Vec<InvalidLink>,
}

impl ReportBuilder {
    pub fn new(invalid_links: Vec<InvalidLink>) -> Self {
        Self {
            invalid_links,
            ..Self::default()
        }
    }

    /// Folds one result into the report.
    pub fn record(mut self, result: LinkCheckResult) -> Self {
        self.total_checked += 1;
        match result.outcome {
            LinkOutcome::Active => self.active_count += 1,
            LinkOutcome::Broken => self.broken_details.push(result),
            LinkOutcome::NetworkError => self.network_error_details.push(result),
        }
        self
    }

    // `submitted` is how many links were handed to the validator; anything
    // not recorded by now was cut off by the deadline
    pub fn finish(self, submitted: usize) -> LinkReport {
        LinkReport {
            total_checked: self.total_checked,
            active_count: self.active_count,
            broken_count: self.broken_details.len(),
            network_error_count: self.network_error_details.len(),
            broken_details: self.broken_details,
            network_error_details: self.network_error_details,
            invalid_links: self.invalid_links,
            unchecked_count: submitted.saturating_sub(self.total_checked),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::probe::{FailureKind, ProbeFailure};

    fn result(url: &str, status: Option<u16>, outcome: LinkOutcome) -> LinkCheckResult {
        LinkCheckResult {
            url: url.to_string(),
            text: String::new(),
            status,
            outcome,
            failure: status.is_none().then(|| ProbeFailure {
                kind: FailureKind::Timeout,
                message: "Request timed out".to_string(),
            }),
        }
    }

    #[test]
    fn test_empty_report() {
        let report = ReportBuilder::default().finish(0);
        assert_eq!(report.total_checked, 0);
        assert_eq!(report.active_count, 0);
        assert_eq!(report.broken_count, 0);
        assert!(report.broken_details.is_empty());
        assert!(!report.has_broken_links());
    }

    #[test]
    fn test_counts_add_up() {
        let report = ReportBuilder::default()
            .record(result("http://x/a", Some(200), LinkOutcome::Active))
            .record(result("http://x/b", Some(404), LinkOutcome::Broken))
            .record(result("http://x/c", None, LinkOutcome::NetworkError))
            .record(result("http://x/d", Some(500), LinkOutcome::Broken))
            .finish(4);

        assert_eq!(report.total_checked, 4);
        assert_eq!(
            report.total_checked,
            report.active_count + report.broken_count + report.network_error_count
        );
        assert_eq!(report.network_error_count, 1);
        assert_eq!(report.unchecked_count, 0);
    }

    #[test]
    fn test_broken_details_keep_insertion_order() {
        let report = ReportBuilder::default()
            .record(result("http://x/second", Some(500), LinkOutcome::Broken))
            .record(result("http://x/first", Some(404), LinkOutcome::Broken))
            .finish(2);

        let urls: Vec<_> = report.broken_details.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["http://x/second", "http://x/first"]);
    }

    #[test]
    fn test_network_errors_are_not_broken() {
        let report = ReportBuilder::default()
            .record(result("http://x/slow", None, LinkOutcome::NetworkError))
            .finish(1);

        assert_eq!(report.broken_count, 0);
        assert!(report.broken_details.is_empty());
        assert_eq!(report.network_error_details[0].status, None);
    }

    #[test]
    fn test_unchecked_links_counted() {
        let report = ReportBuilder::default()
            .record(result("http://x/a", Some(200), LinkOutcome::Active))
            .finish(3);
        assert_eq!(report.total_checked, 1);
        assert_eq!(report.unchecked_count, 2);
    }

    #[test]
    fn test_summary_lines() {
        let report = ReportBuilder::default()
            .record(result("http://x/ok", Some(200), LinkOutcome::Active))
            .record(result("http://x/404", Some(404), LinkOutcome::Broken))
            .finish(2);
        let lines = report.summary_lines();

        assert_eq!(lines[0], "=== Link Check Summary ===");
        assert!(lines.contains(&"Total Links Checked: 2".to_string()));
        assert!(lines.contains(&"URL: http://x/404".to_string()));
        assert!(lines.contains(&"Status: 404".to_string()));
        assert!(lines.contains(&"Text: No link text".to_string()));
        assert_eq!(
            lines.last().unwrap(),
            "Found 1 broken links out of 2 total links"
        );
    }

    #[test]
    fn test_json_shape() {
        let report = ReportBuilder::default()
            .record(result("http://x/404", Some(404), LinkOutcome::Broken))
            .finish(1);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["total_checked"], 1);
        assert_eq!(json["broken_details"][0]["status"], 404);
        assert_eq!(json["broken_details"][0]["outcome"], "broken");
    }
}
