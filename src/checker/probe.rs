// src/checker/probe.rs
// =============================================================================
// This module makes the actual HTTP request for a link.
//
// The validator never talks to reqwest directly. It asks a StatusProbe
// for the status code of a request and gets back either:
// - Ok(status): ANY status, including 404 and 500 (those are answers, not
//   failures)
// - Err(ProbeFailure): no status at all (timeout, DNS, refused connection...)
//
// ReqwestProbe is the real implementation. Tests swap in fakes.
// =============================================================================

use std::error::Error as StdError;
use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Method};
use serde::Serialize;
use url::Url;

use crate::error::Result;

/// One status-checking request.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub url: Url,
    pub method: Method,
    pub timeout: Duration,
    pub follow_redirects: bool,
}

/// Why a request produced no status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    DnsError,
    ConnectionFailed,
    SslError,
    TooManyRedirects,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// Issues status-checking requests.
pub trait StatusProbe {
    fn request(
        &self,
        request: ProbeRequest,
    ) -> impl Future<Output = std::result::Result<u16, ProbeFailure>> + Send;
}

/// StatusProbe backed by reqwest.
///
/// reqwest fixes the redirect policy per client, so we keep one client that
/// follows redirects and one that does not.
#[derive(Clone)]
pub struct ReqwestProbe {
    following: Client,
    not_following: Client,
}

impl ReqwestProbe {
    pub fn new(user_agent: &str) -> Result<Self> {
        let following = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        let not_following = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            following,
            not_following,
        })
    }
}

impl StatusProbe for ReqwestProbe {
    fn request(
        &self,
        request: ProbeRequest,
    ) -> impl Future<Output = std::result::Result<u16, ProbeFailure>> + Send {
        let client = if request.follow_redirects {
            &self.following
        } else {
            &self.not_following
        };

        // Build the request now so the future owns everything it needs
        let builder = client
            .request(request.method, request.url)
            .timeout(request.timeout);

        async move {
            match builder.send().await {
                Ok(response) => Ok(response.status().as_u16()),
                Err(e) => Err(categorize_error(e)),
            }
        }
    }
}

// Categorizes different error types from reqwest
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Too many redirects
fn categorize_error(error: reqwest::Error) -> ProbeFailure {
    let is_timeout = error.is_timeout();
    let is_redirect = error.is_redirect();
    let is_connect = error.is_connect();

    // Match on the source chain only: reqwest's own message embeds the URL,
    // and a path like /rustls-guide must not read as a TLS failure
    let error = error.without_url();
    let mut causes = Vec::new();
    let mut source = error.source();
    while let Some(inner) = source {
        causes.push(inner.to_string().to_lowercase());
        source = inner.source();
    }
    let mentions = |needles: &[&str]| {
        causes
            .iter()
            .any(|cause| needles.iter().any(|needle| cause.contains(needle)))
    };

    let (kind, message) = if is_timeout {
        (FailureKind::Timeout, "Request timed out".to_string())
    } else if is_redirect {
        (FailureKind::TooManyRedirects, "Too many redirects".to_string())
    } else if is_connect {
        // Connection errors often mean DNS issues, a failed handshake or
        // a host that is simply not listening
        if mentions(&["dns error", "failed to lookup address"]) {
            (FailureKind::DnsError, "Could not resolve hostname".to_string())
        } else if mentions(&["certificate", "tls", "ssl", "handshake"]) {
            (FailureKind::SslError, "SSL certificate error".to_string())
        } else {
            (FailureKind::ConnectionFailed, "Connection failed".to_string())
        }
    } else if mentions(&["certificate"]) {
        (FailureKind::SslError, "SSL certificate error".to_string())
    } else {
        let mut detail = error.to_string();
        for cause in &causes {
            detail.push_str(": ");
            detail.push_str(cause);
        }
        (FailureKind::Other, detail)
    };

    ProbeFailure { kind, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn probe_request(url: &str, method: Method) -> ProbeRequest {
        ProbeRequest {
            url: Url::parse(url).unwrap(),
            method,
            timeout: Duration::from_secs(5),
            follow_redirects: true,
        }
    }

    #[tokio::test]
    async fn test_error_status_is_returned_not_failed() {
        let mock_server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(410))
            .mount(&mock_server)
            .await;

        let probe = ReqwestProbe::new("test").unwrap();
        let url = format!("{}/gone", mock_server.uri());
        let status = probe.request(probe_request(&url, Method::HEAD)).await;
        assert_eq!(status, Ok(410));
    }

    #[tokio::test]
    async fn test_redirect_not_followed_when_disabled() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("location", "/new"),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let probe = ReqwestProbe::new("test").unwrap();
        let url = format!("{}/old", mock_server.uri());

        let followed = probe.request(probe_request(&url, Method::GET)).await;
        assert_eq!(followed, Ok(200));

        let mut request = probe_request(&url, Method::GET);
        request.follow_redirects = false;
        assert_eq!(probe.request(request).await, Ok(301));
    }

    #[tokio::test]
    async fn test_timeout_is_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&mock_server)
            .await;

        let probe = ReqwestProbe::new("test").unwrap();
        let mut request = probe_request(&format!("{}/slow", mock_server.uri()), Method::HEAD);
        request.timeout = Duration::from_millis(100);

        let failure = probe.request(request).await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::Timeout);
    }

    #[tokio::test]
    async fn test_refused_connection_ignores_words_in_url() {
        // Nothing listens on port 9 (discard) on a test machine
        let probe = ReqwestProbe::new("test").unwrap();

        for url in [
            "http://127.0.0.1:9/docs/rustls-guide",
            "http://127.0.0.1:9/how-to-resolve-dns",
            "http://127.0.0.1:9/ssl/certificate",
        ] {
            let failure = probe
                .request(probe_request(url, Method::HEAD))
                .await
                .unwrap_err();
            assert_eq!(failure.kind, FailureKind::ConnectionFailed, "{}", url);
            assert_eq!(failure.message, "Connection failed");
        }
    }
}
