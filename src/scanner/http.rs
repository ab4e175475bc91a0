//! HTTP probe implementation.
//!
//! Sends one GET per target with browser-like headers, certificate
//! validation off, and redirects observed rather than followed. Only
//! responses whose status is in the taxonomy are inspected further.

use crate::scanner::cancel::CancellationFlag;
use crate::scanner::rate_limiter::RateLimiter;
use crate::scanner::redirect::resolve_location;
use crate::scanner::title::{extract_title, is_html, NON_HTML, MAX_BODY_BYTES};
use crate::scanner::traits::{ErrorKind, ProbeOutcome, Prober};
use crate::types::{status, Target};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{redirect, Client, Response};
use std::error::Error as StdError;
use std::io;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
    );
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers
}

/// HTTP prober.
///
/// Cheap to share: workers hold it behind an `Arc` and the underlying
/// client is safe for concurrent use.
pub struct HttpProber {
    client: Client,
    timeout: Duration,
    cancel: CancellationFlag,
    rate_limiter: Option<RateLimiter>,
}

impl HttpProber {
    /// Create a prober with a per-request timeout.
    ///
    /// The timeout bounds connect and body read together.
    pub fn new(timeout: Duration, cancel: CancellationFlag) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .danger_accept_invalid_certs(true)
            .redirect(redirect::Policy::none())
            .user_agent(USER_AGENT)
            .default_headers(browser_headers())
            .pool_max_idle_per_host(0)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            timeout,
            cancel,
            rate_limiter: None,
        })
    }

    /// Share a rate limiter across all requests.
    pub fn with_rate_limiter(mut self, rate_limiter: Option<RateLimiter>) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    /// The configured per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, target: &Target) -> reqwest::Result<ProbeOutcome> {
        let url = target.url();
        let mut response = self.client.get(&url).send().await?;
        let outcome = ProbeOutcome::response(target.clone(), response.status().as_u16());

        if !outcome.matched {
            debug!(url = %url, status = outcome.status_code, "status outside taxonomy");
            return Ok(outcome);
        }

        if status::is_redirect(outcome.status_code) {
            let redirect_url = response
                .headers()
                .get(header::LOCATION)
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .map(|location| resolve_location(&url, &location))
                .unwrap_or_default();
            return Ok(outcome.with_redirect(redirect_url));
        }

        if outcome.status_code == 200 {
            let content_type = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            if !is_html(content_type.as_deref()) {
                return Ok(outcome.with_title(NON_HTML));
            }

            let body = read_capped(&mut response, MAX_BODY_BYTES).await?;
            debug!(url = %url, bytes = body.len(), "read response body");
            let title = extract_title(&body, content_type.as_deref());
            return Ok(outcome.with_title(title));
        }

        Ok(outcome)
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, target: &Target) -> ProbeOutcome {
        if self.cancel.is_cancelled() {
            return ProbeOutcome::withdrawn(target.clone());
        }

        if let Some(limiter) = &self.rate_limiter {
            limiter.wait().await;
        }

        match self.fetch(target).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let kind = classify_error(&e);
                debug!(url = %target.url(), error = %e, kind = %kind, "probe failed");
                ProbeOutcome::failed(target.clone(), kind)
            }
        }
    }
}

/// Read at most `cap` bytes of the body. The rest is never pulled.
async fn read_capped(response: &mut Response, cap: usize) -> reqwest::Result<Vec<u8>> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if push_capped(&mut body, &chunk, cap) {
            break;
        }
    }
    Ok(body)
}

/// Append as much of `chunk` as fits under `cap`. Returns `true` once full.
fn push_capped(body: &mut Vec<u8>, chunk: &[u8], cap: usize) -> bool {
    let take = chunk.len().min(cap.saturating_sub(body.len()));
    body.extend_from_slice(&chunk[..take]);
    body.len() >= cap
}

/// Map a request failure onto an error kind.
fn classify_error(error: &reqwest::Error) -> ErrorKind {
    if error.is_timeout() {
        return ErrorKind::Timeout;
    }
    if error.is_connect() {
        return ErrorKind::Connection;
    }

    // Resets after connect only show up as io errors in the source chain.
    let mut source = error.source();
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            match io_err.kind() {
                io::ErrorKind::TimedOut => return ErrorKind::Timeout,
                io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::ConnectionRefused
                | io::ErrorKind::BrokenPipe => return ErrorKind::Connection,
                _ => {}
            }
        }
        source = err.source();
    }

    ErrorKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Protocol;

    #[test]
    fn test_prober_creation() {
        let prober = HttpProber::new(Duration::from_secs(5), CancellationFlag::new()).unwrap();
        assert_eq!(prober.timeout(), Duration::from_secs(5));
        assert!(prober.rate_limiter.is_none());
    }

    #[tokio::test]
    async fn test_cancelled_probe_is_withdrawn() {
        let cancel = CancellationFlag::new();
        cancel.cancel();
        let prober = HttpProber::new(Duration::from_secs(1), cancel).unwrap();

        let target = Target::new("example.invalid", 80, Protocol::Http);
        let outcome = prober.probe(&target).await;

        assert!(!outcome.matched);
        assert_eq!(outcome.status_code, 0);
        assert_eq!(outcome.error_kind, ErrorKind::None);
    }

    #[test]
    fn test_push_capped_stops_at_cap() {
        let mut body = Vec::new();
        assert!(!push_capped(&mut body, &[1; 6], 10));
        assert!(push_capped(&mut body, &[2; 6], 10));
        assert_eq!(body.len(), 10);
        assert_eq!(&body[6..], &[2; 4]);

        assert!(push_capped(&mut body, &[3; 6], 10));
        assert_eq!(body.len(), 10);
    }

    #[test]
    fn test_push_capped_exact_fit() {
        let mut body = Vec::new();
        assert!(push_capped(&mut body, b"abcd", 4));
        assert_eq!(body, b"abcd");
    }

    #[tokio::test]
    async fn test_read_capped_large_body() {
        use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'x'; 3 * MAX_BODY_BYTES]))
            .mount(&mock_server)
            .await;

        let mut response = reqwest::get(mock_server.uri()).await.unwrap();
        let body = read_capped(&mut response, MAX_BODY_BYTES).await.unwrap();
        assert_eq!(body.len(), MAX_BODY_BYTES);

        let mut response = reqwest::get(mock_server.uri()).await.unwrap();
        let body = read_capped(&mut response, 100).await.unwrap();
        assert_eq!(body.len(), 100);
    }

    #[test]
    fn test_browser_headers() {
        let headers = browser_headers();
        assert!(headers.contains_key(header::ACCEPT));
        assert!(headers.contains_key(header::ACCEPT_LANGUAGE));
        assert_eq!(headers[header::UPGRADE_INSECURE_REQUESTS], "1");
    }
}
