//! Prober trait abstraction.
//!
//! Defines the outcome of a single probe and a common interface for probe
//! implementations, so the domain scanner and orchestrator can be driven by
//! a fake in tests.

use crate::types::{status, Protocol, Target};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a probe produced no response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// A response was received, or the probe was withdrawn before it began.
    #[default]
    None,
    /// The request timed out.
    Timeout,
    /// Connection refused, DNS failure, or reset.
    Connection,
    /// Any other request failure.
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Timeout => write!(f, "timeout"),
            Self::Connection => write!(f, "connection"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Result of probing a single target.
///
/// `matched` holds exactly when `status_code` is in the status taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// The target that was probed.
    pub target: Target,
    /// Whether the status code is in the taxonomy.
    pub matched: bool,
    /// Response status, 0 when no response was received.
    pub status_code: u16,
    /// The request URL.
    pub url: String,
    /// Page title (200 responses only).
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub title: String,
    /// Resolved `Location` target (redirect responses only).
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub redirect_url: String,
    /// Failure class when no response was received.
    pub error_kind: ErrorKind,
}

impl ProbeOutcome {
    /// Outcome for a received response.
    pub fn response(target: Target, status_code: u16) -> Self {
        let url = target.url();
        Self {
            target,
            matched: status::is_interesting(status_code),
            status_code,
            url,
            title: String::new(),
            redirect_url: String::new(),
            error_kind: ErrorKind::None,
        }
    }

    /// Outcome for a probe that never got a response.
    pub fn failed(target: Target, error_kind: ErrorKind) -> Self {
        let url = target.url();
        Self {
            target,
            matched: false,
            status_code: 0,
            url,
            title: String::new(),
            redirect_url: String::new(),
            error_kind,
        }
    }

    /// Outcome for a probe withdrawn by cancellation.
    pub fn withdrawn(target: Target) -> Self {
        Self::failed(target, ErrorKind::None)
    }

    /// Set the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the redirect target.
    pub fn with_redirect(mut self, redirect_url: impl Into<String>) -> Self {
        self.redirect_url = redirect_url.into();
        self
    }

    /// The probed port.
    pub fn port(&self) -> u16 {
        self.target.port
    }

    /// The probed protocol.
    pub fn protocol(&self) -> Protocol {
        self.target.protocol
    }
}

/// Trait for probe implementations.
///
/// A probe never fails: every error is folded into the returned outcome's
/// [`ErrorKind`].
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe a single target.
    async fn probe(&self, target: &Target) -> ProbeOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Target {
        Target::new("example.com", 80, Protocol::Http)
    }

    #[test]
    fn test_response_matches_taxonomy() {
        assert!(ProbeOutcome::response(target(), 403).matched);
        assert!(!ProbeOutcome::response(target(), 404).matched);
        assert!(!ProbeOutcome::response(target(), 502).matched);
    }

    #[test]
    fn test_failed_outcome() {
        let outcome = ProbeOutcome::failed(target(), ErrorKind::Timeout);
        assert!(!outcome.matched);
        assert_eq!(outcome.status_code, 0);
        assert_eq!(outcome.url, "http://example.com:80");
        assert_eq!(outcome.error_kind, ErrorKind::Timeout);
    }

    #[test]
    fn test_withdrawn_is_not_an_error() {
        let outcome = ProbeOutcome::withdrawn(target());
        assert!(!outcome.matched);
        assert_eq!(outcome.error_kind, ErrorKind::None);
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::Timeout.to_string(), "timeout");
        assert_eq!(ErrorKind::Connection.to_string(), "connection");
    }
}
