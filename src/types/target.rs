//! Probe targets and host list input.
//!
//! A [`Target`] is one (host, port, protocol) combination. Hosts come from a
//! newline-delimited file, the same format the upstream discovery tools emit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

/// URL scheme used to reach a catalog port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    /// The URL scheme for this protocol.
    pub const fn scheme(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

/// A single (host, port, protocol) combination to probe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// Normalized host name (no scheme, path, or trailing slash).
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Scheme used to reach the port.
    pub protocol: Protocol,
}

impl Target {
    /// Create a new target.
    pub fn new(host: impl Into<String>, port: u16, protocol: Protocol) -> Self {
        Self {
            host: host.into(),
            port,
            protocol,
        }
    }

    /// Render the request URL, always with an explicit port.
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol.scheme(), self.host, self.port)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}

/// Error type for host list loading.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TargetError {
    #[error("input file '{0}' does not exist")]
    InputNotFound(PathBuf),
    #[error("failed to read input file '{path}': {reason}")]
    InputUnreadable { path: PathBuf, reason: String },
}

/// Strip a leading scheme, any path, and trailing slashes from a host entry.
///
/// `https://example.com/login/` becomes `example.com`. Entries without a
/// scheme only lose their trailing slashes.
pub fn normalize_host(raw: &str) -> String {
    let host = raw.trim();
    let host = match host
        .strip_prefix("http://")
        .or_else(|| host.strip_prefix("https://"))
    {
        Some(rest) => match rest.split_once('/') {
            Some((authority, path)) if authority.is_empty() => path,
            Some((authority, _)) => authority,
            None => rest,
        },
        None => host,
    };
    host.trim_end_matches('/').to_string()
}

/// Read a newline-delimited host list.
///
/// Lines are trimmed and blank lines skipped. An empty result is not an
/// error; the caller decides how to treat it.
pub fn read_host_list(path: &Path) -> Result<Vec<String>, TargetError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        IoErrorKind::NotFound => TargetError::InputNotFound(path.to_path_buf()),
        _ => TargetError::InputUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
