//! Resolution of `Location` headers on redirect responses.

use url::Url;

/// Resolve a `Location` value against the URL that produced it.
///
/// - `/path` is joined to the request URL.
/// - `http://` and `https://` values are kept verbatim.
/// - Anything else is treated as a path from the request root.
///
/// Values that cannot be joined are kept verbatim rather than dropped.
pub fn resolve_location(request_url: &str, location: &str) -> String {
    if location.starts_with("http://") || location.starts_with("https://") {
        return location.to_string();
    }

    let relative = if location.starts_with('/') {
        location.to_string()
    } else {
        format!("/{}", location.trim_start_matches('/'))
    };

    Url::parse(request_url)
        .and_then(|base| base.join(&relative))
        .map(String::from)
        .unwrap_or_else(|_| location.to_string())
}
