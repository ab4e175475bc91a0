//! The status taxonomy: which HTTP codes count as interesting and how they
//! are described and ordered in reports.

/// Codes reported in this order, independent of numeric order.
pub const PRIORITY_ORDER: [u16; 11] = [200, 401, 403, 500, 503, 429, 400, 301, 302, 307, 308];

/// Redirect codes whose `Location` header is recorded.
pub const REDIRECT_CODES: [u16; 4] = [301, 302, 307, 308];

/// Descriptions keyed by status code, in ascending numeric order.
const DESCRIPTIONS: [(u16, &str); 11] = [
    (200, "200 OK - Accessible"),
    (301, "301 Moved Permanently - Permanent redirect"),
    (302, "302 Found - Temporary redirect"),
    (307, "307 Temporary Redirect - Temporary redirect (method preserved)"),
    (308, "308 Permanent Redirect - Permanent redirect (method preserved)"),
    (400, "400 Bad Request - Malformed request, possible parameter injection point"),
    (401, "401 Unauthorized - Authentication required, possible weak credentials"),
    (403, "403 Forbidden - Access denied, resource exists"),
    (429, "429 Too Many Requests - Rate limited"),
    (500, "500 Internal Server Error - Server error, possibly vulnerable"),
    (503, "503 Service Unavailable - Unavailable (load balancer or maintenance)"),
];

/// Coarse class of an interesting status code, used for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Redirect,
    ClientError,
    ServerError,
}

/// Whether `code` belongs to the taxonomy.
pub fn is_interesting(code: u16) -> bool {
    DESCRIPTIONS.iter().any(|(c, _)| *c == code)
}

/// Whether `code` is one of the tracked redirect codes.
pub fn is_redirect(code: u16) -> bool {
    REDIRECT_CODES.contains(&code)
}

/// Full description, e.g. `"403 Forbidden - Access denied, resource exists"`.
pub fn description(code: u16) -> Option<&'static str> {
    DESCRIPTIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, d)| *d)
}

/// The meaning part of the description (after `" - "`).
pub fn short_description(code: u16) -> Option<&'static str> {
    description(code).map(|d| d.split_once(" - ").map_or(d, |(_, short)| short))
}

/// Taxonomy codes in ascending numeric order.
pub fn codes() -> impl Iterator<Item = u16> {
    DESCRIPTIONS.iter().map(|(c, _)| *c)
}

/// Classify a taxonomy code.
pub fn class(code: u16) -> Option<StatusClass> {
    if !is_interesting(code) {
        return None;
    }
    Some(match code {
        200..=299 => StatusClass::Success,
        300..=399 => StatusClass::Redirect,
        400..=499 => StatusClass::ClientError,
        _ => StatusClass::ServerError,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_covers_taxonomy() {
        let mut priority = PRIORITY_ORDER.to_vec();
        priority.sort_unstable();
        assert_eq!(priority, codes().collect::<Vec<_>>());
    }

    #[test]
    fn test_membership() {
        for code in [200, 301, 302, 307, 308, 400, 401, 403, 429, 500, 503] {
            assert!(is_interesting(code), "{code} should be interesting");
        }
        for code in [0, 100, 201, 204, 303, 304, 404, 405, 418, 502, 504] {
            assert!(!is_interesting(code), "{code} should not be interesting");
        }
    }

    #[test]
    fn test_redirects() {
        assert!(is_redirect(301));
        assert!(is_redirect(308));
        assert!(!is_redirect(303));
        assert!(!is_redirect(200));
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(short_description(429), Some("Rate limited"));
        assert!(description(403).unwrap().starts_with("403 Forbidden"));
        assert_eq!(description(404), None);
    }

    #[test]
    fn test_class() {
        assert_eq!(class(200), Some(StatusClass::Success));
        assert_eq!(class(307), Some(StatusClass::Redirect));
        assert_eq!(class(429), Some(StatusClass::ClientError));
        assert_eq!(class(503), Some(StatusClass::ServerError));
        assert_eq!(class(502), None);
    }
}
