//! Page title extraction for 200 responses.
//!
//! Bodies arrive capped at [`MAX_BODY_BYTES`], so a multi-byte sequence may
//! be cut at the end. Decoding tries the declared charset, then a fixed list
//! of candidate encodings, and takes the first that decodes the title cleanly.

use encoding_rs::Encoding;
use scraper::{Html, Selector};
use tracing::debug;

/// Upper bound on body bytes read for title extraction.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Recorded when the document has no usable `<title>`.
pub const NO_TITLE: &str = "No title";

/// Recorded when the response is not `text/html`.
pub const NON_HTML: &str = "Non-HTML content";

/// Recorded when the document could not be searched for a title.
pub const EXTRACTION_FAILED: &str = "Title extraction failed";

/// Candidate encodings, tried in order.
pub const FALLBACK_ENCODINGS: [&str; 5] = ["utf-8", "gbk", "gb2312", "iso-8859-1", "big5"];

const MAX_TITLE_CHARS: usize = 50;
const TRUNCATED_TITLE_CHARS: usize = 47;

/// Whether a `Content-Type` value denotes HTML.
pub fn is_html(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html"))
}

/// Extract the title from a (possibly truncated) response body.
///
/// Always returns a non-empty string: either the cleaned title or one of
/// [`NO_TITLE`], [`NON_HTML`], [`EXTRACTION_FAILED`].
pub fn extract_title(body: &[u8], content_type: Option<&str>) -> String {
    if !is_html(content_type) {
        return NON_HTML.to_string();
    }

    let html = decode_body(body, content_type);
    let selector = match Selector::parse("title") {
        Ok(selector) => selector,
        Err(e) => {
            debug!(error = %e, "title selector rejected");
            return EXTRACTION_FAILED.to_string();
        }
    };

    let document = Html::parse_document(&html);
    let raw = match document.select(&selector).next() {
        Some(element) => element.text().collect::<String>(),
        None => return NO_TITLE.to_string(),
    };

    let title = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if title.is_empty() {
        NO_TITLE.to_string()
    } else {
        truncate_title(&title)
    }
}

/// Cap a title at 50 characters, keeping 47 plus `"..."` when longer.
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() > MAX_TITLE_CHARS {
        let mut truncated: String = title.chars().take(TRUNCATED_TITLE_CHARS).collect();
        truncated.push_str("...");
        truncated
    } else {
        title.to_string()
    }
}

/// Encoding named by a `charset=` parameter, if encoding_rs knows it.
pub fn declared_charset(content_type: Option<&str>) -> Option<&'static Encoding> {
    content_type?
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
        .and_then(|(_, value)| Encoding::for_label(value.trim().trim_matches('"').as_bytes()))
}

/// Decode a body with the first candidate encoding that accepts its title.
///
/// The declared charset goes first, then [`FALLBACK_ENCODINGS`]. Only the
/// bytes up to `</title>` must decode cleanly; invalid sequences after it
/// are replaced. Falls back to a lossy decode with the last candidate.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let sample = title_prefix(bytes);
    let candidates = declared_charset(content_type).into_iter().chain(
        FALLBACK_ENCODINGS
            .iter()
            .filter_map(|label| Encoding::for_label(label.as_bytes())),
    );

    for encoding in candidates {
        if decodes_cleanly(encoding, sample) {
            debug!(encoding = encoding.name(), "decoded response body");
            return decode_lossy(encoding, bytes);
        }
    }

    let last = FALLBACK_ENCODINGS[FALLBACK_ENCODINGS.len() - 1];
    let encoding = Encoding::for_label(last.as_bytes()).unwrap_or(encoding_rs::BIG5);
    decode_lossy(encoding, bytes)
}

/// The body up to and including the first `</title>`, or all of it.
fn title_prefix(bytes: &[u8]) -> &[u8] {
    const CLOSE: &[u8] = b"</title>";
    bytes
        .windows(CLOSE.len())
        .position(|window| window.eq_ignore_ascii_case(CLOSE))
        .map_or(bytes, |pos| &bytes[..pos + CLOSE.len()])
}

fn decodes_cleanly(encoding: &'static Encoding, bytes: &[u8]) -> bool {
    if encoding == encoding_rs::UTF_8 {
        // Incomplete sequence at the very end: cut by the read cap.
        return match std::str::from_utf8(bytes) {
            Ok(_) => true,
            Err(e) => e.error_len().is_none(),
        };
    }
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .is_some()
}

fn decode_lossy(encoding: &'static Encoding, bytes: &[u8]) -> String {
    let bytes = if encoding == encoding_rs::UTF_8 {
        trim_incomplete_utf8(bytes)
    } else {
        bytes
    };
    encoding.decode_without_bom_handling(bytes).0.into_owned()
}

fn trim_incomplete_utf8(bytes: &[u8]) -> &[u8] {
    match std::str::from_utf8(bytes) {
        Err(e) if e.error_len().is_none() => &bytes[..e.valid_up_to()],
        _ => bytes,
    }
}
