//! Character encoding detection and transcoding.
//!
//! Editors hand over text, but files read from disk arrive as bytes. Span
//! offsets always refer to the UTF-8 text produced here, never to the raw
//! input bytes.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252, X_USER_DEFINED};
use regex::bytes::Regex;
use std::sync::LazyLock;

/// How far into the document charset declarations are looked for.
const SNIFF_LEN: usize = 1024;

/// `<meta charset="...">`
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>/;]+)"#).expect("valid regex")
});

/// `<meta http-equiv="Content-Type" content="...; charset=...">`
#[allow(clippy::expect_used)]
static CONTENT_TYPE_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#).expect("valid regex")
});

/// Detect the character encoding declared in the head of an HTML document.
///
/// A byte-order mark wins, then `<meta charset>`, then the `http-equiv`
/// form. Falls back to UTF-8.
///
/// A page that can spell out its own `<meta>` in ASCII is not UTF-16, so a
/// declared UTF-16 label means UTF-8. Only a BOM selects UTF-16.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(html) {
        return encoding;
    }

    let head = &html[..html.len().min(SNIFF_LEN)];

    [&*CHARSET_META_RE, &*CONTENT_TYPE_CHARSET_RE]
        .iter()
        .filter_map(|re| re.captures(head).and_then(|c| c.get(1)))
        .find_map(|label| Encoding::for_label(label.as_bytes()))
        .map_or(UTF_8, declared_encoding)
}

/// Overrides applied to a charset declared in a `<meta>` tag.
fn declared_encoding(encoding: &'static Encoding) -> &'static Encoding {
    if encoding == UTF_16LE || encoding == UTF_16BE {
        UTF_8
    } else if encoding == X_USER_DEFINED {
        WINDOWS_1252
    } else {
        encoding
    }
}

/// Transcode HTML bytes to a UTF-8 string.
///
/// Invalid sequences become U+FFFD rather than errors, so any byte input
/// yields text that can be scanned.
///
/// # Examples
///
/// ```
/// use ko_spans::encoding::transcode_to_utf8;
///
/// let html = b"<meta charset=\"iso-8859-1\"><!-- caf\xE9 -->";
/// assert!(transcode_to_utf8(html).contains("café"));
/// ```
#[must_use]
pub fn transcode_to_utf8(html: &[u8]) -> String {
    let encoding = detect_encoding(html);
    // decode() strips a BOM and handles the UTF-8 fast path itself
    let (decoded, _encoding_used, _had_errors) = encoding.decode(html);
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_defaults_to_utf8() {
        assert_eq!(detect_encoding(b"<!-- ko if: x --><!-- /ko -->"), UTF_8);
    }

    #[test]
    fn detect_from_meta_charset() {
        let html = br#"<html><head><meta charset="windows-1252"></head></html>"#;
        assert_eq!(detect_encoding(html), WINDOWS_1252);
    }

    #[test]
    fn detect_from_http_equiv() {
        let html = br#"<meta http-equiv="Content-Type" content="text/html; charset=ISO-8859-1">"#;
        // The WHATWG label table maps latin1 to windows-1252
        assert_eq!(detect_encoding(html), WINDOWS_1252);
    }

    #[test]
    fn detect_from_bom() {
        assert_eq!(detect_encoding(b"\xFF\xFE<\0!\0"), UTF_16LE);
        assert_eq!(detect_encoding(b"\xEF\xBB\xBF<p>"), UTF_8);
    }

    #[test]
    fn declared_utf16_is_read_as_utf8() {
        assert_eq!(detect_encoding(br#"<meta charset="utf-16">"#), UTF_8);
        assert_eq!(detect_encoding(br#"<meta charset="UTF-16BE">"#), UTF_8);
        assert_eq!(detect_encoding(br#"<meta charset='utf-16le'>"#), UTF_8);
        let html = br#"<meta http-equiv="Content-Type" content="text/html; charset=utf-16">"#;
        assert_eq!(detect_encoding(html), UTF_8);
    }

    #[test]
    fn declared_x_user_defined_is_read_as_windows_1252() {
        assert_eq!(detect_encoding(br#"<meta charset="x-user-defined">"#), WINDOWS_1252);
    }

    #[test]
    fn utf16_bom_still_wins_over_declaration() {
        let html = b"\xFF\xFE<\0m\0e\0t\0a\0 \0c\0h\0a\0r\0s\0e\0t\0=\0u\0t\0f\0-\08\0>\0";
        assert_eq!(detect_encoding(html), UTF_16LE);
    }

    #[test]
    fn transcode_declared_utf16_keeps_ascii_text() {
        let text = transcode_to_utf8(br#"<meta charset="utf-16"><!-- /ko -->"#);
        assert_eq!(text, r#"<meta charset="utf-16"><!-- /ko -->"#);
    }

    #[test]
    fn unknown_label_falls_back_to_utf8() {
        assert_eq!(detect_encoding(br#"<meta charset="no-such-charset">"#), UTF_8);
    }

    #[test]
    fn transcode_strips_bom_and_replaces_invalid_bytes() {
        assert_eq!(transcode_to_utf8(b"\xEF\xBB\xBF<!-- /ko -->"), "<!-- /ko -->");
        assert_eq!(transcode_to_utf8(b"a\xFFb"), "a\u{FFFD}b");
    }
}
