//! HTML Comment Scanner
//!
//! Tolerant, position-preserving discovery of comment nodes in HTML source.
//!
//! Tree-building parsers normalize their input (newlines, NUL bytes, misnested
//! markup) and drop source positions, which makes their comment nodes useless
//! for highlighting. This scanner follows the tokenizer rules that decide what
//! counts as a comment and reports each one as a slice of the caller's text:
//!
//! - `<!--` opens a comment that closes at the first `-->` or `--!>`
//! - `<!-->` and `<!--->` are empty comments
//! - raw-text elements (`<script>`, `<style>`, ...) hide their content
//! - inside `<script>`, a `<!--` escape with a nested `<script>` keeps the
//!   first `</script>` from ending the element
//! - quoted attribute values may contain `>` and `<!--`
//!
//! Malformed input never fails the scan. A construct left open at the end of
//! the input simply contributes nothing.

use memchr::{memchr, memchr2, memmem};

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "textarea", "title", "xmp", "iframe", "noembed", "noframes",
];

/// A comment found in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentNode<'a> {
    /// Byte offset of the opening `<!--`.
    pub position: usize,

    /// Exact source text of the comment, delimiters included.
    pub outer_html: &'a str,

    /// Comment text between the delimiters.
    pub comment: &'a str,
}

/// Returns every comment node in `text`, in document order.
#[must_use]
pub fn comments(text: &str) -> Vec<CommentNode<'_>> {
    let bytes = text.as_bytes();
    let mut nodes = Vec::new();
    let mut pos = 0;

    while let Some(offset) = bytes.get(pos..).and_then(|rest| memchr(b'<', rest)).map(|i| pos + i) {
        let rest = &bytes[offset..];

        let next = if rest.starts_with(b"<!--") {
            scan_comment(text, offset).map(|node| {
                let end = node.position + node.outer_html.len();
                nodes.push(node);
                end
            })
        } else if rest.starts_with(b"</") || rest.starts_with(b"<!") || rest.starts_with(b"<?") {
            // End tags, doctypes and bogus comments run to the next '>'
            memchr(b'>', &rest[2..]).map(|gt| offset + 2 + gt + 1)
        } else if rest.get(1).is_some_and(u8::is_ascii_alphabetic) {
            scan_start_tag(bytes, offset)
        } else {
            // A stray '<' is plain text
            Some(offset + 1)
        };

        match next {
            Some(next) => pos = next,
            None => break,
        }
    }

    nodes
}

/// Scans the comment opening at `offset`, or `None` if it is never closed.
fn scan_comment(text: &str, offset: usize) -> Option<CommentNode<'_>> {
    let bytes = text.as_bytes();
    let body = offset + 4;
    let rest = &bytes[body..];

    let (inner_end, end) = if rest.starts_with(b">") {
        (body, body + 1)
    } else if rest.starts_with(b"->") {
        (body, body + 2)
    } else {
        find_comment_close(bytes, body)?
    };

    Some(CommentNode {
        position: offset,
        outer_html: &text[offset..end],
        comment: &text[body..inner_end],
    })
}

/// Finds the first `-->` or `--!>` at or after `from`.
///
/// Returns `(inner_end, end)`: where the comment text stops and the offset
/// just past the closing delimiter.
fn find_comment_close(bytes: &[u8], from: usize) -> Option<(usize, usize)> {
    let mut pos = from;
    while let Some(dash) = bytes.get(pos..).and_then(|rest| memmem::find(rest, b"--")).map(|i| pos + i) {
        let after = &bytes[dash + 2..];
        if after.starts_with(b">") {
            return Some((dash, dash + 3));
        }
        if after.starts_with(b"!>") {
            return Some((dash, dash + 4));
        }
        pos = dash + 1;
    }
    None
}

/// Skips a start tag beginning at `offset`.
///
/// Returns the offset at which scanning resumes: just past the tag, or for
/// raw-text elements the start of their end tag. `None` stops the scan.
fn scan_start_tag(bytes: &[u8], offset: usize) -> Option<usize> {
    let name_start = offset + 1;
    let name_end = bytes[name_start..]
        .iter()
        .position(|b| b.is_ascii_whitespace() || *b == b'/' || *b == b'>')
        .map_or(bytes.len(), |p| name_start + p);
    let tag_end = skip_attributes(bytes, name_end)?;
    let name = &bytes[name_start..name_end];

    if name.eq_ignore_ascii_case(b"plaintext") {
        return None;
    }

    if name.eq_ignore_ascii_case(b"script") {
        return find_script_end(bytes, tag_end);
    }

    if RAW_TEXT_ELEMENTS
        .iter()
        .any(|raw| name.eq_ignore_ascii_case(raw.as_bytes()))
    {
        return find_end_tag(bytes, tag_end, name);
    }

    Some(tag_end)
}

/// Skips attributes up to and including the closing `>` of a tag.
///
/// A quote only opens a value directly after `=`, so stray apostrophes in
/// attribute names do not swallow the rest of the document.
fn skip_attributes(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    let mut last = 0u8;

    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                    last = b;
                }
            }
            None => match b {
                b'>' => return Some(i + 1),
                b'"' | b'\'' if last == b'=' => quote = Some(b),
                _ if b.is_ascii_whitespace() => {}
                _ => last = b,
            },
        }
    }

    None
}

/// Finds the `</name` end tag (case-insensitive) at or after `from`.
fn find_end_tag(bytes: &[u8], from: usize, name: &[u8]) -> Option<usize> {
    let mut pos = from;
    while let Some(lt) = bytes.get(pos..).and_then(|rest| memmem::find(rest, b"</")).map(|i| pos + i) {
        if tag_named(&bytes[lt..], b"</", name) {
            return Some(lt);
        }
        pos = lt + 2;
    }
    None
}

/// Tokenizer states for script content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScriptState {
    Data,
    /// Inside `<!--`. `</script>` still ends the element.
    Escaped,
    /// Inside `<!-- <script>`. `</script>` only leaves this state.
    DoubleEscaped,
}

/// Finds the `</script` end tag that closes a script element whose content
/// starts at `from`.
fn find_script_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut state = ScriptState::Data;
    let mut pos = from;

    while let Some(at) = bytes.get(pos..).and_then(|rest| memchr2(b'<', b'-', rest)).map(|i| pos + i) {
        let rest = &bytes[at..];
        pos = at + 1;

        match state {
            ScriptState::Data => {
                if rest.starts_with(b"<!--") {
                    pos = at + 4;
                    // The dashes of "<!--" also count towards "-->"
                    let after = &bytes[pos..];
                    if after.starts_with(b">") {
                        pos += 1;
                    } else if after.starts_with(b"->") {
                        pos += 2;
                    } else {
                        state = ScriptState::Escaped;
                    }
                } else if tag_named(rest, b"</", b"script") {
                    return Some(at);
                }
            }
            ScriptState::Escaped => {
                if rest.starts_with(b"-->") {
                    state = ScriptState::Data;
                    pos = at + 3;
                } else if tag_named(rest, b"</", b"script") {
                    return Some(at);
                } else if tag_named(rest, b"<", b"script") {
                    state = ScriptState::DoubleEscaped;
                    pos = at + 7;
                }
            }
            ScriptState::DoubleEscaped => {
                if rest.starts_with(b"-->") {
                    state = ScriptState::Data;
                    pos = at + 3;
                } else if tag_named(rest, b"</", b"script") {
                    state = ScriptState::Escaped;
                    pos = at + 8;
                }
            }
        }
    }

    None
}

/// Whether `rest` starts with `prefix` followed by the tag `name`
/// (case-insensitive) and a name terminator or the end of input.
fn tag_named(rest: &[u8], prefix: &[u8], name: &[u8]) -> bool {
    let name_start = prefix.len();
    let name_end = name_start + name.len();
    let name_matches = rest.starts_with(prefix)
        && rest
            .get(name_start..name_end)
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name));
    let terminated = match rest.get(name_end) {
        None => true,
        Some(b) => b.is_ascii_whitespace() || *b == b'/' || *b == b'>',
    };
    name_matches && terminated
}
