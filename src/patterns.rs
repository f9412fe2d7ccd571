//! Compiled regex patterns for Knockout comment recognition.
//!
//! All patterns are compiled once at first use via `LazyLock`. They are
//! matched against the comment text between `<!--` and `-->`, and anchored to
//! the whole of it: `^`/`$` without the `m` flag match only at the ends.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Opening container comment: ` ko name: expression`.
///
/// At least one space must precede `ko`, so `<!--ko text: foo-->` is plain
/// markup. The `s` flag lets the expression run across lines.
///
/// Captures: `binding` (the binding name), `expression` (everything after the
/// colon).
pub static KNOCKOUT_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^ +ko +(?P<binding>[A-Za-z0-9_]+) *:(?P<expression>.*)$")
        .expect("KNOCKOUT_OPEN regex")
});

/// Closing container comment: `/ko` with optional surrounding spaces.
pub static KNOCKOUT_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ */ko *$").expect("KNOCKOUT_CLOSE regex"));
