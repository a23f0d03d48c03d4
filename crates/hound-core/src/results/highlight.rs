//! Split result lines into plain and emphasized segments and render them as
//! HTML fragments.

use std::borrow::Cow;

use crate::results::matcher::Pattern;
use crate::results::model::LineRecord;

/// A run of raw (unescaped) line text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub emphasized: bool,
}

impl<'a> Segment<'a> {
    #[inline]
    pub fn plain(text: &'a str) -> Self {
        Self {
            text,
            emphasized: false,
        }
    }

    #[inline]
    pub fn emphasized(text: &'a str) -> Self {
        Self {
            text,
            emphasized: true,
        }
    }
}

/// Split a line into segments, emphasizing each match of `pattern`.
///
/// Context lines come back as a single plain segment. For match lines the
/// pattern is run against the unconsumed suffix again after every
/// occurrence, so anchors such as `^` apply to each suffix. Scanning stops
/// at the first zero-width occurrence and the rest of the line stays plain.
///
/// Concatenating the segment texts always reproduces `line.content`.
pub fn highlight<'a>(line: &'a LineRecord, pattern: &Pattern) -> Vec<Segment<'a>> {
    if !line.is_match {
        return vec![Segment::plain(&line.content)];
    }

    let mut segments = Vec::new();
    let mut rest = line.content.as_str();

    while let Some(m) = pattern.find(rest) {
        if m.is_empty() {
            break;
        }
        if m.start > 0 {
            segments.push(Segment::plain(&rest[..m.start]));
        }
        segments.push(Segment::emphasized(&rest[m.start..m.end]));
        rest = &rest[m.end..];
    }

    if !rest.is_empty() || segments.is_empty() {
        segments.push(Segment::plain(rest));
    }

    segments
}

/// Render segments as an HTML fragment, wrapping emphasized runs in `<em>`.
pub fn render_segments(segments: &[Segment<'_>]) -> String {
    let mut out = String::with_capacity(segments.iter().map(|s| s.text.len() + 9).sum());
    for segment in segments {
        if segment.emphasized {
            out.push_str("<em>");
            out.push_str(&escape_html(segment.text));
            out.push_str("</em>");
        } else {
            out.push_str(&escape_html(segment.text));
        }
    }
    out
}

/// HTML for one line, with matches highlighted.
pub fn content_for(line: &LineRecord, pattern: &Pattern) -> String {
    render_segments(&highlight(line, pattern))
}

/// Escape text for safe inclusion in HTML. Borrows when nothing needs
/// escaping.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    let Some(first) = text.find(|c: char| matches!(c, '&' | '<' | '>' | '"' | '\'')) else {
        return Cow::Borrowed(text);
    };

    let mut out = String::with_capacity(text.len() + 16);
    out.push_str(&text[..first]);
    for c in text[first..].chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
