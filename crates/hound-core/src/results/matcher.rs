use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::error::Result;
use crate::query::{param_value_to_bool, SearchParams};

/// Configuration options for compiling the highlight pattern.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatternOpts {
    /// Case-insensitive ("i")
    pub case_insensitive: bool,
    /// Unicode classes/word boundaries
    pub unicode: bool,
    /// Anchor-multiline ("m"): ^/$ match at internal line boundaries
    pub multi_line: bool,
}

impl Default for PatternOpts {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            unicode: true,
            multi_line: false,
        }
    }
}

/// Compiled query used to find match occurrences inside a result line.
#[derive(Debug, Clone)]
pub struct Pattern {
    inner: Regex,
}

impl Pattern {
    /// Compile a regex pattern.
    pub fn compile(pattern: &str, opts: &PatternOpts) -> Result<Self> {
        let inner = RegexBuilder::new(pattern)
            .case_insensitive(opts.case_insensitive)
            .unicode(opts.unicode)
            .multi_line(opts.multi_line)
            .build()?;
        Ok(Self { inner })
    }

    /// Compile the query the way the search bar submits it: trimmed, with
    /// the `i` flag deciding case sensitivity.
    pub fn from_params(params: &SearchParams) -> Result<Self> {
        let opts = PatternOpts {
            case_insensitive: param_value_to_bool(&params.i),
            ..PatternOpts::default()
        };
        Self::compile(params.q.trim(), &opts)
    }

    /// Leftmost match in `haystack`, as a byte range.
    #[inline]
    pub fn find(&self, haystack: &str) -> Option<Range<usize>> {
        self.inner.find(haystack).map(|m| m.range())
    }

    #[inline]
    pub fn is_match(&self, haystack: &str) -> bool {
        self.inner.is_match(haystack)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    /// Access the underlying `regex::Regex` if needed.
    #[inline]
    pub fn inner(&self) -> &Regex {
        &self.inner
    }
}

/// Quote `text` so that it compiles to a pattern matching it literally.
pub fn escape_regexp(text: &str) -> String {
    regex::escape(text)
}
