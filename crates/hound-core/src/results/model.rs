//! results/model.rs — search result primitives shared by the window,
//! coalescing and highlighting passes.
//!
//! MatchRecord / FileMatch: the shapes the search API reports
//! LineRecord: one numbered line tagged with its match state
//! Block: a contiguous run of lines rendered together

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One matching line reported by the search API, with its context.
///
/// - `line_number` is **1-based**.
/// - `before` / `after` are the context lines immediately around the match,
///   in file order. The server sends `null` for missing context.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MatchRecord {
    pub line: String,
    pub line_number: i64,
    #[serde(default, deserialize_with = "nullable_lines")]
    pub before: Vec<String>,
    #[serde(default, deserialize_with = "nullable_lines")]
    pub after: Vec<String>,
}

impl MatchRecord {
    /// Build a record with no context lines.
    #[inline]
    pub fn new(line_number: i64, line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            line_number,
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// Attach context lines (builder-style; consumes `self`).
    #[inline]
    #[must_use]
    pub fn with_context<B, A>(mut self, before: B, after: A) -> Self
    where
        B: IntoIterator,
        B::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        self.before = before.into_iter().map(Into::into).collect();
        self.after = after.into_iter().map(Into::into).collect();
        self
    }

    /// Line number of the first line in this record's window.
    #[inline]
    #[must_use]
    pub fn first_line(&self) -> i64 {
        self.line_number.saturating_sub(self.before.len() as i64)
    }

    /// Line number of the last line in this record's window.
    #[inline]
    #[must_use]
    pub fn last_line(&self) -> i64 {
        self.line_number.saturating_add(self.after.len() as i64)
    }
}

fn nullable_lines<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// All matches within one file, sorted by line number.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileMatch {
    pub filename: String,
    #[serde(default, deserialize_with = "nullable_matches")]
    pub matches: Vec<MatchRecord>,
}

fn nullable_matches<'de, D>(deserializer: D) -> std::result::Result<Vec<MatchRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<MatchRecord>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A single numbered line of a file.
///
/// `is_match` is true only when this exact line was reported as a match by
/// at least one contributing `MatchRecord`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineRecord {
    pub number: i64,
    pub content: String,
    #[serde(rename = "Match")]
    pub is_match: bool,
}

impl LineRecord {
    #[inline]
    pub fn context(number: i64, content: impl Into<String>) -> Self {
        Self {
            number,
            content: content.into(),
            is_match: false,
        }
    }

    #[inline]
    pub fn matched(number: i64, content: impl Into<String>) -> Self {
        Self {
            number,
            content: content.into(),
            is_match: true,
        }
    }
}

/// A contiguous region of one file.
///
/// Invariants:
/// - never empty;
/// - line numbers run `start, start + 1, ...` with no gaps or duplicates,
///   so the line numbered `n` lives at index `n - start`.
///
/// Serialized as the plain array of its lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    start: i64,
    lines: Vec<LineRecord>,
}

impl Block {
    /// Open a block from a freshly built window. Returns `None` for an
    /// empty window.
    pub(crate) fn from_window(lines: Vec<LineRecord>) -> Option<Self> {
        let start = lines.first()?.number;
        Some(Self { start, lines })
    }

    /// First line number in the block.
    #[inline]
    #[must_use]
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Last line number in the block (inclusive).
    #[inline]
    #[must_use]
    pub fn end(&self) -> i64 {
        self.start.saturating_add(self.lines.len() as i64 - 1)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always false for blocks built by the coalescer.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[inline]
    pub fn lines(&self) -> &[LineRecord] {
        &self.lines
    }

    /// The line numbered `number`, if it falls inside this block.
    #[inline]
    pub fn line(&self, number: i64) -> Option<&LineRecord> {
        self.lines.get(self.offset_of(number)?)
    }

    #[inline]
    pub(crate) fn line_mut(&mut self, number: i64) -> Option<&mut LineRecord> {
        let idx = self.offset_of(number)?;
        self.lines.get_mut(idx)
    }

    #[inline]
    pub(crate) fn push(&mut self, line: LineRecord) {
        debug_assert_eq!(line.number, self.end() + 1);
        self.lines.push(line);
    }

    #[inline]
    fn offset_of(&self, number: i64) -> Option<usize> {
        usize::try_from(number.checked_sub(self.start)?).ok()
    }

    pub fn into_lines(self) -> Vec<LineRecord> {
        self.lines
    }
}

impl<'a> IntoIterator for &'a Block {
    type Item = &'a LineRecord;
    type IntoIter = std::slice::Iter<'a, LineRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.lines.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_record_accepts_null_context() {
        let json = r#"{"Line":"c","LineNumber":40,"Before":null,"After":["d"]}"#;
        let m: MatchRecord = serde_json::from_str(json).unwrap();

        assert!(m.before.is_empty());
        assert_eq!(m.after, vec!["d"]);
        assert_eq!(m.first_line(), 40);
        assert_eq!(m.last_line(), 41);
    }

    #[test]
    fn test_match_record_missing_context() {
        let json = r#"{"Line":"c","LineNumber":7}"#;
        let m: MatchRecord = serde_json::from_str(json).unwrap();
        assert_eq!(m, MatchRecord::new(7, "c"));
    }

    #[test]
    fn test_line_record_wire_names() {
        let line = LineRecord::matched(3, "x");
        let v = serde_json::to_value(&line).unwrap();
        assert_eq!(v, serde_json::json!({"Number": 3, "Content": "x", "Match": true}));
    }

    #[test]
    fn test_block_lookup_by_number() {
        let block = Block::from_window(vec![
            LineRecord::context(8, "a"),
            LineRecord::matched(9, "b"),
            LineRecord::context(10, "c"),
        ])
        .unwrap();

        assert_eq!(block.start(), 8);
        assert_eq!(block.end(), 10);
        assert_eq!(block.line(9).map(|l| l.content.as_str()), Some("b"));
        assert!(block.line(7).is_none());
        assert!(block.line(11).is_none());
        assert!(Block::from_window(Vec::new()).is_none());
    }
}
