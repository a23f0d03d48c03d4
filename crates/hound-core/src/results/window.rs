//! Expand one match record into its numbered line window.

use crate::results::model::{LineRecord, MatchRecord};

/// Turn a match into the ordered list of lines it covers.
///
/// Before-context lines come first, numbered up to `line_number - 1`, then the
/// match line itself, then the after-context. The output is strictly
/// increasing by line number and has exactly one match line.
///
/// Context lines whose number would fall outside `i64` are dropped.
pub fn build_window(m: &MatchRecord) -> Vec<LineRecord> {
    let base = m.line_number;
    let n_before = m.before.len() as i64;

    let mut lines = Vec::with_capacity(m.before.len() + 1 + m.after.len());

    lines.extend(m.before.iter().enumerate().filter_map(|(i, line)| {
        let number = base.checked_sub(n_before - i as i64)?;
        Some(LineRecord::context(number, line.as_str()))
    }));

    lines.push(LineRecord::matched(base, m.line.as_str()));

    lines.extend(m.after.iter().enumerate().filter_map(|(i, line)| {
        let number = base.checked_add(i as i64 + 1)?;
        Some(LineRecord::context(number, line.as_str()))
    }));

    lines
}
