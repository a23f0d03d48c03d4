//! Merge per-match line windows into contiguous display blocks.
//!
//! Windows must arrive sorted by match line number (the search API reports
//! one file's matches in file order). Under that ordering at most one block
//! is ever open, so a single left-to-right sweep suffices and no finished
//! block is reopened.

use crate::results::model::{Block, LineRecord, MatchRecord};
use crate::results::window::build_window;

/// Sentinel for "no open block": every real line number is greater.
const NO_BLOCK: i64 = -1;

/// Coalesce one file's matches into blocks.
///
/// Windows that overlap the open block extend it; a window that starts past
/// the open block's last line closes it and starts a new one. A line reported
/// by several windows appears once, and it is a match line if any of those
/// windows marked it as one.
///
/// Unsorted input yields unspecified blocks but never panics.
pub fn coalesce(matches: &[MatchRecord]) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;

    for window in matches.iter().map(build_window) {
        let max = current.as_ref().map_or(NO_BLOCK, Block::end);
        let Some(first) = window.first() else {
            continue;
        };

        if first.number > max {
            blocks.extend(current.take());
            current = Block::from_window(window);
            continue;
        }

        match current.as_mut() {
            Some(block) => merge_window(block, window, max),
            None => current = Block::from_window(window),
        }
    }

    blocks.extend(current);

    tracing::trace!(
        matches = matches.len(),
        blocks = blocks.len(),
        "coalesced match windows"
    );

    blocks
}

/// Fold an overlapping window into the open block whose last line is `max`.
fn merge_window(block: &mut Block, window: Vec<LineRecord>, max: i64) {
    for line in window {
        if line.number > max {
            block.push(line);
        } else if line.is_match {
            // Lines before the block's start only occur with unsorted input.
            if let Some(existing) = block.line_mut(line.number) {
                existing.is_match = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(block: &Block) -> Vec<&str> {
        block.lines().iter().map(|l| l.content.as_str()).collect()
    }

    fn flags(block: &Block) -> Vec<bool> {
        block.lines().iter().map(|l| l.is_match).collect()
    }

    #[test]
    fn test_non_overlap() {
        let subj = vec![
            MatchRecord::new(40, "c").with_context(["a", "b"], ["d", "e"]),
            MatchRecord::new(50, "n").with_context(["l", "m"], ["o", "p"]),
        ];

        let blocks = coalesce(&subj);

        assert_eq!(blocks.len(), 2);
        assert_eq!(lines(&blocks[0]), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(flags(&blocks[0]), vec![false, false, true, false, false]);
        assert_eq!(blocks[0].start(), 38);
        assert_eq!(lines(&blocks[1]), vec!["l", "m", "n", "o", "p"]);
        assert_eq!(blocks[1].start(), 48);
    }

    #[test]
    fn test_non_overlap_without_context() {
        let subj = vec![MatchRecord::new(40, "a"), MatchRecord::new(50, "b")];

        let blocks = coalesce(&subj);

        assert_eq!(blocks.len(), 2);
        assert_eq!(lines(&blocks[0]), vec!["a"]);
        assert_eq!(flags(&blocks[0]), vec![true]);
        assert_eq!(blocks[0].start(), 40);
        assert_eq!(lines(&blocks[1]), vec!["b"]);
        assert_eq!(blocks[1].start(), 50);
    }

    #[test]
    fn test_overlapping_in_before() {
        let subj = vec![
            MatchRecord::new(40, "c").with_context(["a", "b"], ["d", "e"]),
            MatchRecord::new(44, "g").with_context(["e", "f"], ["h", "i"]),
        ];

        let blocks = coalesce(&subj);

        assert_eq!(blocks.len(), 1);
        assert_eq!(
            lines(&blocks[0]),
            vec!["a", "b", "c", "d", "e", "f", "g", "h", "i"]
        );
        assert_eq!(
            flags(&blocks[0]),
            vec![false, false, true, false, false, false, true, false, false]
        );
        assert_eq!(blocks[0].start(), 38);
    }

    #[test]
    fn test_overlapping_in_after() {
        let subj = vec![
            MatchRecord::new(40, "c").with_context(["a", "b"], ["d", "e"]),
            MatchRecord::new(41, "d").with_context(["b", "c"], ["e", "f"]),
        ];

        let blocks = coalesce(&subj);

        assert_eq!(blocks.len(), 1);
        assert_eq!(lines(&blocks[0]), vec!["a", "b", "c", "d", "e", "f"]);
        assert_eq!(flags(&blocks[0]), vec![false, false, true, true, false, false]);
    }

    #[test]
    fn test_overlap_on_match() {
        let subj = vec![
            MatchRecord::new(40, "c").with_context(["a", "b"], ["d", "e"]),
            MatchRecord::new(42, "e").with_context(["c", "d"], ["f", "g"]),
        ];

        let blocks = coalesce(&subj);

        assert_eq!(blocks.len(), 1);
        assert_eq!(lines(&blocks[0]), vec!["a", "b", "c", "d", "e", "f", "g"]);
        assert_eq!(
            flags(&blocks[0]),
            vec![false, false, true, false, true, false, false]
        );
    }

    #[test]
    fn test_matches_to_end_of_file() {
        let file = [
            "import analytics.sequence._;",
            "import analytics._;",
            "println(\"Try running\")",
            "println(\"val visits = VisitExplorer(100)\");",
        ];

        let subj = vec![
            MatchRecord::new(3, file[2]).with_context([file[0], file[1]], [file[3]]),
            MatchRecord::new(4, file[3]).with_context([file[1], file[2]], Vec::<&str>::new()),
        ];

        let blocks = coalesce(&subj);

        assert_eq!(blocks.len(), 1);
        assert_eq!(lines(&blocks[0]), file.to_vec());
        assert_eq!(flags(&blocks[0]), vec![false, false, true, true]);
        assert_eq!(blocks[0].start(), 1);
    }

    #[test]
    fn test_overlap_two_line_context() {
        let subj = vec![
            MatchRecord::new(10, "10").with_context(["8", "9"], ["11", "12"]),
            MatchRecord::new(12, "12").with_context(["10", "11"], ["13", "14"]),
        ];

        let blocks = coalesce(&subj);

        assert_eq!(blocks.len(), 1);
        assert_eq!((blocks[0].start(), blocks[0].end()), (8, 14));
        let matched: Vec<i64> = blocks[0]
            .lines()
            .iter()
            .filter(|l| l.is_match)
            .map(|l| l.number)
            .collect();
        assert_eq!(matched, vec![10, 12]);
    }

    #[test]
    fn test_gap_keeps_blocks_apart() {
        let subj = vec![
            MatchRecord::new(10, "10").with_context(["9"], ["11"]),
            MatchRecord::new(20, "20").with_context(["19"], ["21"]),
        ];

        let blocks = coalesce(&subj);

        assert_eq!(blocks.len(), 2);
        assert_eq!((blocks[0].start(), blocks[0].end()), (9, 11));
        assert_eq!((blocks[1].start(), blocks[1].end()), (19, 21));
    }

    #[test]
    fn test_adjacent_windows_stay_separate() {
        // 9..=11 and 12..=14 touch but do not overlap.
        let subj = vec![
            MatchRecord::new(10, "10").with_context(["9"], ["11"]),
            MatchRecord::new(13, "13").with_context(["12"], ["14"]),
        ];

        let blocks = coalesce(&subj);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].end(), 11);
        assert_eq!(blocks[1].start(), 12);
    }

    #[test]
    fn test_multiple_overlapping() {
        let subj = vec![
            MatchRecord::new(5, "5").with_context(["4"], ["6"]),
            MatchRecord::new(6, "6").with_context(["5"], ["7"]),
            MatchRecord::new(7, "7").with_context(["6"], ["8"]),
            MatchRecord::new(9, "9").with_context(["8"], ["10"]),
        ];

        let blocks = coalesce(&subj);

        assert_eq!(blocks.len(), 1);
        assert_eq!((blocks[0].start(), blocks[0].end()), (4, 10));
        assert_eq!(
            flags(&blocks[0]),
            vec![false, true, true, true, false, true, false]
        );
    }

    #[test]
    fn test_contained_window_only_marks_matches() {
        // Second window (11..=11) sits inside the first (8..=14).
        let subj = vec![
            MatchRecord::new(11, "11").with_context(["8", "9", "10"], ["12", "13", "14"]),
            MatchRecord::new(11, "11"),
        ];

        let blocks = coalesce(&subj);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].len(), 7);
        assert_eq!(blocks[0].lines().iter().filter(|l| l.is_match).count(), 1);
    }

    #[test]
    fn test_single_match_is_its_window() {
        let m = MatchRecord::new(3, "c").with_context(["a", "b"], ["d"]);
        let blocks = coalesce(std::slice::from_ref(&m));

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines(), build_window(&m).as_slice());
    }

    #[test]
    fn test_empty_input() {
        assert!(coalesce(&[]).is_empty());
    }

    #[test]
    fn test_unsorted_input_does_not_panic() {
        let subj = vec![
            MatchRecord::new(20, "20").with_context(["19"], ["21"]),
            MatchRecord::new(3, "3").with_context(["2"], ["4"]),
            MatchRecord::new(-5, "neg").with_context(["x", "y"], Vec::<&str>::new()),
        ];

        let blocks = coalesce(&subj);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start(), 19);
    }

    #[test]
    fn test_line_numbers_at_i64_limits() {
        let subj = vec![
            MatchRecord::new(i64::MIN, "min").with_context(["below"], ["above"]),
            MatchRecord::new(i64::MAX - 1, "a").with_context(Vec::<&str>::new(), ["b", "c"]),
            MatchRecord::new(i64::MAX, "b").with_context(["a"], ["past"]),
        ];

        let blocks = coalesce(&subj);

        assert_eq!(blocks.len(), 2);
        assert_eq!((blocks[0].start(), blocks[0].end()), (i64::MIN, i64::MIN + 1));
        assert_eq!((blocks[1].start(), blocks[1].end()), (i64::MAX - 1, i64::MAX));
        assert_eq!(flags(&blocks[1]), vec![true, true]);
    }
}
