//! Page-wide state shared by the free binding functions.
//!
//! The excluded files page has no search session; it loads the repository
//! list once and links every row through it.

use std::cell::RefCell;

use hound_core::{Pattern, PatternOpts, RepoStore, Result};

thread_local! {
    static REPOS: RefCell<RepoStore> = RefCell::new(RepoStore::default());

    /// Last pattern compiled for `content_for`, keyed by source and case flag.
    static LAST_PATTERN: RefCell<Option<(String, bool, Pattern)>> = const { RefCell::new(None) };
}

/// Replace the page's repository list.
pub fn set_repos(store: RepoStore) {
    REPOS.with(|repos| *repos.borrow_mut() = store);
}

/// Run `f` against the page's repository list.
pub fn with_repos<R>(f: impl FnOnce(&RepoStore) -> R) -> R {
    REPOS.with(|repos| f(&repos.borrow()))
}

/// Compiled pattern for `regexp`, reusing the previous one when the page asks
/// for the same query again (once per rendered line).
pub fn cached_pattern(regexp: &str, ignore_case: bool) -> Result<Pattern> {
    LAST_PATTERN.with(|last| {
        let mut last = last.borrow_mut();
        if let Some((source, case, pattern)) = last.as_ref() {
            if source == regexp && *case == ignore_case {
                return Ok(pattern.clone());
            }
        }

        let opts = PatternOpts {
            case_insensitive: ignore_case,
            ..PatternOpts::default()
        };
        let pattern = Pattern::compile(regexp, &opts)?;
        *last = Some((regexp.to_string(), ignore_case, pattern.clone()));
        Ok(pattern)
    })
}
