//! Rows for the excluded files page of one repository.

use serde::Serialize;

use crate::api::ExcludedFile;
use crate::repo::{url_to_repo, RepoConfig};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcludedRow {
    pub filename: String,
    pub reason: String,
    /// Link to the file in the repository browser.
    pub url: String,
}

pub fn excluded_rows(repo: &RepoConfig, rev: &str, files: &[ExcludedFile]) -> Vec<ExcludedRow> {
    files
        .iter()
        .map(|file| ExcludedRow {
            filename: file.filename.clone(),
            reason: file.reason.clone(),
            url: url_to_repo(repo, &file.filename, None, rev),
        })
        .collect()
}
