//! View-model for one file of search results: coalesced blocks with
//! highlighted HTML and repository links for every line.

use crate::repo::{url_to_repo, RepoConfig};
use crate::results::coalesce::coalesce;
use crate::results::highlight::content_for;
use crate::results::matcher::Pattern;
use crate::results::model::FileMatch;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedLine {
    pub number: i64,
    pub is_match: bool,
    /// Escaped HTML with `<em>` around match occurrences.
    pub html: String,
    /// Link to this line in the repository browser.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedBlock {
    pub lines: Vec<RenderedLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedFile {
    pub filename: String,
    /// Link to the file itself (no line anchor).
    pub url: String,
    pub blocks: Vec<RenderedBlock>,
}

/// Coalesce, highlight and link one file's matches.
pub fn render_file(repo: &RepoConfig, rev: &str, file: &FileMatch, pattern: &Pattern) -> RenderedFile {
    let filename = file.filename.as_str();

    let blocks = coalesce(&file.matches)
        .iter()
        .map(|block| RenderedBlock {
            lines: block
                .lines()
                .iter()
                .map(|line| RenderedLine {
                    number: line.number,
                    is_match: line.is_match,
                    html: content_for(line, pattern),
                    url: url_to_repo(repo, filename, Some(line.number), rev),
                })
                .collect(),
        })
        .collect();

    RenderedFile {
        filename: filename.to_string(),
        url: url_to_repo(repo, filename, None, rev),
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::matcher::PatternOpts;
    use crate::results::model::MatchRecord;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_file() {
        let repo = RepoConfig::new("https://github.com/org/repo.git")
            .with_url_pattern("{url}/blob/{rev}/{path}{anchor}", "#L{line}");
        let file = FileMatch {
            filename: "src/a.rs".to_string(),
            matches: vec![
                MatchRecord::new(2, "let x = 1;").with_context(["fn a() {"], ["}"]),
                MatchRecord::new(3, "}").with_context(["let x = 1;"], Vec::<&str>::new()),
            ],
        };
        let pattern = Pattern::compile("x|}", &PatternOpts::default()).unwrap();

        let rendered = render_file(&repo, "main", &file, &pattern);

        assert_eq!(rendered.url, "https://github.com/org/repo/blob/main/src/a.rs");
        assert_eq!(rendered.blocks.len(), 1);

        let lines = &rendered.blocks[0].lines;
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].html, "fn a() {");
        assert_eq!(lines[1].html, "let <em>x</em> = 1;");
        assert_eq!(lines[2].html, "<em>}</em>");
        assert!(lines[2].is_match);
        assert_eq!(
            lines[1].url,
            "https://github.com/org/repo/blob/main/src/a.rs#L2"
        );
    }
}
