pub mod api;
pub mod error;
pub mod excluded;
pub mod format;
pub mod query;
pub mod repo;
pub mod results;
pub mod session;
pub mod signal;

pub use api::{
    parse_range, ExcludedFile, LoadMoreRange, RepoResult, RepoResults, SearchResponse, Stats,
    MAX_LOAD_MORE,
};
pub use error::{Error, Result};
pub use excluded::{excluded_rows, ExcludedRow};
pub use format::format_number;
pub use query::{
    params_from_query_string, param_value_to_bool, search_url_for_selection, SearchParams,
    SearchRequest,
};
pub use repo::{expand_vars, url_to_repo, RepoConfig, RepoStore, UrlParts, UrlPattern};
pub use results::{
    build_window, coalesce, content_for, escape_html, escape_regexp, highlight, render_file,
    render_segments, Block, FileMatch, LineRecord, MatchRecord, Pattern, PatternOpts,
    RenderedBlock, RenderedFile, RenderedLine, Segment,
};
pub use session::{LoadMoreDone, SearchSession, SearchSnapshot, SearchStats, Signals};
pub use signal::{Signal, TapId};

pub mod prelude {
    //! Common imports for consumers of this crate.
    pub use super::{
        coalesce, format_number, Block, Error, FileMatch, LineRecord, MatchRecord, Pattern,
        RenderedFile, RepoConfig, RepoResult, RepoStore, Result, SearchParams, SearchRequest,
        SearchSession, Signal, TapId,
    };
}
