use thiserror::Error;

/// Canonical errors for hound core
#[derive(Error, Debug)]
pub enum Error {
    // -------- Search / Results --------
    #[error("search failed: {0}")]
    Api(String),

    #[error("unknown repository: {0}")]
    UnknownRepo(String),

    #[error("no search in progress")]
    NoSearch,

    // -------- Wrapped sources --------
    #[error(transparent)]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
