//! Repository layer: descriptors from the server, the per-session store,
//! and link templating for the repository browser. Pure string work; no IO.

pub mod config;
pub mod store;
pub mod url;

pub use config::{RepoConfig, UrlPattern};
pub use store::RepoStore;
pub use url::{expand_vars, url_to_repo, UrlParts};

pub mod prelude {
    pub use super::{RepoConfig, RepoStore, UrlParts};
}
