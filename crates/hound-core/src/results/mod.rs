pub mod coalesce;
pub mod highlight;
pub mod matcher;
pub mod model;
pub mod render;
pub mod window;

pub use coalesce::coalesce;
pub use highlight::{content_for, escape_html, highlight, render_segments, Segment};
pub use matcher::{escape_regexp, Pattern, PatternOpts};
pub use model::{Block, FileMatch, LineRecord, MatchRecord};
pub use render::{render_file, RenderedBlock, RenderedFile, RenderedLine};
pub use window::build_window;

pub mod prelude {
    pub use super::{
        build_window, coalesce, content_for, highlight, Block, FileMatch, LineRecord, MatchRecord,
        Pattern, PatternOpts, Segment,
    };
}
