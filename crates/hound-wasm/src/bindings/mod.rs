pub mod query_ops;
pub mod repo_ops;
pub mod results_ops;
pub mod session_ops;

pub use query_ops::*;
pub use repo_ops::*;
pub use results_ops::*;
pub use session_ops::*;
