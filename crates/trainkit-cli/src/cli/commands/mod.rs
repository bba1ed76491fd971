//! CLI command handlers, one file per subcommand.

mod fetch;
mod report;

pub use fetch::{run_fetch, FetchArgs};
pub use report::run_report;
