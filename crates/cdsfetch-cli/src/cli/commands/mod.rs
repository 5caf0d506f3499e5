//! CLI command handlers. Each command is in its own file for clarity.

mod convert;
mod count;
mod decode;
mod download;
mod run;

pub use convert::run_convert;
pub use count::run_count;
pub use decode::run_decode;
pub use download::run_download;
pub use run::run_job;

pub(crate) use download::build_request;
