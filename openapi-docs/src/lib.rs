pub mod cli;
pub mod load_config;
pub mod storage;

pub use cli::{report_failure, run, Cli, Commands};
