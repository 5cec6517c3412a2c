//! Terminal formatting for resolved chains and staging reports.

mod report;

pub use report::{format_chain, format_platforms, format_staging, print_json};
