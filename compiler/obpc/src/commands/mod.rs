//! Command implementations for the `obp` binary.

mod filter;
mod golden;

pub use filter::{run_filter, CliError, FilterOptions, FilterStats};
pub use golden::{
    generate_expected, run_golden, verify_expected, verify_syntax_errors, GoldenConfig,
    GoldenError, GoldenReport, QueryResult,
};
