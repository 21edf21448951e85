//! Command-line front end for the stockflow pipeline.
//!
//! The library half exists so tests can drive [`run_with_args`] without spawning a process.

mod chart_sink;
mod cli;
mod report;

pub use crate::chart_sink::JsonChartSink;
pub use crate::cli::{run, run_with_args, Args, Dataset, OutputFormat};
pub use crate::report::{
    table_to_json, value_to_json, write_json_report, write_text_report, JsonTable,
};
