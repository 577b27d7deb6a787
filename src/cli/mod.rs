//! CLI module
//!
//! Command-line interface for running aggregations.
//!
//! # Commands
//!
//! - `fetch` - Aggregate every page and print the collection
//! - `export` - Aggregate every page and write a CSV or Parquet file
//! - `serve` - Start HTTP server mode

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{build_aggregator, build_exporter, Runner};
pub use server::{router, serve};
