//! CLI commands and argument parsing

use crate::display::SortOrder;
use crate::output::{ExportFormat, ParquetCompression};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Aggregate a paginated listing directory, then show or export it
#[derive(Parser, Debug)]
#[command(name = "listing-sweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the upstream base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Stop after this many pages
    #[arg(long, global = true)]
    pub max_pages: Option<u32>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every page and print the collection
    Fetch {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,

        /// Search across all columns (table output)
        #[arg(long)]
        search: Option<String>,

        /// Column to sort by, e.g. name or barNumber (table output)
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Table page to show
        #[arg(long, default_value = "1")]
        page: usize,

        /// Rows per table page
        #[arg(long, default_value = "10")]
        page_length: usize,
    },

    /// Fetch every page and write the collection to a file
    Export {
        /// File format
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Output destination (local path or cloud URL)
        /// Supports: /path, s3://bucket/path, r2://bucket/path, gs://bucket/path, az://container/path
        #[arg(short, long)]
        output: Option<String>,

        /// File name (default: AllListingsData.<ext>)
        #[arg(long)]
        file_name: Option<String>,

        /// Parquet compression codec
        #[arg(long)]
        compression: Option<ParquetCompression>,
    },

    /// Start HTTP server mode
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

/// Output format for `fetch`
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Full aggregation state as JSON
    Json,
    /// One summary line per listing
    Pretty,
    /// Paged text table
    Table,
}

impl Commands {
    /// Sort order implied by `--desc`
    pub fn sort_order(desc: bool) -> SortOrder {
        if desc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}
