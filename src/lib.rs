// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # listing-sweep
//!
//! Collects every record from a page-numbered directory listing API into one
//! in-memory collection, then hands it to display and export consumers.
//!
//! ## Features
//!
//! - **Sequential page sweep**: one request at a time, stopping on an empty
//!   page or when the current page equals the reported `totalPages`
//! - **Partial results**: listings gathered before a failure are kept
//! - **Cancellation**: runs stop cleanly between or during requests
//! - **Refresh session**: context changes re-run the sweep; runs never overlap
//! - **Table view**: in-memory search, sort and paging
//! - **Export**: CSV or Parquet, locally or to object storage
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use listing_sweep::{Aggregator, FetchContext, Result};
//! use listing_sweep::http::HttpClient;
//! use listing_sweep::source::HttpPageClient;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = HttpClient::new()?;
//!     let source = HttpPageClient::new(client);
//!     let aggregator = Aggregator::new(Arc::new(source));
//!
//!     let state = aggregator
//!         .fetch_all(&FetchContext::default(), &CancellationToken::new())
//!         .await?;
//!     println!("{} listings", state.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │   Session: context changes → one run at a time → snapshot │
//! └───────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────┬─────────────┴──────┬────────────────────────┐
//! │  PageSource  │     Aggregator     │       Consumers        │
//! ├──────────────┼────────────────────┼────────────────────────┤
//! │ HTTP GET     │ page cursor        │ ListingTable (display) │
//! │ page param   │ stop: empty / last │ FileExporter (CSV,     │
//! │ rate limit   │ cancel / max pages │   Parquet, cloud)      │
//! └──────────────┴────────────────────┴────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Listing records and page payloads
pub mod types;

/// HTTP client with rate limiting
pub mod http;

/// Page-source abstraction and its HTTP implementation
pub mod source;

/// Page cursor and termination rule
pub mod pagination;

/// Sequential aggregation engine
pub mod engine;

/// Background refresh session
pub mod session;

/// Tabular display of the collection
pub mod display;

/// CSV/Parquet export
pub mod output;

/// YAML configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use engine::{AggregationState, AggregationStatus, Aggregator, FetchContext};
pub use session::Session;
pub use source::PageSource;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
