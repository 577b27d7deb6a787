//! Output module
//!
//! Export sinks for the aggregated collection.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Converting listings to an Arrow RecordBatch: known columns in fixed
//!   order, then any other upstream keys
//! - Encoding the batch as CSV or Parquet
//! - Writing the file locally or to cloud storage (S3, R2, GCS, Azure)

mod cloud;
mod schema;
mod sink;
mod writer;

pub use cloud::Destination;
pub use schema::{extra_columns, listing_schema, listings_to_batch};
pub use sink::{ExportFormat, ExportReceipt, ExportSink, FileExporter, DEFAULT_FILE_STEM};
pub use writer::{
    batch_to_csv_bytes, batch_to_parquet_bytes, ParquetCompression, ParquetWriterConfig,
};

#[cfg(test)]
mod tests;
