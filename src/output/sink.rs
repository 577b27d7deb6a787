//! Export sinks

use super::cloud::Destination;
use super::schema::listings_to_batch;
use super::writer::{batch_to_csv_bytes, batch_to_parquet_bytes, ParquetWriterConfig};
use crate::error::Result;
use crate::types::Listing;
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Base name of exported files
pub const DEFAULT_FILE_STEM: &str = "AllListingsData";

/// Tabular export format
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values, opens in any spreadsheet
    #[default]
    Csv,
    /// Apache Parquet
    Parquet,
}

impl ExportFormat {
    /// File extension
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
        }
    }

    /// MIME type for downloads
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Parquet => "application/vnd.apache.parquet",
        }
    }

    /// Default file name, e.g. `AllListingsData.csv`
    pub fn default_file_name(self) -> String {
        format!("{DEFAULT_FILE_STEM}.{}", self.extension())
    }

    /// Encode listings in this format
    ///
    /// `parquet` only applies to [`ExportFormat::Parquet`].
    pub fn encode(self, listings: &[Listing], parquet: &ParquetWriterConfig) -> Result<Bytes> {
        let batch = listings_to_batch(listings)?;
        match self {
            ExportFormat::Csv => batch_to_csv_bytes(&batch),
            ExportFormat::Parquet => batch_to_parquet_bytes(&batch, parquet),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "parquet" => Ok(ExportFormat::Parquet),
            other => Err(crate::error::Error::config(format!(
                "Unknown export format: {other}"
            ))),
        }
    }
}

/// Outcome of an export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReceipt {
    /// Where the file was written
    pub location: String,
    /// Rows written
    pub rows: usize,
    /// Bytes written
    pub bytes: usize,
    /// Format written
    pub format: ExportFormat,
}

/// Consumer that materializes the aggregated collection as a file
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Export listings in order
    async fn export(&self, listings: &[Listing]) -> Result<ExportReceipt>;
}

/// Writes one file per export to a [`Destination`]
#[derive(Debug, Clone)]
pub struct FileExporter {
    destination: Destination,
    format: ExportFormat,
    file_name: String,
    parquet: ParquetWriterConfig,
}

impl FileExporter {
    /// Create an exporter using the format's default file name
    pub fn new(destination: Destination, format: ExportFormat) -> Self {
        Self {
            destination,
            format,
            file_name: format.default_file_name(),
            parquet: ParquetWriterConfig::default(),
        }
    }

    /// Override the Parquet encoding settings
    #[must_use]
    pub fn with_parquet_config(mut self, parquet: ParquetWriterConfig) -> Self {
        self.parquet = parquet;
        self
    }

    /// Override the file name
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// File name used for exports
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

#[async_trait]
impl ExportSink for FileExporter {
    async fn export(&self, listings: &[Listing]) -> Result<ExportReceipt> {
        let data = self.format.encode(listings, &self.parquet)?;
        let bytes = data.len();
        let location = self.destination.write(&self.file_name, data).await?;

        info!(
            location = %location,
            rows = listings.len(),
            bytes,
            format = %self.format,
            "Exported listings"
        );

        Ok(ExportReceipt {
            location,
            rows: listings.len(),
            bytes,
            format: self.format,
        })
    }
}
