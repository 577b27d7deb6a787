//! Tests for output module

use super::*;
use crate::types::{Column, Listing};
use arrow::array::{Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;

fn sample() -> Vec<Listing> {
    vec![
        Listing::named("Ann Lee")
            .with(Column::BarNumber, "1001")
            .with(Column::Email, "ann@example.com")
            .with(Column::ImageUrl, "https://example.com/ann.jpg"),
        Listing::named("Bo Diaz").with(Column::Address, "1 Main St, Miami, FL"),
    ]
}

fn parquet_rows(data: impl parquet::file::reader::ChunkReader + 'static) -> Vec<RecordBatch> {
    ParquetRecordBatchReaderBuilder::try_new(data)
        .unwrap()
        .build()
        .unwrap()
        .map(|b| b.unwrap())
        .collect()
}

// ============================================================================
// Schema Tests
// ============================================================================

#[test]
fn test_listing_schema_column_order() {
    let schema = listing_schema(&[]);
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();

    assert_eq!(
        names,
        vec![
            "imageUrl",
            "name",
            "nickname",
            "barNumber",
            "practice",
            "address",
            "officePhone",
            "cellPhone",
            "email"
        ]
    );
    assert!(schema
        .fields()
        .iter()
        .all(|f| f.is_nullable() && f.data_type() == &DataType::Utf8));
}

#[test]
fn test_listings_to_batch() {
    let batch = listings_to_batch(&sample()).unwrap();
    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.num_columns(), Column::ALL.len());

    let names = batch
        .column_by_name("name")
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(names.value(0), "Ann Lee");
    assert_eq!(names.value(1), "Bo Diaz");

    let email = batch
        .column_by_name("email")
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert!(email.is_null(1));
}

#[test]
fn test_extra_columns_follow_first_seen_order() {
    let listings: Vec<Listing> = serde_json::from_value(json!([
        {"name": "A", "county": "Dade", "admitted": "1999"},
        {"name": "B", "firm": "Roe LLP", "county": "Leon"}
    ]))
    .unwrap();

    assert_eq!(extra_columns(&listings), vec!["county", "admitted", "firm"]);

    let batch = listings_to_batch(&listings).unwrap();
    assert_eq!(batch.num_columns(), 12);
    let firm = batch
        .column_by_name("firm")
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert!(firm.is_null(0));
    assert_eq!(firm.value(1), "Roe LLP");
}

#[test]
fn test_csv_keeps_unknown_keys_and_raw_values() {
    let listing: Listing = serde_json::from_value(json!({
        "name": "A",
        "county": "Dade",
        "barNumber": 1234,
        "email": null
    }))
    .unwrap();

    let data = ExportFormat::Csv
        .encode(&[listing], &ParquetWriterConfig::default())
        .unwrap();
    let text = String::from_utf8(data.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines[0],
        "imageUrl,name,nickname,barNumber,practice,address,officePhone,cellPhone,email,county"
    );
    assert_eq!(lines[1], ",A,,1234,,,,,,Dade");
}

#[test]
fn test_listings_to_batch_empty() {
    let batch = listings_to_batch(&[]).unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), 9);
}

// ============================================================================
// Encoding Tests
// ============================================================================

#[test]
fn test_csv_encoding() {
    let data = ExportFormat::Csv.encode(&sample(), &ParquetWriterConfig::default()).unwrap();
    let text = String::from_utf8(data.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines[0],
        "imageUrl,name,nickname,barNumber,practice,address,officePhone,cellPhone,email"
    );
    assert_eq!(
        lines[1],
        "https://example.com/ann.jpg,Ann Lee,,1001,,,,,ann@example.com"
    );
    assert_eq!(lines[2], ",Bo Diaz,,,,\"1 Main St, Miami, FL\",,,");
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_csv_encoding_empty_has_header() {
    let data = ExportFormat::Csv.encode(&[], &ParquetWriterConfig::default()).unwrap();
    let text = String::from_utf8(data.to_vec()).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(text.starts_with("imageUrl,name"));
}

#[test]
fn test_parquet_encoding_round_trip() {
    let data = ExportFormat::Parquet.encode(&sample(), &ParquetWriterConfig::default()).unwrap();

    let batches = parquet_rows(data);
    let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(rows, 2);

    let names = batches[0]
        .column_by_name("name")
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(names.value(0), "Ann Lee");
}

#[test]
fn test_parquet_writer_config() {
    let config = ParquetWriterConfig::new()
        .with_compression(ParquetCompression::Zstd)
        .with_dictionary(false);
    assert!(!config.is_dictionary_enabled());
    assert_eq!(config.compression(), ParquetCompression::Zstd);

    let batch = listings_to_batch(&sample()).unwrap();
    let data = batch_to_parquet_bytes(
        &batch,
        &ParquetWriterConfig::new().with_compression(ParquetCompression::None),
    )
    .unwrap();
    assert!(data.starts_with(b"PAR1"));
}

#[test]
fn test_parquet_compression_is_applied() {
    let config = ParquetWriterConfig::new().with_compression(ParquetCompression::Zstd);
    let data = ExportFormat::Parquet.encode(&sample(), &config).unwrap();

    let reader = ParquetRecordBatchReaderBuilder::try_new(data).unwrap();
    let column = reader.metadata().row_group(0).column(0);
    assert!(matches!(
        column.compression(),
        parquet::basic::Compression::ZSTD(_)
    ));
}

// ============================================================================
// Format Tests
// ============================================================================

#[test]
fn test_export_format_names() {
    assert_eq!(ExportFormat::Csv.default_file_name(), "AllListingsData.csv");
    assert_eq!(
        ExportFormat::Parquet.default_file_name(),
        "AllListingsData.parquet"
    );
    assert_eq!("PARQUET".parse::<ExportFormat>().unwrap(), ExportFormat::Parquet);
    assert!("xlsx".parse::<ExportFormat>().is_err());
}

// ============================================================================
// Destination and Sink Tests
// ============================================================================

#[test]
fn test_destination_local() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("exports");
    let dest = Destination::parse(path.to_str().unwrap()).unwrap();

    assert_eq!(dest.scheme(), "file");
    assert!(!dest.is_cloud());
    assert!(path.is_dir());
}

#[tokio::test]
async fn test_file_exporter_writes_csv() {
    let temp_dir = tempdir().unwrap();
    let dest = Destination::parse(temp_dir.path().to_str().unwrap()).unwrap();
    let exporter = FileExporter::new(dest, ExportFormat::Csv);
    assert_eq!(exporter.file_name(), "AllListingsData.csv");

    let receipt = exporter.export(&sample()).await.unwrap();

    assert_eq!(receipt.rows, 2);
    assert_eq!(receipt.format, ExportFormat::Csv);
    let written = std::fs::read_to_string(temp_dir.path().join("AllListingsData.csv")).unwrap();
    assert_eq!(written.len(), receipt.bytes);
    assert!(written.contains("Ann Lee"));
    assert!(receipt.location.ends_with("AllListingsData.csv"));
}

#[tokio::test]
async fn test_file_exporter_custom_name_parquet() {
    let temp_dir = tempdir().unwrap();
    let dest = Destination::parse(temp_dir.path().to_str().unwrap()).unwrap();
    let exporter = FileExporter::new(dest, ExportFormat::Parquet)
        .with_file_name("roster.parquet")
        .with_parquet_config(ParquetWriterConfig::new().with_compression(ParquetCompression::None));

    exporter.export(&sample()).await.unwrap();

    let file = std::fs::File::open(temp_dir.path().join("roster.parquet")).unwrap();
    let rows: usize = parquet_rows(file).iter().map(RecordBatch::num_rows).sum();
    assert_eq!(rows, 2);
}
