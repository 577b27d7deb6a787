//! Listing to Arrow conversion
//!
//! Every column is a nullable UTF-8 string. The nine known columns come
//! first in fixed order, followed by any other keys the upstream sent, in
//! the order they were first seen. Strings pass through unchanged; other
//! JSON values are written as their JSON text.

use crate::error::Result;
use crate::types::{Column, Listing};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use std::collections::HashSet;
use std::sync::Arc;

/// Keys outside the known columns, in first-seen order across listings
pub fn extra_columns(listings: &[Listing]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    for listing in listings {
        for key in listing.extra_keys() {
            if seen.insert(key) {
                keys.push(key.to_string());
            }
        }
    }
    keys
}

/// Arrow schema of an exported collection: known columns, then `extra`
pub fn listing_schema(extra: &[String]) -> SchemaRef {
    let fields: Vec<Field> = Column::ALL
        .iter()
        .map(|column| column.key())
        .chain(extra.iter().map(String::as_str))
        .map(|name| Field::new(name, DataType::Utf8, true))
        .collect();
    Arc::new(Schema::new(fields))
}

/// Convert listings to a single RecordBatch, preserving order
pub fn listings_to_batch(listings: &[Listing]) -> Result<RecordBatch> {
    let extra = extra_columns(listings);
    let schema = listing_schema(&extra);

    let columns: Vec<ArrayRef> = schema
        .fields()
        .iter()
        .map(|field| {
            let values: StringArray = listings
                .iter()
                .map(|listing| listing.text(field.name()))
                .collect();
            Arc::new(values) as ArrayRef
        })
        .collect();

    Ok(RecordBatch::try_new(schema, columns)?)
}
