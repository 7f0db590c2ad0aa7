//! Column-pruned ingestion of the raw accident snapshot.
//!
//! Only the columns the ETL needs are decoded. Every returned batch is
//! conformed to the requested column list: same order, every column nullable
//! `Utf8`, columns absent from the file filled with nulls.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use arrow::array::{ArrayRef, new_null_array};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use log::{debug, warn};
use parquet::arrow::ProjectionMask;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::util::safe_open_file;
use crate::error::{Error, Result};
use crate::schema::{ACCIDENT_ID, raw_columns};

/// Read the raw snapshot restricted to the ETL's column set
pub fn read_raw_snapshot(path: &Path, batch_size: usize) -> Result<Vec<RecordBatch>> {
    read_string_columns(path, &raw_columns(), batch_size)
}

/// Read the named columns of a parquet file as nullable `Utf8` batches
///
/// Missing columns are logged and filled with nulls, except the accident
/// identifier which every downstream table needs.
pub fn read_string_columns(path: &Path, columns: &[&str], batch_size: usize) -> Result<Vec<RecordBatch>> {
    let file = safe_open_file(path, "reading parquet snapshot")?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("Failed to read parquet file: {}", path.display()))?;

    let file_schema = Arc::clone(builder.schema());
    let mut roots = Vec::with_capacity(columns.len());
    for column in columns {
        match file_schema.index_of(column) {
            Ok(idx) => roots.push(idx),
            Err(_) if *column == ACCIDENT_ID => {
                return Err(Error::ColumnNotFound {
                    column: ACCIDENT_ID.to_string(),
                }
                .into());
            }
            Err(_) => warn!("Column {column} not found in {}, filling with nulls", path.display()),
        }
    }
    roots.sort_unstable();

    let mask = ProjectionMask::roots(builder.parquet_schema(), roots);
    let reader = builder
        .with_projection(mask)
        .with_batch_size(batch_size.max(1))
        .build()
        .with_context(|| format!("Failed to build parquet reader for {}", path.display()))?;

    let target = string_schema(columns);
    let mut batches = Vec::new();
    for batch_result in reader {
        let batch = batch_result
            .with_context(|| format!("Failed to read record batch from {}", path.display()))?;
        batches.push(conform_batch(&batch, &target)?);
    }

    debug!(
        "Read {} rows in {} batches from {}",
        batches.iter().map(RecordBatch::num_rows).sum::<usize>(),
        batches.len(),
        path.display()
    );

    Ok(batches)
}

/// Schema with every named column as nullable `Utf8`
#[must_use]
pub fn string_schema(columns: &[&str]) -> SchemaRef {
    Arc::new(Schema::new(
        columns
            .iter()
            .map(|name| Field::new(*name, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ))
}

/// Reorder, cast and null-fill a batch to match `target`
pub fn conform_batch(batch: &RecordBatch, target: &SchemaRef) -> Result<RecordBatch> {
    let columns = target
        .fields()
        .iter()
        .map(|field| -> Result<ArrayRef> {
            match batch.column_by_name(field.name()) {
                Some(column) if column.data_type() == field.data_type() => Ok(Arc::clone(column)),
                Some(column) => cast(column.as_ref(), field.data_type())
                    .with_context(|| format!("Failed to cast column '{}' to Utf8", field.name())),
                None => Ok(new_null_array(field.data_type(), batch.num_rows())),
            }
        })
        .collect::<Result<Vec<_>>>()?;

    RecordBatch::try_new(Arc::clone(target), columns).context("Failed to conform snapshot batch")
}
