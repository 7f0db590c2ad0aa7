//! Column-level transforms applied between ingestion and table assembly.
//!
//! - [`coordinates`]: raw latitude/longitude decoding
//! - [`explode`]: multi-value row explosion
//! - [`numeric`]: lenient numeric and calendar coercion
//! - [`dedup`]: keep-first deduplication on natural keys

pub mod coordinates;
pub mod dedup;
pub mod explode;
pub mod numeric;

use std::sync::Arc;

use anyhow::Context;
use arrow::array::{Array, ArrayRef, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Schema};
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};

pub use coordinates::{normalize_coordinates, parse_coordinate};
pub use dedup::dedup_keep_first;
pub use explode::{POSITION_COLUMN, explode_batches, explode_multi_value};

/// A column as `StringArray`, casting other types to `Utf8`
pub fn string_column(batch: &RecordBatch, name: &str) -> Result<StringArray> {
    let column = batch.column_by_name(name).ok_or_else(|| Error::ColumnNotFound {
        column: name.to_string(),
    })?;

    let column: ArrayRef = if column.data_type() == &DataType::Utf8 {
        Arc::clone(column)
    } else {
        cast(column.as_ref(), &DataType::Utf8)
            .with_context(|| format!("Failed to cast column '{name}' to Utf8"))?
    };

    column
        .as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| {
            Error::InvalidDataType {
                column: name.to_string(),
                expected: "Utf8".to_string(),
            }
            .into()
        })
}

/// Project a batch onto the named columns, in the given order
pub fn project_columns(batch: &RecordBatch, names: &[&str]) -> Result<RecordBatch> {
    let schema = batch.schema();
    let indices = names
        .iter()
        .map(|name| {
            schema.index_of(name).map_err(|_| {
                Error::ColumnNotFound {
                    column: (*name).to_string(),
                }
                .into()
            })
        })
        .collect::<Result<Vec<usize>>>()?;

    batch
        .project(&indices)
        .with_context(|| format!("Failed to project batch onto {names:?}"))
}

/// Assemble typed output columns into a batch with the given schema
pub fn typed_batch(schema: Arc<Schema>, columns: Vec<ArrayRef>) -> Result<RecordBatch> {
    RecordBatch::try_new(Arc::clone(&schema), columns).with_context(|| {
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        format!("Failed to build batch with columns {names:?}")
    })
}
