//! Keep-first deduplication of record batches on natural keys.

use anyhow::Context;
use arrow::array::{Array, BooleanArray, StringArray};
use arrow::compute::filter_record_batch;
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashSet;

use crate::error::{Error, Result};

/// Remove rows whose key was already seen, keeping the first occurrence
///
/// Batches are scanned in order, so "first" means first in the concatenation
/// of `batches`. Null key parts compare equal to each other.
pub fn dedup_keep_first(batches: &[RecordBatch], keys: &[&str]) -> Result<Vec<RecordBatch>> {
    let mut seen: FxHashSet<Vec<Option<String>>> = FxHashSet::default();
    let mut output = Vec::with_capacity(batches.len());

    for batch in batches {
        let key_columns = keys
            .iter()
            .map(|key| key_column(batch, key))
            .collect::<Result<Vec<_>>>()?;

        let mask: BooleanArray = (0..batch.num_rows())
            .map(|row| {
                let key: Vec<Option<String>> = key_columns
                    .iter()
                    .map(|column| column.is_valid(row).then(|| column.value(row).to_string()))
                    .collect();
                Some(seen.insert(key))
            })
            .collect();

        if mask.true_count() == batch.num_rows() {
            output.push(batch.clone());
        } else {
            let filtered = filter_record_batch(batch, &mask)
                .with_context(|| format!("Failed to deduplicate on {keys:?}"))?;
            output.push(filtered);
        }
    }

    Ok(output)
}

fn key_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    let column = batch.column_by_name(name).ok_or_else(|| Error::ColumnNotFound {
        column: name.to_string(),
    })?;

    column
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| {
            Error::InvalidDataType {
                column: name.to_string(),
                expected: "Utf8".to_string(),
            }
            .into()
        })
}
