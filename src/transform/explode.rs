//! Multi-value row explosion.
//!
//! A raw accident row stores its vehicles and persons as parallel
//! comma-separated lists (`"A01,B01"`, `"Avant,Arrière"`, ...). Exploding a
//! row produces one output row per list position, carrying the row's scalar
//! columns unchanged and the token at that position for every multi-value
//! column of the set.
//!
//! The work is columnar: one pass over the canonical column computes the
//! per-row position counts, scalar columns are replicated with a single
//! `take` kernel call, and every multi-value column is rebuilt with one string
//! builder fed by a single split of each source value.

use std::sync::Arc;

use anyhow::Context;
use arrow::array::{Array, ArrayRef, StringArray, StringBuilder, UInt32Array};
use arrow::compute::take;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::{debug, warn};
use rayon::prelude::*;
use smallvec::SmallVec;

use super::string_column;
use crate::error::Result;
use crate::schema::MultiValueColumns;

/// Delimiter between the tokens of a multi-value field
pub const TOKEN_DELIMITER: char = ',';

/// Column holding the position index of each exploded row
pub const POSITION_COLUMN: &str = "position";

/// Number of positions encoded by one raw value
///
/// Null and empty values count as a single position.
#[must_use]
pub fn position_count(raw: Option<&str>) -> usize {
    match raw {
        Some(value) if !value.is_empty() => {
            value.bytes().filter(|&b| b == TOKEN_DELIMITER as u8).count() + 1
        }
        _ => 1,
    }
}

/// Per-row position counts of a canonical column
#[must_use]
pub fn position_counts(canonical: &StringArray) -> Vec<usize> {
    canonical.iter().map(position_count).collect()
}

/// Replication plan: source row index and position for every output row
#[derive(Debug, Clone)]
pub struct ExplodePlan {
    /// Source row for each output row
    pub source_rows: UInt32Array,
    /// Position in `[0, N)` for each output row
    pub positions: UInt32Array,
    counts: Vec<usize>,
}

impl ExplodePlan {
    /// Build the plan from per-row position counts
    pub fn from_counts(counts: Vec<usize>) -> Result<Self> {
        let total: usize = counts.iter().sum();
        let mut source_rows = Vec::with_capacity(total);
        let mut positions = Vec::with_capacity(total);

        for (row, &count) in counts.iter().enumerate() {
            let row = u32::try_from(row).context("Row index exceeds u32 range")?;
            let count = u32::try_from(count).context("Position count exceeds u32 range")?;
            source_rows.extend(std::iter::repeat_n(row, count as usize));
            positions.extend(0..count);
        }

        Ok(Self {
            source_rows: UInt32Array::from(source_rows),
            positions: UInt32Array::from(positions),
            counts,
        })
    }

    /// Number of output rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.source_rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source_rows.is_empty()
    }

    /// Position count of each source row
    #[must_use]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }
}

/// Rebuild one multi-value column against a plan
///
/// Each source value is split once; position `p` of a row takes token `p`,
/// trimmed. Missing tokens (ragged rows), blank tokens and null sources yield
/// null. Tokens beyond the row's position count are ignored.
#[must_use]
pub fn extract_tokens(values: &StringArray, plan: &ExplodePlan) -> StringArray {
    let total = plan.len();
    let mut builder = StringBuilder::with_capacity(total, values.value_data().len());

    for (row, &count) in plan.counts().iter().enumerate() {
        if values.is_null(row) {
            for _ in 0..count {
                builder.append_null();
            }
            continue;
        }

        let mut tokens: SmallVec<[&str; 8]> = values
            .value(row)
            .split(TOKEN_DELIMITER)
            .take(count)
            .map(str::trim)
            .collect();
        tokens.resize(count, "");

        for token in tokens {
            if token.is_empty() {
                builder.append_null();
            } else {
                builder.append_value(token);
            }
        }
    }

    builder.finish()
}

/// Explode a record batch against a set of parallel multi-value columns
///
/// The set's canonical column determines each row's position count. If it is
/// missing from the batch, the first present column of the set is used
/// instead. When no column of the set is present the batch is returned
/// unchanged. Otherwise the output carries every input column (multi-value
/// columns as nullable `Utf8`) plus a `position` column.
pub fn explode_multi_value(batch: &RecordBatch, set: &MultiValueColumns) -> Result<RecordBatch> {
    let schema = batch.schema();
    let present: Vec<&str> = set
        .columns()
        .iter()
        .map(String::as_str)
        .filter(|name| schema.index_of(name).is_ok())
        .collect();

    let Some(&first_present) = present.first() else {
        debug!(
            "No '{}' multi-value column present, leaving batch unchanged",
            set.name()
        );
        return Ok(batch.clone());
    };

    let cardinality_source = if present.contains(&set.canonical()) {
        set.canonical()
    } else {
        warn!(
            "Canonical column '{}' of set '{}' is missing, using '{}' for cardinality",
            set.canonical(),
            set.name(),
            first_present
        );
        first_present
    };

    let canonical = string_column(batch, cardinality_source)?;
    let plan = ExplodePlan::from_counts(position_counts(&canonical))?;

    let mut fields = Vec::with_capacity(schema.fields().len() + 1);
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len() + 1);

    for (idx, field) in schema.fields().iter().enumerate() {
        if set.contains(field.name()) {
            let values = string_column(batch, field.name())?;
            columns.push(Arc::new(extract_tokens(&values, &plan)));
            fields.push(Field::new(field.name(), DataType::Utf8, true));
        } else {
            let replicated = take(batch.column(idx).as_ref(), &plan.source_rows, None)
                .with_context(|| format!("Failed to replicate column '{}'", field.name()))?;
            columns.push(replicated);
            fields.push(field.as_ref().clone());
        }
    }

    fields.push(Field::new(POSITION_COLUMN, DataType::UInt32, false));
    columns.push(Arc::new(plan.positions.clone()));

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .with_context(|| format!("Failed to assemble exploded '{}' batch", set.name()))
}

/// Explode many batches in parallel, preserving their order
pub fn explode_batches(batches: &[RecordBatch], set: &MultiValueColumns) -> Result<Vec<RecordBatch>> {
    batches
        .par_iter()
        .map(|batch| explode_multi_value(batch, set))
        .collect()
}
