//! Table assembly: from raw snapshot batches to the four typed target tables.
//!
//! Accident- and location-scoped columns are projected and deduplicated on the
//! accident identifier (first occurrence wins). Vehicle- and person-scoped
//! columns are exploded per position first; vehicles are then deduplicated on
//! `(num_acc, num_veh)`. Each intermediate frame is finally typed into its
//! output schema.

pub mod accidents;
pub mod locations;
pub mod persons;
pub mod vehicles;

use std::time::Instant;

use anyhow::Context;
use arrow::array::StringArray;
use arrow::compute::concat_batches;
use arrow::record_batch::RecordBatch;
use log::{debug, info};

use crate::codes::{CodeMap, count_unmapped, map_column};
use crate::error::Result;
use crate::schema::{self, TargetTable};
use crate::transform::string_column;

pub use accidents::build_accidents;
pub use locations::build_locations;
pub use persons::build_persons;
pub use vehicles::build_vehicles;

/// The four typed tables produced by one run
#[derive(Debug, Clone)]
pub struct EtlTables {
    pub accidents: RecordBatch,
    pub locations: RecordBatch,
    pub vehicles: RecordBatch,
    pub persons: RecordBatch,
}

impl EtlTables {
    /// The batch backing a target table
    #[must_use]
    pub fn get(&self, table: TargetTable) -> &RecordBatch {
        match table {
            TargetTable::Accidents => &self.accidents,
            TargetTable::Locations => &self.locations,
            TargetTable::Vehicles => &self.vehicles,
            TargetTable::Persons => &self.persons,
        }
    }

    /// Row count of every table, in load order
    #[must_use]
    pub fn row_counts(&self) -> Vec<(TargetTable, usize)> {
        TargetTable::LOAD_ORDER
            .iter()
            .map(|&table| (table, self.get(table).num_rows()))
            .collect()
    }

    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.row_counts().iter().map(|(_, rows)| rows).sum()
    }
}

/// Build all four tables from the raw snapshot
///
/// The raw batches must carry the columns of [`schema::raw_schema`]. An empty
/// snapshot yields four empty tables.
pub fn assemble(raw: &[RecordBatch]) -> Result<EtlTables> {
    let empty;
    let raw = if raw.is_empty() {
        empty = [RecordBatch::new_empty(schema::raw_schema())];
        &empty[..]
    } else {
        raw
    };

    let tables = EtlTables {
        accidents: timed(TargetTable::Accidents, || build_accidents(raw))?,
        locations: timed(TargetTable::Locations, || build_locations(raw))?,
        vehicles: timed(TargetTable::Vehicles, || build_vehicles(raw))?,
        persons: timed(TargetTable::Persons, || build_persons(raw))?,
    };

    Ok(tables)
}

fn timed(table: TargetTable, build: impl FnOnce() -> Result<RecordBatch>) -> Result<RecordBatch> {
    let start = Instant::now();
    let batch = build().with_context(|| format!("Failed to assemble table '{table}'"))?;
    info!(
        "Table {table}: {} rows in {:.2?}",
        batch.num_rows(),
        start.elapsed()
    );
    Ok(batch)
}

/// Concatenate batches sharing the schema of the first one
pub(crate) fn concat_all(batches: &[RecordBatch]) -> Result<RecordBatch> {
    let first = batches
        .first()
        .context("Cannot concatenate an empty list of batches")?;
    concat_batches(&first.schema(), batches).context("Failed to concatenate record batches")
}

/// Translate a raw column through a code table
///
/// Values the table does not know are reported at debug level; they still map
/// to the table default.
pub(crate) fn code_column<T, A>(batch: &RecordBatch, column: &str, map: &CodeMap<T>) -> Result<A>
where
    T: Copy,
    A: FromIterator<Option<T>>,
{
    let values: StringArray = string_column(batch, column)?;
    let unmapped = count_unmapped(&values, map);
    if unmapped > 0 {
        debug!(
            "{unmapped} values of '{column}' not found in code table '{}'",
            map.name()
        );
    }
    Ok(map_column(&values, map))
}
