//! Truncate-and-reload of the four target tables.

use std::time::{Duration, Instant};

use anyhow::Context;
use arrow::record_batch::RecordBatch;
use log::{error, info, warn};

use super::{MAX_BIND_PARAMETERS, TableStore};
use crate::assembler::EtlTables;
use crate::config::DEFAULT_CHUNK_SIZE;
use crate::error::{Error, Result};
use crate::schema::TargetTable;
use crate::utils::logging::{create_main_progress_bar, finish_and_clear};

/// Outcome of loading one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLoad {
    pub table: TargetTable,
    pub rows: u64,
    pub elapsed: Duration,
}

/// Outcome of a full load
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub tables: Vec<TableLoad>,
    pub elapsed: Duration,
}

impl LoadReport {
    #[must_use]
    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|t| t.rows).sum()
    }
}

/// Loads [`EtlTables`] into a [`TableStore`]
///
/// Tables are loaded one after the other in [`TargetTable::LOAD_ORDER`]:
/// truncate with cascade, chunked insert, then a row count check. Referential
/// integrity is suspended for the whole operation and restored afterwards,
/// on the failure path too. Tables loaded before a failure stay loaded.
#[derive(Debug, Clone)]
pub struct BulkLoader {
    chunk_size: usize,
}

impl Default for BulkLoader {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl BulkLoader {
    #[must_use]
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Rows per INSERT for a table of `num_columns` columns
    ///
    /// Never more than the configured chunk size, and never more rows than
    /// fit in [`MAX_BIND_PARAMETERS`] bound values.
    #[must_use]
    pub fn rows_per_chunk(&self, num_columns: usize) -> usize {
        let limit = MAX_BIND_PARAMETERS / num_columns.max(1);
        self.chunk_size.min(limit).max(1)
    }

    /// Load all four tables
    pub async fn load<S>(&self, store: &mut S, tables: &EtlTables) -> Result<LoadReport>
    where
        S: TableStore + ?Sized,
    {
        store
            .suspend_constraints()
            .await
            .context("Failed to suspend referential constraints")?;

        let outcome = self.load_tables(store, tables).await;
        let restored = store.restore_constraints().await;

        match (outcome, restored) {
            (Ok(report), Ok(())) => Ok(report),
            (Ok(_), Err(e)) => Err(e.context("Failed to restore referential constraints")),
            (Err(e), Ok(())) => {
                warn!("Load aborted, referential constraints restored");
                Err(e)
            }
            (Err(e), Err(restore_error)) => {
                error!("Failed to restore referential constraints after load failure: {restore_error:#}");
                Err(e)
            }
        }
    }

    /// Load all four tables, then close the store
    ///
    /// A load failure is returned even when closing fails too; the close
    /// error is only logged then.
    pub async fn load_and_close<S: TableStore>(&self, mut store: S, tables: &EtlTables) -> Result<LoadReport> {
        let outcome = self.load(&mut store, tables).await;
        let closed = store.close().await;

        match (outcome, closed) {
            (Ok(report), Ok(())) => Ok(report),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_error)) => {
                warn!("Failed to close the store after load failure: {close_error:#}");
                Err(e)
            }
        }
    }

    async fn load_tables<S>(&self, store: &mut S, tables: &EtlTables) -> Result<LoadReport>
    where
        S: TableStore + ?Sized,
    {
        let start = Instant::now();
        let mut report = LoadReport::default();

        for table in TargetTable::LOAD_ORDER {
            let load = self
                .load_table(store, table, tables.get(table))
                .await
                .with_context(|| format!("Failed to load table '{table}'"))?;
            report.tables.push(load);
        }

        report.elapsed = start.elapsed();
        Ok(report)
    }

    async fn load_table<S>(&self, store: &mut S, table: TargetTable, batch: &RecordBatch) -> Result<TableLoad>
    where
        S: TableStore + ?Sized,
    {
        let start = Instant::now();
        let rows = batch.num_rows();
        let chunk = self.rows_per_chunk(batch.num_columns());

        store.truncate(table).await?;

        let pb = create_main_progress_bar(rows as u64, Some(table.table_name()));
        let mut inserted = 0_u64;
        let mut offset = 0;
        while offset < rows {
            let len = chunk.min(rows - offset);
            inserted += store.insert_batch(table, &batch.slice(offset, len)).await?;
            pb.inc(len as u64);
            offset += len;
        }
        finish_and_clear(&pb);

        let expected = rows as u64;
        if inserted != expected {
            warn!("Table {table}: store reported {inserted} inserted rows for {expected} source rows");
        }

        let actual = store.count_rows(table).await?;
        if actual != expected {
            return Err(Error::RowCountMismatch {
                table: table.table_name().to_string(),
                expected,
                actual,
            }
            .into());
        }

        let elapsed = start.elapsed();
        info!("Table {table}: {actual} rows loaded in {elapsed:.2?}");

        Ok(TableLoad {
            table,
            rows: actual,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_respects_bind_parameter_limit() {
        let loader = BulkLoader::new(5000);
        assert_eq!(loader.rows_per_chunk(13), 5000);
        assert_eq!(loader.rows_per_chunk(17), 3855);
        assert_eq!(BulkLoader::new(0).rows_per_chunk(3), 1);
        assert_eq!(BulkLoader::new(100_000).rows_per_chunk(0), MAX_BIND_PARAMETERS);
    }
}
