//! In-memory [`TableStore`], recording every operation it receives.

use std::collections::BTreeMap;

use arrow::record_batch::RecordBatch;
use async_trait::async_trait;

use super::TableStore;
use crate::error::{Error, Result};
use crate::schema::TargetTable;

/// One call received by a [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOperation {
    SuspendConstraints,
    RestoreConstraints,
    Truncate(TargetTable),
    Insert(TargetTable, usize),
    Count(TargetTable),
    Close,
}

/// Table store keeping inserted batches in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: BTreeMap<TargetTable, Vec<RecordBatch>>,
    constraints_suspended: bool,
    operations: Vec<StoreOperation>,
    failing_table: Option<TargetTable>,
    failing_operations: Vec<StoreOperation>,
    lossy_table: Option<TargetTable>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every insert into `table`
    #[must_use]
    pub fn failing_on(mut self, table: TargetTable) -> Self {
        self.failing_table = Some(table);
        self
    }

    /// Fail when `operation` is received
    ///
    /// Matches suspend, restore, truncate, count and close. Inserts fail
    /// through [`MemoryStore::failing_on`].
    #[must_use]
    pub fn failing_at(mut self, operation: StoreOperation) -> Self {
        self.failing_operations.push(operation);
        self
    }

    /// Report one row fewer than stored when counting `table`
    #[must_use]
    pub fn losing_rows_of(mut self, table: TargetTable) -> Self {
        self.lossy_table = Some(table);
        self
    }

    /// Every operation received, in order
    #[must_use]
    pub fn operations(&self) -> &[StoreOperation] {
        &self.operations
    }

    #[must_use]
    pub fn constraints_suspended(&self) -> bool {
        self.constraints_suspended
    }

    /// Batches currently stored for a table
    #[must_use]
    pub fn batches(&self, table: TargetTable) -> &[RecordBatch] {
        self.tables.get(&table).map_or(&[], Vec::as_slice)
    }

    /// Rows currently stored for a table
    #[must_use]
    pub fn rows(&self, table: TargetTable) -> usize {
        self.batches(table).iter().map(RecordBatch::num_rows).sum()
    }

    fn record(&mut self, operation: StoreOperation) -> Result<()> {
        let failing = self.failing_operations.contains(&operation);
        self.operations.push(operation.clone());
        if failing {
            return Err(Error::Store(format!("{operation:?} rejected")).into());
        }
        Ok(())
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn suspend_constraints(&mut self) -> Result<()> {
        self.record(StoreOperation::SuspendConstraints)?;
        self.constraints_suspended = true;
        Ok(())
    }

    async fn restore_constraints(&mut self) -> Result<()> {
        self.record(StoreOperation::RestoreConstraints)?;
        self.constraints_suspended = false;
        Ok(())
    }

    async fn truncate(&mut self, table: TargetTable) -> Result<()> {
        self.record(StoreOperation::Truncate(table))?;
        self.tables.remove(&table);
        Ok(())
    }

    async fn insert_batch(&mut self, table: TargetTable, batch: &RecordBatch) -> Result<u64> {
        self.operations
            .push(StoreOperation::Insert(table, batch.num_rows()));
        if self.failing_table == Some(table) {
            return Err(Error::Store(format!("insert into {table} rejected")).into());
        }

        self.tables.entry(table).or_default().push(batch.clone());
        Ok(batch.num_rows() as u64)
    }

    async fn count_rows(&mut self, table: TargetTable) -> Result<u64> {
        self.record(StoreOperation::Count(table))?;
        let rows = self.rows(table) as u64;
        if self.lossy_table == Some(table) {
            return Ok(rows.saturating_sub(1));
        }
        Ok(rows)
    }

    async fn close(mut self) -> Result<()> {
        self.record(StoreOperation::Close)
    }
}
