//! Relational store access for the bulk load.
//!
//! [`TableStore`] is the port the [`BulkLoader`] drives. The PostgreSQL
//! adapter is used in production, the in-memory adapter by tests.

pub mod loader;
pub mod memory;
pub mod postgres;

use arrow::record_batch::RecordBatch;
use async_trait::async_trait;

use crate::error::Result;
use crate::schema::TargetTable;

pub use loader::{BulkLoader, LoadReport, TableLoad};
pub use memory::{MemoryStore, StoreOperation};
pub use postgres::PgTableStore;

/// PostgreSQL's limit on bind parameters in one statement
pub const MAX_BIND_PARAMETERS: usize = 65535;

/// A relational store that the four target tables can be loaded into
///
/// All operations run on one session, so constraint suspension applies to
/// every statement issued between [`TableStore::suspend_constraints`] and
/// [`TableStore::restore_constraints`].
#[async_trait]
pub trait TableStore: Send {
    /// Stop enforcing referential integrity for this session
    async fn suspend_constraints(&mut self) -> Result<()>;

    /// Enforce referential integrity again
    async fn restore_constraints(&mut self) -> Result<()>;

    /// Remove every row of a table, cascading to dependents
    async fn truncate(&mut self, table: TargetTable) -> Result<()>;

    /// Insert every row of a batch, returning the number of inserted rows
    async fn insert_batch(&mut self, table: TargetTable, batch: &RecordBatch) -> Result<u64>;

    /// Current row count of a table
    async fn count_rows(&mut self, table: TargetTable) -> Result<u64>;

    /// End the session
    async fn close(self) -> Result<()>
    where
        Self: Sized;
}
