//! PostgreSQL [`TableStore`] over a single dedicated connection.
//!
//! Constraint suspension uses `session_replication_role`, which only affects
//! the current session; every statement of a load must therefore go through
//! the same connection.

use anyhow::Context;
use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int32Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use itertools::Itertools;
use log::{debug, info};
use sqlx::postgres::{PgConnection, Postgres};
use sqlx::query_builder::Separated;
use sqlx::{Connection, QueryBuilder};

use super::TableStore;
use crate::config::DatabaseConfig;
use crate::error::{Error, Result};
use crate::schema::TargetTable;

/// Table store writing to PostgreSQL
pub struct PgTableStore {
    conn: PgConnection,
}

impl PgTableStore {
    /// Open a dedicated connection
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to database: {}", config.masked_url());
        let conn = PgConnection::connect(&config.connection_url())
            .await
            .with_context(|| format!("Failed to connect to {}", config.masked_url()))?;
        Ok(Self::from_connection(conn))
    }

    #[must_use]
    pub fn from_connection(conn: PgConnection) -> Self {
        Self { conn }
    }

    async fn execute(&mut self, sql: &str) -> Result<()> {
        debug!("{sql}");
        sqlx::query(sql)
            .execute(&mut self.conn)
            .await
            .map_err(|e| Error::Store(format!("{sql}: {e}")))?;
        Ok(())
    }
}

/// Typed view of one batch column, bound cell by cell
enum ColumnValues<'a> {
    Text(&'a StringArray),
    Int(&'a Int32Array),
    Float(&'a Float64Array),
    Bool(&'a BooleanArray),
}

impl<'a> ColumnValues<'a> {
    fn try_new(name: &str, column: &'a ArrayRef) -> Result<Self> {
        let any = column.as_any();
        let values = match column.data_type() {
            DataType::Utf8 => any.downcast_ref().map(ColumnValues::Text),
            DataType::Int32 => any.downcast_ref().map(ColumnValues::Int),
            DataType::Float64 => any.downcast_ref().map(ColumnValues::Float),
            DataType::Boolean => any.downcast_ref().map(ColumnValues::Bool),
            _ => None,
        };

        values.ok_or_else(|| {
            Error::InvalidDataType {
                column: name.to_string(),
                expected: "Utf8, Int32, Float64 or Boolean".to_string(),
            }
            .into()
        })
    }

    fn bind(&self, row: &mut Separated<'_, '_, Postgres, &'static str>, i: usize) {
        match self {
            Self::Text(a) => row.push_bind(a.is_valid(i).then(|| a.value(i).to_string())),
            Self::Int(a) => row.push_bind(a.is_valid(i).then(|| a.value(i))),
            Self::Float(a) => row.push_bind(a.is_valid(i).then(|| a.value(i))),
            Self::Bool(a) => row.push_bind(a.is_valid(i).then(|| a.value(i))),
        };
    }
}

#[async_trait]
impl TableStore for PgTableStore {
    async fn suspend_constraints(&mut self) -> Result<()> {
        self.execute("SET session_replication_role = 'replica'").await
    }

    async fn restore_constraints(&mut self) -> Result<()> {
        self.execute("SET session_replication_role = 'origin'").await
    }

    async fn truncate(&mut self, table: TargetTable) -> Result<()> {
        self.execute(&format!("TRUNCATE TABLE {} CASCADE", table.table_name()))
            .await
    }

    async fn insert_batch(&mut self, table: TargetTable, batch: &RecordBatch) -> Result<u64> {
        if batch.num_rows() == 0 {
            return Ok(0);
        }

        let schema = batch.schema();
        let columns = schema
            .fields()
            .iter()
            .zip(batch.columns())
            .map(|(field, column)| ColumnValues::try_new(field.name(), column))
            .collect::<Result<Vec<_>>>()?;

        let names = schema.fields().iter().map(|f| f.name().as_str()).join(", ");
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("INSERT INTO {} ({names}) ", table.table_name()));
        builder.push_values(0..batch.num_rows(), |mut row, i| {
            for column in &columns {
                column.bind(&mut row, i);
            }
        });

        let result = builder
            .build()
            .execute(&mut self.conn)
            .await
            .map_err(|e| Error::Store(format!("INSERT INTO {table}: {e}")))?;

        Ok(result.rows_affected())
    }

    async fn count_rows(&mut self, table: TargetTable) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.table_name());
        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&mut self.conn)
            .await
            .map_err(|e| Error::Store(format!("{sql}: {e}")))?;

        u64::try_from(count).with_context(|| format!("Negative row count for table '{table}'"))
    }

    async fn close(self) -> Result<()> {
        self.conn.close().await.context("Failed to close database connection")
    }
}
