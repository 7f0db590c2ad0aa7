//! Road-accident snapshot ETL.
//!
//! Reads a flat parquet snapshot where vehicle- and person-scoped attributes
//! are packed as comma-delimited multi-value strings, explodes and types them
//! into four relational tables, bulk-loads the tables into PostgreSQL and
//! reports risk analyses over the loaded data.

pub mod analysis;
pub mod assembler;
pub mod codes;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod reader;
pub mod schema;
pub mod store;
pub mod transform;
pub mod utils;

// Core types
pub use config::{AnalysisConfig, DatabaseConfig, EtlConfig};
pub use error::{Error, Result};
pub use schema::{MultiValueColumns, TargetTable};

// Pipeline stages
pub use assembler::{EtlTables, assemble};
pub use pipeline::{run_etl, run_load, run_transform};
pub use reader::read_raw_snapshot;
pub use store::{BulkLoader, LoadReport, MemoryStore, PgTableStore, TableStore};
pub use transform::{explode_batches, explode_multi_value, normalize_coordinates};

// Analysis
pub use analysis::{AnalysisResults, run_analysis};

// Arrow types
pub use arrow::record_batch::RecordBatch;
