use std::sync::Arc;

use accident_etl::Error;
use accident_etl::reader::{read_raw_snapshot, read_string_columns};
use accident_etl::schema::raw_schema;
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use tempfile::tempdir;

use crate::utils::{column_values, raw_batch, two_accident_snapshot, write_parquet};

#[test]
fn test_raw_snapshot_round_trip() {
    let dir = tempdir().unwrap();
    let batch = raw_batch(&two_accident_snapshot());
    let path = write_parquet(dir.path(), "snapshot.parquet", &batch);

    let batches = read_raw_snapshot(&path, 1).unwrap();

    assert_eq!(batches.len(), 2);
    for read in &batches {
        assert_eq!(read.schema(), raw_schema());
    }
    assert_eq!(
        column_values(&batches[0], "num_veh"),
        vec![Some("A01,B01".to_string())]
    );
}

#[test]
fn test_missing_columns_are_null_filled_and_cast() {
    let dir = tempdir().unwrap();
    let schema = Arc::new(Schema::new(vec![
        Field::new("num_acc", DataType::Utf8, false),
        Field::new("an", DataType::Int64, true),
        Field::new("unused", DataType::Utf8, true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["1", "2"])),
        Arc::new(Int64Array::from(vec![Some(2021), None])),
        Arc::new(StringArray::from(vec!["x", "y"])),
    ];
    let batch = RecordBatch::try_new(schema, columns).unwrap();
    let path = write_parquet(dir.path(), "partial.parquet", &batch);

    let batches = read_string_columns(&path, &["num_acc", "an", "dep"], 1024).unwrap();

    assert_eq!(batches.len(), 1);
    let read = &batches[0];
    assert_eq!(read.num_columns(), 3);
    assert_eq!(column_values(read, "an"), vec![Some("2021".to_string()), None]);
    assert_eq!(column_values(read, "dep"), vec![None, None]);
    assert!(read.schema().fields().iter().all(|f| f.data_type() == &DataType::Utf8));
}

#[test]
fn test_missing_accident_id_is_an_error() {
    let dir = tempdir().unwrap();
    let schema = Arc::new(Schema::new(vec![Field::new("an", DataType::Utf8, true)]));
    let batch =
        RecordBatch::try_new(schema, vec![Arc::new(StringArray::from(vec!["2021"])) as ArrayRef]).unwrap();
    let path = write_parquet(dir.path(), "no_id.parquet", &batch);

    let err = read_raw_snapshot(&path, 1024).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::ColumnNotFound { column }) if column == "num_acc"
    ));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(read_raw_snapshot(&dir.path().join("absent.parquet"), 1024).is_err());
}
