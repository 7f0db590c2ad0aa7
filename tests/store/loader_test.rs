use accident_etl::store::{BulkLoader, MemoryStore, StoreOperation};
use accident_etl::{Error, EtlTables, TargetTable, assemble};

use crate::utils::{raw_batch, two_accident_snapshot};

fn tables() -> EtlTables {
    assemble(&[raw_batch(&two_accident_snapshot())]).unwrap()
}

fn has_error(err: &anyhow::Error, check: impl Fn(&Error) -> bool) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<Error>())
        .any(check)
}

#[tokio::test]
async fn test_load_writes_every_table_in_order() {
    let tables = tables();
    let mut store = MemoryStore::new();

    let report = BulkLoader::new(2).load(&mut store, &tables).await.unwrap();

    assert_eq!(report.total_rows(), 11);
    let loaded: Vec<(TargetTable, u64)> = report.tables.iter().map(|t| (t.table, t.rows)).collect();
    assert_eq!(
        loaded,
        vec![
            (TargetTable::Accidents, 2),
            (TargetTable::Locations, 2),
            (TargetTable::Vehicles, 3),
            (TargetTable::Persons, 4),
        ]
    );
    for (table, rows) in tables.row_counts() {
        assert_eq!(store.rows(table), rows);
    }

    let ops = store.operations();
    assert_eq!(ops.first(), Some(&StoreOperation::SuspendConstraints));
    assert_eq!(ops.last(), Some(&StoreOperation::RestoreConstraints));
    assert!(!store.constraints_suspended());

    // Chunks of two rows, each table truncated before and counted after its inserts
    let persons: Vec<&StoreOperation> = ops
        .iter()
        .skip_while(|op| **op != StoreOperation::Truncate(TargetTable::Persons))
        .collect();
    assert_eq!(
        persons,
        vec![
            &StoreOperation::Truncate(TargetTable::Persons),
            &StoreOperation::Insert(TargetTable::Persons, 2),
            &StoreOperation::Insert(TargetTable::Persons, 2),
            &StoreOperation::Count(TargetTable::Persons),
            &StoreOperation::RestoreConstraints,
        ]
    );
}

#[tokio::test]
async fn test_reload_replaces_previous_contents() {
    let tables = tables();
    let mut store = MemoryStore::new();
    let loader = BulkLoader::default();

    loader.load(&mut store, &tables).await.unwrap();
    loader.load(&mut store, &tables).await.unwrap();

    assert_eq!(store.rows(TargetTable::Vehicles), 3);
    assert_eq!(store.batches(TargetTable::Vehicles).len(), 1);
}

#[tokio::test]
async fn test_failed_insert_restores_constraints() {
    let tables = tables();
    let mut store = MemoryStore::new().failing_on(TargetTable::Vehicles);

    let err = BulkLoader::default().load(&mut store, &tables).await.unwrap_err();

    assert!(has_error(&err, |e| matches!(e, Error::Store(_))));
    assert!(!store.constraints_suspended());
    assert_eq!(store.operations().last(), Some(&StoreOperation::RestoreConstraints));
    // Tables loaded before the failure stay loaded, later ones are never touched
    assert_eq!(store.rows(TargetTable::Accidents), 2);
    assert_eq!(store.rows(TargetTable::Locations), 2);
    assert!(!store
        .operations()
        .contains(&StoreOperation::Truncate(TargetTable::Persons)));
}

#[tokio::test]
async fn test_row_count_mismatch_is_reported() {
    let tables = tables();
    let mut store = MemoryStore::new().losing_rows_of(TargetTable::Locations);

    let err = BulkLoader::default().load(&mut store, &tables).await.unwrap_err();

    assert!(has_error(&err, |e| matches!(
        e,
        Error::RowCountMismatch { table, expected: 2, actual: 1 } if table == "lieux"
    )));
    assert!(!store.constraints_suspended());
}

#[tokio::test]
async fn test_empty_tables_load_nothing() {
    let tables = assemble(&[]).unwrap();
    let mut store = MemoryStore::new();

    let report = BulkLoader::default().load(&mut store, &tables).await.unwrap();

    assert_eq!(report.total_rows(), 0);
    assert!(!store
        .operations()
        .iter()
        .any(|op| matches!(op, StoreOperation::Insert(..))));
}

fn store_message(err: &anyhow::Error) -> Option<String> {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<Error>())
        .find_map(|e| match e {
            Error::Store(message) => Some(message.clone()),
            _ => None,
        })
}

#[tokio::test]
async fn test_failed_suspend_touches_no_table() {
    let tables = tables();
    let mut store = MemoryStore::new().failing_at(StoreOperation::SuspendConstraints);

    let err = BulkLoader::default().load(&mut store, &tables).await.unwrap_err();

    assert_eq!(store_message(&err).as_deref(), Some("SuspendConstraints rejected"));
    assert!(format!("{err:#}").contains("Failed to suspend referential constraints"));
    assert_eq!(store.operations(), &[StoreOperation::SuspendConstraints]);
    assert!(!store.constraints_suspended());
    assert_eq!(store.rows(TargetTable::Accidents), 0);
}

#[tokio::test]
async fn test_failed_count_restores_constraints() {
    let tables = tables();
    let mut store = MemoryStore::new().failing_at(StoreOperation::Count(TargetTable::Locations));

    let err = BulkLoader::default().load(&mut store, &tables).await.unwrap_err();

    assert_eq!(store_message(&err).as_deref(), Some("Count(Locations) rejected"));
    assert!(format!("{err:#}").contains("Failed to load table 'lieux'"));
    assert!(!store.constraints_suspended());
    assert_eq!(store.operations().last(), Some(&StoreOperation::RestoreConstraints));
    assert!(!store
        .operations()
        .contains(&StoreOperation::Truncate(TargetTable::Vehicles)));
}

#[tokio::test]
async fn test_failed_truncate_restores_constraints() {
    let tables = tables();
    let mut store = MemoryStore::new().failing_at(StoreOperation::Truncate(TargetTable::Persons));

    let err = BulkLoader::default().load(&mut store, &tables).await.unwrap_err();

    assert_eq!(store_message(&err).as_deref(), Some("Truncate(Persons) rejected"));
    assert!(!store.constraints_suspended());
    assert_eq!(store.rows(TargetTable::Vehicles), 3);
    assert_eq!(store.rows(TargetTable::Persons), 0);
}

#[tokio::test]
async fn test_failed_restore_after_load_is_reported() {
    let tables = tables();
    let mut store = MemoryStore::new().failing_at(StoreOperation::RestoreConstraints);

    let err = BulkLoader::default().load(&mut store, &tables).await.unwrap_err();

    assert_eq!(store_message(&err).as_deref(), Some("RestoreConstraints rejected"));
    assert!(format!("{err:#}").contains("Failed to restore referential constraints"));
    // The data is in place, enforcement is not
    assert_eq!(store.rows(TargetTable::Persons), 4);
    assert!(store.constraints_suspended());
}

#[tokio::test]
async fn test_failed_restore_keeps_load_error() {
    let tables = tables();
    let mut store = MemoryStore::new()
        .failing_on(TargetTable::Vehicles)
        .failing_at(StoreOperation::RestoreConstraints);

    let err = BulkLoader::default().load(&mut store, &tables).await.unwrap_err();

    assert_eq!(store_message(&err).as_deref(), Some("insert into vehicules rejected"));
    assert!(!format!("{err:#}").contains("Failed to restore"));
    assert_eq!(store.operations().last(), Some(&StoreOperation::RestoreConstraints));
}

#[tokio::test]
async fn test_load_and_close_returns_report() {
    let tables = tables();

    let report = BulkLoader::default()
        .load_and_close(MemoryStore::new(), &tables)
        .await
        .unwrap();

    assert_eq!(report.total_rows(), 11);
}

#[tokio::test]
async fn test_close_failure_does_not_mask_load_error() {
    let tables = tables();
    let store = MemoryStore::new()
        .losing_rows_of(TargetTable::Locations)
        .failing_at(StoreOperation::Close);

    let err = BulkLoader::default().load_and_close(store, &tables).await.unwrap_err();

    assert!(has_error(&err, |e| matches!(
        e,
        Error::RowCountMismatch { table, expected: 2, actual: 1 } if table == "lieux"
    )));
    assert_eq!(store_message(&err), None);
}

#[tokio::test]
async fn test_close_failure_after_successful_load_is_reported() {
    let tables = tables();
    let store = MemoryStore::new().failing_at(StoreOperation::Close);

    let err = BulkLoader::default().load_and_close(store, &tables).await.unwrap_err();

    assert_eq!(store_message(&err).as_deref(), Some("Close rejected"));
}
