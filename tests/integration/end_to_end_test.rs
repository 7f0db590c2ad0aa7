use accident_etl::assemble;
use accident_etl::models::{Accident, ArrowRow, Location, Person, RawAccidentRecord, Vehicle};
use accident_etl::reader::read_raw_snapshot;
use accident_etl::schema::TargetTable;
use tempfile::tempdir;

use crate::utils::{raw_batch, raw_record, two_accident_snapshot, write_parquet};

fn close(actual: Option<f64>, expected: f64) -> bool {
    actual.is_some_and(|v| (v - expected).abs() < 1e-9)
}

#[test]
fn test_two_accident_snapshot_end_to_end() {
    let dir = tempdir().unwrap();
    let path = write_parquet(dir.path(), "snapshot.parquet", &raw_batch(&two_accident_snapshot()));

    let raw = read_raw_snapshot(&path, 1).unwrap();
    let tables = assemble(&raw).unwrap();

    assert_eq!(
        tables.row_counts(),
        vec![
            (TargetTable::Accidents, 2),
            (TargetTable::Locations, 2),
            (TargetTable::Vehicles, 3),
            (TargetTable::Persons, 4),
        ]
    );
    for (table, _) in tables.row_counts() {
        assert_eq!(tables.get(table).schema(), table.schema());
    }

    let accidents = Accident::from_record_batch(&tables.accidents).unwrap();
    assert_eq!(accidents[0].heure, Some(17));
    assert_eq!(accidents[0].minute, Some(45));
    assert_eq!(accidents[0].jour_semaine, Some(3));
    assert_eq!(accidents[0].com_code.as_deref(), Some("00075"));
    assert_eq!(accidents[0].departement_code.as_deref(), Some("75"));
    assert_eq!(accidents[0].en_agglomeration, Some(true));
    assert_eq!(accidents[0].luminosite, Some(1));
    assert_eq!(accidents[0].conditions_atmospheriques, Some(2));
    assert!(close(accidents[0].latitude, 48.8566));
    assert!(close(accidents[0].longitude, 2.3522));

    assert_eq!((accidents[1].heure, accidents[1].minute), (Some(8), Some(15)));
    assert_eq!(accidents[1].jour_semaine, Some(1));
    assert_eq!(accidents[1].com_code, None);
    assert_eq!(accidents[1].en_agglomeration, None);
    assert!(close(accidents[1].latitude, 48.7276));
    assert!(close(accidents[1].longitude, -2.47876));

    let locations = Location::from_record_batch(&tables.locations).unwrap();
    assert_eq!(locations[0].categorie_route, Some(4));
    assert_eq!(locations[0].etat_surface, Some(2));
    assert!(close(locations[0].largeur_terre_plein, 1.5));
    assert_eq!(locations[0].infrastructure, 0);
    assert!(!locations[0].proximite_ecole);
    assert_eq!(locations[1].etat_surface, Some(1));
    assert_eq!(locations[1].categorie_route, None);

    let vehicles = Vehicle::from_record_batch(&tables.vehicles).unwrap();
    let summary: Vec<(&str, &str, Option<i32>, i32)> = vehicles
        .iter()
        .map(|v| {
            (
                v.num_acc.as_deref().unwrap_or_default(),
                v.num_veh.as_deref().unwrap_or_default(),
                v.categorie_vehicule,
                v.obstacle_mobile,
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("202200000001", "A01", Some(1), 1),
            ("202200000001", "B01", Some(18), 0),
            ("202200000002", "A01", None, 0),
        ]
    );

    let persons = Person::from_record_batch(&tables.persons).unwrap();
    let summary: Vec<(Option<&str>, Option<i32>, Option<i32>, Option<i32>, Option<i32>)> = persons
        .iter()
        .map(|p| {
            (
                p.num_veh.as_deref(),
                p.age_au_moment_accident,
                p.categorie_usager,
                p.gravite,
                p.sexe,
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            (Some("A01"), Some(42), Some(1), Some(1), Some(1)),
            (Some("B01"), Some(27), Some(1), Some(2), Some(2)),
            (None, Some(12), Some(2), Some(4), Some(2)),
            (Some("A01"), Some(72), Some(3), Some(3), None),
        ]
    );
}

#[test]
fn test_duplicate_accident_rows_keep_first() {
    let first = raw_batch(&[RawAccidentRecord {
        dep: Some("75".to_string()),
        num_veh: Some("A01".to_string()),
        an_nais: Some("1990".to_string()),
        ..raw_record("1")
    }]);
    let second = raw_batch(&[RawAccidentRecord {
        dep: Some("13".to_string()),
        num_veh: Some("A01,B01".to_string()),
        an_nais: Some("1991".to_string()),
        ..raw_record("1")
    }]);

    let tables = assemble(&[first, second]).unwrap();

    let accidents = Accident::from_record_batch(&tables.accidents).unwrap();
    assert_eq!(accidents.len(), 1);
    assert_eq!(accidents[0].departement_code.as_deref(), Some("75"));

    // Vehicles deduplicate on (num_acc, num_veh); persons are never deduplicated
    let vehicles = Vehicle::from_record_batch(&tables.vehicles).unwrap();
    let numbers: Vec<Option<&str>> = vehicles.iter().map(|v| v.num_veh.as_deref()).collect();
    assert_eq!(numbers, vec![Some("A01"), Some("B01")]);
    assert_eq!(tables.persons.num_rows(), 2);
}

#[test]
fn test_empty_snapshot_yields_empty_tables() {
    let tables = assemble(&[]).unwrap();
    assert_eq!(tables.total_rows(), 0);
    assert_eq!(tables.vehicles.schema(), TargetTable::Vehicles.schema());
}
