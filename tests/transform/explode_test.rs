use accident_etl::schema::MultiValueColumns;
use accident_etl::transform::{POSITION_COLUMN, explode_batches, explode_multi_value};
use arrow::array::{Array, UInt32Array};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::utils::{column_values, string_batch};

fn vehicle_set() -> MultiValueColumns {
    MultiValueColumns::new("vehicles", "num_veh", &["num_veh", "choc", "manv"])
}

fn owned(values: &[Option<&str>]) -> Vec<Option<String>> {
    values.iter().map(|v| v.map(str::to_string)).collect()
}

fn positions(batch: &arrow::record_batch::RecordBatch) -> Vec<u32> {
    batch
        .column_by_name(POSITION_COLUMN)
        .expect("position column")
        .as_any()
        .downcast_ref::<UInt32Array>()
        .expect("UInt32 positions")
        .values()
        .to_vec()
}

#[test]
fn test_tokens_stay_aligned_by_position() {
    let batch = string_batch(&[
        ("num_acc", vec![Some("1"), Some("2")]),
        ("dep", vec![Some("75"), Some("13")]),
        ("num_veh", vec![Some("A01, B01"), Some("C01")]),
        ("choc", vec![Some("Avant,Arrière"), Some("Côté gauche")]),
        ("manv", vec![Some("Sans changement,Dépassement"), None]),
    ]);

    let exploded = explode_multi_value(&batch, &vehicle_set()).unwrap();

    assert_eq!(exploded.num_rows(), 3);
    assert_eq!(column_values(&exploded, "num_acc"), owned(&[Some("1"), Some("1"), Some("2")]));
    assert_eq!(column_values(&exploded, "dep"), owned(&[Some("75"), Some("75"), Some("13")]));
    assert_eq!(
        column_values(&exploded, "num_veh"),
        owned(&[Some("A01"), Some("B01"), Some("C01")])
    );
    assert_eq!(
        column_values(&exploded, "choc"),
        owned(&[Some("Avant"), Some("Arrière"), Some("Côté gauche")])
    );
    assert_eq!(
        column_values(&exploded, "manv"),
        owned(&[Some("Sans changement"), Some("Dépassement"), None])
    );
    assert_eq!(positions(&exploded), vec![0, 1, 0]);
}

#[test]
fn test_ragged_columns_yield_nulls() {
    let batch = string_batch(&[
        ("num_acc", vec![Some("1")]),
        ("num_veh", vec![Some("A01,B01,C01")]),
        ("choc", vec![Some("Avant")]),
        ("manv", vec![Some("a,b,c,d")]),
    ]);

    let exploded = explode_multi_value(&batch, &vehicle_set()).unwrap();

    assert_eq!(exploded.num_rows(), 3);
    assert_eq!(column_values(&exploded, "choc"), owned(&[Some("Avant"), None, None]));
    // Extra tokens beyond the canonical count are dropped
    assert_eq!(column_values(&exploded, "manv"), owned(&[Some("a"), Some("b"), Some("c")]));
}

#[test]
fn test_null_canonical_counts_one_position() {
    let batch = string_batch(&[
        ("num_acc", vec![Some("1"), Some("2")]),
        ("num_veh", vec![None, Some("")]),
        ("choc", vec![Some("Avant,Arrière"), None]),
    ]);

    let exploded = explode_multi_value(&batch, &vehicle_set()).unwrap();

    assert_eq!(exploded.num_rows(), 2);
    assert_eq!(column_values(&exploded, "num_veh"), owned(&[None, None]));
    assert_eq!(column_values(&exploded, "choc"), owned(&[Some("Avant"), None]));
}

#[test]
fn test_missing_canonical_falls_back_to_first_present() {
    let batch = string_batch(&[
        ("num_acc", vec![Some("1")]),
        ("choc", vec![Some("Avant,Arrière")]),
        ("manv", vec![Some("x")]),
    ]);

    let exploded = explode_multi_value(&batch, &vehicle_set()).unwrap();

    assert_eq!(exploded.num_rows(), 2);
    assert_eq!(column_values(&exploded, "manv"), owned(&[Some("x"), None]));
    assert!(exploded.column_by_name("num_veh").is_none());
}

#[test]
fn test_absent_set_is_identity() {
    let batch = string_batch(&[("num_acc", vec![Some("1"), Some("2")]), ("dep", vec![None, Some("75")])]);

    let unchanged = explode_multi_value(&batch, &MultiValueColumns::empty("none")).unwrap();
    assert_eq!(unchanged, batch);

    let unrelated = explode_multi_value(&batch, &vehicle_set()).unwrap();
    assert_eq!(unrelated, batch);
}

#[test]
fn test_empty_batch_explodes_to_empty() {
    let batch = string_batch(&[("num_acc", vec![]), ("num_veh", vec![]), ("choc", vec![])]);

    let exploded = explode_multi_value(&batch, &vehicle_set()).unwrap();

    assert_eq!(exploded.num_rows(), 0);
    assert!(exploded.column_by_name(POSITION_COLUMN).is_some());
}

#[test]
fn test_randomized_cardinality_and_order() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut expected_total = 0;
    let mut batches = Vec::new();

    for b in 0..8 {
        let mut ids = Vec::new();
        let mut vehicles = Vec::new();
        for row in 0..250 {
            let count: usize = rng.random_range(1..=6);
            expected_total += count;
            ids.push(format!("{b:02}{row:04}"));
            vehicles.push(
                (0..count)
                    .map(|p| format!("V{p:02}"))
                    .collect::<Vec<_>>()
                    .join(","),
            );
        }
        batches.push(string_batch(&[
            ("num_acc", ids.iter().map(|s| Some(s.as_str())).collect()),
            ("num_veh", vehicles.iter().map(|s| Some(s.as_str())).collect()),
        ]));
    }

    let exploded = explode_batches(&batches, &MultiValueColumns::vehicles()).unwrap();
    assert_eq!(exploded.len(), batches.len());
    assert_eq!(
        exploded.iter().map(|b| b.num_rows()).sum::<usize>(),
        expected_total
    );

    for (input, output) in batches.iter().zip(&exploded) {
        let ids = column_values(output, "num_acc");
        let tokens = column_values(output, "num_veh");
        let positions = positions(output);

        // Positions restart at 0 for every source row and index the token
        let mut previous: Option<&Option<String>> = None;
        for ((id, token), position) in ids.iter().zip(&tokens).zip(&positions) {
            if previous != Some(id) {
                assert_eq!(*position, 0);
            }
            assert_eq!(token.as_deref(), Some(format!("V{position:02}").as_str()));
            previous = Some(id);
        }

        let mut distinct = ids.clone();
        distinct.dedup();
        assert_eq!(distinct, column_values(input, "num_acc"));
    }
}
