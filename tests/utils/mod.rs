use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use accident_etl::models::{ArrowRow, RawAccidentRecord};
use accident_etl::transform::string_column;
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// A raw row carrying only its accident identifier and year
#[must_use]
pub fn raw_record(num_acc: &str) -> RawAccidentRecord {
    RawAccidentRecord {
        num_acc: Some(num_acc.to_string()),
        an: Some("2022".to_string()),
        ..Default::default()
    }
}

/// Two accidents: the first with two vehicles and three persons, the second
/// with one of each
#[must_use]
pub fn two_accident_snapshot() -> Vec<RawAccidentRecord> {
    vec![
        RawAccidentRecord {
            mois: Some("11".to_string()),
            jour: Some("30".to_string()),
            hrmn: Some("17:45".to_string()),
            lum: Some("Plein jour".to_string()),
            agg: Some("En agglomération".to_string()),
            atm: Some("Pluie légère".to_string()),
            com: Some("75".to_string()),
            dep: Some(" 75 ".to_string()),
            lat: Some("48,8566".to_string()),
            long: Some("2,3522".to_string()),
            catr: Some("Voie Communale".to_string()),
            surf: Some("Mouillée".to_string()),
            lartpc: Some("150".to_string()),
            num_veh: Some("A01,B01".to_string()),
            catv: Some("VL seul,Autobus".to_string()),
            obsm: Some("Véhicule,".to_string()),
            an_nais: Some("1980,1995,2010".to_string()),
            catu: Some("Conducteur,Conducteur,Passager".to_string()),
            grav: Some("Indemne,Tué,Blessé".to_string()),
            sexe: Some("Masculin,Féminin,Féminin".to_string()),
            ..raw_record("202200000001")
        },
        RawAccidentRecord {
            mois: Some("1".to_string()),
            jour: Some("3".to_string()),
            hrmn: Some("0815".to_string()),
            lat: Some("4872760".to_string()),
            long: Some("-2478760".to_string()),
            surf: Some("NORMALE".to_string()),
            num_veh: Some("A01".to_string()),
            catv: Some("Bicyclette".to_string()),
            an_nais: Some("1950".to_string()),
            catu: Some("Piéton".to_string()),
            grav: Some("Blessé hospitalisé".to_string()),
            ..raw_record("202200000002")
        },
    ]
}

/// Serialize raw rows into a raw-schema batch
pub fn raw_batch(rows: &[RawAccidentRecord]) -> RecordBatch {
    RawAccidentRecord::to_record_batch(rows).expect("raw rows serialize")
}

/// A batch of nullable `Utf8` columns
pub fn string_batch(columns: &[(&str, Vec<Option<&str>>)]) -> RecordBatch {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, _)| Field::new(*name, DataType::Utf8, true))
        .collect();
    let arrays: Vec<ArrayRef> = columns
        .iter()
        .map(|(_, values)| Arc::new(StringArray::from(values.clone())) as ArrayRef)
        .collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).expect("valid string batch")
}

/// Values of a column as owned optional strings
pub fn column_values(batch: &RecordBatch, column: &str) -> Vec<Option<String>> {
    string_column(batch, column)
        .expect("column exists")
        .iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

/// Write one batch to `<dir>/<name>` as parquet
pub fn write_parquet(dir: &Path, name: &str, batch: &RecordBatch) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).expect("create parquet file");
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).expect("parquet writer");
    writer.write(batch).expect("write batch");
    writer.close().expect("close writer");
    path
}
