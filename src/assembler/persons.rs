//! The `usagers` table.

use std::sync::Arc;

use arrow::array::{ArrayRef, Int32Array};
use arrow::record_batch::RecordBatch;

use super::{code_column, concat_all};
use crate::codes::tables::{SAFETY_EQUIPMENT, SEVERITY, SEX, USER_CATEGORY};
use crate::error::Result;
use crate::schema::{ACCIDENT_ID, BIRTH_YEAR, MultiValueColumns, VEHICLE_NUMBER, YEAR, persons_schema};
use crate::transform::numeric::{age_at_accident, int_column};
use crate::transform::{explode_batches, project_columns, string_column, typed_batch};

/// Build the `usagers` table, one row per person position
pub fn build_persons(raw: &[RecordBatch]) -> Result<RecordBatch> {
    let set = MultiValueColumns::persons();
    let mut columns: Vec<&str> = vec![ACCIDENT_ID, YEAR];
    columns.extend(set.columns().iter().map(String::as_str));

    let projected = raw
        .iter()
        .map(|batch| project_columns(batch, &columns))
        .collect::<Result<Vec<_>>>()?;
    let frame = concat_all(&explode_batches(&projected, &set)?)?;

    let birth_year = int_column(&string_column(&frame, BIRTH_YEAR)?);
    let age = age_at_accident(&int_column(&string_column(&frame, YEAR)?), &birth_year);

    let category: Int32Array = code_column(&frame, "catu", &USER_CATEGORY)?;
    let severity: Int32Array = code_column(&frame, "grav", &SEVERITY)?;
    let sex: Int32Array = code_column(&frame, "sexe", &SEX)?;
    let safety: Int32Array = code_column(&frame, "secu", &SAFETY_EQUIPMENT)?;

    let columns: Vec<ArrayRef> = vec![
        Arc::new(string_column(&frame, ACCIDENT_ID)?),
        Arc::new(string_column(&frame, VEHICLE_NUMBER)?),
        Arc::new(int_column(&string_column(&frame, "place")?)),
        Arc::new(category),
        Arc::new(severity),
        Arc::new(sex),
        Arc::new(birth_year),
        Arc::new(age),
        Arc::new(int_column(&string_column(&frame, "trajet")?)),
        Arc::new(safety),
        Arc::new(int_column(&string_column(&frame, "locp")?)),
        Arc::new(int_column(&string_column(&frame, "actp")?)),
        Arc::new(int_column(&string_column(&frame, "etatp")?)),
    ];

    typed_batch(persons_schema(), columns)
}
