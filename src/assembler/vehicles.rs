//! The `vehicules` table.

use std::sync::Arc;

use arrow::array::{ArrayRef, Int32Array};
use arrow::record_batch::RecordBatch;

use super::{code_column, concat_all};
use crate::codes::tables::{FIXED_OBSTACLE, IMPACT_POINT, MANEUVER, MOBILE_OBSTACLE, VEHICLE_CATEGORY};
use crate::error::Result;
use crate::schema::{ACCIDENT_ID, MultiValueColumns, VEHICLE_NUMBER, vehicles_schema};
use crate::transform::numeric::int_column;
use crate::transform::{dedup_keep_first, explode_batches, project_columns, string_column, typed_batch};

/// Build the `vehicules` table, one row per `(num_acc, num_veh)`
pub fn build_vehicles(raw: &[RecordBatch]) -> Result<RecordBatch> {
    let set = MultiValueColumns::vehicles();
    let mut columns: Vec<&str> = vec![ACCIDENT_ID];
    columns.extend(set.columns().iter().map(String::as_str));

    let projected = raw
        .iter()
        .map(|batch| project_columns(batch, &columns))
        .collect::<Result<Vec<_>>>()?;
    let exploded = explode_batches(&projected, &set)?;
    let unique = concat_all(&dedup_keep_first(&exploded, &[ACCIDENT_ID, VEHICLE_NUMBER])?)?;

    let impact: Int32Array = code_column(&unique, "choc", &IMPACT_POINT)?;
    let maneuver: Int32Array = code_column(&unique, "manv", &MANEUVER)?;
    let mobile_obstacle: Int32Array = code_column(&unique, "obsm", &MOBILE_OBSTACLE)?;
    let fixed_obstacle: Int32Array = code_column(&unique, "obs", &FIXED_OBSTACLE)?;
    let category: Int32Array = code_column(&unique, "catv", &VEHICLE_CATEGORY)?;

    let columns: Vec<ArrayRef> = vec![
        Arc::new(string_column(&unique, ACCIDENT_ID)?),
        Arc::new(string_column(&unique, VEHICLE_NUMBER)?),
        Arc::new(int_column(&string_column(&unique, "senc")?)),
        Arc::new(category),
        Arc::new(fixed_obstacle),
        Arc::new(mobile_obstacle),
        Arc::new(impact),
        Arc::new(maneuver),
        Arc::new(int_column(&string_column(&unique, "occutc")?)),
    ];

    typed_batch(vehicles_schema(), columns)
}
