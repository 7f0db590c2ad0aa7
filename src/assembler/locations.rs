//! The `lieux` table.

use std::sync::Arc;

use arrow::array::{ArrayRef, Int32Array, StringArray};
use arrow::record_batch::RecordBatch;

use super::{code_column, concat_all};
use crate::codes::tables::{
    CIRCULATION_REGIME, INFRASTRUCTURE, PLAN_TRACE, RESERVED_LANE, ROAD_CATEGORY, ROAD_PROFILE,
    SITUATION, SURFACE,
};
use crate::error::Result;
use crate::schema::{ACCIDENT_ID, LOCATION_COLUMNS, locations_schema};
use crate::transform::numeric::{centimeters_to_meters, int_column, numeric_flags, parse_int};
use crate::transform::{dedup_keep_first, project_columns, string_column, typed_batch};

/// Build the `lieux` table, one row per accident identifier
pub fn build_locations(raw: &[RecordBatch]) -> Result<RecordBatch> {
    let projected = raw
        .iter()
        .map(|batch| project_columns(batch, LOCATION_COLUMNS))
        .collect::<Result<Vec<_>>>()?;
    let unique = concat_all(&dedup_keep_first(&projected, &[ACCIDENT_ID])?)?;

    let road_category: Int32Array = code_column(&unique, "catr", &ROAD_CATEGORY)?;
    let circulation = circulation_regime(&string_column(&unique, "circ")?);
    let reserved_lane: Int32Array = code_column(&unique, "vosp", &RESERVED_LANE)?;
    let profile: Int32Array = code_column(&unique, "prof", &ROAD_PROFILE)?;
    let plan: Int32Array = code_column(&unique, "plan", &PLAN_TRACE)?;
    let surface: Int32Array = code_column(&unique, "surf", &SURFACE)?;
    let infrastructure: Int32Array = code_column(&unique, "infra", &INFRASTRUCTURE)?;
    let situation: Int32Array = code_column(&unique, "situ", &SITUATION)?;

    let columns: Vec<ArrayRef> = vec![
        Arc::new(string_column(&unique, ACCIDENT_ID)?),
        Arc::new(road_category),
        Arc::new(string_column(&unique, "voie")?),
        Arc::new(circulation),
        Arc::new(int_column(&string_column(&unique, "nbv")?)),
        Arc::new(reserved_lane),
        Arc::new(profile),
        Arc::new(plan),
        Arc::new(centimeters_to_meters(&string_column(&unique, "lartpc")?)),
        Arc::new(centimeters_to_meters(&string_column(&unique, "larrout")?)),
        Arc::new(surface),
        Arc::new(infrastructure),
        Arc::new(situation),
        // A school nearby is recorded as a numeric code, anything else is free text
        Arc::new(numeric_flags(&string_column(&unique, "env1")?)),
    ];

    typed_batch(locations_schema(), columns)
}

/// Circulation regime arrives either as a label or as its numeric code
fn circulation_regime(raw: &StringArray) -> Int32Array {
    raw.iter()
        .map(|value| CIRCULATION_REGIME.lookup_or_parse(value, parse_int))
        .collect()
}
