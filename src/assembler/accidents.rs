//! The `accidents` table.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Int32Array};
use arrow::record_batch::RecordBatch;
use log::info;

use super::{code_column, concat_all};
use crate::codes::tables::{AGGLOMERATION, ATMOSPHERE, COLLISION, INTERSECTION, LUMINOSITY};
use crate::error::Result;
use crate::schema::{ACCIDENT_COLUMNS, ACCIDENT_ID, accidents_schema};
use crate::transform::numeric::{day_of_week, hour_minute, int_column, trimmed, zero_pad};
use crate::transform::{
    dedup_keep_first, normalize_coordinates, project_columns, string_column, typed_batch,
};

/// Width of the INSEE commune code
const COMMUNE_CODE_WIDTH: usize = 5;

/// Build the `accidents` table, one row per accident identifier
pub fn build_accidents(raw: &[RecordBatch]) -> Result<RecordBatch> {
    let projected = raw
        .iter()
        .map(|batch| project_columns(batch, ACCIDENT_COLUMNS))
        .collect::<Result<Vec<_>>>()?;
    let unique = concat_all(&dedup_keep_first(&projected, &[ACCIDENT_ID])?)?;

    type_accidents(&unique)
}

fn type_accidents(frame: &RecordBatch) -> Result<RecordBatch> {
    let (hours, minutes) = hour_minute(&string_column(frame, "hrmn")?);
    let year = int_column(&string_column(frame, "an")?);
    let month = int_column(&string_column(frame, "mois")?);
    let day = int_column(&string_column(frame, "jour")?);
    let weekday = day_of_week(&year, &month, &day);

    let latitude = normalize_coordinates(&string_column(frame, "lat")?);
    let longitude = normalize_coordinates(&string_column(frame, "long")?);
    log_coordinate_validity(frame.num_rows(), &latitude, &longitude);

    let agglomeration: BooleanArray = code_column(frame, "agg", &AGGLOMERATION)?;
    let luminosity: Int32Array = code_column(frame, "lum", &LUMINOSITY)?;
    let atmosphere: Int32Array = code_column(frame, "atm", &ATMOSPHERE)?;
    let intersection: Int32Array = code_column(frame, "int", &INTERSECTION)?;
    let collision: Int32Array = code_column(frame, "col", &COLLISION)?;

    let columns: Vec<ArrayRef> = vec![
        Arc::new(string_column(frame, ACCIDENT_ID)?),
        Arc::new(hours),
        Arc::new(minutes),
        Arc::new(year),
        Arc::new(month),
        Arc::new(day),
        Arc::new(weekday),
        Arc::new(zero_pad(&string_column(frame, "com")?, COMMUNE_CODE_WIDTH)),
        Arc::new(trimmed(&string_column(frame, "dep")?)),
        Arc::new(agglomeration),
        Arc::new(latitude),
        Arc::new(longitude),
        Arc::new(string_column(frame, "adr")?),
        Arc::new(luminosity),
        Arc::new(atmosphere),
        Arc::new(intersection),
        Arc::new(collision),
    ];

    typed_batch(accidents_schema(), columns)
}

fn log_coordinate_validity(total: usize, latitude: &dyn Array, longitude: &dyn Array) {
    let percent = |valid: usize| {
        if total == 0 {
            0.0
        } else {
            valid as f64 * 100.0 / total as f64
        }
    };
    let lat_valid = total - latitude.null_count();
    let long_valid = total - longitude.null_count();

    info!(
        "Valid coordinates: latitude {lat_valid}/{total} ({:.1}%), longitude {long_valid}/{total} ({:.1}%)",
        percent(lat_valid),
        percent(long_valid)
    );
}
