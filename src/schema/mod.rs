//! Column layout of the raw snapshot and of the multi-value column sets.
//!
//! The raw snapshot is read column-pruned to [`raw_columns`], every column
//! conformed to nullable `Utf8` (see [`raw_schema`]).

pub mod tables;

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};

pub use tables::{TargetTable, accidents_schema, locations_schema, persons_schema, vehicles_schema};

/// Accident identifier, shared by every target table
pub const ACCIDENT_ID: &str = "num_acc";

/// Accident year, also needed by the person table for age computation
pub const YEAR: &str = "an";

/// Vehicle number, the canonical cardinality source of the vehicle set
pub const VEHICLE_NUMBER: &str = "num_veh";

/// Birth year, the canonical cardinality source of the person set
pub const BIRTH_YEAR: &str = "an_nais";

/// Scalar accident-scoped columns
pub const ACCIDENT_COLUMNS: &[&str] = &[
    "num_acc", "an", "mois", "jour", "hrmn", "lum", "agg", "int", "atm", "col", "com", "dep",
    "lat", "long", "adr",
];

/// Scalar location-scoped columns
pub const LOCATION_COLUMNS: &[&str] = &[
    "num_acc", "catr", "voie", "circ", "nbv", "prof", "plan", "lartpc", "larrout", "surf",
    "infra", "situ", "env1", "vosp",
];

/// Person-scoped multi-value columns
pub const PERSON_MULTI_COLUMNS: &[&str] = &[
    "an_nais", "sexe", "actp", "grav", "secu", "secu_utl", "locp", "place", "catu", "etatp",
    "trajet",
];

/// Vehicle-scoped multi-value columns
pub const VEHICLE_MULTI_COLUMNS: &[&str] = &[
    "num_veh", "choc", "manv", "senc", "obsm", "obs", "catv", "occutc",
];

/// A named set of parallel multi-value columns sharing one cardinality per row
///
/// The canonical column decides how many positions a row explodes into; every
/// other column of the set is read against that positional scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiValueColumns {
    name: String,
    canonical: String,
    columns: Vec<String>,
}

impl MultiValueColumns {
    /// Create a column set; the canonical column is placed first if absent from `columns`
    pub fn new<S: AsRef<str>>(name: &str, canonical: &str, columns: &[S]) -> Self {
        let mut all: Vec<String> = Vec::with_capacity(columns.len() + 1);
        all.push(canonical.to_string());
        for column in columns {
            let column = column.as_ref();
            if !all.iter().any(|c| c == column) {
                all.push(column.to_string());
            }
        }

        Self {
            name: name.to_string(),
            canonical: canonical.to_string(),
            columns: all,
        }
    }

    /// A set with no columns; exploding against it is the identity
    #[must_use]
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            canonical: String::new(),
            columns: Vec::new(),
        }
    }

    /// Vehicle-scoped set, cardinality from `num_veh`
    #[must_use]
    pub fn vehicles() -> Self {
        Self::new("vehicles", VEHICLE_NUMBER, VEHICLE_MULTI_COLUMNS)
    }

    /// Person-scoped set, cardinality from `an_nais`
    ///
    /// The vehicle number is carried along and read at the person position.
    #[must_use]
    pub fn persons() -> Self {
        let mut columns: Vec<&str> = PERSON_MULTI_COLUMNS.to_vec();
        columns.push(VEHICLE_NUMBER);
        Self::new("persons", BIRTH_YEAR, &columns)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// Every raw column the ETL reads, in a fixed order and without duplicates
#[must_use]
pub fn raw_columns() -> Vec<&'static str> {
    let mut columns: Vec<&'static str> = Vec::new();
    for column in ACCIDENT_COLUMNS
        .iter()
        .chain(LOCATION_COLUMNS)
        .chain(PERSON_MULTI_COLUMNS)
        .chain(VEHICLE_MULTI_COLUMNS)
    {
        if !columns.contains(column) {
            columns.push(column);
        }
    }
    columns
}

/// Raw snapshot schema: every read column as nullable `Utf8`
#[must_use]
pub fn raw_schema() -> SchemaRef {
    let fields: Vec<Field> = raw_columns()
        .into_iter()
        .map(|name| Field::new(name, DataType::Utf8, true))
        .collect();
    Arc::new(Schema::new(fields))
}
