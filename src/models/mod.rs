//! Typed row views of the raw snapshot and of the four target tables.
//!
//! Rows convert to and from arrow record batches with `serde_arrow`, using the
//! fixed schemas of [`crate::schema`] rather than schemas traced from samples,
//! so a typed round trip always matches what the assembler produces.

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schema::{self, TargetTable};

/// Conversion between typed rows and record batches of a fixed schema
pub trait ArrowRow: Serialize + DeserializeOwned + Sized {
    /// Arrow schema of a batch holding these rows
    fn schema() -> SchemaRef;

    /// Deserialize every row of a batch
    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        serde_arrow::from_record_batch(batch)
            .map_err(|e| anyhow::anyhow!("Deserialization error: {e}"))
    }

    /// Serialize rows into a batch of [`ArrowRow::schema`]
    fn to_record_batch(rows: &[Self]) -> Result<RecordBatch> {
        let schema = Self::schema();
        serde_arrow::to_record_batch(schema.fields(), &rows)
            .map_err(|e| anyhow::anyhow!("Serialization error: {e}"))
    }
}

/// One raw accident row as distributed, every value kept as text
///
/// Vehicle- and person-scoped fields hold comma-separated lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAccidentRecord {
    pub num_acc: Option<String>,
    pub an: Option<String>,
    pub mois: Option<String>,
    pub jour: Option<String>,
    pub hrmn: Option<String>,
    pub lum: Option<String>,
    pub agg: Option<String>,
    pub int: Option<String>,
    pub atm: Option<String>,
    pub col: Option<String>,
    pub com: Option<String>,
    pub dep: Option<String>,
    pub lat: Option<String>,
    pub long: Option<String>,
    pub adr: Option<String>,
    pub catr: Option<String>,
    pub voie: Option<String>,
    pub circ: Option<String>,
    pub nbv: Option<String>,
    pub prof: Option<String>,
    pub plan: Option<String>,
    pub lartpc: Option<String>,
    pub larrout: Option<String>,
    pub surf: Option<String>,
    pub infra: Option<String>,
    pub situ: Option<String>,
    pub env1: Option<String>,
    pub vosp: Option<String>,
    pub an_nais: Option<String>,
    pub sexe: Option<String>,
    pub actp: Option<String>,
    pub grav: Option<String>,
    pub secu: Option<String>,
    pub secu_utl: Option<String>,
    pub locp: Option<String>,
    pub place: Option<String>,
    pub catu: Option<String>,
    pub etatp: Option<String>,
    pub trajet: Option<String>,
    pub num_veh: Option<String>,
    pub choc: Option<String>,
    pub manv: Option<String>,
    pub senc: Option<String>,
    pub obsm: Option<String>,
    pub obs: Option<String>,
    pub catv: Option<String>,
    pub occutc: Option<String>,
}

impl ArrowRow for RawAccidentRecord {
    fn schema() -> SchemaRef {
        schema::raw_schema()
    }
}

/// Row of the `accidents` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Accident {
    pub num_acc: Option<String>,
    pub heure: Option<i32>,
    pub minute: Option<i32>,
    pub annee: Option<i32>,
    pub mois: Option<i32>,
    pub jour: Option<i32>,
    pub jour_semaine: Option<i32>,
    pub com_code: Option<String>,
    pub departement_code: Option<String>,
    pub en_agglomeration: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub adresse: Option<String>,
    pub luminosite: Option<i32>,
    pub conditions_atmospheriques: Option<i32>,
    pub type_intersection: Option<i32>,
    pub type_collision: Option<i32>,
}

impl ArrowRow for Accident {
    fn schema() -> SchemaRef {
        TargetTable::Accidents.schema()
    }
}

/// Row of the `lieux` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub num_acc: Option<String>,
    pub categorie_route: Option<i32>,
    pub numero_route: Option<String>,
    pub regime_circulation: Option<i32>,
    pub nombre_voies: Option<i32>,
    pub voie_reservee: Option<i32>,
    pub profil_route: Option<i32>,
    pub trace_plan: Option<i32>,
    pub largeur_terre_plein: Option<f64>,
    pub largeur_chaussee: Option<f64>,
    pub etat_surface: Option<i32>,
    pub infrastructure: i32,
    pub situation: i32,
    pub proximite_ecole: bool,
}

impl ArrowRow for Location {
    fn schema() -> SchemaRef {
        TargetTable::Locations.schema()
    }
}

/// Row of the `vehicules` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub num_acc: Option<String>,
    pub num_veh: Option<String>,
    pub sens_circulation: Option<i32>,
    pub categorie_vehicule: Option<i32>,
    pub obstacle_fixe: Option<i32>,
    pub obstacle_mobile: i32,
    pub point_choc: Option<i32>,
    pub manoeuvre: Option<i32>,
    pub nb_occupants: Option<i32>,
}

impl ArrowRow for Vehicle {
    fn schema() -> SchemaRef {
        TargetTable::Vehicles.schema()
    }
}

/// Row of the `usagers` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub num_acc: Option<String>,
    pub num_veh: Option<String>,
    pub place_vehicule: Option<i32>,
    pub categorie_usager: Option<i32>,
    pub gravite: Option<i32>,
    pub sexe: Option<i32>,
    pub annee_naissance: Option<i32>,
    pub age_au_moment_accident: Option<i32>,
    pub motif_deplacement: Option<i32>,
    pub equipement_securite: Option<i32>,
    pub localisation_pieton: Option<i32>,
    pub action_pieton: Option<i32>,
    pub etat_pieton: Option<i32>,
}

impl ArrowRow for Person {
    fn schema() -> SchemaRef {
        TargetTable::Persons.schema()
    }
}
