//! Target tables and their typed arrow schemas.

use std::fmt;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};

/// The four relational tables populated by a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetTable {
    Accidents,
    Locations,
    Vehicles,
    Persons,
}

impl TargetTable {
    /// Load order, following the foreign-key direction
    pub const LOAD_ORDER: [Self; 4] = [Self::Accidents, Self::Locations, Self::Vehicles, Self::Persons];

    /// Table name in the relational store
    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Accidents => "accidents",
            Self::Locations => "lieux",
            Self::Vehicles => "vehicules",
            Self::Persons => "usagers",
        }
    }

    /// Typed schema of the table
    #[must_use]
    pub fn schema(self) -> SchemaRef {
        match self {
            Self::Accidents => accidents_schema(),
            Self::Locations => locations_schema(),
            Self::Vehicles => vehicles_schema(),
            Self::Persons => persons_schema(),
        }
    }
}

impl fmt::Display for TargetTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

fn int(name: &str) -> Field {
    Field::new(name, DataType::Int32, true)
}

fn float(name: &str) -> Field {
    Field::new(name, DataType::Float64, true)
}

fn text(name: &str) -> Field {
    Field::new(name, DataType::Utf8, true)
}

fn id() -> Field {
    Field::new("num_acc", DataType::Utf8, true)
}

/// Schema of the `accidents` table
#[must_use]
pub fn accidents_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        id(),
        int("heure"),
        int("minute"),
        int("annee"),
        int("mois"),
        int("jour"),
        int("jour_semaine"),
        text("com_code"),
        text("departement_code"),
        Field::new("en_agglomeration", DataType::Boolean, true),
        float("latitude"),
        float("longitude"),
        text("adresse"),
        int("luminosite"),
        int("conditions_atmospheriques"),
        int("type_intersection"),
        int("type_collision"),
    ]))
}

/// Schema of the `lieux` table
#[must_use]
pub fn locations_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        id(),
        int("categorie_route"),
        text("numero_route"),
        int("regime_circulation"),
        int("nombre_voies"),
        int("voie_reservee"),
        int("profil_route"),
        int("trace_plan"),
        float("largeur_terre_plein"),
        float("largeur_chaussee"),
        int("etat_surface"),
        Field::new("infrastructure", DataType::Int32, false),
        Field::new("situation", DataType::Int32, false),
        Field::new("proximite_ecole", DataType::Boolean, false),
    ]))
}

/// Schema of the `vehicules` table
#[must_use]
pub fn vehicles_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        id(),
        text("num_veh"),
        int("sens_circulation"),
        int("categorie_vehicule"),
        int("obstacle_fixe"),
        Field::new("obstacle_mobile", DataType::Int32, false),
        int("point_choc"),
        int("manoeuvre"),
        int("nb_occupants"),
    ]))
}

/// Schema of the `usagers` table
#[must_use]
pub fn persons_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        id(),
        text("num_veh"),
        int("place_vehicule"),
        int("categorie_usager"),
        int("gravite"),
        int("sexe"),
        int("annee_naissance"),
        int("age_au_moment_accident"),
        int("motif_deplacement"),
        int("equipement_securite"),
        int("localisation_pieton"),
        int("action_pieton"),
        int("etat_pieton"),
    ]))
}
