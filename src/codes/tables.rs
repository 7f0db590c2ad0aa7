//! Translation tables from the snapshot's textual labels to integer codes.
//!
//! Keys are the labels exactly as distributed in the raw snapshot. Only the
//! surface-state table lowercases its input before lookup.

use std::sync::LazyLock;

use super::CodeMap;

/// Person severity (`grav`)
pub static SEVERITY: LazyLock<CodeMap<i32>> = LazyLock::new(|| {
    CodeMap::new(
        "gravite",
        &[("Indemne", 1), ("Tué", 2), ("Blessé hospitalisé", 3), ("Blessé", 4)],
    )
});

/// Lighting conditions (`lum`)
pub static LUMINOSITY: LazyLock<CodeMap<i32>> = LazyLock::new(|| {
    CodeMap::new(
        "luminosite",
        &[
            ("Plein jour", 1),
            ("Crépuscule ou aube", 2),
            ("Nuit sans éclairage public", 3),
            ("Nuit avec éclairage public non allumé", 4),
            ("Nuit avec éclairage public allumé", 5),
        ],
    )
});

/// Atmospheric conditions (`atm`)
pub static ATMOSPHERE: LazyLock<CodeMap<i32>> = LazyLock::new(|| {
    CodeMap::new(
        "conditions_atmospheriques",
        &[
            ("Normale", 1),
            ("Pluie légère", 2),
            ("Pluie forte", 3),
            ("Neige - grêle", 4),
            ("Brouillard - fumée", 5),
            ("Vent fort - tempête", 6),
            ("Temps éblouissant", 7),
            ("Temps couvert", 8),
            ("Autre", 9),
        ],
    )
});

/// Inside / outside built-up area (`agg`)
pub static AGGLOMERATION: LazyLock<CodeMap<bool>> = LazyLock::new(|| {
    CodeMap::new(
        "en_agglomeration",
        &[("Hors agglomération", false), ("En agglomération", true)],
    )
});

/// Intersection type (`int`)
pub static INTERSECTION: LazyLock<CodeMap<i32>> = LazyLock::new(|| {
    CodeMap::new(
        "type_intersection",
        &[
            ("Hors intersection", 1),
            ("Intersection en X", 2),
            ("Intersection en T", 3),
            ("Intersection en Y", 4),
            ("Intersection à plus de 4 branches", 5),
            ("Giratoire", 6),
            ("Place", 7),
            ("Passage à niveau", 8),
            ("Autre intersection", 9),
        ],
    )
});

/// Collision type (`col`)
pub static COLLISION: LazyLock<CodeMap<i32>> = LazyLock::new(|| {
    CodeMap::new(
        "type_collision",
        &[
            ("Deux véhicules - frontale", 1),
            ("Deux véhicules - par l'arrière", 2),
            ("Deux véhicules - par le coté", 3),
            ("Trois véhicules et plus - en chaîne", 4),
            ("Trois véhicules et plus - collisions multiples", 5),
            ("Autre collision", 6),
            ("Sans collision", 7),
        ],
    )
});

/// Road category (`catr`)
pub static ROAD_CATEGORY: LazyLock<CodeMap<i32>> = LazyLock::new(|| {
    CodeMap::new(
        "categorie_route",
        &[
            ("Autoroute", 1),
            ("Route Nationale", 2),
            ("Route Départementale", 3),
            ("Voie Communale", 4),
            ("Hors réseau public", 5),
            ("Parc de stationnement ouvert à la circulation publique", 6),
            ("autre", 9),
        ],
    )
});

/// Surface state (`surf`), matched on the lowercased label
pub static SURFACE: LazyLock<CodeMap<i32>> = LazyLock::new(|| {
    CodeMap::new(
        "etat_surface",
        &[
            ("normale", 1),
            ("mouillée", 2),
            ("flaques", 3),
            ("inondée", 4),
            ("enneigée", 5),
            ("boue", 6),
            ("verglacée", 7),
            ("corps gras - huile", 8),
            ("autre", 9),
        ],
    )
    .lowercase_keys()
});

/// User category (`catu`)
pub static USER_CATEGORY: LazyLock<CodeMap<i32>> = LazyLock::new(|| {
    CodeMap::new(
        "categorie_usager",
        &[
            ("Conducteur", 1),
            ("Passager", 2),
            ("Piéton", 3),
            ("Piéton en roller ou en trottinette", 4),
        ],
    )
});

/// Sex (`sexe`)
pub static SEX: LazyLock<CodeMap<i32>> =
    LazyLock::new(|| CodeMap::new("sexe", &[("Masculin", 1), ("Féminin", 2)]));

/// Accident situation (`situ`), 0 when absent
pub static SITUATION: LazyLock<CodeMap<i32>> = LazyLock::new(|| {
    CodeMap::new(
        "situation",
        &[
            ("Sur chaussée", 1),
            ("Sur accotement", 2),
            ("Sur trottoir", 3),
            ("Sur bande d'arrêt d'urgence", 4),
            ("Sur piste cyclable", 5),
            ("8", 8),
            ("6", 6),
            ("-1", 0),
            ("Autre", 9),
        ],
    )
    .with_default(0)
});

/// Infrastructure (`infra`), 0 when absent
pub static INFRASTRUCTURE: LazyLock<CodeMap<i32>> = LazyLock::new(|| {
    CodeMap::new(
        "infrastructure",
        &[
            ("Carrefour aménagé", 1),
            ("Pont - autopont", 2),
            ("Bretelle d'échangeur ou de raccordement", 3),
            ("Zone piétonne", 4),
            ("Souterrain - tunnel", 5),
            ("Voie ferrée", 6),
            ("Zone de péage", 7),
            ("9", 9),
            ("8", 8),
            ("-1", 0),
            ("0", 0),
            ("Aucune", 0),
            ("Autre", 9),
        ],
    )
    .with_default(0)
});

/// Mobile obstacle hit (`obsm`), 0 when absent
pub static MOBILE_OBSTACLE: LazyLock<CodeMap<i32>> = LazyLock::new(|| {
    CodeMap::new(
        "obstacle_mobile",
        &[
            ("Véhicule", 1),
            ("Piéton", 2),
            ("Autre", 3),
            ("Animal sauvage", 4),
            ("Animal domestique", 5),
            ("Véhicule sur rail", 6),
            ("-1", 0),
            ("0", 0),
            ("Aucun", 0),
        ],
    )
    .with_default(0)
});

/// Vehicle category (`catv`)
pub static VEHICLE_CATEGORY: LazyLock<CodeMap<i32>> = LazyLock::new(|| {
    CodeMap::new(
        "categorie_vehicule",
        &[
            ("VL seul", 1),
            ("VL + caravane", 2),
            ("VL + remorque", 3),
            ("VU seul", 4),
            ("VU + caravane", 5),
            ("VU + remorque", 6),
            ("PL seul", 7),
            ("PL + remorque", 8),
            ("PL train", 9),
            ("PL double", 10),
            ("Cyclo 50cm3", 11),
            ("Cyclo 125cm3", 12),
            ("Moto > 125cm3", 13),
            ("Scooter < 50cm3", 14),
            ("Scooter > 50cm3", 15),
            ("Quad", 16),
            ("Autocar", 17),
            ("Autobus", 18),
            ("Train", 19),
            ("Tramway", 20),
            ("Engin agricole", 21),
            ("Tracteur routier", 22),
            ("Autre", 99),
        ],
    )
});

/// Safety equipment (`secu`)
pub static SAFETY_EQUIPMENT: LazyLock<CodeMap<i32>> = LazyLock::new(|| {
    CodeMap::new(
        "equipement_securite",
        &[
            ("Ceinture", 1),
            ("Casque", 2),
            ("Gilet réfléchissant", 3),
            ("Airbag", 4),
            ("Gants", 5),
            ("Gants + Casque", 6),
            ("Ceinture + Airbag", 7),
            ("Autre équipement", 99),
            ("Aucun équipement", 0),
        ],
    )
});

/// Reserved lane (`vosp`); `-1` is kept as its own code
pub static RESERVED_LANE: LazyLock<CodeMap<i32>> = LazyLock::new(|| {
    CodeMap::new(
        "voie_reservee",
        &[
            ("Piste cyclable", 1),
            ("Banque cyclable", 2),
            ("Voie réservée", 3),
            ("-1", -1),
        ],
    )
});

/// Maneuver before the accident (`manv`)
pub static MANEUVER: LazyLock<CodeMap<i32>> = LazyLock::new(|| {
    CodeMap::new(
        "manoeuvre",
        &[
            ("manv d’évitement", 1),
            ("Sans changement de direction", 2),
            ("manv de stationnement", 3),
            ("Tournant A gauche", 4),
            ("Déporté A gauche", 5),
            ("Même senc", 6),
            ("Arrêté (hors stationnement)", 7),
            ("Dépassant A gauche", 8),
            ("En s'insérant", 9),
            ("Traversant la chaussée", 10),
            ("Tournant A droite", 11),
            ("Déporté A droite", 12),
            ("Dépassant A droite", 13),
            ("Changeant de file A gauche", 14),
            ("Changeant de file A droite", 15),
            ("En faisant demi-tour sur la chaussée", 16),
            ("En stationnement (avec occupants)", 17),
            ("En marche arrière", 18),
            ("Ouverture de porte", 19),
            ("Entre 2 files", 20),
            ("Dans le couloir bus", 21),
            ("En franchissant le terre-plein central", 22),
            ("A contresenc", 23),
            ("26", 26),
        ],
    )
});

/// Fixed obstacle hit (`obs`)
pub static FIXED_OBSTACLE: LazyLock<CodeMap<i32>> = LazyLock::new(|| {
    CodeMap::new(
        "obstacle_fixe",
        &[
            ("Véhicule en stationnement", 1),
            ("Arbre", 2),
            ("Glissière métallique", 3),
            ("Glissière béton", 4),
            ("Autre glissière", 5),
            ("Mur", 6),
            ("Poteau", 7),
            ("Mobilier urbain", 8),
            ("Parapet", 9),
            ("Support de signalisation", 10),
            ("Gril", 11),
            ("Fossé", 12),
            ("Talus", 13),
            ("Autre obstacle fixe", 99),
            ("Aucun", 0),
        ],
    )
});

/// Road profile (`prof`); `-1` means unknown and maps to null
pub static ROAD_PROFILE: LazyLock<CodeMap<i32>> = LazyLock::new(|| {
    CodeMap::new(
        "profil_route",
        &[("Plat", 1), ("Pente", 2), ("Sommet de côte", 3), ("Bas de côte", 4)],
    )
});

/// Plan trace (`plan`)
pub static PLAN_TRACE: LazyLock<CodeMap<i32>> = LazyLock::new(|| {
    CodeMap::new(
        "trace_plan",
        &[
            ("Partie rectiligne", 1),
            ("En courbe à gauche", 2),
            ("En courbe à droite", 3),
            ("En « S »", 4),
        ],
    )
});

/// Circulation regime (`circ`)
pub static CIRCULATION_REGIME: LazyLock<CodeMap<i32>> = LazyLock::new(|| {
    CodeMap::new(
        "regime_circulation",
        &[
            ("Sens unique", 1),
            ("Bidirectionnelle", 2),
            ("À chaussées séparées", 3),
            ("Avec voies d'affectation variable", 4),
        ],
    )
});

/// Initial impact point (`choc`)
pub static IMPACT_POINT: LazyLock<CodeMap<i32>> = LazyLock::new(|| {
    CodeMap::new(
        "point_choc",
        &[("Avant", 1), ("Arrière", 2), ("Côté gauche", 3), ("Côté droit", 4)],
    )
});
