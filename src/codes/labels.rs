//! Human-readable labels for the integer codes, used by the analysis report.

/// Label used when a code is missing or unknown
pub const NOT_PROVIDED: &str = "Non renseigné";

fn find(table: &[(i32, &'static str)], code: Option<i32>) -> &'static str {
    code.and_then(|code| table.iter().find(|(c, _)| *c == code).map(|(_, label)| *label))
        .unwrap_or(NOT_PROVIDED)
}

const ATMOSPHERE: &[(i32, &str)] = &[
    (1, "Normale"),
    (2, "Pluie légère"),
    (3, "Pluie forte"),
    (4, "Neige - grêle"),
    (5, "Brouillard - fumée"),
    (6, "Vent fort - tempête"),
    (7, "Temps éblouissant"),
    (8, "Temps couvert"),
    (9, "Autre"),
];

const LUMINOSITY: &[(i32, &str)] = &[
    (1, "Plein jour"),
    (2, "Crépuscule ou aube"),
    (3, "Nuit sans éclairage"),
    (4, "Nuit avec éclairage non allumé"),
    (5, "Nuit avec éclairage allumé"),
];

const ROAD_CATEGORY: &[(i32, &str)] = &[
    (1, "Autoroute"),
    (2, "Route nationale"),
    (3, "Route Départementale"),
    (4, "Voie Communale"),
    (5, "Hors réseau public"),
    (6, "Parc de stationnement ouvert à la circulation publique"),
    (7, "Routes de métropole urbaine"),
    (9, "Autre"),
];

const SURFACE: &[(i32, &str)] = &[
    (1, "Normale"),
    (2, "Mouillée"),
    (3, "Flaques"),
    (4, "Inondée"),
    (5, "Enneigée"),
    (6, "Boue"),
    (7, "Verglacée"),
    (8, "Corps gras - huile"),
    (9, "Autre"),
];

const USER_CATEGORY: &[(i32, &str)] = &[
    (1, "Conducteur"),
    (2, "Passager"),
    (3, "Piéton"),
    (4, "Piéton en roller ou en trottinette"),
];

const SEVERITY: &[(i32, &str)] = &[
    (1, "Indemne"),
    (2, "Tué"),
    (3, "Blessé hospitalisé"),
    (4, "Blessé léger"),
];

#[must_use]
pub fn atmosphere(code: Option<i32>) -> &'static str {
    find(ATMOSPHERE, code)
}

#[must_use]
pub fn luminosity(code: Option<i32>) -> &'static str {
    find(LUMINOSITY, code)
}

#[must_use]
pub fn road_category(code: Option<i32>) -> &'static str {
    find(ROAD_CATEGORY, code)
}

#[must_use]
pub fn surface(code: Option<i32>) -> &'static str {
    find(SURFACE, code)
}

#[must_use]
pub fn user_category(code: Option<i32>) -> &'static str {
    find(USER_CATEGORY, code)
}

#[must_use]
pub fn severity(code: Option<i32>) -> &'static str {
    find(SEVERITY, code)
}
