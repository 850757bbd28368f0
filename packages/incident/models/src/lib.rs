#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canonical incident types for the municipal public-safety observatory.
//!
//! Defines the canonical [`IncidentRecord`] shape that every imported
//! spreadsheet row is normalized into, the fixed [`IncidentCategory`]
//! taxonomy used across the system, and the ordered rule table that maps
//! source-specific type abbreviations (SIEDCO exports and similar) onto
//! canonical category names.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Canonical incident categories used by the observatory.
///
/// Source files name these inconsistently (abbreviations, prefixes,
/// punctuation), so imports classify free text through [`normalize_tipo`]
/// rather than parsing the canonical names directly. Free text that matches
/// no category is preserved as-is on the record and flagged by validation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
pub enum IncidentCategory {
    /// Intentional homicide.
    #[serde(rename = "HOMICIDIO")]
    #[strum(serialize = "HOMICIDIO")]
    Homicidio,
    /// Theft from persons (street robbery, pickpocketing).
    #[serde(rename = "HURTO A PERSONAS")]
    #[strum(serialize = "HURTO A PERSONAS")]
    HurtoAPersonas,
    /// Theft from commercial establishments.
    #[serde(rename = "HURTO A COMERCIO")]
    #[strum(serialize = "HURTO A COMERCIO")]
    HurtoAComercio,
    /// Residential burglary.
    #[serde(rename = "HURTO A RESIDENCIAS")]
    #[strum(serialize = "HURTO A RESIDENCIAS")]
    HurtoAResidencias,
    /// Personal injury / assault.
    #[serde(rename = "LESIONES PERSONALES")]
    #[strum(serialize = "LESIONES PERSONALES")]
    LesionesPersonales,
    /// Domestic violence.
    #[serde(rename = "VIOLENCIA INTRAFAMILIAR")]
    #[strum(serialize = "VIOLENCIA INTRAFAMILIAR")]
    ViolenciaIntrafamiliar,
    /// Brawl / affray.
    #[serde(rename = "RIÑA")]
    #[strum(serialize = "RIÑA")]
    Rina,
    /// Incidents that fit no other category.
    #[serde(rename = "OTROS")]
    #[strum(serialize = "OTROS")]
    Otros,
}

impl IncidentCategory {
    /// Returns the canonical upper-case name used by the backend.
    #[must_use]
    pub fn canonical_name(self) -> &'static str {
        self.into()
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Homicidio,
            Self::HurtoAPersonas,
            Self::HurtoAComercio,
            Self::HurtoAResidencias,
            Self::LesionesPersonales,
            Self::ViolenciaIntrafamiliar,
            Self::Rina,
            Self::Otros,
        ]
    }
}

/// How a [`TipoRule`] matches a raw (upper-cased, trimmed) type string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipoMatcher {
    /// Matches when the raw value starts with the given text.
    Prefix(&'static str),
    /// Matches when the raw value contains the given text anywhere.
    Contains(&'static str),
}

impl TipoMatcher {
    /// Checks this matcher against an already upper-cased, trimmed value.
    #[must_use]
    pub fn matches(self, raw: &str) -> bool {
        match self {
            Self::Prefix(prefix) => raw.starts_with(prefix),
            Self::Contains(needle) => raw.contains(needle),
        }
    }
}

/// One entry in the ordered tipo-normalization table.
#[derive(Debug, Clone, Copy)]
pub struct TipoRule {
    /// Pattern applied to the raw value.
    pub matcher: TipoMatcher,
    /// Category the raw value normalizes to when the pattern matches.
    pub category: IncidentCategory,
}

/// Ordered normalization rules for source-specific type abbreviations.
///
/// Rules are evaluated top to bottom; the first match wins. The prefixes
/// cover the abbreviation style used by SIEDCO spreadsheet exports
/// (`H.PERSONAS`, `H. COMERCIO`, `L.PERSONALES`, ...).
pub static TIPO_RULES: &[TipoRule] = &[
    TipoRule {
        matcher: TipoMatcher::Prefix("H.PERSONA"),
        category: IncidentCategory::HurtoAPersonas,
    },
    TipoRule {
        matcher: TipoMatcher::Prefix("H. PERSONA"),
        category: IncidentCategory::HurtoAPersonas,
    },
    TipoRule {
        matcher: TipoMatcher::Prefix("H.COMERCIO"),
        category: IncidentCategory::HurtoAComercio,
    },
    TipoRule {
        matcher: TipoMatcher::Prefix("H. COMERCIO"),
        category: IncidentCategory::HurtoAComercio,
    },
    TipoRule {
        matcher: TipoMatcher::Prefix("H.RESIDENCIA"),
        category: IncidentCategory::HurtoAResidencias,
    },
    TipoRule {
        matcher: TipoMatcher::Prefix("H. RESIDENCIA"),
        category: IncidentCategory::HurtoAResidencias,
    },
    TipoRule {
        matcher: TipoMatcher::Prefix("L.PERSONALES"),
        category: IncidentCategory::LesionesPersonales,
    },
    TipoRule {
        matcher: TipoMatcher::Prefix("L. PERSONALES"),
        category: IncidentCategory::LesionesPersonales,
    },
    TipoRule {
        matcher: TipoMatcher::Prefix("LESIONES"),
        category: IncidentCategory::LesionesPersonales,
    },
    TipoRule {
        matcher: TipoMatcher::Contains("HOMICI"),
        category: IncidentCategory::Homicidio,
    },
];

/// Normalizes a raw type string to a canonical category, if any rule matches.
///
/// The input is upper-cased and trimmed before matching, so callers can pass
/// cell values straight from a spreadsheet.
#[must_use]
pub fn normalize_tipo(raw: &str) -> Option<IncidentCategory> {
    let upper = raw.trim().to_uppercase();
    TIPO_RULES
        .iter()
        .find(|rule| rule.matcher.matches(&upper))
        .map(|rule| rule.category)
}

/// Checks whether a type value contains any recognized canonical category
/// name. Used by validation to flag non-standard types.
#[must_use]
pub fn contains_known_category(value: &str) -> bool {
    let upper = value.trim().to_uppercase();
    IncidentCategory::all()
        .iter()
        .any(|category| upper.contains(category.canonical_name()))
}

/// One public-safety incident in the canonical import shape.
///
/// Field names match the JSON contract of the ingestion backend (Spanish,
/// lower-case). Optional fields stay `None` when the source spreadsheet has
/// no matching column; validation flags them rather than dropping the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Calendar date (`YYYY-MM-DD`) the incident occurred.
    pub fecha: Option<String>,
    /// Incident category; canonical name or free text from the source.
    pub tipo: Option<String>,
    /// Neighborhood name.
    pub barrio: Option<String>,
    /// Free-text narrative.
    pub descripcion: Option<String>,
    /// Latitude (WGS84), possibly synthesized by the gazetteer.
    pub latitud: Option<f64>,
    /// Longitude (WGS84), possibly synthesized by the gazetteer.
    pub longitud: Option<f64>,
    /// Time of day, `"00:00"` when the source has none.
    pub hora: String,
}

impl Default for IncidentRecord {
    fn default() -> Self {
        Self {
            fecha: None,
            tipo: None,
            barrio: None,
            descripcion: None,
            latitud: None,
            longitud: None,
            hora: "00:00".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_siedco_abbreviations() {
        assert_eq!(
            normalize_tipo("H.PERSONAS"),
            Some(IncidentCategory::HurtoAPersonas)
        );
        assert_eq!(
            normalize_tipo("h. personas (celulares)"),
            Some(IncidentCategory::HurtoAPersonas)
        );
        assert_eq!(
            normalize_tipo("H.COMERCIO"),
            Some(IncidentCategory::HurtoAComercio)
        );
        assert_eq!(
            normalize_tipo("H. RESIDENCIAS"),
            Some(IncidentCategory::HurtoAResidencias)
        );
        assert_eq!(
            normalize_tipo("LESIONES PERSONALES"),
            Some(IncidentCategory::LesionesPersonales)
        );
        assert_eq!(
            normalize_tipo("L.PERSONALES"),
            Some(IncidentCategory::LesionesPersonales)
        );
        assert_eq!(
            normalize_tipo("HOMICIDIO INTENCIONAL"),
            Some(IncidentCategory::Homicidio)
        );
    }

    #[test]
    fn homicide_matches_anywhere() {
        assert_eq!(
            normalize_tipo("TENTATIVA DE HOMICIDIO"),
            Some(IncidentCategory::Homicidio)
        );
    }

    #[test]
    fn unknown_types_stay_unmapped() {
        assert_eq!(normalize_tipo("EXTORSION"), None);
        assert_eq!(normalize_tipo(""), None);
    }

    #[test]
    fn known_category_detection() {
        assert!(contains_known_category("HURTO A PERSONAS"));
        assert!(contains_known_category("riña callejera"));
        assert!(!contains_known_category("EXTORSION"));
    }

    #[test]
    fn canonical_names_round_trip() {
        for category in IncidentCategory::all() {
            let name = category.canonical_name();
            assert!(contains_known_category(name), "{name} not recognized");
        }
    }

    #[test]
    fn record_serializes_with_spanish_field_names() {
        let record = IncidentRecord {
            fecha: Some("2024-01-01".to_string()),
            tipo: Some("HOMICIDIO".to_string()),
            barrio: Some("Terranova".to_string()),
            descripcion: None,
            latitud: Some(3.2690),
            longitud: Some(-76.5315),
            hora: "00:00".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["fecha"], "2024-01-01");
        assert_eq!(json["hora"], "00:00");
        assert!(json["descripcion"].is_null());
    }
}
