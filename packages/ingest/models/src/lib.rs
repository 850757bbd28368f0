#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Import session types: raw spreadsheet rows, the declared field-mapping
//! rule table, coordinate bounds, and per-record validation results.
//!
//! Everything here is transient — these values live only for the duration of
//! one import session and are discarded once the operator confirms (or
//! abandons) the upload.

use observatorio_incident_models::IncidentRecord;
use serde::{Deserialize, Serialize};

/// One spreadsheet cell after loading.
///
/// CSV exports of Excel files carry date serials and coordinates as plain
/// numbers, so any field that parses as `f64` loads as [`CellValue::Number`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Non-numeric text.
    Text(String),
    /// Numeric cell (including spreadsheet date serials).
    Number(f64),
    /// Blank cell.
    Empty,
}

impl CellValue {
    /// Parses a raw CSV field into a cell value.
    #[must_use]
    pub fn from_field(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        trimmed
            .parse::<f64>()
            .map_or_else(|_| Self::Text(trimmed.to_string()), Self::Number)
    }

    /// Returns the numeric value, if this cell is numeric.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) | Self::Empty => None,
        }
    }

    /// Renders the cell as a string, `None` when blank.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => {
                // Whole numbers render without a trailing ".0"
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    #[allow(clippy::cast_possible_truncation)]
                    Some(format!("{}", *n as i64))
                } else {
                    Some(format!("{n}"))
                }
            }
            Self::Empty => None,
        }
    }

    /// Whether the cell is blank.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// One raw spreadsheet row: ordered `column name → cell` pairs.
///
/// Keys are stored trimmed and lower-cased; order is preserved because the
/// coordinate resolver scans cells positionally as a last resort.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    /// Builds a row by zipping a header row with one data row.
    ///
    /// Extra data cells beyond the header length are ignored; missing ones
    /// load as [`CellValue::Empty`].
    #[must_use]
    pub fn from_header(header: &[String], fields: &[String]) -> Self {
        let cells = header
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let value = fields
                    .get(i)
                    .map_or(CellValue::Empty, |f| CellValue::from_field(f));
                (name.trim().to_lowercase(), value)
            })
            .collect();
        Self { cells }
    }

    /// Returns the cell stored under the given (already lower-cased) key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Iterates over `(column name, cell)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Column names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Canonical fields the mapper can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    /// Occurrence date.
    Fecha,
    /// Incident type.
    Tipo,
    /// Neighborhood.
    Barrio,
    /// Narrative.
    Descripcion,
    /// Latitude column.
    Latitud,
    /// Longitude column.
    Longitud,
    /// Time of day.
    Hora,
}

/// One mapping rule: a canonical field and its candidate column keywords,
/// ordered from most to least specific.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Field this rule populates.
    pub field: CanonicalField,
    /// Candidate column-name keywords.
    pub keywords: &'static [&'static str],
}

/// Declared column-keyword table for the canonical record shape.
///
/// The keyword lists cover the column naming seen across SIEDCO and police
/// spreadsheet exports. Keeping them in one table (rather than scattered
/// string matching) makes the mapping testable and easy to extend.
pub static FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: CanonicalField::Fecha,
        keywords: &["fecha_hecho", "fecha", "dia", "date"],
    },
    FieldRule {
        field: CanonicalField::Tipo,
        keywords: &[
            "descripcion_conducta",
            "delito",
            "clase_de_sitio",
            "conducta",
            "tipo",
        ],
    },
    FieldRule {
        field: CanonicalField::Barrio,
        keywords: &["barrios_hecho", "barrio", "sector", "comuna"],
    },
    FieldRule {
        field: CanonicalField::Descripcion,
        keywords: &[
            "modalidad",
            "detalle_de_la_conducta",
            "observacion",
            "descripcion",
            "detalle",
        ],
    },
    FieldRule {
        field: CanonicalField::Latitud,
        keywords: &[
            "latitud_hecho",
            "latitud",
            "lat",
            "y_hecho",
            "coordenada_y",
            "coord_y",
            "coordy",
            "y",
            "norte",
        ],
    },
    FieldRule {
        field: CanonicalField::Longitud,
        keywords: &[
            "longitud_hecho",
            "longitud",
            "long",
            "lon",
            "x_hecho",
            "coordenada_x",
            "coord_x",
            "coordx",
            "x",
            "este",
        ],
    },
    FieldRule {
        field: CanonicalField::Hora,
        keywords: &["hora24", "hora_hecho", "hora", "time"],
    },
];

/// Returns the keyword list for a canonical field.
#[must_use]
pub fn keywords_for(field: CanonicalField) -> &'static [&'static str] {
    FIELD_RULES
        .iter()
        .find(|rule| rule.field == field)
        .map_or(&[], |rule| rule.keywords)
}

/// Municipality bounding box used by the last-resort coordinate scan.
///
/// Defaults to Jamundí; set different bounds when reusing the importer for
/// another municipality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateBounds {
    /// Exclusive lower latitude bound.
    pub lat_min: f64,
    /// Exclusive upper latitude bound.
    pub lat_max: f64,
    /// Exclusive lower longitude bound.
    pub lng_min: f64,
    /// Exclusive upper longitude bound.
    pub lng_max: f64,
}

impl Default for CoordinateBounds {
    fn default() -> Self {
        Self {
            lat_min: 3.2,
            lat_max: 3.4,
            lng_min: -76.6,
            lng_max: -76.4,
        }
    }
}

impl CoordinateBounds {
    /// Whether a value falls inside the latitude band.
    #[must_use]
    pub fn contains_lat(&self, value: f64) -> bool {
        value > self.lat_min && value < self.lat_max
    }

    /// Whether a value falls inside the longitude band.
    #[must_use]
    pub fn contains_lng(&self, value: f64) -> bool {
        value > self.lng_min && value < self.lng_max
    }
}

/// Options for one import analysis pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Bounding box for coordinate inference.
    pub bounds: CoordinateBounds,
}

/// Severity of validation findings for one record.
///
/// Ordered so that escalation is a plain `max`: an error, once set, is never
/// downgraded by later warning-only rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// No issues found.
    Ok,
    /// Non-fatal findings or applied corrections.
    Warning,
    /// Required data missing or unusable.
    Error,
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Ok => "ok",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        write!(f, "{label}")
    }
}

/// Outcome of validating one record: the untouched original, the corrected
/// copy, the aggregate status, and a human-readable summary.
///
/// No status rejects the record — the operator decides whether to import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Record as produced by the mapper.
    pub original: IncidentRecord,
    /// Record with normalizations applied.
    pub corrected: IncidentRecord,
    /// Aggregate severity.
    pub status: ValidationStatus,
    /// Deduplicated findings and corrections, joined with `". "`.
    pub message: String,
}
