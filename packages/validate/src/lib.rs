#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Rule-based quality checking for imported incident records.
//!
//! [`validate`] is a pure function: rules run in a fixed order, each may
//! append findings, record corrections on a copy of the record, and escalate
//! the aggregate status (`ok → warning → error`; an error is never
//! downgraded, but later warning rules still run and their messages are
//! kept). No rule rejects a record — every record comes back importable and
//! the operator decides whether to proceed.

use chrono::NaiveDate;
use observatorio_incident_models::{IncidentRecord, contains_known_category, normalize_tipo};
use observatorio_ingest_models::{ValidationResult, ValidationStatus};

/// Date formats accepted for `fecha`.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Validates one record, producing the corrected copy plus findings.
#[must_use]
pub fn validate(record: &IncidentRecord) -> ValidationResult {
    let mut issues: Vec<String> = Vec::new();
    let mut corrections: Vec<String> = Vec::new();
    let mut status = ValidationStatus::Ok;
    let mut corrected = record.clone();

    // 1. Fecha
    match record.fecha.as_deref().map(str::trim) {
        None | Some("") => {
            status = status.max(ValidationStatus::Error);
            issues.push("Fecha faltante".to_string());
        }
        Some(fecha) => {
            if parse_fecha(fecha).is_none() {
                status = status.max(ValidationStatus::Error);
                issues.push("Fecha inválida".to_string());
            }
        }
    }

    // 2. Tipo normalization
    let original_tipo = record.tipo.clone().unwrap_or_default();
    if let Some(category) = normalize_tipo(&original_tipo) {
        let canonical = category.canonical_name();
        if original_tipo.trim().to_uppercase() != canonical {
            corrected.tipo = Some(canonical.to_string());
            corrections.push(format!("Tipo normalizado a {canonical}"));
            status = status.max(ValidationStatus::Warning);
        }
    }
    let tipo_after = corrected.tipo.clone().unwrap_or_default();
    if !contains_known_category(&tipo_after) {
        status = status.max(ValidationStatus::Warning);
        issues.push(format!("Tipo de delito no estándar: {original_tipo}"));
    }

    // 3. Barrio
    match record.barrio.as_deref().map(str::trim) {
        None | Some("") | Some("undefined") => {
            status = status.max(ValidationStatus::Error);
            issues.push("Barrio faltante".to_string());
        }
        Some(barrio) => {
            let capitalized = title_case(barrio);
            if capitalized != barrio {
                corrected.barrio = Some(capitalized);
                corrections.push("Capitalización de barrio corregida".to_string());
                status = status.max(ValidationStatus::Warning);
            }
        }
    }

    // 4. Descripción
    let descripcion_ok = record
        .descripcion
        .as_deref()
        .map(str::trim)
        .is_some_and(|d| d.chars().count() >= 3 && d != "undefined");
    if !descripcion_ok {
        status = status.max(ValidationStatus::Warning);
        issues.push("Descripción insuficiente".to_string());
    }

    let message = build_message(&issues, &corrections);

    ValidationResult {
        original: record.clone(),
        corrected,
        status,
        message,
    }
}

/// Parses a `fecha` value in any accepted format.
#[must_use]
pub fn parse_fecha(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Capitalizes the first letter of each word, preserving the rest.
///
/// "First letter" means the first alphanumeric character of each
/// whitespace-delimited word, so punctuation-led names like `"(sur)"`
/// become `"(Sur)"`.
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;

    for c in input.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start && c.is_alphanumeric() {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.push(c);
        }
    }

    out
}

/// Joins deduplicated findings and corrections into one summary line.
fn build_message(issues: &[String], corrections: &[String]) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(issues.len() + corrections.len());
    for part in issues.iter().chain(corrections) {
        if !parts.contains(&part.as_str()) {
            parts.push(part);
        }
    }

    if parts.is_empty() {
        "Validado correctamente".to_string()
    } else {
        parts.join(". ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        fecha: Option<&str>,
        tipo: Option<&str>,
        barrio: Option<&str>,
        descripcion: Option<&str>,
    ) -> IncidentRecord {
        IncidentRecord {
            fecha: fecha.map(String::from),
            tipo: tipo.map(String::from),
            barrio: barrio.map(String::from),
            descripcion: descripcion.map(String::from),
            latitud: Some(3.26),
            longitud: Some(-76.53),
            hora: "00:00".to_string(),
        }
    }

    #[test]
    fn clean_record_validates_ok() {
        let result = validate(&record(
            Some("2024-01-01"),
            Some("HOMICIDIO"),
            Some("Terranova"),
            Some("riña entre vecinos"),
        ));
        assert_eq!(result.status, ValidationStatus::Ok);
        assert_eq!(result.message, "Validado correctamente");
        assert_eq!(result.original, result.corrected);
    }

    #[test]
    fn missing_fecha_is_error() {
        let result = validate(&record(None, Some("HOMICIDIO"), Some("Centro"), Some("x y z")));
        assert_eq!(result.status, ValidationStatus::Error);
        assert!(result.message.contains("Fecha faltante"));
    }

    #[test]
    fn unparsable_fecha_is_error() {
        let result = validate(&record(
            Some("ayer"),
            Some("HOMICIDIO"),
            Some("Centro"),
            Some("sin detalle"),
        ));
        assert_eq!(result.status, ValidationStatus::Error);
        assert!(result.message.contains("Fecha inválida"));
    }

    #[test]
    fn accepts_colombian_date_format() {
        let result = validate(&record(
            Some("15/03/2024"),
            Some("RIÑA"),
            Some("Centro"),
            Some("sin detalle"),
        ));
        assert_eq!(result.status, ValidationStatus::Ok);
    }

    #[test]
    fn normalizes_abbreviated_tipo() {
        let result = validate(&record(
            Some("2024-01-01"),
            Some("H.PERSONA"),
            Some("Centro"),
            Some("robo celular"),
        ));
        assert_eq!(result.status, ValidationStatus::Warning);
        assert_eq!(result.corrected.tipo.as_deref(), Some("HURTO A PERSONAS"));
        assert!(result.message.contains("normalizado"));
    }

    #[test]
    fn flags_non_standard_tipo() {
        let result = validate(&record(
            Some("2024-01-01"),
            Some("EXTORSION"),
            Some("Centro"),
            Some("llamada amenazante"),
        ));
        assert_eq!(result.status, ValidationStatus::Warning);
        assert!(
            result
                .message
                .contains("Tipo de delito no estándar: EXTORSION")
        );
        // The unrecognized value is preserved, not erased
        assert_eq!(result.corrected.tipo.as_deref(), Some("EXTORSION"));
    }

    #[test]
    fn corrects_barrio_capitalization() {
        let result = validate(&record(
            Some("2024-01-01"),
            Some("HOMICIDIO"),
            Some("terranova"),
            Some("sin detalle"),
        ));
        assert_eq!(result.status, ValidationStatus::Warning);
        assert_eq!(result.corrected.barrio.as_deref(), Some("Terranova"));
        assert!(result.message.contains("Capitalización de barrio corregida"));
    }

    #[test]
    fn all_caps_barrio_is_left_alone() {
        let result = validate(&record(
            Some("2024-01-01"),
            Some("HOMICIDIO"),
            Some("SAN ISIDRO"),
            Some("sin detalle"),
        ));
        assert_eq!(result.corrected.barrio.as_deref(), Some("SAN ISIDRO"));
        assert_eq!(result.status, ValidationStatus::Ok);
    }

    #[test]
    fn undefined_barrio_is_error() {
        let result = validate(&record(
            Some("2024-01-01"),
            Some("HOMICIDIO"),
            Some("undefined"),
            Some("sin detalle"),
        ));
        assert_eq!(result.status, ValidationStatus::Error);
        assert!(result.message.contains("Barrio faltante"));
    }

    #[test]
    fn short_descripcion_is_warning() {
        let result = validate(&record(
            Some("2024-01-01"),
            Some("HOMICIDIO"),
            Some("Centro"),
            Some("ok"),
        ));
        assert_eq!(result.status, ValidationStatus::Warning);
        assert!(result.message.contains("Descripción insuficiente"));
    }

    #[test]
    fn short_accented_descripcion_counts_characters_not_bytes() {
        // Two characters, three bytes in UTF-8
        let result = validate(&record(
            Some("2024-01-01"),
            Some("HOMICIDIO"),
            Some("Centro"),
            Some("añ"),
        ));
        assert_eq!(result.status, ValidationStatus::Warning);
        assert!(result.message.contains("Descripción insuficiente"));
    }

    #[test]
    fn punctuation_led_barrio_word_is_capitalized() {
        let result = validate(&record(
            Some("2024-01-01"),
            Some("HOMICIDIO"),
            Some("centro (sur)"),
            Some("sin detalle"),
        ));
        assert_eq!(result.corrected.barrio.as_deref(), Some("Centro (Sur)"));
        assert!(result.message.contains("Capitalización de barrio corregida"));
    }

    #[test]
    fn error_dominates_but_warnings_still_append() {
        let result = validate(&record(None, Some("EXTORSION"), Some("centro"), None));
        assert_eq!(result.status, ValidationStatus::Error);
        assert!(result.message.contains("Fecha faltante"));
        assert!(result.message.contains("Tipo de delito no estándar"));
        assert!(result.message.contains("Descripción insuficiente"));
        assert!(result.message.contains("Capitalización de barrio corregida"));
    }

    #[test]
    fn fully_missing_record_reports_both_required_fields() {
        let result = validate(&IncidentRecord::default());
        assert_eq!(result.status, ValidationStatus::Error);
        assert!(result.message.contains("Fecha faltante"));
        assert!(result.message.contains("Barrio faltante"));
    }

    #[test]
    fn idempotent_on_corrected_output() {
        let first = validate(&record(
            Some("2024-01-01"),
            Some("H.PERSONA"),
            Some("terranova"),
            Some("robo celular"),
        ));
        assert_eq!(first.status, ValidationStatus::Warning);

        let second = validate(&first.corrected);
        assert_eq!(second.status, ValidationStatus::Ok);
        assert_eq!(second.message, "Validado correctamente");
        assert_eq!(second.original, second.corrected);
    }
}
