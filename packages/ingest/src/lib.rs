#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spreadsheet import pipeline: load a CSV export, find the real header row,
//! map source columns onto the canonical record shape, resolve coordinates,
//! and validate every row.
//!
//! The pipeline never drops a row. Every input row produces a
//! [`ValidationResult`] — including rows with nothing usable in them — so
//! the operator reviews the complete picture before anything is submitted.

use std::path::Path;

use observatorio_ingest_models::{ImportOptions, RawRow, ValidationResult, ValidationStatus};

mod coords;
mod header;
mod mapper;

pub use coords::resolve_coordinates;
pub use header::detect_header;
pub use mapper::{map_row, serial_to_date};

/// Errors produced while loading an import file.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Filesystem failure opening or reading the file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Malformed CSV content.
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// The file parsed but contained no rows at all.
    #[error("file contains no rows")]
    EmptyFile,
}

/// Loads a CSV file into a plain row matrix.
///
/// Headers are left disabled so the header row can be sniffed afterwards
/// ([`detect_header`]), and the reader is flexible because spreadsheet
/// exports regularly have ragged title rows.
///
/// # Errors
///
/// * `IngestError::Io` / `IngestError::Csv` if the file cannot be read.
/// * `IngestError::EmptyFile` if it holds no rows.
pub fn load_matrix(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path.as_ref())?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    if rows.is_empty() {
        return Err(IngestError::EmptyFile);
    }

    Ok(rows)
}

/// Runs the full analysis pass over an already-loaded row matrix.
///
/// Rows above the detected header and rows that are entirely blank are
/// skipped; every remaining row yields one result.
#[must_use]
pub fn analyze_rows(rows: &[Vec<String>], options: &ImportOptions) -> Vec<ValidationResult> {
    let header_index = detect_header(rows);
    let Some(header) = rows.get(header_index) else {
        return Vec::new();
    };

    let results: Vec<ValidationResult> = rows[header_index + 1..]
        .iter()
        .filter(|fields| fields.iter().any(|cell| !cell.trim().is_empty()))
        .map(|fields| {
            let row = RawRow::from_header(header, fields);
            let mut record = map_row(&row);
            resolve_coordinates(&mut record, &row, &options.bounds);
            observatorio_validate::validate(&record)
        })
        .collect();

    let errors = results
        .iter()
        .filter(|r| r.status == ValidationStatus::Error)
        .count();
    let warnings = results
        .iter()
        .filter(|r| r.status == ValidationStatus::Warning)
        .count();
    log::info!(
        "analyzed {} rows (header at {header_index}): {warnings} warnings, {errors} errors",
        results.len(),
    );

    results
}

/// Loads and analyzes an import file in one pass.
///
/// # Errors
///
/// * `IngestError` if the file cannot be loaded (see [`load_matrix`]).
pub fn analyze_file(
    path: impl AsRef<Path>,
    options: &ImportOptions,
) -> Result<Vec<ValidationResult>, IngestError> {
    let rows = load_matrix(path)?;
    Ok(analyze_rows(&rows, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|row| row.iter().map(|s| (*s).to_string()).collect())
            .collect()
    }

    #[test]
    fn messy_siedco_row_normalizes_end_to_end() {
        let rows = matrix(&[
            &["REPORTE SIEDCO", "", ""],
            &["Fecha", "Delito", "Barrio"],
            &["45292", "H.PERSONA", "terranova"],
        ]);
        let results = analyze_rows(&rows, &ImportOptions::default());
        assert_eq!(results.len(), 1);

        let result = &results[0];
        assert_eq!(result.status, ValidationStatus::Warning);
        assert!(result.message.contains("normalizado"));
        assert!(result.message.contains("corregida"));

        let corrected = &result.corrected;
        assert_eq!(corrected.fecha.as_deref(), Some("2024-01-01"));
        assert_eq!(corrected.tipo.as_deref(), Some("HURTO A PERSONAS"));
        assert_eq!(corrected.barrio.as_deref(), Some("Terranova"));

        // Coordinates synthesized near the TERRANOVA gazetteer entry
        let entry = observatorio_geocoder::lookup("TERRANOVA");
        let lat = corrected.latitud.unwrap();
        let lng = corrected.longitud.unwrap();
        assert!((lat - entry.lat).abs() <= entry.jitter / 2.0 + f64::EPSILON);
        assert!((lng - entry.lng).abs() <= entry.jitter / 2.0 + f64::EPSILON);
    }

    #[test]
    fn unrecognizable_file_reports_errors_not_panics() {
        let rows = matrix(&[
            &["col_a", "col_b"],
            &["basura", "sin sentido"],
        ]);
        let results = analyze_rows(&rows, &ImportOptions::default());
        assert_eq!(results.len(), 1);

        let result = &results[0];
        assert_eq!(result.status, ValidationStatus::Error);
        assert!(result.message.contains("Fecha faltante"));
        assert!(result.message.contains("Barrio faltante"));
        assert_eq!(result.original.fecha, None);
        assert_eq!(result.original.tipo, None);
        // Even here a fallback coordinate pair exists
        assert!(result.corrected.latitud.is_some());
        assert!(result.corrected.longitud.is_some());
    }

    #[test]
    fn blank_rows_are_skipped() {
        let rows = matrix(&[
            &["fecha", "delito", "barrio"],
            &["2024-02-10", "HOMICIDIO", "Centro"],
            &["", "", ""],
            &["2024-02-11", "RIÑA", "Bonanza"],
        ]);
        let results = analyze_rows(&rows, &ImportOptions::default());
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn every_row_yields_a_result() {
        let rows = matrix(&[
            &["fecha", "delito", "barrio", "descripcion"],
            &["2024-02-10", "HOMICIDIO", "Centro", "caso con arma de fuego"],
            &["sin fecha", "EXTORSION", "undefined", "x"],
            &["45292", "H.COMERCIO", "ALFAGUARA", "hurto de mercancía"],
        ]);
        let results = analyze_rows(&rows, &ImportOptions::default());
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].status, ValidationStatus::Ok);
        assert_eq!(results[1].status, ValidationStatus::Error);
        assert_eq!(results[2].status, ValidationStatus::Warning);
        assert_eq!(
            results[2].corrected.tipo.as_deref(),
            Some("HURTO A COMERCIO")
        );
    }

    #[test]
    fn loads_csv_from_disk() {
        let dir = std::env::temp_dir();
        let path = dir.join("observatorio_ingest_load_test.csv");
        std::fs::write(
            &path,
            "REPORTE,,\nfecha,delito,barrio\n2024-01-05,HOMICIDIO,Centro\n",
        )
        .unwrap();

        let results = analyze_file(&path, &ImportOptions::default()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].corrected.fecha.as_deref(), Some("2024-01-05"));
    }

    #[test]
    fn empty_file_is_an_error() {
        let dir = std::env::temp_dir();
        let path = dir.join("observatorio_ingest_empty_test.csv");
        std::fs::write(&path, "").unwrap();

        let result = analyze_file(&path, &ImportOptions::default());
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(IngestError::EmptyFile)));
    }
}
