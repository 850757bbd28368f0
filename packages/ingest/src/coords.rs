use observatorio_geocoder as geocoder;
use observatorio_incident_models::IncidentRecord;
use observatorio_ingest_models::{CoordinateBounds, RawRow};

use crate::mapper::cell_as_number;

/// Fills in the record's coordinates, in order of preference:
///
/// 1. whatever the field mapper already extracted from declared columns,
/// 2. a positional scan over the row for any number inside the municipal
///    bounding box (lat and lng bands are disjoint, so a bare number can be
///    assigned unambiguously),
/// 3. the gazetteer, keyed by barrio, when either coordinate is still
///    missing or the pair sits on the generic municipal center.
///
/// Always leaves both coordinates populated.
pub fn resolve_coordinates(record: &mut IncidentRecord, row: &RawRow, bounds: &CoordinateBounds) {
    if record.latitud.is_none() || record.longitud.is_none() {
        scan_for_coordinates(record, row, bounds);
    }

    let needs_gazetteer = match (record.latitud, record.longitud) {
        (Some(lat), Some(lng)) => geocoder::is_generic_center(lat, lng),
        _ => true,
    };

    if needs_gazetteer {
        let barrio = record.barrio.as_deref().unwrap_or("");
        let coords = geocoder::resolve(barrio);
        record.latitud = Some(coords.lat);
        record.longitud = Some(coords.lng);
    }
}

/// Last-resort positional scan: any numeric cell inside the latitude band
/// becomes the latitude, any inside the longitude band the longitude. This
/// inherits the risk that an unrelated in-range number gets picked up, so a
/// hit is logged for the operator to review.
fn scan_for_coordinates(record: &mut IncidentRecord, row: &RawRow, bounds: &CoordinateBounds) {
    for (name, cell) in row.iter() {
        let Some(value) = cell_as_number(cell) else {
            continue;
        };

        if record.latitud.is_none() && bounds.contains_lat(value) {
            log::debug!("coordinate scan: column {name:?} ({value}) taken as latitude");
            record.latitud = Some(value);
        } else if record.longitud.is_none() && bounds.contains_lng(value) {
            log::debug!("coordinate scan: column {name:?} ({value}) taken as longitude");
            record.longitud = Some(value);
        }

        if record.latitud.is_some() && record.longitud.is_some() {
            break;
        }
    }
}
