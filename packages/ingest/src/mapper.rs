use chrono::DateTime;
use observatorio_incident_models::IncidentRecord;
use observatorio_ingest_models::{CanonicalField, CellValue, FIELD_RULES, RawRow};

/// Days between the spreadsheet epoch (1899-12-30) and the Unix epoch.
const SPREADSHEET_EPOCH_OFFSET: f64 = 25569.0;

/// Converts a spreadsheet date serial to a calendar date.
///
/// CSV exports of Excel files leave date cells as bare serials (days since
/// 1899-12-30, fractional part is time of day). Serial 45292 is 2024-01-01.
#[must_use]
pub fn serial_to_date(serial: f64) -> Option<chrono::NaiveDate> {
    let days = serial - SPREADSHEET_EPOCH_OFFSET;
    #[allow(clippy::cast_possible_truncation)]
    let seconds = (days * 86400.0).round() as i64;
    DateTime::from_timestamp(seconds, 0).map(|dt| dt.date_naive())
}

/// Strips a column name or keyword down to its lower-case alphanumerics, so
/// `"Fecha_Hecho"`, `"fecha hecho"` and `"FECHAHECHO"` compare equal.
fn clean_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Finds the column matching a keyword list.
///
/// Two passes over the keywords (in order, most to least specific): first
/// exact cleaned-name equality for any keyword, then substring containment
/// in either direction. An exact hit on a late keyword always beats a
/// substring hit on an early one. Only keywords longer than 3 characters
/// participate in the substring pass, which keeps short keys like `"y"` or
/// `"lat"` from swallowing unrelated columns.
fn find_column<'a>(row: &'a RawRow, keywords: &[&str]) -> Option<&'a str> {
    for keyword in keywords {
        let needle = clean_key(keyword);
        if let Some(name) = row.keys().find(|name| clean_key(name) == needle) {
            return Some(name);
        }
    }

    for keyword in keywords {
        let needle = clean_key(keyword);
        if needle.len() > 3
            && let Some(name) = row.keys().find(|name| {
                let cleaned = clean_key(name);
                !cleaned.is_empty() && (cleaned.contains(&needle) || needle.contains(&cleaned))
            })
        {
            return Some(name);
        }
    }
    None
}

/// Parses a cell as a number, accepting Colombian decimal commas in text
/// cells (`"3,2690"`).
#[must_use]
pub fn cell_as_number(cell: &CellValue) -> Option<f64> {
    if let Some(n) = cell.as_number() {
        return Some(n);
    }
    if let CellValue::Text(text) = cell {
        return text.trim().replace(',', ".").parse().ok();
    }
    None
}

fn text_of(row: &RawRow, field: CanonicalField) -> Option<String> {
    let rule = FIELD_RULES.iter().find(|rule| rule.field == field)?;
    find_column(row, rule.keywords)
        .and_then(|name| row.get(name))
        .and_then(CellValue::to_text)
}

fn number_of(row: &RawRow, field: CanonicalField) -> Option<f64> {
    let rule = FIELD_RULES.iter().find(|rule| rule.field == field)?;
    find_column(row, rule.keywords)
        .and_then(|name| row.get(name))
        .and_then(cell_as_number)
}

/// Maps one raw row onto the canonical record shape.
///
/// Fields whose columns are absent stay `None`; validation reports them
/// later instead of the mapper dropping the row. A numeric `fecha` cell is
/// taken to be a spreadsheet date serial.
#[must_use]
pub fn map_row(row: &RawRow) -> IncidentRecord {
    let fecha = FIELD_RULES
        .iter()
        .find(|rule| rule.field == CanonicalField::Fecha)
        .and_then(|rule| find_column(row, rule.keywords))
        .and_then(|name| row.get(name))
        .and_then(|cell| match cell {
            CellValue::Number(serial) => {
                serial_to_date(*serial).map(|date| date.format("%Y-%m-%d").to_string())
            }
            CellValue::Text(_) | CellValue::Empty => cell.to_text(),
        });

    IncidentRecord {
        fecha,
        tipo: text_of(row, CanonicalField::Tipo),
        barrio: text_of(row, CanonicalField::Barrio),
        descripcion: text_of(row, CanonicalField::Descripcion),
        latitud: number_of(row, CanonicalField::Latitud),
        longitud: number_of(row, CanonicalField::Longitud),
        hora: text_of(row, CanonicalField::Hora).unwrap_or_else(|| "00:00".to_string()),
    }
}
