/// Cell keywords that identify a header row. Police spreadsheet exports
/// routinely carry title and logo rows above the real header.
const HEADER_KEYWORDS: &[&str] = &["fecha", "delito", "conducta", "hecho"];

/// Finds the index of the header row: the first row where any cell,
/// lower-cased, contains a header keyword. Falls back to row 0 so that a
/// file without recognizable headers still imports (the mapper will simply
/// find nothing).
#[must_use]
pub fn detect_header(rows: &[Vec<String>]) -> usize {
    rows.iter()
        .position(|row| {
            row.iter().any(|cell| {
                let lower = cell.to_lowercase();
                HEADER_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
            })
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|row| row.iter().map(|s| (*s).to_string()).collect())
            .collect()
    }

    #[test]
    fn skips_title_rows() {
        let matrix = rows(&[
            &["OBSERVATORIO DE SEGURIDAD", "", ""],
            &["Reporte mensual", "", ""],
            &["FECHA", "DELITO", "BARRIO"],
            &["2024-01-01", "HOMICIDIO", "Centro"],
        ]);
        assert_eq!(detect_header(&matrix), 2);
    }

    #[test]
    fn header_on_first_row() {
        let matrix = rows(&[&["fecha_hecho", "conducta"], &["2024-01-01", "RIÑA"]]);
        assert_eq!(detect_header(&matrix), 0);
    }

    #[test]
    fn no_keyword_anywhere_falls_back_to_zero() {
        let matrix = rows(&[&["a", "b"], &["c", "d"]]);
        assert_eq!(detect_header(&matrix), 0);
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let matrix = rows(&[&["x"], &["Barrios_Hecho", "Fecha_Hecho"]]);
        assert_eq!(detect_header(&matrix), 1);
    }
}
