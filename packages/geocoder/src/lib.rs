#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Local gazetteer geocoding for Jamundí barrios and corregimientos.
//!
//! Provides reference coordinates for neighborhoods when the source file has
//! none. This is **not** real geocoding: the table holds one representative
//! point per neighborhood, and every resolved point receives a random offset
//! ("jitter") so that many incidents in the same barrio don't collapse onto
//! a single map marker. Treat all output as approximate.

use rand::Rng as _;

/// A resolved coordinate pair (WGS84).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// One static gazetteer entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazetteerEntry {
    /// Normalized (upper-case, no diacritics) neighborhood name.
    pub name: &'static str,
    /// Representative latitude.
    pub lat: f64,
    /// Representative longitude.
    pub lng: f64,
    /// Full jitter span in degrees; offsets are drawn from
    /// `[-jitter / 2, +jitter / 2]` per axis.
    pub jitter: f64,
}

/// Jitter span for ordinary entries (~±220 m; 0.001° ≈ 111 m).
pub const ORDINARY_JITTER: f64 = 0.004;

/// Jitter span for the fallback and high-density entries. These buckets
/// collect every imprecisely-located incident, so they get spread wider.
pub const WIDE_JITTER: f64 = 0.008;

/// The generic municipal center (the CENTRO entry). Source files sometimes
/// carry this exact point for every row, which is as good as no coordinate.
pub const GENERIC_CENTER: Coordinates = Coordinates {
    lat: 3.2606,
    lng: -76.5364,
};

/// Tolerance (degrees) for treating a point as the generic center.
pub const CENTER_TOLERANCE: f64 = 0.001;

/// Static name→coordinate table for Jamundí, compiled into the binary.
///
/// Keys are pre-normalized (see [`normalize_name`]). Urban sectors first,
/// then corregimientos / rural zones, then highway corridors.
pub static GAZETTEER: &[GazetteerEntry] = &[
    // Casco urbano
    entry("CENTRO", 3.2606, -76.5364, WIDE_JITTER),
    entry("EL ROSARIO", 3.2635, -76.5300, ORDINARY_JITTER),
    entry("EL JORDAN", 3.2720, -76.5340, ORDINARY_JITTER),
    entry("PORTALES DEL JORDAN", 3.2730, -76.5350, ORDINARY_JITTER),
    entry("PORTAL DE JORDAN", 3.2730, -76.5350, ORDINARY_JITTER),
    entry("TERRANOVA", 3.2690, -76.5315, WIDE_JITTER),
    entry("BONANZA", 3.2542, -76.5412, ORDINARY_JITTER),
    entry("ALFAGUARA", 3.2505, -76.5350, ORDINARY_JITTER),
    entry("PASADENA", 3.2580, -76.5380, ORDINARY_JITTER),
    entry("SACHAMATE", 3.2750, -76.5280, ORDINARY_JITTER),
    entry("CIUDAD SUR", 3.2530, -76.5450, WIDE_JITTER),
    entry("BELALCAZAR", 3.2620, -76.5330, ORDINARY_JITTER),
    entry("LAS ACACIAS", 3.2650, -76.5250, ORDINARY_JITTER),
    entry("LA ESPERANZA", 3.2680, -76.5380, ORDINARY_JITTER),
    entry("EL JARDIN", 3.2560, -76.5320, ORDINARY_JITTER),
    entry("CIRO VELASCO", 3.2590, -76.5300, ORDINARY_JITTER),
    entry("ARIZONA", 3.2510, -76.5390, ORDINARY_JITTER),
    entry("LOS CHALOS", 3.2550, -76.5490, ORDINARY_JITTER),
    entry("FARALLONES", 3.2600, -76.5500, ORDINARY_JITTER),
    entry("VILLA COLOMBIA", 3.2650, -76.5420, ORDINARY_JITTER),
    entry("SANTUARIO", 3.2680, -76.5450, ORDINARY_JITTER),
    entry("ZARAGOZA", 3.2700, -76.5400, ORDINARY_JITTER),
    entry("MANDARINOS", 3.2520, -76.5320, ORDINARY_JITTER),
    entry("COVICEDROS", 3.2540, -76.5300, ORDINARY_JITTER),
    // Corregimientos / zonas rurales
    entry("POTRERITO", 3.2380, -76.5950, ORDINARY_JITTER),
    entry("QUINAMAYO", 3.2050, -76.5150, ORDINARY_JITTER),
    entry("VILLA PAZ", 3.1850, -76.4950, ORDINARY_JITTER),
    entry("ROBLES", 3.1600, -76.4800, ORDINARY_JITTER),
    entry("GUACHINTE", 3.1400, -76.5100, ORDINARY_JITTER),
    entry("SAN ISIDRO", 3.1900, -76.5500, ORDINARY_JITTER),
    entry("LA LIBERIA", 3.2100, -76.6200, ORDINARY_JITTER),
    entry("SAN ANTONIO", 3.2000, -76.6500, ORDINARY_JITTER),
    entry("AMPUDIA", 3.2500, -76.6000, ORDINARY_JITTER),
    entry("PASO DE LA BOLSA", 3.2450, -76.4750, ORDINARY_JITTER),
    entry("BOCAS DEL PALO", 3.2800, -76.4600, ORDINARY_JITTER),
    entry("TIMBA", 3.1050, -76.6150, ORDINARY_JITTER),
    entry("PUENTE VELEZ", 3.2200, -76.6800, ORDINARY_JITTER),
    entry("SAN VICENTE", 3.2800, -76.6500, ORDINARY_JITTER),
    // Vías y otros
    entry("VIA CALI", 3.2850, -76.5250, ORDINARY_JITTER),
    entry("VIA CALI JAMUNDI", 3.2850, -76.5250, ORDINARY_JITTER),
    entry("VIA SANTANDER", 3.2400, -76.5300, ORDINARY_JITTER),
];

const fn entry(name: &'static str, lat: f64, lng: f64, jitter: f64) -> GazetteerEntry {
    GazetteerEntry {
        name,
        lat,
        lng,
        jitter,
    }
}

/// Normalizes a neighborhood name for table lookup: upper-case, Latin
/// diacritics folded to their base letter, trimmed.
///
/// This mirrors an NFD decomposition with combining marks removed, so
/// `"Bogotá"`, `"BOGOTA"` and `" bOgotá "` all yield the same key.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .flat_map(char::to_uppercase)
        .map(fold_diacritic)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Folds an upper-case Latin letter with a diacritic to its base letter.
const fn fold_diacritic(c: char) -> char {
    match c {
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ñ' => 'N',
        'Ç' => 'C',
        other => other,
    }
}

/// Looks up the gazetteer entry for a neighborhood name, without jitter.
///
/// Prefers an exact match on the normalized name, then the first entry whose
/// key and the input contain one another (keys shorter than 4 characters are
/// excluded from substring matching to avoid spurious hits), and finally the
/// CENTRO fallback entry.
#[must_use]
pub fn lookup(name: &str) -> &'static GazetteerEntry {
    let normalized = normalize_name(name);

    if let Some(exact) = GAZETTEER.iter().find(|e| e.name == normalized) {
        return exact;
    }

    if !normalized.is_empty()
        && let Some(partial) = GAZETTEER.iter().find(|e| {
            e.name.len() > 3 && (normalized.contains(e.name) || e.name.contains(&normalized))
        })
    {
        return partial;
    }

    log::debug!("gazetteer: no match for {normalized:?}, using municipal center");
    &GAZETTEER[0]
}

/// Resolves a neighborhood name to jittered coordinates.
///
/// Always returns a pair: unknown or empty names fall back to the municipal
/// center (with the wide jitter span).
#[must_use]
pub fn resolve(name: &str) -> Coordinates {
    let entry = lookup(name);
    let mut rng = rand::thread_rng();
    let half = entry.jitter / 2.0;

    Coordinates {
        lat: entry.lat + rng.gen_range(-half..=half),
        lng: entry.lng + rng.gen_range(-half..=half),
    }
}

/// Whether a point sits within [`CENTER_TOLERANCE`] of the generic center.
#[must_use]
pub fn is_generic_center(lat: f64, lng: f64) -> bool {
    (lat - GENERIC_CENTER.lat).abs() < CENTER_TOLERANCE
        && (lng - GENERIC_CENTER.lng).abs() < CENTER_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_is_case_and_diacritic_insensitive() {
        assert_eq!(normalize_name("bOgotá "), "BOGOTA");
        assert_eq!(normalize_name("BOGOTA"), "BOGOTA");
        assert_eq!(normalize_name("Bogotá"), "BOGOTA");
        assert_eq!(normalize_name("  riñas "), "RINAS");
    }

    #[test]
    fn exact_match_case_insensitive() {
        assert_eq!(lookup("CENTRO").name, "CENTRO");
        assert_eq!(lookup("centro").name, "CENTRO");
        assert_eq!(lookup("Terranova").name, "TERRANOVA");
    }

    #[test]
    fn partial_match_in_either_direction() {
        // Input contains a key
        assert_eq!(lookup("URBANIZACION TERRANOVA II").name, "TERRANOVA");
        // Key contains the input
        assert_eq!(lookup("ALFAG").name, "ALFAGUARA");
    }

    #[test]
    fn unknown_names_fall_back_to_center() {
        let entry = lookup("BARRIO INEXISTENTE XYZ");
        assert_eq!(entry.name, "CENTRO");
        assert_eq!(lookup("").name, "CENTRO");
    }

    #[test]
    fn high_density_entries_get_wider_jitter() {
        assert!(lookup("CENTRO").jitter > lookup("BONANZA").jitter);
        assert!((lookup("BONANZA").jitter - ORDINARY_JITTER).abs() < f64::EPSILON);
    }

    #[test]
    fn jitter_stays_within_half_span() {
        let entry = lookup("BONANZA");
        for _ in 0..100 {
            let coords = resolve("BONANZA");
            assert!((coords.lat - entry.lat).abs() <= entry.jitter / 2.0 + f64::EPSILON);
            assert!((coords.lng - entry.lng).abs() <= entry.jitter / 2.0 + f64::EPSILON);
        }
    }

    #[test]
    fn same_base_coordinates_regardless_of_case() {
        let a = lookup("CENTRO");
        let b = lookup("centro");
        assert!((a.lat - b.lat).abs() < f64::EPSILON);
        assert!((a.lng - b.lng).abs() < f64::EPSILON);
    }

    #[test]
    fn generic_center_detection() {
        assert!(is_generic_center(3.2606, -76.5364));
        assert!(is_generic_center(3.2610, -76.5360));
        assert!(!is_generic_center(3.2690, -76.5315));
    }
}
