#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client-side analytics over incident lists.
//!
//! Produces the same dashboard aggregates the backend serves, but computed
//! locally — used to preview the distribution of a pending import batch
//! before anything is submitted, and to summarize a downloaded resumen
//! without further round trips.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use observatorio_client_models::ResumenIncident;
use observatorio_incident_models::IncidentRecord;
use serde::Serialize;

/// Barrios listed in the ranking.
const TOP_BARRIOS: usize = 5;

/// One month of the local trend series, keyed `YYYY-MM`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyTrend {
    /// `YYYY-MM` month key.
    pub month: String,
    /// Homicides that month.
    pub homicidios: u64,
    /// Thefts (any `HURTO` category) that month.
    pub hurtos: u64,
    /// Domestic-violence incidents that month.
    pub vif: u64,
}

/// One category of the per-type distribution, largest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    /// Category name as it appears on the records.
    pub name: String,
    /// Incident count.
    pub count: u64,
}

/// One neighborhood in the top-barrios ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarrioRank {
    /// Neighborhood name.
    pub name: String,
    /// Incident count.
    pub count: u64,
}

/// Locally computed dashboard aggregates.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardSummary {
    /// Total incidents seen.
    pub total: u64,
    /// `HOMICIDIO` incidents.
    pub homicidios: u64,
    /// `HURTO A PERSONAS` + `HURTO A COMERCIO` incidents.
    pub hurtos: u64,
    /// `VIOLENCIA INTRAFAMILIAR` incidents.
    pub vif: u64,
    /// Per-category counts, descending.
    pub distribution: Vec<CategoryCount>,
    /// Monthly series in chronological order.
    pub trend: Vec<MonthlyTrend>,
    /// Up to five barrios with the most incidents, descending.
    pub top_barrios: Vec<BarrioRank>,
}

struct RowView<'a> {
    fecha: Option<&'a str>,
    tipo: Option<&'a str>,
    barrio: Option<&'a str>,
}

/// Summarizes incident rows downloaded from the backend resumen endpoint.
#[must_use]
pub fn summarize(incidents: &[ResumenIncident]) -> DashboardSummary {
    fold(incidents.iter().map(|incident| RowView {
        fecha: Some(incident.fecha.as_str()),
        tipo: Some(incident.tipo.as_str()),
        barrio: Some(incident.barrio.as_str()),
    }))
}

/// Summarizes locally analyzed records, e.g. a pending import batch.
#[must_use]
pub fn summarize_records(records: &[IncidentRecord]) -> DashboardSummary {
    fold(records.iter().map(|record| RowView {
        fecha: record.fecha.as_deref(),
        tipo: record.tipo.as_deref(),
        barrio: record.barrio.as_deref(),
    }))
}

fn fold<'a>(rows: impl Iterator<Item = RowView<'a>>) -> DashboardSummary {
    let mut summary = DashboardSummary::default();
    let mut distribution: HashMap<String, u64> = HashMap::new();
    let mut barrios: HashMap<String, u64> = HashMap::new();
    let mut trend: BTreeMap<String, MonthlyTrend> = BTreeMap::new();

    for row in rows {
        summary.total += 1;

        let tipo = row.tipo.unwrap_or("").trim().to_uppercase();
        match tipo.as_str() {
            "HOMICIDIO" => summary.homicidios += 1,
            "HURTO A PERSONAS" | "HURTO A COMERCIO" => summary.hurtos += 1,
            "VIOLENCIA INTRAFAMILIAR" => summary.vif += 1,
            _ => {}
        }

        if !tipo.is_empty() {
            *distribution.entry(tipo.clone()).or_default() += 1;
        }

        if let Some(barrio) = row.barrio.map(str::trim).filter(|b| !b.is_empty()) {
            *barrios.entry(barrio.to_string()).or_default() += 1;
        }

        if let Some(month) = row.fecha.and_then(month_key) {
            let point = trend.entry(month.clone()).or_insert_with(|| MonthlyTrend {
                month,
                ..MonthlyTrend::default()
            });
            if tipo == "HOMICIDIO" {
                point.homicidios += 1;
            }
            if tipo.contains("HURTO") {
                point.hurtos += 1;
            }
            if tipo == "VIOLENCIA INTRAFAMILIAR" {
                point.vif += 1;
            }
        }
    }

    summary.distribution = sorted_desc(distribution)
        .into_iter()
        .map(|(name, count)| CategoryCount { name, count })
        .collect();
    summary.top_barrios = sorted_desc(barrios)
        .into_iter()
        .take(TOP_BARRIOS)
        .map(|(name, count)| BarrioRank { name, count })
        .collect();
    summary.trend = trend.into_values().collect();

    summary
}

/// Extracts the `YYYY-MM` key from a record date, tolerating a trailing
/// ISO time component.
fn month_key(fecha: &str) -> Option<String> {
    let date_part = fecha.split('T').next().unwrap_or(fecha);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%Y-%m").to_string())
}

/// Sorts counts descending, name ascending on ties, so output is stable.
fn sorted_desc(counts: HashMap<String, u64>) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}
