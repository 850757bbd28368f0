#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Request and response shapes for the observatory backend.
//!
//! Field names mirror the backend's JSON contract exactly (Spanish,
//! snake_case), so every struct derives `Serialize`/`Deserialize` without
//! renames unless the wire name is inconsistent on the backend side.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Bearer token issued by `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// Opaque JWT.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

/// Dashboard KPI card values from `GET /analitica/estadisticas/kpis`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    /// All recorded incidents.
    pub total_incidentes: u64,
    /// Homicides per 100k inhabitants.
    pub tasa_homicidios: f64,
    /// Neighborhoods above the incident threshold.
    pub zonas_criticas: u64,
    /// Reference population used for the rate.
    pub poblacion: u64,
}

/// One month of the homicide-vs-theft trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Month label.
    pub name: String,
    /// Homicides that month.
    pub homicidios: u64,
    /// Everything else that month.
    pub hurtos: u64,
}

/// One slice of the per-category distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionSlice {
    /// Category name.
    pub name: String,
    /// Incident count.
    pub value: u64,
}

/// One entry of the top-barrios ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarrioCount {
    /// Neighborhood name (`"Desconocido"` when the backend has none).
    pub name: String,
    /// Incident count.
    pub delitos: u64,
}

/// One incident row from `GET /analitica/estadisticas/resumen`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumenIncident {
    /// Backend UUID, stringly typed on the wire.
    pub id: String,
    /// `YYYY-MM-DD`.
    pub fecha: String,
    /// Canonical category name.
    pub tipo: String,
    /// Neighborhood (`"Sin especificar"` when unknown).
    pub barrio: String,
    /// Narrative, possibly empty.
    pub descripcion: String,
    /// Case state, `"Abierto"` by default.
    pub estado: String,
}

/// One failed row in an ingest report.
///
/// The bulk endpoint labels the position `index` while the file-upload path
/// calls it `fila`; both deserialize into [`Self::fila`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// Row position in the submitted batch.
    #[serde(alias = "index")]
    pub fila: u64,
    /// Backend failure message for that row.
    pub error: String,
}

/// Per-row outcome report for a bulk ingest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Rows submitted.
    pub total: u64,
    /// Rows inserted.
    pub success_count: u64,
    /// Rows rejected.
    pub error_count: u64,
    /// Detail for every rejected row.
    pub errors: Vec<RowError>,
}

/// Envelope returned by `POST /ingesta/bulk`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkIngestResponse {
    /// `"success"` or `"partial_success"`.
    pub status: String,
    /// Human-readable summary.
    pub message: String,
    /// Per-row detail.
    pub report: IngestReport,
}

/// Simple `{ "message": ... }` acknowledgement (e.g. `DELETE /ingesta/clear`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    /// Backend acknowledgement text.
    pub message: String,
}

/// A community proposal from `GET /participacion/propuestas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Backend UUID.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Full proposal text.
    pub description: String,
    /// Thematic category.
    pub category: String,
    /// Neighborhood the proposal concerns.
    pub barrio: String,
    /// Review state (`"pendiente"` on creation).
    pub status: String,
    /// Creation timestamp (backend-local, no offset on the wire).
    pub created_at: NaiveDateTime,
    /// Optional author display name.
    pub author_name: Option<String>,
}

/// Payload for `POST /participacion/propuestas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalCreate {
    /// Short title.
    pub title: String,
    /// Full proposal text.
    pub description: String,
    /// Thematic category.
    pub category: String,
    /// Neighborhood the proposal concerns.
    pub barrio: String,
    /// Optional author display name.
    pub author_name: Option<String>,
}
