#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Async REST client for the observatory backend.
//!
//! One [`ApiClient`] per backend; the bearer token obtained by
//! [`ApiClient::login`] is held in the client and attached to every
//! subsequent request. There are no retries and no request cancellation —
//! each call maps a single HTTP exchange to a typed result, and every
//! non-success response surfaces the backend's `detail` message instead of
//! dropping it.

use chrono::NaiveDate;
use observatorio_client_models::{
    BarrioCount, BulkIngestResponse, DistributionSlice, Kpis, Proposal, ProposalCreate,
    ResumenIncident, StatusMessage, Token, TrendPoint,
};
use observatorio_incident_models::IncidentRecord;

/// Backend base URL used when neither flag nor environment configure one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Errors produced by backend calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// GeoJSON body was not a valid feature collection.
    #[error("GeoJSON parse error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {detail}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// The backend's `detail` message, or the raw body when there is
        /// none.
        detail: String,
    },
}

/// Typed client for the observatory backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Creates a client against the given base URL (trailing slash
    /// tolerated). The session starts unauthenticated.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: None,
        }
    }

    /// Whether [`Self::login`] has stored a token on this client.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn with_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Authenticates against `POST /auth/login` (OAuth2 password form) and
    /// stores the returned bearer token for subsequent calls.
    ///
    /// # Errors
    ///
    /// * `ApiError::Backend` with the backend `detail` (e.g.
    ///   "Usuario o contraseña incorrectos") on bad credentials.
    /// * `ApiError::Http` on transport failure.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<Token, ApiError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        let token: Token = check(response).await?.json().await?;

        log::info!("authenticated against {} as {username}", self.base_url);
        self.token = Some(token.access_token.clone());
        Ok(token)
    }

    /// Submits reviewed records to `POST /ingesta/bulk` and returns the
    /// backend's per-row report.
    ///
    /// # Errors
    ///
    /// * `ApiError::Backend` when the batch is rejected wholesale; per-row
    ///   failures come back inside the report instead.
    pub async fn bulk_ingest(
        &self,
        records: &[IncidentRecord],
    ) -> Result<BulkIngestResponse, ApiError> {
        let response = self
            .with_auth(self.http.post(self.url("/ingesta/bulk")))
            .json(records)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Deletes every incident via `DELETE /ingesta/clear`.
    ///
    /// # Errors
    ///
    /// * `ApiError` on transport failure or a non-success status.
    pub async fn clear_incidents(&self) -> Result<StatusMessage, ApiError> {
        let response = self
            .with_auth(self.http.delete(self.url("/ingesta/clear")))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Dashboard KPI cards from `GET /analitica/estadisticas/kpis`.
    ///
    /// # Errors
    ///
    /// * `ApiError` on transport failure or a non-success status.
    pub async fn kpis(&self) -> Result<Kpis, ApiError> {
        self.get_json("/analitica/estadisticas/kpis", &[]).await
    }

    /// Monthly trend series from `GET /analitica/estadisticas/tendencia`.
    ///
    /// # Errors
    ///
    /// * `ApiError` on transport failure or a non-success status.
    pub async fn tendencia(&self) -> Result<Vec<TrendPoint>, ApiError> {
        self.get_json("/analitica/estadisticas/tendencia", &[]).await
    }

    /// Per-category distribution from `GET /analitica/estadisticas/distribucion`.
    ///
    /// # Errors
    ///
    /// * `ApiError` on transport failure or a non-success status.
    pub async fn distribucion(&self) -> Result<Vec<DistributionSlice>, ApiError> {
        self.get_json("/analitica/estadisticas/distribucion", &[])
            .await
    }

    /// Top-five barrios ranking from `GET /analitica/estadisticas/barrios`.
    ///
    /// # Errors
    ///
    /// * `ApiError` on transport failure or a non-success status.
    pub async fn top_barrios(&self) -> Result<Vec<BarrioCount>, ApiError> {
        self.get_json("/analitica/estadisticas/barrios", &[]).await
    }

    /// Incident list from `GET /analitica/estadisticas/resumen`, optionally
    /// bounded by date.
    ///
    /// # Errors
    ///
    /// * `ApiError` on transport failure or a non-success status.
    pub async fn resumen(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<ResumenIncident>, ApiError> {
        self.get_json("/analitica/estadisticas/resumen", &date_query(start, end))
            .await
    }

    /// Located events as GeoJSON from `GET /analitica/eventos/geojson`.
    ///
    /// Coordinates arrive `[lng, lat]` per the GeoJSON convention;
    /// `categories` filter by substring, OR-combined on the backend.
    ///
    /// # Errors
    ///
    /// * `ApiError` on transport failure, a non-success status, or a body
    ///   that is not a feature collection.
    pub async fn eventos_geojson(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        categories: &[String],
    ) -> Result<geojson::FeatureCollection, ApiError> {
        let mut query = date_query(start, end);
        for category in categories {
            query.push(("categories", category.clone()));
        }

        let response = self
            .with_auth(
                self.http
                    .get(self.url("/analitica/eventos/geojson"))
                    .query(&query),
            )
            .send()
            .await?;
        let body = check(response).await?.text().await?;
        let collection: geojson::FeatureCollection = body.parse()?;
        Ok(collection)
    }

    /// Generated PDF bulletin bytes from `GET /reportes/generar-boletin`.
    ///
    /// # Errors
    ///
    /// * `ApiError` on transport failure or a non-success status.
    pub async fn generar_boletin(&self) -> Result<Vec<u8>, ApiError> {
        let response = self
            .with_auth(self.http.get(self.url("/reportes/generar-boletin")))
            .send()
            .await?;
        let bytes = check(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Community proposals from `GET /participacion/propuestas`, optionally
    /// filtered by review status.
    ///
    /// # Errors
    ///
    /// * `ApiError` on transport failure or a non-success status.
    pub async fn propuestas(&self, status: Option<&str>) -> Result<Vec<Proposal>, ApiError> {
        let query: Vec<(&str, String)> = status
            .map(|s| vec![("status", s.to_string())])
            .unwrap_or_default();
        self.get_json("/participacion/propuestas", &query).await
    }

    /// Submits a new proposal to `POST /participacion/propuestas`.
    ///
    /// # Errors
    ///
    /// * `ApiError` on transport failure or a non-success status.
    pub async fn crear_propuesta(&self, proposal: &ProposalCreate) -> Result<Proposal, ApiError> {
        let response = self
            .with_auth(self.http.post(self.url("/participacion/propuestas")))
            .json(proposal)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .with_auth(self.http.get(self.url(path)).query(query))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }
}

fn date_query(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(start) = start {
        query.push(("start_date", start.format("%Y-%m-%d").to_string()));
    }
    if let Some(end) = end {
        query.push(("end_date", end.format("%Y-%m-%d").to_string()));
    }
    query
}

/// Passes successful responses through; turns anything else into
/// [`ApiError::Backend`] carrying the body's `detail` field when present.
async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Backend {
        status: status.as_u16(),
        detail: extract_detail(&body),
    })
}

/// Pulls the FastAPI `detail` message out of an error body, falling back to
/// the raw body text.
fn extract_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(serde_json::Value::as_str)
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}
