// GET handlers: dashboard page, resampled history data, version

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use super::{AppState, DEFAULT_PERIOD_HOURS};
use crate::history_repo::resample::resample;
use crate::history_repo::unix_now_secs;

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const PERIOD_PLACEHOLDER: &str = "{{period}}";

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("period must be a number of hours, got {0:?}")]
    InvalidPeriod(String),
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct DataParams {
    period: Option<String>,
}

/// Non-negative finite hours; anything else is a client error.
fn parse_period(raw: &str) -> Result<f64, QueryError> {
    match raw.trim().parse::<f64>() {
        Ok(p) if p.is_finite() && p >= 0.0 => Ok(p),
        _ => Err(QueryError::InvalidPeriod(raw.to_string())),
    }
}

fn render_index(period_hours: f64) -> Html<String> {
    Html(INDEX_HTML.replace(PERIOD_PLACEHOLDER, &period_hours.to_string()))
}

/// GET /: dashboard at the default period.
pub(super) async fn index_handler() -> impl IntoResponse {
    render_index(DEFAULT_PERIOD_HOURS)
}

/// GET /{period}: dashboard at a configured period; unknown segments fall back to the default.
pub(super) async fn index_period_handler(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> impl IntoResponse {
    let period = parse_period(&segment)
        .ok()
        .filter(|p| state.steps.contains(*p))
        .unwrap_or(DEFAULT_PERIOD_HOURS);
    render_index(period)
}

/// GET /data?period=: history inside the period, downsampled for it.
pub(super) async fn data_handler(
    State(state): State<AppState>,
    Query(params): Query<DataParams>,
) -> Result<impl IntoResponse, QueryError> {
    let period = match params.period.as_deref() {
        Some(raw) => parse_period(raw)?,
        None => DEFAULT_PERIOD_HOURS,
    };
    let window = state.history.window(period, unix_now_secs());
    let samples = resample(&window, period, &state.steps);
    tracing::debug!(
        operation = "query_history",
        period_hours = period,
        samples_count = samples.len(),
        "history query"
    );
    Ok(Json(samples))
}

/// GET /version: service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
