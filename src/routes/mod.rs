// HTTP routes

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::history_repo::HistoryStore;
use crate::history_repo::resample::StepTable;

pub use http::QueryError;

/// Period shown when none (or an unknown one) is requested.
pub const DEFAULT_PERIOD_HOURS: f64 = 0.5;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) history: Arc<HistoryStore>,
    pub(crate) steps: Arc<StepTable>,
}

pub fn app(history: Arc<HistoryStore>, steps: StepTable) -> Router {
    let state = AppState {
        history,
        steps: Arc::new(steps),
    };
    Router::new()
        .route("/", get(http::index_handler)) // GET /
        .route("/data", get(http::data_handler)) // GET /data?period=
        .route("/version", get(http::version_handler)) // GET /version
        .route("/{period}", get(http::index_period_handler)) // GET /{period}
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
