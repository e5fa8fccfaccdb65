use anyhow::Result;
use axum::{extract::{Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use seosearch_core::corpus::load_dir;
use seosearch_core::{BuildReport, EngineError, IndexInfo, RankedResult, SearchService};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer, AllowOrigin};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    /// Truncate the result list; all hits are returned when absent.
    pub k: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<RankedResult>,
}

pub type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": msg.into() })))
}

fn engine_error(err: EngineError) -> ApiError {
    match err {
        EngineError::NotReady => api_error(StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SearchService>,
    pub pages_dir: PathBuf,
    pub admin_token: Option<String>,
    /// Held for the whole load-and-publish so rebuilds land in request order.
    pub rebuild_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// State for `service`, reading `ADMIN_TOKEN` from the environment.
    pub fn new(service: Arc<SearchService>, pages_dir: impl Into<PathBuf>) -> Self {
        let admin_token = std::env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty());
        Self { service, pages_dir: pages_dir.into(), admin_token, rebuild_lock: Arc::default() }
    }
}

pub fn build_app(app_state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/api/index-info", get(index_info_handler))
        .route("/index/rebuild", post(rebuild_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Re-read the pages directory off the async runtime and publish a fresh index.
///
/// Concurrent calls are serialized, so an older directory snapshot is never
/// published over a newer one.
pub async fn rebuild(state: &AppState) -> Result<BuildReport> {
    let _guard = state.rebuild_lock.lock().await;
    let service = state.service.clone();
    let dir = state.pages_dir.clone();
    tokio::task::spawn_blocking(move || -> Result<BuildReport> {
        let corpus = load_dir(&dir)?;
        Ok(service.build(&corpus))
    })
    .await?
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let Some(query) = params.q else {
        return Err(api_error(StatusCode::BAD_REQUEST, r#"Query parameter "q" is required"#));
    };
    tracing::info!(%query, "search query received");

    let mut results = state.service.search(&query).map_err(engine_error)?;
    let total_hits = results.len();
    if let Some(k) = params.k {
        results.truncate(k);
    }

    let took_s = start.elapsed().as_secs_f64();
    tracing::info!(%query, total_hits, took_s, "search complete");
    Ok(Json(SearchResponse { query, took_s, total_hits, results }))
}

pub async fn index_info_handler(State(state): State<AppState>) -> Result<Json<IndexInfo>, ApiError> {
    state.service.info().map(Json).map_err(engine_error)
}

async fn rebuild_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<BuildReport>, ApiError> {
    authorize(&state, &headers)?;
    match rebuild(&state).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::error!(error = %e, "rebuild failed");
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("rebuild failed: {e:#}")))
        }
    }
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err(api_error(StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set")),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err(api_error(StatusCode::UNAUTHORIZED, "invalid admin token"))
    }
}
