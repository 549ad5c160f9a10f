use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use feature_core::{
    default_registry, load_settings, render::to_html, Dispatcher, Fetcher, HttpFetcher,
    MemorySink, Registry, Settings, StaticPage,
};
use serde::{Deserialize, Serialize};
use shared::{
    domain::{FeatureId, FeatureSummary, RenderState},
    error::{ApiError, ErrorCode},
};
use tracing::{error, info, warn};

#[derive(Clone)]
struct AppState {
    registry: Arc<Registry>,
    fetcher: Arc<dyn Fetcher>,
    settings: Arc<Settings>,
}

#[derive(Debug, Default, Deserialize)]
struct InvokeRequest {
    #[serde(default)]
    inputs: HashMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct InvokeResponse {
    feature: FeatureId,
    container: String,
    state: RenderState,
    html: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings().context("failed to load showcase settings")?;
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();
    settings.report_ignored();

    if settings.tmdb_api_key().is_none() {
        warn!("no TMDB API key configured; trending movies will ask for one");
    }
    let fetcher =
        HttpFetcher::new(settings.http_timeout()).context("failed to build HTTP client")?;
    let addr: SocketAddr = settings
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.bind_addr))?;

    let state = AppState {
        registry: Arc::new(default_registry()),
        fetcher: Arc::new(fetcher),
        settings: Arc::new(settings),
    };
    info!(%addr, features = state.registry.len(), "showcase server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/features", get(list_features))
        .route("/features/:feature", post(invoke_feature))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn list_features(State(state): State<AppState>) -> Json<Vec<FeatureSummary>> {
    Json(state.registry.summaries())
}

/// Runs one feature the way a click on its page would, returning the final
/// content of its output container. Feature failures are a normal response
/// with `state: "error"`; only an unknown feature or an unreadable body is
/// an HTTP error.
async fn invoke_feature(
    State(state): State<AppState>,
    Path(feature): Path<String>,
    payload: Result<Json<InvokeRequest>, JsonRejection>,
) -> Result<Json<InvokeResponse>, (StatusCode, Json<ApiError>)> {
    let id: FeatureId = feature
        .parse()
        .map_err(|e| (StatusCode::NOT_FOUND, Json(ApiError::from(e))))?;
    let config = state.registry.get(id).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ApiError::new(
                ErrorCode::NotFound,
                format!("feature '{id}' is not registered"),
            )),
        )
    })?;
    let Json(req) = payload.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(ErrorCode::Validation, rejection.body_text())),
        )
    })?;

    let page = StaticPage::with_inputs(
        config,
        req.inputs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str())),
    );
    // Each request gets its own sink so concurrent callers never share
    // containers or generations.
    let sink = Arc::new(MemorySink::new());
    let dispatcher = Dispatcher::new(
        state.registry.clone(),
        state.fetcher.clone(),
        sink,
        state.settings.clone(),
    );

    let outcome = dispatcher.invoke(id, &page).await;
    let Some(view) = outcome.view() else {
        error!(feature = %id, ?outcome, "feature produced no output");
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new(
                ErrorCode::Internal,
                "feature produced no output",
            )),
        ));
    };

    Ok(Json(InvokeResponse {
        feature: id,
        container: config.output.to_string(),
        state: view.state(),
        html: to_html(view),
    }))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
