use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::explain::{ExplanationSource, RouteExplainer};
use crate::routing::{toy_route, Coordinate};
use crate::scoring::score_route;
use crate::segment::ScoredSegment;
use crate::summarizer::LazySummarizer;

pub const HEADER_SUMMARIZER_USED: &str = "x-summarizer-used";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub explainer: RouteExplainer,
}

impl AppState {
    /// Wire the explainer to a lazily built summarizer from the config file.
    pub fn from_config(config: AppConfig) -> Self {
        let summarizer_cfg = config.summarizer();
        let timeout = Duration::from_millis(summarizer_cfg.timeout_ms);
        let explainer = RouteExplainer::new(Arc::new(LazySummarizer::from_config(summarizer_cfg)))
            .with_timeout(timeout);
        Self {
            config: Arc::new(config),
            explainer,
        }
    }

    pub fn from_env() -> Self {
        Self::from_config(AppConfig::from_env())
    }

    pub fn with_explainer(config: AppConfig, explainer: RouteExplainer) -> Self {
        Self {
            config: Arc::new(config),
            explainer,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/route", get(get_route))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct RootResp {
    name: &'static str,
    docs: &'static str,
}

async fn root() -> Json<RootResp> {
    Json(RootResp {
        name: "PathGuard API",
        docs: "/docs",
    })
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "env": { "USE_HF": state.config.use_hf_raw },
    }))
}

#[derive(serde::Deserialize)]
struct RouteQuery {
    /// "lat,lon", e.g. "50.1,8.6"
    start: String,
    /// "lat,lon", e.g. "50.11,8.68"
    end: String,
}

#[derive(serde::Serialize)]
struct RouteResp {
    segments: Vec<ScoredSegment>,
    safety_score: f64,
    explanation: String,
}

/// 400 with a JSON `{ "error": ... }` body.
struct BadRequest(anyhow::Error);

impl IntoResponse for BadRequest {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": format!("{:#}", self.0) }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

async fn get_route(
    State(state): State<AppState>,
    Query(q): Query<RouteQuery>,
) -> Result<Response, BadRequest> {
    let start: Coordinate = q.start.parse().map_err(BadRequest)?;
    let end: Coordinate = q.end.parse().map_err(BadRequest)?;

    let segments = score_route(toy_route(start, end));
    let explained = state
        .explainer
        .explain_route_detailed(&segments, state.config.use_alternate_backend)
        .await;

    let used = explained.source == ExplanationSource::Summarizer;
    info!(
        %start, %end,
        segments = segments.len(),
        safety_score = explained.result.safety_score,
        summarizer_used = used,
        "route explained"
    );

    let body = RouteResp {
        segments,
        safety_score: explained.result.safety_score,
        explanation: explained.result.explanation,
    };
    let flag = if used { "1" } else { "0" };
    Ok(([(HEADER_SUMMARIZER_USED, flag)], Json(body)).into_response())
}
