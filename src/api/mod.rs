// src/api/mod.rs

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::any::Any;
use std::sync::Arc;
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any as AnyValue, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::core::pipeline::{Pipeline, PipelineError};

pub mod analyze;
pub mod scan;

pub type SharedPipeline = Arc<Pipeline>;

/// Errors that escape the pipeline's absorbed-failure paths.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self, "Request failed with an internal error.");
        detail_response(self.to_string())
    }
}

fn detail_response(detail: String) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "detail": detail }))).into_response()
}

/// Turns a handler panic into the same `{detail}` 500 as any other internal fault.
fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "internal server error".to_string()
    };
    error!(detail = %detail, "Handler panicked.");
    detail_response(detail)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin.");
                    None
                }
            })
            .collect();
        AllowOrigin::list(allowed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AnyValue)
        .allow_headers(AnyValue)
}

/// Builds the full HTTP surface around a pipeline.
pub fn router(pipeline: SharedPipeline, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/scan", post(scan::scan_post))
        .route("/scan/{target}", get(scan::scan_get))
        .route("/analyze", post(analyze::analyze_post))
        .route("/analyze/{target}", get(analyze::analyze_get))
        .route("/quick-scan", get(scan::quick_scan))
        .route("/quick-analyze", get(analyze::quick_analyze))
        .with_state(pipeline)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
}

async fn root(State(pipeline): State<SharedPipeline>) -> Json<Value> {
    let default_target = pipeline.default_target();
    Json(json!({
        "message": "Welcome to Recon Analyst, an nmap scanner with AI risk analysis",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "default_target": default_target,
        "endpoints": {
            "/scan": "POST - Run Nmap scan on target",
            "/analyze": "POST - Run Nmap scan and analyze with AI",
            "/scan/{target}": "GET - Run Nmap scan on target (simple)",
            "/analyze/{target}": "GET - Run Nmap scan and analyze with AI (simple)",
            "/quick-scan": format!("GET - Run Nmap scan on default target ({default_target})"),
            "/quick-analyze": "GET - Run Nmap scan and AI analysis on default target"
        }
    }))
}
