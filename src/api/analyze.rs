// src/api/analyze.rs

use axum::{
    extract::{Path, State},
    Json,
};

use super::{ApiError, SharedPipeline};
use crate::core::models::{AnalyzeResponse, ScanRequest};

pub async fn analyze_post(
    State(pipeline): State<SharedPipeline>,
    Json(request): Json<ScanRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let report = pipeline.scan_and_analyze(request.target).await?;
    Ok(Json(report.into()))
}

pub async fn analyze_get(
    State(pipeline): State<SharedPipeline>,
    Path(target): Path<String>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let report = pipeline.scan_and_analyze(Some(target)).await?;
    Ok(Json(report.into()))
}

/// Scans and analyzes the configured default target.
pub async fn quick_analyze(State(pipeline): State<SharedPipeline>) -> Result<Json<AnalyzeResponse>, ApiError> {
    let report = pipeline.scan_and_analyze(None).await?;
    Ok(Json(report.into()))
}
