// src/api/scan.rs

use axum::{
    extract::{Path, State},
    Json,
};

use super::{ApiError, SharedPipeline};
use crate::core::models::{ScanRequest, ScanResponse};

pub async fn scan_post(
    State(pipeline): State<SharedPipeline>,
    Json(request): Json<ScanRequest>,
) -> Result<Json<ScanResponse>, ApiError> {
    let report = pipeline.scan(request.target).await?;
    Ok(Json(report.into()))
}

pub async fn scan_get(
    State(pipeline): State<SharedPipeline>,
    Path(target): Path<String>,
) -> Result<Json<ScanResponse>, ApiError> {
    let report = pipeline.scan(Some(target)).await?;
    Ok(Json(report.into()))
}

/// Scans the configured default target.
pub async fn quick_scan(State(pipeline): State<SharedPipeline>) -> Result<Json<ScanResponse>, ApiError> {
    let report = pipeline.scan(None).await?;
    Ok(Json(report.into()))
}
