// src/core/pipeline.rs

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument};

use crate::config::AppConfig;
use crate::core::analysis::{AnalysisClient, GroqProvider};
use crate::core::models::{AnalyzedReport, ChatError, ScanReport, Stage};
use crate::core::scanner::{NmapScanner, PortScanner};

/// Faults that escape the absorbed-failure paths. These are the only errors
/// surfaced to HTTP callers as a non-2xx response.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("scan admission queue is closed")]
    AdmissionClosed,
}

/// Composes the scan executor and the analysis client.
///
/// Calls are independent: the only thing shared between them is the
/// admission semaphore bounding how many scanner processes run at once.
pub struct Pipeline {
    default_target: String,
    scanner: Arc<dyn PortScanner>,
    analyst: AnalysisClient,
    scan_permits: Semaphore,
}

impl Pipeline {
    pub fn new(config: &AppConfig, scanner: Arc<dyn PortScanner>, analyst: AnalysisClient) -> Self {
        Self {
            default_target: config.default_target.clone(),
            scanner,
            analyst,
            scan_permits: Semaphore::new(config.max_concurrent_scans.max(1)),
        }
    }

    /// Wires the production collaborators: nmap and the Groq chat API.
    pub fn from_config(config: &AppConfig) -> Result<Self, ChatError> {
        let scanner = Arc::new(NmapScanner::new(&config.scan));
        let provider = Arc::new(GroqProvider::new(&config.analysis)?);
        let analyst = AnalysisClient::new(&config.analysis, provider);
        Ok(Self::new(config, scanner, analyst))
    }

    pub fn default_target(&self) -> &str {
        &self.default_target
    }

    /// `None` means "use the default". An explicit empty string is kept.
    pub fn resolve_target(&self, requested: Option<String>) -> String {
        requested.unwrap_or_else(|| self.default_target.clone())
    }

    #[instrument(skip(self))]
    pub async fn scan(&self, target: Option<String>) -> Result<ScanReport, PipelineError> {
        let target = self.resolve_target(target);
        debug!(stage = %Stage::Idle, target = %target, "Scan requested.");

        let _permit = self
            .scan_permits
            .acquire()
            .await
            .map_err(|_| PipelineError::AdmissionClosed)?;

        info!(stage = %Stage::Scanning, target = %target, scanner = self.scanner.name());
        let outcome = self.scanner.scan(&target).await;
        Ok(ScanReport { target, outcome })
    }

    /// Runs [`Pipeline::scan`] and always analyzes its rendered output, even
    /// when that output is a failure diagnostic.
    #[instrument(skip(self))]
    pub async fn scan_and_analyze(&self, target: Option<String>) -> Result<AnalyzedReport, PipelineError> {
        let scan = self.scan(target).await?;

        info!(stage = %Stage::Analyzing, target = %scan.target, scan_ok = scan.outcome.is_success());
        let analysis = self.analyst.analyze(&scan.raw_output()).await;

        info!(stage = %Stage::Done, target = %scan.target, analysis_ok = analysis.is_success());
        Ok(AnalyzedReport { scan, analysis })
    }
}
