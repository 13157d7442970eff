// src/core/models.rs

use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::{AsRefStr, Display};
use thiserror::Error;

// --- Request Models ---

/// Body accepted by `POST /scan` and `POST /analyze`.
///
/// An absent (or `null`) target falls back to the configured default. An
/// explicit empty string is kept as-is and handed to the scanner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanRequest {
    #[serde(default)]
    pub target: Option<String>,
}

// --- Scanner Profile ---

/// Fixed nmap flags applied to every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanProfile {
    /// `-sV`: probe open ports for service and version.
    pub service_detection: bool,
    /// `-Pn`: skip host discovery so hosts that drop pings are still probed.
    pub skip_host_discovery: bool,
    /// `-T<n>`, 0 (paranoid) through 5 (insane).
    pub timing_template: u8,
    pub max_rtt_timeout: Duration,
    pub max_retries: u32,
    pub host_timeout: Duration,
}

impl Default for ScanProfile {
    fn default() -> Self {
        Self {
            service_detection: true,
            skip_host_discovery: true,
            timing_template: 5,
            max_rtt_timeout: Duration::from_millis(500),
            max_retries: 1,
            host_timeout: Duration::from_secs(60),
        }
    }
}

impl ScanProfile {
    /// Renders the profile as nmap command-line arguments.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.service_detection {
            args.push("-sV".to_string());
        }
        if self.skip_host_discovery {
            args.push("-Pn".to_string());
        }
        args.push(format!("-T{}", self.timing_template.min(5)));
        args.push("--max-rtt-timeout".to_string());
        args.push(format!("{}ms", self.max_rtt_timeout.as_millis()));
        args.push("--max-retries".to_string());
        args.push(self.max_retries.to_string());
        args.push("--host-timeout".to_string());
        args.push(format!("{}s", self.host_timeout.as_secs()));
        args
    }
}

// --- Scan Outcome ---

/// Every way a scanner run can go wrong. The variant name is used as the
/// failure kind in diagnostics.
#[derive(Debug, Error, AsRefStr)]
pub enum ScanFailure {
    #[error("scanner exceeded the {}s ceiling", .ceiling.as_secs())]
    Timeout { ceiling: Duration },

    #[error("could not launch scanner: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("scanner exited with {status}: {stderr}")]
    NonZeroExit { status: String, stderr: String },

    #[error("error while waiting for scanner: {0}")]
    Io(#[source] std::io::Error),

    #[error("scanner finished without producing any output")]
    EmptyOutput,
}

/// Result of one scanner run, kept tagged until it reaches the wire.
#[derive(Debug)]
pub enum ScanOutcome {
    Completed(String),
    Failed(ScanFailure),
}

impl ScanOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ScanOutcome::Completed(_))
    }

    /// Wire rendering: stdout verbatim on success, a diagnostic sentence otherwise.
    pub fn render(&self, target: &str) -> String {
        match self {
            ScanOutcome::Completed(stdout) => stdout.clone(),
            ScanOutcome::Failed(ScanFailure::Timeout { ceiling }) => {
                format!("Scan of {} timed out after {}s", target, ceiling.as_secs())
            }
            ScanOutcome::Failed(failure) => {
                format!("Scan of {} failed: {}: {}", target, failure.as_ref(), failure)
            }
        }
    }
}

/// A finished scan bound to the target it ran against.
#[derive(Debug)]
pub struct ScanReport {
    pub target: String,
    pub outcome: ScanOutcome,
}

impl ScanReport {
    pub fn raw_output(&self) -> String {
        self.outcome.render(&self.target)
    }
}

// --- Analysis Outcome ---

/// Failures of the chat-completion transport or provider.
#[derive(Debug, Error, AsRefStr)]
pub enum ChatError {
    #[error("{0}")]
    Transport(String),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode provider response: {0}")]
    MalformedResponse(String),

    #[error("provider response contained no message content")]
    EmptyChoices,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Error: GROQ_API_KEY not configured. Please set your Groq API key in a .env file.")]
    MissingCredential,

    #[error(transparent)]
    Provider(#[from] ChatError),
}

#[derive(Debug)]
pub enum AnalysisOutcome {
    Report(String),
    Failed(AnalysisError),
}

impl AnalysisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Report(_))
    }

    pub fn render(&self) -> String {
        match self {
            AnalysisOutcome::Report(text) => text.clone(),
            AnalysisOutcome::Failed(err @ AnalysisError::MissingCredential) => err.to_string(),
            AnalysisOutcome::Failed(AnalysisError::Provider(err)) => {
                format!("Failed to analyze: {}: {}", err.as_ref(), err)
            }
        }
    }
}

/// Scan plus the analysis of its rendered output.
#[derive(Debug)]
pub struct AnalyzedReport {
    pub scan: ScanReport,
    pub analysis: AnalysisOutcome,
}

// --- Pipeline Stages ---

/// Per-call progress of the pipeline. Only used for logging; nothing is
/// retained between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Idle,
    Scanning,
    Analyzing,
    Done,
}

// --- Wire Responses ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResponse {
    pub target: String,
    pub scan_result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub target: String,
    pub scan_result: String,
    pub analysis: String,
}

impl From<ScanReport> for ScanResponse {
    fn from(report: ScanReport) -> Self {
        Self {
            scan_result: report.raw_output(),
            target: report.target,
        }
    }
}

impl From<AnalyzedReport> for AnalyzeResponse {
    fn from(report: AnalyzedReport) -> Self {
        Self {
            scan_result: report.scan.raw_output(),
            analysis: report.analysis.render(),
            target: report.scan.target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_matches_the_fast_service_scan() {
        assert_eq!(
            ScanProfile::default().to_args(),
            vec![
                "-sV", "-Pn", "-T5", "--max-rtt-timeout", "500ms", "--max-retries", "1",
                "--host-timeout", "60s"
            ]
        );
    }

    #[test]
    fn timeout_renders_target_and_ceiling() {
        let outcome = ScanOutcome::Failed(ScanFailure::Timeout { ceiling: Duration::from_secs(120) });
        assert_eq!(outcome.render("10.0.0.1"), "Scan of 10.0.0.1 timed out after 120s");
    }

    #[test]
    fn failures_embed_kind_and_message() {
        let outcome = ScanOutcome::Failed(ScanFailure::NonZeroExit {
            status: "exit status: 1".to_string(),
            stderr: "Failed to resolve \"nowhere\".".to_string(),
        });
        let rendered = outcome.render("nowhere");
        assert!(rendered.starts_with("Scan of nowhere failed: NonZeroExit: "));
        assert!(rendered.contains("Failed to resolve"));
    }

    #[test]
    fn provider_failure_renders_kind() {
        let outcome = AnalysisOutcome::Failed(AnalysisError::Provider(ChatError::Status {
            status: 503,
            body: "over capacity".to_string(),
        }));
        assert_eq!(
            outcome.render(),
            "Failed to analyze: Status: provider returned HTTP 503: over capacity"
        );
    }

    #[test]
    fn missing_body_target_deserializes_to_none() {
        let request: ScanRequest = serde_json::from_str("{}").unwrap();
        assert!(request.target.is_none());
        let request: ScanRequest = serde_json::from_str(r#"{"target": ""}"#).unwrap();
        assert_eq!(request.target.as_deref(), Some(""));
    }
}
