// src/core/analysis/mod.rs

pub mod prompts;
pub mod provider;

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::core::models::{AnalysisError, AnalysisOutcome};
use self::prompts::SECURITY_ANALYST_PROMPT;
use self::provider::{ChatMessage, ChatProvider, ChatRequest};

pub use self::provider::GroqProvider;

/// Turns raw scan text into a risk narrative through a chat provider.
///
/// A single attempt is made per call. Whatever goes wrong is returned as an
/// [`AnalysisOutcome::Failed`], never as an error.
pub struct AnalysisClient {
    provider: Arc<dyn ChatProvider>,
    credential_present: bool,
    model: String,
    temperature: f32,
    max_tokens: u32,
    max_input_chars: Option<usize>,
}

impl AnalysisClient {
    pub fn new(config: &AnalysisConfig, provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            provider,
            credential_present: config.api_key.is_some(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_input_chars: config.max_input_chars,
        }
    }

    /// Builds the request that would be sent for `scan_text`.
    pub fn build_request(&self, scan_text: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SECURITY_ANALYST_PROMPT),
                ChatMessage::user(cap_input(scan_text, self.max_input_chars)),
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    pub async fn analyze(&self, scan_text: &str) -> AnalysisOutcome {
        if !self.credential_present {
            warn!("Analysis requested but no API credential is configured.");
            return AnalysisOutcome::Failed(AnalysisError::MissingCredential);
        }

        info!(
            provider = self.provider.provider_name(),
            model = %self.model,
            input_chars = scan_text.chars().count(),
            "Sending scan output for analysis."
        );
        match self.provider.complete(self.build_request(scan_text)).await {
            Ok(report) => {
                debug!(chars = report.len(), "Analysis completed.");
                AnalysisOutcome::Report(report)
            }
            Err(e) => {
                warn!(kind = e.as_ref(), error = %e, "Analysis failed.");
                AnalysisOutcome::Failed(AnalysisError::Provider(e))
            }
        }
    }
}

/// Truncates on a char boundary and notes how much was dropped.
fn cap_input(scan_text: &str, limit: Option<usize>) -> String {
    let Some(limit) = limit else {
        return scan_text.to_string();
    };
    match scan_text.char_indices().nth(limit) {
        None => scan_text.to_string(),
        Some((cut, _)) => {
            let dropped = scan_text[cut..].chars().count();
            debug!(limit, dropped, "Truncating scan output before analysis.");
            format!("{}\n[... truncated {} characters]", &scan_text[..cut], dropped)
        }
    }
}
