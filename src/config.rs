// src/config.rs

use color_eyre::eyre::{eyre, Result, WrapErr};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::core::models::ScanProfile;

/// Host used whenever a caller does not name a target. The nmap project
/// explicitly allows scanning it.
pub const DEFAULT_TARGET: &str = "scanme.nmap.org";

pub const API_KEY_VAR: &str = "GROQ_API_KEY";

const DEFAULT_BIND: &str = "0.0.0.0:8000";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
const DEFAULT_SCANNER_COMMAND: &str = "nmap";
const DEFAULT_SCAN_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_CONCURRENT_SCANS: usize = 4;
const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1/";
const DEFAULT_LLM_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_ANALYSIS_CHARS: usize = 65_536;

/// Process-wide configuration, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub default_target: String,
    pub bind_addr: SocketAddr,
    pub cors_origins: Vec<String>,
    pub max_concurrent_scans: usize,
    pub scan: ScanConfig,
    pub analysis: AnalysisConfig,
}

/// How the scanner child process is launched.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Executable to run, e.g. `nmap` or `sudo`.
    pub program: PathBuf,
    /// Arguments placed before the profile flags (`["nmap"]` when wrapped by `sudo`).
    pub leading_args: Vec<String>,
    pub profile: ScanProfile,
    /// Hard wall-clock ceiling for a single scanner run.
    pub process_timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_SCANNER_COMMAND),
            leading_args: Vec::new(),
            profile: ScanProfile::default(),
            process_timeout: Duration::from_secs(DEFAULT_SCAN_TIMEOUT_SECS),
        }
    }
}

#[derive(Clone)]
pub struct AnalysisConfig {
    pub api_key: Option<String>,
    pub base_url: Url,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout: Duration,
    /// Scan text beyond this many characters is truncated before it is sent.
    /// `None` sends everything.
    pub max_input_chars: Option<usize>,
}

// Hand-written so the credential never ends up in a log line.
impl std::fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url.as_str())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout", &self.request_timeout)
            .field("max_input_chars", &self.max_input_chars)
            .finish()
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: Url::parse(DEFAULT_LLM_BASE_URL).expect("default base URL is valid"),
            model: DEFAULT_LLM_MODEL.to_string(),
            temperature: 0.1,
            max_tokens: 1000,
            request_timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            max_input_chars: Some(DEFAULT_MAX_ANALYSIS_CHARS),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_target: DEFAULT_TARGET.to_string(),
            bind_addr: DEFAULT_BIND.parse().expect("default bind address is valid"),
            cors_origins: split_list(DEFAULT_CORS_ORIGINS),
            max_concurrent_scans: DEFAULT_MAX_CONCURRENT_SCANS,
            scan: ScanConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads `.env` (if present) and then reads the process environment.
    ///
    /// A missing credential is not an error: analysis degrades to a
    /// configuration diagnostic instead of stopping the service.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file."),
            Err(e) if e.not_found() => debug!("No .env file found, using process environment."),
            Err(e) => warn!(error = %e, "Failed to read .env file, ignoring it."),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        config.analysis.api_key = var(API_KEY_VAR);

        if let Some(target) = var("RECON_ANALYST_DEFAULT_TARGET") {
            config.default_target = target;
        }
        if let Some(bind) = var("RECON_ANALYST_BIND") {
            config.bind_addr = bind
                .parse()
                .wrap_err_with(|| format!("RECON_ANALYST_BIND is not a socket address: {bind}"))?;
        }
        if let Some(origins) = var("RECON_ANALYST_CORS_ORIGINS") {
            config.cors_origins = split_list(&origins);
        }
        if let Some(command) = var("RECON_ANALYST_NMAP") {
            let mut words = command.split_whitespace().map(String::from);
            let program = words
                .next()
                .ok_or_else(|| eyre!("RECON_ANALYST_NMAP must name a program"))?;
            config.scan.program = PathBuf::from(program);
            config.scan.leading_args = words.collect();
        }
        if let Some(secs) = parse_var::<u64>(&var, "RECON_ANALYST_SCAN_TIMEOUT_SECS")? {
            if secs == 0 {
                return Err(eyre!("RECON_ANALYST_SCAN_TIMEOUT_SECS must be greater than zero"));
            }
            config.scan.process_timeout = Duration::from_secs(secs);
        }
        if let Some(limit) = parse_var::<usize>(&var, "RECON_ANALYST_MAX_CONCURRENT_SCANS")? {
            config.max_concurrent_scans = limit.max(1);
        }
        if let Some(base) = var("RECON_ANALYST_LLM_BASE_URL") {
            config.analysis.base_url = parse_base_url(&base)?;
        }
        if let Some(model) = var("RECON_ANALYST_LLM_MODEL") {
            config.analysis.model = model;
        }
        if let Some(secs) = parse_var::<u64>(&var, "RECON_ANALYST_LLM_TIMEOUT_SECS")? {
            config.analysis.request_timeout = Duration::from_secs(secs);
        }
        if let Some(chars) = parse_var::<usize>(&var, "RECON_ANALYST_MAX_ANALYSIS_CHARS")? {
            config.analysis.max_input_chars = (chars > 0).then_some(chars);
        }

        info!(
            default_target = %config.default_target,
            scanner = %config.scan.program.display(),
            scan_timeout_secs = config.scan.process_timeout.as_secs(),
            model = %config.analysis.model,
            credential_present = config.analysis.api_key.is_some(),
            "Configuration loaded."
        );
        if config.analysis.api_key.is_none() {
            warn!("{} is not set; analysis requests will return a configuration error.", API_KEY_VAR);
        }
        Ok(config)
    }
}

fn parse_var<T>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var(key)
        .map(|raw| {
            raw.parse::<T>()
                .wrap_err_with(|| format!("{key} has an invalid value: {raw}"))
        })
        .transpose()
}

/// `Url::join` drops the last path segment unless the base ends with `/`.
fn parse_base_url(raw: &str) -> Result<Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).wrap_err_with(|| format!("RECON_ANALYST_LLM_BASE_URL is not a URL: {raw}"))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
