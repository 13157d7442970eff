#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use recon_analyst::api;
use recon_analyst::config::{AnalysisConfig, AppConfig};
use recon_analyst::core::analysis::AnalysisClient;
use recon_analyst::core::analysis::provider::{ChatProvider, ChatRequest};
use recon_analyst::core::models::{ChatError, ScanFailure, ScanOutcome};
use recon_analyst::core::pipeline::Pipeline;
use recon_analyst::core::scanner::PortScanner;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// What the stand-in scanner does when called.
#[derive(Clone)]
pub enum ScanBehavior {
    Output(String),
    Timeout(Duration),
    Missing,
    Panic,
}

pub struct StandInScanner {
    behavior: ScanBehavior,
    pub targets: Mutex<Vec<String>>,
}

impl StandInScanner {
    pub fn new(behavior: ScanBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            targets: Mutex::new(Vec::new()),
        })
    }

    pub fn output(stdout: &str) -> Arc<Self> {
        Self::new(ScanBehavior::Output(stdout.to_string()))
    }
}

#[async_trait]
impl PortScanner for StandInScanner {
    async fn scan(&self, target: &str) -> ScanOutcome {
        self.targets.lock().unwrap().push(target.to_string());
        match &self.behavior {
            ScanBehavior::Output(stdout) => ScanOutcome::Completed(stdout.clone()),
            ScanBehavior::Timeout(ceiling) => {
                ScanOutcome::Failed(ScanFailure::Timeout { ceiling: *ceiling })
            }
            ScanBehavior::Missing => ScanOutcome::Failed(ScanFailure::Spawn(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No such file or directory (os error 2)",
            ))),
            ScanBehavior::Panic => panic!("scanner stand-in exploded"),
        }
    }

    fn name(&self) -> &str {
        "stand-in"
    }
}

pub struct StandInProvider {
    reply: Result<String, (u16, String)>,
    calls: AtomicUsize,
    pub seen: Mutex<Vec<ChatRequest>>,
}

impl StandInProvider {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err((status, body.to_string())),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatProvider for StandInProvider {
    async fn complete(&self, request: ChatRequest) -> Result<String, ChatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err((status, body)) => Err(ChatError::Status {
                status: *status,
                body: body.clone(),
            }),
        }
    }

    fn provider_name(&self) -> &str {
        "stand-in"
    }
}

pub fn config(api_key: Option<&str>) -> AppConfig {
    AppConfig {
        analysis: AnalysisConfig {
            api_key: api_key.map(String::from),
            ..AnalysisConfig::default()
        },
        ..AppConfig::default()
    }
}

pub fn app_with(
    config: &AppConfig,
    scanner: Arc<dyn PortScanner>,
    provider: Arc<dyn ChatProvider>,
) -> Router {
    let analyst = AnalysisClient::new(&config.analysis, provider);
    let pipeline = Arc::new(Pipeline::new(config, scanner, analyst));
    api::router(pipeline, &config.cors_origins)
}

pub fn app(scanner: Arc<dyn PortScanner>, provider: Arc<dyn ChatProvider>) -> Router {
    app_with(&config(Some("test-key")), scanner, provider)
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
