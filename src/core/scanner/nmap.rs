// src/core/scanner/nmap.rs

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use super::PortScanner;
use crate::config::ScanConfig;
use crate::core::models::{ScanFailure, ScanOutcome, ScanProfile};

/// Runs nmap as a bounded child process.
///
/// One child is spawned per call. The parent enforces a wall-clock ceiling on
/// top of nmap's own `--host-timeout`; when it trips, the child is killed and
/// reaped before the timeout outcome is returned. The child is also spawned
/// with `kill_on_drop`, so abandoning the future (e.g. the HTTP client went
/// away) terminates the scan instead of leaving it running.
#[derive(Debug, Clone)]
pub struct NmapScanner {
    program: PathBuf,
    leading_args: Vec<String>,
    profile: ScanProfile,
    process_timeout: Duration,
}

impl NmapScanner {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            program: config.program.clone(),
            leading_args: config.leading_args.clone(),
            profile: config.profile.clone(),
            process_timeout: config.process_timeout,
        }
    }

    /// Full argument list passed to the program for `target`.
    pub fn command_args(&self, target: &str) -> Vec<String> {
        let mut args = self.leading_args.clone();
        args.extend(self.profile.to_args());
        args.push(target.to_string());
        args
    }

    async fn run(&self, target: &str) -> ScanOutcome {
        let args = self.command_args(target);
        debug!(program = %self.program.display(), args = ?args, "Spawning scanner process.");

        let mut child = match Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                error!(program = %self.program.display(), error = %e, "Failed to spawn scanner.");
                return ScanOutcome::Failed(ScanFailure::Spawn(e));
            }
        };

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        // Pipes are drained while waiting so a chatty scanner cannot block on a full buffer.
        let waited = tokio::time::timeout(self.process_timeout, async {
            tokio::join!(child.wait(), read_pipe(stdout_pipe), read_pipe(stderr_pipe))
        })
        .await;

        let (status, stdout, stderr) = match waited {
            Ok(collected) => collected,
            Err(_) => {
                warn!(
                    target,
                    ceiling_secs = self.process_timeout.as_secs(),
                    "Scanner exceeded its ceiling, killing it."
                );
                // `kill` also waits for the child, so nothing is left behind.
                if let Err(e) = child.kill().await {
                    error!(error = %e, "Failed to kill timed-out scanner.");
                }
                return ScanOutcome::Failed(ScanFailure::Timeout {
                    ceiling: self.process_timeout,
                });
            }
        };

        let status = match status {
            Ok(status) => status,
            Err(e) => return ScanOutcome::Failed(ScanFailure::Io(e)),
        };
        let stdout = match stdout {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => return ScanOutcome::Failed(ScanFailure::Io(e)),
        };
        // stderr is only a hint for the diagnostic, a read error there is not fatal.
        let stderr = stderr
            .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
            .unwrap_or_default();

        if !status.success() {
            warn!(target, status = %status, "Scanner exited unsuccessfully.");
            return ScanOutcome::Failed(ScanFailure::NonZeroExit {
                status: status.to_string(),
                stderr: if stderr.is_empty() {
                    "no error output".to_string()
                } else {
                    stderr
                },
            });
        }

        if stdout.trim().is_empty() {
            warn!(target, "Scanner succeeded but wrote nothing to stdout.");
            return ScanOutcome::Failed(ScanFailure::EmptyOutput);
        }

        ScanOutcome::Completed(stdout)
    }
}

#[async_trait]
impl PortScanner for NmapScanner {
    async fn scan(&self, target: &str) -> ScanOutcome {
        info!(target, "Starting nmap scan.");
        let started = Instant::now();
        let outcome = self.run(target).await;
        info!(
            target,
            success = outcome.is_success(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Nmap scan finished."
        );
        outcome
    }

    fn name(&self) -> &str {
        "nmap"
    }
}

async fn read_pipe<R>(pipe: Option<R>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}
