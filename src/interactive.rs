// src/interactive.rs

use chrono::Local;
use std::io::{BufRead, Write};
use tracing::info;

use crate::core::models::AnalyzeResponse;
use crate::core::pipeline::{Pipeline, PipelineError};

pub const SCAN_BANNER: &str = "==================== NMAP SCAN RESULTS ====================";
pub const ANALYSIS_BANNER: &str = "================ AI SECURITY ANALYSIS =================";

#[derive(Debug, thiserror::Error)]
pub enum InteractiveError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Prompts for a target and reads one line.
///
/// A blank line (or end of input) selects the default target.
pub fn read_target<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    default_target: &str,
) -> std::io::Result<Option<String>> {
    write!(output, "Enter target to scan (hostname or IP) [{default_target}]: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let target = line.trim();
    Ok((!target.is_empty()).then(|| target.to_string()))
}

/// Writes the scan and analysis sections under their banners.
pub fn print_report<W: Write>(output: &mut W, response: &AnalyzeResponse) -> std::io::Result<()> {
    writeln!(output)?;
    writeln!(output, "Target: {}", response.target)?;
    writeln!(output, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(output)?;
    writeln!(output, "{SCAN_BANNER}")?;
    writeln!(output, "{}", response.scan_result)?;
    writeln!(output)?;
    writeln!(output, "{ANALYSIS_BANNER}")?;
    writeln!(output, "{}", response.analysis)?;
    output.flush()
}

/// One synchronous session: read a target, scan, analyze, print.
pub async fn run<R: BufRead, W: Write>(
    pipeline: &Pipeline,
    input: &mut R,
    output: &mut W,
) -> Result<(), InteractiveError> {
    let target = read_target(input, output, pipeline.default_target())?;
    let shown = target.as_deref().unwrap_or(pipeline.default_target()).to_string();
    info!(target = %shown, "Interactive session started.");

    writeln!(output, "Scanning {shown}, this can take up to a couple of minutes...")?;
    let response = AnalyzeResponse::from(pipeline.scan_and_analyze(target).await?);
    print_report(output, &response)?;
    Ok(())
}
