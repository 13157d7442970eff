// src/bin/recon-cli.rs

use color_eyre::eyre::Result;
use recon_analyst::config::AppConfig;
use recon_analyst::core::pipeline::Pipeline;
use recon_analyst::{interactive, logging};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    // Logs go to the file only; stdout carries the report.
    logging::initialize_logging(logging::LogOutput::FileOnly)?;

    let config = AppConfig::from_env()?;
    let pipeline = Pipeline::from_config(&config)?;

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    interactive::run(&pipeline, &mut input, &mut output).await?;
    Ok(())
}
