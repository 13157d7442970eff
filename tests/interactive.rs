mod common;

use common::{StandInProvider, StandInScanner};
use recon_analyst::core::analysis::AnalysisClient;
use recon_analyst::core::pipeline::Pipeline;
use recon_analyst::interactive::{self, ANALYSIS_BANNER, SCAN_BANNER};

#[tokio::test]
async fn session_scans_entered_target_and_prints_both_sections() {
    let config = common::config(Some("test-key"));
    let scanner = StandInScanner::output("21/tcp open ftp vsftpd 2.3.4");
    let provider = StandInProvider::replying("### 📊 Risk Assessment\nHigh");
    let pipeline = Pipeline::new(
        &config,
        scanner.clone(),
        AnalysisClient::new(&config.analysis, provider.clone()),
    );

    let mut input = "192.0.2.21\n".as_bytes();
    let mut output = Vec::new();
    interactive::run(&pipeline, &mut input, &mut output).await.unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains(SCAN_BANNER));
    assert!(text.contains(ANALYSIS_BANNER));
    assert!(text.contains("21/tcp open ftp vsftpd 2.3.4"));
    assert!(text.contains("High"));
    assert_eq!(*scanner.targets.lock().unwrap(), vec!["192.0.2.21".to_string()]);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn blank_input_scans_the_default_target() {
    let config = common::config(None);
    let scanner = StandInScanner::output("Nmap done");
    let pipeline = Pipeline::new(
        &config,
        scanner.clone(),
        AnalysisClient::new(&config.analysis, StandInProvider::replying("unused")),
    );

    let mut input = "\n".as_bytes();
    let mut output = Vec::new();
    interactive::run(&pipeline, &mut input, &mut output).await.unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Target: scanme.nmap.org"));
    assert!(text.contains("GROQ_API_KEY not configured"));
    assert_eq!(*scanner.targets.lock().unwrap(), vec!["scanme.nmap.org".to_string()]);
}
