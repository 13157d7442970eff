// src/core/scanner/mod.rs

// Public interface of the scan executor. The trait is the seam the pipeline
// depends on; `nmap` holds the child-process implementation.
pub mod nmap;

use crate::core::models::ScanOutcome;
use async_trait::async_trait;

pub use self::nmap::NmapScanner;

/// Something that can probe a target and report what it saw.
///
/// Implementations never return an error: every failure is folded into
/// [`ScanOutcome::Failed`].
#[async_trait]
pub trait PortScanner: Send + Sync {
    /// Scans `target` (hostname or address) and returns the outcome.
    async fn scan(&self, target: &str) -> ScanOutcome;

    /// Short name used in log lines.
    fn name(&self) -> &str;
}
