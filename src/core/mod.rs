// src/core/mod.rs

/// Request/response shapes and the tagged scan and analysis outcomes, along
/// with their wire rendering.
pub mod models;

/// The scan executor: the `PortScanner` seam and the nmap child-process runner.
pub mod scanner;

/// The analysis client: chat provider seam, Groq implementation and the
/// fixed report prompt.
pub mod analysis;

/// Composes scanning and analysis into the operations the interfaces expose.
pub mod pipeline;
