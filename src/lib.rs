// src/lib.rs

//! Runs nmap against a host and, on request, hands the output to a language
//! model for a security-risk summary. Served over HTTP (`recon-analyst`) or
//! as a one-shot interactive session (`recon-cli`).

pub mod api;
pub mod config;
pub mod core;
pub mod interactive;
pub mod logging;
