//! Native deployment probe for MFE shells.
//!
//! Runs the shell's orchestrator against live remotes: scripts are fetched
//! over HTTP in sequence, readiness means a fetched bundle declares the mount
//! function, and federated remotes are checked through their remote entry.

#![forbid(unsafe_code)]

pub mod config;
pub mod http_host;
pub mod logging;
pub mod probe;
pub mod report;

pub use config::AppConfig;
pub use report::ProbeReport;
