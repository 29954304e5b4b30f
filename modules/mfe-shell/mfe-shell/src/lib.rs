//! MFE shell core.
//!
//! Composes independently deployed remotes into one page:
//!
//! - [`domain::origin`] checks a remote's origin against its allow-list
//! - [`domain::loaders`] holds the two loader strategies (script sequence, federated)
//! - [`domain::registry`] turns configuration into loader instances and callbacks
//! - [`domain::orchestrator`] runs every remote concurrently with per-remote fault isolation
//! - [`domain::shell`] waits on the authentication gate before orchestrating
//! - [`ui`] reports per-remote status to presentation regions
//! - [`auth`] is the pluggable login gate
//!
//! Nothing here touches a browser directly; the page is reached through the
//! host traits in [`mfe_shell_sdk::host`].

#![forbid(unsafe_code)]

pub mod auth;
pub mod clock;
pub mod config;
pub mod domain;
pub mod ui;

#[cfg(feature = "test-utils")]
pub mod test_support;

pub use config::{ConfigError, Environment, LoaderConfig, RemoteConfig, ShellConfig};
pub use domain::orchestrator::MfeOrchestrator;
pub use domain::registry::{
    FederationTable, MfeRegistry, MfeRegistryBuilder, RegistryError, RegistryWiring,
    RemoteDescriptor,
};
pub use domain::shell::ShellController;
pub use ui::reporter::StatusReporter;
