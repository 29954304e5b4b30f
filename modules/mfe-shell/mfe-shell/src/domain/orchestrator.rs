//! Orchestrator: drives every registered remote through `load` then `mount`.
//!
//! All attempts run concurrently on the current task and settle
//! independently. A failure is recorded against its own remote only;
//! `load_all` itself cannot fail.

use std::collections::HashMap;

use futures::future::join_all;
use mfe_shell_sdk::{FailureRecord, LoadError, LoadOutcome, MfeStatus, RemoteInfo, Summary};
use parking_lot::Mutex;
use tracing::{info, instrument, warn};

use crate::domain::registry::{MfeRegistry, RemoteDescriptor};

#[derive(Default)]
struct RunState {
    loaded: HashMap<String, RemoteInfo>,
    failed: HashMap<String, FailureRecord>,
}

pub struct MfeOrchestrator {
    registry: MfeRegistry,
    state: Mutex<RunState>,
}

impl MfeOrchestrator {
    #[must_use]
    pub fn new(registry: MfeRegistry) -> Self {
        Self {
            registry,
            state: Mutex::new(RunState::default()),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &MfeRegistry {
        &self.registry
    }

    /// Load and mount every remote. Resolves once every attempt has settled.
    ///
    /// Results from a previous run are discarded when the run starts.
    pub async fn load_all(&self) -> Summary {
        *self.state.lock() = RunState::default();
        info!(total = self.registry.len(), "loading remotes");

        let outcomes = join_all(self.registry.iter().map(|d| self.attempt(d))).await;

        let mut summary = Summary {
            total: self.registry.len(),
            ..Summary::default()
        };
        for (descriptor, outcome) in self.registry.iter().zip(outcomes) {
            match outcome {
                LoadOutcome::Loaded => {
                    summary.loaded += 1;
                    summary.loaded_remotes.push(descriptor.info.clone());
                }
                LoadOutcome::Failed(error) => {
                    summary.failed += 1;
                    summary.failed_remotes.push(FailureRecord {
                        remote: descriptor.info.clone(),
                        error,
                    });
                }
            }
        }

        Self::log_summary(&summary);
        summary
    }

    #[instrument(
        skip_all,
        fields(remote = %descriptor.info.name, strategy = %descriptor.loader.strategy())
    )]
    async fn attempt(&self, descriptor: &RemoteDescriptor) -> LoadOutcome {
        let outcome = match Self::load_and_mount(descriptor).await {
            Ok(()) => {
                info!("remote loaded");
                LoadOutcome::Loaded
            }
            Err(error) => {
                warn!(%error, "remote failed");
                LoadOutcome::Failed(error)
            }
        };

        self.record(descriptor, &outcome);
        descriptor.notify(&outcome);
        outcome
    }

    async fn load_and_mount(descriptor: &RemoteDescriptor) -> Result<(), LoadError> {
        let module = descriptor.loader.load().await?;
        descriptor.loader.mount(module).await
    }

    fn record(&self, descriptor: &RemoteDescriptor, outcome: &LoadOutcome) {
        let name = descriptor.info.name.clone();
        let mut state = self.state.lock();
        match outcome {
            LoadOutcome::Loaded => {
                state.loaded.insert(name, descriptor.info.clone());
            }
            LoadOutcome::Failed(error) => {
                state.failed.insert(
                    name,
                    FailureRecord {
                        remote: descriptor.info.clone(),
                        error: error.clone(),
                    },
                );
            }
        }
    }

    /// Status of `name` in the current run; `Unknown` until its attempt settles.
    #[must_use]
    pub fn status(&self, name: &str) -> MfeStatus {
        let state = self.state.lock();
        if state.loaded.contains_key(name) {
            MfeStatus::Loaded
        } else if state.failed.contains_key(name) {
            MfeStatus::Failed
        } else {
            MfeStatus::Unknown
        }
    }

    /// Remotes loaded so far in the current run, in registry order.
    #[must_use]
    pub fn loaded(&self) -> Vec<RemoteInfo> {
        let state = self.state.lock();
        self.registry
            .iter()
            .filter_map(|d| state.loaded.get(d.name()).cloned())
            .collect()
    }

    /// Remotes failed so far in the current run, in registry order.
    #[must_use]
    pub fn failed(&self) -> Vec<FailureRecord> {
        let state = self.state.lock();
        self.registry
            .iter()
            .filter_map(|d| state.failed.get(d.name()).cloned())
            .collect()
    }

    fn log_summary(summary: &Summary) {
        if summary.all_loaded() {
            info!(
                total = summary.total,
                loaded = summary.loaded,
                "all remotes loaded"
            );
            return;
        }

        let failed: Vec<&str> = summary
            .failed_remotes
            .iter()
            .map(|f| f.remote.name.as_str())
            .collect();
        warn!(
            total = summary.total,
            loaded = summary.loaded,
            failed = summary.failed,
            failed_remotes = ?failed,
            "some remotes failed to load; the shell stays interactive"
        );
    }
}
