//! Probe results: the presentation surface the reporter writes to, and the
//! per-remote report printed at the end of a run.

use std::fmt;

use mfe_shell::{Environment, MfeOrchestrator};
use mfe_shell_sdk::{
    DiagnosticPanel, LoaderStrategy, MfeStatus, PresentationSurface, RegionState, Summary,
    SurfaceError,
};
use parking_lot::Mutex;
use serde::Serialize;

/// What the status reporter did to one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "treatment", rename_all = "snake_case")]
pub enum RegionUpdate {
    Success { container_id: String },
    Panel { container_id: String, title: String },
}

/// Headless surface: every region exists and every update is recorded.
#[derive(Debug, Default)]
pub struct RecordedSurface {
    updates: Mutex<Vec<RegionUpdate>>,
}

impl RecordedSurface {
    #[must_use]
    pub fn updates(&self) -> Vec<RegionUpdate> {
        self.updates.lock().clone()
    }
}

impl PresentationSurface for RecordedSurface {
    fn apply_success(&self, container_id: &str) -> Result<RegionState, SurfaceError> {
        self.updates.lock().push(RegionUpdate::Success {
            container_id: container_id.to_owned(),
        });
        Ok(RegionState::Applied)
    }

    fn show_panel(
        &self,
        container_id: &str,
        panel: &DiagnosticPanel,
    ) -> Result<RegionState, SurfaceError> {
        self.updates.lock().push(RegionUpdate::Panel {
            container_id: container_id.to_owned(),
            title: panel.title.clone(),
        });
        Ok(RegionState::Applied)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteRow {
    pub name: String,
    pub tech: String,
    pub strategy: LoaderStrategy,
    pub status: MfeStatus,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub environment: Environment,
    pub remotes: Vec<RemoteRow>,
    pub summary: Summary,
    pub regions: Vec<RegionUpdate>,
}

impl ProbeReport {
    /// Rows follow registry order.
    #[must_use]
    pub fn collect(
        environment: Environment,
        orchestrator: &MfeOrchestrator,
        summary: Summary,
        regions: Vec<RegionUpdate>,
    ) -> Self {
        let remotes = orchestrator
            .registry()
            .iter()
            .map(|descriptor| {
                let error = summary
                    .failed_remotes
                    .iter()
                    .find(|f| f.remote.name == descriptor.info.name)
                    .map(|f| f.error.to_string());
                RemoteRow {
                    name: descriptor.info.name.clone(),
                    tech: descriptor.info.tech.clone(),
                    strategy: descriptor.loader.strategy(),
                    status: orchestrator.status(descriptor.name()),
                    error,
                }
            })
            .collect();

        Self {
            environment,
            remotes,
            summary,
            regions,
        }
    }

    #[must_use]
    pub const fn passed(&self) -> bool {
        self.summary.all_loaded()
    }

    /// # Errors
    /// Returns an error if the report cannot be serialized.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .remotes
            .iter()
            .map(|r| r.name.len())
            .max()
            .unwrap_or(0)
            .max("REMOTE".len());

        writeln!(f, "environment: {}", self.environment)?;
        writeln!(
            f,
            "{:<name_width$}  {:<10}  {:<15}  {:<7}  DETAIL",
            "REMOTE", "TECH", "STRATEGY", "STATUS"
        )?;
        for row in &self.remotes {
            // padding needs owned strings: the Display impls write through write_str
            let strategy = row.strategy.to_string();
            let status = row.status.to_string();
            writeln!(
                f,
                "{:<name_width$}  {:<10}  {strategy:<15}  {status:<7}  {}",
                row.name,
                row.tech,
                row.error.as_deref().unwrap_or("-"),
            )?;
        }
        write!(
            f,
            "{} of {} remotes loaded, {} failed",
            self.summary.loaded, self.summary.total, self.summary.failed
        )
    }
}
