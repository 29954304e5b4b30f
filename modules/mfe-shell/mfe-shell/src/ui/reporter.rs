//! Success/failure treatment of presentation regions.
//!
//! Reporting is best effort: a missing region is a no-op and a surface
//! error is logged and dropped, so it never replaces the load failure the
//! orchestrator already recorded.

use std::rc::Rc;

use mfe_shell_sdk::{PresentationSurface, RegionState};
use tracing::{debug, warn};

use crate::ui::panel::diagnostic_panel;

#[derive(Clone)]
pub struct StatusReporter {
    surface: Rc<dyn PresentationSurface>,
}

impl StatusReporter {
    #[must_use]
    pub fn new(surface: Rc<dyn PresentationSurface>) -> Self {
        Self { surface }
    }

    pub fn show_success(&self, container_id: &str) {
        match self.surface.apply_success(container_id) {
            Ok(RegionState::Applied) => debug!(container_id, "success treatment applied"),
            Ok(RegionState::Absent) => debug!(container_id, "region not present, nothing to mark"),
            Err(e) => warn!(container_id, error = %e, "failed to apply success treatment"),
        }
    }

    pub fn show_error(&self, container_id: &str, name: &str, tech: &str, port: Option<u16>) {
        let panel = diagnostic_panel(name, tech, port);
        match self.surface.show_panel(container_id, &panel) {
            Ok(RegionState::Applied) => debug!(container_id, remote = name, "diagnostic panel shown"),
            Ok(RegionState::Absent) => {
                debug!(container_id, remote = name, "region not present, panel skipped");
            }
            Err(e) => warn!(container_id, remote = name, error = %e, "failed to show diagnostic panel"),
        }
    }
}
