//! Top-level controller: waits on the authentication gate, then orchestrates.

use std::rc::Rc;

use futures::StreamExt;
use futures::stream::LocalBoxStream;
use mfe_shell_sdk::{AuthGate, AuthState, Summary};
use tracing::{debug, info};

use crate::domain::orchestrator::MfeOrchestrator;

pub struct ShellController {
    orchestrator: Rc<MfeOrchestrator>,
    view: Option<Box<dyn Fn(&AuthState)>>,
}

impl ShellController {
    #[must_use]
    pub fn new(orchestrator: Rc<MfeOrchestrator>) -> Self {
        Self {
            orchestrator,
            view: None,
        }
    }

    /// Called with every auth state before any orchestration it triggers,
    /// e.g. to swap between the login screen and the shell layout.
    #[must_use]
    pub fn with_view(mut self, view: impl Fn(&AuthState) + 'static) -> Self {
        self.view = Some(Box::new(view));
        self
    }

    #[must_use]
    pub fn orchestrator(&self) -> &Rc<MfeOrchestrator> {
        &self.orchestrator
    }

    /// Consume auth notifications until the stream ends, running `load_all`
    /// once per transition into the authenticated state. Repeated
    /// authenticated notifications do not reload.
    pub async fn run(&self, mut states: LocalBoxStream<'_, AuthState>) -> Vec<Summary> {
        let mut authenticated = false;
        let mut runs = Vec::new();

        while let Some(state) = states.next().await {
            if let Some(view) = &self.view {
                view(&state);
            }

            let entering = state.is_authenticated && !authenticated;
            authenticated = state.is_authenticated;

            if entering {
                info!(
                    user = state.user.as_ref().map(|u| u.email.as_str()),
                    "authenticated, loading remotes"
                );
                runs.push(self.orchestrator.load_all().await);
            } else {
                debug!(authenticated, "no orchestration for this auth state");
            }
        }

        runs
    }

    pub async fn run_gate(&self, gate: &dyn AuthGate) -> Vec<Summary> {
        self.run(gate.subscribe()).await
    }
}
