//! Authentication service: the shell's [`AuthGate`].

use std::rc::Rc;

use futures::StreamExt;
use futures::channel::mpsc::{UnboundedSender, unbounded};
use futures::stream::LocalBoxStream;
use mfe_shell_sdk::{AuthError, AuthGate, AuthProvider, AuthState, SessionStore, UserProfile};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

/// Session storage key of the signed-in user.
pub const SESSION_KEY: &str = "mfe_user";

pub struct AuthService {
    providers: Vec<Rc<dyn AuthProvider>>,
    session: Rc<dyn SessionStore>,
    state: Mutex<AuthState>,
    listeners: Mutex<Vec<UnboundedSender<AuthState>>>,
}

impl AuthService {
    #[must_use]
    pub fn new(session: Rc<dyn SessionStore>) -> Self {
        Self {
            providers: Vec::new(),
            session,
            state: Mutex::new(AuthState::signed_out()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_provider(mut self, provider: Rc<dyn AuthProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    fn provider(&self, name: &str) -> Option<&Rc<dyn AuthProvider>> {
        self.providers
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    /// Names of providers that are configured for this deployment.
    #[must_use]
    pub fn available_providers(&self) -> Vec<&str> {
        self.providers
            .iter()
            .filter(|p| p.is_configured())
            .map(|p| p.name())
            .collect()
    }

    /// Initialize every configured provider. A provider that fails to
    /// initialize is logged and left out; returns the names that are ready.
    pub async fn initialize_providers(&self) -> Vec<String> {
        let mut ready = Vec::new();
        for provider in &self.providers {
            if !provider.is_configured() {
                debug!(provider = provider.name(), "provider not configured, skipping");
                continue;
            }
            match provider.initialize().await {
                Ok(()) => ready.push(provider.name().to_owned()),
                Err(e) => warn!(provider = provider.name(), error = %e, "provider failed to initialize"),
            }
        }
        info!(providers = ?ready, "auth providers initialized");
        ready
    }

    /// Restore the signed-in user from the session store.
    ///
    /// A stored value that no longer parses is discarded.
    ///
    /// # Errors
    /// Returns `AuthError::Session` if the store is unavailable.
    pub fn restore_session(&self) -> Result<bool, AuthError> {
        let Some(raw) = self.session.load(SESSION_KEY)? else {
            return Ok(false);
        };

        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(user) => {
                info!(user = %user.email, provider = %user.provider, "session restored");
                self.publish(AuthState::signed_in(user));
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "discarding unreadable session");
                self.session.clear(SESSION_KEY)?;
                Ok(false)
            }
        }
    }

    /// Sign in with the provider named `provider` (case-insensitive).
    ///
    /// # Errors
    /// Returns `AuthError::UnknownProvider`, `AuthError::NotConfigured`, the
    /// provider's own login error, or `AuthError::Session` if the user could
    /// not be persisted.
    #[instrument(skip(self))]
    pub async fn login(&self, provider: &str) -> Result<UserProfile, AuthError> {
        let handler = self
            .provider(provider)
            .ok_or_else(|| AuthError::UnknownProvider(provider.to_owned()))?;
        if !handler.is_configured() {
            return Err(AuthError::NotConfigured(handler.name().to_owned()));
        }

        let user = handler.login().await?;
        let json = serde_json::to_string(&user).map_err(|e| AuthError::Session(e.to_string()))?;
        self.session.save(SESSION_KEY, &json)?;

        info!(user = %user.email, "signed in");
        self.publish(AuthState::signed_in(user.clone()));
        Ok(user)
    }

    /// Sign out. A provider-side logout failure is logged; the local session
    /// is cleared regardless.
    ///
    /// # Errors
    /// Returns `AuthError::Session` if the session could not be cleared.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let provider = self.current_user().map(|u| u.provider);
        if let Some(handler) = provider.as_deref().and_then(|p| self.provider(p))
            && let Err(e) = handler.logout().await
        {
            warn!(provider = handler.name(), error = %e, "provider logout failed");
        }

        self.session.clear(SESSION_KEY)?;
        info!("signed out");
        self.publish(AuthState::signed_out());
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.lock().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.lock().is_authenticated
    }

    #[must_use]
    pub fn current_user(&self) -> Option<UserProfile> {
        self.state.lock().user.clone()
    }

    fn publish(&self, state: AuthState) {
        *self.state.lock() = state.clone();
        self.listeners
            .lock()
            .retain(|tx| tx.unbounded_send(state.clone()).is_ok());
    }
}

impl AuthGate for AuthService {
    fn subscribe(&self) -> LocalBoxStream<'static, AuthState> {
        let (tx, rx) = unbounded();
        // Current state first.
        if let Err(e) = tx.unbounded_send(self.state()) {
            debug!(error = %e, "subscriber closed before replay");
        }
        self.listeners.lock().push(tx);
        rx.boxed_local()
    }
}
