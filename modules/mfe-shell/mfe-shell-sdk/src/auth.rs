use futures_util::stream::LocalBoxStream;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Normalized user profile, identical in shape for every provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
    /// Lower-cased provider name.
    pub provider: String,
}

/// Notification published by an authentication gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<UserProfile>,
}

impl AuthState {
    #[must_use]
    pub const fn signed_out() -> Self {
        Self {
            is_authenticated: false,
            user: None,
        }
    }

    #[must_use]
    pub const fn signed_in(user: UserProfile) -> Self {
        Self {
            is_authenticated: true,
            user: Some(user),
        }
    }
}

/// Upstream gate the shell waits on before orchestrating remotes.
pub trait AuthGate {
    /// Subscribe to authentication changes. The stream yields the current
    /// state first, then every subsequent change.
    fn subscribe(&self) -> LocalBoxStream<'static, AuthState>;
}

/// A login mechanism (demo, OAuth SDKs, ...).
#[async_trait::async_trait(?Send)]
pub trait AuthProvider {
    /// Display name, also the registry key (case-insensitive).
    fn name(&self) -> &str;

    fn is_configured(&self) -> bool;

    /// Prepare the provider (load SDKs, ...).
    ///
    /// # Errors
    /// Returns `AuthError` if the provider cannot be made ready.
    async fn initialize(&self) -> Result<(), AuthError>;

    /// Run the login flow.
    ///
    /// # Errors
    /// Returns `AuthError::LoginFailed` if the user could not be signed in.
    async fn login(&self) -> Result<UserProfile, AuthError>;

    /// Run the provider-side logout.
    ///
    /// # Errors
    /// Returns `AuthError` if the provider-side logout fails.
    async fn logout(&self) -> Result<(), AuthError>;
}

/// Per-tab storage of the signed-in user.
pub trait SessionStore {
    /// # Errors
    /// Returns `AuthError::Session` if the storage backend is unavailable.
    fn load(&self, key: &str) -> Result<Option<String>, AuthError>;

    /// # Errors
    /// Returns `AuthError::Session` if the storage backend rejects the write.
    fn save(&self, key: &str, value: &str) -> Result<(), AuthError>;

    /// # Errors
    /// Returns `AuthError::Session` if the storage backend is unavailable.
    fn clear(&self, key: &str) -> Result<(), AuthError>;
}
