//! Login gate: provider registry, session persistence, and state fan-out.

pub mod demo;
pub mod service;
pub mod session;

use mfe_shell_sdk::UserProfile;
use serde::Deserialize;

pub use demo::DemoAuthProvider;
pub use service::{AuthService, SESSION_KEY};
pub use session::MemorySessionStore;

/// User data as a provider returns it, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawUserData {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub picture: Option<String>,
}

impl RawUserData {
    /// Profile shape shared by every provider; the provider name is lower-cased.
    #[must_use]
    pub fn normalize(self, provider: &str) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name,
            email: self.email,
            picture: self.picture,
            provider: provider.to_lowercase(),
        }
    }
}
