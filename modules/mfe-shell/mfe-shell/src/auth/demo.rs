use mfe_shell_sdk::{AuthError, AuthProvider, UserProfile};
use tracing::info;

use crate::auth::RawUserData;

/// Provider that signs in a fixed demo user without any external service.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoAuthProvider;

impl DemoAuthProvider {
    pub const NAME: &'static str = "Demo";

    fn demo_user() -> RawUserData {
        RawUserData {
            id: "demo-user-123".to_owned(),
            name: "Sarah Chen".to_owned(),
            email: "sarah.chen@example.com".to_owned(),
            picture: Some(
                "https://ui-avatars.com/api/?name=Sarah+Chen&background=667eea&color=fff&size=200"
                    .to_owned(),
            ),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl AuthProvider for DemoAuthProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn initialize(&self) -> Result<(), AuthError> {
        Ok(())
    }

    async fn login(&self) -> Result<UserProfile, AuthError> {
        let user = Self::demo_user().normalize(Self::NAME);
        info!(user = %user.email, "demo login");
        Ok(user)
    }

    async fn logout(&self) -> Result<(), AuthError> {
        info!("demo logout");
        Ok(())
    }
}
