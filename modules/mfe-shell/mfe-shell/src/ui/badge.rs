use crate::config::Environment;

/// Environment marker shown in the shell header outside production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentBadge {
    pub label: &'static str,
    /// CSS color.
    pub color: &'static str,
}

impl EnvironmentBadge {
    #[must_use]
    pub const fn for_environment(env: Environment) -> Option<Self> {
        match env {
            Environment::Dev => Some(Self {
                label: "DEV",
                color: "#4CAF50",
            }),
            Environment::Sit => Some(Self {
                label: "SIT",
                color: "#2196F3",
            }),
            Environment::Uat => Some(Self {
                label: "UAT",
                color: "#FF9800",
            }),
            Environment::Prod => None,
        }
    }
}
