//! Error types for MFE loading

use std::time::Duration;

/// Failure of a single remote's load or mount attempt.
///
/// Every variant is fatal to the attempt it occurred in and to nothing else:
/// the orchestrator records it against the failing remote and moves on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The configured base URL is not a well-formed absolute URL.
    #[error("invalid MFE base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The base URL's origin is not in the configured allow-list.
    #[error("untrusted origin: {origin} (allowed: {})", .allowed.join(", "))]
    UntrustedOrigin {
        origin: String,
        allowed: Vec<String>,
    },

    /// A script in the sequence failed to load; later scripts were not attempted.
    #[error("failed to load {script}: {reason}")]
    ScriptLoad { script: String, reason: String },

    /// A script in the sequence did not report loaded within the per-script timeout.
    #[error("timed out after {waited:?} loading {script}")]
    ScriptTimeout { script: String, waited: Duration },

    /// All scripts loaded but the global mount function never appeared.
    #[error("'{mount_function}' was not registered within {waited:?}")]
    InitializationTimeout {
        mount_function: String,
        waited: Duration,
    },

    /// The global mount function is not present at mount time.
    #[error("mount function '{mount_function}' not available")]
    MountUnavailable { mount_function: String },

    /// The loaded module does not satisfy the MFE contract.
    #[error("module '{module}' does not expose '{missing}'")]
    ContractViolation { module: String, missing: String },

    /// The remote's mount entry point ran and reported a failure.
    #[error("mount failed: {reason}")]
    MountFailed { reason: String },

    /// A federation import failed (remote unreachable, remote entry malformed).
    #[error("failed to import '{module}': {reason}")]
    Import { module: String, reason: String },
}

impl LoadError {
    /// Check if the error was raised by origin validation
    #[must_use]
    pub const fn is_security(&self) -> bool {
        matches!(self, Self::InvalidUrl { .. } | Self::UntrustedOrigin { .. })
    }

    /// Check if the error is a timeout of any kind
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ScriptTimeout { .. } | Self::InitializationTimeout { .. }
        )
    }

    /// Check if the remote loaded but did not honor the mount contract
    #[must_use]
    pub const fn is_contract(&self) -> bool {
        matches!(
            self,
            Self::MountUnavailable { .. } | Self::ContractViolation { .. }
        )
    }

    /// Name of the script that failed, for script-sequence failures
    #[must_use]
    pub fn failed_script(&self) -> Option<&str> {
        match self {
            Self::ScriptLoad { script, .. } | Self::ScriptTimeout { script, .. } => Some(script),
            _ => None,
        }
    }
}

/// Origin validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OriginError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("untrusted origin: {origin}")]
    UntrustedOrigin {
        origin: String,
        allowed: Vec<String>,
    },
}

impl From<OriginError> for LoadError {
    fn from(err: OriginError) -> Self {
        match err {
            OriginError::InvalidUrl { url, reason } => Self::InvalidUrl { url, reason },
            OriginError::UntrustedOrigin { origin, allowed } => {
                Self::UntrustedOrigin { origin, allowed }
            }
        }
    }
}

/// A script element reported an error event (or could not be created).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{src}: {reason}")]
pub struct ScriptFailure {
    pub src: String,
    pub reason: String,
}

impl ScriptFailure {
    #[must_use]
    pub fn new(src: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            reason: reason.into(),
        }
    }
}

/// Calling a function on the shared global namespace failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GlobalCallError {
    #[error("'{0}' is not a function on the global scope")]
    Missing(String),

    #[error("'{name}' threw: {reason}")]
    Threw { name: String, reason: String },
}

/// A presentation region could not be updated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("presentation surface error in '{container_id}': {reason}")]
pub struct SurfaceError {
    pub container_id: String,
    pub reason: String,
}

/// Authentication failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("unknown auth provider: {0}")]
    UnknownProvider(String),

    #[error("auth provider '{0}' is not configured")]
    NotConfigured(String),

    #[error("login with '{provider}' failed: {reason}")]
    LoginFailed { provider: String, reason: String },

    #[error("session storage error: {0}")]
    Session(String),
}
