//! Host boundary traits.
//!
//! Everything the core needs from the page (script tags, the shared global
//! namespace, timers, presentation regions) is reached through these traits.
//! The browser binds them to the DOM; tests and the native probe bind them to
//! fakes or HTTP.

use std::time::Duration;

use crate::error::{GlobalCallError, ScriptFailure, SurfaceError};

// ---------------------------------------------------------------------------
// Script injection
// ---------------------------------------------------------------------------

/// CORS mode of an injected script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrossOrigin {
    #[default]
    Anonymous,
    UseCredentials,
}

impl CrossOrigin {
    #[must_use]
    pub const fn as_attr(self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::UseCredentials => "use-credentials",
        }
    }
}

/// A script element to inject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTag {
    pub src: String,
    pub defer: bool,
    pub cross_origin: CrossOrigin,
}

impl ScriptTag {
    /// Deferred, `crossorigin="anonymous"` script.
    #[must_use]
    pub fn deferred(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            defer: true,
            cross_origin: CrossOrigin::Anonymous,
        }
    }
}

/// Injects script elements into the document.
#[async_trait::async_trait(?Send)]
pub trait ScriptHost {
    /// Inject `tag` and resolve once that specific script has loaded.
    ///
    /// # Errors
    /// Returns `ScriptFailure` if the script's error event fires or the tag
    /// cannot be created.
    async fn inject(&self, tag: &ScriptTag) -> Result<(), ScriptFailure>;
}

// ---------------------------------------------------------------------------
// Shared global namespace
// ---------------------------------------------------------------------------

/// Read/call access to functions registered on the page's global object by
/// remote bundles. The core never writes to it.
pub trait GlobalScope {
    fn has_function(&self, name: &str) -> bool;

    /// Call global function `name` with a single string argument.
    ///
    /// # Errors
    /// Returns `GlobalCallError::Missing` if `name` is not a function and
    /// `GlobalCallError::Threw` if the call raised.
    fn call_function(&self, name: &str, arg: &str) -> Result<(), GlobalCallError>;
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Monotonic clock plus timer-based suspension.
#[async_trait::async_trait(?Send)]
pub trait Clock {
    /// Time elapsed since an arbitrary fixed point.
    fn elapsed(&self) -> Duration;

    /// Suspend for `duration`.
    async fn sleep(&self, duration: Duration);
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// Whether a presentation region was present when it was updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionState {
    Applied,
    Absent,
}

/// Content of the inline diagnostic panel shown for a failed remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticPanel {
    pub title: String,
    pub description: String,
    /// Expected development port line, when the port is known.
    pub port_hint: Option<String>,
    pub remediation: Vec<String>,
    pub footnote: String,
}

/// Presentation regions identified by container id.
pub trait PresentationSurface {
    /// Apply the success treatment to the region's header.
    ///
    /// # Errors
    /// Returns `SurfaceError` if the region exists but could not be updated.
    fn apply_success(&self, container_id: &str) -> Result<RegionState, SurfaceError>;

    /// Replace the region's content area with `panel`.
    ///
    /// # Errors
    /// Returns `SurfaceError` if the region exists but could not be updated.
    fn show_panel(
        &self,
        container_id: &str,
        panel: &DiagnosticPanel,
    ) -> Result<RegionState, SurfaceError>;
}
