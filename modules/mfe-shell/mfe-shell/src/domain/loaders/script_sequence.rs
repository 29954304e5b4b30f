//! Script-sequence loader: ordered script injection followed by a global
//! mount function.
//!
//! ```text
//! Idle -> ValidatingOrigin -> LoadingScript(0..n) -> WaitingReady -> Ready
//!              |                     |                    |
//!              +---------------------+--------------------+--> Failed
//! ```

use std::rc::Rc;
use std::time::Duration;

use futures::future::{Either, select};
use mfe_shell_sdk::{
    Clock, GlobalCallError, GlobalScope, LoadError, LoadedModule, LoaderStrategy, MfeLoader,
    ScriptHost, ScriptTag,
};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::domain::origin::{AllowedOrigins, validate_origin};
use crate::domain::poll::{PollPolicy, poll_until};

/// Bundle files in dependency order: bootstrap, polyfills, vendor, application.
pub const DEFAULT_SCRIPTS: &[&str] = &["runtime.js", "polyfills.js", "vendor.js", "main.js"];

/// Global function the remote registers once its framework has bootstrapped.
pub const DEFAULT_MOUNT_FUNCTION: &str = "mountUserMFE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSequenceConfig {
    pub base_url: String,
    pub mount_id: String,
    pub allowed_origins: AllowedOrigins,
    /// Injected strictly in this order; never reordered or parallelized.
    pub scripts: Vec<String>,
    pub mount_function: String,
    pub readiness: PollPolicy,
    /// `None` waits on each script for as long as the host does.
    pub script_timeout: Option<Duration>,
}

impl ScriptSequenceConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>, mount_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            mount_id: mount_id.into(),
            allowed_origins: AllowedOrigins::default(),
            scripts: DEFAULT_SCRIPTS.iter().map(|s| (*s).to_owned()).collect(),
            mount_function: DEFAULT_MOUNT_FUNCTION.to_owned(),
            readiness: PollPolicy::default(),
            script_timeout: None,
        }
    }

    #[must_use]
    pub fn with_allowed_origins(mut self, allowed: AllowedOrigins) -> Self {
        self.allowed_origins = allowed;
        self
    }

    #[must_use]
    pub fn with_scripts<I, S>(mut self, scripts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scripts = scripts.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_mount_function(mut self, name: impl Into<String>) -> Self {
        self.mount_function = name.into();
        self
    }

    #[must_use]
    pub const fn with_readiness(mut self, policy: PollPolicy) -> Self {
        self.readiness = policy;
        self
    }

    #[must_use]
    pub const fn with_script_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.script_timeout = timeout;
        self
    }

    /// Absolute URL of `file` under the base URL.
    #[must_use]
    pub fn script_url(&self, file: &str) -> String {
        format!("{}/{file}", self.base_url.trim_end_matches('/'))
    }
}

/// Where the most recent `load()` is (or ended).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderPhase {
    Idle,
    ValidatingOrigin,
    /// Waiting on the load event of script `i`.
    LoadingScript(usize),
    WaitingReady,
    Ready,
    Failed,
}

pub struct ScriptSequenceLoader {
    config: ScriptSequenceConfig,
    scripts: Rc<dyn ScriptHost>,
    globals: Rc<dyn GlobalScope>,
    clock: Rc<dyn Clock>,
    phase: Mutex<LoaderPhase>,
}

impl ScriptSequenceLoader {
    #[must_use]
    pub fn new(
        config: ScriptSequenceConfig,
        scripts: Rc<dyn ScriptHost>,
        globals: Rc<dyn GlobalScope>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            scripts,
            globals,
            clock,
            phase: Mutex::new(LoaderPhase::Idle),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ScriptSequenceConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> LoaderPhase {
        *self.phase.lock()
    }

    fn enter(&self, phase: LoaderPhase) {
        *self.phase.lock() = phase;
    }

    fn fail(&self, err: LoadError) -> LoadError {
        self.enter(LoaderPhase::Failed);
        err
    }

    async fn inject(&self, file: &str) -> Result<(), LoadError> {
        let tag = ScriptTag::deferred(self.config.script_url(file));
        debug!(src = %tag.src, "injecting script");

        let injected = self.scripts.inject(&tag);
        let result = match self.config.script_timeout {
            None => injected.await,
            Some(limit) => match select(injected, self.clock.sleep(limit)).await {
                Either::Left((result, _)) => result,
                // The tag stays in the document; a late load event is ignored.
                Either::Right(((), _)) => {
                    return Err(LoadError::ScriptTimeout {
                        script: file.to_owned(),
                        waited: limit,
                    });
                }
            },
        };

        result.map_err(|failure| LoadError::ScriptLoad {
            script: file.to_owned(),
            reason: failure.reason,
        })
    }
}

#[async_trait::async_trait(?Send)]
impl MfeLoader for ScriptSequenceLoader {
    fn strategy(&self) -> LoaderStrategy {
        LoaderStrategy::ScriptSequence
    }

    async fn load(&self) -> Result<LoadedModule, LoadError> {
        let cfg = &self.config;

        self.enter(LoaderPhase::ValidatingOrigin);
        validate_origin(&cfg.base_url, &cfg.allowed_origins)
            .map_err(|e| self.fail(e.into()))?;

        if self.globals.has_function(&cfg.mount_function) {
            debug!(
                mount_function = %cfg.mount_function,
                "mount function already registered, skipping script injection"
            );
            self.enter(LoaderPhase::Ready);
            return Ok(LoadedModule::Placeholder);
        }

        for (index, file) in cfg.scripts.iter().enumerate() {
            self.enter(LoaderPhase::LoadingScript(index));
            if let Err(err) = self.inject(file).await {
                warn!(script = %file, error = %err, "script sequence aborted");
                return Err(self.fail(err));
            }
        }

        self.enter(LoaderPhase::WaitingReady);
        let waited = poll_until(self.clock.as_ref(), cfg.readiness, || {
            self.globals.has_function(&cfg.mount_function)
        })
        .await
        .map_err(|timeout| {
            self.fail(LoadError::InitializationTimeout {
                mount_function: cfg.mount_function.clone(),
                waited: timeout.waited,
            })
        })?;

        debug!(?waited, mount_function = %cfg.mount_function, "remote registered its mount function");
        self.enter(LoaderPhase::Ready);
        Ok(LoadedModule::Placeholder)
    }

    async fn mount(&self, _module: LoadedModule) -> Result<(), LoadError> {
        let cfg = &self.config;
        match self.globals.call_function(&cfg.mount_function, &cfg.mount_id) {
            Ok(()) => {
                info!(mount_id = %cfg.mount_id, "mounted");
                Ok(())
            }
            Err(GlobalCallError::Missing(_)) => Err(LoadError::MountUnavailable {
                mount_function: cfg.mount_function.clone(),
            }),
            Err(GlobalCallError::Threw { reason, .. }) => Err(LoadError::MountFailed { reason }),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn script_url_joins_without_double_slash() {
        let cfg = ScriptSequenceConfig::new("http://localhost:3003/", "user-mfe");
        assert_eq!(cfg.script_url("main.js"), "http://localhost:3003/main.js");

        let cfg = ScriptSequenceConfig::new("https://cdn.example.com/user", "user-mfe");
        assert_eq!(
            cfg.script_url("vendor.js"),
            "https://cdn.example.com/user/vendor.js"
        );
    }

    #[test]
    fn defaults_follow_bundle_dependency_order() {
        let cfg = ScriptSequenceConfig::new("http://localhost:3003", "user-mfe");
        assert_eq!(
            cfg.scripts,
            ["runtime.js", "polyfills.js", "vendor.js", "main.js"]
        );
        assert_eq!(cfg.mount_function, "mountUserMFE");
        assert_eq!(cfg.readiness, PollPolicy::default());
        assert_eq!(cfg.script_timeout, None);
    }
}
