use std::fmt;

use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Loader strategy
// ---------------------------------------------------------------------------

/// How a loader brings a remote into the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoaderStrategy {
    /// Ordered injection of several script tags, then a global mount function.
    ScriptSequence,
    /// A single build-time-resolved federation import.
    Federated,
}

impl fmt::Display for LoaderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScriptSequence => f.write_str("script-sequence"),
            Self::Federated => f.write_str("federated"),
        }
    }
}

/// Capability contract every remote loader implements.
///
/// The orchestrator only ever calls `load` then `mount` on the value `load`
/// returned. Futures are not `Send`: loaders run on the UI thread's event loop.
#[async_trait::async_trait(?Send)]
pub trait MfeLoader {
    /// Strategy tag, for diagnostics only.
    fn strategy(&self) -> LoaderStrategy;

    /// Fetch the remote.
    ///
    /// # Errors
    /// Returns the `LoadError` describing why the remote could not be loaded.
    async fn load(&self) -> Result<LoadedModule, LoadError>;

    /// Attach the loaded remote to its mount point.
    ///
    /// # Errors
    /// Returns `LoadError` if the remote does not expose a usable mount entry
    /// point or the entry point fails.
    async fn mount(&self, module: LoadedModule) -> Result<(), LoadError>;
}

// ---------------------------------------------------------------------------
// Loaded modules
// ---------------------------------------------------------------------------

/// What `MfeLoader::load` hands to `MfeLoader::mount`.
pub enum LoadedModule {
    /// Strategies with no return payload (the remote registered itself globally).
    Placeholder,
    /// An imported module object.
    Remote(Box<dyn RemoteModule>),
}

impl LoadedModule {
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }
}

impl fmt::Debug for LoadedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => f.write_str("Placeholder"),
            Self::Remote(module) => f.debug_tuple("Remote").field(&module.exposed_as()).finish(),
        }
    }
}

/// A module obtained through a federation import.
pub trait RemoteModule {
    /// Federation specifier the module was imported as (e.g. `productsMFE/ProductsApp`).
    fn exposed_as(&self) -> &str;

    /// Invoke the module's exposed `mount` entry point.
    ///
    /// Returns `None` when the module exports no mount entry point at all,
    /// `Some(Err(reason))` when the entry point ran and failed.
    fn mount(&self, mount_id: &str) -> Option<Result<(), String>>;
}

/// One federation import whose target is fixed when the host is compiled.
///
/// Implementations must not build the import target from runtime data; the
/// specifier is an identifier for diagnostics and registry lookup only.
#[async_trait::async_trait(?Send)]
pub trait ModuleImporter {
    /// The statically known import specifier.
    fn specifier(&self) -> &str;

    /// Perform the import.
    ///
    /// # Errors
    /// Returns `LoadError::Import` when the remote is unreachable or its
    /// entry is malformed.
    async fn import(&self) -> Result<Box<dyn RemoteModule>, LoadError>;
}
