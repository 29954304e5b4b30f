//! Remote registry: static descriptors built once at startup.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use mfe_shell_sdk::{
    Clock, GlobalScope, LoadError, LoadOutcome, MfeLoader, ModuleImporter, RemoteInfo, ScriptHost,
};
use tracing::{info, warn};

use crate::config::{ConfigError, LoaderConfig, RemoteConfig, ShellConfig};
use crate::domain::loaders::{FederatedModuleLoader, ScriptSequenceConfig, ScriptSequenceLoader};
use crate::domain::origin::AllowedOrigins;
use crate::ui::reporter::StatusReporter;

pub type SuccessCallback = Box<dyn Fn()>;
pub type ErrorCallback = Box<dyn Fn(&LoadError)>;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("remote '{0}' is already registered")]
    DuplicateName(String),

    #[error("remote '{remote}' uses federated module '{module}', which is not compiled into this host")]
    UnresolvedModule { remote: String, module: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// One remote: identity, loader strategy, and UI callbacks.
pub struct RemoteDescriptor {
    pub info: RemoteInfo,
    pub loader: Box<dyn MfeLoader>,
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
}

impl RemoteDescriptor {
    #[must_use]
    pub fn new(info: RemoteInfo, loader: impl MfeLoader + 'static) -> Self {
        Self::boxed(info, Box::new(loader))
    }

    #[must_use]
    pub fn boxed(info: RemoteInfo, loader: Box<dyn MfeLoader>) -> Self {
        Self {
            info,
            loader,
            on_success: None,
            on_error: None,
        }
    }

    #[must_use]
    pub fn on_success(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_error(mut self, callback: impl Fn(&LoadError) + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Fire the callback matching `outcome`.
    pub(crate) fn notify(&self, outcome: &LoadOutcome) {
        match outcome {
            LoadOutcome::Loaded => {
                if let Some(cb) = &self.on_success {
                    cb();
                }
            }
            LoadOutcome::Failed(err) => {
                if let Some(cb) = &self.on_error {
                    cb(err);
                }
            }
        }
    }
}

impl fmt::Debug for RemoteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteDescriptor")
            .field("info", &self.info)
            .field("strategy", &self.loader.strategy())
            .finish_non_exhaustive()
    }
}

/// Federation importers compiled into the host, keyed by specifier.
#[derive(Default, Clone)]
pub struct FederationTable {
    importers: HashMap<String, Rc<dyn ModuleImporter>>,
}

impl FederationTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, importer: Rc<dyn ModuleImporter>) -> Self {
        self.insert(importer);
        self
    }

    pub fn insert(&mut self, importer: Rc<dyn ModuleImporter>) {
        self.importers
            .insert(importer.specifier().to_owned(), importer);
    }

    #[must_use]
    pub fn resolve(&self, specifier: &str) -> Option<Rc<dyn ModuleImporter>> {
        self.importers.get(specifier).cloned()
    }

    #[must_use]
    pub fn specifiers(&self) -> Vec<&str> {
        let mut specs: Vec<&str> = self.importers.keys().map(String::as_str).collect();
        specs.sort_unstable();
        specs
    }
}

/// Host capabilities the registry hands to the loaders it builds.
pub struct RegistryWiring {
    pub scripts: Rc<dyn ScriptHost>,
    pub globals: Rc<dyn GlobalScope>,
    pub clock: Rc<dyn Clock>,
    pub federation: FederationTable,
    /// When set, every descriptor reports its outcome through it.
    pub reporter: Option<Rc<StatusReporter>>,
}

/// Ordered, immutable set of remotes.
#[derive(Debug, Default)]
pub struct MfeRegistry {
    descriptors: Vec<RemoteDescriptor>,
}

impl MfeRegistry {
    #[must_use]
    pub fn builder() -> MfeRegistryBuilder {
        MfeRegistryBuilder::default()
    }

    /// Build the registry described by `config`.
    ///
    /// # Errors
    /// Returns `RegistryError::Config` if the configuration is invalid and
    /// `RegistryError::UnresolvedModule` if a federated remote names a module
    /// the host was not compiled with.
    pub fn from_config(config: &ShellConfig, wiring: &RegistryWiring) -> Result<Self, RegistryError> {
        config.validate()?;

        let mut builder = Self::builder();
        for remote in &config.remotes {
            builder.register(Self::descriptor_for(config, remote, wiring)?)?;
        }

        let registry = builder.build();
        info!(
            environment = %config.environment,
            remotes = registry.len(),
            "remote registry initialized"
        );
        Ok(registry)
    }

    fn descriptor_for(
        config: &ShellConfig,
        remote: &RemoteConfig,
        wiring: &RegistryWiring,
    ) -> Result<RemoteDescriptor, RegistryError> {
        let info = RemoteInfo {
            name: remote.name.clone(),
            tech: remote.tech.clone(),
            container_id: remote.container_id.clone(),
            mount_id: remote.mount_id.clone(),
            port: remote.port,
        };

        let loader: Box<dyn MfeLoader> = match &remote.loader {
            LoaderConfig::ScriptSequence {
                scripts,
                mount_function,
                allowed_origins,
            } => {
                if allowed_origins.is_empty() {
                    warn!(
                        remote = %remote.name,
                        url = %remote.url,
                        "empty origin allow-list: scripts will be injected without an origin check"
                    );
                }
                let cfg = ScriptSequenceConfig::new(&remote.url, &remote.mount_id)
                    .with_allowed_origins(AllowedOrigins::new(allowed_origins.iter().cloned()))
                    .with_scripts(scripts.iter().cloned())
                    .with_mount_function(mount_function.clone())
                    .with_readiness(config.readiness.policy())
                    .with_script_timeout(config.script_timeout());
                Box::new(ScriptSequenceLoader::new(
                    cfg,
                    Rc::clone(&wiring.scripts),
                    Rc::clone(&wiring.globals),
                    Rc::clone(&wiring.clock),
                ))
            }
            LoaderConfig::Federated { module } => {
                let importer = wiring.federation.resolve(module).ok_or_else(|| {
                    RegistryError::UnresolvedModule {
                        remote: remote.name.clone(),
                        module: module.clone(),
                    }
                })?;
                Box::new(FederatedModuleLoader::new(importer, &remote.mount_id))
            }
        };

        let mut descriptor = RemoteDescriptor::boxed(info, loader);
        if let Some(reporter) = &wiring.reporter {
            let on_success = Rc::clone(reporter);
            let container = remote.container_id.clone();
            descriptor = descriptor.on_success(move || on_success.show_success(&container));

            let on_error = Rc::clone(reporter);
            let info = descriptor.info.clone();
            descriptor = descriptor.on_error(move |_| {
                on_error.show_error(&info.container_id, &info.name, &info.tech, info.port);
            });
        }
        Ok(descriptor)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RemoteDescriptor> {
        self.descriptors.iter()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RemoteDescriptor> {
        self.descriptors.iter().find(|d| d.name() == name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.descriptors.iter().map(RemoteDescriptor::name).collect()
    }
}

#[derive(Debug, Default)]
pub struct MfeRegistryBuilder {
    descriptors: Vec<RemoteDescriptor>,
    names: HashSet<String>,
}

impl MfeRegistryBuilder {
    /// Append `descriptor`; registration order is preserved.
    ///
    /// # Errors
    /// Returns `RegistryError::DuplicateName` if a remote with the same name
    /// is already registered.
    pub fn register(&mut self, descriptor: RemoteDescriptor) -> Result<&mut Self, RegistryError> {
        if !self.names.insert(descriptor.info.name.clone()) {
            return Err(RegistryError::DuplicateName(descriptor.info.name));
        }
        self.descriptors.push(descriptor);
        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> MfeRegistry {
        MfeRegistry {
            descriptors: self.descriptors,
        }
    }
}
