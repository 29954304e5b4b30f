//! Federated-module loader: one build-time-resolved import plus the module's
//! own `mount` export. No origin check; trust comes from the federation
//! configuration the host was compiled with.

use std::rc::Rc;

use mfe_shell_sdk::{LoadError, LoadedModule, LoaderStrategy, MfeLoader, ModuleImporter};
use tracing::info;

pub struct FederatedModuleLoader {
    importer: Rc<dyn ModuleImporter>,
    mount_id: String,
}

impl FederatedModuleLoader {
    #[must_use]
    pub fn new(importer: Rc<dyn ModuleImporter>, mount_id: impl Into<String>) -> Self {
        Self {
            importer,
            mount_id: mount_id.into(),
        }
    }

    #[must_use]
    pub fn specifier(&self) -> &str {
        self.importer.specifier()
    }

    #[must_use]
    pub fn mount_id(&self) -> &str {
        &self.mount_id
    }
}

#[async_trait::async_trait(?Send)]
impl MfeLoader for FederatedModuleLoader {
    fn strategy(&self) -> LoaderStrategy {
        LoaderStrategy::Federated
    }

    async fn load(&self) -> Result<LoadedModule, LoadError> {
        // Import failures propagate untouched.
        let module = self.importer.import().await?;
        Ok(LoadedModule::Remote(module))
    }

    async fn mount(&self, module: LoadedModule) -> Result<(), LoadError> {
        let LoadedModule::Remote(module) = module else {
            return Err(LoadError::ContractViolation {
                module: self.specifier().to_owned(),
                missing: "module object".to_owned(),
            });
        };

        match module.mount(&self.mount_id) {
            None => Err(LoadError::ContractViolation {
                module: module.exposed_as().to_owned(),
                missing: "mount".to_owned(),
            }),
            Some(Err(reason)) => Err(LoadError::MountFailed { reason }),
            Some(Ok(())) => {
                info!(module = module.exposed_as(), mount_id = %self.mount_id, "mounted");
                Ok(())
            }
        }
    }
}
