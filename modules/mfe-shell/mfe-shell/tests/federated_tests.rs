//! Federated-module loader behavior.

use std::rc::Rc;

use mfe_shell::domain::loaders::FederatedModuleLoader;
use mfe_shell::test_support::ScriptedImporter;
use mfe_shell_sdk::{LoadError, LoadedModule, LoaderStrategy, MfeLoader};

#[tokio::test]
async fn test_import_then_mount_calls_module_export() {
    let importer = Rc::new(ScriptedImporter::mounting("productsMFE/ProductsApp"));
    let loader = FederatedModuleLoader::new(importer.clone(), "products-mfe");

    assert_eq!(loader.strategy(), LoaderStrategy::Federated);
    let module = loader.load().await.unwrap();
    assert!(!module.is_placeholder());
    loader.mount(module).await.unwrap();

    assert_eq!(importer.imports(), 1);
    assert_eq!(importer.mounted_ids(), ["products-mfe"]);
}

#[tokio::test]
async fn test_import_failure_propagates_unchanged() {
    let importer = Rc::new(ScriptedImporter::unreachable(
        "cartMFE/CartApp",
        "Loading script failed: http://localhost:3002/remoteEntry.js",
    ));
    let loader = FederatedModuleLoader::new(importer, "cart-mfe");

    let err = loader.load().await.unwrap_err();
    assert_eq!(
        err,
        LoadError::Import {
            module: "cartMFE/CartApp".to_owned(),
            reason: "Loading script failed: http://localhost:3002/remoteEntry.js".to_owned(),
        }
    );
}

#[tokio::test]
async fn test_module_without_mount_violates_contract() {
    let loader = FederatedModuleLoader::new(
        Rc::new(ScriptedImporter::without_mount("cartMFE/CartApp")),
        "cart-mfe",
    );

    let module = loader.load().await.unwrap();
    let err = loader.mount(module).await.unwrap_err();
    assert_eq!(
        err,
        LoadError::ContractViolation {
            module: "cartMFE/CartApp".to_owned(),
            missing: "mount".to_owned(),
        }
    );
}

#[tokio::test]
async fn test_placeholder_violates_contract() {
    let loader = FederatedModuleLoader::new(
        Rc::new(ScriptedImporter::mounting("cartMFE/CartApp")),
        "cart-mfe",
    );

    let err = loader.mount(LoadedModule::Placeholder).await.unwrap_err();
    assert!(err.is_contract());
}

#[tokio::test]
async fn test_mount_error_is_reported() {
    let loader = FederatedModuleLoader::new(
        Rc::new(ScriptedImporter::failing_mount(
            "productsMFE/ProductsApp",
            "#products-mfe not found",
        )),
        "products-mfe",
    );

    let module = loader.load().await.unwrap();
    let err = loader.mount(module).await.unwrap_err();
    assert_eq!(
        err,
        LoadError::MountFailed {
            reason: "#products-mfe not found".to_owned(),
        }
    );
}
