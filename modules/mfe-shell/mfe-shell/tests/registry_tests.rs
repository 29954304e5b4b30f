//! Registry construction from configuration, and reporter wiring.

use std::rc::Rc;

use mfe_shell::config::{Environment, LoaderConfig, ShellConfig};
use mfe_shell::test_support::{
    FakeGlobalScope, RecordingScriptHost, RecordingSurface, ScriptedImporter, StubLoader,
    SurfaceEvent, TokioClock, remote_info,
};
use mfe_shell::{
    FederationTable, MfeOrchestrator, MfeRegistry, RegistryError, RegistryWiring,
    RemoteDescriptor, StatusReporter,
};
use mfe_shell_sdk::{LoaderStrategy, MfeStatus};
use tracing_test::traced_test;

fn wiring(federation: FederationTable, surface: Option<Rc<RecordingSurface>>) -> RegistryWiring {
    RegistryWiring {
        scripts: Rc::new(RecordingScriptHost::new()),
        globals: Rc::new(FakeGlobalScope::new()),
        clock: Rc::new(TokioClock::new()),
        federation,
        reporter: surface.map(|s| Rc::new(StatusReporter::new(s))),
    }
}

fn full_federation() -> FederationTable {
    FederationTable::new()
        .with(Rc::new(ScriptedImporter::mounting("productsMFE/ProductsApp")))
        .with(Rc::new(ScriptedImporter::mounting("cartMFE/CartApp")))
}

#[tokio::test]
async fn test_registry_from_dev_preset() {
    let cfg = ShellConfig::for_environment(Environment::Dev);
    let registry = MfeRegistry::from_config(&cfg, &wiring(full_federation(), None)).unwrap();

    assert_eq!(registry.names(), ["User Profile", "Products", "Cart"]);
    let strategies: Vec<LoaderStrategy> = registry.iter().map(|d| d.loader.strategy()).collect();
    assert_eq!(
        strategies,
        [
            LoaderStrategy::ScriptSequence,
            LoaderStrategy::Federated,
            LoaderStrategy::Federated
        ]
    );
    assert_eq!(registry.get("Cart").unwrap().info.port, Some(3002));
}

#[tokio::test]
async fn test_unknown_federated_module_is_rejected() {
    let cfg = ShellConfig::for_environment(Environment::Dev);
    let federation =
        FederationTable::new().with(Rc::new(ScriptedImporter::mounting("productsMFE/ProductsApp")));

    let err = MfeRegistry::from_config(&cfg, &wiring(federation, None)).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::UnresolvedModule { ref remote, ref module }
            if remote == "Cart" && module == "cartMFE/CartApp"
    ));
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let mut cfg = ShellConfig::for_environment(Environment::Dev);
    cfg.remotes[1].name = cfg.remotes[0].name.clone();

    let err = MfeRegistry::from_config(&cfg, &wiring(full_federation(), None)).unwrap_err();
    assert!(matches!(err, RegistryError::Config(_)));
}

#[test]
fn test_builder_rejects_duplicate_names() {
    let mut builder = MfeRegistry::builder();
    builder
        .register(RemoteDescriptor::new(remote_info("cart"), StubLoader::succeeding()))
        .unwrap();
    let err = builder
        .register(RemoteDescriptor::new(remote_info("cart"), StubLoader::succeeding()))
        .unwrap_err();

    assert!(matches!(err, RegistryError::DuplicateName(ref n) if n == "cart"));
    assert_eq!(builder.build().len(), 1);
}

#[tokio::test]
#[traced_test]
async fn test_empty_allow_list_is_flagged() {
    let mut cfg = ShellConfig::for_environment(Environment::Sit);
    if let LoaderConfig::ScriptSequence {
        allowed_origins, ..
    } = &mut cfg.remotes[0].loader
    {
        allowed_origins.clear();
    }

    MfeRegistry::from_config(&cfg, &wiring(full_federation(), None)).unwrap();

    assert!(logs_contain("empty origin allow-list"));
}

#[tokio::test(start_paused = true)]
async fn test_outcomes_reach_the_presentation_surface() {
    let mut cfg = ShellConfig::for_environment(Environment::Dev);
    // The user-profile bundle never registers its mount function.
    cfg.readiness.timeout_ms = 200;

    let surface = Rc::new(RecordingSurface::with_regions([
        "user-mfe-container",
        "products-container",
    ]));
    let federation = FederationTable::new()
        .with(Rc::new(ScriptedImporter::mounting("productsMFE/ProductsApp")))
        .with(Rc::new(ScriptedImporter::unreachable(
            "cartMFE/CartApp",
            "connection refused",
        )));
    let registry =
        MfeRegistry::from_config(&cfg, &wiring(federation, Some(surface.clone()))).unwrap();
    let orchestrator = MfeOrchestrator::new(registry);

    let summary = orchestrator.load_all().await;

    assert_eq!((summary.loaded, summary.failed), (1, 2));
    assert_eq!(orchestrator.status("Cart"), MfeStatus::Failed);

    let events = surface.events();
    assert!(events.contains(&SurfaceEvent::Success("products-container".to_owned())));
    let panel = events
        .iter()
        .find_map(|e| match e {
            SurfaceEvent::Panel(id, panel) if id == "user-mfe-container" => Some(panel),
            _ => None,
        })
        .unwrap();
    assert_eq!(panel.title, "User Profile MFE Unavailable");
    assert_eq!(panel.port_hint.as_deref(), Some("Expected on port 3003"));
    // cart's region is absent: its panel is silently skipped
    assert_eq!(events.len(), 2);
}
