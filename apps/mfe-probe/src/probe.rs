use std::rc::Rc;

use anyhow::Context;
use mfe_shell::clock::TokioClock;
use mfe_shell::{MfeOrchestrator, MfeRegistry, RegistryWiring, StatusReporter};
use mfe_shell_sdk::PresentationSurface;
use tracing::info;

use crate::config::AppConfig;
use crate::http_host::{
    BundleCache, BundleGlobalScope, HttpScriptHost, federation_table, http_client,
};
use crate::report::{ProbeReport, RecordedSurface};

/// Run one orchestration pass against the remotes in `config`.
///
/// Must be awaited on a single-threaded runtime: loader futures are not `Send`.
///
/// # Errors
/// Returns an error if the HTTP client or the registry cannot be built.
/// Remote failures are not errors; they are reported in the returned report.
pub async fn run(config: &AppConfig) -> anyhow::Result<ProbeReport> {
    let client = http_client(&config.probe)?;
    let cache = Rc::new(BundleCache::default());
    let surface = Rc::new(RecordedSurface::default());
    let reporter_surface: Rc<dyn PresentationSurface> = surface.clone();

    let wiring = RegistryWiring {
        scripts: Rc::new(HttpScriptHost::new(client.clone(), Rc::clone(&cache))),
        globals: Rc::new(BundleGlobalScope::new(Rc::clone(&cache))),
        clock: Rc::new(TokioClock::new()),
        federation: federation_table(&config.shell, &client),
        reporter: Some(Rc::new(StatusReporter::new(reporter_surface))),
    };
    let registry = MfeRegistry::from_config(&config.shell, &wiring)
        .context("Failed to build the remote registry")?;

    info!(
        environment = %config.shell.environment,
        remotes = ?registry.names(),
        "probing remotes"
    );
    let orchestrator = MfeOrchestrator::new(registry);
    let summary = orchestrator.load_all().await;

    info!(scripts = cache.fetched().len(), "probe finished");
    Ok(ProbeReport::collect(
        config.shell.environment,
        &orchestrator,
        summary,
        surface.updates(),
    ))
}
