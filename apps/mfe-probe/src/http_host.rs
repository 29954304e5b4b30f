//! HTTP-backed host bindings.
//!
//! A script "injection" is an HTTP GET of the script URL. Fetched bundles are
//! kept in a shared cache; a global function counts as registered once any
//! fetched bundle declares it. Federated remotes are checked through their
//! `remoteEntry.js`.

use std::rc::Rc;
use std::time::Duration;

use mfe_shell::FederationTable;
use mfe_shell::config::{LoaderConfig, ShellConfig};
use mfe_shell_sdk::{
    GlobalCallError, GlobalScope, LoadError, ModuleImporter, RemoteModule, ScriptFailure,
    ScriptHost, ScriptTag,
};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::config::ProbeConfig;

/// Federation entry file served by every federated remote.
pub const REMOTE_ENTRY: &str = "remoteEntry.js";

/// Build the HTTP client shared by every host binding.
///
/// # Errors
/// Returns an error if the client cannot be constructed.
pub fn http_client(config: &ProbeConfig) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .connect_timeout(Duration::from_secs(5))
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {e}"))?;

    debug!(
        timeout_secs = config.request_timeout_secs,
        user_agent = %config.user_agent,
        "created probe HTTP client"
    );
    Ok(client)
}

async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String, String> {
    let response = client.get(url).send().await.map_err(|e| e.to_string())?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {status}"));
    }
    response.text().await.map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Scripts and globals
// ---------------------------------------------------------------------------

/// Bodies of every script fetched so far, in fetch order.
#[derive(Debug, Default)]
pub struct BundleCache {
    bundles: Mutex<Vec<(String, String)>>,
}

impl BundleCache {
    fn store(&self, src: &str, body: String) {
        self.bundles.lock().push((src.to_owned(), body));
    }

    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.bundles.lock().iter().any(|(_, body)| body.contains(name))
    }

    #[must_use]
    pub fn fetched(&self) -> Vec<String> {
        self.bundles.lock().iter().map(|(src, _)| src.clone()).collect()
    }
}

pub struct HttpScriptHost {
    client: reqwest::Client,
    cache: Rc<BundleCache>,
}

impl HttpScriptHost {
    #[must_use]
    pub fn new(client: reqwest::Client, cache: Rc<BundleCache>) -> Self {
        Self { client, cache }
    }
}

#[async_trait::async_trait(?Send)]
impl ScriptHost for HttpScriptHost {
    async fn inject(&self, tag: &ScriptTag) -> Result<(), ScriptFailure> {
        let body = fetch_text(&self.client, &tag.src)
            .await
            .map_err(|reason| ScriptFailure::new(tag.src.clone(), reason))?;
        debug!(src = %tag.src, bytes = body.len(), "script fetched");
        self.cache.store(&tag.src, body);
        Ok(())
    }
}

/// Global scope whose functions are the names declared by fetched bundles.
///
/// Calls never execute anything: a declared function "succeeds".
pub struct BundleGlobalScope {
    cache: Rc<BundleCache>,
}

impl BundleGlobalScope {
    #[must_use]
    pub fn new(cache: Rc<BundleCache>) -> Self {
        Self { cache }
    }
}

impl GlobalScope for BundleGlobalScope {
    fn has_function(&self, name: &str) -> bool {
        self.cache.declares(name)
    }

    fn call_function(&self, name: &str, arg: &str) -> Result<(), GlobalCallError> {
        if !self.cache.declares(name) {
            return Err(GlobalCallError::Missing(name.to_owned()));
        }
        info!(function = name, mount_id = arg, "mount entry point declared");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Federation
// ---------------------------------------------------------------------------

/// Checks a federated remote by fetching its remote entry.
pub struct HttpFederationImporter {
    specifier: String,
    entry_url: String,
    client: reqwest::Client,
}

impl HttpFederationImporter {
    #[must_use]
    pub fn new(specifier: impl Into<String>, base_url: &str, client: reqwest::Client) -> Self {
        Self {
            specifier: specifier.into(),
            entry_url: format!("{}/{REMOTE_ENTRY}", base_url.trim_end_matches('/')),
            client,
        }
    }

    #[must_use]
    pub fn entry_url(&self) -> &str {
        &self.entry_url
    }

    /// Exposed module key, e.g. `ProductsApp` for `productsMFE/ProductsApp`.
    fn exposed_key(&self) -> &str {
        self.specifier
            .split_once('/')
            .map_or(self.specifier.as_str(), |(_, exposed)| exposed)
    }
}

#[async_trait::async_trait(?Send)]
impl ModuleImporter for HttpFederationImporter {
    fn specifier(&self) -> &str {
        &self.specifier
    }

    async fn import(&self) -> Result<Box<dyn RemoteModule>, LoadError> {
        let entry = fetch_text(&self.client, &self.entry_url)
            .await
            .map_err(|reason| LoadError::Import {
                module: self.specifier.clone(),
                reason: format!("{}: {reason}", self.entry_url),
            })?;

        if !entry.contains(self.exposed_key()) {
            return Err(LoadError::Import {
                module: self.specifier.clone(),
                reason: format!("{} does not expose '{}'", self.entry_url, self.exposed_key()),
            });
        }

        debug!(module = %self.specifier, url = %self.entry_url, "remote entry fetched");
        Ok(Box::new(EntryModule {
            specifier: self.specifier.clone(),
            has_mount: entry.contains("mount"),
        }))
    }
}

struct EntryModule {
    specifier: String,
    has_mount: bool,
}

impl RemoteModule for EntryModule {
    fn exposed_as(&self) -> &str {
        &self.specifier
    }

    fn mount(&self, _mount_id: &str) -> Option<Result<(), String>> {
        self.has_mount.then_some(Ok(()))
    }
}

/// One HTTP importer per federated remote in `config`.
#[must_use]
pub fn federation_table(config: &ShellConfig, client: &reqwest::Client) -> FederationTable {
    let mut table = FederationTable::new();
    for remote in &config.remotes {
        if let LoaderConfig::Federated { module } = &remote.loader {
            table.insert(Rc::new(HttpFederationImporter::new(
                module.as_str(),
                &remote.url,
                client.clone(),
            )));
        }
    }
    table
}
