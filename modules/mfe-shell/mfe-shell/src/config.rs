//! Shell configuration: deployment environment presets, per-remote settings,
//! and validation.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::loaders::script_sequence::{DEFAULT_MOUNT_FUNCTION, DEFAULT_SCRIPTS};
use crate::domain::poll::PollPolicy;

/// Deployment environment the shell was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[serde(alias = "development")]
    Dev,
    Sit,
    Uat,
    #[serde(alias = "production")]
    Prod,
}

impl Environment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Sit => "sit",
            Self::Uat => "uat",
            Self::Prod => "prod",
        }
    }

    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Prod)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Dev),
            "sit" => Ok(Self::Sit),
            "uat" => Ok(Self::Uat),
            "prod" | "production" => Ok(Self::Prod),
            other => Err(ConfigError::UnknownEnvironment(other.to_owned())),
        }
    }
}

/// Configuration errors detected before any remote is loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown environment '{0}' (expected dev, sit, uat or prod)")]
    UnknownEnvironment(String),

    #[error("duplicate remote name '{0}'")]
    DuplicateName(String),

    #[error("container '{container_id}' is used by more than one remote ('{remote}')")]
    SharedContainer {
        container_id: String,
        remote: String,
    },

    #[error("invalid shell URL '{url}': {reason}")]
    InvalidShellUrl { url: String, reason: String },

    #[error("readiness poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("remote '{0}' declares an empty script list")]
    EmptyScriptList(String),

    #[error("remote '{0}' has an empty origin allow-list, which is not permitted in prod")]
    EmptyAllowList(String),
}

/// Readiness poll settings for script-sequence remotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadinessConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_readiness_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            timeout_ms: default_readiness_timeout_ms(),
        }
    }
}

impl ReadinessConfig {
    #[must_use]
    pub const fn policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_millis(self.poll_interval_ms),
            Duration::from_millis(self.timeout_ms),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureFlags {
    #[serde(default)]
    pub debug_mode: bool,
    #[serde(default)]
    pub hot_reload: bool,
}

/// How a remote is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoaderConfig {
    /// Sequential script injection from `url`, guarded by an origin allow-list.
    ScriptSequence {
        #[serde(default = "default_scripts")]
        scripts: Vec<String>,
        #[serde(default = "default_mount_function")]
        mount_function: String,
        #[serde(default)]
        allowed_origins: Vec<String>,
    },
    /// Federation import; `module` must name an importer compiled into the host.
    Federated { module: String },
}

/// One remote entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    pub name: String,
    pub tech: String,
    pub container_id: String,
    pub mount_id: String,
    #[serde(default)]
    pub port: Option<u16>,
    /// Base URL the remote is served from.
    pub url: String,
    pub loader: LoaderConfig,
}

/// Complete shell configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    #[serde(default)]
    pub environment: Environment,
    pub shell_url: String,
    #[serde(default)]
    pub remotes: Vec<RemoteConfig>,
    #[serde(default)]
    pub readiness: ReadinessConfig,
    /// Per-script load timeout for script-sequence remotes; `None` leaves it
    /// to the browser's own network timeout.
    #[serde(default = "default_script_timeout_ms")]
    pub script_timeout_ms: Option<u64>,
    #[serde(default)]
    pub features: FeatureFlags,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Dev)
    }
}

struct EnvironmentHosts {
    shell: &'static str,
    products: &'static str,
    cart: &'static str,
    user: &'static str,
}

const fn hosts(env: Environment) -> EnvironmentHosts {
    match env {
        Environment::Dev => EnvironmentHosts {
            shell: "http://localhost:3000",
            products: "http://localhost:3001",
            cart: "http://localhost:3002",
            user: "http://localhost:3003",
        },
        Environment::Sit => EnvironmentHosts {
            shell: "https://sit.microshop.com",
            products: "https://products-sit.microshop.com",
            cart: "https://cart-sit.microshop.com",
            user: "https://user-sit.microshop.com",
        },
        Environment::Uat => EnvironmentHosts {
            shell: "https://uat.microshop.com",
            products: "https://products-uat.microshop.com",
            cart: "https://cart-uat.microshop.com",
            user: "https://user-uat.microshop.com",
        },
        Environment::Prod => EnvironmentHosts {
            shell: "https://app.microshop.com",
            products: "https://products.microshop.com",
            cart: "https://cart.microshop.com",
            user: "https://user.microshop.com",
        },
    }
}

/// Origins the user-profile bundle may be injected from.
fn user_allowed_origins(env: Environment) -> Vec<String> {
    let origins: &[&str] = if env == Environment::Dev {
        &["http://localhost:3003"]
    } else {
        &[
            "https://user-sit.microshop.com",
            "https://user-uat.microshop.com",
            "https://user.microshop.com",
        ]
    };
    origins.iter().map(|s| (*s).to_owned()).collect()
}

impl ShellConfig {
    /// Preset for `env`: the user-profile (Angular, script sequence),
    /// products (React, federated) and cart (Vue, federated) remotes.
    #[must_use]
    pub fn for_environment(env: Environment) -> Self {
        let hosts = hosts(env);
        let remotes = vec![
            RemoteConfig {
                name: "User Profile".to_owned(),
                tech: "Angular".to_owned(),
                container_id: "user-mfe-container".to_owned(),
                mount_id: "user-mfe".to_owned(),
                port: Some(3003),
                url: hosts.user.to_owned(),
                loader: LoaderConfig::ScriptSequence {
                    scripts: default_scripts(),
                    mount_function: default_mount_function(),
                    allowed_origins: user_allowed_origins(env),
                },
            },
            RemoteConfig {
                name: "Products".to_owned(),
                tech: "React".to_owned(),
                container_id: "products-container".to_owned(),
                mount_id: "products-mfe".to_owned(),
                port: Some(3001),
                url: hosts.products.to_owned(),
                loader: LoaderConfig::Federated {
                    module: "productsMFE/ProductsApp".to_owned(),
                },
            },
            RemoteConfig {
                name: "Cart".to_owned(),
                tech: "Vue".to_owned(),
                container_id: "cart-mfe-container".to_owned(),
                mount_id: "cart-mfe".to_owned(),
                port: Some(3002),
                url: hosts.cart.to_owned(),
                loader: LoaderConfig::Federated {
                    module: "cartMFE/CartApp".to_owned(),
                },
            },
        ];

        let dev = env == Environment::Dev;
        Self {
            environment: env,
            shell_url: hosts.shell.to_owned(),
            remotes,
            readiness: ReadinessConfig::default(),
            script_timeout_ms: default_script_timeout_ms(),
            features: FeatureFlags {
                debug_mode: dev,
                hot_reload: dev,
            },
        }
    }

    #[must_use]
    pub fn script_timeout(&self) -> Option<Duration> {
        self.script_timeout_ms.map(Duration::from_millis)
    }

    #[must_use]
    pub fn remote(&self, name: &str) -> Option<&RemoteConfig> {
        self.remotes.iter().find(|r| r.name == name)
    }

    /// Check invariants that must hold before the registry is built.
    ///
    /// Remote base URLs are deliberately not checked here: a malformed URL
    /// fails only that remote's attempt, at load time.
    ///
    /// # Errors
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.shell_url).map_err(|e| ConfigError::InvalidShellUrl {
            url: self.shell_url.clone(),
            reason: e.to_string(),
        })?;

        if self.readiness.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }

        let mut names = HashSet::new();
        let mut containers = HashSet::new();
        for remote in &self.remotes {
            if !names.insert(remote.name.as_str()) {
                return Err(ConfigError::DuplicateName(remote.name.clone()));
            }
            if !containers.insert(remote.container_id.as_str()) {
                return Err(ConfigError::SharedContainer {
                    container_id: remote.container_id.clone(),
                    remote: remote.name.clone(),
                });
            }
            if let LoaderConfig::ScriptSequence {
                scripts,
                allowed_origins,
                ..
            } = &remote.loader
            {
                if scripts.is_empty() {
                    return Err(ConfigError::EmptyScriptList(remote.name.clone()));
                }
                if allowed_origins.is_empty() && self.environment.is_production() {
                    return Err(ConfigError::EmptyAllowList(remote.name.clone()));
                }
            }
        }

        Ok(())
    }
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_readiness_timeout_ms() -> u64 {
    2000
}

#[allow(clippy::unnecessary_wraps)]
fn default_script_timeout_ms() -> Option<u64> {
    Some(30_000)
}

fn default_scripts() -> Vec<String> {
    DEFAULT_SCRIPTS.iter().map(|s| (*s).to_owned()).collect()
}

fn default_mount_function() -> String {
    DEFAULT_MOUNT_FUNCTION.to_owned()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn presets_validate_for_every_environment() {
        for env in [
            Environment::Dev,
            Environment::Sit,
            Environment::Uat,
            Environment::Prod,
        ] {
            let cfg = ShellConfig::for_environment(env);
            assert_eq!(cfg.environment, env);
            assert_eq!(cfg.remotes.len(), 3);
            cfg.validate().unwrap();
        }
    }

    #[test]
    fn dev_preset_points_at_localhost() {
        let cfg = ShellConfig::for_environment(Environment::Dev);
        let user = cfg.remote("User Profile").unwrap();
        assert_eq!(user.url, "http://localhost:3003");
        match &user.loader {
            LoaderConfig::ScriptSequence {
                scripts,
                mount_function,
                allowed_origins,
            } => {
                assert_eq!(
                    scripts,
                    &["runtime.js", "polyfills.js", "vendor.js", "main.js"]
                );
                assert_eq!(mount_function, "mountUserMFE");
                assert_eq!(allowed_origins, &["http://localhost:3003"]);
            }
            LoaderConfig::Federated { .. } => panic!("user profile must be a script sequence"),
        }
        assert!(cfg.features.debug_mode);
    }

    #[test]
    fn prod_preset_allows_only_user_hosts() {
        let cfg = ShellConfig::for_environment(Environment::Prod);
        let user = cfg.remote("User Profile").unwrap();
        assert_eq!(user.url, "https://user.microshop.com");
        let LoaderConfig::ScriptSequence {
            allowed_origins, ..
        } = &user.loader
        else {
            panic!("user profile must be a script sequence");
        };
        assert!(allowed_origins.contains(&"https://user.microshop.com".to_owned()));
        assert!(!cfg.features.debug_mode);
    }

    #[test]
    fn environment_parses_aliases() {
        assert_eq!("production".parse::<Environment>().unwrap(), Environment::Prod);
        assert_eq!(" SIT ".parse::<Environment>().unwrap(), Environment::Sit);
        assert_eq!("development".parse::<Environment>().unwrap(), Environment::Dev);
        assert!(matches!(
            "staging".parse::<Environment>(),
            Err(ConfigError::UnknownEnvironment(_))
        ));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut cfg = ShellConfig::for_environment(Environment::Dev);
        let mut dup = cfg.remotes[1].clone();
        dup.container_id = "other-container".to_owned();
        cfg.remotes.push(dup);

        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DuplicateName("Products".to_owned()))
        );
    }

    #[test]
    fn shared_containers_are_rejected() {
        let mut cfg = ShellConfig::for_environment(Environment::Dev);
        cfg.remotes[2].container_id = cfg.remotes[1].container_id.clone();

        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::SharedContainer { .. })
        ));
    }

    #[test]
    fn empty_allow_list_is_rejected_only_in_prod() {
        let mut cfg = ShellConfig::for_environment(Environment::Uat);
        if let LoaderConfig::ScriptSequence {
            allowed_origins, ..
        } = &mut cfg.remotes[0].loader
        {
            allowed_origins.clear();
        }
        cfg.validate().unwrap();

        cfg.environment = Environment::Prod;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::EmptyAllowList("User Profile".to_owned()))
        );
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let mut cfg = ShellConfig::default();
        cfg.readiness.poll_interval_ms = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroPollInterval));
    }

    #[test]
    fn loader_config_deserializes_with_defaults() {
        let json = serde_json::json!({
            "name": "User Profile",
            "tech": "Angular",
            "container_id": "user-mfe-container",
            "mount_id": "user-mfe",
            "url": "https://user.example.com",
            "loader": { "kind": "script_sequence" }
        });
        let remote: RemoteConfig = serde_json::from_value(json).unwrap();
        assert_eq!(remote.port, None);
        let LoaderConfig::ScriptSequence {
            scripts,
            mount_function,
            allowed_origins,
        } = remote.loader
        else {
            panic!("expected script sequence");
        };
        assert_eq!(scripts.len(), 4);
        assert_eq!(mount_function, "mountUserMFE");
        assert!(allowed_origins.is_empty());
    }

    #[test]
    fn script_timeout_can_be_disabled() {
        let json = serde_json::json!({
            "shell_url": "http://localhost:3000",
            "script_timeout_ms": null
        });
        let cfg: ShellConfig = serde_json::from_value(json).unwrap();
        assert_eq!(cfg.script_timeout(), None);
        assert!(cfg.remotes.is_empty());

        let cfg: ShellConfig =
            serde_json::from_value(serde_json::json!({ "shell_url": "http://localhost:3000" }))
                .unwrap();
        assert_eq!(cfg.script_timeout(), Some(Duration::from_secs(30)));
    }
}
