//! Probe configuration.
//!
//! Loaded in layers: the selected environment's shell preset, then an
//! optional YAML file, then `MFE_PROBE__`-prefixed environment variables.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use mfe_shell::{Environment, ShellConfig};
use serde::{Deserialize, Serialize};
use tracing::Level;

/// Prefix of environment variable overrides, e.g.
/// `MFE_PROBE__PROBE__REQUEST_TIMEOUT_SECS=5` maps to `probe.request_timeout_secs`.
pub const ENV_PREFIX: &str = "MFE_PROBE__";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub shell: ShellConfig,
    #[serde(default = "default_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeConfig {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ProbeConfig {
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("mfe-probe/", env!("CARGO_PKG_VERSION")).to_owned()
}

/// Logging sections keyed by crate name; `default` covers everything else.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    #[serde(default = "level_serde::default", with = "level_serde")]
    pub console_level: Option<Level>,
    /// Log file, relative to the working directory unless absolute.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "level_serde::default", with = "level_serde")]
    pub file_level: Option<Level>,
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

impl Section {
    #[must_use]
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref().filter(|s| !s.is_empty())
    }
}

/// Console at INFO, no log file.
#[must_use]
pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_owned(),
        Section {
            console_level: Some(Level::INFO),
            file: None,
            file_level: Some(Level::DEBUG),
            max_backups: Some(3),
            max_size_mb: Some(50),
        },
    );
    logging
}

mod level_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::Level;

    #[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S>(level: &Option<Level>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(level.map_or("off", |l| l.as_str()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Level>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.to_lowercase().as_str() {
            "trace" => Ok(Some(Level::TRACE)),
            "debug" => Ok(Some(Level::DEBUG)),
            "info" => Ok(Some(Level::INFO)),
            "warn" => Ok(Some(Level::WARN)),
            "error" => Ok(Some(Level::ERROR)),
            "off" | "none" => Ok(None),
            _ => Err(serde::de::Error::custom(format!("invalid level: {s}"))),
        }
    }

    #[allow(clippy::unnecessary_wraps)]
    pub fn default() -> Option<Level> {
        Some(Level::INFO)
    }
}

impl AppConfig {
    #[must_use]
    pub fn for_environment(env: Environment) -> Self {
        Self {
            shell: ShellConfig::for_environment(env),
            logging: default_logging_config(),
            probe: ProbeConfig::default(),
        }
    }

    /// Load configuration: `env` preset → YAML file → environment variables.
    ///
    /// # Errors
    /// Returns an error if the file cannot be parsed, an override has the
    /// wrong shape, or the resulting configuration is invalid.
    pub fn load_layered(config_path: &Path, env: Environment) -> Result<Self> {
        Self::extract(Some(config_path), env)
    }

    /// Load from `config_path` if given, otherwise from the preset and
    /// environment variables only.
    ///
    /// # Errors
    /// Returns an error if `config_path` does not exist or loading fails.
    pub fn load_or_default(config_path: Option<&Path>, env: Environment) -> Result<Self> {
        if let Some(path) = config_path {
            ensure!(
                path.is_file(),
                "config file does not exist: {}",
                path.to_string_lossy()
            );
        }
        Self::extract(config_path, env)
    }

    fn extract(config_path: Option<&Path>, env: Environment) -> Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Serialized, Yaml},
        };

        let mut figment = Figment::new().merge(Serialized::defaults(Self::for_environment(env)));
        if let Some(path) = config_path {
            figment = figment.merge(Yaml::file(path));
        }
        let figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Self = figment
            .extract()
            .context("Failed to extract config from figment")?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        self.shell.validate().context("invalid shell configuration")?;
        ensure!(
            self.probe.request_timeout_secs > 0,
            "probe.request_timeout_secs must be greater than zero"
        );
        Ok(())
    }

    /// Serialize configuration to YAML.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Raise the console level of the `default` section: `-v` debug, `-vv` trace.
    pub fn apply_cli_overrides(&mut self, verbose: u8) {
        if let Some(default_section) = self.logging.get_mut("default") {
            default_section.console_level = match verbose {
                0 => default_section.console_level,
                1 => Some(Level::DEBUG),
                _ => Some(Level::TRACE),
            };
        }
    }

    /// Directory relative log file paths are resolved against.
    ///
    /// # Errors
    /// Returns an error if the working directory cannot be determined.
    pub fn log_base_dir() -> Result<PathBuf> {
        std::env::current_dir().context("Failed to resolve the working directory")
    }
}
