//! Layered configuration.
//!
//! Later layers override earlier ones:
//! 1. built-in defaults,
//! 2. `config.toml`, `config.yaml` or `config.json` from the platform config
//!    directory, or a single file given explicitly,
//! 3. environment variables prefixed `MAGVIEW_`, with `__` separating nested
//!    keys (`MAGVIEW_API__BASE_URL`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "MAGVIEW_";
const FILE_STEM: &str = "config";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme, host and optional path prefix of the search service.
    pub base_url: String,
    pub timeout_secs: u64,
    /// Results per page; the service's own default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}
impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 10,
            page_size: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default `tracing` filter directive, used when `RUST_LOG` is unset.
    pub level: String,
}
impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Where the file layer comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Exactly this file, which must exist. Format follows the extension.
    File(PathBuf),
    /// Any of `config.{toml,yaml,json}` found in this directory.
    Directory(PathBuf),
    /// Defaults and environment only.
    None,
}
impl Source {
    /// The platform configuration directory (e.g. `~/.config/magview`).
    pub fn platform() -> Self {
        match ProjectDirs::from("", "", "magview") {
            Some(dirs) => Self::Directory(dirs.config_dir().to_path_buf()),
            None => Self::None,
        }
    }
}

impl Config {
    /// Load from `explicit` if given, otherwise from the platform directory.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let source = match explicit {
            Some(path) => Source::File(path.to_path_buf()),
            None => Source::platform(),
        };
        Self::load_from(&source)
    }

    pub fn load_from(source: &Source) -> Result<Self> {
        let config: Self = Self::figment(source)?.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    fn figment(source: &Source) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        match source {
            Source::File(path) => {
                if !path.is_file() {
                    exn::bail!(ErrorKind::Invalid(format!("config file {} does not exist", path.display())));
                }
                tracing::debug!(path = %path.display(), "Loading configuration file");
                figment = match path.extension().and_then(|ext| ext.to_str()) {
                    Some("toml") => figment.merge(Toml::file(path)),
                    Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                    Some("json") => figment.merge(Json::file(path)),
                    _ => exn::bail!(ErrorKind::Invalid(format!(
                        "unrecognised config file format: {}",
                        path.display()
                    ))),
                };
            },
            Source::Directory(dir) => {
                tracing::debug!(dir = %dir.display(), "Looking for configuration files");
                figment = figment
                    .merge(Toml::file(dir.join(format!("{FILE_STEM}.toml"))))
                    .merge(Yaml::file(dir.join(format!("{FILE_STEM}.yaml"))))
                    .merge(Json::file(dir.join(format!("{FILE_STEM}.json"))));
            },
            Source::None => {},
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    pub fn validate(&self) -> Result<()> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            exn::bail!(ErrorKind::Invalid("api.base_url must not be empty".to_string()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            exn::bail!(ErrorKind::Invalid(format!("api.base_url must be an http(s) URL: {base_url}")));
        }
        if self.api.timeout_secs == 0 {
            exn::bail!(ErrorKind::Invalid("api.timeout_secs must be positive".to_string()));
        }
        if self.api.page_size == Some(0) {
            exn::bail!(ErrorKind::Invalid("api.page_size must be positive".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}
