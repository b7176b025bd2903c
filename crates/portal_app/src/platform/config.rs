//! Configuration for portal_app.
//!
//! Read from a RON file (`./portal.ron` unless `--config` names another).
//! Every key is optional; `PORTAL_BASE_URL` overrides the base URL.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context};
use log::LevelFilter;
use portal_engine::{ApiSettings, Endpoints};
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILENAME: &str = "portal.ron";
pub const BASE_URL_ENV: &str = "PORTAL_BASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct ConfigFile {
    base_url: String,
    endpoints: EndpointsFile,
    connect_timeout_ms: u64,
    request_timeout_ms: u64,
    max_body_bytes: u64,
    cookie_store: bool,
    log: LogFile,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let api = ApiSettings::default();
        Self {
            base_url: api.base_url,
            endpoints: EndpointsFile::default(),
            connect_timeout_ms: millis(api.connect_timeout),
            request_timeout_ms: millis(api.request_timeout),
            max_body_bytes: api.max_body_bytes,
            cookie_store: api.cookie_store,
            log: LogFile::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct EndpointsFile {
    matches: String,
    search: String,
    public_listing: String,
    filter_options: String,
    my_applications: String,
    apply: String,
}

impl Default for EndpointsFile {
    fn default() -> Self {
        let Endpoints {
            matches,
            search,
            public_listing,
            filter_options,
            my_applications,
            apply,
        } = Endpoints::default();
        Self {
            matches,
            search,
            public_listing,
            filter_options,
            my_applications,
            apply,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct LogFile {
    destination: LogDestination,
    level: String,
}

impl Default for LogFile {
    fn default() -> Self {
        Self {
            destination: LogDestination::File,
            level: "info".to_string(),
        }
    }
}

/// Settings the binary runs with.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
}

/// Loads configuration from `explicit` or, failing that, from
/// `./portal.ron` if it exists.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    load_with_env(explicit, std::env::var(BASE_URL_ENV).ok())
}

fn load_with_env(explicit: Option<&Path>, base_url_env: Option<String>) -> anyhow::Result<AppConfig> {
    let file = match explicit {
        Some(path) => read_config(path)?,
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILENAME);
            if path.exists() {
                read_config(&path)?
            } else {
                ConfigFile::default()
            }
        }
    };
    let mut config = into_app_config(file)?;
    if let Some(base_url) = base_url_env.filter(|url| !url.trim().is_empty()) {
        config.api.base_url = base_url.trim().to_string();
    }
    Ok(config)
}

fn read_config(path: &Path) -> anyhow::Result<ConfigFile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;
    ron::from_str(&text).with_context(|| format!("invalid config file {}", path.display()))
}

fn into_app_config(file: ConfigFile) -> anyhow::Result<AppConfig> {
    let log_level = portal_logging::parse_level(&file.log.level)
        .ok_or_else(|| anyhow!("unknown log level `{}`", file.log.level))?;
    let endpoints = Endpoints {
        matches: file.endpoints.matches,
        search: file.endpoints.search,
        public_listing: file.endpoints.public_listing,
        filter_options: file.endpoints.filter_options,
        my_applications: file.endpoints.my_applications,
        apply: file.endpoints.apply,
    };
    Ok(AppConfig {
        api: ApiSettings {
            base_url: file.base_url,
            endpoints,
            connect_timeout: Duration::from_millis(file.connect_timeout_ms),
            request_timeout: Duration::from_millis(file.request_timeout_ms),
            max_body_bytes: file.max_body_bytes,
            cookie_store: file.cookie_store,
        },
        log_destination: file.log.destination,
        log_level,
    })
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
