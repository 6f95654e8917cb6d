use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SirenError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub listen_addr: String,
    pub webhook_url: String,
    pub storage_endpoint: String,
    pub console_base_url: String,
    pub batch_ui_base: String,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8090".to_string(),
            webhook_url: String::new(),
            storage_endpoint: "https://storage.googleapis.com".to_string(),
            console_base_url: "https://fivetran.com".to_string(),
            batch_ui_base: "localhost:8080".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut cfg = Self::default();
        let config_path = config_file_path();
        if let Some(file_overrides) = load_file_overrides(&config_path)? {
            apply_overrides(&mut cfg, file_overrides, "config file")?;
        }
        let env_overrides = load_env_overrides();
        apply_overrides(&mut cfg, env_overrides, "environment")?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.webhook_url.is_empty() {
            return Err(SirenError::Config(
                "webhook_url must be set (config file or SIREN_WEBHOOK_URL)".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigOverrides {
    listen_addr: Option<String>,
    webhook_url: Option<String>,
    storage_endpoint: Option<String>,
    console_base_url: Option<String>,
    batch_ui_base: Option<String>,
    request_timeout: Option<String>,
}

fn config_file_path() -> PathBuf {
    if let Ok(path) = env::var("SIREN_CONFIG") {
        return PathBuf::from(path);
    }

    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let config_home = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(home).join(".config"));
    config_home.join("siren/config.toml")
}

fn load_file_overrides(path: &PathBuf) -> Result<Option<ConfigOverrides>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| SirenError::Config(format!("failed reading {}: {e}", path.display())))?;
    let parsed: ConfigOverrides = toml::from_str(&raw)
        .map_err(|e| SirenError::Config(format!("failed parsing {}: {e}", path.display())))?;
    Ok(Some(parsed))
}

fn load_env_overrides() -> ConfigOverrides {
    ConfigOverrides {
        listen_addr: env::var("SIREN_LISTEN_ADDR").ok(),
        webhook_url: env::var("SIREN_WEBHOOK_URL").ok(),
        storage_endpoint: env::var("SIREN_STORAGE_ENDPOINT").ok(),
        console_base_url: env::var("SIREN_CONSOLE_BASE_URL").ok(),
        batch_ui_base: env::var("SIREN_BATCH_UI_BASE").ok(),
        request_timeout: env::var("SIREN_REQUEST_TIMEOUT").ok(),
    }
}

fn apply_overrides(cfg: &mut Config, overrides: ConfigOverrides, source: &str) -> Result<()> {
    if let Some(v) = overrides.listen_addr {
        cfg.listen_addr = v;
    }
    if let Some(v) = overrides.webhook_url {
        cfg.webhook_url = v;
    }
    if let Some(v) = overrides.storage_endpoint {
        cfg.storage_endpoint = v;
    }
    if let Some(v) = overrides.console_base_url {
        cfg.console_base_url = v;
    }
    if let Some(v) = overrides.batch_ui_base {
        cfg.batch_ui_base = v;
    }
    if let Some(v) = overrides.request_timeout {
        cfg.request_timeout = humantime::parse_duration(&v).map_err(|e| {
            SirenError::Config(format!("bad request_timeout in {source}: {e} (value={v})"))
        })?;
    }
    Ok(())
}
