use std::net::SocketAddr;
use std::path::PathBuf;

use invenai_http::DEFAULT_SERVER;
use invenai_openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use serde::Deserialize;

use crate::error::InvError;
use crate::store::{StoreType, default_store_path};

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub model: Option<String>,
    pub openai_base_url: Option<String>,
    pub server: Option<String>,
    pub bind: Option<String>,
    #[serde(default)]
    pub log_json: bool,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub r#type: StoreType,
    pub path: Option<PathBuf>,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("invenai").join("config.toml"))
}

pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };

    let Ok(content) = std::fs::read_to_string(path) else {
        return Config::default();
    };

    toml::from_str(&content).unwrap_or_default()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Default)]
pub struct Overrides {
    pub server: Option<String>,
    pub store_type: Option<StoreType>,
    pub store_path: Option<PathBuf>,
    pub bind: Option<String>,
}

/// Fully resolved settings: CLI, then environment, then config file, then defaults.
#[derive(Debug)]
pub struct Settings {
    pub server: String,
    pub api_key: Option<String>,
    pub model: String,
    pub openai_base_url: String,
    pub bind: String,
    pub log_json: bool,
    pub store_type: StoreType,
    pub store_path: PathBuf,
}

impl Settings {
    pub fn load(overrides: Overrides) -> Self {
        Self::resolve(overrides, |name| std::env::var(name).ok(), load_config())
    }

    pub fn resolve(overrides: Overrides, env: impl Fn(&str) -> Option<String>, config: Config) -> Self {
        let server = non_empty(overrides.server)
            .or_else(|| non_empty(env("INVENAI_SERVER")))
            .or(non_empty(config.server))
            .unwrap_or_else(|| DEFAULT_SERVER.to_string());

        let api_key = non_empty(env("OPENAI_API_KEY")).or(non_empty(config.openai_api_key));

        Self {
            server,
            api_key,
            model: non_empty(config.model).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: non_empty(config.openai_base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            bind: non_empty(overrides.bind)
                .or(non_empty(config.bind))
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            log_json: config.log_json,
            store_type: overrides.store_type.unwrap_or(config.store.r#type),
            store_path: overrides
                .store_path
                .or(config.store.path)
                .unwrap_or_else(default_store_path),
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, InvError> {
        self.bind
            .parse()
            .map_err(|_| InvError::InvalidBind(self.bind.clone()))
    }
}
