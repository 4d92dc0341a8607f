use crate::models::Category;
use reqwest::Url;
use secrecy::SecretString;
use serde::Deserialize;
use std::{
    env,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::fs;

const CONFIG_ENV: &str = "IPR_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "ipr-config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("missing configuration value `{0}`")]
    Missing(&'static str),
    #[error("configuration value `{key}` is not a valid URL: {reason}")]
    InvalidUrl { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub individual: Url,
    pub offtaker: Url,
}

#[derive(Debug)]
pub struct AppConfig {
    pub endpoints: Endpoints,
    pub api_key: SecretString,
    pub login_password: SecretString,
}

#[derive(Deserialize)]
struct RawConfig {
    endpoint_url: Option<RawEndpoints>,
    api_key: Option<RawApiKey>,
    login: Option<RawLogin>,
}

#[derive(Deserialize)]
struct RawEndpoints {
    url_individual: Option<String>,
    url_offtaker: Option<String>,
}

#[derive(Deserialize)]
struct RawApiKey {
    ipr_api_key: Option<String>,
}

#[derive(Deserialize)]
struct RawLogin {
    login_password: Option<String>,
}

impl AppConfig {
    pub async fn load() -> Result<Self, ConfigError> {
        let path = resolve_config_path();
        Self::from_path(&path).await
    }

    pub async fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(contents)?;

        let (individual, offtaker) = match raw.endpoint_url {
            Some(endpoints) => (endpoints.url_individual, endpoints.url_offtaker),
            None => (None, None),
        };
        let individual = required("endpoint_url.url_individual", individual)?;
        let offtaker = required("endpoint_url.url_offtaker", offtaker)?;
        let api_key = required("api_key.ipr_api_key", raw.api_key.and_then(|key| key.ipr_api_key))?;
        let login_password = required(
            "login.login_password",
            raw.login.and_then(|login| login.login_password),
        )?;

        Ok(Self {
            endpoints: Endpoints {
                individual: parse_url("endpoint_url.url_individual", &individual)?,
                offtaker: parse_url("endpoint_url.url_offtaker", &offtaker)?,
            },
            api_key: SecretString::from(api_key),
            login_password: SecretString::from(login_password),
        })
    }

    pub fn endpoint(&self, category: Category) -> &Url {
        match category {
            Category::Individual => &self.endpoints.individual,
            Category::Offtaker => &self.endpoints.offtaker,
        }
    }
}

pub fn resolve_config_path() -> PathBuf {
    env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn required(key: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn parse_url(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|err| ConfigError::InvalidUrl {
        key,
        reason: err.to_string(),
    })
}
