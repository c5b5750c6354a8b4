use crate::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "@cf/openai/gpt-oss-120b";
pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";
pub const API_TOKEN_ENV: &str = "CLOUDFLARE_API_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub account_id: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub auth_token: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared secret clients must present as `Authorization: Bearer <key>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_key: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            model: default_model(),
            auth_token: String::new(),
            port: default_port(),
            client_key: None,
            api_base: default_api_base(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_port() -> u16 {
    10000
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl GatewayConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Search standard locations for a config file, falling back to defaults.
    /// Priority: CLI arg > CWD > XDG config > home dir
    pub fn find_and_load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::load(path);
        }

        for candidate in &config_search_paths() {
            if candidate.exists() {
                tracing::info!(path = %candidate.display(), "Loading config");
                return Self::load(candidate);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Fill in the backend credential from the environment if nothing else set it.
    pub fn apply_env(&mut self) {
        if self.auth_token.is_empty() {
            if let Ok(token) = std::env::var(API_TOKEN_ENV) {
                self.auth_token = token;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.auth_token.is_empty() {
            return Err(GatewayError::config(format!(
                "No Workers AI auth token configured. Pass --token, set auth_token in the \
                 config file, or export {API_TOKEN_ENV}."
            )));
        }
        if self.account_id.is_empty() {
            tracing::warn!("account_id is empty; backend calls will most likely fail");
        }
        Ok(())
    }

    /// The configured client key, treating an empty string as unset.
    pub fn client_key(&self) -> Option<&str> {
        self.client_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn responses_url(&self) -> String {
        format!(
            "{}/accounts/{}/ai/v1/responses",
            self.api_base.trim_end_matches('/'),
            self.account_id
        )
    }
}

pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("workers-ai-proxy.toml"));

    if cfg!(target_os = "macos") {
        if let Some(home) = home_dir() {
            paths.push(
                home.join("Library")
                    .join("Application Support")
                    .join("workers-ai-proxy")
                    .join("config.toml"),
            );
        }
    } else {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg).join("workers-ai-proxy").join("config.toml"));
        }
        if let Some(home) = home_dir() {
            paths.push(home.join(".config").join("workers-ai-proxy").join("config.toml"));
        }
    }

    if let Some(home) = home_dir() {
        paths.push(home.join(".workers-ai-proxy.toml"));
    }

    paths
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
