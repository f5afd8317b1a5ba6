use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::client::GeocodingClient;

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "GEOCODER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_region = "us"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,

    /// Region bias applied when a command gives none, e.g. "us" or "uk".
    pub default_region: Option<String>,

    /// Overrides the provider endpoint; mostly useful against a local stub.
    pub base_url: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "geocoder", "geocoder-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key from the environment if set, otherwise from the file.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(env::var(API_KEY_ENV).ok())
    }

    fn resolve_api_key_with(&self, from_env: Option<String>) -> Option<String> {
        from_env
            .filter(|k| !k.is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.is_empty()))
    }

    /// Stores the key; an empty string clears it.
    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key).filter(|k| !k.is_empty());
    }

    pub fn set_default_region(&mut self, region: String) {
        self.default_region = Some(region).filter(|r| !r.is_empty());
    }

    /// Build a client from this config. `api_key` overrides every stored key.
    pub fn client(&self, api_key: Option<String>) -> Result<GeocodingClient> {
        let key = api_key.or_else(|| self.resolved_api_key()).unwrap_or_default();

        let client = GeocodingClient::new(key).context("Failed to build HTTP client")?;
        Ok(match &self.base_url {
            Some(url) => client.with_base_url(url.as_str()),
            None => client,
        })
    }
}
