//! Application configuration.
//!
//! Loaded from a JSON file (`--config`), then overridden from the
//! environment. Backend credentials are only needed when the app talks to
//! the hosted backend; `--fixtures` runs without them.

use crate::admin::AdminSettings;
use crate::gateway::RestGatewayConfig;
use crate::types::{AdminTab, PagingMode};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `backend.url`.
pub const ENV_URL: &str = "LAPTOP_PICKER_URL";
/// Environment variable overriding `backend.api_key`.
pub const ENV_KEY: &str = "LAPTOP_PICKER_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub page_size: usize,
    pub search_debounce_ms: u64,
    /// Paging override per tab (`cpus`, `gpus`, `programs`, `laptops`).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub paging: BTreeMap<String, PagingMode>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            search_debounce_ms: 300,
            paging: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub admin: AdminConfig,
}

/// Admin tab named in config or on the command line (`cpus`, `gpu`, ...).
pub fn tab_from_key(key: &str) -> Option<AdminTab> {
    match key.to_ascii_lowercase().as_str() {
        "cpu" | "cpus" => Some(AdminTab::Cpus),
        "gpu" | "gpus" => Some(AdminTab::Gpus),
        "programs" => Some(AdminTab::Programs),
        "laptops" => Some(AdminTab::Laptops),
        _ => None,
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Load from `path` when given, else start from defaults; then apply the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Override backend settings from a variable lookup (normally the environment).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_URL).filter(|v| !v.trim().is_empty()) {
            self.backend.url = url;
        }
        if let Some(key) = lookup(ENV_KEY).filter(|v| !v.trim().is_empty()) {
            self.backend.api_key = key;
        }
    }

    /// Validate the backend section
    pub fn validate_backend(&self) -> Result<()> {
        let url = self.backend.url.trim();
        if url.is_empty() {
            anyhow::bail!("Backend URL must be specified (config or {})", ENV_URL);
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("Backend URL must start with http:// or https://");
        }
        if self.backend.api_key.trim().is_empty() {
            anyhow::bail!("Backend API key must be specified (config or {})", ENV_KEY);
        }
        if self.backend.timeout_secs == 0 {
            anyhow::bail!("Backend timeout must be at least one second");
        }
        Ok(())
    }

    /// Validate the admin section
    pub fn validate_admin(&self) -> Result<()> {
        if self.admin.page_size == 0 {
            anyhow::bail!("Admin page size must be at least 1");
        }
        if let Some(key) = self.admin.paging.keys().find(|k| tab_from_key(k).is_none()) {
            anyhow::bail!(
                "Unknown admin tab '{}' in paging (expected cpus, gpus, programs or laptops)",
                key
            );
        }
        Ok(())
    }

    /// Validate the whole configuration
    pub fn validate(&self) -> Result<()> {
        self.validate_backend()?;
        self.validate_admin()
    }

    pub fn rest_gateway_config(&self) -> RestGatewayConfig {
        RestGatewayConfig {
            base_url: self.backend.url.trim().to_string(),
            api_key: self.backend.api_key.trim().to_string(),
            timeout: Duration::from_secs(self.backend.timeout_secs),
        }
    }

    pub fn admin_settings(&self) -> AdminSettings {
        AdminSettings {
            page_size: self.admin.page_size.max(1),
            search_debounce: Duration::from_millis(self.admin.search_debounce_ms),
            paging: self
                .admin
                .paging
                .iter()
                .filter_map(|(key, mode)| Some((tab_from_key(key)?, *mode)))
                .collect(),
        }
    }
}
