//! Configuration Management
//!
//! Handles persistent configuration storage for vultr-lookup.

use crate::resource::{LookupOptions, PageLimits, DEFAULT_MAX_PAGES, DEFAULT_PER_PAGE};
use crate::vultr::client::DEFAULT_BASE_URL;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the API endpoint
pub const BASE_URL_ENV: &str = "VULTR_API_URL";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// API key; prefer the VULTR_API_KEY environment variable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// API endpoint override
    #[serde(default)]
    pub base_url: Option<String>,
    /// Page size for list calls
    #[serde(default)]
    pub per_page: Option<u32>,
    /// Hard cap on pages per lookup
    #[serde(default)]
    pub max_pages: Option<usize>,
    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vultr-lookup").join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a file; a missing or unreadable file yields defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective endpoint (CLI > env > config > default)
    pub fn effective_base_url(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| std::env::var(BASE_URL_ENV).ok().filter(|s| !s.is_empty()))
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Page size, clamped to at least one item
    pub fn effective_per_page(&self) -> u32 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).max(1)
    }

    /// Page cap, clamped to at least one page
    pub fn effective_max_pages(&self) -> usize {
        self.max_pages.unwrap_or(DEFAULT_MAX_PAGES).max(1)
    }

    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS).max(1))
    }

    /// Paging knobs for a lookup
    pub fn lookup_options(&self) -> LookupOptions {
        LookupOptions {
            per_page: self.effective_per_page(),
            limits: PageLimits {
                max_pages: self.effective_max_pages(),
            },
        }
    }
}
