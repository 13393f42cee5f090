//! Vultr Authentication
//!
//! Vultr authenticates every v2 request with a personal API key sent as a
//! bearer token. The key comes from the CLI, the `VULTR_API_KEY` environment
//! variable, or the config file, in that order.

use anyhow::{bail, Result};
use std::fmt;
use std::sync::Arc;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "VULTR_API_KEY";

/// API key holder
#[derive(Clone)]
pub struct VultrCredentials {
    api_key: Arc<str>,
}

impl VultrCredentials {
    /// Create credentials from an explicit key
    pub fn new(api_key: &str) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            bail!("Vultr API key is empty. Set {} or pass --api-key", API_KEY_ENV);
        }

        Ok(Self {
            api_key: Arc::from(api_key),
        })
    }

    /// Resolve credentials: explicit key > environment > config value
    pub fn resolve(explicit: Option<&str>, configured: Option<&str>) -> Result<Self> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        let key = explicit
            .map(str::to_string)
            .or(from_env)
            .or_else(|| configured.map(str::to_string));

        match key {
            Some(key) => Self::new(&key),
            None => bail!(
                "No Vultr API key configured. Set {} or pass --api-key",
                API_KEY_ENV
            ),
        }
    }

    /// Token to send in the Authorization header
    pub fn token(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for VultrCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VultrCredentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}
