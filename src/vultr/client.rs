//! Vultr Client
//!
//! Main client for interacting with the Vultr v2 API, combining the API key
//! and HTTP functionality. Lookups receive a `&VultrClient` explicitly; there
//! is no process-wide client.

use super::auth::VultrCredentials;
use super::http::VultrHttpClient;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Public Vultr API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.vultr.com/v2";

/// Pagination metadata attached to every Vultr list response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub links: Links,
}

/// Cursor links; an empty `next` marks the last page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub next: String,
}

/// One raw page of a list endpoint
#[derive(Debug, Clone)]
pub struct RawPage {
    pub items: Vec<Value>,
    pub meta: Meta,
}

/// Main Vultr client
#[derive(Clone)]
pub struct VultrClient {
    pub credentials: VultrCredentials,
    pub http: VultrHttpClient,
    pub base_url: Url,
}

impl VultrClient {
    /// Create a new Vultr client
    pub fn new(credentials: VultrCredentials, base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid Vultr API base URL: {}", base_url))?;
        let http = VultrHttpClient::new(timeout)?;

        Ok(Self {
            credentials,
            http,
            base_url,
        })
    }

    /// Build an absolute endpoint URL from a path relative to the base URL
    pub fn endpoint_url(&self, path: &str) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).with_context(|| format!("Invalid endpoint path: {}", path))
    }

    /// Make a GET request to a Vultr API path
    pub async fn get(&self, path: &str) -> Result<Value> {
        let url = self.endpoint_url(path)?;
        self.http.get(url.as_str(), self.credentials.token()).await
    }

    /// Fetch one page of a list endpoint
    ///
    /// `collection_key` names the array in the response body (e.g. `"applications"`).
    /// A missing array is treated as an empty page rather than an error.
    pub async fn list_page(
        &self,
        path: &str,
        collection_key: &str,
        per_page: u32,
        cursor: Option<&str>,
    ) -> Result<RawPage> {
        let mut url = self.endpoint_url(path)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("per_page", &per_page.to_string());
            if let Some(cursor) = cursor {
                query.append_pair("cursor", cursor);
            }
        }

        let response = self.http.get(url.as_str(), self.credentials.token()).await?;

        let items = match response.get(collection_key) {
            Some(Value::Array(items)) => items.clone(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => anyhow::bail!(
                "Unexpected `{}` in list response: expected array, got {}",
                collection_key,
                json_kind(other)
            ),
        };

        let meta = match response.get("meta") {
            Some(meta) => serde_json::from_value(meta.clone())
                .context("Failed to parse pagination metadata")?,
            None => Meta::default(),
        };

        tracing::debug!(
            "list {}: {} items, total {}, next cursor {:?}",
            path,
            items.len(),
            meta.total,
            meta.links.next
        );

        Ok(RawPage { items, meta })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> VultrClient {
        let creds = VultrCredentials::new("test-key").unwrap();
        VultrClient::new(creds, base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_url_joins_paths() {
        let c = client("https://api.vultr.com/v2");
        assert_eq!(
            c.endpoint_url("applications").unwrap().as_str(),
            "https://api.vultr.com/v2/applications"
        );
        let c = client("https://api.vultr.com/v2/");
        assert_eq!(
            c.endpoint_url("/ssh-keys").unwrap().as_str(),
            "https://api.vultr.com/v2/ssh-keys"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let creds = VultrCredentials::new("test-key").unwrap();
        assert!(VultrClient::new(creds, "not a url", Duration::from_secs(5)).is_err());
    }

    #[test]
    fn test_meta_defaults_when_links_missing() {
        let meta: Meta = serde_json::from_str(r#"{"total": 3}"#).unwrap();
        assert_eq!(meta.total, 3);
        assert!(meta.links.next.is_empty());
    }
}
