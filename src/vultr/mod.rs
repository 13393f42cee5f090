//! Vultr API interaction module
//!
//! This module provides the external collaborator the lookup engine talks to:
//! API-key authentication, the HTTP client and the typed list/get calls.
//!
//! # Module Structure
//!
//! - [`auth`] - API key resolution
//! - [`client`] - Main Vultr client with cursor-paginated list support
//! - [`http`] - HTTP utilities and the typed [`http::ApiError`]
//!
//! # Example
//!
//! ```ignore
//! use vultr_lookup::vultr::{auth::VultrCredentials, client::VultrClient};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let creds = VultrCredentials::resolve(None, None)?;
//!     let client = VultrClient::new(creds, "https://api.vultr.com/v2", Duration::from_secs(30))?;
//!     let page = client.list_page("applications", "applications", 100, None).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
