//! Resource lookup engine
//!
//! This module resolves exactly one Vultr resource from a set of attribute
//! filters, the way a data source does.
//!
//! # Architecture
//!
//! - [`attributes`] - Projects typed resources into flat attribute maps
//! - [`filter`] - Filter clauses and the compiled [`Predicate`]
//! - [`collector`] - Walks cursor pagination and enforces the single-result contract
//! - [`registry`] - Loads resource kind definitions from embedded JSON
//! - [`kinds`] - Typed Vultr resource structs
//! - [`lookup`] - Composes the engine with the Vultr client
//! - [`dispatch`] - Maps kind keys to typed lookups
//!
//! # Example
//!
//! ```ignore
//! use vultr_lookup::resource::{lookup, FilterSpec, LookupOptions, kinds::SshKey};
//!
//! async fn my_key(client: &VultrClient) -> Result<DataSourceState, LookupError> {
//!     let spec = FilterSpec::new().with("name", &["my-key"]);
//!     lookup::<SshKey>(client, None, &spec, LookupOptions::default()).await
//! }
//! ```

pub mod attributes;
pub mod collector;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod kinds;
pub mod lookup;
mod registry;

pub use attributes::{project, AttributeMap, AttributeValue};
pub use collector::{collect, collect_matches, Page, PageLimits, DEFAULT_MAX_PAGES};
pub use dispatch::{lookup_kind, read_kind, Kind};
pub use error::{LookupError, PaginationFault};
pub use filter::{FilterClause, FilterSpec, Predicate};
pub use lookup::{
    definition, find, lookup, read, read_state, DataSourceState, LookupOptions, DEFAULT_PER_PAGE,
};
pub use registry::*;
