//! Lookup drivers
//!
//! Glue between the generic engine (projection, filter, collector) and the
//! Vultr client for one typed resource kind.

use super::attributes::{project, AttributeMap};
use super::collector::{collect, Page, PageLimits};
use super::error::LookupError;
use super::filter::{FilterSpec, Predicate};
use super::kinds::Resource;
use super::registry::{get_all_resource_keys, get_resource, ResourceDef};
use crate::vultr::client::VultrClient;
use crate::vultr::http::ApiError;
use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;

/// Default page size requested from list endpoints
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Per-lookup knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupOptions {
    pub per_page: u32,
    pub limits: PageLimits,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            limits: PageLimits::default(),
        }
    }
}

/// Attributes written back after a successful lookup or read
///
/// Carries one value per documented attribute; anything the resource does
/// not carry is filled with the zero value of its declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSourceState {
    pub kind: String,
    pub id: String,
    pub attributes: AttributeMap,
}

impl DataSourceState {
    pub fn from_resource<R: Resource>(def: &ResourceDef, resource: &R) -> Self {
        let projected = project(resource);

        let attributes = def
            .attributes
            .iter()
            .map(|attr| {
                let value = projected
                    .get(&attr.name)
                    .cloned()
                    .unwrap_or_else(|| attr.kind.zero_value());
                (attr.name.clone(), value)
            })
            .collect();

        let id = projected
            .get(&def.id_field)
            .and_then(|v| v.as_canonical())
            .map(|s| s.into_owned())
            .unwrap_or_default();

        Self {
            kind: R::KIND.to_string(),
            id,
            attributes,
        }
    }
}

/// Registry entry for a kind
pub fn definition(kind: &str) -> Result<&'static ResourceDef, LookupError> {
    get_resource(kind).ok_or_else(|| LookupError::UnknownKind {
        kind: kind.to_string(),
        known: get_all_resource_keys().into_iter().map(String::from).collect(),
    })
}

/// Fetch and decode one page of a kind's list endpoint
async fn fetch_page<R: Resource>(
    client: &VultrClient,
    path: &str,
    collection_key: &str,
    per_page: u32,
    cursor: Option<String>,
) -> Result<Page<R>> {
    let raw = client
        .list_page(path, collection_key, per_page, cursor.as_deref())
        .await?;

    let items = raw
        .items
        .into_iter()
        .map(|item| {
            serde_json::from_value::<R>(item)
                .with_context(|| format!("Failed to decode {} item", R::KIND))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Page::new(items, Some(raw.meta.links.next)))
}

/// Find the single resource of kind `R` matching `spec`
///
/// The filter is validated against the kind before the first request.
pub async fn find<R: Resource>(
    client: &VultrClient,
    scope: Option<&str>,
    spec: &FilterSpec,
    options: LookupOptions,
) -> Result<R, LookupError> {
    let def = definition(R::KIND)?;
    let path = def.resolve_path(R::KIND, scope)?;
    let predicate = Predicate::compile_for(spec, R::KIND, &def.attribute_names())?;
    let label = def.display_name.to_lowercase();

    tracing::debug!(
        "lookup {}: {} clauses, path {}",
        R::KIND,
        predicate.clause_count(),
        path
    );

    collect(&label, &predicate, options.limits, |cursor| {
        fetch_page::<R>(client, &path, &def.collection_key, options.per_page, cursor)
    })
    .await
}

/// Find the single matching resource and render its state
pub async fn lookup<R: Resource>(
    client: &VultrClient,
    scope: Option<&str>,
    spec: &FilterSpec,
    options: LookupOptions,
) -> Result<DataSourceState, LookupError> {
    let resource = find::<R>(client, scope, spec, options).await?;
    let state = DataSourceState::from_resource(definition(R::KIND)?, &resource);
    tracing::info!("lookup {} resolved to id {}", R::KIND, state.id);
    Ok(state)
}

/// Read one resource by id
///
/// Returns `Ok(None)` when the API answers 404, i.e. the resource is gone.
pub async fn read<R: Resource>(
    client: &VultrClient,
    scope: Option<&str>,
    id: &str,
) -> Result<Option<R>> {
    if id.trim().is_empty() {
        bail!("{} id must not be empty", R::KIND);
    }

    let def = definition(R::KIND)?;
    let Some(get_key) = def.get_key.as_deref() else {
        bail!(
            "{} has no single-item endpoint; use a filtered lookup instead",
            R::KIND
        );
    };

    let path = format!(
        "{}/{}",
        def.resolve_path(R::KIND, scope)?,
        urlencoding::encode(id)
    );

    match client.get(&path).await {
        Ok(body) => {
            let item = body
                .get(get_key)
                .cloned()
                .ok_or_else(|| anyhow!("Missing `{}` in response", get_key))?;
            let resource = serde_json::from_value(item)
                .with_context(|| format!("Failed to decode {}", R::KIND))?;
            Ok(Some(resource))
        }
        Err(e) if e.downcast_ref::<ApiError>().is_some_and(ApiError::is_not_found) => {
            tracing::warn!("Vultr {} ({}) not found", R::KIND, id);
            Ok(None)
        }
        Err(e) => Err(e.context(format!("error getting {} {}", R::KIND, id))),
    }
}

/// Read one resource by id and render its state
pub async fn read_state<R: Resource>(
    client: &VultrClient,
    scope: Option<&str>,
    id: &str,
) -> Result<Option<DataSourceState>> {
    let def = definition(R::KIND)?;
    let resource = read::<R>(client, scope, id).await?;
    Ok(resource.map(|r| DataSourceState::from_resource(def, &r)))
}
