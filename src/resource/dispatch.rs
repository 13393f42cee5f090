//! Kind Dispatch
//!
//! Maps resource kind keys (as typed on the command line) to the typed
//! lookup and read drivers.

use super::error::LookupError;
use super::filter::FilterSpec;
use super::kinds::{
    Application, CdnPullZone, DnsDomain, DnsRecord, OperatingSystem, Plan, Region, Resource,
    SshKey,
};
use super::lookup::{lookup, read_state, DataSourceState, LookupOptions};
use super::registry::get_all_resource_keys;
use crate::vultr::client::VultrClient;
use anyhow::Result;
use std::fmt;
use std::str::FromStr;

/// Every resource kind with a typed implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Application,
    SshKey,
    Os,
    Region,
    Plan,
    DnsDomain,
    DnsRecord,
    CdnPullZone,
}

impl Kind {
    pub const ALL: [Kind; 8] = [
        Kind::Application,
        Kind::SshKey,
        Kind::Os,
        Kind::Region,
        Kind::Plan,
        Kind::DnsDomain,
        Kind::DnsRecord,
        Kind::CdnPullZone,
    ];

    /// Registry key
    pub fn key(self) -> &'static str {
        match self {
            Kind::Application => Application::KIND,
            Kind::SshKey => SshKey::KIND,
            Kind::Os => OperatingSystem::KIND,
            Kind::Region => Region::KIND,
            Kind::Plan => Plan::KIND,
            Kind::DnsDomain => DnsDomain::KIND,
            Kind::DnsRecord => DnsRecord::KIND,
            Kind::CdnPullZone => CdnPullZone::KIND,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Kind {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| LookupError::UnknownKind {
                kind: s.to_string(),
                known: get_all_resource_keys().into_iter().map(String::from).collect(),
            })
    }
}

/// Run a filtered lookup for `kind`
pub async fn lookup_kind(
    kind: Kind,
    client: &VultrClient,
    scope: Option<&str>,
    spec: &FilterSpec,
    options: LookupOptions,
) -> Result<DataSourceState, LookupError> {
    tracing::debug!("lookup_kind: kind={}, scope={:?}", kind, scope);

    match kind {
        Kind::Application => lookup::<Application>(client, scope, spec, options).await,
        Kind::SshKey => lookup::<SshKey>(client, scope, spec, options).await,
        Kind::Os => lookup::<OperatingSystem>(client, scope, spec, options).await,
        Kind::Region => lookup::<Region>(client, scope, spec, options).await,
        Kind::Plan => lookup::<Plan>(client, scope, spec, options).await,
        Kind::DnsDomain => lookup::<DnsDomain>(client, scope, spec, options).await,
        Kind::DnsRecord => lookup::<DnsRecord>(client, scope, spec, options).await,
        Kind::CdnPullZone => lookup::<CdnPullZone>(client, scope, spec, options).await,
    }
}

/// Read one resource of `kind` by id
pub async fn read_kind(
    kind: Kind,
    client: &VultrClient,
    scope: Option<&str>,
    id: &str,
) -> Result<Option<DataSourceState>> {
    tracing::debug!("read_kind: kind={}, id={}", kind, id);

    match kind {
        Kind::Application => read_state::<Application>(client, scope, id).await,
        Kind::SshKey => read_state::<SshKey>(client, scope, id).await,
        Kind::Os => read_state::<OperatingSystem>(client, scope, id).await,
        Kind::Region => read_state::<Region>(client, scope, id).await,
        Kind::Plan => read_state::<Plan>(client, scope, id).await,
        Kind::DnsDomain => read_state::<DnsDomain>(client, scope, id).await,
        Kind::DnsRecord => read_state::<DnsRecord>(client, scope, id).await,
        Kind::CdnPullZone => read_state::<CdnPullZone>(client, scope, id).await,
    }
}
