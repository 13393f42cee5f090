//! Typed Vultr resources
//!
//! One struct per resource kind. Fields deserialize from the Vultr v2 JSON
//! names and serialize under the external attribute names documented in
//! `resources/vultr.json`; where the two differ the `serde(rename)` pair is
//! the mapping.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A Vultr resource kind known to the registry
pub trait Resource: Serialize + DeserializeOwned {
    /// Registry key of this kind
    const KIND: &'static str;
}

/// Marketplace / one-click application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Application {
    pub id: i64,
    pub name: String,
    pub short_name: String,
    pub deploy_name: String,
    #[serde(rename = "type")]
    pub app_type: String,
    pub vendor: String,
    pub image_id: String,
}

impl Resource for Application {
    const KIND: &'static str = "application";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshKey {
    pub id: String,
    pub date_created: String,
    pub name: String,
    pub ssh_key: String,
}

impl Resource for SshKey {
    const KIND: &'static str = "ssh_key";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingSystem {
    pub id: i64,
    pub name: String,
    pub arch: String,
    pub family: String,
}

impl Resource for OperatingSystem {
    const KIND: &'static str = "os";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Region {
    pub id: String,
    pub city: String,
    pub country: String,
    pub continent: String,
    pub options: Vec<String>,
}

impl Resource for Region {
    const KIND: &'static str = "region";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plan {
    pub id: String,
    pub vcpu_count: i64,
    pub ram: i64,
    pub disk: i64,
    pub disk_count: i64,
    pub bandwidth: i64,
    pub monthly_cost: f64,
    #[serde(rename = "type")]
    pub plan_type: String,
    pub locations: Vec<String>,
}

impl Resource for Plan {
    const KIND: &'static str = "plan";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsDomain {
    pub domain: String,
    pub date_created: String,
    pub dns_sec: String,
}

impl Resource for DnsDomain {
    const KIND: &'static str = "dns_domain";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub data: String,
    pub priority: i64,
    pub ttl: i64,
}

impl Resource for DnsRecord {
    const KIND: &'static str = "dns_record";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CdnPullZone {
    pub id: String,
    pub date_created: String,
    pub status: String,
    pub label: String,
    pub origin_scheme: String,
    pub origin_domain: String,
    #[serde(rename(serialize = "url", deserialize = "cdn_url"))]
    pub url: String,
    pub cache_size: i64,
    pub requests: i64,
    #[serde(rename(serialize = "bytes_in", deserialize = "in_bytes"))]
    pub bytes_in: i64,
    #[serde(rename(serialize = "bytes_out", deserialize = "out_bytes"))]
    pub bytes_out: i64,
    #[serde(rename(serialize = "packets_per_second", deserialize = "packets_per_sec"))]
    pub packets_per_second: i64,
    /// Unset until the zone has been purged once
    #[serde(rename(serialize = "date_purged", deserialize = "last_purge"))]
    pub date_purged: Option<String>,
    pub cors: bool,
    pub gzip: bool,
    pub block_ai: bool,
    pub block_bad_bots: bool,
    pub regions: Vec<String>,
}

impl Resource for CdnPullZone {
    const KIND: &'static str = "cdn_pull_zone";
}
