//! Filter-driven lookups of Vultr resources.
//!
//! Given a resource kind and a set of `(attribute, values)` filters, the
//! [`resource`] engine pages through the matching Vultr list endpoint and
//! resolves exactly one resource, or explains why it could not.

pub mod config;
pub mod resource;
pub mod vultr;

/// Version injected at compile time via VULTR_LOOKUP_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("VULTR_LOOKUP_VERSION") {
    Some(v) => v,
    None => "dev",
};
