//! Lookup errors
//!
//! Every variant is terminal for the lookup that raised it. The variants let
//! a caller tell "refine your filter" ([`LookupError::Ambiguous`]) apart from
//! "nothing matches" ([`LookupError::NotFound`]) and "the backend is broken"
//! ([`LookupError::UpstreamList`], [`LookupError::PaginationIntegrity`]).

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why a cursor-paginated traversal was abandoned
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationFault {
    /// The API handed back a cursor already followed in this traversal
    #[error("cursor `{cursor}` repeated on page {page}")]
    CursorRepeated { cursor: String, page: usize },

    /// More pages than the configured cap
    #[error("exceeded the limit of {limit} pages")]
    PageLimitExceeded { limit: usize },
}

/// Errors raised by a filtered lookup
#[derive(Debug, Error)]
pub enum LookupError {
    /// No filter clauses were supplied
    #[error("issue with filter: at least one filter block is required")]
    EmptyFilter,

    /// A clause listed no acceptable values
    #[error("issue with filter `{name}`: at least one value is required")]
    EmptyFilterValues { name: String },

    /// A clause names an attribute the resource kind does not document
    #[error("unknown filter attribute `{name}` for {kind}; expected one of: {}", known.join(", "))]
    UnknownAttribute {
        kind: String,
        name: String,
        known: Vec<String>,
    },

    /// The kind is not in the registry
    #[error("unknown resource kind `{kind}`; expected one of: {}", known.join(", "))]
    UnknownKind { kind: String, known: Vec<String> },

    /// A scoped kind was looked up without its scope value
    #[error("{kind} lookups require a `{scope}` scope")]
    MissingScope { kind: String, scope: String },

    /// The listing operation failed
    #[error("error getting {kind}: {source}")]
    UpstreamList {
        kind: String,
        #[source]
        source: BoxError,
    },

    /// Pagination finished with no matches
    #[error("no results were found for {kind}")]
    NotFound { kind: String },

    /// Pagination finished with more than one match
    #[error(
        "your search returned too many results : {count}. Please refine your search to be more specific"
    )]
    Ambiguous { kind: String, count: usize },

    /// The upstream cursor contract was violated
    #[error("pagination integrity violated: {0}")]
    PaginationIntegrity(#[from] PaginationFault),
}

impl LookupError {
    /// Wrap a listing failure
    pub fn upstream(kind: &str, source: anyhow::Error) -> Self {
        LookupError::UpstreamList {
            kind: kind.to_string(),
            source: source.into(),
        }
    }

    /// Raised before any network activity
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            LookupError::EmptyFilter
                | LookupError::EmptyFilterValues { .. }
                | LookupError::UnknownAttribute { .. }
                | LookupError::UnknownKind { .. }
                | LookupError::MissingScope { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound { .. })
    }

    /// Match count for ambiguous results
    pub fn ambiguous_count(&self) -> Option<usize> {
        match self {
            LookupError::Ambiguous { count, .. } => Some(*count),
            _ => None,
        }
    }
}
