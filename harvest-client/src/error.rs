//! Client error types
//!
//! `ClientError` covers transport and HTTP failures. The moderation layer
//! wraps it into [`FetchError`] (a collection could not be loaded) or
//! [`MutationError`] (a status change, delete or save was not acknowledged).
//! Neither is fatal: each is scoped to the one collection or record involved.

use std::fmt;

use shared::{EntityKind, RecordId, UserId};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other non-2xx answer
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// A collection served by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Records(EntityKind),
    Users,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Records(EntityKind::SellerListing) => f.write_str("seller listings"),
            Self::Records(EntityKind::BuyerRequest) => f.write_str("buyer requests"),
            Self::Users => f.write_str("users"),
        }
    }
}

/// The record or account a mutation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Record(EntityKind, RecordId),
    User(UserId),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(kind, id) => write!(f, "{} {}", kind, id),
            Self::User(id) => write!(f, "user {}", id),
        }
    }
}

/// Mutation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOp {
    SetStatus,
    Delete,
    Save,
}

impl fmt::Display for MutationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetStatus => f.write_str("status change"),
            Self::Delete => f.write_str("delete"),
            Self::Save => f.write_str("save"),
        }
    }
}

/// Loading a collection failed; render it empty with a failure indicator
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to load {collection}: {source}")]
    Remote {
        collection: Collection,
        #[source]
        source: ClientError,
    },

    #[error("loading {collection} was cancelled")]
    Cancelled { collection: Collection },
}

impl FetchError {
    pub fn collection(&self) -> Collection {
        match self {
            Self::Remote { collection, .. } | Self::Cancelled { collection } => *collection,
        }
    }
}

/// A mutation was not acknowledged; local state is left untouched
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("{op} of {subject} failed: {source}")]
    Remote {
        op: MutationOp,
        subject: Subject,
        #[source]
        source: ClientError,
    },

    #[error("{op} of {subject} was cancelled")]
    Cancelled { op: MutationOp, subject: Subject },
}

impl MutationError {
    pub fn op(&self) -> MutationOp {
        match self {
            Self::Remote { op, .. } | Self::Cancelled { op, .. } => *op,
        }
    }

    pub fn subject(&self) -> Subject {
        match self {
            Self::Remote { subject, .. } | Self::Cancelled { subject, .. } => *subject,
        }
    }
}

/// Entity store rejected a write
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("cannot store a {found} in the {expected} collection")]
    KindMismatch {
        expected: EntityKind,
        found: EntityKind,
    },

    #[error("record id {found} does not match key {key}")]
    IdMismatch { key: i64, found: i64 },
}

/// Edit session misuse or an incomplete draft
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no record is being edited")]
    NoDraft,

    #[error("a save is already in flight")]
    CommitInFlight,

    #[error("draft is missing {0}")]
    MissingField(&'static str),
}

/// Console-level error
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0} not found")]
    NotFound(Subject),

    #[error("cannot move {subject} from {from} to {to}")]
    IllegalTransition {
        subject: Subject,
        from: String,
        to: &'static str,
    },
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;
