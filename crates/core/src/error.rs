//! Domain error model.

use thiserror::Error;

use crate::id::InvoiceId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is a recoverable, caller-visible failure. Services never
/// recover locally; errors from a store are passed through unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A supplied contractor or task id does not resolve.
    #[error("{entity} {id} does not exist")]
    ReferenceNotFound { entity: &'static str, id: u64 },

    /// A service operation targeted a missing draft.
    #[error("draft {0} does not exist")]
    DraftNotFound(InvoiceId),

    /// A repository operation targeted a missing row.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    /// Signature empty/whitespace-only, or the time window is not strictly ordered.
    #[error("invalid invoice: {0}")]
    InvalidInvoice(String),

    /// A submitted invoice (the carried id) already bills the draft's task.
    #[error("invoice {0} already exists for this task")]
    DuplicateInvoice(InvoiceId),

    /// Submitted invoices can never be edited or deleted.
    #[error("submitted invoices cannot be edited or deleted")]
    SubmittedInvoiceImmutable,

    /// A fresh submitted invoice must not carry an id.
    #[error("unexpected id {0} on invoice insert")]
    UnexpectedId(InvoiceId),

    /// Contractor names are unique under case-insensitive comparison.
    #[error("contractor named '{0}' already exists")]
    DuplicateName(String),

    /// An explicitly supplied id is already taken in the target store.
    #[error("{entity} {id} already exists")]
    DuplicateId { entity: &'static str, id: u64 },

    /// An identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The backing store is unavailable (e.g. a poisoned lock).
    #[error("store unavailable: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn reference_not_found(entity: &'static str, id: impl Into<u64>) -> Self {
        Self::ReferenceNotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl Into<u64>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn invalid_invoice(msg: impl Into<String>) -> Self {
        Self::InvalidInvoice(msg.into())
    }

    pub fn duplicate_id(entity: &'static str, id: impl Into<u64>) -> Self {
        Self::DuplicateId {
            entity,
            id: id.into(),
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Poisoned-lock helper for in-memory backends.
    pub fn poisoned() -> Self {
        Self::Storage("lock poisoned".to_string())
    }
}
