//! Contact domain errors
//!
//! Every orchestrator failure is one of three kinds. The boundary layer maps
//! each kind to a response class; no kind is inferred from message text.

use std::fmt;
use thiserror::Error;

use core_kernel::UpstreamError;

/// Errors returned by [`crate::CrmService`]
#[derive(Debug, Error)]
pub enum CrmError {
    /// The identifier could not be resolved to a contact, for any reason
    #[error("Contact not found: {0}")]
    ContactNotFound(String),

    /// Caller input broke a business rule
    #[error("Validation error: {0}")]
    Validation(String),

    /// The upstream system failed
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl CrmError {
    /// Creates a ContactNotFound error for the identifier the caller supplied
    pub fn not_found(identifier: impl fmt::Display) -> Self {
        CrmError::ContactNotFound(identifier.to_string())
    }

    /// Creates a Validation error with a reason
    pub fn validation(reason: impl Into<String>) -> Self {
        CrmError::Validation(reason.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CrmError::ContactNotFound(_))
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, CrmError::Upstream(_))
    }
}
