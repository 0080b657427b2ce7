//! # DomainError
//!
//! Centralized error handling for the task-board core.
//! Every port and use case returns [`DomainResult`]; callers map
//! [`DomainError::kind`] onto their transport (HTTP status, exit code).

use thiserror::Error;

/// The primary error type for all domain and use-case operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Board, list, card, label, user or membership absent.
    #[error("{0}")]
    NotFound(String),

    /// Actor's role is insufficient for the requested action.
    #[error("{0}")]
    Forbidden(String),

    /// Business rule violation (archived board, owner protection,
    /// duplicate role assignment, cross-board move, ...).
    #[error("{0}")]
    Conflict(String),

    /// Malformed input reaching the core (unknown role, NaN position, ...).
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Infrastructure failure surfaced by a repository.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Coarse classification of a [`DomainError`], stable across messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    Conflict,
    Validation,
    Internal,
}

impl DomainError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::ValidationError(_) => ErrorKind::Validation,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// A specialized Result type for task-board logic.
pub type DomainResult<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_variant() {
        assert_eq!(DomainError::not_found("Board not found").kind(), ErrorKind::NotFound);
        assert_eq!(DomainError::forbidden("nope").kind(), ErrorKind::Forbidden);
        assert_eq!(DomainError::conflict("archived").kind(), ErrorKind::Conflict);
        assert_eq!(DomainError::validation("bad role").kind(), ErrorKind::Validation);

        let internal: DomainError = anyhow::anyhow!("disk on fire").into();
        assert_eq!(internal.kind(), ErrorKind::Internal);
    }

    #[test]
    fn messages_are_passed_through_verbatim() {
        let err = DomainError::conflict("Cannot remove the board owner");
        assert_eq!(err.to_string(), "Cannot remove the board owner");
    }
}
