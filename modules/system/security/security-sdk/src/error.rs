//! Error types for the security module.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Role,
    Profile,
    User,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Role => "role",
            EntityKind::Profile => "profile",
            EntityKind::User => "user",
        })
    }
}

/// Errors returned by the security collaborators and the first-admin bootstrap.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SecurityError {
    /// An administrator account already exists.
    #[error("admin user is already set")]
    AdminExists,

    /// A document failed validation and was not written.
    #[error("invalid {kind} '{id}': {message}")]
    Validation {
        kind: EntityKind,
        id: String,
        message: String,
    },

    #[error("{kind} '{id}' already exists")]
    AlreadyExists { kind: EntityKind, id: String },

    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl SecurityError {
    #[must_use]
    pub fn validation(kind: EntityKind, id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            kind,
            id: id.into(),
            message: message.into(),
        }
    }

    /// Stable dotted error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            SecurityError::AdminExists => "security.user.admin_exists",
            SecurityError::Validation { .. } => "security.validation_failed",
            SecurityError::AlreadyExists { .. } => "security.already_exists",
            SecurityError::NotFound { .. } => "security.not_found",
            SecurityError::Internal(_) => "security.internal",
        }
    }
}
