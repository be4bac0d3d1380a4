//! Application services: everything a screen or CLI command does.
//!
//! Services take the [`AppState`] explicitly, validate input before any
//! request, and return typed errors. Callers turn errors into notices.

pub mod ai;
pub mod cards;
pub mod domain;
pub mod editor;
pub mod import;
pub mod org;
pub mod push;
pub mod sets;
pub mod settings;
pub mod study;

use uuid::Uuid;

use crate::backend::BackendError;
use crate::notice::ErrorCode;
use crate::state::AppState;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Empty { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("invalid domain: {0}")]
    InvalidDomain(String),
    #[error("unknown template: {0}")]
    UnknownTemplate(String),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Study(#[from] ::study::StudyError),
    #[error(transparent)]
    Doc(#[from] canvas::doc::DocError),
    #[error(transparent)]
    Prefs(#[from] crate::prefs::PrefsError),
    #[error(transparent)]
    Import(#[from] import::ImportError),
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },
    #[error("sign in first")]
    NotSignedIn,
    #[error("pattern failed to compile: {0}")]
    Pattern(regex::Error),
}

impl ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty { .. } => "E_REQUIRED",
            Self::TooLong { .. } => "E_TOO_LONG",
            Self::InvalidEmail(_) => "E_INVALID_EMAIL",
            Self::InvalidDomain(_) => "E_INVALID_DOMAIN",
            Self::UnknownTemplate(_) => "E_UNKNOWN_TEMPLATE",
            Self::Invalid(_) => "E_INVALID",
        }
    }
}

impl ErrorCode for ServiceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.error_code(),
            Self::Backend(e) => e.error_code(),
            Self::Study(_) => "E_STUDY",
            Self::Doc(_) => "E_EDIT",
            Self::Prefs(e) => e.error_code(),
            Self::Import(e) => e.error_code(),
            Self::NotFound { .. } => "E_NOT_FOUND",
            Self::NotSignedIn => "E_NOT_SIGNED_IN",
            Self::Pattern(_) => "E_PATTERN",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Backend(e) => e.retryable(),
            _ => false,
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// The signed-in user's id.
///
/// # Errors
///
/// Returns [`ServiceError::NotSignedIn`] without a session.
pub fn current_user(state: &AppState) -> Result<Uuid, ServiceError> {
    state.backend.session().map(|s| s.user.id).ok_or(ServiceError::NotSignedIn)
}

/// Trim `value` and enforce presence and a character limit.
///
/// # Errors
///
/// Returns [`ValidationError::Empty`] or [`ValidationError::TooLong`].
pub fn required_text(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    optional_text(field, trimmed, max)
}

/// Trim `value` and enforce a character limit. Empty is allowed.
///
/// # Errors
///
/// Returns [`ValidationError::TooLong`].
pub fn optional_text(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
