//! Backend-as-a-service access.
//!
//! DESIGN
//! ======
//! Storage, auth and serverless functions live in a hosted backend reached
//! over HTTP. Services only see the [`Backend`] trait: row-level table
//! operations filtered by column equality, named RPCs, function invocations
//! and email/password auth. Rows travel as JSON; typed decoding happens in
//! the services. Authorization is enforced remotely, so a filter that
//! matches rows the user cannot see simply returns fewer rows.

pub mod rest;

#[cfg(test)]
pub mod memory;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("http client build failed: {0}")]
    HttpClientBuild(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("backend returned {status}: {body}")]
    Response { status: u16, body: String },
    #[error("unexpected response shape: {0}")]
    Parse(String),
    #[error("not signed in")]
    Unauthenticated,
    #[error("account created; confirm the email address before signing in")]
    PendingConfirmation,
}

impl crate::notice::ErrorCode for BackendError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Request(_) => "E_BACKEND_REQUEST",
            Self::Response { .. } => "E_BACKEND_RESPONSE",
            Self::Parse(_) => "E_BACKEND_PARSE",
            Self::Unauthenticated => "E_UNAUTHENTICATED",
            Self::PendingConfirmation => "E_PENDING_CONFIRMATION",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Request(_) => true,
            Self::Response { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

// =============================================================================
// TABLES AND FILTERS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    FlashcardSets,
    Flashcards,
    Organizations,
    OrganizationInvites,
    UserSettings,
}

impl Table {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FlashcardSets => "flashcard_sets",
            Self::Flashcards => "flashcards",
            Self::Organizations => "organizations",
            Self::OrganizationInvites => "organization_invites",
            Self::UserSettings => "user_settings",
        }
    }
}

/// Column-equality filter with an optional ascending sort column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub eq: Vec<(String, String)>,
    pub order: Option<String>,
}

impl Filter {
    /// Matches every visible row.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn eq(column: &str, value: impl ToString) -> Self {
        Self::default().and(column, value)
    }

    #[must_use]
    pub fn id(id: Uuid) -> Self {
        Self::eq("id", id)
    }

    #[must_use]
    pub fn and(mut self, column: &str, value: impl ToString) -> Self {
        self.eq.push((column.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn order(mut self, column: &str) -> Self {
        self.order = Some(column.to_string());
        self
    }
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

// =============================================================================
// TRAIT
// =============================================================================

#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Rows of `table` matching `filter`.
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Value>, BackendError>;

    /// Insert one row and return it as stored.
    async fn insert(&self, table: Table, row: Value) -> Result<Value, BackendError>;

    /// Merge `patch` into matching rows and return them.
    async fn update(&self, table: Table, filter: &Filter, patch: Value) -> Result<Vec<Value>, BackendError>;

    /// Delete matching rows and return how many went.
    async fn delete(&self, table: Table, filter: &Filter) -> Result<usize, BackendError>;

    /// Call a stored procedure.
    async fn rpc(&self, name: &str, args: Value) -> Result<Value, BackendError>;

    /// Invoke a serverless function.
    async fn invoke(&self, function: &str, body: Value) -> Result<Value, BackendError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, BackendError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError>;

    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Adopt a previously stored session.
    fn restore_session(&self, session: Option<AuthSession>);

    fn session(&self) -> Option<AuthSession>;
}

/// Decode backend rows into `T`.
///
/// # Errors
///
/// Returns [`BackendError::Parse`] when a row does not match `T`.
pub fn decode_rows<T: serde::de::DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, BackendError> {
    rows.into_iter().map(decode_row).collect()
}

/// # Errors
///
/// Returns [`BackendError::Parse`] when the row does not match `T`.
pub fn decode_row<T: serde::de::DeserializeOwned>(row: Value) -> Result<T, BackendError> {
    serde_json::from_value(row).map_err(|e| BackendError::Parse(e.to_string()))
}

/// # Errors
///
/// Returns [`BackendError::Parse`] when `value` cannot be serialized.
pub fn encode_row<T: Serialize>(value: &T) -> Result<Value, BackendError> {
    serde_json::to_value(value).map_err(|e| BackendError::Parse(e.to_string()))
}
