//! User-facing notices for failed actions.
//!
//! DESIGN
//! ======
//! Every error type that can reach the user implements [`ErrorCode`]. A
//! failure is logged once where it is caught and turned into a [`Notice`]
//! that the front end prints. Nothing is retried; `retryable` is only a
//! hint for the message.

use serde::Serialize;
use tracing::error;

/// Grepable error code for any error surfaced to the user.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl Notice {
    /// Log `err` against `action` and build the notice shown for it.
    pub fn from_error(action: &str, err: &(impl ErrorCode + ?Sized)) -> Self {
        let code = err.error_code();
        error!(action, code, error = %err, "action failed");
        Self { code, message: format!("{action} failed: {err}"), retryable: err.retryable() }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if self.retryable {
            write!(f, " (try again)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "notice_test.rs"]
mod tests;
