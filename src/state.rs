//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is built once at startup and handed to every service. It
//! replaces ambient theme and auth contexts: configuration, local
//! preferences and the backend handle (which owns the auth session) are all
//! reachable from it and from nowhere else.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::backend::rest::RestBackend;
use crate::backend::{AuthSession, Backend, BackendError};
use crate::config::AppConfig;
use crate::notice::ErrorCode;
use crate::prefs::{PrefKey, Preferences, PrefsError};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error(transparent)]
    Prefs(#[from] PrefsError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ErrorCode for StartupError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Prefs(e) => e.error_code(),
            Self::Backend(e) => e.error_code(),
        }
    }
}

/// Application state passed to every service. Clone is cheap; all fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub prefs: Arc<Mutex<Preferences>>,
    pub backend: Arc<dyn Backend>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, prefs: Preferences, backend: Arc<dyn Backend>) -> Self {
        Self { config: Arc::new(config), prefs: Arc::new(Mutex::new(prefs)), backend }
    }

    /// Load preferences, build the HTTP backend and restore a stored session.
    ///
    /// # Errors
    ///
    /// Fails when preferences cannot be read or the HTTP client cannot be built.
    pub fn from_config(config: AppConfig) -> Result<Self, StartupError> {
        let prefs = Preferences::load(&config.prefs_path)?;
        let backend = RestBackend::new(&config)?;
        let session = match prefs.get(PrefKey::AuthSession) {
            Some(raw) => match serde_json::from_value::<AuthSession>(raw.clone()) {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!(error = %e, "stored session unreadable; continuing signed out");
                    None
                }
            },
            None => None,
        };
        debug!(signed_in = session.is_some(), "session restored");
        backend.restore_session(session);
        Ok(Self::new(config, prefs, Arc::new(backend)))
    }

    /// Write the backend's current session into preferences and save them.
    ///
    /// # Errors
    ///
    /// Fails when preferences cannot be written.
    pub async fn persist_session(&self) -> Result<(), PrefsError> {
        let mut prefs = self.prefs.lock().await;
        match self.backend.session() {
            Some(session) => prefs.set(PrefKey::AuthSession, serde_json::to_value(session)?),
            None => {
                prefs.remove(PrefKey::AuthSession);
            }
        }
        prefs.save()
    }
}


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
