//! Local preferences stored as a flat JSON object on disk.
//!
//! Keys match the ones the web front end keeps in local storage so the two
//! stay interchangeable. Values are plain JSON; nothing is versioned.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::Value;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("preferences io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("preferences file is not a JSON object: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown preference key: {0}")]
    UnknownKey(String),
}

impl crate::notice::ErrorCode for PrefsError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "E_PREFS_IO",
            Self::Parse(_) => "E_PREFS_PARSE",
            Self::UnknownKey(_) => "E_PREFS_KEY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefKey {
    AppTheme,
    AppSize,
    EditorTheme,
    DefaultCardTemplate,
    LastSelectedTemplate,
    /// Signed-in session; managed by the auth commands.
    AuthSession,
}

impl PrefKey {
    pub const USER: [Self; 5] =
        [Self::AppTheme, Self::AppSize, Self::EditorTheme, Self::DefaultCardTemplate, Self::LastSelectedTemplate];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AppTheme => "app-theme",
            Self::AppSize => "app-size",
            Self::EditorTheme => "editor-theme",
            Self::DefaultCardTemplate => "defaultCardTemplate",
            Self::LastSelectedTemplate => "lastSelectedTemplate",
            Self::AuthSession => "auth-session",
        }
    }
}

impl FromStr for PrefKey {
    type Err = PrefsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::USER
            .into_iter()
            .chain([Self::AuthSession])
            .find(|k| k.as_str() == s)
            .ok_or_else(|| PrefsError::UnknownKey(s.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl Preferences {
    /// Load from `path`. A missing file yields empty preferences.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(PrefsError::Io { path, source }),
        };
        debug!(path = %path.display(), keys = values.len(), "preferences loaded");
        Ok(Self { path, values })
    }

    /// Empty preferences that save to `path`.
    #[must_use]
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), values: BTreeMap::new() }
    }

    /// # Errors
    ///
    /// Fails when the directory or file cannot be written.
    pub fn save(&self) -> Result<(), PrefsError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| PrefsError::Io { path: dir.to_path_buf(), source })?;
        }
        let text = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, text).map_err(|source| PrefsError::Io { path: self.path.clone(), source })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn get(&self, key: PrefKey) -> Option<&Value> {
        self.values.get(key.as_str())
    }

    /// String value for `key`. Non-string values are ignored.
    #[must_use]
    pub fn get_str(&self, key: PrefKey) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn set(&mut self, key: PrefKey, value: impl Into<Value>) {
        self.values.insert(key.as_str().to_string(), value.into());
    }

    pub fn remove(&mut self, key: PrefKey) -> Option<Value> {
        self.values.remove(key.as_str())
    }

    /// User-visible preferences, skipping session data.
    pub fn user_entries(&self) -> impl Iterator<Item = (PrefKey, &Value)> {
        PrefKey::USER.into_iter().filter_map(|k| self.get(k).map(|v| (k, v)))
    }

    /// Template for new cards: the last one picked, else the default, else `basic`.
    #[must_use]
    pub fn preferred_template(&self) -> &str {
        self.get_str(PrefKey::LastSelectedTemplate)
            .or_else(|| self.get_str(PrefKey::DefaultCardTemplate))
            .unwrap_or("basic")
    }
}

#[cfg(test)]
#[path = "prefs_test.rs"]
mod tests;
