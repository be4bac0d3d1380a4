//! Deck import from other tools. Parsers are not written yet, so every
//! recognized file is rejected with a "coming soon" error.

use std::fmt;
use std::path::Path;

use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Anki,
    Pdf,
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Anki => "Anki",
            Self::Pdf => "PDF",
        })
    }
}

impl ImportFormat {
    /// Format implied by the file extension.
    #[must_use]
    pub fn detect(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "apkg" | "colpkg" => Some(Self::Anki),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("{format} import is coming soon")]
    ComingSoon { format: ImportFormat },
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),
}

impl crate::notice::ErrorCode for ImportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ComingSoon { .. } => "E_IMPORT_COMING_SOON",
            Self::UnsupportedFileType(_) => "E_IMPORT_UNSUPPORTED",
        }
    }
}

/// # Errors
///
/// Always returns [`ImportError::ComingSoon`].
pub fn import_anki(path: &Path) -> Result<(), ImportError> {
    info!(path = %path.display(), "anki import requested");
    Err(ImportError::ComingSoon { format: ImportFormat::Anki })
}

/// # Errors
///
/// Always returns [`ImportError::ComingSoon`].
pub fn import_pdf(path: &Path) -> Result<(), ImportError> {
    info!(path = %path.display(), "pdf import requested");
    Err(ImportError::ComingSoon { format: ImportFormat::Pdf })
}

/// Dispatch on the file extension.
///
/// # Errors
///
/// Unknown extensions are unsupported; known ones are not implemented yet.
pub fn import_file(path: &Path) -> Result<(), ImportError> {
    match ImportFormat::detect(path) {
        Some(ImportFormat::Anki) => import_anki(path),
        Some(ImportFormat::Pdf) => import_pdf(path),
        None => Err(ImportError::UnsupportedFileType(path.display().to_string())),
    }
}

#[cfg(test)]
#[path = "import_test.rs"]
mod tests;
