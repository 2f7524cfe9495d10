//! Document text loading.
//!
//! [`FsTextLoader`] dispatches on file extension: PDF, Word (`.docx`/`.doc`),
//! and everything else as plain text with invalid UTF-8 dropped.

mod docx;
#[cfg(feature = "pdf")]
mod pdf;

use std::path::Path;

use tracing::debug;

use crate::error::{Result, ScreenerError};

/// Extracts raw text from a document on disk.
pub trait TextLoader: Send + Sync {
    fn load_text(&self, path: &Path) -> Result<String>;
}

/// Document families recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Word,
    PlainText,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => Self::Pdf,
            "doc" | "docx" => Self::Word,
            _ => Self::PlainText,
        }
    }
}

/// Filesystem-backed loader.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsTextLoader;

impl TextLoader for FsTextLoader {
    fn load_text(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path).map_err(|err| ScreenerError::TextLoad {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        let kind = DocumentKind::from_path(path);
        debug!(path = %path.display(), ?kind, bytes = bytes.len(), "loading document");

        match kind {
            DocumentKind::Pdf => load_pdf(path, &bytes),
            DocumentKind::Word => docx::extract_text(&bytes).map_err(|reason| {
                ScreenerError::TextLoad {
                    path: path.to_path_buf(),
                    reason,
                }
            }),
            DocumentKind::PlainText => Ok(decode_lossy(&bytes)),
        }
    }
}

#[cfg(feature = "pdf")]
fn load_pdf(path: &Path, bytes: &[u8]) -> Result<String> {
    pdf::extract_text(bytes).map_err(|reason| ScreenerError::TextLoad {
        path: path.to_path_buf(),
        reason,
    })
}

#[cfg(not(feature = "pdf"))]
fn load_pdf(path: &Path, _bytes: &[u8]) -> Result<String> {
    Err(ScreenerError::UnsupportedFormat(format!(
        "{}: built without the `pdf` feature",
        path.display()
    )))
}

/// Decode UTF-8, silently dropping invalid byte sequences.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}
