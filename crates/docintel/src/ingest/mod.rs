//! Collects municipal documents from a directory tree.

mod formats;

pub use formats::{DocumentFormat, ExtractError};

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("document directory {} does not exist", path.display())]
    MissingRoot { path: PathBuf },
    #[error("document directory {} is not a directory", path.display())]
    NotADirectory { path: PathBuf },
    #[error("{} has no supported document extension (.txt, .pdf, .docx)", path.display())]
    UnsupportedFile { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        source: ExtractError,
    },
}

/// A file that was found but could not be turned into a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct CollectedDocuments {
    /// `(file name, extracted text)` pairs in walk order.
    pub documents: Vec<(String, String)>,
    pub skipped: Vec<SkippedDocument>,
}

impl CollectedDocuments {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn skip(&mut self, path: &Path, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(path = %path.display(), reason = %reason, "skipping document");
        self.skipped.push(SkippedDocument {
            path: path.to_path_buf(),
            reason,
        });
    }
}

/// Extracts the text of a single document, choosing the reader by extension.
pub fn read_document(path: impl AsRef<Path>) -> Result<String, IngestError> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFile {
        path: path.to_path_buf(),
    })?;

    formats::extract(path, format).map_err(|source| IngestError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Walks `root` recursively, extracting `.txt`, `.pdf` and `.docx` files.
///
/// Documents are keyed by file name; when two files share a name the first one
/// in walk order wins and the rest are skipped. Unreadable files are skipped,
/// so only a missing root fails the whole collection.
pub fn collect_documents(root: impl AsRef<Path>) -> Result<CollectedDocuments, IngestError> {
    let root = root.as_ref();
    if !root.exists() {
        return Err(IngestError::MissingRoot {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(IngestError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut collected = CollectedDocuments::default();
    let mut seen = HashSet::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(root).to_path_buf();
                collected.skip(&path, err.to_string());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Some(format) = DocumentFormat::from_path(path) else {
            continue;
        };
        let name = entry.file_name().to_string_lossy().into_owned();

        if seen.contains(&name) {
            collected.skip(path, format!("duplicate document name {name}"));
            continue;
        }

        match formats::extract(path, format) {
            Ok(text) => {
                debug!(path = %path.display(), bytes = text.len(), "document extracted");
                seen.insert(name.clone());
                collected.documents.push((name, text));
            }
            Err(err) => collected.skip(path, err.to_string()),
        }
    }

    Ok(collected)
}
