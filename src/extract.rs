//! Document-source seam and per-page text persistence.
//!
//! Text extraction itself is an external collaborator: anything that can
//! turn a file into a sequence of page texts can back a session through
//! [`DocumentSource`]. The built-in [`TextFileSource`] handles
//! pre-extracted plain text. Extracted pages are persisted to the data
//! directory under a `{documentId}-{pageIndex}.txt` naming scheme and
//! read back for ingestion.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Unexpected file type '{0}', expected a plain-text file")]
    UnsupportedFile(PathBuf),

    #[error("Failed to read document '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Supplies raw per-page text for a single file.
pub trait DocumentSource {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>>;
}

/// Document source for pre-extracted plain text.
///
/// The whole file is one page unless it contains form feeds, the usual
/// page separator in text dumped from paginated formats.
#[derive(Debug, Default)]
pub struct TextFileSource;

const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md"];

impl DocumentSource for TextFileSource {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        if !extension.is_some_and(|e| TEXT_EXTENSIONS.contains(&e.as_str())) {
            return Err(ExtractionError::UnsupportedFile(path.to_path_buf()));
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ExtractionError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(raw.split('\u{000C}').map(|page| page.to_string()).collect())
    }
}

/// Derive the stable document identifier from its path: the file stem.
pub fn document_id(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string()
}

/// Persists and reloads extracted page text in a data directory.
pub struct PageStore {
    data_dir: PathBuf,
}

impl PageStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn page_path(&self, doc_id: &str, page_index: usize) -> PathBuf {
        self.data_dir.join(format!("{doc_id}-{page_index}.txt"))
    }

    /// Write one text file per page.
    pub fn write_pages(&self, doc_id: &str, pages: &[String]) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        for (page_index, page) in pages.iter().enumerate() {
            std::fs::write(self.page_path(doc_id, page_index), page)?;
        }
        log::info!("Wrote {} page file(s) for document '{}'", pages.len(), doc_id);
        Ok(())
    }

    /// Load a document's pages back in page order. Missing indexes end
    /// the sequence, so a document with N pages loads exactly N texts.
    pub fn load_pages(&self, doc_id: &str) -> Result<Vec<String>> {
        let mut pages = Vec::new();
        for page_index in 0.. {
            let path = self.page_path(doc_id, page_index);
            if !path.exists() {
                break;
            }
            pages.push(std::fs::read_to_string(&path)?);
        }
        Ok(pages)
    }
}
