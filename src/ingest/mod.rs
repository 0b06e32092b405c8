//! Knowledge base ingestion.
//!
//! Reads source documents from the knowledge base folder, extracts their text,
//! and cleans it for chunking and embedding. Plain text and Markdown are read
//! directly; PDFs are extracted with the external `pdftotext` tool.

mod preprocess;

pub use preprocess::{PageMetadata, TextCleaner};

use crate::error::{MaskotError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// A cleaned source document ready for chunking.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Identifier derived from the file name (stem).
    pub id: String,
    /// Original file name.
    pub file_name: String,
    /// Cleaned, normalized text content.
    pub content: String,
    /// Metadata extracted from the document body.
    pub metadata: PageMetadata,
}

/// File extensions recognized as knowledge base documents.
const TEXT_EXTENSIONS: &[&str] = &["txt", "md"];

/// Load and clean all documents from the knowledge base folder.
///
/// Files that clean down to nothing are dropped. Unsupported file types are
/// skipped with a warning rather than failing the whole ingestion.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub async fn load_documents(dir: &Path) -> Result<Vec<SourceDocument>> {
    if !dir.is_dir() {
        return Err(MaskotError::Ingest(format!(
            "Knowledge base folder not found: {}",
            dir.display()
        )));
    }

    let cleaner = TextCleaner::new();
    let mut documents = Vec::new();

    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    entries.sort();

    for path in entries {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let raw_pages: Vec<String> = if ext == "pdf" {
            extract_pdf_pages(&path).await?
        } else if TEXT_EXTENSIONS.contains(&ext.as_str()) {
            vec![std::fs::read_to_string(&path)?]
        } else {
            warn!("Skipping unsupported file: {}", path.display());
            continue;
        };

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();
        let id = path
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();

        // Clean page by page, keeping the first metadata fields seen
        let mut metadata = PageMetadata::default();
        let mut cleaned_pages = Vec::new();
        for page in &raw_pages {
            let (cleaned, page_meta) = cleaner.clean(page);
            if metadata.source.is_empty() {
                metadata.source = page_meta.source;
            }
            if metadata.focus_area.is_empty() {
                metadata.focus_area = page_meta.focus_area;
            }
            if !cleaned.is_empty() {
                cleaned_pages.push(cleaned);
            }
        }

        let content = cleaned_pages.join(" ");
        if content.is_empty() {
            debug!("Dropping empty document: {}", file_name);
            continue;
        }

        debug!("Loaded {} ({} chars)", file_name, content.len());
        documents.push(SourceDocument {
            id,
            file_name,
            content,
            metadata,
        });
    }

    info!("Loaded {} documents from {}", documents.len(), dir.display());
    Ok(documents)
}

/// Extract text from a PDF using `pdftotext`, split into pages.
///
/// `pdftotext` writes form feeds between pages; splitting on them preserves
/// page boundaries for per-page cleaning.
async fn extract_pdf_pages(path: &Path) -> Result<Vec<String>> {
    let result = Command::new("pdftotext")
        .arg("-layout")
        .arg(path)
        .arg("-") // write to stdout
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(MaskotError::ToolNotFound("pdftotext".into()));
        }
        Err(e) => {
            return Err(MaskotError::Ingest(format!("pdftotext execution failed: {e}")));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MaskotError::ToolFailed(format!(
            "pdftotext failed on {}: {}",
            path.display(),
            stderr.trim()
        )));
    }

    let text = String::from_utf8_lossy(&output.stdout).to_string();
    Ok(text.split('\u{c}').map(|p| p.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_documents_from_folder() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("lesson.txt"),
            "Photosynthesis converts light into energy.\nsource: biology handbook\nfocus_area: plants",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.md"), "Cells divide by mitosis.").unwrap();
        std::fs::write(dir.path().join("image.png"), [0u8, 1, 2]).unwrap();

        let docs = load_documents(dir.path()).await.unwrap();
        assert_eq!(docs.len(), 2);

        let lesson = docs.iter().find(|d| d.id == "lesson").unwrap();
        assert!(lesson.content.contains("photosynthesis"));
        assert_eq!(lesson.metadata.source, "biology handbook");
        assert_eq!(lesson.metadata.focus_area, "plants");
    }

    #[tokio::test]
    async fn test_empty_documents_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("blank.txt"), "   \n\n  ").unwrap();

        let docs = load_documents(dir.path()).await.unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_missing_folder_errors() {
        let result = load_documents(Path::new("/nonexistent/maskot-kb")).await;
        assert!(matches!(result, Err(MaskotError::Ingest(_))));
    }
}
