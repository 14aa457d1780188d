//! Export Pipeline: rendered preview in, PDF bytes out.
//!
//! ```text
//! RenderedPreview ─► inline class rules ─► layout onto pages ─► lopdf
//! ```
//!
//! Layout and encoding are CPU-bound and run on the blocking pool via
//! [`export_pdf_blocking`]. There is no retry; a failure is reported once
//! and the caller decides what to tell the user.

pub mod computed;
pub mod font_metrics;
pub mod inline;
pub mod layout;
pub mod pdf;

use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::render::{RenderedPreview, TemplateKind};

/// Upper bound on exported pages. A résumé that lays out longer than this
/// is almost certainly runaway content.
pub const MAX_PAGES: usize = 20;

pub const RESUME_FILE_NAME: &str = "resume.pdf";
pub const COVER_LETTER_FILE_NAME: &str = "cover_letter.pdf";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("preview has no export root")]
    EmptyPreview,

    #[error("rasterization failed: {0}")]
    Rasterize(String),

    #[error("PDF encoding failed: {0}")]
    Encode(String),
}

pub fn export_pdf(preview: &RenderedPreview) -> Result<Bytes, ExportError> {
    let root = inline::inline_styles(preview)?;
    let pages = layout::layout(&root);
    if pages.len() > MAX_PAGES {
        return Err(ExportError::Rasterize(format!(
            "document lays out to {} pages (limit {MAX_PAGES})",
            pages.len()
        )));
    }
    let bytes = pdf::write_pdf(&pages)?;
    debug!(pages = pages.len(), bytes = bytes.len(), "PDF exported");
    Ok(Bytes::from(bytes))
}

/// [`export_pdf`] on the blocking pool. Takes the preview by value for the
/// `'static` closure bound.
pub async fn export_pdf_blocking(preview: RenderedPreview) -> Result<Bytes, ExportError> {
    tokio::task::spawn_blocking(move || export_pdf(&preview))
        .await
        .map_err(|e| ExportError::Rasterize(format!("export task failed: {e}")))?
}

/// Everything the save flow hands to the backend collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct ExportBundle {
    pub document_json: serde_json::Value,
    pub template: TemplateKind,
    #[serde(skip)]
    pub pdf: Bytes,
    pub file_name: &'static str,
}

impl ExportBundle {
    /// Writes the PDF into `dir` under the bundle's file name.
    pub async fn download_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(self.file_name);
        tokio::fs::write(&path, &self.pdf).await?;
        Ok(path)
    }
}
