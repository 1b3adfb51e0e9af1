//! Export Bridge: hands the displayed preview to an external document-export
//! service and returns the paginated file it produces.
//!
//! The rasterizer itself is out of process. `AppState` carries an
//! `ExportBridge` wrapping an `Arc<dyn DocumentExporter>`:
//! - `HttpDocumentExporter` when `EXPORT_SERVICE_URL` is configured
//! - `UnavailableExporter` otherwise, which refuses every export

pub mod http;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::preview::{escape_html, render_html, Preview};

pub use http::HttpDocumentExporter;

const DEFAULT_FILE_STEM: &str = "Resume";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("nothing to export: the preview has no content")]
    NothingToExport,

    #[error("export service rejected the document (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("export transport error: {0}")]
    Transport(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Collaborator options
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageOptions {
    #[serde(rename = "type")]
    pub kind: String,
    pub quality: f32,
}

/// Options handed to the export collaborator alongside the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    pub margin_inches: f32,
    pub output_file_name: String,
    pub image: ImageOptions,
    pub raster_scale: u8,
    pub page_format: String,
    pub page_unit: String,
    pub orientation: String,
}

impl ExportOptions {
    /// Letter, portrait, half-inch margins, 2× raster capture.
    pub fn for_file(output_file_name: String) -> Self {
        Self {
            margin_inches: 0.5,
            output_file_name,
            image: ImageOptions {
                kind: "jpeg".to_string(),
                quality: 0.98,
            },
            raster_scale: 2,
            page_format: "letter".to_string(),
            page_unit: "inch".to_string(),
            orientation: "portrait".to_string(),
        }
    }
}

/// `"{name}.pdf"`, or `Resume.pdf` when the name is blank.
///
/// Path separators, quotes, and other characters unsafe in a file name or a
/// `Content-Disposition` header are replaced with `_`.
pub fn export_file_name(suggested: &str) -> String {
    let stem = suggested.trim();
    let stem = if stem.is_empty() {
        DEFAULT_FILE_STEM.to_string()
    } else {
        stem.chars()
            .map(|c| match c {
                '/' | '\\' | '"' | ':' | '*' | '?' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect()
    };
    format!("{stem}.pdf")
}

/// `Content-Disposition` value for downloading `file_name`.
///
/// Header values must be ASCII, so a non-ASCII name gets an ASCII `filename`
/// fallback (other characters become `_`) plus an RFC 5987 `filename*`
/// carrying the exact UTF-8 name.
pub fn content_disposition(file_name: &str) -> String {
    if file_name.is_ascii() {
        return format!("attachment; filename=\"{file_name}\"");
    }
    let fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(file_name)
    )
}

/// Wraps the preview fragment in a standalone HTML document for rasterizing.
pub fn preview_document_html(preview_html: &str, title: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8"><title>{}</title></head><body><div id="resume-output">{}</div></body></html>"#,
        escape_html(title),
        preview_html
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// A document-export backend. Implement this to swap the rasterizer without
/// touching handlers or the bridge.
#[async_trait]
pub trait DocumentExporter: Send + Sync {
    async fn export(&self, html: &str, options: &ExportOptions) -> Result<Bytes, ExportError>;
}

/// Installed when no export service is configured. Every call fails loudly.
pub struct UnavailableExporter;

#[async_trait]
impl DocumentExporter for UnavailableExporter {
    async fn export(&self, _html: &str, _options: &ExportOptions) -> Result<Bytes, ExportError> {
        Err(ExportError::ServiceUnavailable(
            "no export service is configured (set EXPORT_SERVICE_URL)".to_string(),
        ))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Bridge
// ────────────────────────────────────────────────────────────────────────────

/// A file produced by the export service.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub file_name: String,
    pub bytes: Bytes,
}

#[derive(Clone)]
pub struct ExportBridge {
    exporter: Arc<dyn DocumentExporter>,
}

impl ExportBridge {
    pub fn new(exporter: Arc<dyn DocumentExporter>) -> Self {
        Self { exporter }
    }

    /// Exports `preview` as `"{suggested_file_name}.pdf"`.
    ///
    /// Refuses an empty preview; the export control is hidden in that state.
    pub async fn export(
        &self,
        preview: &Preview,
        suggested_file_name: &str,
    ) -> Result<ExportedDocument, ExportError> {
        if !preview.has_content() {
            return Err(ExportError::NothingToExport);
        }

        let file_name = export_file_name(suggested_file_name);
        let options = ExportOptions::for_file(file_name.clone());
        let html = preview_document_html(&render_html(preview), &file_name);

        match self.exporter.export(&html, &options).await {
            Ok(bytes) => {
                info!(file_name = %file_name, size = bytes.len(), "preview exported");
                Ok(ExportedDocument { file_name, bytes })
            }
            Err(e) => {
                warn!(file_name = %file_name, "export failed: {e}");
                Err(e)
            }
        }
    }
}
