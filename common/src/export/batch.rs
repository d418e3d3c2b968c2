//! Multi-document export: resolve copies, render, fetch PDFs, merge.
//!
//! Documents are processed strictly one after another in selection order.
//! A failing document is logged, recorded and skipped; the rest of the batch
//! still lands in the merged file.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::copies::CopyCountTable;
use crate::error::ClientError;
use crate::model::{CategoryView, Document};
use crate::templates::TemplateRegistry;

use super::merge::{PdfMerger, PdfMetadata};

pub const AGENCY_AUTHOR: &str = "Family Services Agency";
pub const AGENCY_CREATOR: &str = "Case Documents Client";

/// Backend calls the export needs.
#[async_trait(?Send)]
pub trait ExportBackend {
    async fn fetch_document(&self, id: &str) -> Result<Document, ClientError>;

    /// Renders one document's markup to PDF bytes on the server.
    async fn render_pdf(&self, markup: &str, filename: &str) -> Result<Vec<u8>, ClientError>;
}

/// A selected row on the documents screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedDocument {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub selection: Vec<SelectedDocument>,
    pub view: CategoryView,
    /// Explicit copy counts keyed by document id.
    pub copy_overrides: HashMap<String, u32>,
    pub client_name: Option<String>,
    pub requested_at: DateTime<Utc>,
}

impl ExportRequest {
    pub fn new(selection: Vec<SelectedDocument>, view: CategoryView) -> Self {
        Self {
            selection,
            view,
            copy_overrides: HashMap::new(),
            client_name: None,
            requested_at: Utc::now(),
        }
    }
}

/// Progress counted in copies: each copy of each selected document is one
/// unit, so a document exported three times advances `processed` by three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportProgress {
    pub processed: u32,
    pub total: u32,
}

impl ExportProgress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.processed.min(self.total) as u64 * 100) / self.total as u64) as u8
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportFailure {
    pub document_id: String,
    pub title: String,
    pub error: ClientError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub pages: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExportOutcome {
    /// `None` when the selection was empty or every document failed.
    pub file: Option<ExportedFile>,
    pub failures: Vec<ExportFailure>,
}

/// Copy count for every selected document, in selection order.
pub fn plan_copies(request: &ExportRequest, table: &CopyCountTable) -> Vec<u32> {
    request
        .selection
        .iter()
        .map(|doc| {
            table.resolve(
                &request.view,
                &doc.title,
                request.copy_overrides.get(&doc.id).copied(),
            )
        })
        .collect()
}

/// `<client>_<YYYYMMDD_HHMMSS>.pdf` with anything but ASCII letters and
/// digits in the client name replaced by `_`.
pub fn export_filename(client_name: Option<&str>, at: DateTime<Utc>) -> String {
    let client = client_name.map(str::trim).filter(|name| !name.is_empty());
    let stem: String = match client {
        Some(name) => name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect(),
        None => "documents".to_string(),
    };
    format!("{}_{}.pdf", stem, at.format("%Y%m%d_%H%M%S"))
}

pub fn export_metadata(client_name: Option<&str>) -> PdfMetadata {
    let client = client_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("Client");
    PdfMetadata {
        title: format!("{} - Case Documents", client),
        author: AGENCY_AUTHOR.to_string(),
        creator: AGENCY_CREATOR.to_string(),
    }
}

pub async fn export_selection<B, F>(
    backend: &B,
    registry: &TemplateRegistry,
    table: &CopyCountTable,
    request: &ExportRequest,
    mut on_progress: F,
) -> ExportOutcome
where
    B: ExportBackend + ?Sized,
    F: FnMut(ExportProgress),
{
    if request.selection.is_empty() {
        return ExportOutcome::default();
    }

    let copies = plan_copies(request, table);
    let total: u32 = copies.iter().sum();
    let mut progress = ExportProgress {
        processed: 0,
        total,
    };
    on_progress(progress);

    let mut merger = PdfMerger::new();
    let mut failures = Vec::new();
    let mut client_name = request.client_name.clone();

    for (selected, copy_count) in request.selection.iter().zip(copies) {
        let result = export_one(backend, registry, selected, copy_count, &mut merger).await;
        match result {
            Ok(document) => {
                if client_name.is_none() {
                    client_name = document.created_for;
                }
            }
            Err(err) => {
                log::warn!(
                    "skipping document {} ('{}') in export: {}",
                    selected.id,
                    selected.title,
                    err
                );
                failures.push(ExportFailure {
                    document_id: selected.id.clone(),
                    title: selected.title.clone(),
                    error: err,
                });
            }
        }
        progress.processed += copy_count;
        on_progress(progress);
    }

    if merger.is_empty() {
        return ExportOutcome {
            file: None,
            failures,
        };
    }

    let pages = merger.page_count();
    let metadata = export_metadata(client_name.as_deref());
    match merger.finish(&metadata) {
        Ok(bytes) => ExportOutcome {
            file: Some(ExportedFile {
                filename: export_filename(client_name.as_deref(), request.requested_at),
                bytes,
                pages,
            }),
            failures,
        },
        Err(err) => {
            log::error!("could not assemble merged PDF: {}", err);
            failures.push(ExportFailure {
                document_id: String::new(),
                title: metadata.title,
                error: err,
            });
            ExportOutcome {
                file: None,
                failures,
            }
        }
    }
}

async fn export_one<B>(
    backend: &B,
    registry: &TemplateRegistry,
    selected: &SelectedDocument,
    copies: u32,
    merger: &mut PdfMerger,
) -> Result<Document, ClientError>
where
    B: ExportBackend + ?Sized,
{
    let document = backend.fetch_document(&selected.id).await?;
    let markup = registry.render(&document)?;
    let filename = export_filename(Some(&document.title), Utc::now());
    let pdf = backend.render_pdf(&markup, &filename).await?;
    merger.append(&pdf, copies)?;
    Ok(document)
}
