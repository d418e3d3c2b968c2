//! Turning selected documents into one downloadable, copy-expanded PDF.

mod batch;
mod merge;

pub use batch::{
    AGENCY_AUTHOR, AGENCY_CREATOR, ExportBackend, ExportFailure, ExportOutcome, ExportProgress,
    ExportRequest, ExportedFile, SelectedDocument, export_filename, export_metadata,
    export_selection, plan_copies,
};
pub use merge::{PdfMerger, PdfMetadata};
