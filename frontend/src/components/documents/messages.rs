use common::export::{ExportOutcome, ExportProgress};
use common::model::{CategoryView, Document, DocumentCategory, IntakeForm};
use common::ClientError;

#[derive(Clone, PartialEq)]
pub enum PendingAction {
    PermanentDelete(Document),
    BulkDelete(Vec<String>),
    Regenerate(IntakeForm),
}

#[derive(Clone, Copy, PartialEq)]
pub enum DraftField {
    Title,
    Template,
    Category,
    CreatedFor,
}

pub enum Msg {
    Load,
    Loaded(Result<Vec<Document>, ClientError>),
    SetView(CategoryView),
    SetSearch(String),
    ToggleSort,
    ToggleSelected(String),
    SelectVisible(bool),
    OpenExport,
    /// `None` clears the override and falls back to the configured count.
    SetOverride(String, Option<u32>),
    StartExport,
    ExportProgress(ExportProgress),
    ExportFinished(ExportOutcome),
    CloseExport,
    QuickPdf,
    QuickPdfFinished(Result<(Vec<u8>, String), ClientError>),
    Preview(Document),
    EditField(String, String),
    SaveFields,
    FieldsSaved(Result<Document, ClientError>),
    ClosePreview,
    OpenSignatures(Document),
    SignaturesClosed,
    OpenStandaloneSignatures(Document),
    StandaloneSignaturesClosed(bool),
    OpenCreate,
    EditDraft(DraftField, String),
    SubmitCreate,
    Created(Result<Document, ClientError>),
    CloseCreate,
    Ask(PendingAction),
    CancelPending,
    ConfirmPending,
    Done(Result<String, ClientError>),
    Back,
}

/// Values of the "new standalone document" dialog.
#[derive(Clone, PartialEq)]
pub struct StandaloneDraft {
    pub title: String,
    pub template_id: String,
    pub category: DocumentCategory,
    pub created_for: String,
}
