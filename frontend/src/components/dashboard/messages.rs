use common::api::dto::IntakeFormDraft;
use common::model::{Document, FormStatus, IntakeForm};
use common::ClientError;

/// Destructive actions waiting for confirmation.
#[derive(Clone, PartialEq)]
pub enum PendingAction {
    Delete(IntakeForm),
    PermanentDelete(IntakeForm),
    BulkDelete(Vec<String>),
    GenerateDocuments(IntakeForm),
}

pub enum Msg {
    Load,
    Loaded(Result<Vec<IntakeForm>, ClientError>),
    SetTab(usize),
    SetSearch(String),
    SetStatusFilter(String),
    ToggleSort,
    ToggleSelected(String),
    SelectVisible(bool),
    SetStatus(String, FormStatus),
    SetArchived(String, bool),
    Ask(PendingAction),
    CancelPending,
    ConfirmPending,
    /// A mutation finished; carries the toast text on success.
    Done(Result<String, ClientError>),
    Generated(IntakeForm, Result<Vec<Document>, ClientError>),
    OpenCreate,
    OpenEdit(IntakeForm),
    EditDraft(DraftField, String),
    SubmitCreate,
    Created(Result<IntakeForm, ClientError>),
    CloseCreate,
    /// Fetches the latest copy of the form before the signature dialog opens.
    OpenSignatures(IntakeForm),
    SignaturesReady(Result<IntakeForm, ClientError>),
    SignaturesClosed,
    OpenDocuments(IntakeForm),
}

#[derive(Clone, Copy, PartialEq)]
pub enum DraftField {
    ClientName,
    CaseNumber,
    Notes,
}

impl DraftField {
    pub fn apply(self, draft: &mut IntakeFormDraft, value: String) {
        match self {
            DraftField::ClientName => draft.client_name = value,
            DraftField::CaseNumber => draft.case_number = value,
            DraftField::Notes => {
                draft
                    .details
                    .insert("notes".to_string(), serde_json::Value::String(value));
            }
        }
    }
}
