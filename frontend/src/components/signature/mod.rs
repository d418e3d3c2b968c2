//! Signature dialogs: fixed-order slot signing and standalone collection.

mod canvas;
mod slot_dialog;
mod standalone_dialog;

pub use canvas::SignatureCanvas;
pub use slot_dialog::SlotSignatureDialog;
pub use standalone_dialog::StandaloneSignatureDialog;

use common::signature::WorkflowError;
use common::ClientError;
use yew::Callback;

use crate::helpers::show_error;

/// Routes a workflow failure: session loss goes to the app shell, anything
/// else is shown where it happened.
pub(crate) fn report(err: WorkflowError, on_error: &Callback<ClientError>) {
    match err {
        WorkflowError::Client(ClientError::Unauthorized) => on_error.emit(ClientError::Unauthorized),
        other => show_error(&other.to_string()),
    }
}
