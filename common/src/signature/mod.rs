//! Handwritten signature capture.
//!
//! Two flows share one drawing surface:
//! - [`SlotWorkflow`] walks the five signer slots of an intake form or
//!   document in fixed order, persisting each signature as it is committed.
//! - [`StandaloneWorkflow`] collects any number of titled signatures locally
//!   and submits them in one request after a review step.

mod pad;
mod standalone;
mod store;
mod workflow;

use thiserror::Error;

use crate::error::ClientError;
use crate::model::SignerRole;

pub use pad::{Point, RASTER_SCALE, STROKE_WIDTH, SignatureImage, SignaturePad};
pub use standalone::StandaloneWorkflow;
pub use store::{SignatureStore, SignatureTarget};
pub use workflow::{PendingCommit, SlotOutcome, SlotWorkflow};

/// Logical canvas size used by the signature dialogs, in CSS pixels.
pub const CANVAS_WIDTH: u32 = 500;
pub const CANVAS_HEIGHT: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Drawing,
    Saved,
    Cancelled,
    Reviewing,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignatureError {
    #[error("Please provide a signature before saving.")]
    Empty,

    #[error("Could not encode signature image: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error("Start a signature before saving it.")]
    NotDrawing,

    #[error("The {expected} signature must be collected before the {requested} signature.")]
    OutOfOrder {
        expected: SignerRole,
        requested: SignerRole,
    },

    #[error("All signatures have been collected.")]
    Finished,

    #[error("A signature is already being saved.")]
    Busy,

    #[error("Please enter a title for this signature.")]
    MissingTitle,

    #[error("No signatures have been captured yet.")]
    NothingToSubmit,

    #[error("Signature '{0}' was not found.")]
    UnknownSignature(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl WorkflowError {
    /// Local failures raised before any request is made.
    pub fn is_validation(&self) -> bool {
        match self {
            WorkflowError::Signature(SignatureError::Empty)
            | WorkflowError::OutOfOrder { .. }
            | WorkflowError::MissingTitle
            | WorkflowError::NothingToSubmit => true,
            WorkflowError::Client(err) => err.is_validation(),
            _ => false,
        }
    }
}
