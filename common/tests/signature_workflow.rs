//! Scenario tests for the signature capture workflows, run against an
//! in-memory store that records every call it receives.

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use futures::executor::block_on;
use std::cell::RefCell;

use common::ClientError;
use common::model::{SignatureEntry, SignatureSet, SignerRole, StandaloneSignature};
use common::signature::{
    CaptureState, Point, SignatureError, SignaturePad, SignatureStore, SignatureTarget,
    SlotOutcome, SlotWorkflow, StandaloneWorkflow, WorkflowError,
};

#[derive(Default)]
struct RecordingStore {
    calls: RefCell<Vec<String>>,
    saved_images: RefCell<Vec<String>>,
    submitted: RefCell<Vec<StandaloneSignature>>,
    fail_next: RefCell<Option<ClientError>>,
}

impl RecordingStore {
    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn fail_once(&self, err: ClientError) {
        *self.fail_next.borrow_mut() = Some(err);
    }

    fn outcome(&self) -> Result<(), ClientError> {
        match self.fail_next.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl SignatureStore for RecordingStore {
    async fn save_signature(
        &self,
        target: &SignatureTarget,
        role: SignerRole,
        image: &str,
    ) -> Result<(), ClientError> {
        self.calls
            .borrow_mut()
            .push(format!("save {} {}", target.id(), role));
        self.outcome()?;
        self.saved_images.borrow_mut().push(image.to_string());
        Ok(())
    }

    async fn clear_signature(
        &self,
        target: &SignatureTarget,
        role: SignerRole,
    ) -> Result<(), ClientError> {
        self.calls
            .borrow_mut()
            .push(format!("clear {} {}", target.id(), role));
        self.outcome()
    }

    async fn submit_standalone(
        &self,
        document_id: &str,
        signatures: &[StandaloneSignature],
    ) -> Result<(), ClientError> {
        self.calls
            .borrow_mut()
            .push(format!("submit {} {}", document_id, signatures.len()));
        self.outcome()?;
        self.submitted.borrow_mut().extend_from_slice(signatures);
        Ok(())
    }
}

fn draw(workflow: &mut SlotWorkflow) {
    workflow.record_stroke(Point::new(30.0, 80.0));
    workflow.extend_stroke(Point::new(120.0, 40.0));
    workflow.extend_stroke(Point::new(210.0, 95.0));
}

fn intake_workflow() -> SlotWorkflow {
    SlotWorkflow::new(
        SignatureTarget::IntakeForm("form-1".to_string()),
        SignaturePad::new(320, 140),
    )
}

// ---------------------------------------------------------------------------
// Single-signature (slot) flow
// ---------------------------------------------------------------------------

/// Saving an empty canvas is a validation error and never reaches the store.
#[test]
fn empty_drawing_is_rejected_without_network_call() {
    let store = RecordingStore::default();
    let mut workflow = intake_workflow();
    workflow.begin_signature().unwrap();

    let err = block_on(workflow.commit_signature(SignerRole::Child, &store)).unwrap_err();

    assert_matches!(err, WorkflowError::Signature(SignatureError::Empty));
    assert!(err.is_validation());
    assert_eq!(store.call_count(), 0);
    assert_eq!(workflow.state(), CaptureState::Drawing);
    assert_eq!(workflow.last_error(), Some("Please provide a signature before saving."));
}

/// The persisted image is exactly twice the canvas size.
#[test]
fn committed_image_is_double_resolution() {
    let store = RecordingStore::default();
    let mut workflow = intake_workflow();
    workflow.begin_signature().unwrap();
    draw(&mut workflow);

    let pending = workflow.prepare_commit(SignerRole::Child).unwrap();
    assert_eq!((pending.image.width, pending.image.height), (640, 280));
    let decoded = image::load_from_memory(&pending.image.png_bytes().unwrap()).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (640, 280));

    let role = workflow.finish_commit(pending, Ok(())).unwrap();
    assert_eq!(role, SignerRole::Child);
    assert_eq!(store.call_count(), 0);
}

/// Slots are visited child, parent, caseworker, supervisor, agency.
#[test]
fn slots_are_collected_in_fixed_order() {
    let store = RecordingStore::default();
    let mut workflow = intake_workflow();

    for expected in SignerRole::ALL {
        assert_eq!(workflow.begin_signature().unwrap(), expected);
        draw(&mut workflow);
        let saved = block_on(workflow.commit_signature(expected, &store)).unwrap();
        assert_eq!(saved, expected);
        assert_eq!(workflow.state(), CaptureState::Saved);
    }

    assert!(workflow.is_complete());
    assert_matches!(workflow.begin_signature(), Err(WorkflowError::Finished));
    assert_eq!(
        *store.calls.borrow(),
        vec![
            "save form-1 child",
            "save form-1 parent",
            "save form-1 caseworker",
            "save form-1 supervisor",
            "save form-1 agency",
        ]
    );
    assert!(
        store
            .saved_images
            .borrow()
            .iter()
            .all(|img| img.starts_with("data:image/png;base64,"))
    );
}

/// Committing to a later slot than the current one is refused.
#[test]
fn skipping_ahead_is_not_allowed() {
    let store = RecordingStore::default();
    let mut workflow = intake_workflow();
    workflow.begin_signature().unwrap();
    draw(&mut workflow);

    let err = block_on(workflow.commit_signature(SignerRole::Supervisor, &store)).unwrap_err();
    assert_matches!(
        err,
        WorkflowError::OutOfOrder {
            expected: SignerRole::Child,
            requested: SignerRole::Supervisor
        }
    );
    assert_eq!(store.call_count(), 0);
}

/// A failed save keeps the slot and the drawing so the user can retry.
#[test]
fn network_failure_keeps_current_step_for_manual_retry() {
    let store = RecordingStore::default();
    store.fail_once(ClientError::Transport("connection reset".to_string()));
    let mut workflow = intake_workflow();
    workflow.begin_signature().unwrap();
    draw(&mut workflow);

    let err = block_on(workflow.commit_signature(SignerRole::Child, &store)).unwrap_err();
    assert_matches!(err, WorkflowError::Client(ClientError::Transport(_)));
    assert_eq!(workflow.current_slot(), Some(SignerRole::Child));
    assert_eq!(workflow.state(), CaptureState::Drawing);
    assert!(!workflow.pad().is_empty());
    assert_eq!(
        workflow.last_error(),
        Some("Network error: connection reset")
    );

    block_on(workflow.commit_signature(SignerRole::Child, &store)).unwrap();
    assert_eq!(workflow.current_slot(), Some(SignerRole::Parent));
    assert_eq!(store.call_count(), 2);
}

/// Skips are client-side only and advance to the next slot.
#[test]
fn skip_advances_without_backend_call() {
    let store = RecordingStore::default();
    let mut workflow = intake_workflow();

    assert_eq!(workflow.skip_signature().unwrap(), SignerRole::Child);
    assert_eq!(workflow.outcome(SignerRole::Child), Some(SlotOutcome::Skipped));
    assert_eq!(workflow.current_slot(), Some(SignerRole::Parent));
    assert_eq!(store.call_count(), 0);
}

/// Resuming skips slots the backend already holds; discarding reopens one.
#[test]
fn resume_and_discard_follow_slot_order() {
    let store = RecordingStore::default();
    let mut existing = SignatureSet::new();
    existing.insert(SignerRole::Child, SignatureEntry::new("data:image/png;base64,AA"));
    existing.insert(SignerRole::Parent, SignatureEntry::new("data:image/png;base64,BB"));

    let mut workflow = SlotWorkflow::resume(
        SignatureTarget::Document("doc-7".to_string()),
        SignaturePad::new(200, 100),
        &existing,
    );
    assert_eq!(workflow.current_slot(), Some(SignerRole::Caseworker));

    block_on(workflow.discard_signature(SignerRole::Parent, &store)).unwrap();
    assert_eq!(workflow.current_slot(), Some(SignerRole::Parent));
    assert_eq!(*store.calls.borrow(), vec!["clear doc-7 parent"]);
}

/// Cancelling discards strokes; a new capture starts clean.
#[test]
fn cancel_discards_drawing() {
    let mut workflow = intake_workflow();
    workflow.begin_signature().unwrap();
    draw(&mut workflow);
    workflow.cancel();

    assert_eq!(workflow.state(), CaptureState::Cancelled);
    assert!(workflow.pad().is_empty());
    assert_eq!(workflow.current_slot(), Some(SignerRole::Child));
}

/// Strokes outside an active capture are ignored.
#[test]
fn strokes_before_begin_are_ignored() {
    let mut workflow = intake_workflow();
    draw(&mut workflow);
    assert!(workflow.pad().is_empty());
    assert_matches!(
        workflow.prepare_commit(SignerRole::Child),
        Err(WorkflowError::NotDrawing)
    );
}

// ---------------------------------------------------------------------------
// Standalone (multi-signature) flow
// ---------------------------------------------------------------------------

fn standalone_with(titles: &[&str]) -> StandaloneWorkflow {
    let mut workflow = StandaloneWorkflow::new(SignaturePad::new(300, 120));
    let now = Utc.with_ymd_and_hms(2024, 9, 2, 14, 0, 0).unwrap();
    for title in titles {
        workflow.begin_signature();
        workflow.record_stroke(Point::new(10.0, 10.0));
        workflow.extend_stroke(Point::new(90.0, 60.0));
        workflow.extend_stroke(Point::new(200.0, 30.0));
        workflow.commit_signature_at(title, now).unwrap();
    }
    workflow
}

/// Captured signatures stay local, in capture order, with unique ids.
#[test]
fn standalone_captures_are_local_and_ordered() {
    let workflow = standalone_with(&["Foster parent", "Witness"]);
    let captured = workflow.captured();

    assert_eq!(captured.len(), 2);
    assert_eq!(captured[0].title, "Foster parent");
    assert_eq!(captured[1].title, "Witness");
    assert_ne!(captured[0].id, captured[1].id);
    assert!(captured[0].id.starts_with("sig-"));
}

/// A title is required and an empty drawing is still rejected.
#[test]
fn standalone_commit_validates_title_and_drawing() {
    let mut workflow = StandaloneWorkflow::new(SignaturePad::new(300, 120));
    workflow.begin_signature();
    assert_matches!(
        workflow.commit_signature("Witness"),
        Err(WorkflowError::Signature(SignatureError::Empty))
    );

    workflow.record_stroke(Point::new(5.0, 5.0));
    assert_matches!(workflow.commit_signature("   "), Err(WorkflowError::MissingTitle));
    assert!(workflow.captured().is_empty());
}

/// Review lists everything, then one request submits the whole batch.
#[test]
fn review_then_submit_all_in_one_request() {
    let store = RecordingStore::default();
    let mut workflow = standalone_with(&["Youth", "Caregiver", "Witness"]);

    let discarded_id = workflow.captured()[1].id.clone();
    workflow.discard_signature(&discarded_id).unwrap();
    assert_eq!(workflow.review().len(), 2);
    assert_eq!(workflow.state(), CaptureState::Reviewing);

    let submitted = block_on(workflow.submit_all("doc-42", &store)).unwrap();
    assert_eq!(submitted, 2);
    assert_eq!(*store.calls.borrow(), vec!["submit doc-42 2"]);
    let titles: Vec<_> = store
        .submitted
        .borrow()
        .iter()
        .map(|s| s.title.clone())
        .collect();
    assert_eq!(titles, vec!["Youth", "Witness"]);
    assert!(workflow.captured().is_empty());
}

/// Submitting nothing fails locally.
#[test]
fn submit_all_with_empty_map_fails() {
    let store = RecordingStore::default();
    let mut workflow = StandaloneWorkflow::new(SignaturePad::new(300, 120));

    let err = block_on(workflow.submit_all("doc-42", &store)).unwrap_err();
    assert_matches!(err, WorkflowError::NothingToSubmit);
    assert_eq!(store.call_count(), 0);
}

/// A failed bulk submit keeps every captured signature.
#[test]
fn failed_submit_keeps_captures() {
    let store = RecordingStore::default();
    store.fail_once(ClientError::Api {
        status: 500,
        message: "Database unavailable".to_string(),
    });
    let mut workflow = standalone_with(&["Youth"]);

    let err = block_on(workflow.submit_all("doc-42", &store)).unwrap_err();
    assert_eq!(err.to_string(), "Database unavailable");
    assert_eq!(workflow.captured().len(), 1);
    assert_eq!(workflow.state(), CaptureState::Reviewing);
}

#[test]
fn unknown_discard_id_is_reported() {
    let mut workflow = standalone_with(&["Youth"]);
    assert_matches!(
        workflow.discard_signature("sig-0"),
        Err(WorkflowError::UnknownSignature(id)) if id == "sig-0"
    );
}
