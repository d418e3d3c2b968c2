use chrono::{DateTime, Utc};

use crate::error::ClientError;
use crate::model::StandaloneSignature;

use super::pad::{Point, SignaturePad};
use super::store::SignatureStore;
use super::{CaptureState, WorkflowError};

/// Collects titled signatures in memory; nothing touches the network until
/// [`StandaloneWorkflow::submit_all`].
#[derive(Debug, Clone)]
pub struct StandaloneWorkflow {
    pad: SignaturePad,
    state: CaptureState,
    captured: Vec<StandaloneSignature>,
    submitting: bool,
    last_error: Option<String>,
}

impl StandaloneWorkflow {
    pub fn new(pad: SignaturePad) -> Self {
        Self {
            pad,
            state: CaptureState::Idle,
            captured: Vec::new(),
            submitting: false,
            last_error: None,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn pad(&self) -> &SignaturePad {
        &self.pad
    }

    /// Captured signatures in capture order.
    pub fn captured(&self) -> &[StandaloneSignature] {
        &self.captured
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn begin_signature(&mut self) {
        self.pad.clear();
        self.last_error = None;
        self.state = CaptureState::Drawing;
    }

    pub fn record_stroke(&mut self, point: Point) {
        if self.state == CaptureState::Drawing {
            self.pad.begin_stroke(point);
        }
    }

    pub fn extend_stroke(&mut self, point: Point) {
        if self.state == CaptureState::Drawing {
            self.pad.extend_stroke(point);
        }
    }

    pub fn clear_drawing(&mut self) {
        self.pad.clear();
    }

    pub fn cancel(&mut self) {
        self.pad.clear();
        self.state = CaptureState::Cancelled;
    }

    pub fn commit_signature(&mut self, title: &str) -> Result<&StandaloneSignature, WorkflowError> {
        self.commit_signature_at(title, Utc::now())
    }

    /// Stores the drawing under a `sig-<millis>` id derived from `now`.
    pub fn commit_signature_at(
        &mut self,
        title: &str,
        now: DateTime<Utc>,
    ) -> Result<&StandaloneSignature, WorkflowError> {
        if self.state != CaptureState::Drawing {
            return Err(WorkflowError::NotDrawing);
        }
        let title = title.trim();
        if title.is_empty() {
            return Err(self.fail(WorkflowError::MissingTitle));
        }
        let image = self.pad.rasterize().map_err(|err| self.fail(err.into()))?;

        let signature = StandaloneSignature {
            id: self.unique_id(now),
            title: title.to_string(),
            image: image.data_url,
            captured_at: Some(now),
        };
        self.captured.push(signature);
        self.pad.clear();
        self.last_error = None;
        self.state = CaptureState::Saved;
        Ok(&self.captured[self.captured.len() - 1])
    }

    /// Switches to the review list shown before the final submit.
    pub fn review(&mut self) -> &[StandaloneSignature] {
        self.pad.clear();
        self.state = CaptureState::Reviewing;
        &self.captured
    }

    pub fn discard_signature(&mut self, id: &str) -> Result<StandaloneSignature, WorkflowError> {
        let index = self
            .captured
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| WorkflowError::UnknownSignature(id.to_string()))?;
        Ok(self.captured.remove(index))
    }

    /// Snapshot of what will be submitted. Fails when nothing was captured.
    pub fn prepare_submit(&mut self) -> Result<Vec<StandaloneSignature>, WorkflowError> {
        if self.submitting {
            return Err(WorkflowError::Busy);
        }
        if self.captured.is_empty() {
            return Err(self.fail(WorkflowError::NothingToSubmit));
        }
        self.submitting = true;
        Ok(self.captured.clone())
    }

    /// Returns the number of signatures submitted. On failure everything
    /// captured is kept for a manual retry.
    pub fn finish_submit(&mut self, result: Result<(), ClientError>) -> Result<usize, WorkflowError> {
        self.submitting = false;
        match result {
            Ok(()) => {
                let count = self.captured.len();
                self.captured.clear();
                self.last_error = None;
                self.state = CaptureState::Saved;
                Ok(count)
            }
            Err(err) => {
                self.state = CaptureState::Reviewing;
                Err(self.fail(err.into()))
            }
        }
    }

    pub async fn submit_all<S>(&mut self, document_id: &str, store: &S) -> Result<usize, WorkflowError>
    where
        S: SignatureStore + ?Sized,
    {
        let signatures = self.prepare_submit()?;
        let result = store.submit_standalone(document_id, &signatures).await;
        self.finish_submit(result)
    }

    fn unique_id(&self, now: DateTime<Utc>) -> String {
        let mut millis = now.timestamp_millis();
        loop {
            let id = format!("sig-{}", millis);
            if !self.captured.iter().any(|s| s.id == id) {
                return id;
            }
            millis += 1;
        }
    }

    fn fail(&mut self, err: WorkflowError) -> WorkflowError {
        self.last_error = Some(err.to_string());
        err
    }
}
