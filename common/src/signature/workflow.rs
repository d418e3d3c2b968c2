//! Fixed-order slot signing for intake forms and generated documents.
//!
//! Committing is split in two so an Elm-style UI can await the network
//! between the halves without holding a borrow of the workflow:
//! [`SlotWorkflow::prepare_commit`] validates and rasterizes,
//! [`SlotWorkflow::finish_commit`] applies the backend's answer.
//! [`SlotWorkflow::commit_signature`] chains both for async callers.

use std::collections::BTreeMap;

use crate::error::ClientError;
use crate::model::{SignatureSet, SignerRole};

use super::pad::{Point, SignatureImage, SignaturePad};
use super::store::{SignatureStore, SignatureTarget};
use super::{CaptureState, WorkflowError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    Signed,
    /// Recorded on the client only; the backend sees an absent signature.
    Skipped,
}

/// A validated, rasterized signature waiting for the backend to accept it.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCommit {
    pub role: SignerRole,
    pub image: SignatureImage,
}

#[derive(Debug, Clone)]
pub struct SlotWorkflow {
    target: SignatureTarget,
    pad: SignaturePad,
    state: CaptureState,
    outcomes: BTreeMap<SignerRole, SlotOutcome>,
    in_flight: Option<SignerRole>,
    last_error: Option<String>,
}

impl SlotWorkflow {
    pub fn new(target: SignatureTarget, pad: SignaturePad) -> Self {
        Self {
            target,
            pad,
            state: CaptureState::Idle,
            outcomes: BTreeMap::new(),
            in_flight: None,
            last_error: None,
        }
    }

    /// Starts from what the backend already holds: signed slots are not
    /// visited again.
    pub fn resume(target: SignatureTarget, pad: SignaturePad, existing: &SignatureSet) -> Self {
        let mut workflow = Self::new(target, pad);
        for (role, _) in existing.iter() {
            workflow.outcomes.insert(role, SlotOutcome::Signed);
        }
        workflow
    }

    pub fn target(&self) -> &SignatureTarget {
        &self.target
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn pad(&self) -> &SignaturePad {
        &self.pad
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn outcome(&self, role: SignerRole) -> Option<SlotOutcome> {
        self.outcomes.get(&role).copied()
    }

    /// The slot being collected: the first one, in fixed order, with no outcome.
    pub fn current_slot(&self) -> Option<SignerRole> {
        SignerRole::ALL
            .into_iter()
            .find(|role| !self.outcomes.contains_key(role))
    }

    pub fn is_complete(&self) -> bool {
        self.current_slot().is_none()
    }

    pub fn begin_signature(&mut self) -> Result<SignerRole, WorkflowError> {
        if self.in_flight.is_some() {
            return Err(WorkflowError::Busy);
        }
        let slot = self.current_slot().ok_or(WorkflowError::Finished)?;
        self.pad.clear();
        self.last_error = None;
        self.state = CaptureState::Drawing;
        log::debug!("signature capture started for {} on {:?}", slot, self.target);
        Ok(slot)
    }

    /// First pointer contact. Ignored unless a signature is in progress.
    pub fn record_stroke(&mut self, point: Point) {
        if self.state == CaptureState::Drawing && self.in_flight.is_none() {
            self.pad.begin_stroke(point);
        }
    }

    pub fn extend_stroke(&mut self, point: Point) {
        if self.state == CaptureState::Drawing && self.in_flight.is_none() {
            self.pad.extend_stroke(point);
        }
    }

    pub fn clear_drawing(&mut self) {
        if self.in_flight.is_none() {
            self.pad.clear();
        }
    }

    pub fn prepare_commit(&mut self, target_slot: SignerRole) -> Result<PendingCommit, WorkflowError> {
        if self.in_flight.is_some() {
            return Err(WorkflowError::Busy);
        }
        if self.state != CaptureState::Drawing {
            return Err(WorkflowError::NotDrawing);
        }
        let expected = self.current_slot().ok_or(WorkflowError::Finished)?;
        if target_slot != expected {
            return Err(self.fail(WorkflowError::OutOfOrder {
                expected,
                requested: target_slot,
            }));
        }
        let image = self
            .pad
            .rasterize()
            .map_err(|err| self.fail(err.into()))?;

        self.in_flight = Some(expected);
        Ok(PendingCommit {
            role: expected,
            image,
        })
    }

    /// Applies the backend's answer to a prepared commit. On failure the
    /// workflow stays on the same slot with the drawing intact so the user
    /// can retry.
    pub fn finish_commit(
        &mut self,
        pending: PendingCommit,
        result: Result<(), ClientError>,
    ) -> Result<SignerRole, WorkflowError> {
        self.in_flight = None;
        match result {
            Ok(()) => {
                self.outcomes.insert(pending.role, SlotOutcome::Signed);
                self.pad.clear();
                self.last_error = None;
                self.state = CaptureState::Saved;
                log::debug!("{} signature saved on {:?}", pending.role, self.target);
                Ok(pending.role)
            }
            Err(err) => Err(self.fail(err.into())),
        }
    }

    pub async fn commit_signature<S>(
        &mut self,
        target_slot: SignerRole,
        store: &S,
    ) -> Result<SignerRole, WorkflowError>
    where
        S: SignatureStore + ?Sized,
    {
        let pending = self.prepare_commit(target_slot)?;
        let result = store
            .save_signature(&self.target, pending.role, &pending.image.data_url)
            .await;
        self.finish_commit(pending, result)
    }

    /// Marks the current slot skipped and moves on.
    pub fn skip_signature(&mut self) -> Result<SignerRole, WorkflowError> {
        if self.in_flight.is_some() {
            return Err(WorkflowError::Busy);
        }
        let slot = self.current_slot().ok_or(WorkflowError::Finished)?;
        self.outcomes.insert(slot, SlotOutcome::Skipped);
        self.pad.clear();
        self.last_error = None;
        self.state = CaptureState::Idle;
        Ok(slot)
    }

    /// Abandons the drawing in progress.
    pub fn cancel(&mut self) {
        if self.in_flight.is_none() {
            self.pad.clear();
            self.state = CaptureState::Cancelled;
        }
    }

    /// Forgets a slot's outcome after the backend dropped its signature; the
    /// slot becomes collectable again in its fixed position.
    pub fn mark_discarded(&mut self, role: SignerRole) {
        self.outcomes.remove(&role);
        self.state = CaptureState::Idle;
        self.last_error = None;
    }

    pub async fn discard_signature<S>(
        &mut self,
        role: SignerRole,
        store: &S,
    ) -> Result<(), WorkflowError>
    where
        S: SignatureStore + ?Sized,
    {
        if self.in_flight.is_some() {
            return Err(WorkflowError::Busy);
        }
        match store.clear_signature(&self.target, role).await {
            Ok(()) => {
                self.mark_discarded(role);
                Ok(())
            }
            Err(err) => Err(self.fail(err.into())),
        }
    }

    fn fail(&mut self, err: WorkflowError) -> WorkflowError {
        self.last_error = Some(err.to_string());
        err
    }
}
