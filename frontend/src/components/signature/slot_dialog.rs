//! Collects the five slot signatures of an intake form or a document.
//!
//! The workflow is split around the network call: `prepare_commit` runs in
//! the click handler, the request runs in a spawned task and `finish_commit`
//! applies its answer when the task reports back.

use std::collections::BTreeMap;

use yew::platform::spawn_local;
use yew::prelude::*;

use common::model::{SignatureSet, SignerRole};
use common::signature::{
    CaptureState, PendingCommit, Point, SignaturePad, SignatureStore, SignatureTarget,
    SlotOutcome, SlotWorkflow, CANVAS_HEIGHT, CANVAS_WIDTH,
};
use common::ClientError;

use crate::api::ApiClient;
use crate::helpers::show_toast;
use crate::tops_sheet::confirm_dialog::ConfirmDialog;
use crate::tops_sheet::yw_material_top_sheet::{close_top_sheet, open_top_sheet, YwMaterialTopSheet};

use super::{report, SignatureCanvas};

#[derive(Properties, PartialEq, Clone)]
pub struct SlotSignatureProps {
    pub api: ApiClient,
    pub target: SignatureTarget,
    pub title: AttrValue,
    /// Signatures already on file; their slots are not collected again.
    pub existing: SignatureSet,
    /// Per-role label overrides.
    #[prop_or_default]
    pub labels: BTreeMap<SignerRole, String>,
    pub on_close: Callback<()>,
    pub on_error: Callback<ClientError>,
}

pub enum Msg {
    Begin,
    PointerDown(Point),
    PointerMove(Point),
    Clear,
    Save,
    Saved(PendingCommit, Result<(), ClientError>),
    Skip,
    Cancel,
    AskDiscard(SignerRole),
    CancelDiscard,
    ConfirmDiscard,
    Discarded(SignerRole, Result<(), ClientError>),
    Close,
}

pub struct SlotSignatureDialog {
    workflow: SlotWorkflow,
    discarding: Option<SignerRole>,
    sheet_ref: NodeRef,
}

impl SlotSignatureDialog {
    fn label(&self, ctx: &Context<Self>, role: SignerRole) -> String {
        ctx.props()
            .labels
            .get(&role)
            .map(|label| label.trim())
            .filter(|label| !label.is_empty())
            .unwrap_or(role.default_label())
            .to_string()
    }
}

impl Component for SlotSignatureDialog {
    type Message = Msg;
    type Properties = SlotSignatureProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        Self {
            workflow: SlotWorkflow::resume(
                props.target.clone(),
                SignaturePad::new(CANVAS_WIDTH, CANVAS_HEIGHT),
                &props.existing,
            ),
            discarding: None,
            sheet_ref: NodeRef::default(),
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, first_render: bool) {
        if first_render {
            open_top_sheet(self.sheet_ref.clone());
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Begin => {
                if let Err(err) = self.workflow.begin_signature() {
                    report(err, &ctx.props().on_error);
                }
                true
            }
            Msg::PointerDown(point) => {
                self.workflow.record_stroke(point);
                true
            }
            Msg::PointerMove(point) => {
                self.workflow.extend_stroke(point);
                true
            }
            Msg::Clear => {
                self.workflow.clear_drawing();
                true
            }
            Msg::Save => {
                let Some(slot) = self.workflow.current_slot() else {
                    return false;
                };
                match self.workflow.prepare_commit(slot) {
                    Ok(pending) => {
                        let api = ctx.props().api.clone();
                        let target = self.workflow.target().clone();
                        let link = ctx.link().clone();
                        spawn_local(async move {
                            let result = api
                                .save_signature(&target, pending.role, &pending.image.data_url)
                                .await;
                            link.send_message(Msg::Saved(pending, result));
                        });
                    }
                    Err(err) => report(err, &ctx.props().on_error),
                }
                true
            }
            Msg::Saved(pending, result) => {
                match self.workflow.finish_commit(pending, result) {
                    Ok(role) => show_toast(&format!("{} signature saved.", self.label(ctx, role))),
                    Err(err) => report(err, &ctx.props().on_error),
                }
                true
            }
            Msg::Skip => {
                match self.workflow.skip_signature() {
                    Ok(role) => show_toast(&format!("{} signature skipped.", self.label(ctx, role))),
                    Err(err) => report(err, &ctx.props().on_error),
                }
                true
            }
            Msg::Cancel => {
                self.workflow.cancel();
                true
            }
            Msg::AskDiscard(role) => {
                self.discarding = Some(role);
                true
            }
            Msg::CancelDiscard => {
                self.discarding = None;
                true
            }
            Msg::ConfirmDiscard => {
                let Some(role) = self.discarding.take() else {
                    return false;
                };
                let api = ctx.props().api.clone();
                let target = self.workflow.target().clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = api.clear_signature(&target, role).await;
                    link.send_message(Msg::Discarded(role, result));
                });
                true
            }
            Msg::Discarded(role, Ok(())) => {
                self.workflow.mark_discarded(role);
                show_toast(&format!("{} signature removed.", self.label(ctx, role)));
                true
            }
            Msg::Discarded(_, Err(err)) => {
                report(err.into(), &ctx.props().on_error);
                false
            }
            Msg::Close => {
                close_top_sheet(self.sheet_ref.clone());
                ctx.props().on_close.emit(());
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let workflow = &self.workflow;
        let drawing = workflow.state() == CaptureState::Drawing;
        let saving = workflow.is_saving();
        let current = workflow.current_slot();

        html! {
            <YwMaterialTopSheet node_ref={self.sheet_ref.clone()}>
                <div class="dialog signature-dialog">
                    <h3>{ format!("Signatures: {}", ctx.props().title) }</h3>
                    <ol class="slot-list">
                        { for SignerRole::ALL.into_iter().map(|role| self.slot_row(ctx, role, current)) }
                    </ol>
                    {
                        match current {
                            None => html! { <p class="done">{ "All signature slots are complete." }</p> },
                            Some(slot) if drawing => html! {
                                <div class="pad">
                                    <p>{ format!("Sign as {}", self.label(ctx, slot)) }</p>
                                    <SignatureCanvas
                                        strokes={workflow.pad().strokes().to_vec()}
                                        on_start={link.callback(Msg::PointerDown)}
                                        on_move={link.callback(Msg::PointerMove)}
                                        disabled={saving}
                                    />
                                    <div class="dialog-actions">
                                        <button class="btn" onclick={link.callback(|_| Msg::Clear)} disabled={saving}>{ "Clear" }</button>
                                        <button class="btn" onclick={link.callback(|_| Msg::Cancel)} disabled={saving}>{ "Cancel" }</button>
                                        <button class="btn btn-primary" onclick={link.callback(|_| Msg::Save)} disabled={saving}>
                                            { if saving { "Saving…" } else { "Save signature" } }
                                        </button>
                                    </div>
                                </div>
                            },
                            Some(slot) => html! {
                                <div class="dialog-actions">
                                    <button class="btn" onclick={link.callback(|_| Msg::Skip)}>{ "Skip" }</button>
                                    <button class="btn btn-primary" onclick={link.callback(|_| Msg::Begin)}>
                                        { format!("Sign as {}", self.label(ctx, slot)) }
                                    </button>
                                </div>
                            },
                        }
                    }
                    {
                        if let Some(error) = workflow.last_error() {
                            html! { <div class="form-error">{ error }</div> }
                        } else {
                            html! {}
                        }
                    }
                    <div class="dialog-footer">
                        <button class="btn" onclick={link.callback(|_| Msg::Close)} disabled={saving}>{ "Close" }</button>
                    </div>
                </div>
                {
                    if let Some(role) = self.discarding {
                        html! {
                            <ConfirmDialog
                                title="Remove signature"
                                message={format!("Remove the {} signature? It will have to be collected again.", self.label(ctx, role))}
                                confirm_label="Remove"
                                on_confirm={link.callback(|_| Msg::ConfirmDiscard)}
                                on_cancel={link.callback(|_| Msg::CancelDiscard)}
                            />
                        }
                    } else {
                        html! {}
                    }
                }
            </YwMaterialTopSheet>
        }
    }
}

impl SlotSignatureDialog {
    fn slot_row(&self, ctx: &Context<Self>, role: SignerRole, current: Option<SignerRole>) -> Html {
        let status = match self.workflow.outcome(role) {
            Some(SlotOutcome::Signed) => "Signed",
            Some(SlotOutcome::Skipped) => "Skipped",
            None if current == Some(role) => "Current",
            None => "Waiting",
        };
        let signed = self.workflow.outcome(role) == Some(SlotOutcome::Signed);
        html! {
            <li class={classes!("slot", status.to_lowercase())}>
                <span class="slot-label">{ self.label(ctx, role) }</span>
                <span class="slot-status">{ status }</span>
                {
                    if signed {
                        html! {
                            <button
                                class="btn btn-link"
                                disabled={self.workflow.is_saving()}
                                onclick={ctx.link().callback(move |_| Msg::AskDiscard(role))}
                            >
                                { "Remove" }
                            </button>
                        }
                    } else {
                        html! {}
                    }
                }
            </li>
        }
    }
}
