//! Titled signatures for a standalone document, captured locally and sent in
//! one request after review.

use yew::platform::spawn_local;
use yew::prelude::*;

use common::model::Document;
use common::signature::{
    CaptureState, Point, SignaturePad, SignatureStore, StandaloneWorkflow, CANVAS_HEIGHT,
    CANVAS_WIDTH,
};
use common::ClientError;

use crate::api::ApiClient;
use crate::helpers::show_toast;
use crate::tops_sheet::yw_material_top_sheet::{close_top_sheet, open_top_sheet, YwMaterialTopSheet};

use super::{report, SignatureCanvas};

#[derive(Properties, PartialEq, Clone)]
pub struct StandaloneSignatureProps {
    pub api: ApiClient,
    pub document: Document,
    /// Called with `true` when signatures were submitted.
    pub on_close: Callback<bool>,
    pub on_error: Callback<ClientError>,
}

pub enum Msg {
    Begin,
    PointerDown(Point),
    PointerMove(Point),
    Clear,
    SetTitle(String),
    Commit,
    Cancel,
    Review,
    Discard(String),
    Submit,
    Submitted(Result<(), ClientError>),
    Close,
}

pub struct StandaloneSignatureDialog {
    workflow: StandaloneWorkflow,
    title: String,
    submitted: bool,
    sheet_ref: NodeRef,
}

impl Component for StandaloneSignatureDialog {
    type Message = Msg;
    type Properties = StandaloneSignatureProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            workflow: StandaloneWorkflow::new(SignaturePad::new(CANVAS_WIDTH, CANVAS_HEIGHT)),
            title: String::new(),
            submitted: false,
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
                self.workflow.begin_signature();
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
            Msg::SetTitle(title) => {
                self.title = title;
                false
            }
            Msg::Commit => {
                match self.workflow.commit_signature(&self.title) {
                    Ok(signature) => {
                        show_toast(&format!("'{}' captured.", signature.title));
                        self.title.clear();
                    }
                    Err(err) => report(err, &ctx.props().on_error),
                }
                true
            }
            Msg::Cancel => {
                self.workflow.cancel();
                true
            }
            Msg::Review => {
                self.workflow.review();
                true
            }
            Msg::Discard(id) => {
                if let Err(err) = self.workflow.discard_signature(&id) {
                    report(err, &ctx.props().on_error);
                }
                true
            }
            Msg::Submit => {
                match self.workflow.prepare_submit() {
                    Ok(signatures) => {
                        let api = ctx.props().api.clone();
                        let document_id = ctx.props().document.id.clone();
                        let link = ctx.link().clone();
                        spawn_local(async move {
                            let result = api.submit_standalone(&document_id, &signatures).await;
                            link.send_message(Msg::Submitted(result));
                        });
                    }
                    Err(err) => report(err, &ctx.props().on_error),
                }
                true
            }
            Msg::Submitted(result) => {
                match self.workflow.finish_submit(result) {
                    Ok(count) => {
                        self.submitted = true;
                        show_toast(&format!("{} signature(s) submitted.", count));
                    }
                    Err(err) => report(err, &ctx.props().on_error),
                }
                true
            }
            Msg::Close => {
                close_top_sheet(self.sheet_ref.clone());
                ctx.props().on_close.emit(self.submitted);
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let workflow = &self.workflow;
        let busy = workflow.is_submitting();

        let body = match workflow.state() {
            CaptureState::Drawing => html! {
                <div class="pad">
                    <label>{ "Signature title" }
                        <input
                            type="text"
                            placeholder="e.g. Foster parent"
                            value={self.title.clone()}
                            oninput={link.callback(|e: InputEvent| {
                                let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                Msg::SetTitle(input.value())
                            })}
                        />
                    </label>
                    <SignatureCanvas
                        strokes={workflow.pad().strokes().to_vec()}
                        on_start={link.callback(Msg::PointerDown)}
                        on_move={link.callback(Msg::PointerMove)}
                    />
                    <div class="dialog-actions">
                        <button class="btn" onclick={link.callback(|_| Msg::Clear)}>{ "Clear" }</button>
                        <button class="btn" onclick={link.callback(|_| Msg::Cancel)}>{ "Cancel" }</button>
                        <button class="btn btn-primary" onclick={link.callback(|_| Msg::Commit)}>{ "Add signature" }</button>
                    </div>
                </div>
            },
            CaptureState::Reviewing => html! {
                <div class="review">
                    <ul class="captured-list">
                        { for workflow.captured().iter().map(|signature| {
                            let id = signature.id.clone();
                            html! {
                                <li key={signature.id.clone()}>
                                    <img src={signature.image.clone()} alt={signature.title.clone()} class="signature-thumb" />
                                    <span>{ &signature.title }</span>
                                    <button class="btn btn-link" disabled={busy} onclick={link.callback(move |_| Msg::Discard(id.clone()))}>
                                        { "Remove" }
                                    </button>
                                </li>
                            }
                        }) }
                    </ul>
                    <div class="dialog-actions">
                        <button class="btn" onclick={link.callback(|_| Msg::Begin)} disabled={busy}>{ "Add another" }</button>
                        <button class="btn btn-primary" onclick={link.callback(|_| Msg::Submit)} disabled={busy}>
                            { if busy { "Submitting…" } else { "Submit all" } }
                        </button>
                    </div>
                </div>
            },
            _ => html! {
                <div class="dialog-actions">
                    <span>{ format!("{} captured", workflow.captured().len()) }</span>
                    <button class="btn" onclick={link.callback(|_| Msg::Review)}>{ "Review" }</button>
                    <button class="btn btn-primary" onclick={link.callback(|_| Msg::Begin)}>{ "New signature" }</button>
                </div>
            },
        };

        html! {
            <YwMaterialTopSheet node_ref={self.sheet_ref.clone()}>
                <div class="dialog signature-dialog">
                    <h3>{ format!("Signatures: {}", ctx.props().document.title) }</h3>
                    { body }
                    {
                        if let Some(error) = workflow.last_error() {
                            html! { <div class="form-error">{ error }</div> }
                        } else {
                            html! {}
                        }
                    }
                    <div class="dialog-footer">
                        <button class="btn" onclick={link.callback(|_| Msg::Close)} disabled={busy}>{ "Close" }</button>
                    </div>
                </div>
            </YwMaterialTopSheet>
        }
    }
}
